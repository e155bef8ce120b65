//! Database connection manager
//!
//! Owns the SQLite pool, creates the schema (tables, limit triggers) and
//! seeds the reference membership tiers. Vet and event listings are loaded
//! by the back office and only read here.

use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{query, SqlitePool};
use tracing::{debug, info};

/// Schema statements, applied in order on every start
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS membership_tiers (
        code TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        price_label TEXT NOT NULL DEFAULT '',
        monthly_price REAL NOT NULL DEFAULT 0,
        benefits TEXT NOT NULL DEFAULT '[]',
        button_text TEXT NOT NULL DEFAULT '',
        featured BOOLEAN NOT NULL DEFAULT FALSE,
        active BOOLEAN NOT NULL DEFAULT TRUE,
        max_pets INTEGER,
        documentation_slots INTEGER
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        membership_code TEXT,
        created_at INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS pets (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        owner_id TEXT NOT NULL,
        name TEXT NOT NULL,
        species TEXT NOT NULL,
        breed TEXT NOT NULL,
        birth_date TEXT NOT NULL,
        weight_kg REAL NOT NULL,
        sex TEXT NOT NULL,
        color TEXT NOT NULL,
        health_status TEXT,
        photo_url TEXT,
        created_at INTEGER NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_pets_owner ON pets (owner_id)",
    r#"
    CREATE TABLE IF NOT EXISTS medical_records (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL,
        pet_id INTEGER NOT NULL REFERENCES pets (id) ON DELETE CASCADE,
        kind TEXT NOT NULL CHECK (kind IN ('vacuna', 'pipeta', 'desparasitacion')),
        vaccine TEXT,
        product TEXT,
        antiparasitic TEXT,
        presentation TEXT,
        applied_on TEXT,
        expires_on TEXT,
        alert TEXT NOT NULL DEFAULT 'Activo' CHECK (alert IN ('Activo', 'Inactivo')),
        photo_url TEXT,
        created_at INTEGER NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_medical_records_pet ON medical_records (user_id, pet_id)",
    r#"
    CREATE TABLE IF NOT EXISTS notifications (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL,
        record_id INTEGER NOT NULL REFERENCES medical_records (id) ON DELETE CASCADE,
        message TEXT NOT NULL,
        alert_date TEXT NOT NULL,
        threshold_days INTEGER NOT NULL,
        seen BOOLEAN NOT NULL DEFAULT FALSE,
        created_at INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_notifications_key
        ON notifications (record_id, user_id, threshold_days, alert_date)
    "#,
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_notifications_message
        ON notifications (record_id, user_id, message)
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS subscriptions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL,
        membership_code TEXT NOT NULL,
        status TEXT NOT NULL CHECK (status IN ('pendiente', 'activa')),
        provider TEXT NOT NULL,
        external_id TEXT NOT NULL,
        created_at INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS vets (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        address TEXT NOT NULL,
        phone TEXT,
        lat REAL,
        lng REAL,
        link TEXT,
        image_url TEXT,
        active BOOLEAN NOT NULL DEFAULT TRUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS events (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        summary TEXT,
        details TEXT,
        access TEXT,
        requirements TEXT NOT NULL DEFAULT '[]',
        free BOOLEAN NOT NULL DEFAULT TRUE,
        notes TEXT,
        source_url TEXT,
        image_url TEXT,
        active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS event_locations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        event_id INTEGER NOT NULL REFERENCES events (id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        address TEXT
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_event_locations_event ON event_locations (event_id)",
    // Authoritative resource caps. An unknown or missing plan resolves to freemium.
    r#"
    CREATE TRIGGER IF NOT EXISTS pets_enforce_tier_limit
    BEFORE INSERT ON pets
    FOR EACH ROW
    WHEN (
        SELECT t.max_pets FROM membership_tiers t
        WHERE t.code = COALESCE(
            (SELECT t2.code FROM users u
             JOIN membership_tiers t2 ON t2.code = lower(trim(u.membership_code))
             WHERE u.id = NEW.owner_id),
            'freemium')
    ) <= (SELECT COUNT(*) FROM pets p WHERE p.owner_id = NEW.owner_id)
    BEGIN
        SELECT RAISE(ABORT, 'PET_LIMIT_REACHED');
    END
    "#,
    r#"
    CREATE TRIGGER IF NOT EXISTS medical_records_enforce_tier_limit
    BEFORE INSERT ON medical_records
    FOR EACH ROW
    WHEN (
        SELECT t.documentation_slots FROM membership_tiers t
        WHERE t.code = COALESCE(
            (SELECT t2.code FROM users u
             JOIN membership_tiers t2 ON t2.code = lower(trim(u.membership_code))
             WHERE u.id = NEW.user_id),
            'freemium')
    ) <= (
        SELECT COUNT(*) FROM medical_records r
        WHERE r.user_id = NEW.user_id AND r.pet_id = NEW.pet_id
    )
    BEGIN
        SELECT RAISE(ABORT, 'DOC_LIMIT_REACHED');
    END
    "#,
];

/// Reference plans: (code, title, price label, monthly price, benefits, button, featured, max pets, slots)
type TierSeed = (
    &'static str,
    &'static str,
    &'static str,
    f64,
    &'static str,
    &'static str,
    bool,
    Option<i64>,
    Option<i64>,
);

const TIER_SEEDS: &[TierSeed] = &[
    (
        "freemium",
        "Freemium",
        "Gratis",
        0.0,
        r#"["1 mascota","3 registros de documentación por mascota","Alertas de vencimiento"]"#,
        "Empezar gratis",
        false,
        Some(1),
        Some(3),
    ),
    (
        "premium",
        "Premium",
        "$4.990 / mes",
        4990.0,
        r#"["Hasta 3 mascotas","8 registros de documentación por mascota","Alertas de vencimiento"]"#,
        "Elegir Premium",
        true,
        Some(3),
        Some(8),
    ),
    (
        "plus",
        "Plus",
        "$8.990 / mes",
        8990.0,
        r#"["Mascotas ilimitadas","Documentación ilimitada","Alertas de vencimiento"]"#,
        "Elegir Plus",
        false,
        None,
        None,
    ),
];

/// Database connection manager
#[derive(Debug, Clone)]
pub struct DatabaseManager {
    pub pool: SqlitePool,
}

impl DatabaseManager {
    /// Create a new database manager with the given connection URL
    pub async fn new(database_url: &str) -> Result<Self> {
        info!("Connecting to database: {}", database_url);

        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database URL: {database_url}"))?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every connection to `:memory:` opens a separate database, so keep exactly one alive.
        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;

        debug!("Successfully connected to sqlite database");

        Ok(Self { pool })
    }

    /// Open a fresh in-memory database with the schema applied
    pub async fn in_memory() -> Result<Self> {
        let manager = Self::new("sqlite::memory:").await?;
        manager.migrate().await?;
        Ok(manager)
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        info!("Running database migrations");

        for statement in SCHEMA {
            query(statement)
                .execute(&self.pool)
                .await
                .context("Failed to apply schema statement")?;
        }

        self.seed_membership_tiers().await?;

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Insert the reference plans if they are not present yet
    async fn seed_membership_tiers(&self) -> Result<()> {
        for &(code, title, price_label, price, benefits, button, featured, max_pets, slots) in
            TIER_SEEDS
        {
            query(
                r#"
                INSERT OR IGNORE INTO membership_tiers
                    (code, title, price_label, monthly_price, benefits, button_text,
                     featured, active, max_pets, documentation_slots)
                VALUES (?, ?, ?, ?, ?, ?, ?, TRUE, ?, ?)
                "#,
            )
            .bind(code)
            .bind(title)
            .bind(price_label)
            .bind(price)
            .bind(benefits)
            .bind(button)
            .bind(featured)
            .bind(max_pets)
            .bind(slots)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to seed membership tier {code}"))?;
        }

        debug!("Membership tiers seeded");
        Ok(())
    }

    /// Test database connection
    pub async fn test_connection(&self) -> Result<()> {
        query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("Database connection test failed")?;

        debug!("Database connection test successful");
        Ok(())
    }

    /// Close the pool, waiting for connections to be returned
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
