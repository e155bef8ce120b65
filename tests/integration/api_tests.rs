//! HTTP endpoints exercised through axum-test

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use petcare::api::{create_app, USER_ID_HEADER};
use petcare::models::{Event, FeedItem, MedicalRecord, MembershipTier, Pet, Subscription, Vet};
use petcare::services::QuotaDecision;
use serde_json::{json, Value};

use crate::common::{days_from_today, TestContext, OWNER};

async fn create_test_server() -> (TestServer, TestContext) {
    let context = TestContext::new().await;
    let app = create_app(context.services.clone(), &[]);
    (TestServer::new(app).unwrap(), context)
}

fn user_header(user_id: &str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static(USER_ID_HEADER),
        HeaderValue::from_str(user_id).unwrap(),
    )
}

fn pet_body(name: &str) -> Value {
    json!({
        "name": name,
        "species": "Canino",
        "breed": "Mestiza",
        "birth_date": "2021-03-14",
        "weight_kg": 12.5,
        "sex": "Hembra",
        "color": "Negro"
    })
}

fn vaccine_body(vaccine: &str, expires_in: i64) -> Value {
    json!({
        "kind": "vacuna",
        "vaccine": vaccine,
        "applied_on": days_from_today(expires_in - 365),
        "expires_on": days_from_today(expires_in)
    })
}

#[tokio::test]
async fn test_health_check() {
    let (server, _context) = create_test_server().await;
    let response = server.get("/api/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["status"], "ok");
}

#[tokio::test]
async fn test_missing_user_is_unauthorized() {
    let (server, _context) = create_test_server().await;
    let response = server.get("/api/pets").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["error"], "Unauthorized");
}

#[tokio::test]
async fn test_plans_are_public() {
    let (server, _context) = create_test_server().await;
    let response = server.get("/api/plans").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let plans: Vec<MembershipTier> = response.json();
    assert_eq!(plans.len(), 3);
    assert_eq!(plans[2].limits.max_pets.to_string(), "unlimited");
}

#[tokio::test]
async fn test_pet_limit_redirects_to_upgrade() {
    let (server, _context) = create_test_server().await;
    let (name, value) = user_header(OWNER);

    let response = server
        .post("/api/pets")
        .add_header(name.clone(), value.clone())
        .json(&pet_body("Luna"))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let pet: Pet = response.json();
    assert_eq!(pet.owner_id, OWNER);

    let response = server
        .post("/api/pets")
        .add_header(name.clone(), value.clone())
        .json(&pet_body("Tom"))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["error"], "LimitReached");
    assert_eq!(body["upgrade_path"], "/planes");

    let response = server.get("/api/quota").add_header(name, value).await;
    let decision: QuotaDecision = response.json();
    assert!(!decision.allowed);
    assert_eq!(decision.current, 1);
}

#[tokio::test]
async fn test_invalid_pet_is_bad_request() {
    let (server, _context) = create_test_server().await;
    let (name, value) = user_header(OWNER);

    let mut body = pet_body("");
    body["weight_kg"] = json!(0);
    let response = server.post("/api/pets").add_header(name, value).json(&body).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "ValidationError");
}

#[tokio::test]
async fn test_pet_without_name_is_bad_request() {
    let (server, _context) = create_test_server().await;
    let (name, value) = user_header(OWNER);

    let mut body = pet_body("Luna");
    body.as_object_mut().unwrap().remove("name");
    let response = server.post("/api/pets").add_header(name, value).json(&body).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let error = response.json::<Value>();
    assert_eq!(error["error"], "ValidationError");
    assert!(error["message"].as_str().unwrap().contains("name"));
}

#[tokio::test]
async fn test_get_pet_is_scoped_to_owner() {
    let (server, _context) = create_test_server().await;
    let (name, value) = user_header(OWNER);

    let created: Pet = server
        .post("/api/pets")
        .add_header(name.clone(), value.clone())
        .json(&pet_body("Luna"))
        .await
        .json();

    let response = server
        .get(&format!("/api/pets/{}", created.id))
        .add_header(name, value)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Pet>().name, "Luna");

    let (name, value) = user_header("someone-else");
    let response = server
        .get(&format!("/api/pets/{}", created.id))
        .add_header(name, value)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_documentation_flow() {
    let (server, context) = create_test_server().await;
    let (name, value) = user_header(OWNER);
    let pet = context.add_pet("Luna", "Canino").await;
    let path = format!("/api/pets/{}/documentation", pet.id);

    let response = server
        .post(&path)
        .add_header(name.clone(), value.clone())
        .json(&vaccine_body("Antirrábica", 7))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let record: MedicalRecord = response.json();
    assert_eq!(record.treatment.identifier(), "Antirrábica");

    let duplicate = server
        .post(&path)
        .add_header(name.clone(), value.clone())
        .json(&vaccine_body("Antirrábica", 30))
        .await;
    assert_eq!(duplicate.status_code(), StatusCode::CONFLICT);
    assert_eq!(duplicate.json::<Value>()["error"], "DuplicateRecord");

    let view = server
        .get(&path)
        .add_header(name.clone(), value.clone())
        .await;
    assert_eq!(view.status_code(), StatusCode::OK);
    let view: Value = view.json();
    assert_eq!(view["records"]["vaccines"].as_array().unwrap().len(), 1);
    assert_eq!(view["notifications"]["inserted"], 1);

    let options = server
        .get(&format!("{path}/options"))
        .add_header(name.clone(), value.clone())
        .await;
    let options: Value = options.json();
    assert_eq!(
        options["vaccines"],
        json!(["Vacuna Séxtuple", "Bordetella (Tos de las perreras)"])
    );

    let feed = server
        .get("/api/notifications")
        .add_header(name.clone(), value.clone())
        .await;
    let feed: Vec<FeedItem> = feed.json();
    assert_eq!(feed.len(), 1);
    assert!(feed[0].message.contains("Falta 7"));

    let seen = server
        .post("/api/notifications/seen")
        .add_header(name.clone(), value.clone())
        .json(&json!({ "ids": [feed[0].id] }))
        .await;
    assert_eq!(seen.json::<Value>()["updated"], 1);

    let deleted = server
        .delete(&format!("/api/documentation/{}", record.id))
        .add_header(name.clone(), value.clone())
        .await;
    assert_eq!(deleted.status_code(), StatusCode::NO_CONTENT);

    let missing = server
        .delete(&format!("/api/documentation/{}", record.id))
        .add_header(name, value)
        .await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_record_endpoint() {
    let (server, context) = create_test_server().await;
    let (name, value) = user_header(OWNER);
    let pet = context.add_pet("Luna", "Canino").await;
    let record = context.add_vaccine(pet.id, "Antirrábica", 100).await;

    let mut body = vaccine_body("Antirrábica", 50);
    body["alert"] = json!("Inactivo");
    let response = server
        .put(&format!("/api/documentation/{}", record.id))
        .add_header(name, value)
        .json(&body)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let updated: MedicalRecord = response.json();
    assert_eq!(updated.expires_on, Some(days_from_today(50)));
    assert_eq!(updated.alert.to_string(), "Inactivo");
}

#[tokio::test]
async fn test_checkout_endpoints() {
    let (server, _context) = create_test_server().await;
    let (name, value) = user_header(OWNER);

    let response = server
        .post("/api/checkout")
        .add_header(name.clone(), value.clone())
        .json(&json!({ "membership_code": "premium" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let subscription: Subscription = response.json();
    assert_eq!(subscription.provider, "demo");

    let response = server
        .post(&format!("/api/checkout/{}/confirm", subscription.id))
        .add_header(name.clone(), value.clone())
        .await;
    let confirmed: Subscription = response.json();
    assert_eq!(confirmed.status.to_string(), "activa");

    let decision: QuotaDecision = server
        .get("/api/quota")
        .add_header(name, value)
        .await
        .json();
    assert_eq!(decision.tier_code, "premium");

    let unknown = server
        .post("/api/checkout")
        .add_header(user_header(OWNER).0, user_header(OWNER).1)
        .json(&json!({ "membership_code": "gold" }))
        .await;
    assert_eq!(unknown.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_vet_directory_lists_active_clinics_by_name() {
    let (server, context) = create_test_server().await;
    for (name, active) in [("Veterinaria Sur", true), ("Clínica Cerrada", false), ("Guardia Centro", true)] {
        sqlx::query("INSERT INTO vets (name, address, active) VALUES (?, 'Av. Rivadavia 5000', ?)")
            .bind(name)
            .bind(active)
            .execute(&context.db.pool)
            .await
            .unwrap();
    }

    let response = server.get("/api/vets").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let vets: Vec<Vet> = response.json();
    let names: Vec<&str> = vets.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["Guardia Centro", "Veterinaria Sur"]);
}

#[tokio::test]
async fn test_events_include_their_locations() {
    let (server, context) = create_test_server().await;
    let event_id = sqlx::query(
        "INSERT INTO events (title, requirements, free, created_at) VALUES ('Feria de adopción', '[]', TRUE, 100)",
    )
    .execute(&context.db.pool)
    .await
    .unwrap()
    .last_insert_rowid();
    sqlx::query("INSERT INTO event_locations (event_id, name, address) VALUES (?, 'Plaza Italia', NULL)")
        .bind(event_id)
        .execute(&context.db.pool)
        .await
        .unwrap();

    let response = server.get("/api/events").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let events: Vec<Event> = response.json();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].title, "Feria de adopción");
    assert_eq!(events[0].locations.len(), 1);
    assert_eq!(events[0].locations[0].name, "Plaza Italia");
    assert_eq!(events[0].locations[0].address, None);
}
