//! Checkout flow and its effect on quotas

use petcare::models::{Limit, SubscriptionStatus};
use petcare::AppError;

use crate::common::{new_pet, TestContext, OWNER};

#[tokio::test]
async fn plans_are_listed_cheapest_first() {
    let context = TestContext::new().await;
    let plans = context.services.memberships.active_plans().await.unwrap();
    let prices: Vec<f64> = plans.iter().map(|p| p.monthly_price).collect();
    assert!(prices.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(plans[0].code, "freemium");
}

#[tokio::test]
async fn confirmed_checkout_raises_the_pet_limit() {
    let context = TestContext::new().await;
    context.add_pet("Luna", "Canino").await;
    assert!(context
        .services
        .pets
        .create_pet(OWNER, new_pet("Tom", "Felino"))
        .await
        .unwrap_err()
        .is_limit_reached());

    let pending = context
        .services
        .memberships
        .start_checkout(OWNER, "premium")
        .await
        .unwrap();
    assert_eq!(pending.status, SubscriptionStatus::Pending);

    // Pending subscriptions change nothing yet
    let decision = context.services.pets.pet_quota(OWNER).await.unwrap();
    assert_eq!(decision.limit, Limit::Finite(1));

    let active = context
        .services
        .memberships
        .confirm_checkout(OWNER, pending.id)
        .await
        .unwrap();
    assert_eq!(active.status, SubscriptionStatus::Active);

    let decision = context.services.pets.pet_quota(OWNER).await.unwrap();
    assert_eq!(decision.tier_code, "premium");
    assert_eq!(decision.limit, Limit::Finite(3));
    context
        .services
        .pets
        .create_pet(OWNER, new_pet("Tom", "Felino"))
        .await
        .unwrap();
}

#[tokio::test]
async fn checkout_of_another_user_cannot_be_confirmed() {
    let context = TestContext::new().await;
    let pending = context
        .services
        .memberships
        .start_checkout(OWNER, "plus")
        .await
        .unwrap();

    let error = context
        .services
        .memberships
        .confirm_checkout("intruder", pending.id)
        .await
        .unwrap_err();
    assert!(matches!(error, AppError::NotFound(_)));
}

#[tokio::test]
async fn interrupted_confirm_completes_on_retry() {
    let context = TestContext::new().await;
    let pending = context
        .services
        .memberships
        .start_checkout(OWNER, "premium")
        .await
        .unwrap();

    sqlx::query("ALTER TABLE users RENAME TO users_offline")
        .execute(&context.db.pool)
        .await
        .unwrap();
    let error = context
        .services
        .memberships
        .confirm_checkout(OWNER, pending.id)
        .await
        .unwrap_err();
    assert!(matches!(error, AppError::Write(_)));

    sqlx::query("ALTER TABLE users_offline RENAME TO users")
        .execute(&context.db.pool)
        .await
        .unwrap();
    let active = context
        .services
        .memberships
        .confirm_checkout(OWNER, pending.id)
        .await
        .unwrap();
    assert_eq!(active.status, SubscriptionStatus::Active);

    assert_eq!(
        context.db.user_membership_code(OWNER).await.unwrap().as_deref(),
        Some("premium")
    );
    let decision = context.services.pets.pet_quota(OWNER).await.unwrap();
    assert_eq!(decision.tier_code, "premium");
}

#[tokio::test]
async fn confirming_an_active_subscription_restores_its_plan() {
    let context = TestContext::new().await;
    let pending = context
        .services
        .memberships
        .start_checkout(OWNER, "plus")
        .await
        .unwrap();
    context
        .services
        .memberships
        .confirm_checkout(OWNER, pending.id)
        .await
        .unwrap();

    context.db.set_user_membership_code(OWNER, "freemium").await.unwrap();
    let again = context
        .services
        .memberships
        .confirm_checkout(OWNER, pending.id)
        .await
        .unwrap();
    assert_eq!(again.status, SubscriptionStatus::Active);
    assert_eq!(
        context.services.pets.pet_quota(OWNER).await.unwrap().tier_code,
        "plus"
    );
}
