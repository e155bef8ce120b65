//! Documentation service: duplicate guard, edits, options and loading

use petcare::models::{AlertStatus, RecordKind, Treatment};
use petcare::AppError;

use crate::common::{topical_draft, vaccine_draft, TestContext, OWNER};

#[tokio::test]
async fn duplicate_vaccine_is_rejected_for_same_pet_only() {
    let context = TestContext::with_plan("premium").await;
    let luna = context.add_pet("Luna", "Canino").await;
    let tom = context.add_pet("Tom", "Canino").await;
    context.add_vaccine(luna.id, "Antirrábica", 200).await;

    let error = context
        .services
        .documentation
        .create_record(OWNER, luna.id, vaccine_draft("Antirrábica", 30))
        .await
        .unwrap_err();
    assert!(matches!(error, AppError::Duplicate(_)));
    assert!(!error.is_server_error());

    context
        .services
        .documentation
        .create_record(OWNER, tom.id, vaccine_draft("Antirrábica", 30))
        .await
        .unwrap();
}

#[tokio::test]
async fn same_identifier_of_another_kind_is_allowed() {
    let context = TestContext::with_plan("premium").await;
    let luna = context.add_pet("Luna", "Canino").await;
    context.add_vaccine(luna.id, "Bravecto", 200).await;

    let record = context
        .services
        .documentation
        .create_record(OWNER, luna.id, topical_draft("Bravecto", 90))
        .await
        .unwrap();
    assert_eq!(record.kind(), RecordKind::Topical);
}

#[tokio::test]
async fn records_of_other_owners_are_not_found() {
    let context = TestContext::new().await;
    let luna = context.add_pet("Luna", "Canino").await;

    let error = context
        .services
        .documentation
        .create_record("intruder", luna.id, vaccine_draft("Antirrábica", 30))
        .await
        .unwrap_err();
    assert!(matches!(error, AppError::NotFound(_)));

    let error = context
        .services
        .documentation
        .load_for_pet("intruder", luna.id)
        .await
        .unwrap_err();
    assert!(matches!(error, AppError::NotFound(_)));
}

#[tokio::test]
async fn update_keeps_identity_and_guards_duplicates() {
    let context = TestContext::with_plan("premium").await;
    let luna = context.add_pet("Luna", "Canino").await;
    let rabies = context.add_vaccine(luna.id, "Antirrábica", 200).await;
    context.add_vaccine(luna.id, "Vacuna Séxtuple", 200).await;

    // Same identifier on the record itself is fine: only dates change
    let mut draft = vaccine_draft("Antirrábica", 20);
    draft.alert = Some(AlertStatus::Inactive);
    let updated = context
        .services
        .documentation
        .update_record(OWNER, rabies.id, draft)
        .await
        .unwrap();
    assert_eq!(updated.id, rabies.id);
    assert_eq!(updated.pet_id, luna.id);
    assert_eq!(updated.alert, AlertStatus::Inactive);

    let error = context
        .services
        .documentation
        .update_record(OWNER, rabies.id, vaccine_draft("Vacuna Séxtuple", 20))
        .await
        .unwrap_err();
    assert!(matches!(error, AppError::Duplicate(_)));

    let stored = context.db.record(OWNER, rabies.id).await.unwrap().unwrap();
    assert_eq!(
        stored.treatment,
        Treatment::Vaccine {
            vaccine: "Antirrábica".to_string()
        }
    );
}

#[tokio::test]
async fn delete_frees_a_slot() {
    let context = TestContext::new().await;
    let luna = context.add_pet("Luna", "Canino").await;
    let first = context.add_vaccine(luna.id, "Antirrábica", 200).await;
    context.add_vaccine(luna.id, "Vacuna Séxtuple", 200).await;
    context.add_vaccine(luna.id, "Bordetella (Tos de las perreras)", 200).await;

    let blocked = context
        .services
        .documentation
        .create_record(OWNER, luna.id, topical_draft("Frontline", 30))
        .await
        .unwrap_err();
    assert!(blocked.is_limit_reached());

    context
        .services
        .documentation
        .delete_record(OWNER, first.id)
        .await
        .unwrap();
    assert!(matches!(
        context.services.documentation.delete_record(OWNER, first.id).await,
        Err(AppError::NotFound(_))
    ));

    context
        .services
        .documentation
        .create_record(OWNER, luna.id, topical_draft("Frontline", 30))
        .await
        .unwrap();
}

#[tokio::test]
async fn options_follow_species_and_existing_records() {
    let context = TestContext::with_plan("premium").await;
    let michi = context.add_pet("Michi", "Felino").await;
    context.add_vaccine(michi.id, "Triple Felina", 200).await;
    context
        .services
        .documentation
        .create_record(OWNER, michi.id, topical_draft("Revolution", 30))
        .await
        .unwrap();

    let options = context
        .services
        .documentation
        .vaccine_options(OWNER, michi.id)
        .await
        .unwrap();
    assert_eq!(options.vaccines, vec!["Leucemia Felina (FeLV)", "Antirrábica"]);
    assert!(!options.vaccine_locked);
    assert!(options.topical_locked);
    assert!(!options.deworming_locked);
}

#[tokio::test]
async fn load_groups_records_and_reports_quota() {
    let context = TestContext::with_plan("premium").await;
    let luna = context.add_pet("Luna", "Canino").await;
    context.add_vaccine(luna.id, "Antirrábica", 200).await;
    context
        .services
        .documentation
        .create_record(OWNER, luna.id, topical_draft("Frontline", 30))
        .await
        .unwrap();

    let view = context
        .services
        .documentation
        .load_for_pet(OWNER, luna.id)
        .await
        .unwrap();
    assert_eq!(view.pet.id, luna.id);
    assert_eq!(view.records.vaccines.len(), 1);
    assert_eq!(view.records.topicals.len(), 1);
    assert!(view.records.dewormings.is_empty());
    assert_eq!(view.quota.current, 2);
    assert_eq!(view.quota.remaining(), Some(6));
    assert_eq!(view.notifications.planned, 0);
}
