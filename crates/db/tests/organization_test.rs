//! Integration tests for signup provisioning and subscription updates.

mod common;

use balanco_db::OrganizationRepository;
use balanco_db::entities::sea_orm_active_enums::SubscriptionStatus;
use uuid::Uuid;

#[tokio::test]
#[ignore = "requires database"]
async fn test_provision_creates_org_and_profile() {
    let db = common::connect().await;
    let repo = OrganizationRepository::new(db.clone());
    let user_id = common::create_auth_user(&db).await;

    let provisioned = repo
        .provision_for_user(user_id, Some("  Ana Souza "))
        .await
        .unwrap();
    assert!(provisioned.created);

    let (profile, org) = repo.context_for_user(user_id).await.unwrap();
    assert_eq!(profile.organization_id, provisioned.organization_id);
    assert_eq!(profile.full_name.as_deref(), Some("Ana Souza"));
    assert_eq!(org.name, "Organização de Ana Souza");
    assert_eq!(org.subscription_status, SubscriptionStatus::Trialing);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_provision_is_idempotent() {
    let db = common::connect().await;
    let repo = OrganizationRepository::new(db.clone());
    let user_id = common::create_auth_user(&db).await;

    let first = repo.provision_for_user(user_id, None).await.unwrap();
    let second = repo.provision_for_user(user_id, Some("Outro")).await.unwrap();

    assert!(first.created);
    assert!(!second.created);
    assert_eq!(first.organization_id, second.organization_id);

    let (_, org) = repo.context_for_user(user_id).await.unwrap();
    assert_eq!(org.name, "Organização de Novo Usuário");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_context_for_unknown_user() {
    let db = common::connect().await;
    let repo = OrganizationRepository::new(db);

    let err = repo.context_for_user(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, balanco_db::RepositoryError::NotFound(_)));
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_update_subscription() {
    let db = common::connect().await;
    let repo = OrganizationRepository::new(db.clone());
    let (_, org_id) = common::create_tenant(&db).await;

    let updated = repo
        .update_subscription(org_id, SubscriptionStatus::Active, "preapproval-123")
        .await
        .unwrap();
    assert!(updated);

    let org = repo.find_by_id(org_id).await.unwrap().unwrap();
    assert!(org.has_active_subscription());
    assert_eq!(org.subscription_id.as_deref(), Some("preapproval-123"));

    let missing = repo
        .update_subscription(Uuid::new_v4(), SubscriptionStatus::Active, "x")
        .await
        .unwrap();
    assert!(!missing);
}
