#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Twin model lifecycle through the public client.

mod support;

use support::TestContext;
use twin_registry::{ErrorKind, NewTwinModel, TwinModelUpdate};

#[tokio::test]
async fn create_then_get_returns_the_same_model() {
    let ctx = TestContext::new().await;
    let created = ctx
        .client
        .create_model(NewTwinModel::named("Thermostat").with_description("Room thermostat"))
        .await
        .unwrap();

    assert!(created.id.starts_with("model-"));
    assert_eq!(created.display_name, "Thermostat");
    assert_eq!(created.description.as_deref(), Some("Room thermostat"));
    assert_eq!(created.created_at, created.updated_at);

    let fetched = ctx.client.get_model(&created.id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn supplied_id_is_kept_and_duplicates_conflict() {
    let ctx = TestContext::new().await;
    let created = ctx.model("thermostat-v1").await;
    assert_eq!(created.id, "thermostat-v1");

    let err = ctx
        .client
        .create_model(NewTwinModel::named("Again").with_id("thermostat-v1"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn blank_display_name_is_rejected() {
    let ctx = TestContext::new().await;
    let err = ctx
        .client
        .create_model(NewTwinModel::named("   "))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(ctx.client.list_models().await.unwrap().is_empty());
}

#[tokio::test]
async fn list_is_ordered_by_id() {
    let ctx = TestContext::new().await;
    ctx.model("b").await;
    ctx.model("a").await;
    ctx.model("c").await;

    let ids: Vec<String> = ctx
        .client
        .list_models()
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.id)
        .collect();
    assert_eq!(ids, ["a", "b", "c"]);
}

#[tokio::test]
async fn update_replaces_fields_and_keeps_created_at() {
    let ctx = TestContext::new().await;
    let created = ctx.model("thermostat-v1").await;

    let updated = ctx
        .client
        .update_model(
            "thermostat-v1",
            TwinModelUpdate {
                id: None,
                display_name: "Smart Thermostat".to_owned(),
                description: Some("v2".to_owned()),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.display_name, "Smart Thermostat");
    assert_eq!(updated.description.as_deref(), Some("v2"));
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
async fn update_with_mismatched_body_id_is_rejected() {
    let ctx = TestContext::new().await;
    ctx.model("thermostat-v1").await;

    let err = ctx
        .client
        .update_model(
            "thermostat-v1",
            TwinModelUpdate {
                id: Some("other".to_owned()),
                display_name: "Renamed".to_owned(),
                description: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[tokio::test]
async fn update_of_unknown_model_is_not_found() {
    let ctx = TestContext::new().await;
    let err = ctx
        .client
        .update_model(
            "ghost",
            TwinModelUpdate {
                display_name: "Renamed".to_owned(),
                ..TwinModelUpdate::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn referenced_model_cannot_be_deleted() {
    let ctx = TestContext::new().await;
    ctx.model("thermostat-v1").await;
    ctx.twin("living-room", "thermostat-v1").await;

    let err = ctx.client.delete_model("thermostat-v1").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert!(ctx.client.get_model("thermostat-v1").await.is_ok());

    ctx.client.delete_twin("living-room").await.unwrap();
    ctx.client.delete_model("thermostat-v1").await.unwrap();

    let err = ctx.client.get_model("thermostat-v1").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn deleting_unknown_model_is_not_found() {
    let ctx = TestContext::new().await;
    let err = ctx.client.delete_model("ghost").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
