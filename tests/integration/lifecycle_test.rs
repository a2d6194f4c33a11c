//! Integration tests for the help request lifecycle.

mod helpers;

use std::sync::Arc;

use resq_core::error::ErrorKind;
use resq_core::traits::DocumentStore;
use resq_entity::notification::NotificationType;
use resq_entity::request::{RequestPriority, RequestStatus, RequestType};
use resq_store::{MemoryDocumentStore, NOTIFICATIONS};

use helpers::{FailingCollection, TestApp, test_config};

#[tokio::test]
async fn test_medicine_request_end_to_end() {
    let t = TestApp::new();
    let carla = t.citizen("Carla").await;
    let vera = t.volunteer("Vera").await;
    let victor = t.volunteer("Victor").await;
    let ada = t.admin("Ada").await;

    let request = t.submit(&carla.ctx, "medicine", "high").await;
    assert_eq!(request.status, RequestStatus::Submitted);
    assert_eq!(request.request_type, RequestType::Medicine);
    assert_eq!(request.priority, RequestPriority::High);
    assert_eq!(request.location, "12 Elm St");
    assert_eq!(request.volunteer_id, None);
    assert!(!request.urgent);

    let claimed = t.app.requests.claim(&vera.ctx, request.id).await.unwrap();
    assert_eq!(claimed.status, RequestStatus::Assigned);
    assert_eq!(claimed.volunteer_id, Some(vera.ctx.user_id));
    assert!(claimed.assigned_at.unwrap() >= claimed.created_at);

    let err = t
        .app
        .requests
        .claim(&victor.ctx, request.id)
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Conflict));
    assert_eq!(
        err.user_message(),
        "This request is no longer available. Please refresh and try again."
    );
    let unchanged = t.app.requests.get(&ada.ctx, request.id).await.unwrap();
    assert_eq!(unchanged, claimed);

    let completed = t.app.requests.complete(&vera.ctx, request.id).await.unwrap();
    assert_eq!(completed.status, RequestStatus::Completed);
    assert!(completed.completed_at.unwrap() >= completed.assigned_at.unwrap());

    let err = t.app.requests.delete(&ada.ctx, request.id).await.unwrap_err();
    assert!(err.is(ErrorKind::Conflict));
    let persisted = t.app.requests.get(&ada.ctx, request.id).await.unwrap();
    assert_eq!(persisted.status, RequestStatus::Completed);
    assert_eq!(persisted.invariant_violation(), None);

    let inbox = t.app.notifications.list(&carla.ctx).await.unwrap();
    let kinds: Vec<_> = inbox.iter().map(|n| n.notification_type).collect();
    assert!(kinds.contains(&NotificationType::RequestAccepted));
    assert!(kinds.contains(&NotificationType::RequestCompleted));
    assert!(inbox.iter().all(|n| n.request_id == Some(request.id)));
}

#[tokio::test]
async fn test_set_urgent_leaves_status_and_priority() {
    let t = TestApp::new();
    let carla = t.citizen("Carla").await;
    let ada = t.admin("Ada").await;
    let request = t.submit(&carla.ctx, "food", "low").await;

    let flagged = t
        .app
        .requests
        .set_urgent(&ada.ctx, request.id, true)
        .await
        .unwrap();
    assert!(flagged.urgent);
    assert_eq!(flagged.status, RequestStatus::Submitted);
    assert_eq!(flagged.priority, RequestPriority::Low);

    let cleared = t
        .app
        .requests
        .set_urgent(&ada.ctx, request.id, false)
        .await
        .unwrap();
    assert!(!cleared.urgent);
    assert!(cleared.priority_updated_at.unwrap() > flagged.priority_updated_at.unwrap());
}

#[tokio::test]
async fn test_completion_rights() {
    let t = TestApp::new();
    let carla = t.citizen("Carla").await;
    let vera = t.volunteer("Vera").await;
    let victor = t.volunteer("Victor").await;
    let ada = t.admin("Ada").await;
    let request = t.submit(&carla.ctx, "rescue", "critical").await;

    let err = t
        .app
        .requests
        .complete(&vera.ctx, request.id)
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Conflict), "Submitted cannot be completed");

    t.app.requests.claim(&vera.ctx, request.id).await.unwrap();

    let err = t
        .app
        .requests
        .complete(&victor.ctx, request.id)
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Authorization));
    let err = t
        .app
        .requests
        .complete(&carla.ctx, request.id)
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Authorization));

    let done = t.app.requests.complete(&ada.ctx, request.id).await.unwrap();
    assert_eq!(done.status, RequestStatus::Completed);
    assert_eq!(done.volunteer_id, Some(vera.ctx.user_id));
}

#[tokio::test]
async fn test_role_boundaries() {
    let t = TestApp::new();
    let carla = t.citizen("Carla").await;
    let vera = t.volunteer("Vera").await;
    let request = t.submit(&carla.ctx, "shelter", "medium").await;

    let err = t
        .app
        .requests
        .create(&vera.ctx, helpers::request_form("food", "low"))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Authorization));

    let err = t.app.requests.claim(&carla.ctx, request.id).await.unwrap_err();
    assert!(err.is(ErrorKind::Authorization));

    let err = t
        .app
        .requests
        .set_urgent(&vera.ctx, request.id, true)
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Authorization));

    let err = t.app.requests.delete(&carla.ctx, request.id).await.unwrap_err();
    assert!(err.is(ErrorKind::Authorization));
}

#[tokio::test]
async fn test_form_validation() {
    let t = TestApp::new();
    let carla = t.citizen("Carla").await;

    let mut form = helpers::request_form("medicine", "high");
    form.description = "   ".to_string();
    let err = t.app.requests.create(&carla.ctx, form).await.unwrap_err();
    assert!(err.is(ErrorKind::Validation));

    let err = t
        .app
        .requests
        .create(&carla.ctx, helpers::request_form("teleport", "high"))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Validation));

    let medium = t
        .app
        .requests
        .create(&carla.ctx, helpers::request_form("transport", ""))
        .await
        .unwrap();
    assert_eq!(medium.priority, RequestPriority::Medium);
}

#[tokio::test]
async fn test_delete_unclaimed_request() {
    let t = TestApp::new();
    let carla = t.citizen("Carla").await;
    let ada = t.admin("Ada").await;
    let request = t.submit(&carla.ctx, "other", "low").await;

    t.app.requests.delete(&ada.ctx, request.id).await.unwrap();

    let err = t.app.requests.get(&ada.ctx, request.id).await.unwrap_err();
    assert!(err.is(ErrorKind::NotFound));

    let inbox = t.app.notifications.list(&carla.ctx).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].notification_type, NotificationType::RequestDeleted);
    assert_eq!(inbox[0].title, "Request Removed");
}

#[tokio::test]
async fn test_reassign_notifies_both_volunteers() {
    let t = TestApp::new();
    let carla = t.citizen("Carla").await;
    let vera = t.volunteer("Vera").await;
    let victor = t.volunteer("Victor").await;
    let ada = t.admin("Ada").await;
    let request = t.submit(&carla.ctx, "food", "medium").await;
    t.app.requests.claim(&vera.ctx, request.id).await.unwrap();

    let moved = t
        .app
        .requests
        .reassign(&ada.ctx, request.id, victor.ctx.user_id)
        .await
        .unwrap();
    assert_eq!(moved.volunteer_id, Some(victor.ctx.user_id));
    assert_eq!(moved.assigned_by, Some(ada.ctx.user_id));
    assert_eq!(moved.status, RequestStatus::Assigned);

    let vera_inbox = t.app.notifications.list(&vera.ctx).await.unwrap();
    assert_eq!(vera_inbox.len(), 1);
    assert_eq!(
        vera_inbox[0].notification_type,
        NotificationType::AssignmentRevoked
    );
    let victor_inbox = t.app.notifications.list(&victor.ctx).await.unwrap();
    assert_eq!(victor_inbox.len(), 1);
    assert_eq!(
        victor_inbox[0].notification_type,
        NotificationType::RequestAssigned
    );

    let err = t
        .app
        .requests
        .complete(&vera.ctx, request.id)
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Authorization));

    t.app.requests.complete(&victor.ctx, request.id).await.unwrap();
    let err = t
        .app
        .requests
        .reassign(&ada.ctx, request.id, vera.ctx.user_id)
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Conflict));
}

#[tokio::test]
async fn test_reassign_requires_a_volunteer() {
    let t = TestApp::new();
    let carla = t.citizen("Carla").await;
    let ada = t.admin("Ada").await;
    let request = t.submit(&carla.ctx, "food", "medium").await;

    let err = t
        .app
        .requests
        .reassign(&ada.ctx, request.id, carla.ctx.user_id)
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Validation));
}

#[tokio::test]
async fn test_notification_outage_does_not_block_transitions() {
    let config = test_config();
    let store = Arc::new(MemoryDocumentStore::new(&config.store));
    let backend: Arc<dyn DocumentStore> =
        Arc::new(FailingCollection::new(Arc::clone(&store), NOTIFICATIONS));
    let t = TestApp::with_store(config, backend, store);

    let carla = t.citizen("Carla").await;
    let vera = t.volunteer("Vera").await;
    let request = t.submit(&carla.ctx, "medicine", "high").await;

    let claimed = t.app.requests.claim(&vera.ctx, request.id).await.unwrap();
    assert_eq!(claimed.status, RequestStatus::Assigned);
    let done = t.app.requests.complete(&vera.ctx, request.id).await.unwrap();
    assert_eq!(done.status, RequestStatus::Completed);

    assert!(t.app.notifications.list(&carla.ctx).await.unwrap().is_empty());
}
