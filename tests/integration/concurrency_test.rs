//! Integration tests for concurrent lifecycle mutations.

mod helpers;

use futures::future::join_all;

use resq_core::error::ErrorKind;
use resq_entity::request::RequestStatus;

use helpers::TestApp;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_exactly_one_concurrent_claim_wins() {
    let t = TestApp::new();
    let carla = t.citizen("Carla").await;
    let ada = t.admin("Ada").await;
    let mut volunteers = Vec::new();
    for n in 0..8 {
        volunteers.push(t.volunteer(&format!("Volunteer {n}")).await);
    }
    let request = t.submit(&carla.ctx, "medicine", "high").await;

    let results = join_all(
        volunteers
            .iter()
            .map(|v| t.app.requests.claim(&v.ctx, request.id)),
    )
    .await;

    let winners: Vec<_> = volunteers
        .iter()
        .zip(&results)
        .filter(|(_, r)| r.is_ok())
        .map(|(v, _)| v.ctx.user_id)
        .collect();
    assert_eq!(winners.len(), 1);
    for result in results.iter().filter(|r| r.is_err()) {
        assert!(result.as_ref().unwrap_err().is(ErrorKind::Conflict));
    }

    let stored = t.app.requests.get(&ada.ctx, request.id).await.unwrap();
    assert_eq!(stored.status, RequestStatus::Assigned);
    assert_eq!(stored.volunteer_id, Some(winners[0]));
    assert_eq!(stored.version, request.version + 1);

    let accepted = t.app.notifications.list(&carla.ctx).await.unwrap();
    assert_eq!(accepted.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_claim_races_delete() {
    let t = TestApp::new();
    let carla = t.citizen("Carla").await;
    let vera = t.volunteer("Vera").await;
    let ada = t.admin("Ada").await;
    let request = t.submit(&carla.ctx, "shelter", "medium").await;

    let (claim, delete) = tokio::join!(
        t.app.requests.claim(&vera.ctx, request.id),
        t.app.requests.delete(&ada.ctx, request.id),
    );
    assert!(claim.is_ok() != delete.is_ok(), "exactly one must win");

    match t.app.requests.get(&ada.ctx, request.id).await {
        Ok(stored) => {
            assert!(claim.is_ok());
            assert_eq!(stored.volunteer_id, Some(vera.ctx.user_id));
            assert!(delete.unwrap_err().is(ErrorKind::Conflict));
        }
        Err(e) => {
            assert!(e.is(ErrorKind::NotFound));
            let loser = claim.unwrap_err();
            assert!(loser.is(ErrorKind::Conflict) || loser.is(ErrorKind::NotFound));
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_urgency_updates_never_interleave() {
    let t = TestApp::new();
    let carla = t.citizen("Carla").await;
    let ada = t.admin("Ada").await;
    let bea = t.admin("Bea").await;
    let request = t.submit(&carla.ctx, "food", "low").await;

    let (a, b) = tokio::join!(
        t.app.requests.set_urgent(&ada.ctx, request.id, true),
        t.app.requests.set_urgent(&bea.ctx, request.id, false),
    );
    assert!(a.is_ok() || b.is_ok());
    for lost in [&a, &b].into_iter().filter_map(|r| r.as_ref().err()) {
        assert!(lost.is(ErrorKind::Conflict));
    }

    let stored = t.app.requests.get(&ada.ctx, request.id).await.unwrap();
    let applied = [a, b].into_iter().filter_map(Result::ok).count() as u64;
    assert_eq!(stored.version, request.version + applied);
    assert_eq!(stored.status, RequestStatus::Submitted);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_urgency_toggle_does_not_conflict_with_lifecycle_writes() {
    let t = TestApp::new();
    let carla = t.citizen("Carla").await;
    let vera = t.volunteer("Vera").await;
    let ada = t.admin("Ada").await;

    for round in 0..10 {
        let request = t.submit(&carla.ctx, "medicine", "medium").await;
        let (claim, urgent) = tokio::join!(
            t.app.requests.claim(&vera.ctx, request.id),
            t.app.requests.set_urgent(&ada.ctx, request.id, true),
        );
        assert!(claim.is_ok(), "round {round}: {claim:?}");
        assert!(urgent.is_ok(), "round {round}: {urgent:?}");

        let (complete, calm) = tokio::join!(
            t.app.requests.complete(&vera.ctx, request.id),
            t.app.requests.set_urgent(&ada.ctx, request.id, false),
        );
        assert!(complete.is_ok(), "round {round}: {complete:?}");
        assert!(calm.is_ok(), "round {round}: {calm:?}");

        let stored = t.app.requests.get(&ada.ctx, request.id).await.unwrap();
        assert_eq!(stored.status, RequestStatus::Completed);
        assert!(!stored.urgent);
        assert_eq!(stored.volunteer_id, Some(vera.ctx.user_id));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_mark_read_is_idempotent() {
    let t = TestApp::new();
    let carla = t.citizen("Carla").await;
    let vera = t.volunteer("Vera").await;
    let request = t.submit(&carla.ctx, "medicine", "high").await;
    t.app.requests.claim(&vera.ctx, request.id).await.unwrap();

    let inbox = t.app.notifications.list(&carla.ctx).await.unwrap();
    let id = inbox[0].id;
    let (first, second) = tokio::join!(
        t.app.notifications.mark_read(&carla.ctx, id),
        t.app.notifications.mark_read(&carla.ctx, id),
    );
    let (first, second) = (first.unwrap(), second.unwrap());
    assert!(first.read && second.read);
    assert_eq!(first.read_at, second.read_at);
    assert_eq!(t.app.notifications.unread_count(&carla.ctx).await.unwrap(), 0);
}
