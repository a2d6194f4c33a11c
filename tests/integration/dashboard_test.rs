//! Integration tests for live dashboards and the notification bell.

mod helpers;

use std::time::Duration;

use resq_core::error::ErrorKind;
use resq_entity::request::{HelpRequest, RequestStatus};

use helpers::TestApp;

const WAIT: Duration = Duration::from_secs(2);

#[tokio::test]
async fn test_citizen_feed_lists_newest_first() {
    let t = TestApp::new();
    let carla = t.citizen("Carla").await;
    let other = t.citizen("Omar").await;
    let first = t.submit(&carla.ctx, "food", "low").await;
    t.submit(&other.ctx, "rescue", "critical").await;

    let mut feed = t.app.dashboards.my_requests(&carla.ctx).await.unwrap();
    assert_eq!(feed.len(), 1);

    let second = t.submit(&carla.ctx, "medicine", "high").await;
    let items = feed
        .wait_for(WAIT, |items: &[HelpRequest]| items.len() == 2)
        .await
        .unwrap();
    let ids: Vec<_> = items.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[tokio::test]
async fn test_open_pool_drops_claimed_requests() {
    let t = TestApp::new();
    let carla = t.citizen("Carla").await;
    let vera = t.volunteer("Vera").await;
    let victor = t.volunteer("Victor").await;
    let a = t.submit(&carla.ctx, "food", "low").await;
    let b = t.submit(&carla.ctx, "shelter", "high").await;

    let mut pool = t.app.dashboards.open_requests(&victor.ctx).await.unwrap();
    let mut tasks = t.app.dashboards.assigned_requests(&vera.ctx).await.unwrap();
    assert_eq!(pool.len(), 2);
    assert!(tasks.is_empty());

    t.app.requests.claim(&vera.ctx, a.id).await.unwrap();

    let open = pool
        .wait_for(WAIT, |items: &[HelpRequest]| items.len() == 1)
        .await
        .unwrap();
    assert_eq!(open[0].id, b.id);
    let mine = tasks
        .wait_for(WAIT, |items: &[HelpRequest]| items.len() == 1)
        .await
        .unwrap();
    assert_eq!(mine[0].id, a.id);
    assert_eq!(mine[0].status, RequestStatus::Assigned);

    t.app.requests.complete(&vera.ctx, a.id).await.unwrap();
    let mine = tasks
        .wait_for(WAIT, |items: &[HelpRequest]| {
            items.first().is_some_and(|r| r.status == RequestStatus::Completed)
        })
        .await
        .unwrap();
    assert!(mine[0].completed_at.is_some());
}

#[tokio::test]
async fn test_admin_overview_counts_everything() {
    let t = TestApp::new();
    let carla = t.citizen("Carla").await;
    let vera = t.volunteer("Vera").await;
    t.volunteer("Victor").await;
    let ada = t.admin("Ada").await;

    let a = t.submit(&carla.ctx, "food", "low").await;
    let b = t.submit(&carla.ctx, "medicine", "high").await;
    t.submit(&carla.ctx, "rescue", "critical").await;
    t.app.requests.claim(&vera.ctx, a.id).await.unwrap();
    t.app.requests.claim(&vera.ctx, b.id).await.unwrap();
    t.app.requests.complete(&vera.ctx, b.id).await.unwrap();
    t.app.requests.set_urgent(&ada.ctx, a.id, true).await.unwrap();

    let overview = t
        .app
        .dashboards
        .admin_overview(&ada.ctx, Some(RequestStatus::Assigned))
        .await
        .unwrap();
    assert_eq!(overview.requests.len(), 1);
    assert_eq!(overview.requests[0].id, a.id);
    assert_eq!(overview.stats.total, 3);
    assert_eq!(overview.stats.submitted, 1);
    assert_eq!(overview.stats.assigned, 1);
    assert_eq!(overview.stats.completed, 1);
    assert_eq!(overview.stats.urgent, 1);
    let names: Vec<_> = overview
        .volunteers
        .iter()
        .map(|v| v.display_name.as_str())
        .collect();
    assert_eq!(names, vec!["Vera", "Victor"]);

    let feed = t
        .app
        .dashboards
        .all_requests(&ada.ctx, Some(RequestStatus::Completed))
        .await
        .unwrap();
    let items = feed.items().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, b.id);
}

#[tokio::test]
async fn test_views_are_role_scoped() {
    let t = TestApp::new();
    let carla = t.citizen("Carla").await;
    let vera = t.volunteer("Vera").await;

    let err = t.app.dashboards.open_requests(&carla.ctx).await.unwrap_err();
    assert!(err.is(ErrorKind::Authorization));
    let err = t
        .app
        .dashboards
        .all_requests(&vera.ctx, None)
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Authorization));
    let err = t
        .app
        .dashboards
        .admin_overview(&vera.ctx, None)
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Authorization));
}

#[tokio::test]
async fn test_notification_bell() {
    let t = TestApp::new();
    let carla = t.citizen("Carla").await;
    let vera = t.volunteer("Vera").await;
    let request = t.submit(&carla.ctx, "medicine", "high").await;

    let mut bell = t.app.notifications.subscribe(&carla.ctx).await.unwrap();
    assert!(bell.is_empty());

    t.app.requests.claim(&vera.ctx, request.id).await.unwrap();
    let items = bell.wait_for(WAIT, |items| items.len() == 1).await.unwrap();
    assert_eq!(items[0].title, "Request Accepted!");
    assert_eq!(
        items[0].message,
        "Your medicine request has been accepted by Vera"
    );
    assert_eq!(t.app.notifications.unread_count(&carla.ctx).await.unwrap(), 1);

    let read = t
        .app
        .notifications
        .mark_read(&carla.ctx, items[0].id)
        .await
        .unwrap();
    assert!(read.read);
    let again = t
        .app
        .notifications
        .mark_read(&carla.ctx, items[0].id)
        .await
        .unwrap();
    assert_eq!(again.read_at, read.read_at);

    let err = t
        .app
        .notifications
        .mark_read(&vera.ctx, items[0].id)
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Authorization));

    t.app.requests.complete(&vera.ctx, request.id).await.unwrap();
    bell.wait_for(WAIT, |items| items.len() == 2).await.unwrap();
    assert_eq!(t.app.notifications.mark_all_read(&carla.ctx).await.unwrap(), 1);
    assert_eq!(t.app.notifications.unread_count(&carla.ctx).await.unwrap(), 0);
}

#[tokio::test]
async fn test_sign_out_stops_bound_feeds() {
    let t = TestApp::new();
    let carla = t.citizen("Carla").await;

    let mut feed = t.app.dashboards.my_requests(&carla.ctx).await.unwrap();
    carla.session.bind(&feed);
    carla.session.sign_out().await.unwrap();

    let ended = tokio::time::timeout(WAIT, feed.changed()).await.unwrap();
    assert!(ended.is_none());
}
