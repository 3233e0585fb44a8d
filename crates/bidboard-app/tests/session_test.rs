//! Session lifecycle tests against the in-memory remote.
//!
//! Each test establishes a real [`Session`] over a [`MemoryRemote`] and checks
//! the remote-confirm, reconcile, navigate sequence of one operation, or the
//! outcome of two operations racing on the same request.

use std::pin::pin;

use bidboard_app::{AppAction, AppError, REFRESH_ATTEMPTS, Session};
use bidboard_core::{
    Bid, BidId, EntityKind, FieldValue, Form, Profile, Remote, RemoteError, Request, RequestId,
    Route, Update, Venue, Viewer,
};
use bidboard_harness::MemoryRemote;
use futures::poll;

fn seeded_remote() -> MemoryRemote {
    let remote = MemoryRemote::new();
    remote.seed_request(
        "alice",
        Request::new("r1").with_field("title", "Band for wedding").with_bids([Bid::new("b1")]),
    );
    remote.seed_request("bob", Request::new("r2").with_field("title", "DJ for gala"));
    remote.seed_profile(Profile::new("p1").with_field("name", "Quartet"));
    remote.seed_venue(Venue::new("v1").with_field("name", "Hall"));
    remote
}

async fn alice(remote: &MemoryRemote) -> Session<MemoryRemote> {
    Session::establish(remote.clone(), Viewer::member("alice")).await.unwrap()
}

fn request_ids(session: &Session<MemoryRemote>) -> Vec<String> {
    session.requests().iter().map(|request| request.id.to_string()).collect()
}

fn bid_ids(session: &Session<MemoryRemote>, request: &str) -> Vec<String> {
    let request = session.request(&RequestId::new(request)).unwrap();
    request.bids.iter().map(|bid| bid.id.to_string()).collect()
}

fn settled() -> Vec<AppAction> {
    vec![AppAction::Navigate(Route::Requests), AppAction::Render]
}

#[tokio::test]
async fn member_sees_only_own_requests() {
    let remote = seeded_remote();

    let session = alice(&remote).await;

    assert_eq!(request_ids(&session), ["r1"]);
    assert_eq!(session.profiles().len(), 1);
    assert_eq!(session.venues().len(), 1);
}

#[tokio::test]
async fn admin_sees_every_request() {
    let remote = seeded_remote();

    let session = Session::establish(remote.clone(), Viewer::admin("root")).await.unwrap();

    assert_eq!(request_ids(&session), ["r2", "r1"]);
}

#[tokio::test]
async fn failed_fetch_fails_the_session() {
    let remote = seeded_remote();
    remote.fail_next(RemoteError::Unauthorized);

    let result = Session::establish(remote.clone(), Viewer::member("alice")).await;

    assert!(matches!(result, Err(AppError::Remote(RemoteError::Unauthorized))));
}

#[tokio::test]
async fn created_request_becomes_first() {
    let remote = seeded_remote();
    let session = alice(&remote).await;

    let actions =
        session.create_request(Form::new().with("title", "Caterer for 40")).await.unwrap();

    assert_eq!(actions, settled());
    let requests = session.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests.as_slice()[0].field("title"), Some(&FieldValue::from("Caterer for 40")));
    assert_eq!(requests.as_slice()[1].id, RequestId::new("r1"));
}

#[tokio::test]
async fn updated_request_is_replaced_in_place() {
    let remote = seeded_remote();
    let session = alice(&remote).await;
    session.create_request(Form::new()).await.unwrap();

    let actions = session
        .update_request(Update::new("r1", Form::new().with("title", "Trio for wedding")))
        .await
        .unwrap();

    assert_eq!(actions, settled());
    let requests = session.requests();
    assert_eq!(requests.as_slice()[1].id, RequestId::new("r1"));
    assert_eq!(requests.as_slice()[1].field("title"), Some(&FieldValue::from("Trio for wedding")));
    assert_eq!(bid_ids(&session, "r1"), ["b1"]);
}

#[tokio::test]
async fn deleted_request_is_dropped() {
    let remote = seeded_remote();
    let session = alice(&remote).await;

    let actions = session.delete_request(&RequestId::new("r1")).await.unwrap();

    assert_eq!(actions, settled());
    assert!(session.requests().is_empty());
    assert!(remote.request(&RequestId::new("r1")).is_none());
}

#[tokio::test]
async fn created_bid_becomes_newest() {
    let remote = seeded_remote();
    let session = alice(&remote).await;

    let actions = session
        .create_bid(&RequestId::new("r1"), Form::new().with("amount", 1200u64))
        .await
        .unwrap();

    assert_eq!(actions, settled());
    let bids = bid_ids(&session, "r1");
    assert_eq!(bids.len(), 2);
    assert_eq!(bids[1], "b1");
    assert_eq!(request_ids(&session), ["r1"]);
}

#[tokio::test]
async fn deleted_bid_is_dropped_from_its_request() {
    let remote = seeded_remote();
    let session = alice(&remote).await;

    let actions = session.delete_bid(&RequestId::new("r1"), &BidId::new("b1")).await.unwrap();

    assert_eq!(actions, settled());
    assert!(bid_ids(&session, "r1").is_empty());
}

#[tokio::test]
async fn bid_on_untracked_request_issues_no_remote_call() {
    let remote = seeded_remote();
    let session = alice(&remote).await;
    let calls = remote.call_count();

    let create = session.create_bid(&RequestId::new("r2"), Form::new()).await;
    let delete = session.delete_bid(&RequestId::new("r2"), &BidId::new("b1")).await;

    assert_eq!(create, Err(AppError::UnknownRequest(RequestId::new("r2"))));
    assert_eq!(delete, Err(AppError::UnknownRequest(RequestId::new("r2"))));
    assert_eq!(remote.call_count(), calls);
}

#[tokio::test]
async fn remote_failure_leaves_local_state_untouched() {
    let remote = seeded_remote();
    let session = alice(&remote).await;
    let before = session.requests();
    remote.fail_next(RemoteError::Transport("connection reset".into()));

    let result = session.create_bid(&RequestId::new("r1"), Form::new()).await;

    assert!(result.unwrap_err().is_transient());
    assert_eq!(session.requests(), before);
}

#[tokio::test]
async fn update_of_untracked_request_reports_drift() {
    let remote = seeded_remote();
    let session = alice(&remote).await;
    // Created from another device after the session was established
    let foreign = remote.create_request(&"alice".into(), Form::new()).await.unwrap();

    let actions =
        session.update_request(Update::new(foreign.id.clone(), Form::new())).await.unwrap();

    assert_eq!(actions[0], AppAction::Drift {
        kind: EntityKind::Request,
        id: foreign.id.to_string()
    });
    assert_eq!(&actions[1..], settled().as_slice());
    assert_eq!(request_ids(&session), ["r1"]);
}

#[tokio::test]
async fn withdrawing_unseen_bid_reports_bid_drift() {
    let remote = seeded_remote();
    let session = alice(&remote).await;
    let unseen = remote.create_bid(&RequestId::new("r1"), Form::new()).await.unwrap();
    let requests = session.subscribe_requests();

    let actions = session.delete_bid(&RequestId::new("r1"), &unseen.id).await.unwrap();

    assert_eq!(actions[0], AppAction::Drift { kind: EntityKind::Bid, id: unseen.id.to_string() });
    assert_eq!(bid_ids(&session, "r1"), ["b1"]);
    assert!(!requests.has_changed().unwrap());
}

#[tokio::test]
async fn profile_update_shows_the_profile() {
    let remote = seeded_remote();
    let session = alice(&remote).await;

    let actions = session
        .update_profile(Update::new("p1", Form::new().with("name", "Quintet")))
        .await
        .unwrap();

    assert_eq!(actions, vec![AppAction::Navigate(Route::Profile("p1".into())), AppAction::Render]);
    assert_eq!(
        session.profiles().as_slice()[0].field("name"),
        Some(&FieldValue::from("Quintet"))
    );
    assert_eq!(session.venues().as_slice()[0].field("name"), Some(&FieldValue::from("Hall")));
}

#[tokio::test]
async fn venue_update_shows_the_venue_list() {
    let remote = seeded_remote();
    let session = alice(&remote).await;

    let actions = session
        .update_venue(Update::new("v1", Form::new().with("name", "Annex")))
        .await
        .unwrap();

    assert_eq!(actions, vec![AppAction::Navigate(Route::Venues), AppAction::Render]);
    assert_eq!(session.venues().as_slice()[0].field("name"), Some(&FieldValue::from("Annex")));
    assert_eq!(session.profiles().as_slice()[0].field("name"), Some(&FieldValue::from("Quartet")));
}

#[tokio::test]
async fn subscribers_see_confirmed_changes() {
    let remote = seeded_remote();
    let session = alice(&remote).await;
    let mut requests = session.subscribe_requests();

    session.create_request(Form::new()).await.unwrap();

    assert!(requests.has_changed().unwrap());
    assert_eq!(requests.borrow_and_update().len(), 2);
}

#[tokio::test]
async fn refresh_picks_up_remote_changes() {
    let remote = seeded_remote();
    let session = alice(&remote).await;
    remote.create_request(&"alice".into(), Form::new()).await.unwrap();

    let actions = session.refresh().await.unwrap();

    assert_eq!(actions, vec![AppAction::Render]);
    assert_eq!(session.requests().len(), 2);
}

#[tokio::test]
async fn refresh_keeps_bid_merged_while_fetching() {
    let remote = seeded_remote();
    let session = Session::establish(remote.clone().with_latency(3), Viewer::member("alice"))
        .await
        .unwrap();
    let r1 = RequestId::new("r1");
    let fetched = remote.call_count() + 3;

    let mut refresh = pin!(session.refresh());
    while remote.call_count() < fetched {
        assert!(poll!(refresh.as_mut()).is_pending());
    }

    // The fetch has read the remote; the bid lands before it resolves
    session.create_bid(&r1, Form::new()).await.unwrap();
    assert_eq!(bid_ids(&session, "r1").len(), 2);
    let actions = refresh.await.unwrap();

    assert_eq!(actions, vec![AppAction::Render]);
    assert_eq!(bid_ids(&session, "r1").len(), 2);
    assert_eq!(session.request(&r1), remote.request(&r1));
}

#[tokio::test]
async fn refresh_outpaced_by_merges_reports_drift() {
    let remote = seeded_remote();
    let session = Session::establish(remote.clone().with_latency(3), Viewer::member("alice"))
        .await
        .unwrap();
    let r1 = RequestId::new("r1");

    let mut refresh = pin!(session.refresh());
    for _ in 0..REFRESH_ATTEMPTS {
        let fetched = remote.call_count() + 3;
        while remote.call_count() < fetched {
            assert!(poll!(refresh.as_mut()).is_pending());
        }
        session.create_bid(&r1, Form::new()).await.unwrap();
    }
    let actions = refresh.await.unwrap();

    assert_eq!(
        actions,
        vec![AppAction::Drift { kind: EntityKind::Request, id: "alice".into() }, AppAction::Render]
    );
    assert_eq!(bid_ids(&session, "r1").len(), 1 + REFRESH_ATTEMPTS);
    assert_eq!(session.request(&r1), remote.request(&r1));
}

#[tokio::test]
async fn concurrent_bid_and_update_keep_both_effects() {
    let remote = seeded_remote();
    let session = Session::establish(remote.clone().with_latency(2), Viewer::member("alice"))
        .await
        .unwrap();
    let r1 = RequestId::new("r1");

    let (updated, bid) = tokio::join!(
        session.update_request(Update::new("r1", Form::new().with("title", "Trio"))),
        session.create_bid(&r1, Form::new().with("amount", 900u64)),
    );

    updated.unwrap();
    bid.unwrap();
    let request = session.request(&r1).unwrap();
    assert_eq!(request.field("title"), Some(&FieldValue::from("Trio")));
    assert_eq!(request.bids.len(), 2);
    assert_eq!(Some(request), remote.request(&r1));
}

#[tokio::test]
async fn bid_merges_into_request_as_of_merge_time() {
    let remote = seeded_remote();
    let session = Session::establish(remote.clone().with_latency(2), Viewer::member("alice"))
        .await
        .unwrap();
    let r1 = RequestId::new("r1");

    let mut bid = pin!(session.create_bid(&r1, Form::new().with("amount", 900u64)));
    while remote.request(&r1).is_some_and(|request| request.bids.len() == 1) {
        assert!(poll!(bid.as_mut()).is_pending());
    }

    // Bid is confirmed remotely but not merged yet; the update completes first
    session.update_request(Update::new("r1", Form::new().with("title", "Trio"))).await.unwrap();
    bid.await.unwrap();

    let request = session.request(&r1).unwrap();
    assert_eq!(request.field("title"), Some(&FieldValue::from("Trio")));
    assert_eq!(request.bids.len(), 2);
}

#[tokio::test]
async fn bid_for_request_deleted_in_flight_reports_drift() {
    let remote = seeded_remote();
    let session = Session::establish(remote.clone().with_latency(2), Viewer::member("alice"))
        .await
        .unwrap();
    let r1 = RequestId::new("r1");

    let mut bid = pin!(session.create_bid(&r1, Form::new()));
    while remote.request(&r1).is_some_and(|request| request.bids.len() == 1) {
        assert!(poll!(bid.as_mut()).is_pending());
    }

    session.delete_request(&r1).await.unwrap();
    let actions = bid.await.unwrap();

    assert_eq!(actions[0], AppAction::Drift { kind: EntityKind::Request, id: "r1".into() });
    assert_eq!(&actions[1..], settled().as_slice());
    assert!(session.request(&r1).is_none());
}
