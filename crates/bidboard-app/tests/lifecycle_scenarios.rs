//! End-to-end lifecycle scenarios with fixed remote responses.
//!
//! Each scenario starts from a known remote state, runs one operation and
//! pins the exact local collection it must produce.

use bidboard_app::{AppAction, Session};
use bidboard_core::{Bid, BidId, FieldValue, Form, RemoteError, Request, RequestId, Route, Viewer};
use bidboard_harness::MemoryRemote;

async fn alice(remote: &MemoryRemote) -> Session<MemoryRemote> {
    Session::establish(remote.clone(), Viewer::member("alice")).await.unwrap()
}

#[tokio::test]
async fn create_request_into_empty_collection() {
    let remote = MemoryRemote::new();
    let session = alice(&remote).await;

    let actions =
        session.create_request(Form::new().with("title", "Birthday Party")).await.unwrap();

    assert_eq!(actions, [AppAction::Navigate(Route::Requests), AppAction::Render]);
    let requests = session.requests().into_vec();
    assert_eq!(requests, [Request::new("r1").with_field("title", "Birthday Party")]);
    assert!(requests[0].bids.is_empty());
}

#[tokio::test]
async fn create_bid_on_request_without_bids() {
    let remote = MemoryRemote::new();
    remote.seed_request("alice", Request::new("r1"));
    let session = alice(&remote).await;

    session
        .create_bid(&RequestId::new("r1"), Form::new().with("amount", 100u64))
        .await
        .unwrap();

    let request = session.request(&RequestId::new("r1")).unwrap();
    assert_eq!(request.bids, [Bid::new("b1").with_field("amount", 100u64)]);
    assert_eq!(request.bids[0].field("amount"), Some(&FieldValue::from(100u64)));
}

#[tokio::test]
async fn delete_first_of_two_bids() {
    let remote = MemoryRemote::new();
    remote.seed_request("alice", Request::new("r1").with_bids([Bid::new("b1"), Bid::new("b2")]));
    let session = alice(&remote).await;

    session.delete_bid(&RequestId::new("r1"), &BidId::new("b1")).await.unwrap();

    let request = session.request(&RequestId::new("r1")).unwrap();
    assert_eq!(request.bids, [Bid::new("b2")]);
}

#[tokio::test]
async fn rejected_create_changes_nothing() {
    let remote = MemoryRemote::new();
    remote.seed_request("alice", Request::new("r1"));
    let session = alice(&remote).await;
    let before = session.requests();
    remote.fail_next(RemoteError::Rejected("title is required".into()));

    let result = session.create_request(Form::new()).await;

    assert!(matches!(result, Err(err) if !err.is_transient()));
    assert_eq!(session.requests(), before);
    assert_eq!(remote.requests().len(), 1);
}
