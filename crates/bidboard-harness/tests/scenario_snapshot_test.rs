//! Snapshot of a scripted session.
//!
//! Pins the observable end state of a fixed intent script: identity
//! assignment, newest-first ordering of requests, bids and workshops, and
//! agreement between local and remote state.

use bidboard_app::{App, AppConfig, Intent, Runtime};
use bidboard_core::{Bid, BidId, Form, Request, RequestId, Viewer, Workshop};
use bidboard_harness::{InvariantRegistry, MemoryRemote, SimDriver, SystemSnapshot};

#[tokio::test]
async fn scripted_session_end_state() {
    let remote = MemoryRemote::new();
    remote.seed_request("alice", Request::new("r1").with_bids([Bid::new("b1")]));
    remote.seed_request("bob", Request::new("r2"));
    remote.seed_workshop(Workshop::new("w1"));

    let mut driver =
        SimDriver::new().with_invariants(InvariantRegistry::standard(), remote.clone());
    driver.push_intent(Intent::Login(Viewer::member("alice")));
    driver.push_intent(Intent::CreateBid { request_id: RequestId::new("r1"), form: Form::new() });
    driver.push_intent(Intent::CreateRequest(Form::new()));
    driver.push_intent(Intent::CreateWorkshop(Form::new()));
    driver.push_intent(Intent::DeleteBid {
        request_id: RequestId::new("r1"),
        bid_id: BidId::new("b1"),
    });

    let mut runtime = Runtime::new(driver, App::new(remote.clone(), AppConfig::default()));
    runtime.run().await.unwrap();

    assert!(runtime.driver().errors().is_empty());
    assert!(runtime.driver().violations().is_empty());

    let snapshot = SystemSnapshot::capture(runtime.app(), &remote);
    insta::assert_json_snapshot!(snapshot, @r#"
    {
      "viewer": "alice",
      "local_requests": [
        {
          "id": "r3",
          "bids": [],
          "fields": []
        },
        {
          "id": "r1",
          "bids": [
            "b2"
          ],
          "fields": []
        }
      ],
      "remote_requests": [
        {
          "id": "r3",
          "bids": [],
          "fields": []
        },
        {
          "id": "r1",
          "bids": [
            "b2"
          ],
          "fields": []
        }
      ],
      "local_workshops": [
        "w4",
        "w1"
      ],
      "remote_workshops": [
        "w4",
        "w1"
      ]
    }
    "#);
}
