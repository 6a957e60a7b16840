#![cfg(not(target_arch = "wasm32"))]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use entrolytics_sdk::client::{Backend, BackendSlot, EventData, PollSettings, Tracker};
use serde_json::json;

type Call = (&'static str, Option<String>, Option<EventData>);

#[derive(Clone, Default)]
struct Recorder {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl Recorder {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl Backend for Recorder {
    fn track(&self, event_name: Option<&str>, data: Option<&EventData>) {
        self.calls
            .lock()
            .unwrap()
            .push(("track", event_name.map(str::to_string), data.cloned()));
    }

    fn identify(&self, data: &EventData) {
        self.calls
            .lock()
            .unwrap()
            .push(("identify", None, Some(data.clone())));
    }
}

fn fast_tracker(slot: &BackendSlot) -> Tracker {
    Tracker::with_settings(
        Arc::new(slot.clone()),
        PollSettings {
            poll_interval: Duration::from_millis(5),
            max_attempts: None,
        },
    )
}

#[tokio::test(flavor = "current_thread")]
async fn calls_before_backend_arrive_once_and_in_order() {
    let slot = BackendSlot::new();
    let recorder = Recorder::default();
    let tracker = fast_tracker(&slot);

    tracker.track_event("first", None);
    tracker.identify_user("user-1", None);
    tracker.track_outbound_link("https://x.com", None);
    tracker.track_page_view(None, Some("https://search.example"));

    tokio::time::sleep(Duration::from_millis(25)).await;
    assert!(recorder.calls().is_empty());
    assert_eq!(tracker.pending_calls(), 4);

    slot.attach(Arc::new(recorder.clone()));
    assert!(tracker.ready().await);

    // Further ticks must not replay anything.
    tokio::time::sleep(Duration::from_millis(25)).await;

    let calls = recorder.calls();
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[0].1.as_deref(), Some("first"));
    assert_eq!(calls[1].0, "identify");
    assert_eq!(
        calls[1].2.as_ref().unwrap(),
        json!({"userId": "user-1"}).as_object().unwrap()
    );
    assert_eq!(calls[2].1.as_deref(), Some("outbound-link-click"));
    assert_eq!(calls[3].1, None);
    assert_eq!(
        calls[3].2.as_ref().unwrap(),
        json!({"referrer": "https://search.example"}).as_object().unwrap()
    );
}

#[tokio::test(flavor = "current_thread")]
async fn trackers_sharing_a_slot_poll_independently() {
    let slot = BackendSlot::new();
    let recorder = Recorder::default();
    let left = fast_tracker(&slot);
    let right = fast_tracker(&slot);

    left.track_event("left", None);
    right.track_event("right", None);
    slot.attach(Arc::new(recorder.clone()));

    assert!(left.ready().await);
    assert!(right.ready().await);
    let mut names: Vec<_> = recorder
        .calls()
        .into_iter()
        .filter_map(|(_, name, _)| name)
        .collect();
    names.sort();
    assert_eq!(names, ["left", "right"]);
}

#[test]
fn detached_tracker_is_a_silent_no_op() {
    let tracker = Tracker::detached();
    tracker.track_revenue("purchase", 1.0, None, None);
    tracker.identify(EventData::new());
    assert_eq!(tracker.pending_calls(), 0);
}
