//! Queues tracking calls before a backend exists, then attaches one and waits for delivery.
//! The backend here just prints; in a browser the `wasm-web` feature binds to `window.entrolytics`.

use std::sync::Arc;
use std::time::Duration;

use entrolytics_sdk::client::{Backend, BackendSlot, EventData, PollSettings, Tracker};
use serde_json::json;

struct PrintBackend;

impl Backend for PrintBackend {
    fn track(&self, event_name: Option<&str>, data: Option<&EventData>) {
        println!("track: {:?} {}", event_name, json!(data));
    }

    fn identify(&self, data: &EventData) {
        println!("identify: {}", json!(data));
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let slot = BackendSlot::new();
    let tracker = Tracker::with_settings(
        Arc::new(slot.clone()),
        PollSettings {
            poll_interval: Duration::from_millis(100),
            max_attempts: None,
        },
    );

    tracker.track_page_view(Some("/pricing"), None);
    tracker.identify_user("user-42", json!({"plan": "team"}).as_object().cloned());
    tracker.track_revenue(
        "purchase",
        99.99,
        None,
        json!({"productId": "abc123"}).as_object().cloned(),
    );
    println!("queued {} call(s) while the backend is loading", tracker.pending_calls());

    // Simulate the tracking script finishing its download.
    tokio::time::sleep(Duration::from_millis(250)).await;
    slot.attach(Arc::new(PrintBackend));

    if tracker.ready().await {
        println!("all queued calls delivered");
    }

    tracker.track_outbound_link("https://example.com", None);
}
