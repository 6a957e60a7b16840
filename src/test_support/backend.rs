use std::sync::{Arc, Mutex};

use crate::client::{Backend, EventData};

#[derive(Clone, Debug, PartialEq)]
pub enum RecordedCall {
    Track {
        event_name: Option<String>,
        data: Option<EventData>,
    },
    Identify {
        data: EventData,
    },
}

/// Backend double that records every forwarded call in arrival order.
#[derive(Clone, Default)]
pub struct RecordingBackend {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl RecordingBackend {
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn event_names(&self) -> Vec<Option<String>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                RecordedCall::Track { event_name, .. } => Some(event_name),
                RecordedCall::Identify { .. } => None,
            })
            .collect()
    }
}

impl Backend for RecordingBackend {
    fn track(&self, event_name: Option<&str>, data: Option<&EventData>) {
        self.calls.lock().unwrap().push(RecordedCall::Track {
            event_name: event_name.map(str::to_string),
            data: data.cloned(),
        });
    }

    fn identify(&self, data: &EventData) {
        self.calls
            .lock()
            .unwrap()
            .push(RecordedCall::Identify { data: data.clone() });
    }
}
