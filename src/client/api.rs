use std::fmt;
use std::sync::{Arc, LazyLock};

use serde_json::Value;

use crate::client::backend::{merge_payload, payload_entry, BackendProvider, EventData};
use crate::client::constants::{DEFAULT_CURRENCY, OUTBOUND_LINK_EVENT};
use crate::client::dispatcher::{CallKind, Dispatcher, PollSettings};
use crate::platform::environment;

/// Client-side tracking handle.
///
/// Every method returns immediately and never fails. Calls made before the analytics backend is
/// loaded are queued and forwarded, in order, once it appears. A detached tracker (no global scope,
/// e.g. during server-side rendering) ignores every call.
#[derive(Clone)]
pub struct Tracker {
    dispatcher: Option<Dispatcher>,
}

impl fmt::Debug for Tracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracker")
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}

impl Tracker {
    pub fn new(provider: Arc<dyn BackendProvider>) -> Self {
        Self::with_settings(provider, PollSettings::default())
    }

    pub fn with_settings(provider: Arc<dyn BackendProvider>, settings: PollSettings) -> Self {
        Self {
            dispatcher: Some(Dispatcher::new(provider, settings)),
        }
    }

    pub fn detached() -> Self {
        Self { dispatcher: None }
    }

    /// Builds a tracker for the current runtime: bound to `window.entrolytics` in a browser,
    /// bound to [`BackendSlot::shared`] when the environment is forced to `browser`, and
    /// detached otherwise.
    pub fn from_environment() -> Self {
        if !environment::has_global_scope() {
            return Self::detached();
        }

        #[cfg(all(target_arch = "wasm32", feature = "wasm-web"))]
        {
            Self::new(Arc::new(crate::client::backend::WindowBackendProvider))
        }

        #[cfg(not(all(target_arch = "wasm32", feature = "wasm-web")))]
        {
            Self::new(Arc::new(crate::client::backend::BackendSlot::shared()))
        }
    }

    pub fn is_detached(&self) -> bool {
        self.dispatcher.is_none()
    }

    pub fn track_event(&self, event_name: &str, event_data: Option<EventData>) {
        self.send(
            CallKind::Track {
                event_name: Some(event_name.to_string()),
            },
            event_data,
        );
    }

    /// Tracks a revenue event. `currency` defaults to `USD`; `revenue` and `currency` are written
    /// after the caller's keys and take precedence over them.
    ///
    /// JSON has no NaN or infinity, so a non-finite `revenue` is sent as `null`.
    pub fn track_revenue(
        &self,
        event_name: &str,
        revenue: f64,
        currency: Option<&str>,
        data: Option<EventData>,
    ) {
        if !revenue.is_finite() {
            log::debug!("revenue for `{event_name}` is {revenue}; sending null");
        }
        let mut extra = payload_entry("revenue", revenue);
        extra.insert(
            "currency".to_string(),
            Value::from(currency.unwrap_or(DEFAULT_CURRENCY)),
        );
        self.track_event(event_name, Some(merge_payload(data, extra)));
    }

    pub fn track_outbound_link(&self, url: &str, data: Option<EventData>) {
        let payload = merge_payload(data, payload_entry("url", url));
        self.track_event(OUTBOUND_LINK_EVENT, Some(payload));
    }

    pub fn identify(&self, data: EventData) {
        self.send(CallKind::Identify, Some(data));
    }

    /// Identifies a logged-in user. The payload is `userId` followed by any traits.
    pub fn identify_user(&self, user_id: &str, traits: Option<EventData>) {
        let mut payload = payload_entry("userId", user_id);
        for (key, value) in traits.unwrap_or_default() {
            payload.entry(key).or_insert(value);
        }
        self.identify(payload);
    }

    /// Records a page view as an untargeted track call. Keys are only present when supplied.
    pub fn track_page_view(&self, url: Option<&str>, referrer: Option<&str>) {
        let mut payload = EventData::new();
        if let Some(url) = url {
            payload.insert("url".to_string(), Value::from(url));
        }
        if let Some(referrer) = referrer {
            payload.insert("referrer".to_string(), Value::from(referrer));
        }
        self.send(CallKind::Track { event_name: None }, Some(payload));
    }

    /// Waits until every queued call has reached the backend. Detached trackers report `false`.
    pub async fn ready(&self) -> bool {
        match &self.dispatcher {
            Some(dispatcher) => dispatcher.ready().await,
            None => false,
        }
    }

    pub fn pending_calls(&self) -> usize {
        self.dispatcher
            .as_ref()
            .map(Dispatcher::pending_calls)
            .unwrap_or(0)
    }

    fn send(&self, kind: CallKind, payload: Option<EventData>) {
        match &self.dispatcher {
            Some(dispatcher) => dispatcher.dispatch(kind, payload),
            None => log::debug!("no global scope available; ignoring analytics call"),
        }
    }
}

static SHARED_TRACKER: LazyLock<Tracker> = LazyLock::new(Tracker::from_environment);

/// Returns the process-wide tracker, created from the environment on first use.
pub fn get_tracker() -> &'static Tracker {
    &SHARED_TRACKER
}

pub fn track_event(event_name: &str, event_data: Option<EventData>) {
    get_tracker().track_event(event_name, event_data);
}

pub fn track_revenue(event_name: &str, revenue: f64, currency: Option<&str>, data: Option<EventData>) {
    get_tracker().track_revenue(event_name, revenue, currency, data);
}

pub fn track_outbound_link(url: &str, data: Option<EventData>) {
    get_tracker().track_outbound_link(url, data);
}

pub fn identify(data: EventData) {
    get_tracker().identify(data);
}

pub fn identify_user(user_id: &str, traits: Option<EventData>) {
    get_tracker().identify_user(user_id, traits);
}

pub fn track_page_view(url: Option<&str>, referrer: Option<&str>) {
    get_tracker().track_page_view(url, referrer);
}
