use std::fmt;
use std::sync::{Arc, LazyLock, RwLock};

use serde_json::{Map, Value};

/// Ordered key/value payload attached to tracking and identify calls.
pub type EventData = Map<String, Value>;

/// The tracking object exposed by the externally loaded analytics script.
///
/// Implementations are expected to be cheap to call; the dispatcher never inspects the outcome of
/// a forwarded call.
pub trait Backend: Send + Sync {
    /// Records an event. `event_name` is `None` for untargeted calls such as page views, in which
    /// case `data` carries the whole payload.
    fn track(&self, event_name: Option<&str>, data: Option<&EventData>);

    /// Attaches traits to the current visitor.
    fn identify(&self, data: &EventData);
}

/// Resolves the backend handle, or `None` while the analytics script has not attached it yet.
pub trait BackendProvider: Send + Sync {
    fn resolve(&self) -> Option<Arc<dyn Backend>>;
}

impl<F> BackendProvider for F
where
    F: Fn() -> Option<Arc<dyn Backend>> + Send + Sync,
{
    fn resolve(&self) -> Option<Arc<dyn Backend>> {
        self()
    }
}

/// A settable location holding the backend, standing in for the page's global binding.
///
/// Whoever loads the analytics backend calls [`BackendSlot::attach`]; trackers bound to the slot
/// observe it on their next call or poll tick.
#[derive(Clone, Default)]
pub struct BackendSlot {
    backend: Arc<RwLock<Option<Arc<dyn Backend>>>>,
}

impl BackendSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide slot used by trackers created from the environment on native targets.
    pub fn shared() -> Self {
        static INSTANCE: LazyLock<BackendSlot> = LazyLock::new(BackendSlot::new);
        INSTANCE.clone()
    }

    pub fn attach(&self, backend: Arc<dyn Backend>) {
        *self.backend.write().unwrap() = Some(backend);
    }

    pub fn detach(&self) {
        self.backend.write().unwrap().take();
    }

    pub fn is_attached(&self) -> bool {
        self.backend.read().unwrap().is_some()
    }
}

impl BackendProvider for BackendSlot {
    fn resolve(&self) -> Option<Arc<dyn Backend>> {
        self.backend.read().unwrap().clone()
    }
}

impl fmt::Debug for BackendSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendSlot")
            .field("attached", &self.is_attached())
            .finish()
    }
}

/// Merges `extra` entries after the caller supplied `data`, overriding duplicate keys in place.
pub(crate) fn merge_payload(data: Option<EventData>, extra: EventData) -> EventData {
    let mut payload = data.unwrap_or_default();
    for (key, value) in extra {
        payload.insert(key, value);
    }
    payload
}

pub(crate) fn payload_entry(key: &str, value: impl Into<Value>) -> EventData {
    let mut entry = EventData::new();
    entry.insert(key.to_string(), value.into());
    entry
}

#[cfg(all(target_arch = "wasm32", feature = "wasm-web"))]
pub use window::{WindowBackendProvider, GLOBAL_BINDING};

#[cfg(all(target_arch = "wasm32", feature = "wasm-web"))]
mod window {
    use std::sync::Arc;

    use wasm_bindgen::{JsCast, JsValue};

    use super::{Backend, BackendProvider, EventData};

    /// Name of the global the analytics script installs on `window`.
    pub const GLOBAL_BINDING: &str = "entrolytics";

    /// Resolves `window.entrolytics` on every check.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct WindowBackendProvider;

    impl BackendProvider for WindowBackendProvider {
        fn resolve(&self) -> Option<Arc<dyn Backend>> {
            global_object().map(|_| Arc::new(WindowBackend) as Arc<dyn Backend>)
        }
    }

    struct WindowBackend;

    impl Backend for WindowBackend {
        fn track(&self, event_name: Option<&str>, data: Option<&EventData>) {
            let Some(target) = global_object() else {
                return;
            };
            let args = js_sys::Array::new();
            if let Some(name) = event_name {
                args.push(&JsValue::from_str(name));
            }
            if let Some(data) = data {
                args.push(&to_js_object(data));
            }
            call_method(&target, "track", &args);
        }

        fn identify(&self, data: &EventData) {
            let Some(target) = global_object() else {
                return;
            };
            let args = js_sys::Array::of1(&to_js_object(data));
            call_method(&target, "identify", &args);
        }
    }

    fn global_object() -> Option<JsValue> {
        let value = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str(GLOBAL_BINDING)).ok()?;
        if value.is_null() || value.is_undefined() {
            None
        } else {
            Some(value)
        }
    }

    fn to_js_object(data: &EventData) -> JsValue {
        serde_json::to_string(data)
            .ok()
            .and_then(|json| js_sys::JSON::parse(&json).ok())
            .unwrap_or(JsValue::UNDEFINED)
    }

    fn call_method(target: &JsValue, name: &str, args: &js_sys::Array) {
        let Ok(method) = js_sys::Reflect::get(target, &JsValue::from_str(name)) else {
            return;
        };
        let Some(function) = method.dyn_ref::<js_sys::Function>() else {
            log::debug!("window.{GLOBAL_BINDING}.{name} is not a function; dropping the call");
            return;
        };
        // Exceptions thrown by the analytics script surface in the calling context.
        if let Err(err) = function.apply(target, args) {
            wasm_bindgen::throw_val(err);
        }
    }
}
