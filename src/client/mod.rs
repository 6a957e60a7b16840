mod api;
mod backend;
mod constants;
mod dispatcher;
#[cfg(all(target_arch = "wasm32", feature = "wasm-web"))]
mod wasm;

pub use api::{
    get_tracker, identify, identify_user, track_event, track_outbound_link, track_page_view,
    track_revenue, Tracker,
};
pub use backend::{Backend, BackendProvider, BackendSlot, EventData};
#[cfg(all(target_arch = "wasm32", feature = "wasm-web"))]
pub use backend::{WindowBackendProvider, GLOBAL_BINDING};
pub use constants::{DEFAULT_CURRENCY, OUTBOUND_LINK_EVENT};
pub use dispatcher::{CallKind, Dispatcher, PendingCall, PollSettings, DEFAULT_POLL_INTERVAL};
