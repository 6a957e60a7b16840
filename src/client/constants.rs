/// Event name used by [`crate::client::Tracker::track_outbound_link`].
pub const OUTBOUND_LINK_EVENT: &str = "outbound-link-click";
pub const DEFAULT_CURRENCY: &str = "USD";
