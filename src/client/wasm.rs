//! JavaScript-facing exports so inline scripts can call the tracker without touching Rust.

use wasm_bindgen::prelude::*;

use crate::client::api::get_tracker;
use crate::client::backend::EventData;

fn to_event_data(value: &JsValue) -> Option<EventData> {
    if value.is_null() || value.is_undefined() {
        return None;
    }
    let serialized = js_sys::JSON::stringify(value).ok()?.as_string()?;
    serde_json::from_str(&serialized).ok()
}

#[wasm_bindgen(js_name = trackEvent)]
pub fn track_event(event_name: &str, event_data: JsValue) {
    get_tracker().track_event(event_name, to_event_data(&event_data));
}

#[wasm_bindgen(js_name = trackRevenue)]
pub fn track_revenue(event_name: &str, revenue: f64, currency: Option<String>, data: JsValue) {
    get_tracker().track_revenue(event_name, revenue, currency.as_deref(), to_event_data(&data));
}

#[wasm_bindgen(js_name = trackOutboundLink)]
pub fn track_outbound_link(url: &str, data: JsValue) {
    get_tracker().track_outbound_link(url, to_event_data(&data));
}

#[wasm_bindgen(js_name = identify)]
pub fn identify(data: JsValue) {
    get_tracker().identify(to_event_data(&data).unwrap_or_default());
}

#[wasm_bindgen(js_name = identifyUser)]
pub fn identify_user(user_id: &str, traits: JsValue) {
    get_tracker().identify_user(user_id, to_event_data(&traits));
}

#[wasm_bindgen(js_name = trackPageView)]
pub fn track_page_view(url: Option<String>, referrer: Option<String>) {
    get_tracker().track_page_view(url.as_deref(), referrer.as_deref());
}
