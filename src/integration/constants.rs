pub const INTEGRATION_NAME: &str = "@entrolytics/entrolytics-sdk";

/// Hosted Entrolytics endpoint used when no self-hosted instance is configured.
pub const DEFAULT_HOST: &str = "https://entrolytics.click";

pub const SCRIPT_PATH: &str = "script.js";

/// Inline JSON, a path to a JSON file, or `key=value` pairs separated by commas.
pub const OPTIONS_ENV: &str = "ENTROLYTICS_OPTIONS";
pub const WEBSITE_ID_ENV: &str = "ENTROLYTICS_WEBSITE_ID";
pub const HOST_ENV: &str = "ENTROLYTICS_HOST";

/// Listener kept on client-side navigations. The tracking script re-tracks pages by itself when
/// auto-tracking is on; this only reserves the hook.
pub const PAGE_LOAD_FALLBACK_SCRIPT: &str = r#"
document.addEventListener('astro:page-load', () => {
  if (typeof window.entrolytics !== 'undefined' && window.entrolytics.track) {
    // page views are re-tracked by the script itself when data-auto-track is enabled
  }
});
"#;
