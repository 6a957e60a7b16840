mod api;
mod config;
mod constants;
pub mod error;
mod script;

pub use api::{entrolytics, InjectionStage, Integration, ScriptBundle, ScriptInjector};
pub use config::EntrolyticsOptions;
pub use constants::{DEFAULT_HOST, INTEGRATION_NAME, PAGE_LOAD_FALLBACK_SCRIPT};
pub use error::{IntegrationError, IntegrationErrorCode, IntegrationResult};
pub use script::generate_script_tag;
