//! Detection of the scope tracking calls run in.

use std::env;

/// Overrides scope detection. Accepts `browser` or `server`, case-insensitively.
pub const SCOPE_OVERRIDE_VAR: &str = "ENTROLYTICS_ENV_FORCE";

/// Where the current process is running, as far as tracking is concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    /// A page with a global object the analytics script can attach to.
    Browser,
    /// Server-side rendering, build steps and plain native processes.
    Server,
}

impl Scope {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "browser" => Some(Scope::Browser),
            "server" => Some(Scope::Server),
            _ => None,
        }
    }

    /// The overridden scope when [`SCOPE_OVERRIDE_VAR`] names one, otherwise the detected scope.
    pub fn current() -> Self {
        if let Ok(raw) = env::var(SCOPE_OVERRIDE_VAR) {
            match Scope::parse(&raw) {
                Some(scope) => return scope,
                None => log::debug!("ignoring unknown {SCOPE_OVERRIDE_VAR} value `{raw}`"),
            }
        }
        Self::detect()
    }

    #[cfg(all(target_arch = "wasm32", feature = "wasm-web"))]
    fn detect() -> Self {
        use wasm_bindgen::JsCast;
        if js_sys::global().dyn_into::<web_sys::Window>().is_ok() {
            Scope::Browser
        } else {
            Scope::Server
        }
    }

    #[cfg(not(all(target_arch = "wasm32", feature = "wasm-web")))]
    fn detect() -> Self {
        Scope::Server
    }
}

/// Shorthand for `Scope::current() == Scope::Browser`.
pub fn has_global_scope() -> bool {
    Scope::current() == Scope::Browser
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::env_lock;

    #[test]
    fn override_wins_over_detection() {
        let _guard = env_lock();
        env::set_var(SCOPE_OVERRIDE_VAR, " Browser ");
        assert_eq!(Scope::current(), Scope::Browser);
        assert!(has_global_scope());

        env::set_var(SCOPE_OVERRIDE_VAR, "server");
        assert!(!has_global_scope());
        env::remove_var(SCOPE_OVERRIDE_VAR);
    }

    #[test]
    fn unknown_override_falls_back_to_detection() {
        let _guard = env_lock();
        env::set_var(SCOPE_OVERRIDE_VAR, "kiosk");
        assert_eq!(Scope::current(), Scope::Server);
        env::remove_var(SCOPE_OVERRIDE_VAR);
        assert_eq!(Scope::current(), Scope::Server);
    }
}
