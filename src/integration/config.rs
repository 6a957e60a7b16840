use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::integration::constants::{
    DEFAULT_HOST, HOST_ENV, INTEGRATION_NAME, OPTIONS_ENV, SCRIPT_PATH, WEBSITE_ID_ENV,
};
use crate::integration::error::{invalid_options, missing_website_id, IntegrationResult};

/// Options accepted by the integration, mirroring the plugin's camelCase configuration object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntrolyticsOptions {
    /// Required. Identifies the site in the Entrolytics dashboard.
    pub website_id: String,
    /// Base URL of a self-hosted instance. Defaults to [`DEFAULT_HOST`].
    pub host: Option<String>,
    pub auto_track: bool,
    pub track_outbound_links: bool,
    pub track_file_downloads: bool,
    /// Honour the browser's Do Not Track setting.
    pub respect_dnt: bool,
    /// Domains for cross-domain tracking.
    pub domains: Vec<String>,
    /// Reserved for serving the tracking script from the site itself. Currently has no effect.
    pub cache_script: bool,
}

impl Default for EntrolyticsOptions {
    fn default() -> Self {
        Self {
            website_id: String::new(),
            host: None,
            auto_track: true,
            track_outbound_links: true,
            track_file_downloads: false,
            respect_dnt: false,
            domains: Vec::new(),
            cache_script: false,
        }
    }
}

impl EntrolyticsOptions {
    pub fn new(website_id: impl Into<String>) -> Self {
        Self {
            website_id: website_id.into(),
            ..Default::default()
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domains = domains.into_iter().map(Into::into).collect();
        self
    }

    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// URL of the tracking script: the host without its trailing slash, followed by `/script.js`.
    pub fn script_url(&self) -> String {
        let host = self.host();
        let host = host.strip_suffix('/').unwrap_or(host);
        format!("{host}/{SCRIPT_PATH}")
    }

    pub fn validate(&self) -> IntegrationResult<()> {
        if self.website_id.trim().is_empty() {
            return Err(missing_website_id(format!("[{INTEGRATION_NAME}] websiteId is required")));
        }
        Ok(())
    }

    pub fn from_json_str(raw: &str) -> IntegrationResult<Self> {
        serde_json::from_str(raw).map_err(|err| invalid_options(format!("invalid integration options: {err}")))
    }

    pub fn from_json_value(value: Value) -> IntegrationResult<Self> {
        serde_json::from_value(value).map_err(|err| invalid_options(format!("invalid integration options: {err}")))
    }

    /// Loads options from `ENTROLYTICS_OPTIONS` (see [`EntrolyticsOptions::from_source`]), then
    /// applies `ENTROLYTICS_WEBSITE_ID` and `ENTROLYTICS_HOST` on top. The result is not
    /// validated; [`crate::integration::Integration::new`] does that.
    pub fn from_env() -> IntegrationResult<Self> {
        let mut options = match env::var(OPTIONS_ENV) {
            Ok(raw) if !raw.trim().is_empty() => Self::from_source(&raw)?,
            _ => Self::default(),
        };

        if let Ok(website_id) = env::var(WEBSITE_ID_ENV) {
            options.website_id = website_id;
        }
        if let Ok(host) = env::var(HOST_ENV) {
            options.host = Some(host);
        }
        Ok(options)
    }

    /// Parses an options source: a JSON object, `key=value` pairs such as
    /// `websiteId=abc,autoTrack=false,domains=a.com|b.com`, or else a path to a JSON file.
    pub fn from_source(raw: &str) -> IntegrationResult<Self> {
        let trimmed = raw.trim();
        if trimmed.starts_with('{') {
            return Self::from_json_str(trimmed);
        }
        if trimmed.contains('=') {
            let mut options = Self::default();
            for pair in trimmed.split(',').map(str::trim).filter(|pair| !pair.is_empty()) {
                let Some((key, value)) = pair.split_once('=') else {
                    return Err(invalid_options(format!("expected key=value, found `{pair}`")));
                };
                options.apply_pair(key.trim(), value.trim())?;
            }
            return Ok(options);
        }
        Self::from_file(Path::new(trimmed))
    }

    fn from_file(path: &Path) -> IntegrationResult<Self> {
        let contents = fs::read_to_string(path).map_err(|err| {
            invalid_options(format!("cannot read options file {}: {err}", path.display()))
        })?;
        Self::from_json_str(&contents)
    }

    fn apply_pair(&mut self, key: &str, value: &str) -> IntegrationResult<()> {
        match key {
            "websiteId" => self.website_id = value.to_string(),
            "host" => self.host = Some(value.to_string()).filter(|host| !host.is_empty()),
            "autoTrack" => self.auto_track = parse_flag(key, value)?,
            "trackOutboundLinks" => self.track_outbound_links = parse_flag(key, value)?,
            "trackFileDownloads" => self.track_file_downloads = parse_flag(key, value)?,
            "respectDnt" => self.respect_dnt = parse_flag(key, value)?,
            "cacheScript" => self.cache_script = parse_flag(key, value)?,
            "domains" => {
                self.domains = value
                    .split(['|', ' '])
                    .filter(|domain| !domain.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            _ => return Err(invalid_options(format!("unknown integration option `{key}`"))),
        }
        Ok(())
    }
}

fn parse_flag(key: &str, value: &str) -> IntegrationResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(invalid_options(format!("`{key}` expects true or false, found `{value}`"))),
    }
}
