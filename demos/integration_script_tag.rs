//! Builds the integration from options and splices the injected fragments into a page.
//! Set `ENTROLYTICS_OPTIONS` (JSON, a JSON file path, or `websiteId=...,domains=a.com|b.com`) or
//! `ENTROLYTICS_WEBSITE_ID` to try different configurations.

use entrolytics_sdk::integration::{entrolytics, EntrolyticsOptions, ScriptBundle};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut options = EntrolyticsOptions::from_env()?;
    if options.website_id.is_empty() {
        options = EntrolyticsOptions::new("your-website-id").with_domains(["example.com", "www.example.com"]);
    }

    let integration = entrolytics(options)?;
    let mut bundle = ScriptBundle::new();
    integration.config_setup(&mut bundle);

    let page = bundle.apply_to_html("<!doctype html><html><head><title>Demo</title></head><body><h1>Hello</h1></body></html>");
    println!("{page}");
    Ok(())
}
