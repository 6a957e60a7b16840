use entrolytics_sdk::integration::{
    entrolytics, generate_script_tag, EntrolyticsOptions, InjectionStage, IntegrationErrorCode,
    ScriptBundle, ScriptInjector,
};
use serde_json::json;

#[derive(Default)]
struct CountingHost {
    injected: Vec<InjectionStage>,
}

impl ScriptInjector for CountingHost {
    fn inject_script(&mut self, stage: InjectionStage, _content: &str) {
        self.injected.push(stage);
    }
}

#[test]
fn missing_website_id_aborts_setup() {
    let options = EntrolyticsOptions::from_json_value(json!({})).unwrap();
    let err = entrolytics(options).unwrap_err();
    assert_eq!(err.code, IntegrationErrorCode::MissingWebsiteId);
}

#[test]
fn domains_attribute_is_comma_joined() {
    let options = EntrolyticsOptions::from_json_value(json!({
        "websiteId": "abc",
        "domains": ["a.com", "b.com"]
    }))
    .unwrap();
    let integration = entrolytics(options).unwrap();
    assert!(integration
        .script_tag()
        .contains("data-domains=\"a.com,b.com\""));
}

#[test]
fn host_receives_both_fragments() {
    let integration = entrolytics(EntrolyticsOptions::new("abc")).unwrap();
    let mut host = CountingHost::default();
    integration.config_setup(&mut host);
    assert_eq!(host.injected, [InjectionStage::HeadInline, InjectionStage::Page]);
}

#[test]
fn rendered_page_contains_the_script_tag() {
    let options = EntrolyticsOptions::new("abc").with_host("https://stats.example.com");
    let integration = entrolytics(options.clone()).unwrap();
    let mut bundle = ScriptBundle::new();
    integration.config_setup(&mut bundle);

    let page = bundle.apply_to_html("<!doctype html><html><head></head><body></body></html>");
    assert!(page.contains(&generate_script_tag(&options)));
    assert!(page.contains("src=\"https://stats.example.com/script.js\""));
}
