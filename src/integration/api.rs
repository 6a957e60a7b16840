use std::fmt;

use crate::integration::config::EntrolyticsOptions;
use crate::integration::constants::{INTEGRATION_NAME, PAGE_LOAD_FALLBACK_SCRIPT};
use crate::integration::error::IntegrationResult;
use crate::integration::script::generate_script_tag;

/// Where the host should place an injected fragment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InjectionStage {
    /// Raw markup inlined into the document `<head>`.
    HeadInline,
    /// Script body bundled and run on every page.
    Page,
}

impl InjectionStage {
    pub fn as_str(self) -> &'static str {
        match self {
            InjectionStage::HeadInline => "head-inline",
            InjectionStage::Page => "page",
        }
    }
}

impl fmt::Display for InjectionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Injection capability offered by the site generator during config setup.
pub trait ScriptInjector {
    fn inject_script(&mut self, stage: InjectionStage, content: &str);
}

/// A validated integration ready to be registered with a host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Integration {
    options: EntrolyticsOptions,
}

impl Integration {
    /// Validates the options. A missing website ID fails here, before anything is injected.
    pub fn new(options: EntrolyticsOptions) -> IntegrationResult<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn name(&self) -> &'static str {
        INTEGRATION_NAME
    }

    pub fn options(&self) -> &EntrolyticsOptions {
        &self.options
    }

    pub fn script_tag(&self) -> String {
        generate_script_tag(&self.options)
    }

    /// Config-setup hook: injects the tracking script tag into the head and the navigation
    /// fallback into every page.
    pub fn config_setup(&self, host: &mut dyn ScriptInjector) {
        log::debug!(
            "{INTEGRATION_NAME}: injecting tracking script for website `{}`",
            self.options.website_id
        );
        host.inject_script(InjectionStage::HeadInline, &self.script_tag());
        host.inject_script(InjectionStage::Page, PAGE_LOAD_FALLBACK_SCRIPT);
    }
}

/// Creates the integration from its options, failing fast when they are incomplete.
pub fn entrolytics(options: EntrolyticsOptions) -> IntegrationResult<Integration> {
    Integration::new(options)
}

/// A [`ScriptInjector`] that keeps fragments in injection order and can splice them into a
/// rendered HTML document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScriptBundle {
    fragments: Vec<(InjectionStage, String)>,
}

impl ScriptBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fragments(&self) -> &[(InjectionStage, String)] {
        &self.fragments
    }

    pub fn stage(&self, stage: InjectionStage) -> impl Iterator<Item = &str> {
        self.fragments
            .iter()
            .filter(move |(candidate, _)| *candidate == stage)
            .map(|(_, content)| content.as_str())
    }

    /// Inserts head fragments before `</head>` and page scripts before `</body>`. Documents lacking
    /// either closing tag get the corresponding markup appended at the end.
    pub fn apply_to_html(&self, html: &str) -> String {
        let head: String = self.stage(InjectionStage::HeadInline).collect();
        let page: String = self
            .stage(InjectionStage::Page)
            .map(|body| format!("<script type=\"module\">{body}</script>"))
            .collect();

        let with_head = insert_before(html, "</head>", &head);
        insert_before(&with_head, "</body>", &page)
    }
}

impl ScriptInjector for ScriptBundle {
    fn inject_script(&mut self, stage: InjectionStage, content: &str) {
        self.fragments.push((stage, content.to_string()));
    }
}

fn insert_before(html: &str, closing_tag: &str, markup: &str) -> String {
    if markup.is_empty() {
        return html.to_string();
    }
    match find_ascii_case_insensitive(html, closing_tag) {
        Some(index) => {
            let mut output = String::with_capacity(html.len() + markup.len());
            output.push_str(&html[..index]);
            output.push_str(markup);
            output.push_str(&html[index..]);
            output
        }
        None => format!("{html}{markup}"),
    }
}

fn find_ascii_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    let needle = needle.as_bytes();
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}
