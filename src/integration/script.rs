use crate::integration::config::EntrolyticsOptions;

/// Renders the `<script>` tag that loads the tracking script, with one `data-*` attribute per
/// option that differs from the script's own defaults.
pub fn generate_script_tag(options: &EntrolyticsOptions) -> String {
    let mut attributes = vec![
        attribute("src", &options.script_url()),
        attribute("data-website-id", &options.website_id),
        "defer".to_string(),
    ];

    if !options.auto_track {
        attributes.push(attribute("data-auto-track", "false"));
    }
    if options.track_outbound_links {
        attributes.push(attribute("data-track-outbound-links", "true"));
    }
    if options.track_file_downloads {
        attributes.push(attribute("data-track-file-downloads", "true"));
    }
    if options.respect_dnt {
        attributes.push(attribute("data-do-not-track", "true"));
    }
    if !options.domains.is_empty() {
        attributes.push(attribute("data-domains", &options.domains.join(",")));
    }

    format!("<script {}></script>", attributes.join(" "))
}

fn attribute(name: &str, value: &str) -> String {
    format!("{name}=\"{}\"", escape_attribute(value))
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_render_minimal_tag() {
        let tag = generate_script_tag(&EntrolyticsOptions::new("abc"));
        assert_eq!(
            tag,
            "<script src=\"https://entrolytics.click/script.js\" data-website-id=\"abc\" defer \
             data-track-outbound-links=\"true\"></script>"
        );
    }

    #[test]
    fn domains_are_comma_joined() {
        let options = EntrolyticsOptions::new("abc").with_domains(["a.com", "b.com"]);
        let tag = generate_script_tag(&options);
        assert!(tag.contains("data-domains=\"a.com,b.com\""));
    }

    #[test]
    fn every_flag_renders_in_order() {
        let options = EntrolyticsOptions {
            website_id: "site-1".into(),
            host: Some("https://stats.example.com/".into()),
            auto_track: false,
            track_outbound_links: false,
            track_file_downloads: true,
            respect_dnt: true,
            domains: vec!["example.com".into()],
            cache_script: true,
        };
        assert_eq!(
            generate_script_tag(&options),
            "<script src=\"https://stats.example.com/script.js\" data-website-id=\"site-1\" defer \
             data-auto-track=\"false\" data-track-file-downloads=\"true\" data-do-not-track=\"true\" \
             data-domains=\"example.com\"></script>"
        );
    }

    #[test]
    fn attribute_values_are_escaped() {
        let tag = generate_script_tag(&EntrolyticsOptions::new("a\"b<c>&d"));
        assert!(tag.contains("data-website-id=\"a&quot;b&lt;c&gt;&amp;d\""));
    }
}
