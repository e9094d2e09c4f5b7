// src/utils/html_debug.rs
use crate::utils::error::AppError;
use regex::Regex;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Markers worth seeing when a profile page extracts badly: the section
/// cards and headings the locator keys on, the anchors it climbs from, and
/// the list items the enumerator picks up.
pub const PROFILE_DEBUG_PATTERNS: &[(&str, &str)] = &[
    (r#"<section[^>]*class="[^"]*artdeco-card[^"]*"[^>]*>"#, "section"),
    (r"<h2[^>]*>(?:\s|<[^>]+>)*(?:Experience|Education)", "heading"),
    (r#"id="(?:experience|education)""#, "anchor"),
    (r#"<li[^>]*class="[^"]*artdeco-list__item[^"]*"[^>]*>"#, "entry"),
    (r#"(?i)authwall|class="[^"]*login[^"]*""#, "authwall"),
];

/// Writes `html` to `path` with each `(start, end, kind)` byte range wrapped in
/// a highlighted span. Overlapping ranges after the first are skipped.
pub fn save_debug_html(html: &str, path: &Path, highlights: &[(usize, usize, &str)]) -> Result<(), AppError> {
    let mut file = File::create(path)?;

    // Add debug styling in head
    let mut debug_html = String::from("<!DOCTYPE html>\n<html>\n<head>\n<style>\n");
    debug_html.push_str(".highlight-section { background-color: #FFFF00; }\n");
    debug_html.push_str(".highlight-heading { background-color: #90EE90; }\n");
    debug_html.push_str(".highlight-anchor { background-color: #ADD8E6; }\n");
    debug_html.push_str(".highlight-entry { background-color: #FFA500; }\n");
    debug_html.push_str(".highlight-custom { background-color: #FFC0CB; }\n");
    debug_html.push_str("</style>\n</head>\n<body>\n");

    let mut sorted_highlights = highlights.to_vec();
    sorted_highlights.sort_by_key(|h| h.0); // Sort by position

    let mut last_pos = 0;
    for (start, end, kind) in sorted_highlights {
        if start < last_pos || end > html.len() {
            continue;
        }
        debug_html.push_str(&html[last_pos..start]);

        let css_class = match kind {
            "section" => "highlight-section",
            "heading" => "highlight-heading",
            "anchor" => "highlight-anchor",
            "entry" => "highlight-entry",
            _ => "highlight-custom",
        };
        debug_html.push_str(&format!(
            "<span class=\"{}\" title=\"Position: {}-{}, Type: {}\">",
            css_class, start, end, kind
        ));
        debug_html.push_str(&html[start..end]);
        debug_html.push_str("</span>");

        last_pos = end;
    }
    debug_html.push_str(&html[last_pos..]);
    debug_html.push_str("\n</body>\n</html>");

    file.write_all(debug_html.as_bytes())?;

    tracing::info!("Saved debug HTML to {}", path.display());
    Ok(())
}

/// Creates an annotated copy of `html` with every match of `patterns` highlighted.
pub fn create_debug_html(html: &str, path: &Path, patterns: &[(&str, &str)]) -> Result<(), AppError> {
    let mut highlights = Vec::new();

    for (pattern, kind) in patterns {
        let re = Regex::new(pattern).map_err(|e| {
            AppError::Config(format!("Invalid regex pattern '{}': {}", pattern, e))
        })?;

        for mat in re.find_iter(html) {
            highlights.push((mat.start(), mat.end(), *kind));
        }
    }

    save_debug_html(html, path, &highlights)
}
