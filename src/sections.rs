use once_cell::sync::Lazy;
use regex::Regex;

use crate::list_items::extract_list_items;
use crate::types::LogAnalysisResult;

/// Build a matcher for a `##` heading carrying `label` (a regex fragment).
/// Tolerates deeper levels (`###`), bold markers and trailing text such as a colon.
pub fn heading_regex(label: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"(?im)^[ \t]*##[# \t]*(?:\*\*)?[ \t]*(?:{label})\b[^\n]*$"))
}

static RE_NEXT_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*##").unwrap());

pub static PATTERNS_HEADING: Lazy<Regex> = Lazy::new(|| heading_regex(r"PATTERNS?").unwrap());
pub static ANOMALIES_HEADING: Lazy<Regex> = Lazy::new(|| heading_regex(r"ANOMAL(?:Y|IES)").unwrap());
pub static ROOT_CAUSES_HEADING: Lazy<Regex> = Lazy::new(|| heading_regex(r"ROOT[ \t]*CAUSES?").unwrap());
pub static SUMMARY_HEADING: Lazy<Regex> = Lazy::new(|| heading_regex(r"SUMMARY").unwrap());

/// Text under the first heading matched by `heading`, up to the next `##` heading or end of input.
pub fn section_text<'a>(text: &'a str, heading: &Regex) -> Option<&'a str> {
    let m = heading.find(text)?;
    let body = &text[m.end()..];
    let end = RE_NEXT_HEADING.find(body).map_or(body.len(), |n| n.start());
    Some(&body[..end])
}

/// List items under `heading`, empty when the section is missing.
pub fn section_items(text: &str, heading: &Regex) -> Vec<String> {
    section_text(text, heading).map(extract_list_items).unwrap_or_default()
}

/// Parse a free-form response with PATTERNS / ANOMALIES / ROOT CAUSES / SUMMARY sections.
/// Missing sections come back empty; an off-format response is an empty result, never an error.
pub fn parse_analysis(text: &str) -> LogAnalysisResult {
    LogAnalysisResult {
        patterns: section_items(text, &PATTERNS_HEADING),
        anomalies: section_items(text, &ANOMALIES_HEADING),
        root_causes: section_items(text, &ROOT_CAUSES_HEADING),
        summary: section_text(text, &SUMMARY_HEADING).map(|s| s.trim().to_string()).unwrap_or_default(),
    }
}

/// Render a result in the same section format [`parse_analysis`] reads.
pub fn render(result: &LogAnalysisResult) -> String {
    let mut out = String::new();
    render_list(&mut out, "PATTERNS", &result.patterns);
    render_list(&mut out, "ANOMALIES", &result.anomalies);
    render_list(&mut out, "ROOT CAUSES", &result.root_causes);
    out.push_str("## SUMMARY\n");
    out.push_str(result.summary.trim());
    out.push('\n');
    out
}

pub(crate) fn render_list(out: &mut String, title: &str, items: &[String]) {
    out.push_str("## ");
    out.push_str(title);
    out.push('\n');
    for item in items {
        out.push_str("- ");
        out.push_str(item);
        out.push('\n');
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_variants_are_recognised() {
        for h in ["## PATTERNS", "### Patterns", "##Patterns:", "## **Patterns**", "  ## pattern"] {
            let text = format!("{h}\n- a\n");
            assert_eq!(section_items(&text, &PATTERNS_HEADING), vec!["a"], "heading {h:?}");
        }
        for h in ["## ROOT CAUSES", "## Root Cause", "## root   causes", "## ROOTCAUSE"] {
            let text = format!("{h}\n- a\n");
            assert_eq!(section_items(&text, &ROOT_CAUSES_HEADING), vec!["a"], "heading {h:?}");
        }
    }

    #[test]
    fn single_hash_is_not_a_section() {
        assert!(section_text("# PATTERNS\n- a", &PATTERNS_HEADING).is_none());
    }

    #[test]
    fn shared_heading_does_not_match_plain_label() {
        assert!(section_text("## SHARED PATTERNS\n- a", &PATTERNS_HEADING).is_none());
    }

    #[test]
    fn section_stops_at_next_heading() {
        let text = "## ANOMALY\n- spike\n### Details\n- ignored";
        assert_eq!(section_items(text, &ANOMALIES_HEADING), vec!["spike"]);
    }
}
