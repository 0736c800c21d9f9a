use once_cell::sync::Lazy;
use regex::Regex;

static RE_BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*[-*•](?:\s+(.*))?$").unwrap());

static RE_NUMBERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\d+[.)](?:\s+(.*))?$").unwrap());

static RE_BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\*\*([^*]+)\*\*(.*)$").unwrap());

// Markdown horizontal rules: ---, ***, ___, ===
static RE_RULE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(?:[-*_=]\s*){3,}$").unwrap());

// A whole item like "[...]" or "[describe anomalies]"
static RE_BRACKETED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[[^\]]*\]$").unwrap());

const NEGATIVE_PHRASES: &[&str] = &["none found", "no patterns", "no anomalies", "no root causes"];

/// Extract list entries from the raw text of one section.
///
/// Understands `- item`, `* item`, `• item`, `1. item`, `1) item`,
/// `**phrase**: description` and bare lines. Indented lines continue the
/// open item. Template placeholders and "nothing found" phrases are dropped.
pub fn extract_list_items(section: &str) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    let mut current: Option<String> = None;

    fn flush(current: &mut Option<String>, items: &mut Vec<String>) {
        if let Some(item) = current.take() {
            items.push(item.trim().to_string());
        }
    }

    for line in section.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            flush(&mut current, &mut items);
            continue;
        }
        if trimmed.starts_with("##") || RE_RULE.is_match(line) {
            flush(&mut current, &mut items);
            continue;
        }
        if let Some(caps) = RE_BULLET.captures(line) {
            flush(&mut current, &mut items);
            current = Some(caps.get(1).map_or("", |m| m.as_str()).trim().to_string());
            continue;
        }
        if let Some(caps) = RE_NUMBERED.captures(line) {
            flush(&mut current, &mut items);
            current = Some(caps.get(1).map_or("", |m| m.as_str()).trim().to_string());
            continue;
        }
        if let Some(item) = bold_header(line) {
            flush(&mut current, &mut items);
            current = Some(item);
            continue;
        }
        let indented = line.starts_with(' ') || line.starts_with('\t');
        match current.as_mut() {
            Some(item) if indented => {
                if !item.is_empty() {
                    item.push(' ');
                }
                item.push_str(trimmed);
            }
            _ => {
                flush(&mut current, &mut items);
                current = Some(trimmed.to_string());
            }
        }
    }
    flush(&mut current, &mut items);

    items.retain(|item| !is_placeholder(item));
    items
}

/// `**phrase**` or `**phrase**: description` (also `**phrase:** description`).
/// Bold text followed by anything other than a colon is not a header.
fn bold_header(line: &str) -> Option<String> {
    let caps = RE_BOLD.captures(line)?;
    let mut phrase = caps.get(1)?.as_str().trim();
    let mut rest = caps.get(2).map_or("", |m| m.as_str()).trim();
    let mut has_colon = false;
    if let Some(p) = phrase.strip_suffix(':') {
        phrase = p.trim_end();
        has_colon = true;
    }
    if let Some(r) = rest.strip_prefix(':') {
        rest = r.trim_start();
        has_colon = true;
    }
    if phrase.is_empty() {
        return None;
    }
    if rest.is_empty() {
        Some(phrase.to_string())
    } else if has_colon {
        Some(format!("**{phrase}**: {rest}"))
    } else {
        None
    }
}

pub fn is_placeholder(item: &str) -> bool {
    let t = item.trim();
    if t.is_empty() {
        return true;
    }
    let lower = t.to_lowercase();
    if t.contains("[List") || lower.contains("list here") || RE_BRACKETED.is_match(t) {
        return true;
    }
    let phrase = lower.trim_end_matches('.').trim_end();
    NEGATIVE_PHRASES.contains(&phrase)
}
