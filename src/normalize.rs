use once_cell::sync::Lazy;
use regex::Regex;

/// One rewrite step of the line normalization pipeline.
#[derive(Debug)]
pub struct NormalizationRule {
    pub name: &'static str,
    pub pattern: Regex,
    pub replacement: &'static str,
}

impl NormalizationRule {
    fn new(name: &'static str, pattern: &str, replacement: &'static str) -> Self {
        Self { name, pattern: Regex::new(pattern).unwrap(), replacement }
    }

    pub fn apply<'a>(&self, input: &'a str) -> std::borrow::Cow<'a, str> {
        self.pattern.replace_all(input, self.replacement)
    }
}

/// Volatile substrings stripped before lines are compared, applied in order.
/// The three timestamp rules only fire at the start of the line.
pub static RULES: Lazy<Vec<NormalizationRule>> = Lazy::new(|| {
    vec![
        // [2024-01-01T00:00:00.123Z], 2024-01-01 00:00:00+01:00
        NormalizationRule::new(
            "iso_timestamp",
            r"^\[?\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}(?:[.,]\d+)?(?:Z|[+-]\d{2}:?\d{2})?\]?\s*",
            "",
        ),
        // 01/31/2024 13:45:00
        NormalizationRule::new("us_timestamp", r"^\d{2}/\d{2}/\d{4}\s+\d{2}:\d{2}:\d{2}\s*", ""),
        // 13:45:00.123
        NormalizationRule::new("clock_time", r"^\d{2}:\d{2}:\d{2}(?:\.\d+)?\s*", ""),
        NormalizationRule::new(
            "uuid",
            r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}",
            "",
        ),
        NormalizationRule::new("hex_literal", r"0[xX][0-9a-fA-F]+", ""),
        NormalizationRule::new("pid_tid", r"(?i)\b(?:pid|tid)[:=]\s*\d+", ""),
        NormalizationRule::new("bracketed_number", r"\[\d+\]", ""),
    ]
});

/// Normalize a log line for cross-file comparison: strip volatile tokens, lowercase, trim.
pub fn normalize_line(line: &str) -> String {
    let mut s = line.trim().to_string();
    for rule in RULES.iter() {
        if let std::borrow::Cow::Owned(rewritten) = rule.apply(&s) {
            s = rewritten;
        }
    }
    s.to_lowercase().trim().to_string()
}
