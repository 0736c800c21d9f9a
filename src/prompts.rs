use crate::sections::render_list;
use crate::types::{ChunkAnalysisResult, ChunkDescriptor, FileAnalysisResult, LogAnalysisResult};

pub const ANALYSIS_FORMAT: &str = "\
Respond using exactly these four sections, each list item on its own line starting with \"- \":

## PATTERNS
- [List recurring patterns here]

## ANOMALIES
- [List anomalies here]

## ROOT CAUSES
- [List likely root causes here]

## SUMMARY
[One short paragraph summarizing the log]
";

pub const COMPARISON_FORMAT: &str = "\
Respond using exactly these four sections, each list item on its own line starting with \"- \":

## SHARED PATTERNS
- [List patterns present in more than one file here]

## SHARED ANOMALIES
- [List anomalies present in more than one file here]

## SHARED ROOT CAUSES
- [List root causes affecting more than one file here]

## CORRELATIONS
- [List cross-file correlations here, e.g. events that happen together or in sequence]
";

pub fn analysis_prompt(filename: &str) -> String {
    format!(
        "You are an expert at log analysis. Analyze the attached log file '{filename}'. \
         Identify recurring patterns, anomalies and the most likely root causes of any problems.\n\n{ANALYSIS_FORMAT}"
    )
}

pub fn chunk_prompt(filename: &str, chunk: &ChunkDescriptor, chunk_id: usize, total: usize) -> String {
    format!(
        "You are an expert at log analysis. Below is part {} of {} of the log file '{}' (lines {}-{}). \
         Identify recurring patterns, anomalies and likely root causes within this part only.\n\n{}\n\
         --- log lines {}-{} ---\n{}\n--- end of log lines ---\n",
        chunk_id + 1,
        total,
        filename,
        chunk.line_range.start,
        chunk.line_range.end,
        ANALYSIS_FORMAT,
        chunk.line_range.start,
        chunk.line_range.end,
        chunk.content
    )
}

pub fn consolidation_prompt(filename: &str, chunks: &[ChunkAnalysisResult]) -> String {
    let mut out = format!(
        "You analyzed the log file '{filename}' in {} parts. \
         Consolidate the per-part findings below into one analysis: \
         merge duplicates, cross-reference findings that span parts and keep line references where useful.\n\n",
        chunks.len()
    );
    for c in chunks {
        out.push_str(&format!("### Part {} (lines {}-{})\n", c.chunk_id + 1, c.line_range.start, c.line_range.end));
        render_labeled(&mut out, "Patterns", &c.patterns);
        render_labeled(&mut out, "Anomalies", &c.anomalies);
        render_labeled(&mut out, "Root causes", &c.root_causes);
        out.push('\n');
    }
    out.push_str(ANALYSIS_FORMAT);
    out
}

pub fn comparison_prompt(files: &[FileAnalysisResult]) -> String {
    let mut out = format!(
        "Compare the analyses of these {} log files. Find patterns, anomalies and root causes shared by \
         more than one file, and correlations between events across files.\n\n",
        files.len()
    );
    for f in files {
        out.push_str(&format!("### File: {} ({} bytes)\n", f.filename, f.file_size));
        render_labeled(&mut out, "Patterns", &f.analysis.patterns);
        render_labeled(&mut out, "Anomalies", &f.analysis.anomalies);
        render_labeled(&mut out, "Root causes", &f.analysis.root_causes);
        if !f.analysis.summary.is_empty() {
            out.push_str(&format!("Summary: {}\n", f.analysis.summary));
        }
        out.push('\n');
    }
    out.push_str(COMPARISON_FORMAT);
    out
}

pub fn issue_keywords_prompt(analysis: &LogAnalysisResult, max_queries: usize) -> String {
    let mut findings = String::new();
    render_list(&mut findings, "ANOMALIES", &analysis.anomalies);
    render_list(&mut findings, "ROOT CAUSES", &analysis.root_causes);
    format!(
        "Given these log analysis findings, propose up to {max_queries} short search queries (2-6 words each) \
         that would find related reports in an issue tracker. Prefer exact error names and component names.\n\n\
         {findings}\
         Answer with JSON only, in the form {{\"queries\": [\"...\"]}}.\n"
    )
}

fn render_labeled(out: &mut String, label: &str, items: &[String]) {
    if items.is_empty() {
        out.push_str(&format!("{label}: none\n"));
        return;
    }
    out.push_str(&format!("{label}:\n"));
    for item in items {
        out.push_str(&format!("- {item}\n"));
    }
}
