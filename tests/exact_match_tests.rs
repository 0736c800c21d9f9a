use logsift::exact_match::{find_exact_matches, ExactMatchConfig, FileContent};
use logsift::{FileOccurrence, LineCategory};

fn files<'a>(contents: &[(&'a str, &'a str)]) -> Vec<FileContent<'a>> {
    contents.iter().map(|&(filename, content)| FileContent { filename, content }).collect()
}

#[test]
fn error_line_shared_across_files_with_second_group() {
    let a = "2024-01-01T00:00:00Z ERROR db down\nsome unrelated line here\n\
             2024-01-01T00:00:05Z ERROR db down\nWARN cache nearly full\n";
    let b = "2024-01-02T10:00:00Z ERROR db down\nWARN cache nearly full\n";
    let out = find_exact_matches(&files(&[("a.log", a), ("b.log", b)]), &ExactMatchConfig::default());
    assert_eq!(out.len(), 2);

    let db = &out[0];
    assert_eq!(db.category, LineCategory::Error);
    assert_eq!(db.total_count, 3);
    assert_eq!(db.line, "2024-01-01T00:00:00Z ERROR db down");
    assert_eq!(
        db.occurrences,
        vec![
            FileOccurrence { filename: "a.log".into(), line_numbers: vec![1, 3] },
            FileOccurrence { filename: "b.log".into(), line_numbers: vec![1] },
        ]
    );
    assert_eq!(out[1].category, LineCategory::Warning);
    assert_eq!(out[1].total_count, 2);
}

#[test]
fn single_qualifying_group_reports_nothing() {
    let a = "2024-01-01T00:00:00Z ERROR db down\nonly in file a, nowhere else\n";
    let b = "2024-01-01T00:00:09Z ERROR db down\nonly in file b, nowhere else\n";
    assert!(find_exact_matches(&files(&[("a", a), ("b", b)]), &ExactMatchConfig::default()).is_empty());
}

#[test]
fn lines_from_one_file_only_are_never_reported() {
    let a = "repeated line in a only\nrepeated line in a only\nshared line number one\nshared line number two\n";
    let b = "shared line number one\nshared line number two\n";
    let out = find_exact_matches(&files(&[("a", a), ("b", b)]), &ExactMatchConfig::default());
    assert_eq!(out.len(), 2);
    assert!(out.iter().all(|m| m.occurrences.len() >= 2));
    assert!(out.iter().all(|m| !m.line.contains("a only")));
}

#[test]
fn volatile_tokens_do_not_break_matches() {
    let a = "[2024-01-01 00:00:00] Worker pid:12 handled request 550e8400-e29b-41d4-a716-446655440000 at 0x7ffe\n\
             01/02/2024 10:11:12 Conn[3] reset by peer\n";
    let b = "[2025-06-30 23:59:59] worker pid:9999 handled request 123e4567-e89b-12d3-a456-426614174000 at 0xdead\n\
             13:14:15.123 Conn[42] reset by peer\n";
    let out = find_exact_matches(&files(&[("a", a), ("b", b)]), &ExactMatchConfig::default());
    assert_eq!(out.len(), 2);
    assert!(out.iter().all(|m| m.total_count == 2));
}

#[test]
fn sorted_by_category_then_count() {
    let a = "debug: cache warmup done\ninfo service ready on port\ninfo service ready on port\n\
             ERROR upstream timeout\nplain shared text line\n";
    let b = "debug: cache warmup done\ninfo service ready on port\nERROR upstream timeout\nplain shared text line\n";
    let c = "info service ready on port\nplain shared text line\n";
    let out = find_exact_matches(&files(&[("a", a), ("b", b), ("c", c)]), &ExactMatchConfig::default());
    let cats: Vec<LineCategory> = out.iter().map(|m| m.category).collect();
    assert_eq!(cats, vec![LineCategory::Error, LineCategory::Info, LineCategory::Debug, LineCategory::Other]);
    assert_eq!(out[1].total_count, 4);
    assert_eq!(out[1].occurrences.len(), 3);
}

#[test]
fn within_category_higher_counts_first() {
    let a = "error one happened here\nerror two happened here\nerror two happened here\n";
    let b = "error one happened here\nerror two happened here\n";
    let out = find_exact_matches(&files(&[("a", a), ("b", b)]), &ExactMatchConfig::default());
    assert_eq!(out[0].line, "error two happened here");
    assert_eq!(out[0].total_count, 3);
    assert_eq!(out[1].total_count, 2);
}

#[test]
fn line_numbers_capped_but_count_is_not() {
    let repeated = vec!["WARN retrying connection"; 25].join("\n");
    let a = format!("{repeated}\nsecond shared line here");
    let b = "WARN retrying connection\nsecond shared line here";
    let out = find_exact_matches(&files(&[("a", a.as_str()), ("b", b)]), &ExactMatchConfig::default());
    let warn = out.iter().find(|m| m.category == LineCategory::Warning).unwrap();
    assert_eq!(warn.total_count, 26);
    assert_eq!(warn.occurrences[0].line_numbers, (1..=10).collect::<Vec<_>>());
}

#[test]
fn result_list_is_capped() {
    let content: String = (0..80).map(|i| format!("shared message number {i}\n")).collect();
    let inputs = files(&[("a", content.as_str()), ("b", content.as_str())]);
    let out = find_exact_matches(&inputs, &ExactMatchConfig::default());
    assert_eq!(out.len(), 50);
    // all ties: first-seen order survives
    assert_eq!(out[0].line, "shared message number 0");
}

#[test]
fn custom_thresholds() {
    let cfg = ExactMatchConfig { min_line_len: 3, max_line_numbers: 1, max_results: 1, min_groups: 1 };
    let out = find_exact_matches(&files(&[("a", "abc\nabc"), ("b", "abc")]), &cfg);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].occurrences[0].line_numbers, vec![1]);
    assert_eq!(out[0].total_count, 3);
}

#[test]
fn many_files_of_unique_lines() {
    let mut contents: Vec<(String, String)> = (0..60)
        .map(|f| {
            let body: String = (0..200).map(|l| format!("host-{f} emitted event number {l}\n")).collect();
            (format!("node{f}.log"), body)
        })
        .collect();
    {
        let inputs: Vec<FileContent<'_>> =
            contents.iter().map(|(n, c)| FileContent { filename: n, content: c }).collect();
        assert!(find_exact_matches(&inputs, &ExactMatchConfig::default()).is_empty());
    }

    for i in [0, 59] {
        contents[i].1.push_str("ERROR disk quota exceeded\nWARN fsync took too long\n");
    }
    let inputs: Vec<FileContent<'_>> =
        contents.iter().map(|(n, c)| FileContent { filename: n, content: c }).collect();
    let out = find_exact_matches(&inputs, &ExactMatchConfig::default());
    assert_eq!(out.len(), 2);
    assert_eq!(
        out[0].occurrences,
        vec![
            FileOccurrence { filename: "node0.log".into(), line_numbers: vec![201] },
            FileOccurrence { filename: "node59.log".into(), line_numbers: vec![201] },
        ]
    );
}
