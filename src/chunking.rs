use serde::{Deserialize, Serialize};

use crate::types::{ChunkDescriptor, LineRange};

pub const DEFAULT_CHUNK_MAX_BYTES: usize = 500 * 1024;
pub const DEFAULT_CHUNK_MAX_LINES: usize = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkLimits {
    pub max_bytes: usize,
    pub max_lines: usize,
}

impl Default for ChunkLimits {
    fn default() -> Self {
        Self { max_bytes: DEFAULT_CHUNK_MAX_BYTES, max_lines: DEFAULT_CHUNK_MAX_LINES }
    }
}

/// Whether `content` would produce more than one chunk under `limits`.
pub fn needs_chunking(content: &str, limits: &ChunkLimits) -> bool {
    if content.is_empty() {
        return false;
    }
    // sum of (line len + 1) over all lines is content.len() + 1
    let line_count = content.split('\n').count();
    line_count > 1 && (content.len() + 1 > limits.max_bytes || line_count > limits.max_lines)
}

/// Split `content` into line-aligned chunks.
/// - a line costs `len + 1` bytes (its newline)
/// - a chunk is closed before the line that would push it past `max_bytes`,
///   or once it already holds `max_lines` lines
/// - a single line larger than `max_bytes` still forms its own chunk
///
/// Joining every chunk's content with `\n` gives back `content` exactly.
pub fn split_into_chunks(content: &str, limits: &ChunkLimits) -> Vec<ChunkDescriptor> {
    let mut out = Vec::new();
    if content.is_empty() {
        return out;
    }

    let mut buf: Vec<&str> = Vec::new();
    let mut buf_bytes: usize = 0;
    let mut start_line: usize = 1;

    fn flush(buf: &mut Vec<&str>, buf_bytes: &mut usize, start_line: &mut usize, out: &mut Vec<ChunkDescriptor>) {
        if buf.is_empty() {
            return;
        }
        let end = *start_line + buf.len() - 1;
        out.push(ChunkDescriptor {
            content: buf.join("\n"),
            line_range: LineRange { start: *start_line, end },
        });
        *start_line = end + 1;
        buf.clear();
        *buf_bytes = 0;
    }

    for line in content.split('\n') {
        let line_size = line.len() + 1;
        if !buf.is_empty() && (buf_bytes + line_size > limits.max_bytes || buf.len() >= limits.max_lines) {
            flush(&mut buf, &mut buf_bytes, &mut start_line, &mut out);
        }
        buf.push(line);
        buf_bytes += line_size;
    }
    flush(&mut buf, &mut buf_bytes, &mut start_line, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits(max_bytes: usize, max_lines: usize) -> ChunkLimits {
        ChunkLimits { max_bytes, max_lines }
    }

    #[test]
    fn empty_input_has_no_chunks() {
        assert!(split_into_chunks("", &ChunkLimits::default()).is_empty());
        assert!(!needs_chunking("", &ChunkLimits::default()));
    }

    #[test]
    fn small_input_is_one_chunk() {
        let chunks = split_into_chunks("a\nb\nc", &ChunkLimits::default());
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].line_range, LineRange { start: 1, end: 3 });
        assert_eq!(chunks[0].content, "a\nb\nc");
    }

    #[test]
    fn byte_threshold_closes_chunk_before_overflowing_line() {
        // each line costs 4 bytes; 8 bytes fit two lines
        let chunks = split_into_chunks("aaa\nbbb\nccc\nddd\neee", &limits(8, 100));
        let ranges: Vec<_> = chunks.iter().map(|c| (c.line_range.start, c.line_range.end)).collect();
        assert_eq!(ranges, vec![(1, 2), (3, 4), (5, 5)]);
    }

    #[test]
    fn oversized_line_gets_its_own_chunk() {
        let big = "x".repeat(50);
        let text = format!("a\n{big}\nb");
        let chunks = split_into_chunks(&text, &limits(10, 100));
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1].content, big);
        assert_eq!(chunks[1].line_range, LineRange { start: 2, end: 2 });
    }

    #[test]
    fn trailing_newline_is_preserved() {
        let text = "one\ntwo\n";
        let chunks = split_into_chunks(text, &limits(1024, 2));
        let rejoined: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(rejoined.join("\n"), text);
        assert_eq!(chunks.last().map(|c| c.line_range.end), Some(3));
    }
}
