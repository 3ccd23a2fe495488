//! String utility functions for text processing

/// Split a block of text into trimmed, non-empty lines
///
/// Both `\n` and `\r\n` line endings are accepted.
pub fn split_lines(s: &str) -> Vec<String> {
    s.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Case-insensitive substring check
///
/// `needle` is expected to already be lowercase.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
