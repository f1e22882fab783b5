// src/util.rs — Shared utility functions

/// Truncate a string for display/logging (UTF-8 safe).
///
/// Returns a substring of at most `max_len` bytes, ensuring the cut
/// point falls on a valid UTF-8 character boundary.
pub fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        &s[..end]
    }
}

/// Split a reply into chunks of at most `max_len` bytes, breaking on line
/// boundaries where possible. Lines longer than `max_len` are cut on a char
/// boundary.
pub fn split_message(text: &str, max_len: usize) -> Vec<String> {
    if text.len() <= max_len || max_len == 0 {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in text.split('\n') {
        let mut line = line;
        // Oversized line: flush and hard-cut
        while line.len() > max_len {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            let mut cut = truncate_str(line, max_len).len();
            if cut == 0 {
                cut = line.chars().next().map_or(line.len(), char::len_utf8);
            }
            chunks.push(line[..cut].to_string());
            line = &line[cut..];
        }

        let needed = if current.is_empty() { line.len() } else { current.len() + 1 + line.len() };
        if needed > max_len {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
