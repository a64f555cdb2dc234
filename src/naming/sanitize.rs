/// Characters rejected by at least one common destination filesystem
/// (FAT32 and NTFS are the strictest).
pub fn is_illegal(c: char) -> bool {
    matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') || c.is_control()
}

/// Replace illegal characters and trim what FAT32 would drop silently.
pub fn sanitize(name: &str, replacement: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if is_illegal(c) {
            out.push_str(replacement);
        } else {
            out.push(c);
        }
    }
    out.trim()
        .trim_end_matches(|c: char| c == '.' || c.is_whitespace())
        .to_string()
}

/// Cut `s` to at most `max_bytes` without splitting a character.
pub fn truncate(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s[..end].trim_end()
}
