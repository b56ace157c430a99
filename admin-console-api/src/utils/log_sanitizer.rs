//! Log sanitization utilities
//!
//! Prevents one-time secrets (API key client secrets, tokens) from reaching
//! debug/error logs, and keeps large response bodies from flooding them.

/// Maximum number of bytes to include in truncated log output.
const TRUNCATE_LIMIT: usize = 256;

/// JSON keys whose string values are replaced before logging.
const SECRET_KEYS: &[&str] = &["\"clientSecret\"", "\"token\"", "\"refreshToken\""];

const REDACTED: &str = "\"***\"";

/// MSRV-compatible replacement for `str::floor_char_boundary` (stable since 1.91.0).
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let mut i = index;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

/// Truncate a string for safe logging.
///
/// Returns the original string if it's within the limit, otherwise the first
/// `TRUNCATE_LIMIT` bytes with a suffix indicating the total length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        s.to_string()
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}

/// Replace the string value of every secret-bearing JSON key with `"***"`.
///
/// Works on raw text so that malformed bodies are still sanitized.
pub fn redact_secrets(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    loop {
        let next = SECRET_KEYS
            .iter()
            .filter_map(|key| rest.find(key).map(|idx| (idx, key.len())))
            .min_by_key(|(idx, _)| *idx);
        let Some((idx, key_len)) = next else {
            out.push_str(rest);
            break;
        };

        let after_key = idx + key_len;
        out.push_str(&rest[..after_key]);
        rest = &rest[after_key..];

        let value = rest.trim_start_matches(|c: char| c == ':' || c.is_whitespace());
        let separator_len = rest.len() - value.len();
        if !value.starts_with('"') {
            continue;
        }

        let Some(end) = closing_quote(value) else {
            out.push_str(rest);
            break;
        };
        out.push_str(&rest[..separator_len]);
        out.push_str(REDACTED);
        rest = &value[end + 1..];
    }

    out
}

/// Byte index of the quote closing the JSON string that starts at `s[0]`.
fn closing_quote(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

/// Redact then truncate.
pub fn sanitize_for_log(s: &str) -> String {
    truncate_for_log(&redact_secrets(s))
}
