/// Returns `true` for characters Telegram accepts in a `start` parameter.
pub fn is_payload_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Reduces an arbitrary reference to the deep-link alphabet `[A-Za-z0-9_-]`.
///
/// Every other character becomes `_`, runs of `_` collapse to one, and
/// leading/trailing `_` are stripped. The result may be empty.
pub fn sanitize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        let c = if is_payload_char(c) { c } else { '_' };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    out.trim_matches('_').to_string()
}
