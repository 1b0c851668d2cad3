//! Small SVG text helpers shared by the compositor.

/// Format a number for an SVG attribute: round to six decimal places and
/// trim trailing zeros, so the same input always yields the same text and
/// float noise never leaks into the document.
pub fn fmt_num(v: f64) -> String {
    let rounded = (v * 1e6).round() / 1e6;
    let mut s = format!("{:.6}", rounded);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    if s == "-0" {
        "0".to_string()
    } else {
        s
    }
}

/// Escape a string for use inside a double-quoted XML attribute.
pub fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
