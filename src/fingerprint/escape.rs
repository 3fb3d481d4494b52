//! CSS identifier escaping, equivalent to `CSS.escape`

use std::fmt::Write;

/// Escape `ident` for use after `#` or `.` in a selector
pub fn css_escape(ident: &str) -> String {
    let chars: Vec<char> = ident.chars().collect();
    let mut out = String::with_capacity(ident.len());

    for (i, &c) in chars.iter().enumerate() {
        let leading_digit = c.is_ascii_digit() && (i == 0 || (i == 1 && chars[0] == '-'));

        if c == '\0' {
            out.push('\u{FFFD}');
        } else if ('\u{1}'..='\u{1f}').contains(&c) || c == '\u{7f}' || leading_digit {
            let _ = write!(out, "\\{:x} ", c as u32);
        } else if i == 0 && c == '-' && chars.len() == 1 {
            out.push_str("\\-");
        } else if c as u32 >= 0x80 || c == '-' || c == '_' || c.is_ascii_alphanumeric() {
            out.push(c);
        } else {
            out.push('\\');
            out.push(c);
        }
    }

    out
}
