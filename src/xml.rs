/// C0 control characters (U+0000..=U+001F) are dropped from any text placed in
/// SVG output, tab and newline included.
fn is_control(c: char) -> bool {
    (c as u32) < 0x20
}

pub fn strip_control_chars(text: &str) -> String {
    text.chars().filter(|&c| !is_control(c)).collect()
}

pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if is_control(c) {
            continue;
        }
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::{escape_xml, strip_control_chars};

    #[test]
    fn remove_all_c0_controls() {
        let s = "A\u{0000}B\u{0007}C\tD\nE\u{001F}";
        assert_eq!(strip_control_chars(s), "ABCDE");
        assert_eq!(escape_xml(s), "ABCDE");
    }

    #[test]
    fn keep_space_and_non_ascii() {
        let s = "1234 5678 é";
        assert_eq!(strip_control_chars(s), s);
    }

    #[test]
    fn escape_special_xml_chars() {
        let s = r#"<tag attr="x&y">'z'"#;
        assert_eq!(
            escape_xml(s),
            "&lt;tag attr=&quot;x&amp;y&quot;&gt;&apos;z&apos;"
        );
    }
}
