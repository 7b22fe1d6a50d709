//! Escaping for hand-built XML and SVG documents.

pub fn xml_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            // Control characters other than tab/newline are not allowed in XML 1.0.
            ch if ch.is_control() && ch != '\t' && ch != '\n' && ch != '\r' => {}
            ch => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_and_drops_control_characters() {
        assert_eq!(
            xml_escape("Tom & Jerry's <\"show\">\u{0007}"),
            "Tom &amp; Jerry&apos;s &lt;&quot;show&quot;&gt;"
        );
    }
}
