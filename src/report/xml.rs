// XML helpers for the JUnit writer

use once_cell::sync::Lazy;
use regex::Regex;

/// Entity reference at the start of the input
static ENTITY_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^&(?:amp|lt|gt|quot|apos|#([0-9]+)|#[xX]([0-9a-fA-F]+));")
        .expect("invalid entity regex")
});

/// Code points allowed by the XML 1.0 `Char` production
fn is_xml_char(code: u32) -> bool {
    matches!(
        code,
        0x9 | 0xA | 0xD | 0x20..=0xD7FF | 0xE000..=0xFFFD | 0x10000..=0x10FFFF
    )
}

/// Whether `rest` starts with a reference that is already valid XML
fn starts_with_reference(rest: &str) -> bool {
    let Some(caps) = ENTITY_REF.captures(rest) else {
        return false;
    };

    let code = if let Some(dec) = caps.get(1) {
        dec.as_str().parse::<u32>().ok()
    } else if let Some(hex) = caps.get(2) {
        u32::from_str_radix(hex.as_str(), 16).ok()
    } else {
        return true;
    };

    code.is_some_and(is_xml_char)
}

/// Escape the five XML special characters.
///
/// An `&` that already starts a valid entity or character reference is kept
/// as is, so `escape(escape(s)) == escape(s)`. Character references to code
/// points XML forbids are escaped like plain text.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for (i, ch) in value.char_indices() {
        match ch {
            '&' if starts_with_reference(&value[i..]) => out.push('&'),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Build an element tag from ordered attributes.
///
/// With `close` the tag is self-closing, otherwise only the opening tag is
/// produced. Attributes whose value is `None` are left out.
pub fn tag(name: &str, attrs: &[(&str, Option<String>)], close: bool) -> String {
    let pairs: Vec<String> = attrs
        .iter()
        .filter_map(|(key, value)| {
            value
                .as_ref()
                .map(|value| format!("{}=\"{}\"", key, escape(value)))
        })
        .collect();

    let end = if close { "/>" } else { ">" };
    if pairs.is_empty() {
        format!("<{}{}", name, end)
    } else {
        format!("<{} {}{}", name, pairs.join(" "), end)
    }
}

/// Wrap raw text in a character-data section.
///
/// A literal `]]>` is split across two sections.
pub fn cdata(body: &str) -> String {
    format!("<![CDATA[{}]]>", body.replace("]]>", "]]]]><![CDATA[>"))
}

/// Milliseconds as seconds, `0` for zero or NaN
pub fn seconds(duration_ms: f64) -> String {
    let secs = duration_ms / 1000.0;
    if secs.is_nan() || secs == 0.0 {
        "0".to_string()
    } else {
        secs.to_string()
    }
}
