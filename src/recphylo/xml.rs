use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerializationError {
    #[error("\"{value}\" contains U+{code:04X}, which XML 1.0 cannot represent")]
    InvalidCharacter { value: String, code: u32 },
    #[error("expected a {expected} skeleton, got a {found} skeleton")]
    RoleMismatch { expected: String, found: String },
}

/// Escapes reserved markup characters for use in element text or a quoted
/// attribute value.
pub fn escape_xml(value: &str) -> Result<String, SerializationError> {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c if is_xml_char(c) => escaped.push(c),
            c => {
                return Err(SerializationError::InvalidCharacter {
                    value: value.to_string(),
                    code: c as u32,
                });
            }
        }
    }
    Ok(escaped)
}

/// The `Char` production of XML 1.0.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}
