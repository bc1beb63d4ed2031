use super::super::TreeParseError;

/// Pre-validates a single NEWICK tree string before it is parsed.
pub(crate) fn check_newick_structure(s: &str) -> Result<(), TreeParseError> {
    let s = s.trim();

    if !s.ends_with(';') {
        return Err(invalid("missing terminating ';'"));
    }

    let content = s[..s.len() - 1].trim();
    if content.is_empty() {
        return Err(invalid("empty tree"));
    }

    let has_parens = content.contains('(') || content.contains(')');
    let has_valid_chars =
        content.chars().any(|c| c.is_alphanumeric() || "_-'\"".contains(c));
    if !has_parens && !has_valid_chars {
        return Err(invalid("no clades or labels"));
    }

    check_balanced_delimiters(content)
}

fn invalid(message: &str) -> TreeParseError {
    TreeParseError::InvalidNewick(message.to_string())
}

/// Checks that parentheses and brackets balance and that quotes are closed.
fn check_balanced_delimiters(s: &str) -> Result<(), TreeParseError> {
    let mut paren_depth: i32 = 0;
    let mut bracket_depth: i32 = 0;
    let mut quote_char: Option<char> = None;

    for c in s.chars() {
        match (quote_char, c) {
            (Some(q), c) if c == q => quote_char = None,
            (Some(_), _) => {}
            (None, '[') => bracket_depth += 1,
            (None, ']') => {
                bracket_depth -= 1;
                if bracket_depth < 0 {
                    return Err(invalid("unbalanced ']'"));
                }
            }
            // Comments are free text.
            (None, _) if bracket_depth > 0 => {}
            (None, '\'' | '"') => quote_char = Some(c),
            (None, '(') => paren_depth += 1,
            (None, ')') => {
                paren_depth -= 1;
                if paren_depth < 0 {
                    return Err(invalid("unbalanced ')'"));
                }
            }
            _ => {}
        }
    }

    match (paren_depth, bracket_depth, quote_char) {
        (0, 0, None) => Ok(()),
        (_, _, Some(q)) => Err(invalid(&format!("unclosed quote {q}"))),
        (0, _, None) => Err(invalid("unclosed '['")),
        _ => Err(invalid("unclosed '('")),
    }
}
