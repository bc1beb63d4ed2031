pub(crate) mod validation;

use super::TreeParseError;
use crate::{Node, NodeId, Tree, TreeFloat};
use validation::check_newick_structure;

/// Checks if a character is a NEWICK structural delimiter.
fn is_structural_delimiter(character: char) -> bool {
    matches!(character, ';' | '(' | ')' | ',')
}

/// Tracks quoting and square-bracket comments while scanning a NEWICK string.
///
/// Delimiters inside quotes or inside `[...]` are part of a label, never
/// structure. A doubled quote inside a quoted label closes and immediately
/// reopens the quote, which leaves the state correct without lookahead.
#[derive(Debug, Clone, Default)]
struct CharacterParseState {
    quote_char: Option<char>,
    square_bracket_depth: i32,
}

impl CharacterParseState {
    fn new() -> Self {
        Self::default()
    }

    fn in_quotes(&self) -> bool {
        self.quote_char.is_some()
    }

    fn in_comment(&self) -> bool {
        self.square_bracket_depth > 0
    }

    /// Feeds one character; returns true if it is an unquoted structural
    /// delimiter outside any comment.
    fn is_structural(&mut self, character: char) -> bool {
        match (self.quote_char, character) {
            (Some(q), c) if c == q => {
                self.quote_char = None;
                false
            }
            (Some(_), _) => false,
            (None, '\'' | '"') if !self.in_comment() => {
                self.quote_char = Some(character);
                false
            }
            (None, '[') => {
                self.square_bracket_depth += 1;
                false
            }
            (None, ']') => {
                self.square_bracket_depth -= 1;
                false
            }
            (None, c) => !self.in_comment() && is_structural_delimiter(c),
        }
    }
}

/// Parses NEWICK formatted strings into [Tree] objects.
///
/// Several trees may be given, each terminated by a semicolon. Unquoted
/// labels are kept verbatim (underscores are not translated to spaces),
/// since gene names such as `a_1` must survive unchanged.
pub fn parse_newick(newick_string: &str) -> Result<Vec<Tree>, TreeParseError> {
    let tree_strings = split_multi_newick_string(newick_string);
    if tree_strings.is_empty() {
        return Err(TreeParseError::EmptyInput);
    }

    tree_strings.iter().map(|s| parse_single_newick_tree(s)).collect()
}

/// Parses the first tree of a NEWICK string.
pub fn parse_newick_tree(newick_string: &str) -> Result<Tree, TreeParseError> {
    let tree_strings = split_multi_newick_string(newick_string);
    match tree_strings.first() {
        Some(tree_string) => parse_single_newick_tree(tree_string),
        None => Err(TreeParseError::EmptyInput),
    }
}

fn parse_single_newick_tree(s: &str) -> Result<Tree, TreeParseError> {
    check_newick_structure(s)?;

    let s = normalize_newick_string(s);
    let mut tree = Tree::new();
    let mut position: usize = 0;

    _ = parse_newick_recursive(&s, &mut position, None, &mut tree)?;

    if position != s.len() {
        return Err(TreeParseError::InvalidNewick(format!(
            "unexpected input after the tree at byte {position}: \"{}\"",
            &s[position..]
        )));
    }

    _ = tree.validate()?;
    Ok(tree)
}

/// Reads one clade starting at `position` and adds it under `parent_id`.
///
/// A clade is either a bare label (a tip) or a parenthesized, comma separated
/// list of clades followed by an optional label. On return `position` points
/// at the first byte after the clade's label.
fn parse_newick_recursive(
    s: &str,
    position: &mut usize,
    parent_id: Option<NodeId>,
    tree: &mut Tree,
) -> Result<NodeId, TreeParseError> {
    let node_id = tree.add_node(Node::default(), parent_id)?;

    if s[*position..].starts_with('(') {
        *position += 1;
        loop {
            _ = parse_newick_recursive(s, position, Some(node_id), tree)?;
            match s[*position..].chars().next() {
                Some(',') => *position += 1,
                Some(')') => {
                    *position += 1;
                    break;
                }
                other => {
                    return Err(TreeParseError::InvalidNewick(format!(
                        "expected ',' or ')' at byte {}, found {}",
                        *position,
                        other.map_or("end of input".to_string(), |c| {
                            format!("'{c}'")
                        })
                    )));
                }
            }
        }
    }

    let label_end = find_node_label_end(&s[*position..]);
    let raw_label = &s[*position..*position + label_end];
    *position += label_end;

    let (name, branch_length) = parse_newick_label(raw_label);
    if let Some(node) = tree.node_mut(Some(node_id)) {
        node.set_name(name.as_deref());
        node.set_branch_length(branch_length);
    }

    Ok(node_id)
}

/// Find the end position of a node label, respecting quotes and brackets.
fn find_node_label_end(input_string: &str) -> usize {
    let mut char_state = CharacterParseState::new();
    for (char_index, character) in input_string.char_indices() {
        if char_state.is_structural(character) {
            return char_index;
        }
    }
    input_string.len()
}

/// Parses a raw NEWICK label into (node name, branch length).
///
/// Example inputs: "n1", "a_1:0.5", "'gene A':0.5[&support=95]".
/// Bracket comments are dropped.
fn parse_newick_label(raw_label: &str) -> (Option<String>, Option<TreeFloat>) {
    let mut char_state = CharacterParseState::new();
    let mut label = String::with_capacity(raw_label.len());
    let mut colon_position: Option<usize> = None;

    for character in raw_label.chars() {
        let was_in_comment = char_state.in_comment();
        _ = char_state.is_structural(character);
        if was_in_comment || char_state.in_comment() {
            continue;
        }
        if character == ':' && !char_state.in_quotes() {
            colon_position = Some(label.len());
        }
        label.push(character);
    }

    let (name_part, branch_part) = match colon_position {
        Some(position) => (&label[..position], Some(&label[position + 1..])),
        None => (label.as_str(), None),
    };

    let name = match remove_quotes(name_part.trim()) {
        x if x.is_empty() => None,
        x => Some(x),
    };

    let branch_length =
        branch_part.and_then(|b| b.trim().parse::<TreeFloat>().ok());

    (name, branch_length)
}

fn remove_quotes(s: &str) -> String {
    for quote in ['\'', '"'] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            let inner = &s[1..s.len() - 1];
            let doubled: String = [quote, quote].iter().collect();
            return inner.replace(&doubled, &quote.to_string());
        }
    }
    s.to_string()
}

/// Splits input containing multiple NEWICK trees separated by semicolons.
///
/// Semicolons inside quotes or comments are ignored. A trailing tree without
/// a semicolon is kept.
fn split_multi_newick_string(s: &str) -> Vec<String> {
    let mut newick_trees: Vec<String> = Vec::new();
    let mut current_tree = String::new();
    let mut char_state = CharacterParseState::new();

    for character in s.chars() {
        current_tree.push(character);
        if char_state.is_structural(character) && character == ';' {
            let tree_str = current_tree.trim();
            if tree_str != ";" {
                newick_trees.push(tree_str.to_string());
            }
            current_tree.clear();
        }
    }

    let tree_str = current_tree.trim();
    if !tree_str.is_empty() {
        newick_trees.push(format!("{tree_str};"));
    }

    newick_trees
}

/// Removes whitespace outside quotes and comments, and the trailing semicolon.
fn normalize_newick_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut char_state = CharacterParseState::new();

    for character in s.chars() {
        let was_literal = char_state.in_quotes() || char_state.in_comment();
        _ = char_state.is_structural(character);
        if character.is_whitespace() && !was_literal {
            continue;
        }
        result.push(character);
    }

    result.trim_end_matches(';').to_string()
}
