use std::fmt::Display;
use thiserror::Error;

const MAPPING_KEYWORD: &str = "Mapping";
const RECIPIENT_DELIMITER: &str = ", Recipient";
const ARROW: &str = "-->";
const NAME_DELIMITER: &str = " =";
const LEAF_NAME_DELIMITER: &str = ":";

/// The event a reconciliation record assigns to a gene-tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Transfer,
    Duplication,
    Speciation,
    Leaf,
}

impl EventKind {
    /// Keyword tested against a report line, in priority order. A line that
    /// matches none of them is a [EventKind::Leaf].
    const PRIORITY: [EventKind; 3] =
        [EventKind::Transfer, EventKind::Duplication, EventKind::Speciation];

    pub fn keyword(&self) -> &'static str {
        match self {
            EventKind::Transfer => "Transfer",
            EventKind::Duplication => "Duplication",
            EventKind::Speciation => "Speciation",
            EventKind::Leaf => "Leaf",
        }
    }
}

impl Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("missing \"{0}\" delimiter")]
    MissingDelimiter(&'static str),
    #[error("empty node name")]
    MissingNodeName,
    #[error("no species after \"Mapping -->\"")]
    MissingMapping,
    #[error("transfer without a \"Recipient -->\" species")]
    MissingRecipient,
}

/// The species pair in `LCA[a, b]`. Informational only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LcaPair {
    pub first: String,
    pub second: String,
}

/// One line of the reconciliation block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationRecord {
    node_name: String,
    kind: EventKind,
    mapped_species: String,
    recipient_species: Option<String>,
    lca: Option<LcaPair>,
    line: String,
}

impl ReconciliationRecord {
    pub fn node_name(&self) -> &str { &self.node_name }
    pub fn kind(&self) -> EventKind { self.kind }
    pub fn mapped_species(&self) -> &str { &self.mapped_species }
    pub fn recipient_species(&self) -> Option<&str> { self.recipient_species.as_deref() }
    pub fn lca(&self) -> Option<&LcaPair> { self.lca.as_ref() }
    pub fn line(&self) -> &str { &self.line }
    pub fn is_leaf(&self) -> bool { self.kind == EventKind::Leaf }
}

/// Determines the event kind of a report line.
///
/// Keywords are tested as substrings in fixed priority order, so a line
/// mentioning both "Transfer" and "Duplication" is a transfer.
pub fn classify(line: &str) -> EventKind {
    EventKind::PRIORITY
        .into_iter()
        .find(|kind| line.contains(kind.keyword()))
        .unwrap_or(EventKind::Leaf)
}

/// Classifies and parses a report line.
pub fn parse_record(line: &str) -> Result<ReconciliationRecord, RecordError> {
    extract_fields(line, classify(line))
}

/// Parses the fields of a report line already classified as `kind`.
///
/// Grammar:
/// - internal: `Name = LCA[a, b]: Kind, Mapping --> Species`
///   (transfers append `, Recipient --> Species`)
/// - leaf: `Name: Leaf Node.`; a leaf's species location is its own name.
pub fn extract_fields(
    line: &str,
    kind: EventKind,
) -> Result<ReconciliationRecord, RecordError> {
    let line = line.trim_end();

    if kind == EventKind::Leaf {
        let (name, _) = line
            .split_once(LEAF_NAME_DELIMITER)
            .ok_or(RecordError::MissingDelimiter(LEAF_NAME_DELIMITER))?;
        let name = non_empty(name.trim(), RecordError::MissingNodeName)?;
        return Ok(ReconciliationRecord {
            node_name: name.to_string(),
            kind,
            mapped_species: name.to_string(),
            recipient_species: None,
            lca: None,
            line: line.to_string(),
        });
    }

    let (name, rest) = line
        .split_once(NAME_DELIMITER)
        .ok_or(RecordError::MissingDelimiter(NAME_DELIMITER))?;
    let name = non_empty(name.trim(), RecordError::MissingNodeName)?;

    let (_, mapping) = rest
        .split_once(MAPPING_KEYWORD)
        .ok_or(RecordError::MissingDelimiter(MAPPING_KEYWORD))?;
    let mapping = strip_arrow(mapping);

    let (mapped_species, recipient_species) = match kind {
        EventKind::Transfer => {
            let (mapped, recipient) = mapping
                .split_once(RECIPIENT_DELIMITER)
                .ok_or(RecordError::MissingRecipient)?;
            let recipient =
                non_empty(strip_arrow(recipient), RecordError::MissingRecipient)?;
            (mapped.trim(), Some(recipient.to_string()))
        }
        _ => (mapping, None),
    };
    let mapped_species = non_empty(mapped_species, RecordError::MissingMapping)?;

    Ok(ReconciliationRecord {
        node_name: name.to_string(),
        kind,
        mapped_species: mapped_species.to_string(),
        recipient_species,
        lca: parse_lca(rest),
        line: line.to_string(),
    })
}

fn non_empty(s: &str, err: RecordError) -> Result<&str, RecordError> {
    if s.is_empty() { Err(err) } else { Ok(s) }
}

/// `" --> n1"` -> `"n1"`
fn strip_arrow(s: &str) -> &str {
    let s = s.trim();
    s.strip_prefix(ARROW).unwrap_or(s).trim()
}

fn parse_lca(s: &str) -> Option<LcaPair> {
    let start = s.find('[')?;
    let end = s[start..].find("]:")? + start;
    let (first, second) = s[start + 1..end].split_once(',')?;
    Some(LcaPair {
        first: first.trim().to_string(),
        second: second.trim().to_string(),
    })
}
