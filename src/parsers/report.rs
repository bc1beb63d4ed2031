use crate::{Reconciliation, RecordError, parse_record};
use thiserror::Error;

pub const RECONCILIATION_MARKER: &str = "Reconciliation:";
pub const SPECIES_TREE_MARKER: &str = "Species Tree:";
pub const GENE_TREE_MARKER: &str = "Gene Tree:";
pub const ROOTED_MARKER: &str = "(rooted)";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Invalid report; missing marker: \"{marker}\".")]
    MissingMarker { marker: &'static str },
    #[error("The \"Reconciliation:\" block is not terminated by a blank line.")]
    MissingTerminator,
    #[error("No tree description follows \"{marker}\".")]
    MissingTreeLine { marker: &'static str },
    #[error("Malformed reconciliation record at line {line}: {source}.")]
    MalformedRecord { line: usize, source: RecordError },
}

pub type ReportResult<T> = Result<T, ReportError>;

/// The parts of a RANGER-DTL report the converter needs.
#[derive(Debug, Clone)]
pub struct Report {
    species_tree: String,
    gene_tree: String,
    rooted: bool,
    reconciliation: Reconciliation,
}

impl Report {
    pub fn species_tree(&self) -> &str { &self.species_tree }
    pub fn gene_tree(&self) -> &str { &self.gene_tree }
    pub fn rooted(&self) -> bool { self.rooted }
    pub fn reconciliation(&self) -> &Reconciliation { &self.reconciliation }
}

/// Extracts both trees, the rooted flag and the reconciliation records.
///
/// Any missing marker or malformed record fails the whole report.
pub fn parse_report(content: &str) -> ReportResult<Report> {
    let lines: Vec<&str> = content.lines().collect();

    let species_tree =
        require_tree(&lines, locate_species_tree(&lines), SPECIES_TREE_MARKER)?;
    let gene_tree =
        require_tree(&lines, locate_gene_tree(&lines), GENE_TREE_MARKER)?;
    let rooted = is_rooted(&lines);
    let (start, end) = locate_event_block(&lines)?;

    let mut records = Vec::with_capacity(end - start);
    for (line_index, line) in lines.iter().enumerate().take(end).skip(start) {
        let record = parse_record(line).map_err(|source| {
            ReportError::MalformedRecord { line: line_index + 1, source }
        })?;
        tracing::trace!(
            line = line_index + 1,
            node = record.node_name(),
            kind = %record.kind(),
            "parsed record"
        );
        records.push(record);
    }

    Ok(Report {
        species_tree: species_tree.to_string(),
        gene_tree: gene_tree.to_string(),
        rooted,
        reconciliation: Reconciliation::new(records),
    })
}

/// Returns `(start, end)`: `start` is the line after the first line
/// containing "Reconciliation:", `end` the first blank line after it.
/// The block is `lines[start..end]`.
pub fn locate_event_block(lines: &[&str]) -> ReportResult<(usize, usize)> {
    let marker_index = lines
        .iter()
        .position(|line| line.contains(RECONCILIATION_MARKER))
        .ok_or(ReportError::MissingMarker { marker: RECONCILIATION_MARKER })?;
    let start = marker_index + 1;

    let end = lines[start..]
        .iter()
        .position(|line| line.trim().is_empty())
        .ok_or(ReportError::MissingTerminator)?;

    Ok((start, start + end))
}

/// The line right after the first line containing "Species Tree:".
pub fn locate_species_tree<'a>(lines: &[&'a str]) -> Option<&'a str> {
    line_after(lines, SPECIES_TREE_MARKER)
}

/// The line right after the first line containing "Gene Tree:".
pub fn locate_gene_tree<'a>(lines: &[&'a str]) -> Option<&'a str> {
    line_after(lines, GENE_TREE_MARKER)
}

/// True if any line contains "(rooted)".
pub fn is_rooted(lines: &[&str]) -> bool {
    lines.iter().any(|line| line.contains(ROOTED_MARKER))
}

fn line_after<'a>(lines: &[&'a str], marker: &str) -> Option<&'a str> {
    let marker_index = lines.iter().position(|line| line.contains(marker))?;
    lines.get(marker_index + 1).copied()
}

fn require_tree<'a>(
    lines: &[&str],
    located: Option<&'a str>,
    marker: &'static str,
) -> ReportResult<&'a str> {
    if !lines.iter().any(|line| line.contains(marker)) {
        return Err(ReportError::MissingMarker { marker });
    }
    match located.map(str::trim) {
        Some(tree) if !tree.is_empty() => Ok(tree),
        _ => Err(ReportError::MissingTreeLine { marker }),
    }
}
