use crate::parsers::report::{ReportError, parse_report};
use crate::{
    AnnotationIssue, EventKind, EventTag, Reconciliation, RecipientError,
    SerializationError, SkeletonLayout, Tree, TreeParseError, TreeRole,
    TreeSkeleton, annotate, assemble, resolve_recipients, to_document,
};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Library-level settings for a conversion run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    pub layout: SkeletonLayout,
}

/// A failure that aborts the run, tagged with the stage that failed.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("parsing failed: {0}")]
    Parse(#[from] ReportError),
    #[error("parsing failed: {role} tree: {source}")]
    Tree { role: TreeRole, source: TreeParseError },
    #[error("serialization failed: {0}")]
    Serialization(#[from] SerializationError),
}

impl ConvertError {
    fn tree(role: TreeRole, source: TreeParseError) -> Self {
        ConvertError::Tree { role, source }
    }
}

/// What a run annotated, and which records it had to skip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    pub transfers: usize,
    pub duplications: usize,
    pub speciations: usize,
    pub leaves: usize,
    pub transfer_backs: usize,
    pub issues: Vec<AnnotationIssue>,
}

impl ConversionSummary {
    fn count(&mut self, kind: EventKind) {
        match kind {
            EventKind::Transfer => self.transfers += 1,
            EventKind::Duplication => self.duplications += 1,
            EventKind::Speciation => self.speciations += 1,
            EventKind::Leaf => self.leaves += 1,
        }
    }

    fn push_issue(&mut self, issue: AnnotationIssue) {
        warn!("{issue}");
        self.issues.push(issue);
    }

    pub fn records(&self) -> usize {
        self.transfers + self.duplications + self.speciations + self.leaves
    }
}

#[derive(Debug, Clone)]
pub struct Conversion {
    pub lines: Vec<String>,
    pub document: String,
    pub summary: ConversionSummary,
}

/// Converts the text of a RANGER-DTL report into a recPhyloXML document.
///
/// Report and tree parsing failures abort. Records that cannot be placed are
/// skipped and listed in [ConversionSummary::issues].
pub fn convert_report(
    content: &str,
    options: &ConvertOptions,
) -> Result<Conversion, ConvertError> {
    let report = parse_report(content)?;
    debug!(
        records = report.reconciliation().len(),
        rooted = report.rooted(),
        "report parsed"
    );

    let rooted = report.rooted();
    let species =
        TreeSkeleton::build(report.species_tree(), TreeRole::Species, rooted)
            .map_err(|source| ConvertError::tree(TreeRole::Species, source))?;
    let mut gene =
        TreeSkeleton::build(report.gene_tree(), TreeRole::Gene, rooted)
            .map_err(|source| ConvertError::tree(TreeRole::Gene, source))?;
    tracing::trace!("species tree:\n{}", species.tree());
    tracing::trace!("gene tree:\n{}", gene.tree());

    let gene_tree = gene.tree().clone();
    let summary = annotate_gene_skeleton(
        &mut gene,
        report.reconciliation(),
        &gene_tree,
        species.tree(),
    );

    let lines = assemble(&species, &gene, &options.layout)?;
    info!(
        records = summary.records(),
        transfers = summary.transfers,
        duplications = summary.duplications,
        speciations = summary.speciations,
        leaves = summary.leaves,
        transfer_backs = summary.transfer_backs,
        issues = summary.issues.len(),
        "reconciliation converted"
    );

    Ok(Conversion { document: to_document(&lines), lines, summary })
}

/// Places every record's events on the gene skeleton, in report order.
///
/// `gene_tree` and `species_tree` are read-only views used to resolve
/// transfer recipients.
pub fn annotate_gene_skeleton(
    skeleton: &mut TreeSkeleton,
    reconciliation: &Reconciliation,
    gene_tree: &Tree,
    species_tree: &Tree,
) -> ConversionSummary {
    let mut summary = ConversionSummary::default();

    for record in reconciliation {
        debug!(node = record.node_name(), kind = %record.kind(), "annotating");
        summary.count(record.kind());

        if let Err(issue) =
            annotate(skeleton, record.node_name(), EventTag::for_record(record))
        {
            summary.push_issue(issue);
            continue;
        }

        let Some(recipient) = record.recipient_species() else {
            continue;
        };

        let resolution = match resolve_recipients(
            record.node_name(),
            recipient,
            reconciliation,
            gene_tree,
            species_tree,
        ) {
            Ok(resolution) => resolution,
            Err(RecipientError::SourceNotFound(node)) => {
                summary.push_issue(AnnotationIssue::UnresolvedNode {
                    node,
                    role: TreeRole::Gene,
                    event: "transferBack",
                });
                continue;
            }
        };

        if resolution.is_ambiguous() {
            summary.push_issue(AnnotationIssue::AmbiguousRecipient {
                donor: record.node_name().to_string(),
                recipient: recipient.to_string(),
                candidates: resolution.considered.clone(),
                applied: resolution
                    .targets
                    .iter()
                    .map(|target| target.node_name.clone())
                    .collect(),
            });
        }

        for target in resolution.targets {
            let event = EventTag::TransferBack {
                destination_species: target.destination_species,
            };
            match annotate(skeleton, &target.node_name, event) {
                Ok(_) => summary.transfer_backs += 1,
                Err(issue) => summary.push_issue(issue),
            }
        }
    }

    summary
}
