//! Converts RANGER-DTL reconciliation reports into recPhyloXML.
//!
//! A report carries a species tree, a gene tree and one reconciliation
//! record per gene-tree node. [convert_report] parses all three, builds a
//! skeleton for each tree, places every record's event on the gene skeleton
//! (resolving where transfers land) and renders the two skeletons as one
//! document.

mod convert;
mod parsers;
mod phylo;
mod reconciliation;
mod recphylo;

pub use convert::ConversionSummary;
pub use convert::Conversion;
pub use convert::ConvertError;
pub use convert::ConvertOptions;
pub use convert::annotate_gene_skeleton;
pub use convert::convert_report;
pub use parsers::TreeParseError;
pub use parsers::newick::parse_newick;
pub use parsers::newick::parse_newick_tree;
pub use parsers::report::GENE_TREE_MARKER;
pub use parsers::report::RECONCILIATION_MARKER;
pub use parsers::report::ROOTED_MARKER;
pub use parsers::report::Report;
pub use parsers::report::ReportError;
pub use parsers::report::SPECIES_TREE_MARKER;
pub use parsers::report::is_rooted;
pub use parsers::report::locate_event_block;
pub use parsers::report::locate_gene_tree;
pub use parsers::report::locate_species_tree;
pub use parsers::report::parse_report;
pub use phylo::Node;
pub use phylo::NodeId;
pub use phylo::NodeType;
pub use phylo::Tree;
pub use phylo::TreeError;
pub use phylo::TreeFloat;
pub use reconciliation::EventKind;
pub use reconciliation::LcaPair;
pub use reconciliation::Reconciliation;
pub use reconciliation::ReconciliationRecord;
pub use reconciliation::RecipientError;
pub use reconciliation::RecipientMatch;
pub use reconciliation::RecipientResolution;
pub use reconciliation::RecordError;
pub use reconciliation::TransferBackTarget;
pub use reconciliation::classify;
pub use reconciliation::extract_fields;
pub use reconciliation::parse_record;
pub use reconciliation::resolve_recipients;
pub use recphylo::AnnotationIssue;
pub use recphylo::AnnotationOutcome;
pub use recphylo::EVENT_CONTAINER_TAG;
pub use recphylo::EventTag;
pub use recphylo::SerializationError;
pub use recphylo::SkeletonLayout;
pub use recphylo::TreeRole;
pub use recphylo::TreeSkeleton;
pub use recphylo::annotate;
pub use recphylo::assemble;
pub use recphylo::escape_xml;
pub use recphylo::to_document;
