use super::xml::{SerializationError, escape_xml};
use crate::parsers::newick::parse_newick_tree;
use crate::{EventKind, NodeId, ReconciliationRecord, Tree, TreeParseError};
use slotmap::SecondaryMap;
use std::fmt::Display;

pub const EVENT_CONTAINER_TAG: &str = "eventsRec";

/// Which half of the recPhyloXML document a skeleton renders.
///
/// The species role opens the document and the gene role closes it, so the
/// two renderings concatenate into one well-formed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeRole {
    Species,
    Gene,
}

impl Display for TreeRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TreeRole::Species => "species",
                TreeRole::Gene => "gene",
            }
        )
    }
}

/// Envelope tag names and indentation used when rendering skeletons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkeletonLayout {
    pub indent_width: usize,
    pub document_tag: String,
    pub species_tag: String,
    pub gene_tag: String,
}

impl Default for SkeletonLayout {
    fn default() -> Self {
        Self {
            indent_width: 2,
            document_tag: "recPhylo".to_string(),
            species_tag: "spTree".to_string(),
            gene_tag: "recGeneTree".to_string(),
        }
    }
}

/// One event-specific tag inside a node's `<eventsRec>` container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventTag {
    BranchingOut { species_location: String },
    TransferBack { destination_species: String },
    Duplication { species_location: String },
    Speciation { species_location: String },
    Leaf { species_location: String },
}

impl EventTag {
    /// The tag a record places on its own node. Transfers leave through
    /// `branchingOut`; the receiving side is placed separately.
    pub fn for_record(record: &ReconciliationRecord) -> Self {
        let species_location = record.mapped_species().to_string();
        match record.kind() {
            EventKind::Transfer => EventTag::BranchingOut { species_location },
            EventKind::Duplication => EventTag::Duplication { species_location },
            EventKind::Speciation => EventTag::Speciation { species_location },
            EventKind::Leaf => EventTag::Leaf { species_location },
        }
    }

    pub fn element(&self) -> &'static str {
        match self {
            EventTag::BranchingOut { .. } => "branchingOut",
            EventTag::TransferBack { .. } => "transferBack",
            EventTag::Duplication { .. } => "duplication",
            EventTag::Speciation { .. } => "speciation",
            EventTag::Leaf { .. } => "leaf",
        }
    }

    pub fn attribute(&self) -> (&'static str, &str) {
        match self {
            EventTag::TransferBack { destination_species } => {
                ("destinationSpecies", destination_species.as_str())
            }
            EventTag::BranchingOut { species_location }
            | EventTag::Duplication { species_location }
            | EventTag::Speciation { species_location }
            | EventTag::Leaf { species_location } => {
                ("speciesLocation", species_location.as_str())
            }
        }
    }

    fn render(&self) -> Result<String, SerializationError> {
        let element = self.element();
        let (key, value) = self.attribute();
        Ok(format!("<{element} {key}=\"{}\"></{element}>", escape_xml(value)?))
    }
}

/// A tree plus the event annotations attached to its nodes.
///
/// The tree is owned by the skeleton and never restructured; annotations are
/// kept per node and only turned into text by [TreeSkeleton::render].
#[derive(Debug, Clone)]
pub struct TreeSkeleton {
    pub(super) role: TreeRole,
    pub(super) rooted: bool,
    pub(super) tree: Tree,
    pub(super) events: SecondaryMap<NodeId, Vec<EventTag>>,
}

impl TreeSkeleton {
    /// Parses a NEWICK tree description into an unannotated skeleton.
    pub fn build(
        tree_description: &str,
        role: TreeRole,
        rooted: bool,
    ) -> Result<Self, TreeParseError> {
        let tree = parse_newick_tree(tree_description)?;
        Ok(Self::from_tree(tree, role, rooted))
    }

    pub fn from_tree(tree: Tree, role: TreeRole, rooted: bool) -> Self {
        Self { role, rooted, tree, events: SecondaryMap::new() }
    }

    pub fn role(&self) -> TreeRole {
        self.role
    }

    pub fn rooted(&self) -> bool {
        self.rooted
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Annotations on the named node, outermost first.
    pub fn events(&self, node_name: &str) -> &[EventTag] {
        self.tree
            .node_id_by_name(node_name)
            .and_then(|node_id| self.events.get(node_id))
            .map(|events| events.as_slice())
            .unwrap_or(&[])
    }

    /// Renders this skeleton's section of the document, one tag per line.
    pub fn render(
        &self,
        layout: &SkeletonLayout,
    ) -> Result<Vec<String>, SerializationError> {
        let mut writer = LineWriter::new(layout.indent_width);

        match self.role {
            TreeRole::Species => {
                writer.line(0, format!("<{}>", layout.document_tag));
                writer.line(1, format!("<{}>", layout.species_tag));
            }
            TreeRole::Gene => {
                writer.line(1, format!("<{}>", layout.gene_tag));
            }
        }

        writer.line(2, format!("<phylogeny rooted=\"{}\">", self.rooted));
        if let Some(first_node_id) = self.tree.first_node_id() {
            self.render_clade(first_node_id, 3, &mut writer)?;
        }
        writer.line(2, "</phylogeny>".to_string());

        match self.role {
            TreeRole::Species => {
                writer.line(1, format!("</{}>", layout.species_tag));
            }
            TreeRole::Gene => {
                writer.line(1, format!("</{}>", layout.gene_tag));
                writer.line(0, format!("</{}>", layout.document_tag));
            }
        }

        Ok(writer.lines)
    }

    fn render_clade(
        &self,
        node_id: NodeId,
        depth: usize,
        writer: &mut LineWriter,
    ) -> Result<(), SerializationError> {
        writer.line(depth, "<clade>".to_string());

        if let Some(name) = self.tree.name(&node_id) {
            writer.line(depth + 1, format!("<name>{}</name>", escape_xml(&name)?));
        }

        if let Some(events) = self.events.get(node_id)
            && !events.is_empty()
        {
            writer.line(depth + 1, format!("<{EVENT_CONTAINER_TAG}>"));
            for event in events {
                writer.line(depth + 2, event.render()?);
            }
            writer.line(depth + 1, format!("</{EVENT_CONTAINER_TAG}>"));
        }

        // Events sit directly under the name; the branch length follows them.
        if let Some(branch_length) = self.tree.branch_length(&node_id) {
            writer.line(
                depth + 1,
                format!("<branch_length>{branch_length:?}</branch_length>"),
            );
        }

        for &child_id in self.tree.child_ids(&node_id) {
            self.render_clade(child_id, depth + 1, writer)?;
        }

        writer.line(depth, "</clade>".to_string());
        Ok(())
    }
}

struct LineWriter {
    indent_width: usize,
    lines: Vec<String>,
}

impl LineWriter {
    fn new(indent_width: usize) -> Self {
        Self { indent_width, lines: Vec::new() }
    }

    fn line(&mut self, depth: usize, tag: String) {
        self.lines.push(format!("{}{tag}", " ".repeat(depth * self.indent_width)));
    }
}
