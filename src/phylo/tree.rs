use super::TreeFloat;
use super::node::{Node, NodeId, NodeType};
use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use std::fmt::Display;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Default, Clone)]
pub struct Tree {
    nodes: SlotMap<NodeId, Node>,
    first_node_id: Option<NodeId>,
    name_index: FxHashMap<Arc<str>, NodeId>,
    tip_count_all: usize,
    internal_node_count_all: usize,
    node_count_all: usize,
    has_branch_lengths: bool,
}

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("Parent node with NodeId: {0} does not exist.")]
    ParentNodeDoesNotExist(NodeId),
    #[error("Tree validation failed: {0}.")]
    InvalidTree(String),
}

impl Tree {
    // =========================================================================
    // Construction & Validation
    // =========================================================================

    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(
        &mut self,
        node: Node,
        parent_node_id: Option<NodeId>,
    ) -> Result<NodeId, TreeError> {
        let node_ids = self.add_nodes(vec![node], parent_node_id)?;
        Ok(node_ids[0])
    }

    pub fn add_nodes(
        &mut self,
        nodes: impl Into<Vec<Node>>,
        parent_node_id: Option<NodeId>,
    ) -> Result<Vec<NodeId>, TreeError> {
        let mut nodes: Vec<Node> = nodes.into();

        if let Some(parent_node_id_value) = parent_node_id {
            if self.node_exists(parent_node_id) {
                for node in &mut nodes {
                    node.set_parent_id(parent_node_id);
                }
            } else {
                return Err(TreeError::ParentNodeDoesNotExist(
                    parent_node_id_value,
                ));
            }
        }

        let mut node_ids: Vec<NodeId> = Vec::new();

        for mut node in nodes {
            let node_id = self.nodes.insert_with_key(|node_id| {
                node.set_node_id(node_id);
                node
            });

            node_ids.push(node_id);

            if let Some(parent_node) = self.node_mut(parent_node_id) {
                parent_node.add_child_id(node_id);
            }
        }

        Ok(node_ids)
    }

    /// Sets node types, counts, and rebuilds the name index.
    ///
    /// Must be called once the topology is complete; lookups by name only
    /// see nodes that existed at the last validation.
    pub fn validate(&mut self) -> Result<NodeId, TreeError> {
        let mut count_of_tip: usize = 0;
        let mut count_of_internal: usize = 0;
        let mut count_of_first: usize = 0;
        let mut count_of_root: usize = 0;
        let mut has_branch_lengths: bool = false;

        for node in self.nodes.values_mut() {
            match node.set_node_type() {
                NodeType::Unset => {}
                NodeType::Tip => count_of_tip += 1,
                NodeType::Internal => count_of_internal += 1,
                NodeType::FirstNode => {
                    count_of_first += 1;
                    self.first_node_id = node.node_id().copied();
                }
                NodeType::Root => {
                    count_of_root += 1;
                    self.first_node_id = node.node_id().copied();
                }
            };

            if node.node_type() != NodeType::FirstNode
                && node.node_type() != NodeType::Root
                && node.branch_length().is_some()
            {
                has_branch_lengths = true;
            }
        }

        if count_of_first + count_of_root != 1 {
            return Err(TreeError::InvalidTree(format!(
                "count_of_first({count_of_first}) + count_of_root({count_of_root}) should equal 1"
            )));
        }

        self.tip_count_all = count_of_tip;
        self.internal_node_count_all =
            count_of_internal + count_of_first + count_of_root;
        self.node_count_all = self.tip_count_all + self.internal_node_count_all;
        self.has_branch_lengths = has_branch_lengths;

        self.rebuild_name_index();

        self.first_node_id.ok_or_else(|| {
            TreeError::InvalidTree("first_node_id is not set".to_string())
        })
    }

    fn rebuild_name_index(&mut self) {
        let mut name_index: FxHashMap<Arc<str>, NodeId> = FxHashMap::default();
        for node_id in self.traverse() {
            if let Some(name) = self.nodes[node_id].name() {
                if name_index.contains_key(&name) {
                    tracing::warn!(
                        name = %name,
                        "duplicate node name; lookups resolve to the first occurrence in preorder"
                    );
                    continue;
                }
                let _ = name_index.insert(name, node_id);
            }
        }
        self.name_index = name_index;
    }

    // =========================================================================
    // Tree Properties
    // =========================================================================

    pub fn is_rooted(&self) -> bool {
        match self.node(self.first_node_id) {
            Some(node) => node.node_type() == NodeType::Root,
            None => false,
        }
    }

    pub fn has_branch_lengths(&self) -> bool {
        self.has_branch_lengths
    }

    pub fn tip_count_all(&self) -> usize {
        self.tip_count_all
    }

    pub fn internal_node_count_all(&self) -> usize {
        self.internal_node_count_all
    }

    pub fn node_count_all(&self) -> usize {
        self.node_count_all
    }

    // =========================================================================
    // Node Access
    // =========================================================================

    pub fn node(&self, node_id: Option<NodeId>) -> Option<&Node> {
        if let Some(node_id) = node_id { self.nodes.get(node_id) } else { None }
    }

    pub fn node_mut(&mut self, node_id: Option<NodeId>) -> Option<&mut Node> {
        if let Some(node_id) = node_id {
            self.nodes.get_mut(node_id)
        } else {
            None
        }
    }

    pub fn node_exists(&self, node_id: Option<NodeId>) -> bool {
        self.node(node_id).is_some()
    }

    pub fn first_node_id(&self) -> Option<NodeId> {
        self.first_node_id
    }

    pub fn node_id_by_name(&self, name: &str) -> Option<NodeId> {
        self.name_index.get(name).copied()
    }

    pub fn name(&self, node_id: &NodeId) -> Option<Arc<str>> {
        self.nodes[*node_id].name()
    }

    pub fn branch_length(&self, node_id: &NodeId) -> Option<TreeFloat> {
        self.nodes[*node_id].branch_length()
    }

    // =========================================================================
    // Tree Traversal
    // =========================================================================

    pub fn parent_id(&self, node_id: &NodeId) -> Option<&NodeId> {
        self.nodes[*node_id].parent_id()
    }

    pub fn child_ids(&self, node_id: &NodeId) -> &[NodeId] {
        self.nodes[*node_id].child_ids()
    }

    pub fn children(&self, node_id: &NodeId) -> Vec<&Node> {
        self.child_ids(node_id).iter().map(|&id| &self.nodes[id]).collect()
    }

    pub fn is_tip(&self, node_id: &NodeId) -> bool {
        self.nodes[*node_id].is_tip()
    }

    /// Node ids in preorder, children visited in input order.
    pub fn traverse(&self) -> Vec<NodeId> {
        let mut result = Vec::with_capacity(self.nodes.len());
        let Some(first_node_id) = self.first_node_id else {
            return result;
        };

        let mut stack = vec![first_node_id];
        while let Some(node_id) = stack.pop() {
            result.push(node_id);
            stack.extend(self.child_ids(&node_id).iter().rev());
        }
        result
    }

    // =========================================================================
    // Display
    // =========================================================================

    fn print_tree(&self) -> String {
        let mut result: String = String::new();
        result.push_str(&format!(
            "Internal Nodes: {}\nTips: {}\nAll Nodes: {}\n{}\nBranch lengths: {}\n\n",
            self.internal_node_count_all,
            self.tip_count_all,
            self.node_count_all,
            match self.is_rooted() {
                true => "Rooted",
                false => "Unrooted",
            },
            self.has_branch_lengths()
        ));

        if let Some(node) = self.node(self.first_node_id) {
            result.push_str(&self.print_node(node, 0));
        }

        result
    }

    fn print_node(&self, node: &Node, level: usize) -> String {
        let mut result: String = String::new();
        result.push_str(&format!(
            "{}- {} | {} | {:<5.3} | {}\n",
            " ".repeat(level * 4),
            if let Some(node_id) = node.node_id() {
                node_id.to_string()
            } else {
                "None".to_string()
            },
            if let Some(name) = &node.name() {
                name.to_string()
            } else {
                "None".to_string()
            },
            node.branch_length().unwrap_or(TreeFloat::NAN),
            node.node_type(),
        ));

        for &child_node_id in node.child_ids() {
            result.push_str(
                &self.print_node(&self.nodes[child_node_id], level + 1),
            );
        }

        result
    }
}

impl Display for Tree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.print_tree())
    }
}
