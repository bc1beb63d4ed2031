use super::TreeFloat;
use slotmap::new_key_type;
use std::{fmt::Display, sync::Arc};

new_key_type! { pub struct NodeId; }

#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd, Ord, Eq)]
pub enum NodeType {
    #[default]
    Unset,
    Tip,
    Internal,
    FirstNode,
    Root,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Node {
    node_id: Option<NodeId>,
    parent_id: Option<NodeId>,
    child_ids: Vec<NodeId>,
    branch_length: Option<TreeFloat>,
    name: Option<Arc<str>>,
    node_type: NodeType,
}

impl Node {
    pub fn is_tip(&self) -> bool { self.node_type == NodeType::Tip }
    pub fn child_ids(&self) -> &[NodeId] { &self.child_ids }
    pub fn add_child_id(&mut self, node_id: NodeId) { self.child_ids.push(node_id) }
    pub fn node_id(&self) -> Option<&NodeId> { self.node_id.as_ref() }
    pub fn set_node_id(&mut self, node_id: NodeId) { self.node_id = Some(node_id); }
    pub fn parent_id(&self) -> Option<&NodeId> { self.parent_id.as_ref() }
    pub fn set_parent_id(&mut self, node_id: Option<NodeId>) { self.parent_id = node_id; }
    pub fn branch_length(&self) -> Option<TreeFloat> { self.branch_length }
    pub fn set_branch_length(&mut self, branch_length: Option<TreeFloat>) { self.branch_length = branch_length; }
    pub fn name(&self) -> Option<Arc<str>> { self.name.clone() }

    pub fn set_name<'a>(&mut self, name: Option<impl Into<&'a str>>) {
        self.name = name.map(|name| name.into().into());
    }

    pub fn node_type(&self) -> NodeType { self.node_type }

    /// Classifies the node from its parent/child links.
    ///
    /// A parentless node with exactly two children is a [NodeType::Root];
    /// any other parentless node is a [NodeType::FirstNode] (unrooted
    /// trifurcation, unifurcation or a single-node tree).
    pub fn set_node_type(&mut self) -> NodeType {
        self.node_type = match (self.parent_id.is_some(), self.child_ids.len()) {
            (true, 0) => NodeType::Tip,
            (true, _) => NodeType::Internal,
            (false, 2) => NodeType::Root,
            (false, _) => NodeType::FirstNode,
        };
        self.node_type
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let disp = format!("{self:?}");
        write!(f, "{}", &disp[7..disp.len() - 1])
    }
}

impl Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                NodeType::Unset => "Unset",
                NodeType::Tip => "Tip",
                NodeType::Internal => "Internal",
                NodeType::Root => "Root",
                NodeType::FirstNode => "FirstNode",
            }
        )
    }
}
