use super::Reconciliation;
use crate::{NodeId, Tree};
use thiserror::Error;
use tracing::debug;

/// How a gene-tree node was found to receive a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipientMatch {
    /// A leaf record whose name starts with the recipient species.
    Leaf,
    /// The child's own mapping equals the recipient species.
    DirectMapping,
    /// The child's mapping is a species-tree child of the recipient.
    SpeciesDescendant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferBackTarget {
    pub node_name: String,
    pub destination_species: String,
    pub via: RecipientMatch,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipientResolution {
    /// Nodes that receive a `transferBack` annotation, in discovery order.
    pub targets: Vec<TransferBackTarget>,
    /// Every node name that was tested as a possible recipient.
    pub considered: Vec<String>,
    /// Leaf records matching the recipient; only the first is used.
    pub leaf_candidates: Vec<String>,
    /// The leaf child at which the child scan stopped, if any.
    pub stopped_at_leaf: Option<String>,
}

impl RecipientResolution {
    /// Anything other than exactly one target: none found, several internal
    /// children matched, or the leaf rule had to pick among several leaves.
    pub fn is_ambiguous(&self) -> bool {
        self.targets.len() != 1 || self.leaf_candidates.len() > 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecipientError {
    #[error("transfer source \"{0}\" is not in the gene tree")]
    SourceNotFound(String),
}

/// Finds the gene-tree nodes that receive the transfer leaving `source`.
///
/// Children of `source` are scanned in order:
/// 1. The first leaf child ends the scan. If any leaf record's name starts
///    with `recipient`, the first such leaf becomes the only leaf target;
///    later siblings are never examined.
/// 2. An internal child whose mapping equals `recipient` is a target.
/// 3. Otherwise an internal child whose mapping names a child of `recipient`
///    in the species tree is a target.
pub fn resolve_recipients(
    source: &str,
    recipient: &str,
    reconciliation: &Reconciliation,
    gene_tree: &Tree,
    species_tree: &Tree,
) -> Result<RecipientResolution, RecipientError> {
    let source_id = gene_tree
        .node_id_by_name(source)
        .ok_or_else(|| RecipientError::SourceNotFound(source.to_string()))?;
    let recipient_species_id = species_tree.node_id_by_name(recipient);
    if recipient_species_id.is_none() {
        debug!(recipient, "recipient species is not in the species tree");
    }

    let mut resolution = RecipientResolution::default();

    for child_id in gene_tree.child_ids(&source_id) {
        if gene_tree.is_tip(child_id) {
            resolve_leaf_child(
                gene_tree,
                child_id,
                recipient,
                reconciliation,
                &mut resolution,
            );
            break;
        }

        let Some(child_name) = gene_tree.name(child_id) else {
            debug!(source, "unnamed internal child skipped");
            continue;
        };
        resolution.considered.push(child_name.to_string());

        let Some(child_map) = reconciliation.find_map(&child_name) else {
            debug!(source, child = %child_name, "child has no reconciliation record");
            continue;
        };

        if child_map == recipient {
            debug!(source, child = %child_name, recipient, "direct mapping to recipient");
            resolution.targets.push(TransferBackTarget {
                node_name: child_name.to_string(),
                destination_species: child_map.to_string(),
                via: RecipientMatch::DirectMapping,
            });
            continue;
        }

        let Some(recipient_species_id) = recipient_species_id else {
            continue;
        };
        for species_child in species_tree.children(&recipient_species_id) {
            if species_child.name().as_deref() == Some(child_map) {
                debug!(
                    source,
                    child = %child_name,
                    species = child_map,
                    recipient,
                    "child maps below recipient"
                );
                resolution.targets.push(TransferBackTarget {
                    node_name: child_name.to_string(),
                    destination_species: child_map.to_string(),
                    via: RecipientMatch::SpeciesDescendant,
                });
            }
        }
    }

    Ok(resolution)
}

fn resolve_leaf_child(
    gene_tree: &Tree,
    child_id: &NodeId,
    recipient: &str,
    reconciliation: &Reconciliation,
    resolution: &mut RecipientResolution,
) {
    let child_name = gene_tree.name(child_id).map(|name| name.to_string());

    resolution.leaf_candidates = reconciliation
        .leaves_with_prefix(recipient)
        .map(|record| record.node_name().to_string())
        .collect();
    for candidate in &resolution.leaf_candidates {
        debug!(recipient, candidate = %candidate, "leaf recipient candidate");
    }
    resolution.considered.extend(resolution.leaf_candidates.iter().cloned());

    if let Some(first) = resolution.leaf_candidates.first() {
        resolution.targets.push(TransferBackTarget {
            node_name: first.clone(),
            destination_species: recipient.to_string(),
            via: RecipientMatch::Leaf,
        });
    }

    debug!(
        leaf = child_name.as_deref().unwrap_or("<unnamed>"),
        "leaf child reached; remaining siblings are not examined"
    );
    resolution.stopped_at_leaf = child_name;
}
