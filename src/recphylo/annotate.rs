use super::skeleton::{EventTag, TreeRole, TreeSkeleton};
use thiserror::Error;

/// Whether an annotation opened a new `<eventsRec>` container or joined an
/// existing one. Rendered output grows by three lines or one, respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationOutcome {
    NewContainer,
    ExistingContainer,
}

/// A per-record failure. The record is skipped and the run continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationIssue {
    #[error("no node named \"{node}\" in the {role} tree; {event} skipped")]
    UnresolvedNode { node: String, role: TreeRole, event: &'static str },
    #[error(
        "transfer from \"{donor}\" to \"{recipient}\" annotated {applied:?} out of candidates {candidates:?}"
    )]
    AmbiguousRecipient {
        donor: String,
        recipient: String,
        candidates: Vec<String>,
        applied: Vec<String>,
    },
}

/// Attaches `event` to the node named `node_name`.
///
/// The first event on a node opens its container; later events go to the
/// front of the existing container. Annotating twice with the same event
/// yields two tags.
pub fn annotate(
    skeleton: &mut TreeSkeleton,
    node_name: &str,
    event: EventTag,
) -> Result<AnnotationOutcome, AnnotationIssue> {
    let Some(node_id) = skeleton.tree.node_id_by_name(node_name) else {
        return Err(AnnotationIssue::UnresolvedNode {
            node: node_name.to_string(),
            role: skeleton.role,
            event: event.element(),
        });
    };

    if let Some(events) = skeleton.events.get_mut(node_id)
        && !events.is_empty()
    {
        events.insert(0, event);
        return Ok(AnnotationOutcome::ExistingContainer);
    }

    _ = skeleton.events.insert(node_id, vec![event]);
    Ok(AnnotationOutcome::NewContainer)
}
