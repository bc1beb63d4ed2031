mod annotate;
mod assemble;
mod skeleton;
mod xml;

pub use annotate::{AnnotationIssue, AnnotationOutcome, annotate};
pub use assemble::{assemble, to_document};
pub use skeleton::{
    EVENT_CONTAINER_TAG, EventTag, SkeletonLayout, TreeRole, TreeSkeleton,
};
pub use xml::{SerializationError, escape_xml};
