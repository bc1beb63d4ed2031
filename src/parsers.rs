pub(crate) mod newick;
pub(crate) mod report;

use crate::TreeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TreeParseError {
    #[error("Invalid NEWICK string: {0}.")]
    InvalidNewick(String),
    #[error("NEWICK input contains no tree.")]
    EmptyInput,
    #[error(transparent)]
    TreeError(#[from] TreeError),
}
