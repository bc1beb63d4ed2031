use super::skeleton::{SkeletonLayout, TreeRole, TreeSkeleton};
use super::xml::SerializationError;

/// Concatenates the species section and the gene section into the document
/// lines. Trailing whitespace is stripped; indentation is kept.
pub fn assemble(
    species: &TreeSkeleton,
    gene: &TreeSkeleton,
    layout: &SkeletonLayout,
) -> Result<Vec<String>, SerializationError> {
    expect_role(species, TreeRole::Species)?;
    expect_role(gene, TreeRole::Gene)?;

    let mut lines = species.render(layout)?;
    lines.extend(gene.render(layout)?);

    Ok(lines.into_iter().map(|line| line.trim_end().to_string()).collect())
}

/// Joins document lines, newline terminated.
pub fn to_document(lines: &[String]) -> String {
    let mut document = lines.join("\n");
    document.push('\n');
    document
}

fn expect_role(
    skeleton: &TreeSkeleton,
    expected: TreeRole,
) -> Result<(), SerializationError> {
    if skeleton.role() == expected {
        Ok(())
    } else {
        Err(SerializationError::RoleMismatch {
            expected: expected.to_string(),
            found: skeleton.role().to_string(),
        })
    }
}
