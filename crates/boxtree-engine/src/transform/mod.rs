//! Compound remediation transformations built on the walker.
//!
//! Each transformation restarts from the walker's root, locates its target
//! by leaf block index, checks the document shape with [`ensure`] and
//! rewrites through the walker. They are not atomic: on error the walker may
//! already hold partial writes, so callers keep the root they started from.

mod heading;
mod image;
mod table;
mod vocabulary;

pub use heading::markup_heading;
pub use image::remove_image;
pub use table::transform_single_row_table;
pub use vocabulary::Vocabulary;

use crate::error::TreeError;
use crate::tree::BoxNode;
use crate::walker::TreeWalker;

pub(crate) fn ensure(condition: bool, message: &str) -> Result<(), TreeError> {
    if condition {
        Ok(())
    } else {
        Err(TreeError::transformation(message))
    }
}

/// Position the walker on the `index`-th leaf block (0-based) after its
/// current position, in document order.
pub fn nth_block(walker: &mut TreeWalker, index: usize) -> Result<BoxNode, TreeError> {
    let mut found = walker.first_descendant_where(BoxNode::is_leaf_block);
    for _ in 0..index {
        if found.is_none() {
            break;
        }
        found = walker.first_following_where(BoxNode::is_leaf_block);
    }
    found.ok_or_else(|| TreeError::structural(format!("document has no leaf block {index}")))
}

/// Number of nodes after the current position matching `filter`. Moves the
/// walker to the last match.
pub fn count<F>(walker: &mut TreeWalker, filter: F) -> usize
where
    F: Fn(&BoxNode) -> bool,
{
    let mut matches = 0;
    while walker
        .first_descendant_where(&filter)
        .or_else(|| walker.first_following_where(&filter))
        .is_some()
    {
        matches += 1;
    }
    matches
}

/// Leaf blocks in current's subtree, current included. Leaves the walker
/// where it is.
pub(crate) fn leaf_blocks_in(walker: &TreeWalker) -> usize {
    let own = usize::from(walker.current().is_leaf_block());
    own + count(&mut walker.clone().sub_tree(), BoxNode::is_leaf_block)
}
