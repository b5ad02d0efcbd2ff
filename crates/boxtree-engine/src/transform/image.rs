use log::info;

use super::{Vocabulary, ensure, nth_block};
use crate::error::TreeError;
use crate::tree::BoxNode;
use crate::walker::TreeWalker;

fn is_content(node: &BoxNode) -> bool {
    node.text().is_some() || node.style().is_replaced_element
}

/// Mark an image as decorative by renaming it to the image marker.
///
/// Without `inline` the target is leaf block `block` itself. With it, the
/// target is the `inline`-th text or replaced-element node inside that block.
/// Either way it must be a replaced image element.
///
/// Returns the new root.
pub fn remove_image(
    walker: &mut TreeWalker,
    vocabulary: &Vocabulary,
    block: usize,
    inline: Option<usize>,
) -> Result<BoxNode, TreeError> {
    info!("decorative image at block {block}, inline {inline:?}");
    walker.root();
    nth_block(walker, block)?;

    match inline {
        None => {
            ensure(vocabulary.is_image(&walker.current()), "block is not an image")?;
            walker.rename_current(vocabulary.image_marker.clone())?;
        }
        Some(index) => {
            let mut content = walker.sub_tree();
            ensure(
                content.first_descendant_where(is_content).is_some(),
                "block has no inline content",
            )?;
            for _ in 0..index {
                ensure(
                    content.first_following_where(is_content).is_some(),
                    &format!("block has no inline content at {index}"),
                )?;
            }
            ensure(
                vocabulary.is_image(&content.current()),
                "inline content is not an image",
            )?;
            content.rename_current(vocabulary.image_marker.clone())?;
        }
    }
    Ok(walker.root_box())
}
