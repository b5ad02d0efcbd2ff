use log::{debug, info};

use super::{Vocabulary, ensure, leaf_blocks_in, nth_block};
use crate::error::TreeError;
use crate::tree::BoxNode;
use crate::walker::TreeWalker;

/// Mark `block_count` leaf blocks starting at `first_block` as one heading.
///
/// The heading element is the nearest ancestor-or-self of the first block
/// that holds exactly `block_count` leaf blocks and starts with that block.
/// Inside it, emphasis is unwrapped and containers become neutral inlines.
///
/// Returns the new root.
pub fn markup_heading(
    walker: &mut TreeWalker,
    vocabulary: &Vocabulary,
    first_block: usize,
    block_count: usize,
) -> Result<BoxNode, TreeError> {
    info!("heading at block {first_block} covering {block_count} blocks");
    ensure(block_count > 0, "a heading covers at least one block")?;
    walker.root();
    nth_block(walker, first_block)?;

    let mut covered = 1;
    while covered < block_count {
        ensure(
            !walker.has_previous_sibling(),
            "heading blocks do not start an element",
        )?;
        ensure(
            walker.parent().is_some(),
            "document has fewer blocks than the heading covers",
        )?;
        covered = leaf_blocks_in(walker);
    }
    ensure(
        covered == block_count,
        &format!("no element holds exactly {block_count} blocks"),
    )?;

    walker.rename_current(vocabulary.heading.clone())?;
    flatten(walker, vocabulary)?;
    Ok(walker.root_box())
}

/// Unwrap emphasis and rename containers below the current node.
///
/// Emphasis that can not be unwrapped without putting two anonymous boxes
/// next to each other is renamed to a neutral inline instead.
fn flatten(walker: &mut TreeWalker, vocabulary: &Vocabulary) -> Result<(), TreeError> {
    let mut heading = walker.sub_tree();
    let noise = |node: &BoxNode| vocabulary.is_emphasis(node) || vocabulary.is_container(node);

    let mut found = heading.first_descendant_where(noise);
    while let Some(node) = found {
        if vocabulary.is_emphasis(&node) {
            debug!("unwrapping emphasis {:?}", node.local_name());
            if heading.previous_sibling().is_some() {
                match heading.unwrap_next_sibling() {
                    // the emphasis content now follows the previous sibling
                    Ok(_) => {}
                    Err(TreeError::InvalidTreeStructure(reason)) => {
                        debug!("keeping emphasis as neutral inline: {reason}");
                        heading.next_sibling();
                        heading.rename_current(vocabulary.neutral_inline.clone())?;
                    }
                    Err(error) => return Err(error),
                }
                found = heading
                    .first_descendant_where(noise)
                    .or_else(|| heading.first_following_where(noise));
            } else {
                heading.parent();
                if let Err(error) = heading.unwrap_first_child() {
                    let TreeError::InvalidTreeStructure(reason) = error else {
                        return Err(error);
                    };
                    debug!("keeping emphasis as neutral inline: {reason}");
                    heading.first_child();
                    heading.rename_current(vocabulary.neutral_inline.clone())?;
                }
                found = heading
                    .first_descendant_where(noise)
                    .or_else(|| heading.first_following_where(noise));
            }
        } else {
            debug!("renaming container inside heading");
            heading.rename_current(vocabulary.neutral_inline.clone())?;
            found = heading
                .first_descendant_where(noise)
                .or_else(|| heading.first_following_where(noise));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;
    use crate::snapshot::outline;

    fn text(content: &str) -> BoxNode {
        BoxNode::inline().text(content).build().unwrap()
    }

    fn em(content: &str) -> BoxNode {
        BoxNode::inline().tag("em").child(text(content)).build().unwrap()
    }

    fn p(children: Vec<BoxNode>) -> BoxNode {
        BoxNode::block().tag("p").children(children).build().unwrap()
    }

    fn div(children: Vec<BoxNode>) -> BoxNode {
        BoxNode::block().tag("div").children(children).build().unwrap()
    }

    #[test]
    fn single_block_heading() {
        let root = div(vec![
            p(vec![em("Title")]),
            p(vec![text("body text")]),
        ]);
        let mut walker = TreeWalker::new(root);
        let result = markup_heading(&mut walker, &Vocabulary::default(), 0, 1).unwrap();

        assert_snapshot!(outline(&result), @r#"
        block div
          block h1
            inline "Title"
          block p
            inline "body text"
        "#);
    }

    #[test]
    fn heading_over_two_paragraphs_renames_parent() {
        let root = div(vec![
            div(vec![
                p(vec![text("Chapter "), em("One")]),
                p(vec![BoxNode::inline()
                    .tag("strong")
                    .text("The Beginning")
                    .build()
                    .unwrap()]),
            ]),
            p(vec![text("body")]),
        ]);
        let mut walker = TreeWalker::new(root);
        let result = markup_heading(&mut walker, &Vocabulary::default(), 0, 2).unwrap();

        assert_snapshot!(outline(&result), @r#"
        block div
          block h1
            block p
              inline "Chapter "
              inline span
                inline "One"
            block p
              inline "The Beginning"
          block p
            inline "body"
        "#);
        assert_eq!(walker.current().local_name(), Some("h1"));
    }

    #[test]
    fn nested_containers_become_neutral_inlines() {
        let root = div(vec![p(vec![
            BoxNode::inline()
                .tag("div")
                .child(em("deep"))
                .build()
                .unwrap(),
        ])]);
        let mut walker = TreeWalker::new(root);
        let result = markup_heading(&mut walker, &Vocabulary::default(), 0, 1).unwrap();

        assert_snapshot!(outline(&result), @r#"
        block div
          block h1
            inline span
              inline "deep"
        "#);
    }

    #[test]
    fn no_exact_ancestor_fails() {
        let root = div(vec![
            p(vec![text("a")]),
            p(vec![text("b")]),
            p(vec![text("c")]),
        ]);
        let mut walker = TreeWalker::new(root);
        let result = markup_heading(&mut walker, &Vocabulary::default(), 0, 2);
        assert_eq!(
            result,
            Err(TreeError::TransformationPrecondition(
                "no element holds exactly 2 blocks".to_string()
            ))
        );
    }

    #[test]
    fn heading_must_start_its_element() {
        let root = div(vec![div(vec![p(vec![text("a")]), p(vec![text("b")])])]);
        let mut walker = TreeWalker::new(root);
        let result = markup_heading(&mut walker, &Vocabulary::default(), 1, 2);
        assert!(matches!(
            result,
            Err(TreeError::TransformationPrecondition(_))
        ));
    }

    #[test]
    fn zero_blocks_is_rejected() {
        let mut walker = TreeWalker::new(p(vec![text("a")]));
        assert!(markup_heading(&mut walker, &Vocabulary::default(), 0, 0).is_err());
    }
}
