use log::{debug, info};

use super::{Vocabulary, ensure, leaf_blocks_in, nth_block};
use crate::error::TreeError;
use crate::tree::{BoxNode, DisplayType};
use crate::walker::TreeWalker;

fn display(walker: &TreeWalker) -> DisplayType {
    walker.current().display()
}

fn is_table_part(display: DisplayType) -> bool {
    matches!(
        display,
        DisplayType::Table
            | DisplayType::InlineTable
            | DisplayType::TableRowGroup
            | DisplayType::TableHeaderGroup
            | DisplayType::TableFooterGroup
            | DisplayType::TableRow
            | DisplayType::TableColumnGroup
            | DisplayType::TableColumn
            | DisplayType::TableCaption
    )
}

fn is_row_group(display: DisplayType) -> bool {
    matches!(
        display,
        DisplayType::TableRowGroup | DisplayType::TableHeaderGroup | DisplayType::TableFooterGroup
    )
}

/// Move from the previous sibling of a row or row group over an optional
/// leading column group. Returns whether one was there.
fn skip_column_group(walker: &mut TreeWalker) -> Result<bool, TreeError> {
    if walker.previous_sibling().is_none() {
        return Ok(false);
    }
    ensure(
        display(walker) == DisplayType::TableColumnGroup,
        "table has more than one row",
    )?;
    ensure(
        !walker.has_previous_sibling(),
        "table has content before its column group",
    )?;
    Ok(true)
}

/// Turn a one-row layout table into plain containers.
///
/// The table must start at leaf block `first_block` and consist of a single
/// row, optionally inside one row group and after one column group. Cells and
/// row are renamed to the container element, the column group is dropped and
/// the table (and row group) are unwrapped, so the row container takes the
/// table's place. The row must hold exactly `block_count` leaf blocks.
///
/// Returns the new root.
pub fn transform_single_row_table(
    walker: &mut TreeWalker,
    vocabulary: &Vocabulary,
    first_block: usize,
    block_count: usize,
) -> Result<BoxNode, TreeError> {
    info!("single row table at block {first_block} covering {block_count} blocks");
    walker.root();
    nth_block(walker, first_block)?;

    while display(walker) != DisplayType::TableCell {
        ensure(
            !walker.has_previous_sibling(),
            "first block does not start its table cell",
        )?;
        ensure(
            !is_table_part(display(walker)),
            "first block is not inside a table cell",
        )?;
        ensure(walker.parent().is_some(), "first block is not inside a table")?;
    }
    ensure(
        !walker.has_previous_sibling(),
        "first block is not in the first cell of its row",
    )?;

    walker.rename_current(vocabulary.container.clone())?;
    let mut cells = 1;
    while walker.next_sibling().is_some() {
        ensure(
            display(walker) == DisplayType::TableCell,
            "table row holds something other than cells",
        )?;
        walker.rename_current(vocabulary.container.clone())?;
        cells += 1;
    }
    debug!("renamed {cells} cells");

    ensure(walker.parent().is_some(), "table cell has no row")?;
    ensure(
        display(walker) == DisplayType::TableRow,
        "table cell is not inside a table row",
    )?;
    walker.rename_current(vocabulary.container.clone())?;
    ensure(!walker.has_next_sibling(), "table has more than one row")?;

    let mut column_group = skip_column_group(walker)?;
    ensure(walker.parent().is_some(), "table row has no table")?;
    let mut row_group = false;
    if !column_group && is_row_group(display(walker)) {
        row_group = true;
        ensure(!walker.has_next_sibling(), "table has more than one row group")?;
        column_group = skip_column_group(walker)?;
        ensure(walker.parent().is_some(), "table row group has no table")?;
    }
    ensure(
        display(walker) == DisplayType::Table,
        "table row is not inside a table",
    )?;

    if column_group {
        debug!("dropping column group");
        walker.delete_first_child()?;
    }
    walker.first_child();
    walker.unwrap_parent()?;
    if row_group {
        walker.first_child();
        walker.unwrap_parent()?;
    }

    let blocks = leaf_blocks_in(walker);
    ensure(
        blocks == block_count,
        &format!("table holds {blocks} blocks, expected {block_count}"),
    )?;
    Ok(walker.root_box())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::tree::QName;

    fn text(content: &str) -> BoxNode {
        BoxNode::inline().text(content).build().unwrap()
    }

    fn part(tag: &str, display: DisplayType, children: Vec<BoxNode>) -> BoxNode {
        BoxNode::block()
            .tag(tag)
            .display(display)
            .children(children)
            .build()
            .unwrap()
    }

    fn cell(content: &str) -> BoxNode {
        part(
            "td",
            DisplayType::TableCell,
            vec![part("p", DisplayType::Block, vec![text(content)])],
        )
    }

    fn row(cells: usize) -> BoxNode {
        let cells = (0..cells).map(|i| cell(&format!("cell {i}"))).collect();
        part("tr", DisplayType::TableRow, cells)
    }

    fn body(children: Vec<BoxNode>) -> BoxNode {
        part("body", DisplayType::Block, children)
    }

    fn local_names(node: &BoxNode) -> Vec<String> {
        node.children()
            .map(|c| c.local_name().unwrap_or("-").to_string())
            .collect()
    }

    #[test]
    fn table_without_row_group() {
        let before = part("p", DisplayType::Block, vec![text("intro")]);
        let table = part("table", DisplayType::Table, vec![row(3)]);
        let root = body(vec![before, table]);

        let mut walker = TreeWalker::new(root);
        let result =
            transform_single_row_table(&mut walker, &Vocabulary::default(), 1, 3).unwrap();

        assert_eq!(local_names(&result), vec!["p", "div"]);
        let row = result.children().nth(1).unwrap();
        assert_eq!(local_names(&row), vec!["div", "div", "div"]);
        assert_eq!(walker.current().name(), Some(&QName::xhtml("div")));
    }

    #[test]
    fn table_with_row_group_and_column_group() {
        let colgroup = part("colgroup", DisplayType::TableColumnGroup, vec![]);
        let tbody = part("tbody", DisplayType::TableRowGroup, vec![row(2)]);
        let table = part("table", DisplayType::Table, vec![colgroup, tbody]);
        let root = body(vec![table]);

        // the empty column group is leaf block 0
        let mut walker = TreeWalker::new(root);
        let result =
            transform_single_row_table(&mut walker, &Vocabulary::default(), 1, 2).unwrap();

        assert_eq!(local_names(&result), vec!["div"]);
        let row = result.children().next().unwrap();
        assert_eq!(local_names(&row), vec!["div", "div"]);
    }

    #[test]
    fn table_with_column_group_only() {
        let colgroup = part("colgroup", DisplayType::TableColumnGroup, vec![]);
        let table = part("table", DisplayType::Table, vec![colgroup, row(2)]);
        let root = body(vec![table]);

        let mut walker = TreeWalker::new(root);
        let result =
            transform_single_row_table(&mut walker, &Vocabulary::default(), 1, 2).unwrap();

        assert_eq!(local_names(&result), vec!["div"]);
        let row = result.children().next().unwrap();
        assert_eq!(local_names(&row), vec!["div", "div"]);
        assert_eq!(walker.depth(), 1);
    }

    #[rstest]
    #[case::header("thead", DisplayType::TableHeaderGroup)]
    #[case::footer("tfoot", DisplayType::TableFooterGroup)]
    fn header_and_footer_groups_are_unwrapped(#[case] tag: &str, #[case] group: DisplayType) {
        let group = part(tag, group, vec![row(2)]);
        let table = part("table", DisplayType::Table, vec![group]);

        let mut walker = TreeWalker::new(body(vec![table]));
        let result =
            transform_single_row_table(&mut walker, &Vocabulary::default(), 0, 2).unwrap();

        assert_eq!(local_names(&result), vec!["div"]);
        let row = result.children().next().unwrap();
        assert_eq!(local_names(&row), vec!["div", "div"]);
    }

    #[test]
    fn block_in_later_cell_is_rejected() {
        let table = part("table", DisplayType::Table, vec![row(2)]);
        let mut walker = TreeWalker::new(body(vec![table]));
        let result = transform_single_row_table(&mut walker, &Vocabulary::default(), 1, 1);
        assert_eq!(
            result,
            Err(TreeError::TransformationPrecondition(
                "first block is not in the first cell of its row".to_string()
            ))
        );
    }

    #[test]
    fn two_rows_are_rejected() {
        let table = part("table", DisplayType::Table, vec![row(1), row(1)]);
        let mut walker = TreeWalker::new(body(vec![table]));
        let result = transform_single_row_table(&mut walker, &Vocabulary::default(), 0, 1);
        assert_eq!(
            result,
            Err(TreeError::TransformationPrecondition(
                "table has more than one row".to_string()
            ))
        );
    }

    #[test]
    fn block_count_mismatch_is_rejected() {
        let table = part("table", DisplayType::Table, vec![row(3)]);
        let mut walker = TreeWalker::new(body(vec![table]));
        let result = transform_single_row_table(&mut walker, &Vocabulary::default(), 0, 2);
        assert!(matches!(
            result,
            Err(TreeError::TransformationPrecondition(message)) if message.contains("3 blocks")
        ));
    }

    #[test]
    fn block_outside_table_is_rejected() {
        let root = body(vec![part("p", DisplayType::Block, vec![text("x")])]);
        let mut walker = TreeWalker::new(root);
        let result = transform_single_row_table(&mut walker, &Vocabulary::default(), 0, 1);
        assert!(matches!(result, Err(TreeError::TransformationPrecondition(_))));
    }
}
