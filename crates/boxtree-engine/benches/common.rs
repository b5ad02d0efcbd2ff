// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use boxtree_engine::{BoxNode, DisplayType};

#[allow(dead_code)]
pub fn paragraph(content: &str) -> BoxNode {
    BoxNode::block()
        .tag("p")
        .child(BoxNode::inline().text(content).build().unwrap())
        .build()
        .unwrap()
}

/// `sections` sections of `paragraphs` paragraphs each, every section
/// preceded by a one-row layout table.
#[allow(dead_code)]
pub fn generate_document(sections: usize, paragraphs: usize) -> BoxNode {
    let children = (0..sections).flat_map(|section| {
        let table = layout_table(3);
        let body = BoxNode::block()
            .tag("div")
            .children((0..paragraphs).map(|i| paragraph(&format!("section {section} paragraph {i}"))))
            .build()
            .unwrap();
        [table, body]
    });
    BoxNode::block().tag("body").children(children).build().unwrap()
}

#[allow(dead_code)]
pub fn layout_table(cells: usize) -> BoxNode {
    let cells = (0..cells).map(|i| {
        BoxNode::block()
            .tag("td")
            .display(DisplayType::TableCell)
            .child(BoxNode::inline().text(format!("cell {i}")).build().unwrap())
            .build()
            .unwrap()
    });
    let row = BoxNode::block()
        .tag("tr")
        .display(DisplayType::TableRow)
        .children(cells)
        .build()
        .unwrap();
    BoxNode::block()
        .tag("table")
        .display(DisplayType::Table)
        .child(row)
        .build()
        .unwrap()
}
