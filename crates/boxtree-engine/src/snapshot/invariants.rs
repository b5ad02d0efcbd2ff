use crate::tree::BoxNode;

/// Assert the structural invariants over a whole tree. Panics with a
/// description of the first offending box.
pub fn check(root: &BoxNode) {
    check_node(root, &mut Vec::new());
}

fn check_node(node: &BoxNode, path: &mut Vec<String>) {
    path.push(node.local_name().unwrap_or("(anonymous)").to_string());
    let children: Vec<BoxNode> = node.children().collect();

    if node.is_inline() {
        assert!(
            children.iter().all(BoxNode::is_inline),
            "inline box contains a block box at {}",
            path.join(" > ")
        );
    } else {
        assert!(
            children.iter().all(BoxNode::is_block) || children.iter().all(BoxNode::is_inline),
            "block box mixes block and inline children at {}",
            path.join(" > ")
        );
        assert!(
            !children
                .windows(2)
                .any(|pair| pair[0].is_anonymous() && pair[1].is_anonymous()),
            "block box has adjacent anonymous children at {}",
            path.join(" > ")
        );
    }

    for child in &children {
        check_node(child, path);
    }
    path.pop();
}
