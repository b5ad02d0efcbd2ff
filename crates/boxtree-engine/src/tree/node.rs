use std::fmt;
use std::rc::Rc;

use super::cursor::{LazyList, ListCursor};
use super::qname::{Attribute, QName};
use super::style::{DisplayType, Style};
use crate::error::TreeError;

/// Whether a box takes part in block or inline layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BoxKind {
    Block,
    Inline,
}

struct BoxData {
    kind: BoxKind,
    name: Option<QName>,
    attributes: Rc<[Attribute]>,
    text: Option<Rc<str>>,
    style: Rc<Style>,
    children: LazyList<BoxNode>,
}

/// An immutable node of the box tree.
///
/// `BoxNode` is a cheap handle; clones share the node. Every "modification"
/// builds a new node and reuses whatever is unchanged, including the
/// children list, so old and new versions of a tree share structure.
///
/// Construction enforces:
///
/// 1. the children of a block box are either all block boxes or all inline
///    boxes;
/// 2. an inline box has no block children;
/// 3. a block box never has two adjacent anonymous (unnamed) children.
#[derive(Clone)]
pub struct BoxNode(Rc<BoxData>);

impl BoxNode {
    /// Build a box, checking the structural invariants against its children.
    /// The children producer is drained once here; later cursors replay the
    /// cached elements.
    pub fn new<I>(
        kind: BoxKind,
        name: Option<QName>,
        attributes: Vec<Attribute>,
        text: Option<String>,
        style: Style,
        children: I,
    ) -> Result<Self, TreeError>
    where
        I: IntoIterator<Item = BoxNode>,
        I::IntoIter: 'static,
    {
        let children = LazyList::new(children);
        validate_children(kind, &children)?;
        Ok(BoxNode(Rc::new(BoxData {
            kind,
            name,
            attributes: attributes.into(),
            text: text.map(Rc::from),
            style: Rc::new(style),
            children,
        })))
    }

    pub fn block() -> BoxBuilder {
        BoxBuilder::new(BoxKind::Block)
    }

    pub fn inline() -> BoxBuilder {
        BoxBuilder::new(BoxKind::Inline)
    }

    pub fn kind(&self) -> BoxKind {
        self.0.kind
    }

    pub fn is_block(&self) -> bool {
        self.0.kind == BoxKind::Block
    }

    pub fn is_inline(&self) -> bool {
        self.0.kind == BoxKind::Inline
    }

    pub fn name(&self) -> Option<&QName> {
        self.0.name.as_ref()
    }

    pub fn local_name(&self) -> Option<&str> {
        self.0.name.as_ref().map(|name| name.local_part.as_str())
    }

    pub fn is_anonymous(&self) -> bool {
        self.0.name.is_none()
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.0.attributes
    }

    /// Value of the first attribute with the given local name.
    pub fn attribute(&self, local_name: &str) -> Option<&str> {
        self.0
            .attributes
            .iter()
            .find(|attribute| attribute.name.local_part == local_name)
            .map(|attribute| attribute.value.as_str())
    }

    pub fn text(&self) -> Option<&str> {
        self.0.text.as_deref()
    }

    pub fn style(&self) -> &Style {
        &self.0.style
    }

    pub fn display(&self) -> DisplayType {
        self.0.style.display
    }

    /// A fresh cursor over the children, positioned before the first one.
    pub fn children(&self) -> ListCursor<BoxNode> {
        self.0.children.cursor()
    }

    /// A block box whose children are inline boxes, or that has none.
    pub fn is_leaf_block(&self) -> bool {
        self.is_block() && self.children().next().is_none_or(|child| child.is_inline())
    }

    /// Same box under a different name. The children list is shared; the
    /// node's own children stay valid since only siblings are affected.
    pub fn with_name(&self, name: impl Into<Option<QName>>) -> BoxNode {
        BoxNode(Rc::new(BoxData {
            kind: self.0.kind,
            name: name.into(),
            attributes: Rc::clone(&self.0.attributes),
            text: self.0.text.clone(),
            style: Rc::clone(&self.0.style),
            children: self.0.children.clone(),
        }))
    }

    /// Same box with a different children list, revalidated.
    pub fn with_children<I>(&self, children: I) -> Result<BoxNode, TreeError>
    where
        I: IntoIterator<Item = BoxNode>,
        I::IntoIter: 'static,
    {
        let children = LazyList::new(children);
        validate_children(self.0.kind, &children)?;
        Ok(BoxNode(Rc::new(BoxData {
            kind: self.0.kind,
            name: self.0.name.clone(),
            attributes: Rc::clone(&self.0.attributes),
            text: self.0.text.clone(),
            style: Rc::clone(&self.0.style),
            children,
        })))
    }

    /// Identity comparison: true when both handles point at the same node.
    pub fn ptr_eq(this: &BoxNode, other: &BoxNode) -> bool {
        Rc::ptr_eq(&this.0, &other.0)
    }
}

fn validate_children(kind: BoxKind, children: &LazyList<BoxNode>) -> Result<(), TreeError> {
    let mut first_kind = None;
    let mut previous_anonymous = false;
    for (index, child) in children.cursor().enumerate() {
        if kind == BoxKind::Inline && child.is_block() {
            return Err(TreeError::invalid_structure(format!(
                "inline box can not contain block box at child {index}"
            )));
        }
        match first_kind {
            None => first_kind = Some(child.kind()),
            Some(expected) if expected != child.kind() => {
                return Err(TreeError::invalid_structure(format!(
                    "block and inline boxes can not be siblings (child {index})"
                )));
            }
            Some(_) => {}
        }
        if kind == BoxKind::Block && previous_anonymous && child.is_anonymous() {
            return Err(TreeError::invalid_structure(format!(
                "anonymous boxes can not be adjacent (child {index})"
            )));
        }
        previous_anonymous = child.is_anonymous();
    }
    Ok(())
}

/// Structural equality. Attributes compare as a set.
impl PartialEq for BoxNode {
    fn eq(&self, other: &Self) -> bool {
        if BoxNode::ptr_eq(self, other) {
            return true;
        }
        let (a, b) = (&*self.0, &*other.0);
        a.kind == b.kind
            && a.name == b.name
            && a.text == b.text
            && a.style == b.style
            && a.attributes.len() == b.attributes.len()
            && a.attributes.iter().all(|attribute| b.attributes.contains(attribute))
            && self.children().eq(other.children())
    }
}

impl Eq for BoxNode {}

impl fmt::Debug for BoxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("BoxNode");
        debug.field("kind", &self.0.kind);
        if let Some(name) = &self.0.name {
            debug.field("name", &name.to_string());
        }
        if !self.0.attributes.is_empty() {
            debug.field("attributes", &self.0.attributes);
        }
        if let Some(text) = &self.0.text {
            debug.field("text", text);
        }
        let children: Vec<BoxNode> = self.children().collect();
        if !children.is_empty() {
            debug.field("children", &children);
        }
        debug.finish()
    }
}

/// Step-by-step construction of a [`BoxNode`].
///
/// The style defaults to `display: block` or `display: inline` to match the
/// kind.
#[derive(Debug)]
pub struct BoxBuilder {
    kind: BoxKind,
    name: Option<QName>,
    attributes: Vec<Attribute>,
    text: Option<String>,
    style: Style,
    children: Vec<BoxNode>,
}

impl BoxBuilder {
    fn new(kind: BoxKind) -> Self {
        let style = match kind {
            BoxKind::Block => Style::block(),
            BoxKind::Inline => Style::inline(),
        };
        Self {
            kind,
            name: None,
            attributes: Vec::new(),
            text: None,
            style,
            children: Vec::new(),
        }
    }

    pub fn name(mut self, name: QName) -> Self {
        self.name = Some(name);
        self
    }

    /// Shorthand for an XHTML element name.
    pub fn tag(self, local_name: &str) -> Self {
        self.name(QName::xhtml(local_name))
    }

    pub fn attribute(mut self, name: QName, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute::new(name, value));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn display(mut self, display: DisplayType) -> Self {
        self.style.display = display;
        self
    }

    pub fn replaced(mut self) -> Self {
        self.style.is_replaced_element = true;
        self
    }

    pub fn child(mut self, child: BoxNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = BoxNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn build(self) -> Result<BoxNode, TreeError> {
        BoxNode::new(
            self.kind,
            self.name,
            self.attributes,
            self.text,
            self.style,
            self.children,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn text(content: &str) -> BoxNode {
        BoxNode::inline().text(content).build().unwrap()
    }

    fn span(content: &str) -> BoxNode {
        BoxNode::inline().tag("span").text(content).build().unwrap()
    }

    fn paragraph(content: &str) -> BoxNode {
        BoxNode::block().tag("p").child(text(content)).build().unwrap()
    }

    #[test]
    fn block_with_block_children_is_accepted() {
        let body = BoxNode::block()
            .tag("body")
            .children([paragraph("one"), paragraph("two")])
            .build()
            .unwrap();
        assert_eq!(body.children().count(), 2);
        assert!(!body.is_leaf_block());
    }

    #[rstest]
    #[case::mixed_block_children(
        BoxNode::block().child(paragraph("a")).child(span("b")),
        "block and inline boxes can not be siblings"
    )]
    #[case::block_in_inline(
        BoxNode::inline().tag("span").child(paragraph("a")),
        "inline box can not contain block box"
    )]
    #[case::adjacent_anonymous(
        BoxNode::block().tag("p").child(text("a")).child(text("b")),
        "anonymous boxes can not be adjacent"
    )]
    fn invalid_children_are_rejected(#[case] builder: BoxBuilder, #[case] expected: &str) {
        match builder.build() {
            Err(TreeError::InvalidTreeStructure(message)) => {
                assert!(message.contains(expected), "unexpected message: {message}")
            }
            other => panic!("expected InvalidTreeStructure, got {other:?}"),
        }
    }

    #[test]
    fn inline_boxes_may_hold_adjacent_anonymous_children() {
        let em = BoxNode::inline().tag("em").children([text("a"), text("b")]).build();
        assert!(em.is_ok());
    }

    #[test]
    fn anonymous_boxes_separated_by_named_box_are_fine() {
        let p = BoxNode::block()
            .tag("p")
            .children([text("a"), span("b"), text("c")])
            .build();
        assert!(p.is_ok());
    }

    #[rstest]
    #[case::empty_block(BoxNode::block().tag("p").build().unwrap(), true)]
    #[case::inline_children(paragraph("x"), true)]
    #[case::block_children(BoxNode::block().child(paragraph("x")).build().unwrap(), false)]
    #[case::inline_box(span("x"), false)]
    fn leaf_block_detection(#[case] node: BoxNode, #[case] expected: bool) {
        assert_eq!(node.is_leaf_block(), expected);
    }

    #[test]
    fn with_name_shares_children_and_leaves_original_alone() {
        let original = paragraph("hello");
        let renamed = original.with_name(QName::xhtml("h1"));

        assert_eq!(original.local_name(), Some("p"));
        assert_eq!(renamed.local_name(), Some("h1"));

        let a = original.children().next().unwrap();
        let b = renamed.children().next().unwrap();
        assert!(BoxNode::ptr_eq(&a, &b));

        assert!(renamed.with_name(None).is_anonymous());
    }

    #[test]
    fn with_children_revalidates() {
        let p = paragraph("x");
        let result = p.with_children(vec![text("a"), text("b")]);
        assert!(matches!(result, Err(TreeError::InvalidTreeStructure(_))));

        let replaced = p.with_children(vec![span("y")]).unwrap();
        assert_eq!(replaced.children().next().unwrap().text(), Some("y"));
        assert_eq!(p.children().next().unwrap().text(), Some("x"));
    }

    #[test]
    fn children_producer_runs_once() {
        let pulls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&pulls);
        let children = vec![paragraph("a"), paragraph("b")]
            .into_iter()
            .inspect(move |_| counter.set(counter.get() + 1));
        let body = BoxNode::new(
            BoxKind::Block,
            Some(QName::xhtml("body")),
            Vec::new(),
            None,
            Style::block(),
            children,
        )
        .unwrap();

        assert_eq!(pulls.get(), 2);
        assert_eq!(body.children().count(), 2);
        assert_eq!(body.children().count(), 2);
        assert_eq!(pulls.get(), 2);
    }

    #[test]
    fn equality_is_structural_and_ignores_attribute_order() {
        let a = BoxNode::inline()
            .tag("img")
            .attribute(QName::local("src"), "x.png")
            .attribute(QName::local("alt"), "")
            .replaced()
            .build()
            .unwrap();
        let b = BoxNode::inline()
            .tag("img")
            .attribute(QName::local("alt"), "")
            .attribute(QName::local("src"), "x.png")
            .replaced()
            .build()
            .unwrap();
        assert_eq!(a, b);
        assert!(!BoxNode::ptr_eq(&a, &b));
        assert_eq!(a.attribute("src"), Some("x.png"));
        assert_ne!(paragraph("a"), paragraph("b"));
    }
}
