use crate::tree::{BoxNode, QName, XHTML_NAMESPACE};

/// Element names the transformation library recognises and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    /// Generic block container that table parts are renamed to.
    pub container: QName,
    pub heading: QName,
    /// Name given to containers found inside a heading.
    pub neutral_inline: QName,
    /// Name given to images judged decorative.
    pub image_marker: QName,
    pub emphasis: Vec<QName>,
    pub images: Vec<QName>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::in_namespace(XHTML_NAMESPACE)
    }
}

impl Vocabulary {
    /// The default element names, placed in `namespace`.
    pub fn in_namespace(namespace: &str) -> Self {
        let name = |local: &str| QName::new(namespace, local);
        Self {
            container: name("div"),
            heading: name("h1"),
            neutral_inline: name("span"),
            image_marker: name("span"),
            emphasis: ["em", "i", "b", "strong"].into_iter().map(name).collect(),
            images: vec![name("img")],
        }
    }

    pub fn is_container(&self, node: &BoxNode) -> bool {
        node.name().is_some_and(|name| name.matches(&self.container))
    }

    pub fn is_emphasis(&self, node: &BoxNode) -> bool {
        node.name()
            .is_some_and(|name| self.emphasis.iter().any(|emphasis| name.matches(emphasis)))
    }

    /// A replaced element carrying one of the image names.
    pub fn is_image(&self, node: &BoxNode) -> bool {
        node.style().is_replaced_element
            && node
                .name()
                .is_some_and(|name| self.images.iter().any(|image| name.matches(image)))
    }
}
