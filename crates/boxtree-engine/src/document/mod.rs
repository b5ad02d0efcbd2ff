//! Loading box trees produced by an external layout engine.
//!
//! The exchange format is JSON, one object per box:
//!
//! ```json
//! {
//!   "type": "BLOCK",
//!   "name": {"namespace": "http://www.w3.org/1999/xhtml", "localPart": "p"},
//!   "attributes": [{"name": {"localPart": "id"}, "value": "intro"}],
//!   "cssprops": {"display": "block", "isReplacedElement": false},
//!   "children": [{"type": "INLINE", "text": "Hello"}]
//! }
//! ```

use std::collections::BTreeMap;
use std::io::Read;

use log::debug;
use serde::Deserialize;
use thiserror::Error;

use crate::error::TreeError;
use crate::tree::{Attribute, BoxKind, BoxNode, DisplayType, QName, Style};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to parse box tree JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Box tree rejected: {0}")]
    Structure(#[from] TreeError),
}

#[derive(Debug, Deserialize)]
struct BoxDto {
    #[serde(rename = "type")]
    kind: BoxKind,
    #[serde(default)]
    name: Option<QName>,
    #[serde(default)]
    attributes: Vec<Attribute>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    cssprops: Option<StyleDto>,
    #[serde(default)]
    children: Vec<BoxDto>,
}

/// `cssprops` as produced: `display` may be left out.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StyleDto {
    #[serde(default)]
    display: Option<DisplayType>,
    #[serde(default)]
    is_replaced_element: bool,
    #[serde(flatten)]
    properties: BTreeMap<String, serde_json::Value>,
}

impl BoxDto {
    fn into_box(self) -> Result<BoxNode, TreeError> {
        let children = self
            .children
            .into_iter()
            .map(BoxDto::into_box)
            .collect::<Result<Vec<_>, _>>()?;
        let cssprops = self.cssprops.unwrap_or_default();
        let style = Style {
            display: cssprops.display.unwrap_or(match self.kind {
                BoxKind::Block => DisplayType::Block,
                BoxKind::Inline => DisplayType::Inline,
            }),
            is_replaced_element: cssprops.is_replaced_element,
            properties: cssprops.properties,
        };
        BoxNode::new(self.kind, self.name, self.attributes, self.text, style, children)
    }
}

/// Parse a JSON box tree. Every box goes through the checked constructor, so
/// a document that breaks a structural invariant is rejected.
pub fn load_document(json: &str) -> Result<BoxNode, LoadError> {
    let dto: BoxDto = serde_json::from_str(json)?;
    let root = dto.into_box()?;
    debug!("loaded box tree rooted at {:?}", root.local_name());
    Ok(root)
}

pub fn load_document_from_reader<R: Read>(reader: R) -> Result<BoxNode, LoadError> {
    let dto: BoxDto = serde_json::from_reader(reader)?;
    Ok(dto.into_box()?)
}
