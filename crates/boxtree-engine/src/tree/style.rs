use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Value of the CSS `display` property, as far as the transformation library
/// cares about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayType {
    #[default]
    Inline,
    Block,
    InlineBlock,
    ListItem,
    Table,
    InlineTable,
    TableRowGroup,
    TableHeaderGroup,
    TableFooterGroup,
    TableRow,
    TableColumnGroup,
    TableColumn,
    TableCell,
    TableCaption,
    None,
    #[serde(other)]
    Other,
}

/// Presentation properties of a box.
///
/// `display` and `is_replaced_element` are the ones the engine reads; any
/// other CSS property the producer supplied is kept verbatim in `properties`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    #[serde(default)]
    pub display: DisplayType,
    #[serde(default)]
    pub is_replaced_element: bool,
    #[serde(flatten)]
    pub properties: BTreeMap<String, serde_json::Value>,
}

impl Style {
    pub fn new(display: DisplayType) -> Self {
        Self {
            display,
            ..Self::default()
        }
    }

    pub fn block() -> Self {
        Self::new(DisplayType::Block)
    }

    pub fn inline() -> Self {
        Self::new(DisplayType::Inline)
    }
}
