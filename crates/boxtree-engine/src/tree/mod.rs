//! The persistent box tree and the lazy sequences its children live in.

pub mod cursor;
pub mod node;
pub mod qname;
pub mod style;

pub use cursor::{LazyList, ListCursor};
pub use node::{BoxBuilder, BoxKind, BoxNode};
pub use qname::{Attribute, QName, XHTML_NAMESPACE};
pub use style::{DisplayType, Style};
