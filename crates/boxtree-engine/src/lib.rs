pub mod document;
pub mod error;
pub mod remediation;
pub mod snapshot;
pub mod transform;
pub mod tree;
pub mod walker;

// Re-export key types for easier usage
pub use document::{LoadError, load_document, load_document_from_reader};
pub use error::TreeError;
pub use remediation::{FailurePolicy, PlanError, PlanReport, Remediation, apply_plan};
pub use transform::Vocabulary;
pub use tree::{Attribute, BoxKind, BoxNode, DisplayType, LazyList, ListCursor, QName, Style};
pub use walker::TreeWalker;
