use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Namespace of XHTML elements.
pub const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// XML qualified name: `<prefix:localPart xmlns:prefix="namespace"/>`.
///
/// Two names are equal when namespace and local part match; the prefix is
/// only a serialization detail and takes no part in equality or hashing.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    pub local_part: String,
}

impl QName {
    /// A name without namespace.
    pub fn local(local_part: impl Into<String>) -> Self {
        Self {
            namespace: None,
            prefix: None,
            local_part: local_part.into(),
        }
    }

    pub fn new(namespace: impl Into<String>, local_part: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            prefix: None,
            local_part: local_part.into(),
        }
    }

    /// A name in the XHTML namespace.
    pub fn xhtml(local_part: impl Into<String>) -> Self {
        Self::new(XHTML_NAMESPACE, local_part)
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Loose match used when recognising elements: local parts must agree and
    /// namespaces must agree when both sides declare one.
    pub fn matches(&self, other: &QName) -> bool {
        self.local_part == other.local_part
            && match (&self.namespace, &other.namespace) {
                (Some(a), Some(b)) => a == b,
                _ => true,
            }
    }
}

impl PartialEq for QName {
    fn eq(&self, other: &Self) -> bool {
        self.namespace == other.namespace && self.local_part == other.local_part
    }
}

impl Hash for QName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.namespace.hash(state);
        self.local_part.hash(state);
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.prefix.as_deref() {
            Some(prefix) if !prefix.is_empty() => write!(f, "{prefix}:{}", self.local_part),
            _ => f.write_str(&self.local_part),
        }
    }
}

/// A name/value pair attached to a box.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    pub name: QName,
    pub value: String,
}

impl Attribute {
    pub fn new(name: QName, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}
