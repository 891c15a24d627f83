#![forbid(unsafe_code)]

//! Host element handles and the token/zone descriptors built on them.
//!
//! The picker never owns UI elements. The host hands out opaque
//! [`ElementId`] values and reports token attributes during scans; the
//! controller only keeps what it needs to route later events.

use std::fmt;

/// Opaque handle to a host-owned element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u32);

impl ElementId {
    /// Wrap a raw host handle.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw host handle.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for ElementId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A token element as reported by the host when the pool is scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenElement {
    pub element: ElementId,
    /// Identifier attribute; `None` when the element carries none.
    pub id: Option<String>,
    /// Disabled tokens are inert and never receive handlers.
    pub disabled: bool,
}

impl TokenElement {
    /// An enabled token with an identifier.
    #[must_use]
    pub fn new(element: ElementId, id: impl Into<String>) -> Self {
        Self {
            element,
            id: Some(id.into()),
            disabled: false,
        }
    }

    /// An enabled token without an identifier attribute.
    #[must_use]
    pub const fn anonymous(element: ElementId) -> Self {
        Self {
            element,
            id: None,
            disabled: false,
        }
    }

    /// Builder: flag the token as disabled.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Identifier forwarded to callbacks. Missing identifiers read as `""`.
    #[must_use]
    pub fn label(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }
}

/// Reference to a selected token: handle plus the identifier captured at setup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenRef {
    pub element: ElementId,
    pub id: String,
}

impl TokenRef {
    #[must_use]
    pub fn new(element: ElementId, id: impl Into<String>) -> Self {
        Self {
            element,
            id: id.into(),
        }
    }
}

/// Caller-defined zone tag such as `"predictor"` or `"response"`.
///
/// The controller never interprets the label; it is only forwarded to the
/// validator and placement callbacks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ZoneKind(String);

impl ZoneKind {
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ZoneKind {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ZoneKind {
    fn from(kind: &str) -> Self {
        Self(kind.to_owned())
    }
}

impl From<String> for ZoneKind {
    fn from(kind: String) -> Self {
        Self(kind)
    }
}

impl PartialEq<str> for ZoneKind {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ZoneKind {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
