//! The single-parent type hierarchy.
//!
//! Every declared type extends exactly one other type; the chains all
//! terminate at the universal root, named [`ROOT_TYPE_NAME`]. Subtype
//! queries walk the extension chain by name.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Reserved name of the universal root type.
pub const ROOT_TYPE_NAME: &str = "object";

/// A node in the type hierarchy.
///
/// Types are created during parsing of a `:types` section and never mutated
/// after domain load; they are shared through `Arc` by everything that
/// mentions them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Type {
    name: String,
    parent: Option<Arc<Type>>,
}

impl Type {
    /// Creates the universal root type.
    #[must_use]
    pub fn root() -> Self {
        Self {
            name: ROOT_TYPE_NAME.to_string(),
            parent: None,
        }
    }

    /// Creates a type extending `parent`.
    #[must_use]
    pub fn new(name: impl Into<String>, parent: Arc<Type>) -> Self {
        Self {
            name: name.into(),
            parent: Some(parent),
        }
    }

    /// Returns the type's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the immediate supertype, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<&Arc<Type>> {
        self.parent.as_ref()
    }

    /// Returns true if this is the universal root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Returns the names of this type and all its ancestors, ending at the
    /// root: `[self, parent, ..., object]`.
    #[must_use]
    pub fn extension_chain(&self) -> Vec<&str> {
        let mut chain = vec![self.name.as_str()];
        let mut current = self.parent.as_deref();
        while let Some(ty) = current {
            chain.push(ty.name.as_str());
            current = ty.parent.as_deref();
        }
        chain
    }

    /// Returns true if `name` appears in this type's extension chain, i.e.
    /// this type is a subtype of (or equal to) the named type.
    #[must_use]
    pub fn is_within(&self, name: &str) -> bool {
        self.extension_chain().contains(&name)
    }
}

/// Name equality, used pervasively for lookups.
impl PartialEq<str> for Type {
    fn eq(&self, other: &str) -> bool {
        self.name == other
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
