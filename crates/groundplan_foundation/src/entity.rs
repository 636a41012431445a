//! Named, typed instances of the object universe.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::Type;

/// External catalogue lookup used to normalize position-like entity names.
///
/// The catalogue itself lives outside this system; embedding applications
/// supply an implementation and entity construction consults it only for
/// entities whose extension chain contains `position`. Returning `None`
/// keeps the stored name unchanged.
pub trait NameNormalizer {
    /// Returns the corrected composite name for `name`, if the catalogue
    /// knows one.
    fn normalize(&self, name: &str) -> Option<String>;
}

/// A normalizer that never corrects anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNormalization;

impl NameNormalizer for NoNormalization {
    fn normalize(&self, _name: &str) -> Option<String> {
        None
    }
}

/// A named instance tagged with exactly one declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Entity {
    name: String,
    ty: Arc<Type>,
}

impl Entity {
    /// Creates an entity.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: Arc<Type>) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// Creates an entity, consulting `normalizer` for position-like types.
    #[must_use]
    pub fn with_normalizer(
        name: impl Into<String>,
        ty: Arc<Type>,
        normalizer: &dyn NameNormalizer,
    ) -> Self {
        let mut name = name.into();
        if ty.is_within("position") {
            if let Some(corrected) = normalizer.normalize(&name) {
                name = corrected;
            }
        }
        Self { name, ty }
    }

    /// Returns the entity's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the entity's declared type.
    #[must_use]
    pub fn ty(&self) -> &Arc<Type> {
        &self.ty
    }

    /// Emits the entity as it appears in source text.
    #[must_use]
    pub fn to_pddl(&self) -> String {
        self.name.clone()
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.ty.name())
    }
}
