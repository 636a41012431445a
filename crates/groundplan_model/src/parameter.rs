//! Action parameters and the argument slots of symbolic leaves.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use groundplan_foundation::{Entity, Type};

/// A bound variable symbol scoped to one action template (or one `forall`
/// binder), carrying its declared type.
///
/// Parameter names keep their `?` marker exactly as written in source.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActionParameter {
    name: String,
    ty: Arc<Type>,
}

impl ActionParameter {
    /// Creates a parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: Arc<Type>) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// Returns the parameter's name, `?` marker included.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parameter's declared type.
    #[must_use]
    pub fn ty(&self) -> &Arc<Type> {
        &self.ty
    }
}

impl fmt::Display for ActionParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.ty.name())
    }
}

/// One argument slot of a symbolic leaf: either still a variable or already
/// substituted with a concrete entity.
///
/// Partial substitution is what gives `forall` bodies a grounding path: the
/// outer bindings become constants while the bound variable stays symbolic.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Term {
    /// An unsubstituted parameter reference.
    Variable(ActionParameter),
    /// A concrete entity.
    Constant(Entity),
}

impl Term {
    /// Returns the entity if this term is already concrete.
    #[must_use]
    pub fn as_entity(&self) -> Option<&Entity> {
        match self {
            Self::Constant(entity) => Some(entity),
            Self::Variable(_) => None,
        }
    }

    /// Returns true if this term is still a variable.
    #[must_use]
    pub fn is_variable(&self) -> bool {
        matches!(self, Self::Variable(_))
    }

    /// Returns the name rendered in source text: the variable symbol or the
    /// entity name.
    #[must_use]
    pub fn symbol(&self) -> &str {
        match self {
            Self::Variable(param) => param.name(),
            Self::Constant(entity) => entity.name(),
        }
    }
}
