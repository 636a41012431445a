//! The predicate catalogue: named relations over typed argument slots.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Type;

/// Maximum number of argument slots a predicate may declare.
pub const MAX_ARITY: usize = 2;

/// A named relation of zero, one, or two typed argument slots.
///
/// Declared once per domain; the domain is the source of truth for arity
/// and type checking everywhere else.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Predicate {
    name: String,
    arguments: Vec<Arc<Type>>,
}

impl Predicate {
    /// Creates a predicate.
    ///
    /// # Errors
    /// Returns [`Error::ArityMismatch`] if more than [`MAX_ARITY`] argument
    /// slots are supplied.
    pub fn new(name: impl Into<String>, arguments: Vec<Arc<Type>>) -> Result<Self> {
        let name = name.into();
        if arguments.len() > MAX_ARITY {
            return Err(Error::arity(name, MAX_ARITY, arguments.len()));
        }
        Ok(Self { name, arguments })
    }

    /// Returns the predicate's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared argument slot types, in order.
    #[must_use]
    pub fn arguments(&self) -> &[Arc<Type>] {
        &self.arguments
    }

    /// Returns the declared argument count.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.arguments.len()
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, ty) in self.arguments.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(ty.name())?;
        }
        f.write_str(")")
    }
}
