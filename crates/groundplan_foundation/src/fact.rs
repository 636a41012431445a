//! Grounded truth assertions.
//!
//! A [`Fact`] is a predicate applied to concrete entities together with an
//! explicit truth value. Facts are value-like: they hold no back-references
//! to the state that produced them and can be freely cloned across threads.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::{Error, Result};
use crate::predicate::Predicate;

/// The truth value carried by a fact.
///
/// The pending values are reserved for embedding applications that stage
/// changes before committing them; this core never produces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TruthValue {
    /// The fact holds.
    True,
    /// The fact does not hold.
    False,
    /// Reserved: staged to become true.
    PendingTrue,
    /// Reserved: staged to become false.
    PendingFalse,
}

impl TruthValue {
    /// Returns the value with opposite polarity.
    #[must_use]
    pub fn negated(self) -> Self {
        match self {
            Self::True => Self::False,
            Self::False => Self::True,
            Self::PendingTrue => Self::PendingFalse,
            Self::PendingFalse => Self::PendingTrue,
        }
    }

    /// Returns true for [`TruthValue::True`].
    #[must_use]
    pub fn is_true(self) -> bool {
        matches!(self, Self::True)
    }
}

impl fmt::Display for TruthValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::PendingTrue => "PENDING_TRUE",
            Self::PendingFalse => "PENDING_FALSE",
        })
    }
}

/// A grounded (predicate + concrete entities) truth assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Fact {
    predicate: Arc<Predicate>,
    entities: Vec<Entity>,
    value: TruthValue,
}

impl Fact {
    /// Creates a fact.
    ///
    /// # Errors
    /// Returns [`Error::ArityMismatch`] if the entity count differs from the
    /// predicate's declared arity, or [`Error::TypeMismatch`] if an entity's
    /// extension chain does not contain the declared slot type.
    pub fn new(predicate: Arc<Predicate>, entities: Vec<Entity>, value: TruthValue) -> Result<Self> {
        if entities.len() != predicate.arity() {
            return Err(Error::arity(
                predicate.name(),
                predicate.arity(),
                entities.len(),
            ));
        }
        for (entity, slot) in entities.iter().zip(predicate.arguments()) {
            if !entity.ty().is_within(slot.name()) {
                return Err(Error::TypeMismatch {
                    argument: entity.name().to_string(),
                    expected: slot.name().to_string(),
                    actual: entity.ty().name().to_string(),
                });
            }
        }
        Ok(Self {
            predicate,
            entities,
            value,
        })
    }

    /// Returns the fact's predicate.
    #[must_use]
    pub fn predicate(&self) -> &Arc<Predicate> {
        &self.predicate
    }

    /// Returns the fact's entities, in slot order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Returns the fact's truth value.
    #[must_use]
    pub fn value(&self) -> TruthValue {
        self.value
    }

    /// Overwrites the truth value in place.
    pub fn set_value(&mut self, value: TruthValue) {
        self.value = value;
    }

    /// Returns true if `other` asserts the same predicate over the same
    /// entities, ignoring truth values.
    #[must_use]
    pub fn same_atom(&self, other: &Self) -> bool {
        self.predicate == other.predicate && self.entities == other.entities
    }

    /// Returns true if the fact mentions `entity` in any slot.
    #[must_use]
    pub fn mentions(&self, entity: &Entity) -> bool {
        self.entities.contains(entity)
    }

    /// Emits the fact as source text, wrapping false facts in `(not ...)`.
    #[must_use]
    pub fn to_pddl(&self) -> String {
        let mut inner = String::from("(");
        inner.push_str(self.predicate.name());
        for entity in &self.entities {
            inner.push(' ');
            inner.push_str(entity.name());
        }
        inner.push(')');
        if self.value == TruthValue::False {
            format!("(not {inner})")
        } else {
            inner
        }
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.predicate.name())?;
        for (i, entity) in self.entities.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(entity.name())?;
        }
        write!(f, "):{}", self.value)
    }
}
