//! The expression tree shared by preconditions and effects.
//!
//! One closed sum covers both halves of an action's life: inside an unbound
//! template every leaf is a symbolic [`Atom`]; after grounding every leaf is
//! a concrete [`Fact`], except under a `forall`, whose body may still
//! mention the bound variable.

use std::fmt::Write;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use groundplan_foundation::{Fact, Predicate};

use crate::parameter::{ActionParameter, Term};

/// A symbolic (or partially substituted) predicate reference.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Atom {
    predicate: Arc<Predicate>,
    arguments: Vec<Term>,
}

impl Atom {
    /// Creates an atom.
    #[must_use]
    pub fn new(predicate: Arc<Predicate>, arguments: Vec<Term>) -> Self {
        Self {
            predicate,
            arguments,
        }
    }

    /// Returns the referenced predicate.
    #[must_use]
    pub fn predicate(&self) -> &Arc<Predicate> {
        &self.predicate
    }

    /// Returns the argument slots, in order.
    #[must_use]
    pub fn arguments(&self) -> &[Term] {
        &self.arguments
    }
}

/// A node of the boolean expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Proposition {
    /// Conjunction over the children, in encounter order.
    And(Vec<Proposition>),
    /// Disjunction over the children, in encounter order.
    Or(Vec<Proposition>),
    /// Negation of exactly one child.
    Not(Box<Proposition>),
    /// Universal quantification over a typed variable.
    ForAll {
        /// The bound variable, visible only inside `body`.
        variable: ActionParameter,
        /// The quantified body.
        body: Box<Proposition>,
    },
    /// Symbolic leaf: a predicate over parameter references.
    Atom(Atom),
    /// Grounded leaf: a concrete fact.
    Fact(Fact),
}

impl Proposition {
    /// Returns true if this node is a leaf (symbolic or grounded).
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Atom(_) | Self::Fact(_))
    }

    /// Returns the fact if this is a grounded leaf.
    #[must_use]
    pub fn as_fact(&self) -> Option<&Fact> {
        match self {
            Self::Fact(fact) => Some(fact),
            _ => None,
        }
    }

    /// Returns true if any leaf anywhere in the tree is still symbolic.
    #[must_use]
    pub fn has_symbolic_leaves(&self) -> bool {
        match self {
            Self::And(children) | Self::Or(children) => {
                children.iter().any(Self::has_symbolic_leaves)
            }
            Self::Not(child) => child.has_symbolic_leaves(),
            Self::ForAll { body, .. } => body.has_symbolic_leaves(),
            Self::Atom(_) => true,
            Self::Fact(_) => false,
        }
    }

    /// Emits the proposition as parseable source text.
    #[must_use]
    pub fn to_pddl(&self) -> String {
        let mut out = String::new();
        self.write_pddl(&mut out);
        out
    }

    fn write_pddl(&self, out: &mut String) {
        match self {
            Self::And(children) => Self::write_compound(out, "and", children),
            Self::Or(children) => Self::write_compound(out, "or", children),
            Self::Not(child) => {
                out.push_str("(not ");
                child.write_pddl(out);
                out.push(')');
            }
            Self::ForAll { variable, body } => {
                let _ = write!(
                    out,
                    "(forall ({} - {}) : ",
                    variable.name(),
                    variable.ty().name()
                );
                body.write_pddl(out);
                out.push(')');
            }
            Self::Atom(atom) => {
                out.push('(');
                out.push_str(atom.predicate().name());
                for term in atom.arguments() {
                    out.push(' ');
                    out.push_str(term.symbol());
                }
                out.push(')');
            }
            Self::Fact(fact) => out.push_str(&fact.to_pddl()),
        }
    }

    fn write_compound(out: &mut String, keyword: &str, children: &[Proposition]) {
        out.push('(');
        out.push_str(keyword);
        for child in children {
            out.push(' ');
            child.write_pddl(out);
        }
        out.push(')');
    }
}
