//! Action templates: parameterized actions with symbolic trees.

use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Write;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use groundplan_foundation::Type;

use crate::parameter::ActionParameter;
use crate::proposition::Proposition;

/// A parameterized action: symbolic precondition and effect trees over a
/// list of typed parameters.
///
/// Template names are unique within a domain (the tokenizer folds case, so
/// lookups are case-insensitive by construction).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActionTemplate {
    name: String,
    parameters: Vec<ActionParameter>,
    precondition: Proposition,
    effect: Proposition,
    available: bool,
    special: bool,
}

impl ActionTemplate {
    /// Creates a template. New templates are available and not special.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        parameters: Vec<ActionParameter>,
        precondition: Proposition,
        effect: Proposition,
    ) -> Self {
        Self {
            name: name.into(),
            parameters,
            precondition,
            effect,
            available: true,
            special: false,
        }
    }

    /// Returns the template's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared parameters, in order.
    #[must_use]
    pub fn parameters(&self) -> &[ActionParameter] {
        &self.parameters
    }

    /// Returns the symbolic precondition tree.
    #[must_use]
    pub fn precondition(&self) -> &Proposition {
        &self.precondition
    }

    /// Returns the symbolic effect tree.
    #[must_use]
    pub fn effect(&self) -> &Proposition {
        &self.effect
    }

    /// Returns whether the template is rendered and offered at all.
    #[must_use]
    pub fn available(&self) -> bool {
        self.available
    }

    /// Sets the availability flag.
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Returns whether the template renders as a special action.
    #[must_use]
    pub fn special(&self) -> bool {
        self.special
    }

    /// Sets the special flag.
    pub fn set_special(&mut self, special: bool) {
        self.special = special;
    }

    /// Finds a declared parameter by name.
    #[must_use]
    pub fn find_parameter(&self, name: &str) -> Option<&ActionParameter> {
        self.parameters.iter().find(|p| p.name() == name)
    }

    /// Returns a name-to-type view of the parameter list.
    #[must_use]
    pub fn parameter_types(&self) -> BTreeMap<&str, &Arc<Type>> {
        self.parameters
            .iter()
            .map(|p| (p.name(), p.ty()))
            .collect()
    }

    /// Emits the template as a parseable `(:action ...)` block, or an empty
    /// string when the template is unavailable.
    #[must_use]
    pub fn to_pddl(&self) -> String {
        if !self.available {
            return String::new();
        }
        let keyword = if self.special {
            ":special-action"
        } else {
            ":action"
        };
        let mut out = String::new();
        let _ = write!(out, "({keyword} {}\n        :parameters (", self.name);
        for (i, param) in self.parameters.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{} - {}", param.name(), param.ty().name());
        }
        let _ = write!(
            out,
            ")\n        :precondition {}\n        :effect {}\n    )",
            self.precondition.to_pddl(),
            self.effect.to_pddl()
        );
        out
    }
}

impl fmt::Display for ActionTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "action: {}\n\t  parameters:", self.name)?;
        for param in &self.parameters {
            write!(f, " {param}")?;
        }
        write!(
            f,
            "\n\t  precondition: {}\n\t  effect: {}",
            self.precondition.to_pddl(),
            self.effect.to_pddl()
        )
    }
}
