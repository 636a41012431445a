//! Grounding: substituting concrete objects into an action template.

use std::collections::BTreeMap;
use std::fmt::Write;

use groundplan_foundation::{Entity, Error, Fact, Result, TruthValue};

use crate::action::ActionTemplate;
use crate::parameter::Term;
use crate::proposition::{Atom, Proposition};

/// Rewrites a symbolic proposition tree into a grounded one.
///
/// `and`/`or` recurse preserving order and structure. A `not` over a single
/// leaf collapses into a value-flipped [`Fact`] rather than keeping an
/// explicit node. A `forall` keeps its node: the outer bindings are
/// substituted into its body while the bound variable stays symbolic, and
/// the engine expands it once the entity universe is known.
///
/// # Errors
/// Returns [`Error::MissingBinding`] if a variable outside any enclosing
/// `forall` has no entry in `bindings`.
pub fn ground_proposition(
    proposition: &Proposition,
    bindings: &BTreeMap<String, Entity>,
) -> Result<Proposition> {
    let mut bound = Vec::new();
    ground_scoped(proposition, bindings, &mut bound)
}

fn ground_scoped(
    proposition: &Proposition,
    bindings: &BTreeMap<String, Entity>,
    bound: &mut Vec<String>,
) -> Result<Proposition> {
    match proposition {
        Proposition::And(children) => {
            let children = children
                .iter()
                .map(|child| ground_scoped(child, bindings, bound))
                .collect::<Result<Vec<_>>>()?;
            Ok(Proposition::And(children))
        }
        Proposition::Or(children) => {
            let children = children
                .iter()
                .map(|child| ground_scoped(child, bindings, bound))
                .collect::<Result<Vec<_>>>()?;
            Ok(Proposition::Or(children))
        }
        Proposition::Not(child) => match ground_scoped(child, bindings, bound)? {
            Proposition::Fact(mut fact) => {
                fact.set_value(fact.value().negated());
                Ok(Proposition::Fact(fact))
            }
            // Still symbolic under a forall binder; the collapse happens
            // when the engine expands the quantifier.
            Proposition::Atom(atom) => Ok(Proposition::Not(Box::new(Proposition::Atom(atom)))),
            _ => Err(Error::unsupported("not over a compound proposition")),
        },
        Proposition::ForAll { variable, body } => {
            bound.push(variable.name().to_string());
            let body = ground_scoped(body, bindings, bound);
            bound.pop();
            Ok(Proposition::ForAll {
                variable: variable.clone(),
                body: Box::new(body?),
            })
        }
        Proposition::Atom(atom) => ground_atom(atom, bindings, bound),
        Proposition::Fact(fact) => Ok(Proposition::Fact(fact.clone())),
    }
}

fn ground_atom(
    atom: &Atom,
    bindings: &BTreeMap<String, Entity>,
    bound: &[String],
) -> Result<Proposition> {
    let mut terms = Vec::with_capacity(atom.arguments().len());
    for term in atom.arguments() {
        match term {
            Term::Constant(entity) => terms.push(Term::Constant(entity.clone())),
            Term::Variable(param) => {
                if bound.iter().any(|name| name == param.name()) {
                    terms.push(Term::Variable(param.clone()));
                } else if let Some(entity) = bindings.get(param.name()) {
                    terms.push(Term::Constant(entity.clone()));
                } else {
                    return Err(Error::MissingBinding(param.name().to_string()));
                }
            }
        }
    }
    if terms.iter().all(|term| !term.is_variable()) {
        let entities = terms
            .into_iter()
            .filter_map(|term| match term {
                Term::Constant(entity) => Some(entity),
                Term::Variable(_) => None,
            })
            .collect();
        let fact = Fact::new(atom.predicate().clone(), entities, TruthValue::True)?;
        Ok(Proposition::Fact(fact))
    } else {
        Ok(Proposition::Atom(Atom::new(atom.predicate().clone(), terms)))
    }
}

/// An action template bound to concrete entities.
///
/// Built once per invocation; immutable after construction except that the
/// bindings may be replaced wholesale, which rebuilds both grounded trees.
/// Grounded actions hold no back-references to any world state and can be
/// freely cloned across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundedAction {
    template: ActionTemplate,
    bindings: BTreeMap<String, Entity>,
    precondition: Proposition,
    effect: Proposition,
}

impl GroundedAction {
    /// Grounds `template` with `bindings`.
    ///
    /// # Errors
    /// Returns [`Error::MissingBinding`] if a template parameter has no
    /// entry, or [`Error::UnknownReference`] if `bindings` carries a key
    /// that names no template parameter.
    pub fn new(template: &ActionTemplate, bindings: BTreeMap<String, Entity>) -> Result<Self> {
        let (precondition, effect) = Self::rewrite(template, &bindings)?;
        Ok(Self {
            template: template.clone(),
            bindings,
            precondition,
            effect,
        })
    }

    fn rewrite(
        template: &ActionTemplate,
        bindings: &BTreeMap<String, Entity>,
    ) -> Result<(Proposition, Proposition)> {
        for param in template.parameters() {
            if !bindings.contains_key(param.name()) {
                return Err(Error::MissingBinding(param.name().to_string()));
            }
        }
        for key in bindings.keys() {
            if template.find_parameter(key).is_none() {
                return Err(Error::unknown("parameter", key.clone()));
            }
        }
        let precondition = ground_proposition(template.precondition(), bindings)?;
        let effect = ground_proposition(template.effect(), bindings)?;
        Ok((precondition, effect))
    }

    /// Returns the action's name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.template.name()
    }

    /// Returns the template this action was grounded from.
    #[must_use]
    pub fn template(&self) -> &ActionTemplate {
        &self.template
    }

    /// Returns the parameter bindings.
    #[must_use]
    pub fn bindings(&self) -> &BTreeMap<String, Entity> {
        &self.bindings
    }

    /// Returns the grounded precondition tree.
    #[must_use]
    pub fn precondition(&self) -> &Proposition {
        &self.precondition
    }

    /// Returns the grounded effect tree.
    #[must_use]
    pub fn effect(&self) -> &Proposition {
        &self.effect
    }

    /// Replaces the bindings wholesale and rebuilds both grounded trees.
    ///
    /// # Errors
    /// Same conditions as [`GroundedAction::new`].
    pub fn rebind(&mut self, bindings: BTreeMap<String, Entity>) -> Result<()> {
        let (precondition, effect) = Self::rewrite(&self.template, &bindings)?;
        self.bindings = bindings;
        self.precondition = precondition;
        self.effect = effect;
        Ok(())
    }

    /// Returns the bound entities whose extension chain contains `type_name`.
    #[must_use]
    pub fn parameters_with_type(&self, type_name: &str) -> Vec<&Entity> {
        self.template
            .parameters()
            .iter()
            .filter_map(|param| self.bindings.get(param.name()))
            .filter(|entity| entity.ty().is_within(type_name))
            .collect()
    }

    /// Returns the invocation form sent to an embedding environment, e.g.
    /// `move(a, b)`.
    #[must_use]
    pub fn execution_string(&self) -> String {
        let mut out = format!("{}(", self.name());
        for (i, param) in self.template.parameters().iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            if let Some(entity) = self.bindings.get(param.name()) {
                out.push_str(entity.name());
            }
        }
        out.push(')');
        out
    }

    /// Emits the grounded action block, or an empty string when the
    /// underlying template is unavailable.
    #[must_use]
    pub fn to_pddl(&self) -> String {
        if !self.template.available() {
            return String::new();
        }
        let mut out = format!(":action {}\n        :parameters (", self.name());
        for param in self.template.parameters() {
            if let Some(entity) = self.bindings.get(param.name()) {
                let _ = write!(out, "{} ", entity.name());
            }
        }
        let _ = write!(
            out,
            ")\n        :precondition {}\n        :effect {}\n",
            self.precondition.to_pddl(),
            self.effect.to_pddl()
        );
        out
    }
}
