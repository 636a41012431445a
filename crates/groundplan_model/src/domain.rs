//! The domain: owner of all types, predicates, and action templates.

use std::fmt;
use std::fmt::Write;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use groundplan_foundation::{Error, Predicate, ROOT_TYPE_NAME, Result, Type};

use crate::action::ActionTemplate;

/// A planning domain: named catalogues of types, predicates, and action
/// templates, plus the declared requirement tokens (stored verbatim, never
/// validated against a known set).
///
/// The domain owns the universal root type; `find_type` resolves the
/// literal `object` to it everywhere.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Domain {
    name: String,
    requirements: Vec<String>,
    types: Vec<Arc<Type>>,
    predicates: Vec<Arc<Predicate>>,
    actions: Vec<ActionTemplate>,
    root: Arc<Type>,
}

impl Domain {
    /// Creates an empty domain.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requirements: Vec::new(),
            types: Vec::new(),
            predicates: Vec::new(),
            actions: Vec::new(),
            root: Arc::new(Type::root()),
        }
    }

    /// Returns the domain's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the domain.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Returns the declared requirement tokens.
    #[must_use]
    pub fn requirements(&self) -> &[String] {
        &self.requirements
    }

    /// Replaces the requirement tokens.
    pub fn set_requirements(&mut self, requirements: Vec<String>) {
        self.requirements = requirements;
    }

    /// Returns the universal root type.
    #[must_use]
    pub fn root_type(&self) -> &Arc<Type> {
        &self.root
    }

    /// Returns the declared types, in declaration order (root excluded).
    #[must_use]
    pub fn types(&self) -> &[Arc<Type>] {
        &self.types
    }

    /// Returns the declared predicates, in declaration order.
    #[must_use]
    pub fn predicates(&self) -> &[Arc<Predicate>] {
        &self.predicates
    }

    /// Returns the action templates, in declaration order.
    #[must_use]
    pub fn actions(&self) -> &[ActionTemplate] {
        &self.actions
    }

    /// Finds a type by name; the literal `object` resolves to the root.
    #[must_use]
    pub fn find_type(&self, name: &str) -> Option<&Arc<Type>> {
        if name == ROOT_TYPE_NAME {
            return Some(&self.root);
        }
        self.types.iter().find(|ty| ty.name() == name)
    }

    /// Adds a type, returning the shared handle.
    ///
    /// # Errors
    /// Returns [`Error::DuplicateDeclaration`] if a type of the same name
    /// (or the reserved root name) is already declared.
    pub fn add_type(&mut self, ty: Type) -> Result<Arc<Type>> {
        if self.find_type(ty.name()).is_some() {
            return Err(Error::duplicate("type", ty.name()));
        }
        let ty = Arc::new(ty);
        self.types.push(Arc::clone(&ty));
        Ok(ty)
    }

    /// Finds a predicate by name.
    #[must_use]
    pub fn find_predicate(&self, name: &str) -> Option<&Arc<Predicate>> {
        self.predicates.iter().find(|p| p.name() == name)
    }

    /// Adds a predicate, returning the shared handle.
    ///
    /// # Errors
    /// Returns [`Error::DuplicateDeclaration`] on a name collision.
    pub fn add_predicate(&mut self, predicate: Predicate) -> Result<Arc<Predicate>> {
        if self.find_predicate(predicate.name()).is_some() {
            return Err(Error::duplicate("predicate", predicate.name()));
        }
        let predicate = Arc::new(predicate);
        self.predicates.push(Arc::clone(&predicate));
        Ok(predicate)
    }

    /// Finds an action template by name, case-insensitively.
    #[must_use]
    pub fn find_action(&self, name: &str) -> Option<&ActionTemplate> {
        self.actions
            .iter()
            .find(|a| a.name().eq_ignore_ascii_case(name))
    }

    /// Adds an action template.
    ///
    /// # Errors
    /// Returns [`Error::DuplicateDeclaration`] on a (case-insensitive) name
    /// collision.
    pub fn add_action(&mut self, action: ActionTemplate) -> Result<()> {
        if self.find_action(action.name()).is_some() {
            return Err(Error::duplicate("action", action.name()));
        }
        self.actions.push(action);
        Ok(())
    }

    /// Emits the domain as a parseable `(define (domain ...))` block.
    #[must_use]
    pub fn to_pddl(&self) -> String {
        let mut out = format!("(define (domain {})\n", self.name);
        out.push_str(
            "    (:requirements :typing :negative-preconditions :universal-preconditions)\n",
        );
        self.write_types(&mut out);
        out.push_str("    (:predicates\n");
        for predicate in &self.predicates {
            let _ = writeln!(out, "        {}", Self::predicate_signature(predicate));
        }
        out.push_str("    )\n");
        for action in &self.actions {
            let block = action.to_pddl();
            if !block.is_empty() {
                let _ = writeln!(out, "    {block}");
            }
        }
        out.push(')');
        out
    }

    /// Writes the `:types` block, grouping child names under their
    /// immediate parent; the root-parented group renders without `- object`.
    fn write_types(&self, out: &mut String) {
        if self.types.is_empty() {
            return;
        }
        let mut groups: Vec<(&str, Vec<&str>)> = vec![(ROOT_TYPE_NAME, Vec::new())];
        for ty in &self.types {
            let parent = ty.parent().map_or(ROOT_TYPE_NAME, |p| p.name());
            match groups.iter_mut().find(|(name, _)| *name == parent) {
                Some((_, children)) => children.push(ty.name()),
                None => groups.push((parent, vec![ty.name()])),
            }
        }
        out.push_str("    (:types\n");
        for (parent, children) in groups {
            if children.is_empty() {
                continue;
            }
            out.push_str("    ");
            out.push_str(&children.join(" "));
            if parent != ROOT_TYPE_NAME {
                let _ = write!(out, " - {parent}");
            }
            out.push('\n');
        }
        out.push_str("    )\n");
    }

    /// Renders a predicate declaration with fresh variable tokens: `?` plus
    /// the first letter of each slot type, numeric suffix on repeat.
    fn predicate_signature(predicate: &Predicate) -> String {
        let mut out = format!("({}", predicate.name());
        let mut used: Vec<String> = Vec::new();
        for ty in predicate.arguments() {
            let initial = ty.name().chars().next().unwrap_or('v');
            let base = format!("?{initial}");
            let mut candidate = base.clone();
            let mut suffix = 0;
            while used.contains(&candidate) {
                suffix += 1;
                candidate = format!("{base}{suffix}");
            }
            let _ = write!(out, " {candidate} - {}", ty.name());
            used.push(candidate);
        }
        out.push(')');
        out
    }
}

/// Equality by name, types, predicates, and actions; the requirement
/// tokens are presentation detail and do not participate.
impl PartialEq for Domain {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.types == other.types
            && self.predicates == other.predicates
            && self.actions == other.actions
    }
}

impl Eq for Domain {}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Domain Name: {}", self.name)?;
        writeln!(f, "Types:")?;
        for ty in &self.types {
            writeln!(f, "    {ty}")?;
        }
        writeln!(f, "Predicates:")?;
        for predicate in &self.predicates {
            writeln!(f, "    {predicate}")?;
        }
        writeln!(f, "Actions:")?;
        for action in &self.actions {
            writeln!(f, "    {action}")?;
        }
        Ok(())
    }
}
