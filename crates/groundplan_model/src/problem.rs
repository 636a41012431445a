//! The problem: an object universe and an initial fact list over a domain.

use std::fmt;
use std::sync::Arc;

use groundplan_foundation::{Entity, Error, Fact, Result};

use crate::domain::Domain;

/// A problem instance: entities and initial facts, read-only over a
/// [`Domain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    name: String,
    domain: Arc<Domain>,
    objects: Vec<Entity>,
    init: Vec<Fact>,
}

impl Problem {
    /// Creates an empty problem over `domain`.
    #[must_use]
    pub fn new(name: impl Into<String>, domain: Arc<Domain>) -> Self {
        Self {
            name: name.into(),
            domain,
            objects: Vec::new(),
            init: Vec::new(),
        }
    }

    /// Returns the problem's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the domain this problem is stated over.
    #[must_use]
    pub fn domain(&self) -> &Arc<Domain> {
        &self.domain
    }

    /// Returns the declared objects, in declaration order.
    #[must_use]
    pub fn objects(&self) -> &[Entity] {
        &self.objects
    }

    /// Returns the initial facts, in declaration order.
    #[must_use]
    pub fn init(&self) -> &[Fact] {
        &self.init
    }

    /// Adds an object.
    ///
    /// # Errors
    /// Returns [`Error::DuplicateDeclaration`] if an object of the same
    /// name already exists.
    pub fn add_object(&mut self, object: Entity) -> Result<()> {
        if self.find_object(object.name()).is_some() {
            return Err(Error::duplicate("object", object.name()));
        }
        self.objects.push(object);
        Ok(())
    }

    /// Finds an object by name, case-insensitively.
    #[must_use]
    pub fn find_object(&self, name: &str) -> Option<&Entity> {
        self.objects
            .iter()
            .find(|o| o.name().eq_ignore_ascii_case(name))
    }

    /// Returns the objects whose extension chain contains `type_name`,
    /// skipping objects whose direct type is in `exclude`.
    #[must_use]
    pub fn objects_with_type(&self, type_name: &str, exclude: &[&str]) -> Vec<&Entity> {
        self.objects
            .iter()
            .filter(|o| o.ty().is_within(type_name))
            .filter(|o| !exclude.contains(&o.ty().name()))
            .collect()
    }

    /// Adds a fact to the initial state.
    ///
    /// # Errors
    /// Returns [`Error::DuplicateDeclaration`] if an equal fact is already
    /// present.
    pub fn add_init_fact(&mut self, fact: Fact) -> Result<()> {
        if self.init.contains(&fact) {
            return Err(Error::duplicate("fact", fact.to_string()));
        }
        self.init.push(fact);
        Ok(())
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Problem name: {} Associated Domain name: {}",
            self.name,
            self.domain.name()
        )?;
        writeln!(f, "Objects:")?;
        for object in &self.objects {
            writeln!(f, "    {object}")?;
        }
        writeln!(f, "Initial State:")?;
        for fact in &self.init {
            writeln!(f, "    {fact}")?;
        }
        Ok(())
    }
}
