//! The world state: a mutable fact base over a fixed domain.
//!
//! Precondition failure is a verdict, not an error: [`WorldState::evaluate_precondition`]
//! returns an [`Evaluation`] carrying a human-readable reason for the first
//! unmet condition. Errors are reserved for structurally broken input, such
//! as a symbolic leaf reaching an effect application.

use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Write;
use std::sync::Arc;

use groundplan_foundation::{Entity, Error, Fact, Predicate, Result, TruthValue};
use groundplan_model::{
    ActionParameter, Domain, GroundedAction, Problem, Proposition, ground_proposition,
};

/// The verdict of a precondition check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    met: bool,
    reason: Option<String>,
}

impl Evaluation {
    /// A met condition.
    #[must_use]
    pub fn holds() -> Self {
        Self {
            met: true,
            reason: None,
        }
    }

    /// An unmet condition with its reason.
    #[must_use]
    pub fn fails(reason: impl Into<String>) -> Self {
        Self {
            met: false,
            reason: Some(reason.into()),
        }
    }

    /// Returns whether the condition was met.
    #[must_use]
    pub fn met(&self) -> bool {
        self.met
    }

    /// Returns the reason the condition was unmet, if it was.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

/// What applying one grounded fact did to the fact base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// The atom was absent and the fact was inserted.
    New,
    /// The atom was present and its truth value was overwritten, whether or
    /// not the value actually differed.
    ChangedValue,
}

/// One per-fact outcome of an effect application, in application order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectChange {
    kind: ChangeKind,
    fact: Fact,
}

impl EffectChange {
    /// Returns whether the fact was new or overwritten.
    #[must_use]
    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    /// Returns the fact as it now stands in the world.
    #[must_use]
    pub fn fact(&self) -> &Fact {
        &self.fact
    }
}

/// The entity universe and fact base of one running environment.
///
/// The domain is fixed at construction; entities and facts accumulate over
/// the world's life. At most one fact per atom is held: inserts of an
/// already-present atom are skipped (and logged), and effects overwrite the
/// truth value in place.
#[derive(Debug, Clone)]
pub struct WorldState {
    domain: Arc<Domain>,
    entities: Vec<Entity>,
    facts: Vec<Fact>,
}

impl WorldState {
    /// Creates an empty world over `domain`.
    #[must_use]
    pub fn new(domain: Arc<Domain>) -> Self {
        Self {
            domain,
            entities: Vec::new(),
            facts: Vec::new(),
        }
    }

    /// Creates a world seeded with a problem's objects and initial facts.
    #[must_use]
    pub fn from_problem(problem: &Problem) -> Self {
        let mut world = Self::new(Arc::clone(problem.domain()));
        for object in problem.objects() {
            world.add_entity(object.clone());
        }
        for fact in problem.init() {
            world.add_fact(fact.clone());
        }
        world
    }

    /// Returns the domain this world runs over.
    #[must_use]
    pub fn domain(&self) -> &Arc<Domain> {
        &self.domain
    }

    /// Returns the entity universe, in insertion order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Returns the fact base, in insertion order.
    #[must_use]
    pub fn facts(&self) -> &[Fact] {
        &self.facts
    }

    /// Inserts an entity; an entity of the same name is skipped, not an
    /// error.
    pub fn add_entity(&mut self, entity: Entity) {
        if self.find_entity(entity.name()).is_some() {
            tracing::debug!(entity = %entity, "skipping duplicate entity insert");
            return;
        }
        self.entities.push(entity);
    }

    /// Inserts a fact; a fact over the same atom is skipped, not an error.
    pub fn add_fact(&mut self, fact: Fact) {
        if self.find_fact(&fact, true).is_some() {
            tracing::debug!(fact = %fact, "skipping duplicate fact insert");
            return;
        }
        self.facts.push(fact);
    }

    /// Finds a fact equal to `fact`; with `ignore_value` the truth value
    /// does not participate in the match.
    #[must_use]
    pub fn find_fact(&self, fact: &Fact, ignore_value: bool) -> Option<&Fact> {
        self.facts.iter().find(|candidate| {
            if ignore_value {
                candidate.same_atom(fact)
            } else {
                *candidate == fact
            }
        })
    }

    /// Finds an entity by exact name.
    #[must_use]
    pub fn find_entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name() == name)
    }

    /// Finds an entity by name, folding ASCII case.
    #[must_use]
    pub fn find_entity_ignore_case(&self, name: &str) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|e| e.name().eq_ignore_ascii_case(name))
    }

    /// Returns the entities whose extension chain contains `type_name`,
    /// skipping entities whose direct type is in `exclude`.
    #[must_use]
    pub fn entities_with_type(&self, type_name: &str, exclude: &[&str]) -> Vec<&Entity> {
        self.entities
            .iter()
            .filter(|e| e.ty().is_within(type_name))
            .filter(|e| !exclude.contains(&e.ty().name()))
            .collect()
    }

    /// Returns the facts mentioning `entity`, optionally restricted to the
    /// named predicates and to the given truth values.
    #[must_use]
    pub fn facts_about(
        &self,
        entity: &Entity,
        predicates: Option<&[&str]>,
        values: Option<&[TruthValue]>,
    ) -> Vec<&Fact> {
        self.facts
            .iter()
            .filter(|fact| fact.mentions(entity))
            .filter(|fact| {
                predicates.is_none_or(|names| names.contains(&fact.predicate().name()))
            })
            .filter(|fact| values.is_none_or(|wanted| wanted.contains(&fact.value())))
            .collect()
    }

    /// Returns the domain's predicates as a name-keyed map view.
    #[must_use]
    pub fn predicate_catalogue(&self) -> BTreeMap<&str, &Arc<Predicate>> {
        self.domain
            .predicates()
            .iter()
            .map(|p| (p.name(), p))
            .collect()
    }

    /// Evaluates a grounded precondition tree against the fact base.
    ///
    /// `and` short-circuits on the first unmet child, `or` on the first met
    /// one; a quantifier expands over every entity whose extension chain
    /// contains the bound variable's type and is vacuously met over an
    /// empty extension.
    ///
    /// # Errors
    /// Returns an [`Error`] only when expanding a quantified body fails
    /// structurally; an unmet condition is an [`Evaluation`], not an error.
    pub fn evaluate_precondition(&self, proposition: &Proposition) -> Result<Evaluation> {
        match proposition {
            Proposition::And(children) => {
                for child in children {
                    let verdict = self.evaluate_precondition(child)?;
                    if !verdict.met() {
                        return Ok(verdict);
                    }
                }
                Ok(Evaluation::holds())
            }
            Proposition::Or(children) => {
                let mut last_reason = None;
                for child in children {
                    let verdict = self.evaluate_precondition(child)?;
                    if verdict.met() {
                        return Ok(Evaluation::holds());
                    }
                    last_reason = verdict.reason;
                }
                Ok(Evaluation {
                    met: false,
                    reason: last_reason.or_else(|| Some("no disjunct holds".to_string())),
                })
            }
            // Grounding collapses negation into the leaf value, so an
            // explicit node only appears in hand-built trees.
            Proposition::Not(child) => {
                let verdict = self.evaluate_precondition(child)?;
                if verdict.met() {
                    Ok(Evaluation::fails("negated condition holds"))
                } else {
                    Ok(Evaluation::holds())
                }
            }
            Proposition::ForAll { variable, body } => self.evaluate_forall(variable, body),
            Proposition::Fact(fact) => {
                if self.find_fact(fact, false).is_some() {
                    Ok(Evaluation::holds())
                } else {
                    Ok(Evaluation::fails(format!(
                        "fact {} does not hold",
                        fact.to_pddl()
                    )))
                }
            }
            Proposition::Atom(_) => Ok(Evaluation::fails(format!(
                "symbolic leaf {} cannot be evaluated",
                proposition.to_pddl()
            ))),
        }
    }

    fn evaluate_forall(&self, variable: &ActionParameter, body: &Proposition) -> Result<Evaluation> {
        for entity in self.entities_with_type(variable.ty().name(), &[]) {
            let bindings = BTreeMap::from([(variable.name().to_string(), entity.clone())]);
            let grounded = ground_proposition(body, &bindings)?;
            let verdict = self.evaluate_precondition(&grounded)?;
            if !verdict.met() {
                return Ok(Evaluation::fails(format!(
                    "entity {} fails the quantified body: {}",
                    entity.name(),
                    verdict.reason().unwrap_or("unmet")
                )));
            }
        }
        Ok(Evaluation::holds())
    }

    /// Applies a grounded effect tree, flattening it into per-fact upserts.
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedConstruct`] if the tree still carries a
    /// symbolic leaf or an explicit negation node, and propagates quantifier
    /// expansion failures.
    pub fn apply_effect(&mut self, effect: &Proposition) -> Result<Vec<EffectChange>> {
        let mut changes = Vec::new();
        self.apply_effect_into(effect, &mut changes)?;
        Ok(changes)
    }

    fn apply_effect_into(
        &mut self,
        effect: &Proposition,
        changes: &mut Vec<EffectChange>,
    ) -> Result<()> {
        match effect {
            Proposition::And(children) | Proposition::Or(children) => {
                for child in children {
                    self.apply_effect_into(child, changes)?;
                }
                Ok(())
            }
            Proposition::Fact(fact) => {
                changes.push(self.upsert_fact(fact));
                Ok(())
            }
            Proposition::ForAll { variable, body } => {
                let entities: Vec<Entity> = self
                    .entities_with_type(variable.ty().name(), &[])
                    .into_iter()
                    .cloned()
                    .collect();
                for entity in entities {
                    let bindings = BTreeMap::from([(variable.name().to_string(), entity)]);
                    let grounded = ground_proposition(body, &bindings)?;
                    self.apply_effect_into(&grounded, changes)?;
                }
                Ok(())
            }
            Proposition::Not(_) => Err(Error::unsupported("an explicit negation in an effect")),
            Proposition::Atom(_) => Err(Error::unsupported("a symbolic leaf in an effect")),
        }
    }

    /// Overwrites the truth value if the atom is present, inserts otherwise.
    pub(crate) fn upsert_fact(&mut self, fact: &Fact) -> EffectChange {
        match self.facts.iter_mut().find(|f| f.same_atom(fact)) {
            Some(existing) => {
                existing.set_value(fact.value());
                EffectChange {
                    kind: ChangeKind::ChangedValue,
                    fact: fact.clone(),
                }
            }
            None => {
                self.facts.push(fact.clone());
                EffectChange {
                    kind: ChangeKind::New,
                    fact: fact.clone(),
                }
            }
        }
    }

    /// Applies a grounded action. With `check` set, the precondition gates
    /// the application: a failed gate applies nothing and returns an empty
    /// change list.
    ///
    /// # Errors
    /// Same conditions as [`WorldState::apply_effect`].
    pub fn apply_action(
        &mut self,
        action: &GroundedAction,
        check: bool,
    ) -> Result<Vec<EffectChange>> {
        if check {
            let gate = self.evaluate_precondition(action.precondition())?;
            if !gate.met() {
                tracing::debug!(
                    action = %action.execution_string(),
                    reason = gate.reason().unwrap_or(""),
                    "precondition not met; nothing applied"
                );
                return Ok(Vec::new());
            }
        }
        self.apply_effect(action.effect())
    }

    /// Emits the world as a problem-shaped block named `currentEnvironment`.
    #[must_use]
    pub fn to_pddl(&self) -> String {
        let mut out = String::from("(define (problem currentEnvironment)\n");
        let _ = writeln!(out, "    (:domain {})", self.domain.name());
        out.push_str("    (:objects\n");
        for entity in &self.entities {
            let _ = writeln!(out, "    {} - {}", entity.name(), entity.ty().name());
        }
        out.push_str("    )\n    (:init\n");
        for fact in &self.facts {
            let _ = writeln!(out, "        {}", fact.to_pddl());
        }
        out.push_str("    )\n    (:goal ())\n)");
        out
    }
}

impl fmt::Display for WorldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "World over domain {}", self.domain.name())?;
        writeln!(f, "Entities:")?;
        for entity in &self.entities {
            writeln!(f, "    {entity}")?;
        }
        writeln!(f, "Facts:")?;
        for fact in &self.facts {
            writeln!(f, "    {fact}")?;
        }
        Ok(())
    }
}
