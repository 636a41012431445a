//! Shorthand instructions: line-oriented world mutations.
//!
//! Two forms, parentheses optional, case folded like everything else:
//! `[not] PRED OBJ...` upserts one fact, and `NAME - TYPE` declares one
//! typed entity. Lines go through the fragment tokenizer, not the full file
//! grammar.

use std::sync::Arc;

use groundplan_foundation::{Entity, Error, Fact, Result, TruthValue};
use groundplan_language::{TokenTree, tokenize_fragment};

use crate::world::WorldState;

impl WorldState {
    /// Applies one shorthand instruction line.
    ///
    /// # Errors
    /// Returns an [`Error`] on unbalanced parentheses, an unknown
    /// predicate, object, or type, an arity mismatch, or an empty line.
    pub fn apply_instruction(&mut self, line: &str) -> Result<()> {
        let tokens = tokenize_fragment(line)?;
        let atoms = flatten_atoms(&tokens);
        if atoms.is_empty() {
            return Err(Error::syntax("empty instruction"));
        }
        if atoms.get(1).map(String::as_str) == Some("-") {
            return self.declare_entity(&atoms);
        }
        self.upsert_instruction_fact(&atoms)
    }

    /// `NAME - TYPE`.
    fn declare_entity(&mut self, atoms: &[String]) -> Result<()> {
        if atoms.len() != 3 {
            return Err(Error::syntax(
                "entity declaration takes exactly `name - type`",
            ));
        }
        let ty = self
            .domain()
            .find_type(&atoms[2])
            .ok_or_else(|| Error::unknown("type", atoms[2].clone()))?;
        let entity = Entity::new(atoms[0].clone(), Arc::clone(ty));
        self.add_entity(entity);
        Ok(())
    }

    /// `[not] PRED OBJ...`.
    fn upsert_instruction_fact(&mut self, atoms: &[String]) -> Result<()> {
        let (value, rest) = if atoms[0] == "not" {
            (TruthValue::False, &atoms[1..])
        } else {
            (TruthValue::True, &atoms[..])
        };
        let name = rest
            .first()
            .ok_or_else(|| Error::syntax("instruction missing a predicate"))?;
        let predicate = self
            .domain()
            .find_predicate(name)
            .ok_or_else(|| Error::unknown("predicate", name.clone()))?;
        let predicate = Arc::clone(predicate);
        let mut entities = Vec::with_capacity(rest.len() - 1);
        for object_name in &rest[1..] {
            let entity = self
                .find_entity_ignore_case(object_name)
                .ok_or_else(|| Error::unknown("object", object_name.clone()))?;
            entities.push(entity.clone());
        }
        let fact = Fact::new(predicate, entities, value)?;
        let change = self.upsert_fact(&fact);
        tracing::debug!(fact = %change.fact(), kind = ?change.kind(), "instruction applied");
        Ok(())
    }
}

/// Collects every atom in reading order, discarding list structure.
fn flatten_atoms(tokens: &[TokenTree]) -> Vec<String> {
    let mut atoms = Vec::new();
    for token in tokens {
        match token {
            TokenTree::Atom(text) => atoms.push(text.clone()),
            TokenTree::List(items) => atoms.extend(flatten_atoms(items)),
        }
    }
    atoms
}
