//! Integration tests for shorthand instructions
//!
//! Tests the line-oriented mutation form against a parsed domain.

use std::sync::Arc;

use groundplan_engine::WorldState;
use groundplan_foundation::{Error, TruthValue};
use groundplan_language::parse_domain;

const DOMAIN: &str = "
(define (domain blocks)
    (:types
    block
    table - block
    )
    (:predicates
        (on ?x - block ?y - block)
        (clear ?x - block)
    )
)";

fn world() -> WorldState {
    let domain = Arc::new(parse_domain(DOMAIN).unwrap());
    WorldState::new(domain)
}

// =============================================================================
// Entity declarations
// =============================================================================

#[test]
fn declares_entities_with_subtypes() {
    let mut world = world();
    world.apply_instruction("a - block").unwrap();
    world.apply_instruction("desk - table").unwrap();
    assert_eq!(world.entities().len(), 2);
    assert!(world
        .find_entity("desk")
        .unwrap()
        .ty()
        .is_within("block"));
}

#[test]
fn redeclaring_an_entity_is_skipped_silently() {
    let mut world = world();
    world.apply_instruction("a - block").unwrap();
    world.apply_instruction("a - table").unwrap();
    assert_eq!(world.entities().len(), 1);
    assert_eq!(world.find_entity("a").unwrap().ty().name(), "block");
}

// =============================================================================
// Fact upserts
// =============================================================================

#[test]
fn builds_a_scene_line_by_line() {
    let mut world = world();
    for line in ["a - block", "b - block", "clear a", "on a b", "not clear b"] {
        world.apply_instruction(line).unwrap();
    }
    assert_eq!(world.entities().len(), 2);
    assert_eq!(world.facts().len(), 3);
    let b = world.find_entity("b").unwrap().clone();
    let false_about_b = world.facts_about(&b, Some(&["clear"]), Some(&[TruthValue::False]));
    assert_eq!(false_about_b.len(), 1);
}

#[test]
fn instruction_errors_leave_the_world_unchanged() {
    let mut world = world();
    world.apply_instruction("a - block").unwrap();
    assert!(matches!(
        world.apply_instruction("on a"),
        Err(Error::ArityMismatch { .. })
    ));
    assert!(matches!(
        world.apply_instruction("stacked a a"),
        Err(Error::UnknownReference {
            kind: "predicate",
            ..
        })
    ));
    assert!(world.facts().is_empty());
}

#[test]
fn unbalanced_instruction_fails() {
    let mut world = world();
    assert!(matches!(
        world.apply_instruction("(clear a"),
        Err(Error::Syntax(_))
    ));
}
