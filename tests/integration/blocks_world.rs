//! End-to-end blocks world scenario
//!
//! Parses a domain and problem, grounds an action, applies it, and checks
//! the world through every stage.

use std::collections::BTreeMap;
use std::sync::Arc;

use groundplan_engine::{ChangeKind, WorldState};
use groundplan_foundation::TruthValue;
use groundplan_language::{parse_domain, parse_problem};
use groundplan_model::GroundedAction;

const DOMAIN: &str = "
(define (domain blocks)
    (:requirements :typing :negative-preconditions)
    (:types
    block
    )
    (:predicates
        (on ?x - block ?y - block)
        (clear ?x - block)
    )
    (:action move
        :parameters (?x - block ?y - block)
        :precondition (and (clear ?x) (clear ?y))
        :effect (and (on ?x ?y) (not (clear ?y)))
    )
)";

const PROBLEM: &str = "
(define (problem tower)
    (:domain blocks)
    (:objects
    a b - block
    )
    (:init
        (clear a)
        (clear b)
    )
    (:goal ())
)";

#[test]
fn move_block_end_to_end() {
    let domain = Arc::new(parse_domain(DOMAIN).unwrap());
    let problem = parse_problem(PROBLEM, &domain).unwrap();
    let mut world = WorldState::from_problem(&problem);

    let template = domain.find_action("move").unwrap();
    let bindings = BTreeMap::from([
        ("?x".to_string(), world.find_entity("a").unwrap().clone()),
        ("?y".to_string(), world.find_entity("b").unwrap().clone()),
    ]);
    let action = GroundedAction::new(template, bindings).unwrap();
    assert_eq!(action.execution_string(), "move(a, b)");

    // Grounded trees hold concrete facts only.
    assert!(!action.precondition().has_symbolic_leaves());
    assert!(!action.effect().has_symbolic_leaves());

    let verdict = world.evaluate_precondition(action.precondition()).unwrap();
    assert!(verdict.met());
    assert!(verdict.reason().is_none());

    let changes = world.apply_action(&action, true).unwrap();
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[0].kind(), ChangeKind::New);
    assert_eq!(changes[0].fact().to_pddl(), "(on a b)");
    assert_eq!(changes[1].kind(), ChangeKind::ChangedValue);
    assert_eq!(changes[1].fact().to_pddl(), "(not (clear b))");

    // The world now holds three facts, one flipped in place.
    assert_eq!(world.facts().len(), 3);
    let b = world.find_entity("b").unwrap().clone();
    let clear_b = world.facts_about(&b, Some(&["clear"]), None);
    assert_eq!(clear_b.len(), 1);
    assert_eq!(clear_b[0].value(), TruthValue::False);

    // Applying again must fail the gate, citing the flipped fact.
    let verdict = world.evaluate_precondition(action.precondition()).unwrap();
    assert!(!verdict.met());
    assert!(verdict.reason().unwrap().contains("(clear b)"));
    assert!(world.apply_action(&action, true).unwrap().is_empty());
}

#[test]
fn swap_scenario_with_bare_leaf_precondition() {
    let domain_source = "
(define (domain swap)
    (:types
    block
    )
    (:predicates (on ?x - block ?y - block))
    (:action move
        :parameters (?x - block ?y - block)
        :precondition (on ?x ?y)
        :effect (and (not (on ?x ?y)) (on ?y ?x))
    )
)";
    let problem_source = "
(define (problem start)
    (:domain swap)
    (:objects
    a b - block
    )
    (:init (on a b))
)";
    let domain = Arc::new(parse_domain(domain_source).unwrap());
    let problem = parse_problem(problem_source, &domain).unwrap();
    let mut world = WorldState::from_problem(&problem);

    let template = domain.find_action("move").unwrap();
    let bindings = BTreeMap::from([
        ("?x".to_string(), world.find_entity("a").unwrap().clone()),
        ("?y".to_string(), world.find_entity("b").unwrap().clone()),
    ]);
    let action = GroundedAction::new(template, bindings).unwrap();

    assert!(world
        .evaluate_precondition(action.precondition())
        .unwrap()
        .met());

    let changes = world.apply_action(&action, true).unwrap();
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[0].kind(), ChangeKind::ChangedValue);
    assert_eq!(changes[0].fact().to_pddl(), "(not (on a b))");
    assert_eq!(changes[1].kind(), ChangeKind::New);
    assert_eq!(changes[1].fact().to_pddl(), "(on b a)");

    let verdict = world.evaluate_precondition(action.precondition()).unwrap();
    assert!(!verdict.met());
    assert!(verdict.reason().unwrap().contains("(on a b)"));
}

#[test]
fn world_survives_an_emission_cycle_after_changes() {
    let domain = Arc::new(parse_domain(DOMAIN).unwrap());
    let problem = parse_problem(PROBLEM, &domain).unwrap();
    let mut world = WorldState::from_problem(&problem);
    world.apply_instruction("c - block").unwrap();
    world.apply_instruction("not clear b").unwrap();

    let text = world.to_pddl();
    let reparsed = parse_problem(&text, &domain).unwrap();
    let reloaded = WorldState::from_problem(&reparsed);
    assert_eq!(reloaded.entities().len(), world.entities().len());
    assert_eq!(reloaded.facts(), world.facts());
}
