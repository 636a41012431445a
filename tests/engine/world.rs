//! Integration tests for the world state
//!
//! Drives the engine through parsed files rather than hand-built models.

use std::collections::BTreeMap;
use std::sync::Arc;

use groundplan_engine::{ChangeKind, WorldState};
use groundplan_foundation::TruthValue;
use groundplan_language::{parse_domain, parse_problem};
use groundplan_model::{Domain, GroundedAction, Problem};

const DOMAIN: &str = "
(define (domain blocks)
    (:requirements :typing)
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
    (:action tidy
        :parameters ()
        :precondition (forall (?b - block) (clear ?b))
        :effect (forall (?b - block) (not (on ?b ?b)))
    )
)";

const PROBLEM: &str = "
(define (problem tower)
    (:domain blocks)
    (:objects
    a b c - block
    )
    (:init
        (clear a)
        (clear b)
        (clear c)
    )
    (:goal ())
)";

fn load() -> (Arc<Domain>, Problem) {
    let domain = Arc::new(parse_domain(DOMAIN).unwrap());
    let problem = parse_problem(PROBLEM, &domain).unwrap();
    (domain, problem)
}

fn ground(domain: &Domain, world: &WorldState, name: &str, args: &[&str]) -> GroundedAction {
    let template = domain.find_action(name).unwrap();
    let bindings: BTreeMap<String, groundplan_foundation::Entity> = template
        .parameters()
        .iter()
        .zip(args)
        .map(|(param, arg)| {
            (
                param.name().to_string(),
                world.find_entity(arg).unwrap().clone(),
            )
        })
        .collect();
    GroundedAction::new(template, bindings).unwrap()
}

// =============================================================================
// Seeding
// =============================================================================

#[test]
fn from_problem_seeds_objects_and_facts() {
    let (_, problem) = load();
    let world = WorldState::from_problem(&problem);
    assert_eq!(world.entities().len(), 3);
    assert_eq!(world.facts().len(), 3);
    assert!(world.facts().iter().all(|f| f.value().is_true()));
}

// =============================================================================
// Action application
// =============================================================================

#[test]
fn applying_move_updates_the_fact_base() {
    let (domain, problem) = load();
    let mut world = WorldState::from_problem(&problem);
    let action = ground(&domain, &world, "move", &["a", "b"]);

    assert!(world
        .evaluate_precondition(action.precondition())
        .unwrap()
        .met());

    let changes = world.apply_action(&action, true).unwrap();
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[0].kind(), ChangeKind::New);
    assert_eq!(changes[0].fact().predicate().name(), "on");
    assert_eq!(changes[1].kind(), ChangeKind::ChangedValue);
    assert_eq!(changes[1].fact().value(), TruthValue::False);
}

#[test]
fn reevaluation_after_application_cites_the_flipped_fact() {
    let (domain, problem) = load();
    let mut world = WorldState::from_problem(&problem);
    let action = ground(&domain, &world, "move", &["a", "b"]);
    world.apply_action(&action, true).unwrap();

    let verdict = world.evaluate_precondition(action.precondition()).unwrap();
    assert!(!verdict.met());
    assert!(verdict.reason().unwrap().contains("(clear b)"));
}

#[test]
fn conjunction_reason_cites_the_first_unmet_child() {
    let (domain, problem) = load();
    let mut world = WorldState::from_problem(&problem);
    world.apply_instruction("not clear a").unwrap();
    world.apply_instruction("not clear b").unwrap();

    // Both conjuncts are unmet; evaluation must stop at the first.
    let action = ground(&domain, &world, "move", &["a", "b"]);
    let verdict = world.evaluate_precondition(action.precondition()).unwrap();
    assert!(!verdict.met());
    let reason = verdict.reason().unwrap();
    assert!(reason.contains("(clear a)"));
    assert!(!reason.contains("(clear b)"));
}

#[test]
fn failed_gate_leaves_the_world_untouched() {
    let (domain, problem) = load();
    let mut world = WorldState::from_problem(&problem);
    let first = ground(&domain, &world, "move", &["a", "b"]);
    world.apply_action(&first, true).unwrap();
    let before = world.facts().to_vec();

    // b is no longer clear, so moving onto it must gate.
    let second = ground(&domain, &world, "move", &["c", "b"]);
    let changes = world.apply_action(&second, true).unwrap();
    assert!(changes.is_empty());
    assert_eq!(world.facts(), before.as_slice());
}

#[test]
fn unchecked_application_skips_the_gate() {
    let (domain, problem) = load();
    let mut world = WorldState::from_problem(&problem);
    let first = ground(&domain, &world, "move", &["a", "b"]);
    world.apply_action(&first, true).unwrap();

    let second = ground(&domain, &world, "move", &["c", "b"]);
    let changes = world.apply_action(&second, false).unwrap();
    assert_eq!(changes.len(), 2);
}

// =============================================================================
// Quantifiers through the full pipeline
// =============================================================================

#[test]
fn forall_precondition_tracks_the_entity_universe() {
    let (domain, problem) = load();
    let mut world = WorldState::from_problem(&problem);
    let tidy = ground(&domain, &world, "tidy", &[]);
    assert!(world
        .evaluate_precondition(tidy.precondition())
        .unwrap()
        .met());

    let mover = ground(&domain, &world, "move", &["a", "b"]);
    world.apply_action(&mover, true).unwrap();
    let verdict = world.evaluate_precondition(tidy.precondition()).unwrap();
    assert!(!verdict.met());
    assert!(verdict.reason().unwrap().contains('b'));
}

#[test]
fn forall_effect_touches_every_typed_entity() {
    let (domain, problem) = load();
    let mut world = WorldState::from_problem(&problem);
    let tidy = ground(&domain, &world, "tidy", &[]);
    let changes = world.apply_action(&tidy, true).unwrap();
    assert_eq!(changes.len(), 3);
    assert!(changes
        .iter()
        .all(|c| c.fact().value() == TruthValue::False));
}

// =============================================================================
// Emission
// =============================================================================

#[test]
fn world_emits_a_parseable_problem() {
    let (domain, problem) = load();
    let world = WorldState::from_problem(&problem);
    let text = world.to_pddl();
    let reparsed = parse_problem(&text, &domain).unwrap();
    assert_eq!(reparsed.name(), "currentenvironment");
    assert_eq!(reparsed.objects().len(), 3);
    assert_eq!(reparsed.init().len(), 3);
}
