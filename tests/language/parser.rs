//! Integration tests for the parser
//!
//! Tests full domain and problem files against the validated model.

use std::sync::Arc;

use groundplan_foundation::Error;
use groundplan_language::{parse_domain, parse_problem};
use groundplan_model::Proposition;

const DOMAIN: &str = "
(define (domain blocks)
    (:requirements :typing :negative-preconditions :universal-preconditions)
    (:types
    block
    table - block
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
    (:action sweep
        :parameters (?t - table)
        :precondition (forall (?b - block) (clear ?b))
        :effect (clear ?t)
    )
)";

const PROBLEM: &str = "
(define (problem tower)
    (:domain blocks)
    (:objects
    a b c - block
    desk - table
    )
    (:init
        (clear a)
        (clear b)
        (on c desk)
    )
    (:goal ())
)";

// =============================================================================
// Domain files
// =============================================================================

#[test]
fn full_domain_parses() {
    let domain = parse_domain(DOMAIN).unwrap();
    assert_eq!(domain.name(), "blocks");
    assert_eq!(
        domain.requirements(),
        [":typing", ":negative-preconditions", ":universal-preconditions"]
    );
    assert_eq!(domain.types().len(), 2);
    assert!(domain.find_type("table").unwrap().is_within("block"));
    assert_eq!(domain.predicates().len(), 2);
    assert_eq!(domain.actions().len(), 2);
}

#[test]
fn move_action_trees_have_expected_shape() {
    let domain = parse_domain(DOMAIN).unwrap();
    let action = domain.find_action("move").unwrap();
    match action.precondition() {
        Proposition::And(children) => assert_eq!(children.len(), 2),
        other => panic!("expected conjunction, got {}", other.to_pddl()),
    }
    match action.effect() {
        Proposition::And(children) => {
            assert!(matches!(children[1], Proposition::Not(_)));
        }
        other => panic!("expected conjunction, got {}", other.to_pddl()),
    }
}

#[test]
fn forall_precondition_survives_parsing() {
    let domain = parse_domain(DOMAIN).unwrap();
    let action = domain.find_action("sweep").unwrap();
    match action.precondition() {
        Proposition::ForAll { variable, body } => {
            assert_eq!(variable.name(), "?b");
            assert_eq!(variable.ty().name(), "block");
            assert!(body.is_leaf());
        }
        other => panic!("expected forall, got {}", other.to_pddl()),
    }
}

#[test]
fn unknown_define_groups_are_skipped() {
    let source = "
(define (domain d)
    (:functions (total-cost))
    (:types\n a\n)
    (:predicates (p ?x - a))
)";
    let domain = parse_domain(source).unwrap();
    assert_eq!(domain.predicates().len(), 1);
}

#[test]
fn duplicate_type_aborts_the_file() {
    let source = "(define (domain d) (:types\n a\n a\n))";
    assert!(matches!(
        parse_domain(source),
        Err(Error::DuplicateDeclaration { kind: "type", .. })
    ));
}

#[test]
fn object_literal_resolves_to_the_root() {
    let source = "
(define (domain d)
    (:types\n thing - object\n)
    (:predicates (p ?x - thing))
)";
    let domain = parse_domain(source).unwrap();
    assert!(domain.find_type("thing").unwrap().parent().unwrap().is_root());
}

// =============================================================================
// Problem files
// =============================================================================

#[test]
fn full_problem_parses() {
    let domain = Arc::new(parse_domain(DOMAIN).unwrap());
    let problem = parse_problem(PROBLEM, &domain).unwrap();
    assert_eq!(problem.name(), "tower");
    assert_eq!(problem.objects().len(), 4);
    assert_eq!(problem.init().len(), 3);
    assert_eq!(problem.find_object("desk").unwrap().ty().name(), "table");
}

#[test]
fn init_facts_bind_declared_objects() {
    let domain = Arc::new(parse_domain(DOMAIN).unwrap());
    let problem = parse_problem(PROBLEM, &domain).unwrap();
    let on_c_desk = &problem.init()[2];
    assert_eq!(on_c_desk.predicate().name(), "on");
    assert_eq!(on_c_desk.entities()[1].name(), "desk");
}

#[test]
fn mismatched_domain_reference_fails() {
    let domain = Arc::new(parse_domain(DOMAIN).unwrap());
    let source = PROBLEM.replace("(:domain blocks)", "(:domain logistics)");
    assert!(matches!(
        parse_problem(&source, &domain),
        Err(Error::DomainMismatch { .. })
    ));
}

#[test]
fn duplicate_objects_fail() {
    let domain = Arc::new(parse_domain(DOMAIN).unwrap());
    let source = PROBLEM.replace("a b c - block", "a a - block");
    assert!(matches!(
        parse_problem(&source, &domain),
        Err(Error::DuplicateDeclaration { kind: "object", .. })
    ));
}

// =============================================================================
// Emission round-trip
// =============================================================================

#[test]
fn emitted_domain_reparses_equal() {
    let domain = parse_domain(DOMAIN).unwrap();
    let text = domain.to_pddl();
    let reparsed = parse_domain(&text).unwrap();
    assert_eq!(domain, reparsed);
}

#[test]
fn availability_and_special_flags_shape_emission() {
    let domain = parse_domain(DOMAIN).unwrap();
    let mut action = domain.find_action("sweep").unwrap().clone();

    action.set_special(true);
    assert!(action.to_pddl().starts_with("(:special-action sweep"));

    action.set_available(false);
    assert_eq!(action.to_pddl(), "");
}
