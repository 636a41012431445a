//! Integration tests for the tokenizer
//!
//! Tests comment stripping, case folding, balance checking, and the
//! section-scoped line-break separators.

use groundplan_foundation::Error;
use groundplan_language::{TokenTree, tokenize, tokenize_fragment};

// =============================================================================
// Structure
// =============================================================================

#[test]
fn mirrors_nesting() {
    let tree = tokenize("(define (domain blocks) (:types\n block\n))").unwrap();
    let items = tree.as_list().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].as_atom(), Some("define"));
    assert!(items[1].as_list().is_some());
}

#[test]
fn folds_case_everywhere() {
    let tree = tokenize("(Define (Domain BLOCKS))").unwrap();
    let inner = tree.as_list().unwrap()[1].as_list().unwrap();
    assert_eq!(inner[1].as_atom(), Some("blocks"));
}

#[test]
fn strips_comments_to_end_of_line() {
    let source = "(a ; ignored, even (unbalanced\n b) ; trailing";
    let tree = tokenize(source).unwrap();
    assert_eq!(tree.as_list().unwrap().len(), 2);
}

// =============================================================================
// Balance and root count
// =============================================================================

#[test]
fn rejects_unbalanced_input() {
    assert!(matches!(tokenize("(a (b)"), Err(Error::Syntax(_))));
    assert!(matches!(tokenize("a))"), Err(Error::Syntax(_))));
}

#[test]
fn whole_file_mode_needs_one_root() {
    assert!(tokenize("(a) (b)").is_err());
    assert!(tokenize("").is_err());
}

#[test]
fn fragment_mode_takes_any_count() {
    assert_eq!(tokenize_fragment("").unwrap().len(), 0);
    assert_eq!(tokenize_fragment("a b (c d)").unwrap().len(), 3);
}

// =============================================================================
// Section separators
// =============================================================================

#[test]
fn separators_only_inside_sections() {
    let tree = tokenize("(define (:types a\n b\n) (:predicates\n (p)\n))").unwrap();
    let groups = tree.as_list().unwrap();
    let types = groups[1].as_list().unwrap();
    assert!(types.iter().any(TokenTree::is_separator));
    let predicates = groups[2].as_list().unwrap();
    assert!(!predicates.iter().any(TokenTree::is_separator));
}

#[test]
fn objects_section_is_separated_too() {
    let tree = tokenize("(:objects a - block\n b - block\n)").unwrap();
    let items = tree.as_list().unwrap();
    assert_eq!(items.iter().filter(|t| t.is_separator()).count(), 2);
}

#[test]
fn consecutive_blank_lines_collapse() {
    let tree = tokenize("(:types a\n\n\n b\n)").unwrap();
    let items = tree.as_list().unwrap();
    assert_eq!(items.iter().filter(|t| t.is_separator()).count(), 2);
}
