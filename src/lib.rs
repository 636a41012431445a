//! Groundplan - Typed planning-domain language and execution engine
//!
//! This crate re-exports all layers of the Groundplan system for convenient
//! access. For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: groundplan_engine     — World state, evaluation, effect application
//! Layer 2: groundplan_language   — Tokenizer, recursive descent parser
//! Layer 1: groundplan_model      — Domains, problems, actions, grounding
//! Layer 0: groundplan_foundation — Core types (Type, Predicate, Entity, Fact)
//! ```

pub use groundplan_engine as engine;
pub use groundplan_foundation as foundation;
pub use groundplan_language as language;
pub use groundplan_model as model;
