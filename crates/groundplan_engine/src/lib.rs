//! Mutable world state for the Groundplan system.
//!
//! This crate provides:
//! - [`WorldState`] - The entity universe and fact base over a domain
//! - [`Evaluation`] - Non-failing precondition verdicts with reasons
//! - [`EffectChange`] - The per-fact outcome of applying an effect tree

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod instruction;
pub mod world;

pub use world::{ChangeKind, EffectChange, Evaluation, WorldState};
