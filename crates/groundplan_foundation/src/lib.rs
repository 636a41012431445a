//! Core model types for the Groundplan system.
//!
//! This crate provides:
//! - [`Error`] / [`Result`] - The error taxonomy shared by every layer
//! - [`Type`] - Single-parent type hierarchy rooted at `object`
//! - [`Predicate`] - Named relations of up to two typed argument slots
//! - [`Entity`] - Named, typed instances of the object universe
//! - [`Fact`] - Grounded truth assertions over entities

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod entity;
pub mod error;
pub mod fact;
pub mod predicate;
pub mod types;

pub use entity::{Entity, NameNormalizer, NoNormalization};
pub use error::{Error, Result};
pub use fact::{Fact, TruthValue};
pub use predicate::{MAX_ARITY, Predicate};
pub use types::{ROOT_TYPE_NAME, Type};
