//! Domain and problem model for the Groundplan system.
//!
//! This crate provides:
//! - [`ActionParameter`] / [`Term`] - Symbolic and concrete argument slots
//! - [`Proposition`] - The expression tree shared by preconditions and effects
//! - [`ActionTemplate`] - Parameterized actions with symbolic trees
//! - [`GroundedAction`] - An action template bound to concrete entities
//! - [`Domain`] / [`Problem`] - Owning catalogues and object universes

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod action;
pub mod domain;
pub mod grounded;
pub mod parameter;
pub mod problem;
pub mod proposition;

pub use action::ActionTemplate;
pub use domain::Domain;
pub use grounded::{GroundedAction, ground_proposition};
pub use parameter::{ActionParameter, Term};
pub use problem::Problem;
pub use proposition::{Atom, Proposition};
