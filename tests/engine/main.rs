//! Integration tests for the engine layer
//!
//! Tests for world state evaluation, effect application, and shorthand
//! instructions.

mod instructions;
mod world;
