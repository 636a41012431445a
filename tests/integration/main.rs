//! Cross-layer integration tests for Groundplan
//!
//! Tests that drive parsing, grounding, and the world state engine
//! together.

mod blocks_world;
