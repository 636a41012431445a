//! Tokenizer and recursive descent parser for the Groundplan language.
//!
//! This crate provides:
//! - [`TokenTree`] - Nested list-of-lists mirror of balanced parentheses
//! - [`tokenize`] / [`tokenize_fragment`] - Source text to token trees
//! - [`parse_domain`] / [`parse_problem`] - Token trees to validated models

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod parser;
pub mod tokenizer;

pub use parser::{parse_domain, parse_problem, parse_problem_with_normalizer};
pub use tokenizer::{SEPARATOR, TokenTree, tokenize, tokenize_fragment};
