//! Tokenizer for the Groundplan language.
//!
//! The tokenizer strips `;`-to-end-of-line comments, lower-cases the
//! remainder, and mirrors balanced parentheses into a nested list
//! structure. Inside a `:types` or `:objects` section, line breaks are
//! retained as explicit separator atoms so the grammar can group the
//! comma-free, newline-delimited declarations; everywhere else they are
//! discardable whitespace.

use groundplan_foundation::{Error, Result};

/// The explicit separator atom retained inside `:types`/`:objects`.
pub const SEPARATOR: &str = "\n";

/// A node of the token tree: a bare token or a parenthesized list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenTree {
    /// One maximal run of non-whitespace, non-parenthesis characters.
    Atom(String),
    /// The contents of one balanced pair of parentheses.
    List(Vec<TokenTree>),
}

impl TokenTree {
    /// Returns the token text if this is an atom.
    #[must_use]
    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Self::Atom(text) => Some(text),
            Self::List(_) => None,
        }
    }

    /// Returns the children if this is a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[TokenTree]> {
        match self {
            Self::List(items) => Some(items),
            Self::Atom(_) => None,
        }
    }

    /// Returns true for the retained line-break separator.
    #[must_use]
    pub fn is_separator(&self) -> bool {
        matches!(self, Self::Atom(text) if text == SEPARATOR)
    }
}

/// Tokenizes a whole file: exactly one root form is required.
///
/// # Errors
/// Returns [`Error::Syntax`] on unbalanced parentheses in either direction
/// or when the top level holds anything but exactly one form.
pub fn tokenize(source: &str) -> Result<TokenTree> {
    let mut items = scan(source)?;
    if items.len() != 1 {
        return Err(Error::syntax(format!(
            "malformed expression: expected exactly one top-level form, found {}",
            items.len()
        )));
    }
    Ok(items.remove(0))
}

/// Tokenizes a fragment: the flat top-level list, any number of items.
///
/// # Errors
/// Returns [`Error::Syntax`] on unbalanced parentheses.
pub fn tokenize_fragment(source: &str) -> Result<Vec<TokenTree>> {
    scan(source)
}

/// Sections whose line breaks are retained as separators.
const SEPARATED_SECTIONS: [&str; 2] = [":types", ":objects"];

fn scan(source: &str) -> Result<Vec<TokenTree>> {
    let cleaned = strip_comments(source).to_lowercase();

    let mut stack: Vec<Vec<TokenTree>> = Vec::new();
    let mut current: Vec<TokenTree> = Vec::new();
    // Depth (stack length) of the list a :types/:objects keyword opened in.
    let mut section_depth: Option<usize> = None;
    let mut token = String::new();

    for c in cleaned.chars() {
        match c {
            '(' => {
                flush_token(&mut token, &mut current, &mut section_depth, stack.len());
                stack.push(std::mem::take(&mut current));
            }
            ')' => {
                flush_token(&mut token, &mut current, &mut section_depth, stack.len());
                if section_depth == Some(stack.len()) {
                    section_depth = None;
                }
                let list = std::mem::take(&mut current);
                current = stack
                    .pop()
                    .ok_or_else(|| Error::syntax("missing open parenthesis"))?;
                current.push(TokenTree::List(list));
            }
            '\n' => {
                flush_token(&mut token, &mut current, &mut section_depth, stack.len());
                if section_depth == Some(stack.len()) && wants_separator(&current) {
                    current.push(TokenTree::Atom(SEPARATOR.to_string()));
                }
            }
            c if c.is_whitespace() => {
                flush_token(&mut token, &mut current, &mut section_depth, stack.len());
            }
            c => token.push(c),
        }
    }
    flush_token(&mut token, &mut current, &mut section_depth, stack.len());

    if !stack.is_empty() {
        return Err(Error::syntax("missing close parenthesis"));
    }
    Ok(current)
}

/// Pushes the pending token, if any, and tracks section keywords.
fn flush_token(
    token: &mut String,
    current: &mut Vec<TokenTree>,
    section_depth: &mut Option<usize>,
    depth: usize,
) {
    if token.is_empty() {
        return;
    }
    if SEPARATED_SECTIONS.contains(&token.as_str()) {
        *section_depth = Some(depth);
    }
    current.push(TokenTree::Atom(std::mem::take(token)));
}

/// A separator is retained only after an actual declaration token, never
/// right after the section keyword and never twice in a row.
fn wants_separator(current: &[TokenTree]) -> bool {
    match current.last() {
        Some(TokenTree::Atom(text)) => {
            text != SEPARATOR && !SEPARATED_SECTIONS.contains(&text.as_str())
        }
        _ => false,
    }
}

fn strip_comments(source: &str) -> String {
    let mut cleaned = String::with_capacity(source.len());
    for line in source.lines() {
        cleaned.push_str(line.split(';').next().unwrap_or(""));
        cleaned.push('\n');
    }
    cleaned
}
