//! Recursive descent parser from token trees to validated models.
//!
//! Parsing is strict: the first violation (unknown name, arity or type
//! mismatch, malformed token) aborts the whole file. Unknown define groups
//! and unknown action keywords are the one soft spot: they are logged and
//! skipped so files written for a richer dialect still load.

use std::sync::Arc;

use groundplan_foundation::{
    Entity, Error, Fact, NameNormalizer, NoNormalization, Predicate, Result, TruthValue, Type,
};
use groundplan_model::{ActionParameter, ActionTemplate, Atom, Domain, Problem, Proposition, Term};

use crate::tokenizer::{TokenTree, tokenize};

/// The reserved proposition heads.
const LOGICAL_KEYWORDS: [&str; 4] = ["and", "or", "not", "forall"];

/// Parses a complete domain file.
///
/// # Errors
/// Returns an [`Error`] for unbalanced input, a missing `(domain ...)`
/// group, duplicate declarations, unknown names, arity or type violations,
/// and unsupported proposition forms.
pub fn parse_domain(source: &str) -> Result<Domain> {
    let tree = tokenize(source)?;
    let groups = define_groups(&tree)?;
    let mut domain = Domain::new("");
    let mut named = false;
    for items in groups {
        let head = group_head(items)?;
        match head {
            "domain" => {
                let name = items
                    .get(1)
                    .and_then(TokenTree::as_atom)
                    .ok_or_else(|| Error::syntax("(domain ...) group missing a name"))?;
                domain.set_name(name);
                named = true;
            }
            ":requirements" => {
                let tokens = items[1..]
                    .iter()
                    .filter_map(TokenTree::as_atom)
                    .map(str::to_string)
                    .collect();
                domain.set_requirements(tokens);
            }
            ":types" => {
                for group in split_typed_groups(&items[1..])? {
                    let parent = match &group.supertype {
                        Some(name) => Arc::clone(resolve_type(&domain, name)?),
                        None => Arc::clone(domain.root_type()),
                    };
                    for name in group.names {
                        domain.add_type(Type::new(name, Arc::clone(&parent)))?;
                    }
                }
            }
            ":predicates" => {
                for token in &items[1..] {
                    let declaration = token
                        .as_list()
                        .ok_or_else(|| Error::syntax("expected a predicate declaration list"))?;
                    let predicate = parse_predicate_declaration(&domain, declaration)?;
                    domain.add_predicate(predicate)?;
                }
            }
            ":action" => parse_action(&mut domain, items, false)?,
            ":special-action" => parse_action(&mut domain, items, true)?,
            other => tracing::warn!(group = other, "skipping unknown define group"),
        }
    }
    if !named {
        return Err(Error::syntax("define block missing a (domain ...) group"));
    }
    Ok(domain)
}

/// Parses a problem file against an already parsed domain.
///
/// # Errors
/// Returns an [`Error`] for unbalanced input, a `:domain` reference that
/// does not match `domain`, and unknown types, predicates, or objects.
pub fn parse_problem(source: &str, domain: &Arc<Domain>) -> Result<Problem> {
    parse_problem_with_normalizer(source, domain, &NoNormalization)
}

/// Parses a problem file, consulting `normalizer` when constructing
/// position-like objects.
///
/// # Errors
/// Same conditions as [`parse_problem`].
pub fn parse_problem_with_normalizer(
    source: &str,
    domain: &Arc<Domain>,
    normalizer: &dyn NameNormalizer,
) -> Result<Problem> {
    let tree = tokenize(source)?;
    let groups = define_groups(&tree)?;

    let mut name = None;
    let mut named_domain = None;
    for items in &groups {
        match group_head(items)? {
            "problem" => name = items.get(1).and_then(TokenTree::as_atom),
            ":domain" => named_domain = items.get(1).and_then(TokenTree::as_atom),
            _ => {}
        }
    }
    let name = name.ok_or_else(|| Error::syntax("define block missing a (problem ...) group"))?;
    let found = named_domain
        .ok_or_else(|| Error::syntax("problem file missing a (:domain ...) reference"))?;
    if !found.eq_ignore_ascii_case(domain.name()) {
        return Err(Error::DomainMismatch {
            expected: domain.name().to_string(),
            found: found.to_string(),
        });
    }

    let mut problem = Problem::new(name, Arc::clone(domain));
    for items in groups {
        match group_head(items)? {
            "problem" | ":domain" | ":requirements" | ":goal" => {}
            ":objects" => {
                for group in split_typed_groups(&items[1..])? {
                    let ty = match &group.supertype {
                        Some(type_name) => Arc::clone(resolve_type(domain, type_name)?),
                        None => Arc::clone(domain.root_type()),
                    };
                    for object_name in group.names {
                        let entity =
                            Entity::with_normalizer(object_name, Arc::clone(&ty), normalizer);
                        problem.add_object(entity)?;
                    }
                }
            }
            ":init" => {
                for token in &items[1..] {
                    let leaf = token
                        .as_list()
                        .ok_or_else(|| Error::syntax("expected a fact list in :init"))?;
                    let fact = parse_init_fact(domain, &problem, leaf)?;
                    problem.add_init_fact(fact)?;
                }
            }
            other => tracing::warn!(group = other, "skipping unknown define group"),
        }
    }
    Ok(problem)
}

/// Unwraps a `(define ...)` form into its parenthesized groups.
fn define_groups(tree: &TokenTree) -> Result<Vec<&[TokenTree]>> {
    let items = tree
        .as_list()
        .ok_or_else(|| Error::syntax("expected a (define ...) form"))?;
    if items.first().and_then(TokenTree::as_atom) != Some("define") {
        return Err(Error::syntax("expected a (define ...) form"));
    }
    items[1..]
        .iter()
        .map(|token| {
            token
                .as_list()
                .ok_or_else(|| Error::syntax("expected a parenthesized group in a define block"))
        })
        .collect()
}

fn group_head(items: &[TokenTree]) -> Result<&str> {
    items
        .first()
        .and_then(TokenTree::as_atom)
        .ok_or_else(|| Error::syntax("empty group in a define block"))
}

/// One newline-delimited declaration line inside `:types` or `:objects`.
struct TypedGroup {
    names: Vec<String>,
    supertype: Option<String>,
}

/// Splits section tokens into declaration groups at the retained line-break
/// separators. The trailing group is flushed even without a final line
/// break.
fn split_typed_groups(tokens: &[TokenTree]) -> Result<Vec<TypedGroup>> {
    let mut groups = Vec::new();
    let mut names: Vec<String> = Vec::new();
    let mut supertype: Option<String> = None;
    let mut expecting_type = false;

    let mut flush = |names: &mut Vec<String>, supertype: &mut Option<String>| {
        if !names.is_empty() {
            groups.push(TypedGroup {
                names: std::mem::take(names),
                supertype: supertype.take(),
            });
        }
        *supertype = None;
    };

    for token in tokens {
        let atom = token
            .as_atom()
            .ok_or_else(|| Error::syntax("nested list in a declaration group"))?;
        if token.is_separator() {
            if expecting_type {
                return Err(Error::syntax("dangling type marker in a declaration group"));
            }
            flush(&mut names, &mut supertype);
        } else if expecting_type {
            supertype = Some(atom.to_string());
            expecting_type = false;
        } else if atom == "-" {
            if names.is_empty() {
                return Err(Error::syntax("type marker before any declared name"));
            }
            expecting_type = true;
        } else if let Some(glued) = atom.strip_prefix('-') {
            if names.is_empty() {
                return Err(Error::syntax("type marker before any declared name"));
            }
            supertype = Some(glued.to_string());
        } else if atom.len() > 1 && atom.ends_with('-') {
            // `name-` glues the marker onto the name itself.
            names.push(atom.trim_end_matches('-').to_string());
            expecting_type = true;
        } else {
            names.push(atom.to_string());
        }
    }
    if expecting_type {
        return Err(Error::syntax("dangling type marker in a declaration group"));
    }
    flush(&mut names, &mut supertype);
    Ok(groups)
}

fn resolve_type<'a>(domain: &'a Domain, name: &str) -> Result<&'a Arc<Type>> {
    domain
        .find_type(name)
        .ok_or_else(|| Error::unknown("type", name))
}

/// Parses one `(name ?a - type ?b - type)` declaration. A single type token
/// covers every untyped variable to its left.
fn parse_predicate_declaration(domain: &Domain, items: &[TokenTree]) -> Result<Predicate> {
    let name = items
        .first()
        .and_then(TokenTree::as_atom)
        .ok_or_else(|| Error::syntax("predicate declaration missing a name"))?;
    if name.contains('?') {
        return Err(Error::malformed(
            name,
            "a predicate name cannot carry a variable marker",
        ));
    }
    let mut arguments: Vec<Arc<Type>> = Vec::new();
    let mut pending = 0_usize;
    let mut expecting_type = false;
    for token in &items[1..] {
        let atom = token
            .as_atom()
            .ok_or_else(|| Error::syntax("nested list in a predicate declaration"))?;
        if expecting_type {
            let ty = resolve_type(domain, atom.trim_start_matches('-'))?;
            for _ in 0..pending {
                arguments.push(Arc::clone(ty));
            }
            pending = 0;
            expecting_type = false;
        } else if atom == "-" {
            expecting_type = true;
        } else if atom.starts_with('?') {
            pending += 1;
        } else if let Some(glued) = atom.strip_prefix('-') {
            let ty = resolve_type(domain, glued)?;
            for _ in 0..pending {
                arguments.push(Arc::clone(ty));
            }
            pending = 0;
        } else {
            return Err(Error::malformed(
                atom,
                "expected a `?` variable or a type marker",
            ));
        }
    }
    if expecting_type {
        return Err(Error::syntax(format!(
            "predicate `{name}` has a dangling type marker"
        )));
    }
    if pending > 0 {
        return Err(Error::syntax(format!(
            "predicate `{name}` has argument slots without a declared type"
        )));
    }
    Predicate::new(name, arguments)
}

/// Parses one `(:action ...)` or `(:special-action ...)` group and adds the
/// template to the domain.
fn parse_action(domain: &mut Domain, items: &[TokenTree], special: bool) -> Result<()> {
    let name = items
        .get(1)
        .and_then(TokenTree::as_atom)
        .ok_or_else(|| Error::syntax("action group missing a name"))?
        .to_string();
    if domain.find_action(&name).is_some() {
        return Err(Error::duplicate("action", name));
    }

    let mut parameters: Vec<ActionParameter> = Vec::new();
    let mut precondition = None;
    let mut effect = None;
    let mut cursor = 2;
    while cursor < items.len() {
        let keyword = items[cursor]
            .as_atom()
            .ok_or_else(|| Error::syntax("expected a keyword in an action body"))?;
        let value = items
            .get(cursor + 1)
            .ok_or_else(|| Error::syntax(format!("`{keyword}` is missing its value")))?;
        match keyword {
            ":parameters" => {
                let tokens = value
                    .as_list()
                    .ok_or_else(|| Error::syntax(":parameters expects a parenthesized list"))?;
                parameters = parse_parameters(domain, tokens)?;
            }
            ":precondition" => precondition = Some(parse_proposition(domain, value, &parameters)?),
            ":effect" => effect = Some(parse_proposition(domain, value, &parameters)?),
            other => {
                tracing::warn!(action = %name, keyword = other, "skipping unknown action keyword");
            }
        }
        cursor += 2;
    }

    let precondition = precondition
        .ok_or_else(|| Error::syntax(format!("action `{name}` has no :precondition")))?;
    let effect = effect.ok_or_else(|| Error::syntax(format!("action `{name}` has no :effect")))?;
    let mut action = ActionTemplate::new(name, parameters, precondition, effect);
    action.set_special(special);
    domain.add_action(action)
}

/// Parses a `?a ?b - type` variable list (action parameters and `forall`
/// binders share this form).
fn parse_parameters(domain: &Domain, tokens: &[TokenTree]) -> Result<Vec<ActionParameter>> {
    let mut parameters = Vec::new();
    let mut pending: Vec<String> = Vec::new();
    let mut expecting_type = false;
    for token in tokens {
        let atom = token
            .as_atom()
            .ok_or_else(|| Error::syntax("nested list in a parameter declaration"))?;
        if expecting_type {
            let ty = resolve_type(domain, atom.trim_start_matches('-'))?;
            for name in pending.drain(..) {
                parameters.push(ActionParameter::new(name, Arc::clone(ty)));
            }
            expecting_type = false;
        } else if atom == "-" {
            if pending.is_empty() {
                return Err(Error::syntax("type marker before any parameter variable"));
            }
            expecting_type = true;
        } else if atom.starts_with('?') {
            if atom.contains('-') {
                return Err(Error::malformed(atom, "variable name contains a type marker"));
            }
            pending.push(atom.to_string());
        } else if let Some(glued) = atom.strip_prefix('-') {
            if pending.is_empty() {
                return Err(Error::syntax("type marker before any parameter variable"));
            }
            let ty = resolve_type(domain, glued)?;
            for name in pending.drain(..) {
                parameters.push(ActionParameter::new(name, Arc::clone(ty)));
            }
        } else {
            return Err(Error::syntax(format!(
                "expected a `?` variable in a parameter list, found `{atom}`"
            )));
        }
    }
    if expecting_type {
        return Err(Error::syntax("dangling type marker in a parameter list"));
    }
    if !pending.is_empty() {
        return Err(Error::syntax(
            "parameter variables without a declared type",
        ));
    }
    Ok(parameters)
}

/// Parses a proposition tree. `scope` holds the variables visible at this
/// point; a `forall` binder extends it for its body only.
fn parse_proposition(
    domain: &Domain,
    tree: &TokenTree,
    scope: &[ActionParameter],
) -> Result<Proposition> {
    let items = tree
        .as_list()
        .ok_or_else(|| Error::syntax("expected a parenthesized proposition"))?;
    let head = items
        .first()
        .and_then(TokenTree::as_atom)
        .ok_or_else(|| Error::syntax("empty proposition"))?;
    match head {
        "and" | "or" => {
            let children = items[1..]
                .iter()
                .map(|child| parse_proposition(domain, child, scope))
                .collect::<Result<Vec<_>>>()?;
            if head == "and" {
                Ok(Proposition::And(children))
            } else {
                Ok(Proposition::Or(children))
            }
        }
        "not" => {
            if items.len() != 2 {
                return Err(Error::syntax("not takes exactly one proposition"));
            }
            let child_head = items[1]
                .as_list()
                .and_then(|child| child.first())
                .and_then(TokenTree::as_atom)
                .ok_or_else(|| Error::syntax("expected a parenthesized proposition"))?;
            if LOGICAL_KEYWORDS.contains(&child_head) {
                return Err(Error::unsupported("negation over a compound proposition"));
            }
            let child = parse_proposition(domain, &items[1], scope)?;
            Ok(Proposition::Not(Box::new(child)))
        }
        "forall" => parse_forall(domain, items, scope),
        _ if domain.find_predicate(head).is_some() => parse_leaf(domain, items, scope),
        other => Err(Error::unsupported(other)),
    }
}

fn parse_forall(
    domain: &Domain,
    items: &[TokenTree],
    scope: &[ActionParameter],
) -> Result<Proposition> {
    let binder = items
        .get(1)
        .and_then(TokenTree::as_list)
        .ok_or_else(|| Error::syntax("forall expects a parenthesized binder"))?;
    let mut bound = parse_parameters(domain, binder)?;
    if bound.len() != 1 {
        return Err(Error::unsupported(
            "forall with more than one bound variable",
        ));
    }
    let variable = bound.remove(0);

    // Emitted text carries an optional `:` between binder and body.
    let body_index = if items.get(2).and_then(TokenTree::as_atom) == Some(":") {
        3
    } else {
        2
    };
    if items.len() != body_index + 1 {
        return Err(Error::syntax("forall takes a binder and exactly one body"));
    }
    let mut extended = scope.to_vec();
    extended.push(variable.clone());
    let body = parse_proposition(domain, &items[body_index], &extended)?;
    Ok(Proposition::ForAll {
        variable,
        body: Box::new(body),
    })
}

/// Parses a predicate leaf, resolving each argument against the visible
/// scope. The innermost binding of a repeated name wins.
fn parse_leaf(
    domain: &Domain,
    items: &[TokenTree],
    scope: &[ActionParameter],
) -> Result<Proposition> {
    let name = items
        .first()
        .and_then(TokenTree::as_atom)
        .ok_or_else(|| Error::syntax("empty proposition"))?;
    let predicate = domain
        .find_predicate(name)
        .ok_or_else(|| Error::unknown("predicate", name))?;
    let supplied = items.len() - 1;
    if supplied != predicate.arity() {
        return Err(Error::arity(name, predicate.arity(), supplied));
    }
    let mut arguments = Vec::with_capacity(supplied);
    for (token, slot) in items[1..].iter().zip(predicate.arguments()) {
        let symbol = token
            .as_atom()
            .ok_or_else(|| Error::syntax("nested list in a predicate leaf"))?;
        let parameter = scope
            .iter()
            .rev()
            .find(|p| p.name() == symbol)
            .ok_or_else(|| Error::unknown("parameter", symbol))?;
        if !parameter.ty().is_within(slot.name()) {
            return Err(Error::TypeMismatch {
                argument: symbol.to_string(),
                expected: slot.name().to_string(),
                actual: parameter.ty().name().to_string(),
            });
        }
        arguments.push(Term::Variable(parameter.clone()));
    }
    Ok(Proposition::Atom(Atom::new(Arc::clone(predicate), arguments)))
}

/// Parses one `(pred obj...)` list from `:init` into a true fact; a
/// `(not (pred obj...))` wrapper yields a false one.
fn parse_init_fact(domain: &Domain, problem: &Problem, items: &[TokenTree]) -> Result<Fact> {
    let name = items
        .first()
        .and_then(TokenTree::as_atom)
        .ok_or_else(|| Error::syntax("empty fact in :init"))?;
    if name == "not" {
        if items.len() != 2 {
            return Err(Error::syntax("not takes exactly one fact in :init"));
        }
        let inner = items[1]
            .as_list()
            .ok_or_else(|| Error::syntax("expected a fact list in :init"))?;
        let mut fact = parse_init_fact(domain, problem, inner)?;
        fact.set_value(fact.value().negated());
        return Ok(fact);
    }
    let predicate = domain
        .find_predicate(name)
        .ok_or_else(|| Error::unknown("predicate", name))?;
    let mut entities = Vec::with_capacity(items.len() - 1);
    for token in &items[1..] {
        let object_name = token
            .as_atom()
            .ok_or_else(|| Error::syntax("nested list in an :init fact"))?;
        let entity = problem
            .find_object(object_name)
            .ok_or_else(|| Error::unknown("object", object_name))?;
        entities.push(entity.clone());
    }
    Fact::new(Arc::clone(predicate), entities, TruthValue::True)
}
