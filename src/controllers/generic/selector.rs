// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Parsing of label selector strings into kube selectors

use crate::error::ShepherdError;
use kube::core::{Expression, Selector};

/// Parse a selector such as `owner=helm,status!=superseded,env in (a,b)`.
/// The empty string selects everything.
pub fn parse_label_selector(s: &str) -> Result<Selector, ShepherdError> {
    split_terms(s)?
        .into_iter()
        .map(parse_term)
        .collect::<Result<Selector, _>>()
}

/// Split on commas outside of parentheses
fn split_terms(s: &str) -> Result<Vec<&str>, ShepherdError> {
    let mut terms = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| ShepherdError::InvalidSelector(s.to_string()))?;
            }
            ',' if depth == 0 => {
                terms.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(ShepherdError::InvalidSelector(s.to_string()));
    }
    terms.push(&s[start..]);

    Ok(terms
        .into_iter()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect())
}

fn parse_term(term: &str) -> Result<Expression, ShepherdError> {
    if let Some(key) = term.strip_prefix('!') {
        return Ok(Expression::DoesNotExist(key_of(key, term)?));
    }
    if let Some((key, values)) = term.split_once(" notin ") {
        return Ok(Expression::NotIn(key_of(key, term)?, set_of(values, term)?));
    }
    if let Some((key, values)) = term.split_once(" in ") {
        return Ok(Expression::In(key_of(key, term)?, set_of(values, term)?));
    }
    if let Some((key, value)) = term.split_once("!=") {
        return Ok(Expression::NotEqual(key_of(key, term)?, value_of(value, term)?));
    }
    if let Some((key, value)) = term.split_once("==").or_else(|| term.split_once('=')) {
        return Ok(Expression::Equal(key_of(key, term)?, value_of(value, term)?));
    }
    Ok(Expression::Exists(key_of(term, term)?))
}

fn key_of(key: &str, term: &str) -> Result<String, ShepherdError> {
    let key = key.trim();
    if key.is_empty() || key.contains(char::is_whitespace) || key.contains(['(', ')', '=', '!']) {
        return Err(ShepherdError::InvalidSelector(term.to_string()));
    }
    Ok(key.to_string())
}

fn value_of(value: &str, term: &str) -> Result<String, ShepherdError> {
    let value = value.trim();
    if value.contains(char::is_whitespace) || value.contains(['(', ')', '=', '!']) {
        return Err(ShepherdError::InvalidSelector(term.to_string()));
    }
    Ok(value.to_string())
}

fn set_of(values: &str, term: &str) -> Result<std::collections::BTreeSet<String>, ShepherdError> {
    let inner = values
        .trim()
        .strip_prefix('(')
        .and_then(|v| v.strip_suffix(')'))
        .ok_or_else(|| ShepherdError::InvalidSelector(term.to_string()))?;

    inner.split(',').map(|v| value_of(v, term)).collect()
}
