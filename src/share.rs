//! Shareable links
//!
//! Encodes the current comparison (selected locations, income, baseline,
//! location kind) as URL query parameters and parses them back, validating
//! against the identifiers of the loaded dataset.

use std::borrow::Cow;
use std::collections::HashSet;

use thiserror::Error;

use crate::data::model::LocationKind;

/// Highest income accepted from a link.
pub const MAX_INCOME: f64 = 10_000_000.0;

/// Minimum number of valid locations a link must name.
pub const MIN_LOCATIONS: usize = 2;

/// Reasons a query string is rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    /// A required parameter is absent or empty
    #[error("Missing parameter: {0}")]
    MissingParam(&'static str),

    /// Fewer than two identifiers matched the dataset
    #[error("Need at least 2 valid locations, found {found}")]
    TooFewLocations { found: usize },

    /// Income is not a number or lies outside [0, MAX_INCOME]
    #[error("Invalid income: {0}")]
    InvalidIncome(String),
}

/// Result type for share-link parsing
pub type QueryResult<T> = Result<T, QueryError>;

/// A decoded share link.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParams {
    /// Valid identifiers, in link order.
    pub states: Vec<String>,
    pub income: f64,
    /// Always one of `states`.
    pub base: String,
    pub kind: LocationKind,
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Query portion of `input`: after the first `?` if any, without a fragment.
fn query_part(input: &str) -> &str {
    let input = input.trim();
    let query = match input.find('?') {
        Some(pos) => &input[pos + 1..],
        None => input,
    };
    match query.find('#') {
        Some(pos) => &query[..pos],
        None => query,
    }
}

/// Decode one `application/x-www-form-urlencoded` component.
fn form_decode(raw: &str) -> Cow<'_, str> {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => Cow::Owned(decoded.into_owned()),
        // invalid UTF-8 after decoding: keep the raw text
        Err(_) => Cow::Borrowed(raw),
    }
}

/// Value of the first occurrence of `key`, decoded.
fn param(query: &str, key: &str) -> Option<String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (form_decode(k), form_decode(v)),
            None => (form_decode(pair), Cow::Borrowed("")),
        })
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

fn required(query: &str, key: &'static str) -> QueryResult<String> {
    param(query, key)
        .filter(|v| !v.is_empty())
        .ok_or(QueryError::MissingParam(key))
}

/// Split a comma-joined list into valid identifiers, in order.
///
/// City names contain commas themselves ("Austin, TX"), so at each position
/// the longest run of comma-separated tokens forming a valid identifier wins.
/// Runs never span more tokens than the longest identifier has.
/// Tokens that start no valid identifier are dropped.
fn split_identifiers<S: AsRef<str>>(list: &str, valid_codes: &[S]) -> Vec<String> {
    let valid: HashSet<&str> = valid_codes.iter().map(|v| v.as_ref()).collect();
    let max_span = valid
        .iter()
        .map(|v| v.matches(',').count() + 1)
        .max()
        .unwrap_or(1);
    let tokens: Vec<&str> = list.split(',').collect();

    let mut found = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let last = tokens.len().min(i + max_span);
        let longest = (i + 1..=last).rev().find_map(|j| {
            let candidate = tokens[i..j].join(",");
            let candidate = candidate.trim();
            valid.contains(candidate).then(|| (j, candidate.to_string()))
        });
        match longest {
            Some((end, id)) => {
                found.push(id);
                i = end;
            }
            None => i += 1,
        }
    }
    found
}

/// Longest leading decimal literal of `text`: `100k` reads as 100,
/// `1e5x` as 100000. `None` when `text` does not start with a number.
fn leading_number(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let digits = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_digits = digits(end);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits(end + 1);
        if frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = digits(exp);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }
    text[..end].parse().ok()
}

/// Location kind a link asks for; absent or unrecognised means states.
pub fn requested_kind(input: &str) -> LocationKind {
    param(query_part(input), "type")
        .and_then(|t| LocationKind::parse(&t))
        .unwrap_or_default()
}

/// Parse and validate a share link against the identifiers of the dataset.
///
/// `input` may be a full URL, a query string with or without the leading `?`.
pub fn parse_query_params<S: AsRef<str>>(input: &str, valid_codes: &[S]) -> QueryResult<QueryParams> {
    let query = query_part(input);

    let states_param = required(query, "states")?;
    let income_param = required(query, "income")?;
    let base_param = required(query, "base")?;

    let states = split_identifiers(&states_param, valid_codes);

    if states.len() < MIN_LOCATIONS {
        return Err(QueryError::TooFewLocations { found: states.len() });
    }

    let income = leading_number(income_param.trim())
        .ok_or_else(|| QueryError::InvalidIncome(income_param.clone()))?;
    if income.is_nan() || !(0.0..=MAX_INCOME).contains(&income) {
        return Err(QueryError::InvalidIncome(income_param));
    }

    let base = if states.contains(&base_param) {
        base_param
    } else {
        states[0].clone()
    };

    Ok(QueryParams {
        states,
        income,
        base,
        kind: requested_kind(query),
    })
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Build a share URL on top of `base_url`, replacing any existing query.
pub fn generate_share_url<S: AsRef<str>>(
    base_url: &str,
    selected: &[S],
    income: f64,
    baseline: &str,
    kind: LocationKind,
) -> String {
    let root = base_url
        .split(['?', '#'])
        .next()
        .unwrap_or(base_url);

    let states = selected
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(",");

    format!(
        "{root}?states={}&income={}&base={}&type={}",
        urlencoding::encode(&states),
        income,
        urlencoding::encode(baseline),
        kind.as_str()
    )
}
