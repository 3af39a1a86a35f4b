// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Splits a free-form US address into the two lines the property API
//! expects: the street, and `city, ST 12345`.

use anyhow::{Result, bail};
use regex::Regex;
use std::sync::LazyLock;

/// State code with an optional ZIP at the end of a fragment, preceded by
/// whitespace, e.g. the `" TX 78701"` in `"Austin TX 78701"`.
static TRAILING_STATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s([A-Z]{2,3})\s*([0-9]{5}(?:-[0-9]{4})?)?$").expect("valid regex")
});

/// A fragment that is nothing but a state code and optional ZIP.
static STATE_ZIP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z]{2,3})\s*([0-9]{5}(?:-[0-9]{4})?)?$").expect("valid regex")
});

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAddress {
    pub street: String,
    pub city: String,
    pub state: Option<String>,
    pub zip: Option<String>,
}

impl ParsedAddress {
    /// `city[, ST][ 12345]`.
    pub fn address2(&self) -> String {
        let mut out = self.city.clone();
        if let Some(state) = &self.state {
            out.push_str(", ");
            out.push_str(state);
        }
        if let Some(zip) = &self.zip {
            out.push(' ');
            out.push_str(zip);
        }
        out
    }
}

struct StateMatch<'a> {
    before: &'a str,
    state: String,
    zip: Option<String>,
}

fn trailing_state(fragment: &str) -> Option<StateMatch<'_>> {
    let captures = TRAILING_STATE_RE.captures(fragment)?;
    let whole = captures.get(0)?;
    Some(StateMatch {
        before: fragment[..whole.start()].trim(),
        state: captures.get(1)?.as_str().to_owned(),
        zip: captures.get(2).map(|zip| zip.as_str().to_owned()),
    })
}

fn exact_state(fragment: &str) -> Option<(String, Option<String>)> {
    let captures = STATE_ZIP_RE.captures(fragment)?;
    Some((
        captures.get(1)?.as_str().to_owned(),
        captures.get(2).map(|zip| zip.as_str().to_owned()),
    ))
}

/// Accepts `street`, `street, city ST 12345` and `street, city, ST 12345`
/// (plus extra comma-separated parts, which are folded into the city).
/// State codes are only recognized in upper case.
pub fn parse_address(raw: &str) -> Result<ParsedAddress> {
    let collapsed = WHITESPACE_RE.replace_all(raw.trim(), " ");
    let parts = collapsed
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>();

    let Some((&street, rest)) = parts.split_first() else {
        bail!("invalid address format -- enter a complete address");
    };

    let mut city = String::new();
    let mut state = None;
    let mut zip = None;

    match rest {
        [] => {}
        [city_state] => {
            if let Some(found) = trailing_state(city_state) {
                city = found.before.to_owned();
                state = Some(found.state);
                zip = found.zip;
            } else {
                city = (*city_state).to_owned();
            }
        }
        [city_part, state_part, extra @ ..] => {
            city = (*city_part).to_owned();
            if let Some((code, code_zip)) = exact_state(state_part) {
                state = Some(code);
                zip = code_zip;
            } else if let Some(found) = trailing_state(state_part) {
                city = format!("{city} {}", found.before);
                state = Some(found.state);
                zip = found.zip;
            } else {
                city = format!("{city}, {state_part}");
            }

            if !extra.is_empty() {
                let additional = extra.join(", ");
                let found = if state.is_none() {
                    trailing_state(&additional)
                } else {
                    None
                };
                if let Some(found) = found {
                    city = format!("{city}, {}", found.before);
                    state = Some(found.state);
                    zip = found.zip;
                } else {
                    city = format!("{city}, {additional}");
                }
            }
        }
    }

    if city.is_empty() {
        bail!("incomplete address -- include the street address and city");
    }

    Ok(ParsedAddress {
        street: street.to_owned(),
        city,
        state,
        zip,
    })
}
