//! # Version Tag Resolution
//!
//! This module selects which tag of a dependency repository to check out.
//! It works over a [`TagMap`] (tag name to commit hash) as reported by a
//! [`RepositoryAdapter`](crate::repository::RepositoryAdapter) and is pure:
//! no I/O, no state.
//!
//! ## Process
//!
//! 1.  **Filtering** ([`filter`]): tags that do not parse as a semantic
//!     version are dropped. When a constraint is given, the remaining tags
//!     must also satisfy it.
//!
//! 2.  **Sorting** ([`sort`]): the surviving tag names are ordered by
//!     semantic-version precedence, ascending. The sort is stable, so tags
//!     naming the same version (`v1.0.0` and `1.0.0`) keep their input order.
//!
//! 3.  **Selection** ([`get_latest`]): the greatest tag wins. An empty
//!     result is a valid outcome (`("", "")`), not an error.
//!
//! ## Constraint Syntax
//!
//! - An empty constraint matches every version.
//! - A bare version (`1.2.3` or `v1.2.3`) pins exactly that version.
//! - Anything else is a Cargo-style range (`^0.1.0`, `~1.2`,
//!   `>=1.0.0, <2.0.0`, `*`). A `v` prefix on versions inside the range is
//!   tolerated, and `||` separates alternative ranges.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use log::debug;
use regex::Regex;
use semver::{BuildMetadata, Version, VersionReq};

use crate::error::{Error, Result};

/// Tag name to commit hash, as listed from a repository.
pub type TagMap = BTreeMap<String, String>;

/// A parsed version constraint: the tag must satisfy any one alternative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    alternatives: Vec<VersionReq>,
}

impl Constraint {
    /// Parses a constraint string. Empty input is rejected here; callers
    /// treat an empty constraint as "unconstrained" before parsing.
    pub fn parse(constraint: &str) -> Result<Self> {
        let invalid = |message: String| Error::InvalidConstraint {
            constraint: constraint.to_string(),
            message,
        };

        let mut alternatives = Vec::new();
        for part in constraint.split("||") {
            let part = part.trim();
            if part.is_empty() {
                return Err(invalid("empty range".to_string()));
            }

            let req = match parse_tag_version(part) {
                // Build metadata has no precedence, so a pin ignores it
                Some(mut exact) => {
                    exact.build = BuildMetadata::EMPTY;
                    VersionReq::parse(&format!("={}", exact))
                }
                None => VersionReq::parse(&strip_v_prefixes(part)),
            }
            .map_err(|e| invalid(e.to_string()))?;

            alternatives.push(req);
        }

        Ok(Self { alternatives })
    }

    /// Checks whether a version satisfies any alternative.
    pub fn matches(&self, version: &Version) -> bool {
        self.alternatives.iter().any(|req| req.matches(version))
    }
}

/// Parses a tag name into a semantic version.
///
/// Accepts `1.2.3`, `v1.2.3` and the `refs/tags/` prefixed forms of both.
/// Returns `None` for anything else, including two-component versions.
pub fn parse_tag_version(tag: &str) -> Option<Version> {
    let tag = tag.strip_prefix("refs/tags/").unwrap_or(tag);
    let version_str = tag.strip_prefix('v').unwrap_or(tag);
    Version::parse(version_str).ok()
}

/// Removes a `v` that directly precedes a version number inside a range,
/// e.g. `>=v1.0.0, <v2` becomes `>=1.0.0, <2`.
fn strip_v_prefixes(range: &str) -> String {
    static V_PREFIX: OnceLock<Regex> = OnceLock::new();
    let pattern = V_PREFIX.get_or_init(|| {
        Regex::new(r"(^|[\s,=<>~^])v(\d)").expect("v-prefix pattern is valid")
    });
    pattern.replace_all(range, "${1}${2}").into_owned()
}

/// Keeps the tags that parse as semantic versions and satisfy `constraint`.
///
/// An empty constraint keeps every parseable tag. Tags that do not parse are
/// dropped with a debug diagnostic. A malformed constraint fails with
/// [`Error::InvalidConstraint`].
pub fn filter(tags: &TagMap, constraint: &str) -> Result<TagMap> {
    let constraint = constraint.trim();
    let parsed = if constraint.is_empty() {
        None
    } else {
        Some(Constraint::parse(constraint)?)
    };

    let mut filtered = TagMap::new();
    for (name, hash) in tags {
        let Some(version) = parse_tag_version(name) else {
            debug!("Ignoring tag '{}': not a semantic version", name);
            continue;
        };

        if let Some(ref constraint) = parsed {
            if !constraint.matches(&version) {
                continue;
            }
        }

        filtered.insert(name.clone(), hash.clone());
    }

    Ok(filtered)
}

/// Orders tag names by ascending semantic-version precedence.
///
/// The sort is stable. Build metadata does not take part in precedence, so
/// `1.0.0+a` and `1.0.0+b` keep their input order. Names that do not parse
/// as versions sort before all versions, keeping their relative order.
pub fn sort<'a, I>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut keyed: Vec<(Option<Version>, &String)> = tags
        .into_iter()
        .map(|name| (parse_tag_version(name), name))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => a.cmp_precedence(b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    keyed.into_iter().map(|(_, name)| name.clone()).collect()
}

/// Finds the greatest tag matching `constraint`.
///
/// Returns `(tag, hash)`, or `("", "")` when no tag matches.
pub fn get_latest(tags: &TagMap, constraint: &str) -> Result<(String, String)> {
    let filtered = filter(tags, constraint)?;
    let ordered = sort(filtered.keys());

    match ordered.last() {
        Some(latest) => {
            let hash = filtered.get(latest).cloned().unwrap_or_default();
            Ok((latest.clone(), hash))
        }
        None => Ok((String::new(), String::new())),
    }
}
