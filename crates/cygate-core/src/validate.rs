//! Request validation and normalization.
//!
//! [`validate`] walks an [`EndpointSpec`]'s parameters in declaration order,
//! applies defaults, coerces types, and checks constraints.  Violations are
//! collected across all parameters — never short-circuited — so a caller
//! learns about every malformed field in one round trip.

use crate::endpoint::EndpointSpec;
use crate::param::{Constraint, ListStyle, ParamLocation, ParamType, ParamValue, ParameterSpec};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Date input formats accepted from callers, matching the upstream's
/// documented examples (`20180901T0000`, `2018-09-01 00:00`).
const DATE_INPUT_FORMATS: &[&str] = &[
    "%Y%m%dT%H%M",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
];

// ─────────────────────────────────────────────────────────────────────────────
// Raw caller input
// ─────────────────────────────────────────────────────────────────────────────

/// Raw caller input: a multimap of parameter name to one-or-many string
/// values, assembled by the server from path captures and the query string.
#[derive(Debug, Default, Clone)]
pub struct RawInput(HashMap<String, Vec<String>>);

impl RawInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one occurrence of `name`.  Empty values count as absent, so
    /// `?nickname=` behaves like an omitted `nickname`.
    pub fn append(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            return;
        }
        self.0.entry(name.to_string()).or_default().push(value);
    }

    /// All occurrences of `name`, or `None` when absent.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice).filter(|v| !v.is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawInput {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut raw = Self::new();
        for (k, v) in iter {
            let k = k.into();
            raw.append(&k, v);
        }
        raw
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Violations
// ─────────────────────────────────────────────────────────────────────────────

/// What a [`Violation::ConstraintViolation`] would have accepted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Allowed {
    OneOf { one_of: Vec<String> },
    Range { min: i64, max: i64 },
    MaxItems { max_items: usize },
}

impl fmt::Display for Allowed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Allowed::OneOf { one_of } => write!(f, "one of [{}]", one_of.join(", ")),
            Allowed::Range { min, max } => write!(f, "range [{min}, {max}]"),
            Allowed::MaxItems { max_items } => write!(f, "at most {max_items} items"),
        }
    }
}

/// A single validation failure, serialized into the 400 response body.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    #[error("missing required parameter '{name}'")]
    MissingParameter { name: String },

    #[error("parameter '{name}' is not a valid {expected}")]
    TypeMismatch { name: String, expected: &'static str },

    #[error("parameter '{name}' must be {allowed}")]
    ConstraintViolation { name: String, allowed: Allowed },
}

impl Violation {
    fn missing(name: &str) -> Self {
        Violation::MissingParameter {
            name: name.to_string(),
        }
    }
}

/// The complete set of violations for one request.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{} validation error(s)", .violations.len())]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Normalized output
// ─────────────────────────────────────────────────────────────────────────────

/// One normalized query parameter, carrying the serialization style the URL
/// builder must apply.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryEntry {
    pub name: &'static str,
    pub value: ParamValue,
    pub style: ListStyle,
}

/// The validated, defaulted, type-coerced parameter set for one call.
///
/// Parameters that were optional, absent, and default-less have no entry and
/// are never sent upstream.  Owned by the call that produced it.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct NormalizedRequest {
    path: HashMap<&'static str, String>,
    query: Vec<QueryEntry>,
}

impl NormalizedRequest {
    fn insert(&mut self, param: &ParameterSpec, value: ParamValue) {
        match param.location {
            ParamLocation::Path => {
                self.path.insert(param.name, value.render());
            }
            ParamLocation::Query => self.query.push(QueryEntry {
                name: param.name,
                value,
                style: param.list_style,
            }),
        }
    }

    /// Substitution value for a path placeholder.
    pub fn path_value(&self, name: &str) -> Option<&str> {
        self.path.get(name).map(String::as_str)
    }

    /// Query entries in parameter declaration order.
    pub fn query_entries(&self) -> &[QueryEntry] {
        &self.query
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Validation
// ─────────────────────────────────────────────────────────────────────────────

/// Validate raw caller input against an endpoint spec.
///
/// On success the result contains every parameter that was supplied or
/// defaulted; on failure the error lists every violation found.
pub fn validate(raw: &RawInput, spec: &EndpointSpec) -> Result<NormalizedRequest, ValidationError> {
    let mut violations = Vec::new();
    let mut out = NormalizedRequest::default();

    for param in &spec.params {
        match raw.get(param.name) {
            None => {
                if param.required {
                    violations.push(Violation::missing(param.name));
                } else if let Some(default) = &param.default {
                    out.insert(param, default.clone());
                }
            }
            Some(values) => match coerce(param, values) {
                Ok(value) => match check_constraint(param, &value) {
                    Ok(()) => out.insert(param, value),
                    Err(v) => violations.push(v),
                },
                Err(v) => violations.push(v),
            },
        }
    }

    // Both-or-neither date range: one bound present makes the other required.
    if let Some((start, end)) = spec.date_range_pair {
        let present = |name| raw.get(name).is_some();
        if present(start) && !present(end) {
            violations.push(Violation::missing(end));
        }
        if present(end) && !present(start) {
            violations.push(Violation::missing(start));
        }
    }

    if violations.is_empty() {
        Ok(out)
    } else {
        Err(ValidationError { violations })
    }
}

/// Coerce the raw occurrences of one parameter into a typed value.
///
/// Scalars take the first occurrence (`?limit=1&limit=2` binds `1`); lists
/// flatten every occurrence and split on commas.
fn coerce(param: &ParameterSpec, values: &[String]) -> Result<ParamValue, Violation> {
    let first = &values[0];
    match param.ty {
        ParamType::Str => Ok(ParamValue::Str(first.clone())),
        ParamType::Int => first
            .trim()
            .parse::<i64>()
            .map(ParamValue::Int)
            .map_err(|_| Violation::TypeMismatch {
                name: param.name.to_string(),
                expected: "integer",
            }),
        ParamType::Date => parse_date(first)
            .map(ParamValue::Date)
            .ok_or_else(|| Violation::TypeMismatch {
                name: param.name.to_string(),
                expected: "date",
            }),
        ParamType::List => {
            let items: Vec<String> = values
                .iter()
                .flat_map(|v| v.split(','))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            Ok(ParamValue::List(items))
        }
    }
}

fn parse_date(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    DATE_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
}

fn check_constraint(param: &ParameterSpec, value: &ParamValue) -> Result<(), Violation> {
    let Some(constraint) = &param.constraint else {
        return Ok(());
    };
    let allowed = match (constraint, value) {
        (Constraint::OneOf(set), ParamValue::Str(s)) => {
            if set.contains(&s.as_str()) {
                return Ok(());
            }
            Allowed::OneOf {
                one_of: set.iter().map(|s| s.to_string()).collect(),
            }
        }
        (Constraint::Range { min, max }, ParamValue::Int(i)) => {
            if (*min..=*max).contains(i) {
                return Ok(());
            }
            Allowed::Range {
                min: *min,
                max: *max,
            }
        }
        (Constraint::MaxItems(max), ParamValue::List(items)) => {
            if items.len() <= *max {
                return Ok(());
            }
            Allowed::MaxItems { max_items: *max }
        }
        // Constraint/type combinations that cannot arise from a validated
        // spec table.
        _ => return Ok(()),
    };
    Err(Violation::ConstraintViolation {
        name: param.name.to_string(),
        allowed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::EndpointSpec;
    use crate::param::ParameterSpec;

    fn players_spec() -> EndpointSpec {
        EndpointSpec::new("players", "players")
            .with_param(ParameterSpec::query("nickname").required())
            .with_param(
                ParameterSpec::query("wordType")
                    .one_of(&["match", "full"])
                    .default_str("match"),
            )
            .with_param(ParameterSpec::query("limit").int().range(1, 200).default_int(10))
    }

    fn matches_spec() -> EndpointSpec {
        EndpointSpec::new("player-matches", "players/{playerId}/matches")
            .with_param(ParameterSpec::path("playerId"))
            .with_param(ParameterSpec::query("startDate").date())
            .with_param(ParameterSpec::query("endDate").date())
            .with_date_range_pair("startDate", "endDate")
    }

    fn raw(pairs: &[(&str, &str)]) -> RawInput {
        pairs.iter().copied().collect()
    }

    #[test]
    fn defaults_fill_absent_parameters() {
        let normalized = validate(&raw(&[("nickname", "foo")]), &players_spec()).unwrap();
        let entries = normalized.query_entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].value, ParamValue::Str("foo".into()));
        assert_eq!(entries[1].value, ParamValue::Str("match".into()));
        assert_eq!(entries[2].value, ParamValue::Int(10));
    }

    #[test]
    fn missing_required_parameter_is_reported() {
        let err = validate(&raw(&[]), &players_spec()).unwrap_err();
        assert_eq!(
            err.violations,
            vec![Violation::MissingParameter {
                name: "nickname".into()
            }]
        );
    }

    #[test]
    fn empty_value_counts_as_absent() {
        let err = validate(&raw(&[("nickname", "")]), &players_spec()).unwrap_err();
        assert_eq!(
            err.violations,
            vec![Violation::MissingParameter {
                name: "nickname".into()
            }]
        );
    }

    #[test]
    fn enum_constraint_accepts_every_member_and_rejects_outsiders() {
        for word_type in ["match", "full"] {
            let input = raw(&[("nickname", "foo"), ("wordType", word_type)]);
            assert!(validate(&input, &players_spec()).is_ok());
        }
        let input = raw(&[("nickname", "foo"), ("wordType", "prefix")]);
        let err = validate(&input, &players_spec()).unwrap_err();
        assert_eq!(
            err.violations,
            vec![Violation::ConstraintViolation {
                name: "wordType".into(),
                allowed: Allowed::OneOf {
                    one_of: vec!["match".into(), "full".into()]
                },
            }]
        );
    }

    #[test]
    fn range_boundaries_are_inclusive() {
        for limit in ["1", "200"] {
            let input = raw(&[("nickname", "foo"), ("limit", limit)]);
            assert!(validate(&input, &players_spec()).is_ok());
        }
        for limit in ["0", "201"] {
            let input = raw(&[("nickname", "foo"), ("limit", limit)]);
            let err = validate(&input, &players_spec()).unwrap_err();
            assert_eq!(
                err.violations,
                vec![Violation::ConstraintViolation {
                    name: "limit".into(),
                    allowed: Allowed::Range { min: 1, max: 200 },
                }]
            );
        }
    }

    #[test]
    fn non_integer_limit_is_a_type_mismatch() {
        let input = raw(&[("nickname", "foo"), ("limit", "ten")]);
        let err = validate(&input, &players_spec()).unwrap_err();
        assert_eq!(
            err.violations,
            vec![Violation::TypeMismatch {
                name: "limit".into(),
                expected: "integer",
            }]
        );
    }

    #[test]
    fn violations_are_collected_not_short_circuited() {
        let input = raw(&[("wordType", "prefix"), ("limit", "5000")]);
        let err = validate(&input, &players_spec()).unwrap_err();
        // missing nickname + bad wordType + out-of-range limit, in
        // declaration order.
        assert_eq!(err.violations.len(), 3);
        assert!(matches!(
            err.violations[0],
            Violation::MissingParameter { ref name } if name == "nickname"
        ));
        assert!(matches!(
            err.violations[1],
            Violation::ConstraintViolation { ref name, .. } if name == "wordType"
        ));
        assert!(matches!(
            err.violations[2],
            Violation::ConstraintViolation { ref name, .. } if name == "limit"
        ));
    }

    #[test]
    fn date_accepts_upstream_documented_formats() {
        for input in ["20180901T0000", "2018-09-01 00:00", "2018-09-01T00:00"] {
            let raw = raw(&[("playerId", "p1"), ("startDate", input), ("endDate", input)]);
            assert!(validate(&raw, &matches_spec()).is_ok(), "rejected {input}");
        }
    }

    #[test]
    fn malformed_date_is_a_type_mismatch() {
        let input = raw(&[
            ("playerId", "p1"),
            ("startDate", "yesterday"),
            ("endDate", "20180930T2359"),
        ]);
        let err = validate(&input, &matches_spec()).unwrap_err();
        assert_eq!(
            err.violations,
            vec![Violation::TypeMismatch {
                name: "startDate".into(),
                expected: "date",
            }]
        );
    }

    #[test]
    fn date_range_requires_both_bounds_or_neither() {
        let only_start = raw(&[("playerId", "p1"), ("startDate", "20180901T0000")]);
        let err = validate(&only_start, &matches_spec()).unwrap_err();
        assert_eq!(
            err.violations,
            vec![Violation::MissingParameter {
                name: "endDate".into()
            }]
        );

        let only_end = raw(&[("playerId", "p1"), ("endDate", "20180930T2359")]);
        let err = validate(&only_end, &matches_spec()).unwrap_err();
        assert_eq!(
            err.violations,
            vec![Violation::MissingParameter {
                name: "startDate".into()
            }]
        );

        // Neither bound: the range filter is simply absent.
        let neither = raw(&[("playerId", "p1")]);
        let normalized = validate(&neither, &matches_spec()).unwrap();
        assert!(normalized.query_entries().is_empty());

        let both = raw(&[
            ("playerId", "p1"),
            ("startDate", "20180901T0000"),
            ("endDate", "20180930T2359"),
        ]);
        assert!(validate(&both, &matches_spec()).is_ok());
    }

    #[test]
    fn list_splits_commas_and_trims_tokens() {
        let spec = EndpointSpec::new("multi", "multi/battleitems")
            .with_param(ParameterSpec::query("itemIds").list().max_items(30).required());
        let input = raw(&[("itemIds", "10, 20 ,30,")]);
        let normalized = validate(&input, &spec).unwrap();
        assert_eq!(
            normalized.query_entries()[0].value,
            ParamValue::List(vec!["10".into(), "20".into(), "30".into()])
        );
    }

    #[test]
    fn list_flattens_repeated_keys() {
        let spec = EndpointSpec::new("battleitems", "battleitems")
            .with_param(ParameterSpec::query("q").list().repeated_key());
        let mut input = RawInput::new();
        input.append("q", "x");
        input.append("q", "y,z");
        let normalized = validate(&input, &spec).unwrap();
        assert_eq!(
            normalized.query_entries()[0].value,
            ParamValue::List(vec!["x".into(), "y".into(), "z".into()])
        );
    }

    #[test]
    fn list_over_the_item_cap_is_rejected() {
        let spec = EndpointSpec::new("multi", "multi/battleitems")
            .with_param(ParameterSpec::query("itemIds").list().max_items(3).required());
        let input = raw(&[("itemIds", "1,2,3,4")]);
        let err = validate(&input, &spec).unwrap_err();
        assert_eq!(
            err.violations,
            vec![Violation::ConstraintViolation {
                name: "itemIds".into(),
                allowed: Allowed::MaxItems { max_items: 3 },
            }]
        );
    }

    #[test]
    fn absent_optional_defaultless_parameters_are_omitted() {
        let spec = EndpointSpec::new("ranking", "ranking/ratingpoint")
            .with_param(ParameterSpec::query("playerId"))
            .with_param(ParameterSpec::query("offset").int().default_int(0));
        let normalized = validate(&raw(&[]), &spec).unwrap();
        let entries = normalized.query_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "offset");
    }

    #[test]
    fn scalar_with_repeated_occurrences_binds_the_first() {
        let input = raw(&[("nickname", "foo"), ("limit", "5"), ("limit", "900")]);
        let normalized = validate(&input, &players_spec()).unwrap();
        assert_eq!(normalized.query_entries()[2].value, ParamValue::Int(5));
    }

    #[test]
    fn violation_json_is_tagged_by_kind() {
        let v = Violation::ConstraintViolation {
            name: "limit".into(),
            allowed: Allowed::Range { min: 1, max: 1000 },
        };
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["kind"], "constraint_violation");
        assert_eq!(json["name"], "limit");
        assert_eq!(json["allowed"]["min"], 1);
        assert_eq!(json["allowed"]["max"], 1000);
    }
}
