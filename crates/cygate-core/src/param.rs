//! Declarative description of a single endpoint parameter.
//!
//! A [`ParameterSpec`] says where a value comes from (path or query), what
//! type it coerces to, whether it is required, what default applies when it
//! is absent, and which constraint the coerced value must satisfy.  Specs
//! are constructed once at startup with the builder methods and stay
//! immutable for the process lifetime.

use chrono::NaiveDateTime;

/// Where the raw value is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLocation {
    /// Bound to a `{placeholder}` in the endpoint's path template.
    Path,
    /// Bound to a query-string key.
    Query,
}

/// The type a raw string value is coerced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Str,
    Int,
    /// Timestamp accepted in the upstream's documented input formats.
    Date,
    /// Comma-separated (or repeated-key) list of string tokens.
    List,
}

/// Constraint applied to the coerced value.
///
/// The "patterns" of this system are always closed literal sets, never
/// general regular expressions, so [`Constraint::OneOf`] carries the set
/// itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Value must equal one of the listed literals.
    OneOf(&'static [&'static str]),
    /// Inclusive integer range.
    Range { min: i64, max: i64 },
    /// Maximum number of list elements.
    MaxItems(usize),
}

/// How a list-typed query value is serialized onto the upstream URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListStyle {
    /// One query pair with the elements joined by `,` (upstream multi-item
    /// filters).
    #[default]
    CommaJoined,
    /// One query pair per element.
    RepeatedKey,
}

/// A validated, typed parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Date(NaiveDateTime),
    List(Vec<String>),
}

impl ParamValue {
    /// Outbound wire format for dates — the compact form the upstream
    /// documents (`20180901T0000`).
    pub const DATE_WIRE_FORMAT: &'static str = "%Y%m%dT%H%M";

    /// Render a scalar value for URL serialization.
    ///
    /// List values are serialized by the URL builder according to their
    /// declared [`ListStyle`]; rendering one here joins with `,`.
    pub fn render(&self) -> String {
        match self {
            ParamValue::Str(s) => s.clone(),
            ParamValue::Int(i) => i.to_string(),
            ParamValue::Date(d) => d.format(Self::DATE_WIRE_FORMAT).to_string(),
            ParamValue::List(items) => items.join(","),
        }
    }
}

/// Declarative description of one endpoint parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub location: ParamLocation,
    pub ty: ParamType,
    pub required: bool,
    pub default: Option<ParamValue>,
    pub constraint: Option<Constraint>,
    pub list_style: ListStyle,
}

impl ParameterSpec {
    fn new(name: &'static str, location: ParamLocation) -> Self {
        Self {
            name,
            location,
            ty: ParamType::Str,
            // Path parameters are always present when the route matched, but
            // keeping them required documents the invariant and guards the
            // spec table against template drift.
            required: location == ParamLocation::Path,
            default: None,
            constraint: None,
            list_style: ListStyle::default(),
        }
    }

    /// A path parameter bound to `{name}` in the template.  Always required.
    pub fn path(name: &'static str) -> Self {
        Self::new(name, ParamLocation::Path)
    }

    /// An optional string query parameter.
    pub fn query(name: &'static str) -> Self {
        Self::new(name, ParamLocation::Query)
    }

    /// Mark the parameter required (no default allowed).
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Coerce to integer.
    pub fn int(mut self) -> Self {
        self.ty = ParamType::Int;
        self
    }

    /// Coerce to a timestamp.
    pub fn date(mut self) -> Self {
        self.ty = ParamType::Date;
        self
    }

    /// Coerce to a list of trimmed, non-empty tokens.
    pub fn list(mut self) -> Self {
        self.ty = ParamType::List;
        self
    }

    /// Serialize a list as one pair per element instead of comma-joined.
    pub fn repeated_key(mut self) -> Self {
        self.list_style = ListStyle::RepeatedKey;
        self
    }

    /// Restrict to a closed set of literals.
    pub fn one_of(mut self, allowed: &'static [&'static str]) -> Self {
        self.constraint = Some(Constraint::OneOf(allowed));
        self
    }

    /// Restrict to an inclusive integer range.
    pub fn range(mut self, min: i64, max: i64) -> Self {
        self.constraint = Some(Constraint::Range { min, max });
        self
    }

    /// Cap the number of list elements.
    pub fn max_items(mut self, max: usize) -> Self {
        self.constraint = Some(Constraint::MaxItems(max));
        self
    }

    /// Default string value used when the parameter is absent.
    pub fn default_str(mut self, value: &str) -> Self {
        self.default = Some(ParamValue::Str(value.to_string()));
        self
    }

    /// Default integer value used when the parameter is absent.
    pub fn default_int(mut self, value: i64) -> Self {
        self.default = Some(ParamValue::Int(value));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_params_are_required_by_construction() {
        let p = ParameterSpec::path("playerId");
        assert!(p.required);
        assert_eq!(p.location, ParamLocation::Path);
    }

    #[test]
    fn builder_chains_compose() {
        let p = ParameterSpec::query("limit").int().range(1, 200).default_int(10);
        assert_eq!(p.ty, ParamType::Int);
        assert_eq!(p.constraint, Some(Constraint::Range { min: 1, max: 200 }));
        assert_eq!(p.default, Some(ParamValue::Int(10)));
        assert!(!p.required);
    }

    #[test]
    fn date_renders_in_compact_wire_format() {
        let d = NaiveDateTime::parse_from_str("2018-09-01 00:00", "%Y-%m-%d %H:%M").unwrap();
        assert_eq!(ParamValue::Date(d).render(), "20180901T0000");
    }
}
