//! One logical gateway operation: an upstream path template plus the ordered
//! parameter list that feeds it.
//!
//! Endpoint specs are data, built once at startup and validated at
//! registration; an invalid spec is a programming error and is
//! startup-fatal, never a runtime condition.

use crate::param::{ParamLocation, ParamType, ParameterSpec};
use std::collections::HashSet;
use thiserror::Error;

/// Structural errors detected by [`EndpointSpec::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpecError {
    #[error("endpoint '{endpoint}': placeholder '{{{name}}}' has no matching path parameter")]
    UnboundPlaceholder { endpoint: String, name: String },

    #[error("endpoint '{endpoint}': path parameter '{name}' does not appear in template '{template}'")]
    UnusedPathParam {
        endpoint: String,
        name: String,
        template: String,
    },

    #[error("endpoint '{endpoint}': duplicate parameter '{name}'")]
    DuplicateParam { endpoint: String, name: String },

    #[error("endpoint '{endpoint}': parameter '{name}' is required and must not declare a default")]
    RequiredWithDefault { endpoint: String, name: String },

    #[error("endpoint '{endpoint}': date-range pair references '{name}', which is not a date query parameter")]
    InvalidPairMember { endpoint: String, name: String },
}

/// Declarative description of one endpoint.
///
/// `path_template` is relative to the upstream base URL and may contain
/// `{placeholder}` segments; each placeholder must be bound by exactly one
/// [`ParameterSpec::path`] entry, and vice versa.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointSpec {
    pub name: &'static str,
    pub path_template: &'static str,
    pub params: Vec<ParameterSpec>,
    /// "Both-or-neither" date pair: if one member is present in the input,
    /// the other becomes required.
    pub date_range_pair: Option<(&'static str, &'static str)>,
}

impl EndpointSpec {
    pub fn new(name: &'static str, path_template: &'static str) -> Self {
        Self {
            name,
            path_template,
            params: Vec::new(),
            date_range_pair: None,
        }
    }

    pub fn with_param(mut self, param: ParameterSpec) -> Self {
        self.params.push(param);
        self
    }

    /// Declare a date-range pair; both members must already be declared as
    /// `Date` query parameters.
    pub fn with_date_range_pair(mut self, start: &'static str, end: &'static str) -> Self {
        self.date_range_pair = Some((start, end));
        self
    }

    /// Look up a parameter by name.
    pub fn param(&self, name: &str) -> Option<&ParameterSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Placeholder names in declaration order.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.path_template
            .split('/')
            .filter_map(|seg| seg.strip_prefix('{').and_then(|s| s.strip_suffix('}')))
    }

    /// Check the structural invariants of the spec.
    ///
    /// Called once at registration; the gateway refuses to start with an
    /// invalid catalog.
    pub fn validate(&self) -> Result<(), SpecError> {
        let endpoint = || self.name.to_string();

        let mut seen = HashSet::new();
        for p in &self.params {
            if !seen.insert(p.name) {
                return Err(SpecError::DuplicateParam {
                    endpoint: endpoint(),
                    name: p.name.to_string(),
                });
            }
            if p.required && p.default.is_some() {
                return Err(SpecError::RequiredWithDefault {
                    endpoint: endpoint(),
                    name: p.name.to_string(),
                });
            }
        }

        let path_params: HashSet<&str> = self
            .params
            .iter()
            .filter(|p| p.location == ParamLocation::Path)
            .map(|p| p.name)
            .collect();
        let placeholders: HashSet<&str> = self.placeholders().collect();

        if let Some(name) = placeholders.difference(&path_params).next() {
            return Err(SpecError::UnboundPlaceholder {
                endpoint: endpoint(),
                name: name.to_string(),
            });
        }
        if let Some(name) = path_params.difference(&placeholders).next() {
            return Err(SpecError::UnusedPathParam {
                endpoint: endpoint(),
                name: name.to_string(),
                template: self.path_template.to_string(),
            });
        }

        if let Some((start, end)) = self.date_range_pair {
            for name in [start, end] {
                let ok = self.param(name).is_some_and(|p| {
                    p.location == ParamLocation::Query && p.ty == ParamType::Date
                });
                if !ok {
                    return Err(SpecError::InvalidPairMember {
                        endpoint: endpoint(),
                        name: name.to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::ParameterSpec;

    #[test]
    fn valid_spec_passes() {
        let spec = EndpointSpec::new("player", "players/{playerId}")
            .with_param(ParameterSpec::path("playerId"));
        assert_eq!(spec.validate(), Ok(()));
    }

    #[test]
    fn placeholder_without_path_param_is_rejected() {
        let spec = EndpointSpec::new("player", "players/{playerId}");
        assert!(matches!(
            spec.validate(),
            Err(SpecError::UnboundPlaceholder { ref name, .. }) if name == "playerId"
        ));
    }

    #[test]
    fn path_param_without_placeholder_is_rejected() {
        let spec = EndpointSpec::new("players", "players")
            .with_param(ParameterSpec::path("playerId"));
        assert!(matches!(
            spec.validate(),
            Err(SpecError::UnusedPathParam { ref name, .. }) if name == "playerId"
        ));
    }

    #[test]
    fn required_with_default_is_rejected() {
        let spec = EndpointSpec::new("players", "players")
            .with_param(ParameterSpec::query("nickname").required().default_str("x"));
        assert!(matches!(
            spec.validate(),
            Err(SpecError::RequiredWithDefault { .. })
        ));
    }

    #[test]
    fn duplicate_param_is_rejected() {
        let spec = EndpointSpec::new("players", "players")
            .with_param(ParameterSpec::query("limit").int())
            .with_param(ParameterSpec::query("limit").int());
        assert!(matches!(spec.validate(), Err(SpecError::DuplicateParam { .. })));
    }

    #[test]
    fn date_pair_must_reference_date_query_params() {
        let spec = EndpointSpec::new("matches", "matches")
            .with_param(ParameterSpec::query("startDate").date())
            .with_date_range_pair("startDate", "endDate");
        assert!(matches!(
            spec.validate(),
            Err(SpecError::InvalidPairMember { ref name, .. }) if name == "endDate"
        ));

        let spec = EndpointSpec::new("matches", "matches")
            .with_param(ParameterSpec::query("startDate").date())
            .with_param(ParameterSpec::query("endDate").date())
            .with_date_range_pair("startDate", "endDate");
        assert_eq!(spec.validate(), Ok(()));
    }

    #[test]
    fn placeholders_iterate_in_template_order() {
        let spec = EndpointSpec::new("ranking", "ranking/characters/{characterId}/{rankingType}");
        let names: Vec<&str> = spec.placeholders().collect();
        assert_eq!(names, vec!["characterId", "rankingType"]);
    }
}
