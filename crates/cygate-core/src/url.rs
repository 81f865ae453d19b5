//! Upstream URL composition.
//!
//! [`build_url`] substitutes path placeholders, serializes the normalized
//! query set, and appends the upstream credential as the final `apikey`
//! pair — the one value the caller can never influence.  Percent-encoding
//! of both path segments and query pairs is delegated to the `url` crate.

use crate::endpoint::EndpointSpec;
use crate::param::{ListStyle, ParamValue};
use crate::validate::NormalizedRequest;
use thiserror::Error;
use url::Url;

/// Query key carrying the upstream credential.
const CREDENTIAL_PARAM: &str = "apikey";

/// Internal composition failures.
///
/// These indicate a spec/normalization mismatch and cannot occur for a
/// catalog that passed [`EndpointSpec::validate`] and input that passed
/// [`crate::validate`]; they are surfaced as server errors, never blamed on
/// the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("no normalized value for path placeholder '{{{0}}}'")]
    UnresolvedPlaceholder(String),

    #[error("base URL cannot be a base for path segments")]
    OpaqueBaseUrl,
}

/// Compose the upstream URL for one validated call.
pub fn build_url(
    base: &Url,
    spec: &EndpointSpec,
    req: &NormalizedRequest,
    credential: &str,
) -> Result<Url, BuildError> {
    let mut url = base.clone();

    {
        let mut segments = url.path_segments_mut().map_err(|_| BuildError::OpaqueBaseUrl)?;
        segments.pop_if_empty();
        for segment in spec.path_template.split('/') {
            match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(name) => {
                    let value = req
                        .path_value(name)
                        .ok_or_else(|| BuildError::UnresolvedPlaceholder(name.to_string()))?;
                    segments.push(value);
                }
                None => {
                    segments.push(segment);
                }
            }
        }
    }

    {
        let mut pairs = url.query_pairs_mut();
        for entry in req.query_entries() {
            match (&entry.value, entry.style) {
                (ParamValue::List(items), ListStyle::RepeatedKey) => {
                    for item in items {
                        pairs.append_pair(entry.name, item);
                    }
                }
                (ParamValue::List(items), ListStyle::CommaJoined) => {
                    pairs.append_pair(entry.name, &items.join(","));
                }
                (value, _) => {
                    pairs.append_pair(entry.name, &value.render());
                }
            }
        }
        // Credential goes last, after every caller-influenced pair.
        pairs.append_pair(CREDENTIAL_PARAM, credential);
    }

    Ok(url)
}
