//! `cygate-core` — the pure validation and URL-building engine behind the
//! CyGate proxy.
//!
//! This crate knows nothing about HTTP servers or clients.  It defines the
//! declarative endpoint model and the two operations every gateway call
//! funnels through:
//!
//! | Contract | Implementation |
//! |----------|----------------|
//! | parameter declaration | [`ParameterSpec`], [`EndpointSpec`] |
//! | validation + normalization | [`validate`] |
//! | upstream URL composition | [`build_url`] |
//!
//! The service crate (`cygate`) supplies the endpoint catalog, performs the
//! actual upstream call, and relays the response.
//!
//! # Quick start
//!
//! ```rust
//! use cygate_core::{EndpointSpec, ParameterSpec, RawInput, build_url, validate};
//! use url::Url;
//!
//! let spec = EndpointSpec::new("players", "players")
//!     .with_param(ParameterSpec::query("nickname").required())
//!     .with_param(ParameterSpec::query("limit").int().range(1, 200).default_int(10));
//! spec.validate().unwrap();
//!
//! let mut raw = RawInput::new();
//! raw.append("nickname", "foo");
//!
//! let normalized = validate(&raw, &spec).unwrap();
//! let base = Url::parse("https://api.neople.co.kr/cy").unwrap();
//! let url = build_url(&base, &spec, &normalized, "secret").unwrap();
//! assert_eq!(url.as_str(), "https://api.neople.co.kr/cy/players?nickname=foo&limit=10&apikey=secret");
//! ```

pub mod endpoint;
pub mod param;
pub mod url;
pub mod validate;

pub use crate::endpoint::{EndpointSpec, SpecError};
pub use crate::param::{Constraint, ListStyle, ParamLocation, ParamType, ParamValue, ParameterSpec};
pub use crate::url::{BuildError, build_url};
pub use crate::validate::{
    Allowed, NormalizedRequest, QueryEntry, RawInput, ValidationError, Violation, validate,
};
