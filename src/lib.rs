//! `nswspatial` is an async client for the NSW Spatial Services web services.
//!
//! - [`NswSpatialClient::address_to_point`] resolves a street address to a
//!   lon/lat coordinate.
//! - [`NswSpatialClient::lots_plans_from_point`],
//!   [`NswSpatialClient::nearby_lots`] and
//!   [`NswSpatialClient::lot_geometry_mga_from_point`] query the cadastre.
//!
//! Every lookup goes through [`JsonClient::fetch_json`], which retries
//! timeouts and connection failures with exponential backoff and reports
//! ArcGIS errors embedded in successful responses as
//! [`SpatialError::Service`].

pub mod address;
pub mod cadastre;
mod client;
mod decode;
pub mod diagnostics;
mod error;
mod options;
mod params;
mod retry;
mod service;
mod types;
mod value;
mod wire;

pub use address::parse_simple_address;
pub use client::{JsonClient, JsonRequest, CONNECT_TIMEOUT, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT};
pub use diagnostics::{Diagnostic, DiagnosticSink, MemorySink, TracingSink};
pub use error::SpatialError;
pub use options::ClientOptions;
pub use params::QueryParams;
pub use retry::RetryPolicy;
pub use service::{NswSpatialClient, ADDRESS_LOCATION_URL, CADASTRE_BASE_URL};
pub use types::{
    AddressMatch, LotGeometry, LotPlan, ParcelHit, SimpleAddress, SpatialReference,
};
pub use value::ParamValue;

pub type Result<T> = std::result::Result<T, SpatialError>;
