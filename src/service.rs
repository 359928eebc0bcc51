use std::{fmt, sync::Arc};

use crate::{
    diagnostics::DiagnosticSink, ClientOptions, JsonClient, JsonRequest, QueryParams, Result,
};

/// Address Location service endpoint.
pub const ADDRESS_LOCATION_URL: &str =
    "https://mapsq.six.nsw.gov.au/services/public/Address_Location";
/// NSW_Cadastre MapServer root.
pub const CADASTRE_BASE_URL: &str =
    "https://maps.six.nsw.gov.au/arcgis/rest/services/public/NSW_Cadastre/MapServer";

/// Client for the NSW Spatial Services address and cadastre lookups.
#[derive(Clone)]
pub struct NswSpatialClient {
    pub(crate) json: JsonClient,
    pub(crate) options: ClientOptions,
    pub(crate) address_url: String,
    pub(crate) cadastre_base: String,
}

impl fmt::Debug for NswSpatialClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NswSpatialClient")
            .field("address_url", &self.address_url)
            .field("cadastre_base", &self.cadastre_base)
            .field("options", &self.options)
            .finish()
    }
}

impl NswSpatialClient {
    /// Creates a client against the public NSW Spatial Services endpoints.
    pub fn new() -> Result<Self> {
        Self::with_endpoints(ADDRESS_LOCATION_URL, CADASTRE_BASE_URL)
    }

    /// Creates a client with options read from `NSWSPATIAL_*` variables.
    ///
    /// See [`ClientOptions::from_env`].
    pub fn from_env() -> Result<Self> {
        Ok(Self::new()?.with_options(ClientOptions::from_env()?))
    }

    /// Creates a client against custom endpoints, e.g. a mirror or a test server.
    pub fn with_endpoints(
        address_url: impl Into<String>,
        cadastre_base: impl Into<String>,
    ) -> Result<Self> {
        let options = ClientOptions::default();
        Ok(Self {
            json: JsonClient::new()?.with_policy(options.retry_policy()),
            options,
            address_url: address_url.into(),
            cadastre_base: cadastre_base.into().trim_end_matches('/').to_owned(),
        })
    }

    /// Applies client options such as timeout, retry and debug behavior.
    pub fn with_options(mut self, options: ClientOptions) -> Self {
        self.json = self.json.with_policy(options.retry_policy());
        self.options = options;
        self
    }

    /// Routes debug diagnostics to `sink`.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.json = self.json.with_sink(sink);
        self
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Underlying JSON client, for queries this type does not wrap.
    pub fn json_client(&self) -> &JsonClient {
        &self.json
    }

    pub(crate) fn request(&self, url: String, params: QueryParams) -> JsonRequest {
        JsonRequest::new(url, params)
            .with_timeout(self.options.timeout())
            .with_max_retries(self.options.max_retries)
            .with_debug(self.options.debug)
    }
}
