//! Client configuration options.

use std::time::Duration;

use url::Url;

use crate::parse::ParseOptions;
use crate::{Error, Result};

/// Default service host.
pub const DEFAULT_BASE_URL: &str = "https://product.datastream.com";
/// Path of the REST service below the host.
pub const SERVICE_PATH: &str = "/DSWSClient/V1/DSService.svc/rest/";

/// Configuration for the DSWS client.
///
/// # Example
///
/// ```
/// use dsws_client::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_timeout(Duration::from_secs(60))
///     .with_max_concurrency(4)
///     .with_app_id("my-app/1.0");
/// assert_eq!(config.max_concurrency, 4);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Scheme and host of the service
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Proxy URL all traffic is routed through
    pub proxy: Option<String>,
    /// Value of the `__AppId` property sent with every call
    pub app_id: String,
    /// Value of the `Source` property, when set
    pub data_source: Option<String>,
    /// Log request and response bodies at debug level
    pub debug: bool,
    /// Maximum number of bundles in flight at once
    pub max_concurrency: usize,
    /// How response values are converted
    pub parse_options: ParseOptions,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(180),
            proxy: None,
            app_id: format!("dsws-client-{}", env!("CARGO_PKG_VERSION")),
            data_source: None,
            debug: false,
            max_concurrency: 1,
            parse_options: ParseOptions::default(),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    /// Recognised variables: `BASE_URL`, `TIMEOUT` (seconds), `PROXY`,
    /// `APP_ID`, `DATA_SOURCE`, `DEBUG` and `MAX_CONCURRENCY`. Unset
    /// variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(base_url) = lookup("BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(timeout) = lookup("TIMEOUT") {
            let secs: u64 = timeout.trim().parse().map_err(|_| {
                Error::Config(format!("TIMEOUT must be a number of seconds, got {:?}", timeout))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(proxy) = lookup("PROXY") {
            config.proxy = Some(proxy).filter(|p| !p.is_empty());
        }
        if let Some(app_id) = lookup("APP_ID") {
            config.app_id = app_id;
        }
        if let Some(data_source) = lookup("DATA_SOURCE") {
            config.data_source = Some(data_source).filter(|s| !s.is_empty());
        }
        if let Some(debug) = lookup("DEBUG") {
            config.debug = parse_bool(&debug)
                .ok_or_else(|| Error::Config(format!("DEBUG must be a boolean, got {:?}", debug)))?;
        }
        if let Some(max_concurrency) = lookup("MAX_CONCURRENCY") {
            config.max_concurrency = max_concurrency.trim().parse().map_err(|_| {
                Error::Config(format!(
                    "MAX_CONCURRENCY must be a positive integer, got {:?}",
                    max_concurrency
                ))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the service host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Route all traffic through a proxy.
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Set the application id sent with every call.
    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = app_id.into();
        self
    }

    /// Set the data source sent with every call.
    pub fn with_data_source(mut self, data_source: impl Into<String>) -> Self {
        self.data_source = Some(data_source.into());
        self
    }

    /// Enable or disable logging of request and response bodies.
    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Set the maximum number of bundles in flight at once.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    /// Set how response values are converted.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// Check the configuration for values the client cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrency == 0 {
            return Err(Error::Config(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        self.endpoint_url("GetData")?;
        Ok(())
    }

    /// Full URL of a service endpoint such as `GetDataBundle`.
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        let url = Url::parse(&self.base_url)?
            .join(SERVICE_PATH)?
            .join(endpoint)?;
        Ok(url)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" | "y" => Some(true),
        "0" | "false" | "no" | "off" | "n" | "" => Some(false),
        _ => None,
    }
}
