//! HTTP client implementation for the DSWS API.

use futures_util::{stream, StreamExt, TryStreamExt};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::debug;

use crate::auth::{Session, Token};
use crate::batching::build_bundles;
use crate::models::{
    DataRequest, DataType, DateSpec, DateValue, Frequency, GetDataBundleRequest,
    GetDataBundleResponse, GetDataRequest, GetDataResponse, Instrument, RequestBundle,
    StringKvPair,
};
use crate::parse::{aggregate, ParsedResponse};
use crate::{Error, Result};

use super::config::ClientConfig;

const GET_DATA: &str = "GetData";
const GET_DATA_BUNDLE: &str = "GetDataBundle";

/// The main client for the DSWS API.
///
/// The client turns instrument and field lists into bundles that respect the
/// service limits, sends them with bounded concurrency, and flattens the
/// answers into records.
///
/// # Example
///
/// ```no_run
/// use chrono::{Duration, NaiveDate, Utc};
/// use dsws_client::{ClientConfig, DswsClient, Frequency, Token};
///
/// # async fn example() -> dsws_client::Result<()> {
/// let token = Token::new("token-value", Utc::now() + Duration::hours(24));
/// let client = DswsClient::new(token, ClientConfig::default().with_max_concurrency(4))?;
///
/// let parsed = client
///     .fetch_timeseries_data(
///         &["VOD", "U:JPM"],
///         &["P", "MV"],
///         NaiveDate::from_ymd_opt(2023, 4, 17).unwrap(),
///         NaiveDate::from_ymd_opt(2023, 4, 24).unwrap(),
///         Frequency::Daily,
///         None,
///     )
///     .await?;
///
/// for record in &parsed.records {
///     println!("{} {} {:?}", record.symbol, record.date, record.get("P"));
/// }
/// # Ok(())
/// # }
/// ```
pub struct DswsClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) http: reqwest::Client,
    pub(crate) session: Session,
    pub(crate) config: ClientConfig,
}

impl DswsClient {
    /// Create a new client holding `token`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an unusable configuration and
    /// [`Error::Http`] when the HTTP client or proxy cannot be set up.
    pub fn new(token: Token, config: ClientConfig) -> Result<Self> {
        Self::with_session(Session::new(token), config)
    }

    /// Create a new client sharing an existing session.
    pub fn with_session(session: Session, config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = reqwest::Client::builder().timeout(config.timeout);
        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy.as_str())?);
        }
        let http = builder.build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                session,
                config,
            }),
        })
    }

    /// Get a reference to the session.
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Build a single request, asking for display names when `return_names`
    /// is set.
    pub fn construct_request<S: AsRef<str>>(
        instrument: Instrument,
        fields: &[S],
        date: DateSpec,
        tag: Option<&str>,
        return_names: bool,
    ) -> Result<DataRequest> {
        let (instrument, data_types) = prepare(instrument, fields, return_names);
        DataRequest::new(instrument, data_types, date, tag.map(str::to_string))
    }

    /// Split an instrument and a field list into bundles within the service
    /// limits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when there are no identifiers and
    /// [`Error::Validation`] when the field list cannot fit a request.
    pub fn construct_request_bundles<S: AsRef<str>>(
        instrument: Instrument,
        fields: &[S],
        date: DateSpec,
        tag: Option<&str>,
        return_names: bool,
    ) -> Result<Vec<RequestBundle>> {
        if instrument.identifiers().is_empty() {
            return Err(Error::InvalidInput("nothing to fetch".to_string()));
        }
        let (instrument, data_types) = prepare(instrument, fields, return_names);
        build_bundles(&instrument, &data_types, date, tag)
    }

    /// Fetch snapshot values of `fields` for `identifiers` at `start`.
    ///
    /// The `tag` is echoed back by the service and collected in
    /// [`Meta::tags`](crate::parse::Meta::tags).
    pub async fn fetch_snapshot_data<S, F>(
        &self,
        identifiers: &[S],
        fields: &[F],
        start: impl Into<DateValue>,
        tag: Option<&str>,
    ) -> Result<ParsedResponse>
    where
        S: AsRef<str>,
        F: AsRef<str>,
    {
        let instrument = Instrument::from_list(identifiers.iter().map(|s| s.as_ref()));
        let bundles = Self::construct_request_bundles(
            instrument,
            fields,
            DateSpec::snapshot(start),
            tag,
            true,
        )?;
        self.fetch_and_aggregate(&bundles).await
    }

    /// Fetch time series of `fields` for `identifiers` between `start` and
    /// `end`.
    pub async fn fetch_timeseries_data<S, F>(
        &self,
        identifiers: &[S],
        fields: &[F],
        start: impl Into<DateValue>,
        end: impl Into<DateValue>,
        frequency: Frequency,
        tag: Option<&str>,
    ) -> Result<ParsedResponse>
    where
        S: AsRef<str>,
        F: AsRef<str>,
    {
        let instrument = Instrument::from_list(identifiers.iter().map(|s| s.as_ref()));
        let bundles = Self::construct_request_bundles(
            instrument,
            fields,
            DateSpec::time_series(start, end, frequency),
            tag,
            true,
        )?;
        self.fetch_and_aggregate(&bundles).await
    }

    /// Send a single request to the `GetData` endpoint.
    ///
    /// `extra` properties are sent ahead of the ones every call carries.
    pub async fn fetch_one(
        &self,
        request: &DataRequest,
        extra: &[StringKvPair],
    ) -> Result<GetDataResponse> {
        let token = self.inner.session.token_value().await?;
        let body = GetDataRequest {
            token_value: &token,
            data_request: request,
            properties: self.inner.call_properties(extra),
        };
        self.inner.post(GET_DATA, &body).await
    }

    /// Send a bundle to the `GetDataBundle` endpoint.
    pub async fn fetch_bundle(&self, bundle: &RequestBundle) -> Result<GetDataBundleResponse> {
        let token = self.inner.session.token_value().await?;
        let body = GetDataBundleRequest {
            token_value: &token,
            data_requests: bundle.requests(),
            properties: self.inner.call_properties(bundle.properties()),
        };
        self.inner.post(GET_DATA_BUNDLE, &body).await
    }

    /// Send every bundle, at most `max_concurrency` at a time.
    ///
    /// Responses are returned in arrival order. The first transport error
    /// aborts the remaining calls.
    pub async fn fetch_all(&self, bundles: &[RequestBundle]) -> Result<Vec<GetDataBundleResponse>> {
        let limit = self.inner.config.max_concurrency.max(1);
        debug!(bundles = bundles.len(), limit, "fetching bundles");

        stream::iter(bundles)
            .map(|bundle| self.fetch_bundle(bundle))
            .buffer_unordered(limit)
            .try_collect()
            .await
    }

    /// Fetch every bundle and aggregate all data responses.
    pub async fn fetch_and_aggregate(&self, bundles: &[RequestBundle]) -> Result<ParsedResponse> {
        let responses = self.fetch_all(bundles).await?;
        aggregate(
            responses.iter().flat_map(|r| r.data_responses.iter()),
            self.inner.config.parse_options,
        )
    }

    /// Properties attached to every outgoing call, after `extra`.
    pub fn call_properties(&self, extra: &[StringKvPair]) -> Vec<StringKvPair> {
        self.inner.call_properties(extra)
    }
}

fn prepare<S: AsRef<str>>(
    instrument: Instrument,
    fields: &[S],
    return_names: bool,
) -> (Instrument, Vec<DataType>) {
    let data_types = fields
        .iter()
        .map(|f| {
            let data_type = DataType::new(f.as_ref());
            if return_names {
                data_type.with_return_name()
            } else {
                data_type
            }
        })
        .collect();
    let instrument = if return_names {
        instrument.with_return_names()
    } else {
        instrument
    };
    (instrument, data_types)
}

impl ClientInner {
    fn call_properties(&self, extra: &[StringKvPair]) -> Vec<StringKvPair> {
        let mut properties = extra.to_vec();
        properties.push(StringKvPair::new("__AppId", self.config.app_id.as_str()));
        if let Some(source) = &self.config.data_source {
            properties.push(StringKvPair::new("Source", source.as_str()));
        }
        properties
    }

    /// Make a POST request to a service endpoint.
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.config.endpoint_url(endpoint)?;

        if self.config.debug {
            let mut logged = serde_json::to_value(body)?;
            if let Some(token) = logged.get_mut("TokenValue") {
                *token = JsonValue::from("[REDACTED]");
            }
            debug!(%url, request = %logged, "sending request");
        } else {
            debug!(%url, "sending request");
        }

        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        self.handle_response(response).await
    }

    /// Handle an API response.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;

        if self.config.debug {
            debug!(status = status.as_u16(), response = %text, "received response");
        }

        if status.is_success() {
            Ok(serde_json::from_str(&text)?)
        } else {
            Err(Error::Api {
                status: status.as_u16(),
                message: text,
            })
        }
    }
}

fn transport_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout
    } else {
        Error::Http(err)
    }
}

impl Clone for DswsClient {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for DswsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DswsClient")
            .field("config", &self.inner.config)
            .field("session", &self.inner.session)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MAX_REQUESTS_PER_BUNDLE;
    use chrono::{Duration, NaiveDate, Utc};

    fn token() -> Token {
        Token::new("secret-token", Utc::now() + Duration::hours(1))
    }

    fn snapshot() -> DateSpec {
        DateSpec::snapshot(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())
    }

    #[test]
    fn test_construct_request_bundles_rejects_empty() {
        let err = DswsClient::construct_request_bundles(
            Instrument::from_list(Vec::<String>::new()),
            &["P"],
            snapshot(),
            None,
            true,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(ref m) if m == "nothing to fetch"));
    }

    #[test]
    fn test_construct_request_bundles_requests_names() {
        let ids: Vec<String> = (0..120).map(|i| format!("S{}", i)).collect();
        let bundles = DswsClient::construct_request_bundles(
            Instrument::from_list(&ids),
            &["P", "MV"],
            snapshot(),
            Some("batch"),
            true,
        )
        .unwrap();

        assert_eq!(bundles.len(), 1);
        let requests = bundles[0].requests();
        assert!(requests.len() <= MAX_REQUESTS_PER_BUNDLE);
        assert_eq!(
            requests.iter().map(|r| r.instrument().identifiers().len()).sum::<usize>(),
            120
        );
        for request in requests {
            assert_eq!(request.tag(), Some("batch"));
            assert!(request
                .instrument()
                .properties()
                .iter()
                .any(|p| p.key.as_deref() == Some("ReturnName")));
            assert!(request.data_types().iter().all(|d| !d.properties().is_empty()));
        }
    }

    #[test]
    fn test_construct_request_without_names() {
        let request = DswsClient::construct_request(
            Instrument::new(["VOD"]),
            &["P"],
            snapshot(),
            None,
            false,
        )
        .unwrap();
        assert!(request.instrument().properties().is_empty());
        assert!(request.data_types()[0].properties().is_empty());
    }

    #[test]
    fn test_call_properties() {
        let client = DswsClient::new(
            token(),
            ClientConfig::default()
                .with_app_id("tests")
                .with_data_source("PROD"),
        )
        .unwrap();

        let properties = client.call_properties(&[StringKvPair::new("Bundle", "1")]);
        let keys: Vec<_> = properties.iter().filter_map(|p| p.key.as_deref()).collect();
        assert_eq!(keys, ["Bundle", "__AppId", "Source"]);
        assert_eq!(properties[1].value_string().as_deref(), Some("tests"));
    }

    #[test]
    fn test_rejects_zero_concurrency() {
        let result = DswsClient::new(token(), ClientConfig::default().with_max_concurrency(0));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_expired_token_is_not_sent() {
        let client = DswsClient::new(
            Token::new("old", Utc::now() - Duration::hours(2)),
            ClientConfig::default().with_base_url("http://127.0.0.1:9"),
        )
        .unwrap();
        let request = DswsClient::construct_request(
            Instrument::new(["VOD"]),
            &["P"],
            snapshot(),
            None,
            false,
        )
        .unwrap();
        assert!(matches!(
            client.fetch_one(&request, &[]).await,
            Err(Error::SessionExpired)
        ));
    }

    #[test]
    fn test_debug_hides_token() {
        let client = DswsClient::new(token(), ClientConfig::default()).unwrap();
        assert!(!format!("{:?}", client).contains("secret-token"));
    }
}
