use std::{fmt, str::FromStr, sync::Arc};

use reqwest::{multipart::Form, Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use shared::envelope::{Envelope, EnvelopeStatus};
use tracing::{debug, error, warn};

use crate::{
    error::{CallFailure, TransportError},
    indicator::{IndicatorBoard, IndicatorScope, NETWORK_FAILURE_TEXT},
    Navigator, Notifier,
};

pub const AUTH_REQUIRED_NOTICE: &str = "Please log in first";
pub const FAILURE_FALLBACK: &str = "Operation failed";

/// Field name to value mapping sent with a call.
pub type Params = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            other => Err(format!("unsupported method '{other}'")),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        })
    }
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

/// Converts a serializable value into call parameters. Unit and `None`
/// become an empty mapping; anything that is not a JSON object is rejected.
pub fn params<P: Serialize + ?Sized>(value: &P) -> Result<Params, TransportError> {
    match serde_json::to_value(value).map_err(TransportError::Encode)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Params::new()),
        other => Err(TransportError::Encode(serde::ser::Error::custom(format!(
            "expected a field mapping, got {other}"
        )))),
    }
}

fn query_pairs(params: &Params) -> Vec<(&str, String)> {
    params
        .iter()
        .filter_map(|(key, value)| {
            let rendered = match value {
                Value::Null => return None,
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            Some((key.as_str(), rendered))
        })
        .collect()
}

pub struct Transport {
    http: Client,
    base_url: String,
    login_page: String,
    indicators: Arc<IndicatorBoard>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

impl Transport {
    pub fn new(
        base_url: impl Into<String>,
        login_page: impl Into<String>,
        indicators: Arc<IndicatorBoard>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, TransportError> {
        // The cookie store carries the backend session on every request.
        let http = Client::builder().cookie_store(true).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            login_page: login_page.into(),
            indicators,
            notifier,
            navigator,
        })
    }

    pub fn indicators(&self) -> &IndicatorBoard {
        &self.indicators
    }

    pub fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!("{}{endpoint}", self.base_url)
        }
    }

    /// Page-scoped call collapsing every failure to `None`.
    pub async fn call<P, T>(&self, method: HttpMethod, endpoint: &str, params: &P) -> Option<T>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.call_in(IndicatorScope::Page, method, endpoint, params).await
    }

    pub async fn call_in<P, T>(
        &self,
        scope: IndicatorScope,
        method: HttpMethod,
        endpoint: &str,
        params: &P,
    ) -> Option<T>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.try_call_in(scope, method, endpoint, params).await.ok()
    }

    pub async fn try_call<P, T>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        params: &P,
    ) -> Result<T, CallFailure>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.try_call_in(IndicatorScope::Page, method, endpoint, params).await
    }

    /// Same side effects as [`Transport::call_in`], but hands back why the
    /// call produced nothing.
    pub async fn try_call_in<P, T>(
        &self,
        scope: IndicatorScope,
        method: HttpMethod,
        endpoint: &str,
        params: &P,
    ) -> Result<T, CallFailure>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.indicators.begin(scope).await;
        let outcome = match self::params(params) {
            Ok(params) => self.dispatch(method, endpoint, &params).await,
            Err(err) => Err(err),
        };
        self.resolve(scope, method, endpoint, outcome).await
    }

    /// Multipart POST sharing the indicator and outcome handling of `call`.
    pub async fn call_multipart<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        form: Form,
    ) -> Result<T, CallFailure> {
        let scope = IndicatorScope::Page;
        self.indicators.begin(scope).await;
        let request = self.http.post(self.url(endpoint)).multipart(form);
        let outcome = Self::send(request).await;
        self.resolve(scope, HttpMethod::Post, endpoint, outcome).await
    }

    /// Raw request with no indicator, notice or navigation side effects. Used
    /// by the session probe, which must never redirect.
    pub async fn fetch_envelope(
        &self,
        method: HttpMethod,
        endpoint: &str,
    ) -> Result<Envelope, TransportError> {
        self.dispatch(method, endpoint, &Params::new()).await
    }

    async fn dispatch(
        &self,
        method: HttpMethod,
        endpoint: &str,
        params: &Params,
    ) -> Result<Envelope, TransportError> {
        let url = self.url(endpoint);
        debug!(%method, %url, "dispatching request");
        let request = match method {
            HttpMethod::Get => self.http.get(&url).query(&query_pairs(params)),
            other => self.http.request(other.into(), &url).json(params),
        };
        Self::send(request).await
    }

    async fn send(request: RequestBuilder) -> Result<Envelope, TransportError> {
        let response = request.send().await?;
        Self::read_envelope(response).await
    }

    async fn read_envelope(response: Response) -> Result<Envelope, TransportError> {
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status));
        }
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(TransportError::Decode)
    }

    async fn resolve<T: DeserializeOwned>(
        &self,
        scope: IndicatorScope,
        method: HttpMethod,
        endpoint: &str,
        outcome: Result<Envelope, TransportError>,
    ) -> Result<T, CallFailure> {
        let envelope = match outcome {
            Ok(envelope) => envelope,
            Err(err) => return Err(self.transport_failure(scope, method, endpoint, err).await),
        };

        match envelope.status() {
            EnvelopeStatus::Success => {
                let data = envelope.into_data();
                let empty = data.is_null();
                match serde_json::from_value(data) {
                    Ok(data) => {
                        self.indicators.succeed(scope).await;
                        Ok(data)
                    }
                    Err(err) if empty => {
                        warn!(%method, endpoint, error = %err, "success without a payload");
                        self.indicators.fail(scope, FAILURE_FALLBACK).await;
                        Err(CallFailure::EmptyPayload)
                    }
                    Err(err) => Err(self
                        .transport_failure(scope, method, endpoint, TransportError::Decode(err))
                        .await),
                }
            }
            EnvelopeStatus::AuthRequired => {
                warn!(%method, endpoint, "backend requires login, redirecting");
                self.notifier.alert(AUTH_REQUIRED_NOTICE);
                self.indicators.fail(scope, AUTH_REQUIRED_NOTICE).await;
                self.navigator.navigate(&self.login_page);
                Err(CallFailure::AuthRequired)
            }
            EnvelopeStatus::Failure(code) => {
                let message = envelope.message().unwrap_or(FAILURE_FALLBACK).to_string();
                warn!(%method, endpoint, %code, %message, "backend rejected request");
                self.notifier.inform(&message);
                self.indicators.fail(scope, message.clone()).await;
                Err(CallFailure::Rejected { code, message })
            }
        }
    }

    async fn transport_failure(
        &self,
        scope: IndicatorScope,
        method: HttpMethod,
        endpoint: &str,
        err: TransportError,
    ) -> CallFailure {
        error!(%method, endpoint, error = %err, "request failed");
        self.indicators.fail(scope, NETWORK_FAILURE_TEXT).await;
        CallFailure::Transport(err)
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
