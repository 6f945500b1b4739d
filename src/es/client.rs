//! Elasticsearch Service configuration API client.
//!
//! A small REST-JSON client for the 2015-01-01 configuration API. Requests
//! are signed with SigV4 using credentials from the standard AWS chain.
//! There are no retries and no timeouts: a failed call is reported as is.

use std::time::SystemTime;

use async_trait::async_trait;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_sigv4::http_request::{sign, SignableBody, SignableRequest, SigningParams, SigningSettings};
use aws_sigv4::sign::v4;
use aws_smithy_runtime_api::client::identity::Identity;
use reqwest::{header, Client, Method};
use serde::Serialize;
use tracing::{debug, info, trace};

use crate::error::{ConfigError, EsDomainError, ProviderError, Result};

use super::api::DomainApi;
use super::types::{CreateDomainRequest, DomainDescription, UpdateDomainConfigRequest};

/// SigV4 signing name of the service.
const SIGNING_NAME: &str = "es";

/// Configuration API version prefix.
const API_VERSION: &str = "2015-01-01";

/// Content type of every request body.
const JSON_CONTENT_TYPE: &str = "application/json";

/// Header carrying the error code of a failed call.
const ERROR_TYPE_HEADER: &str = "x-amzn-errortype";

/// Elasticsearch Service configuration API client.
#[derive(Debug, Clone)]
pub struct EsClient {
    /// HTTP client.
    http: Client,
    /// API endpoint, without trailing slash.
    endpoint: String,
    /// Signing region.
    region: String,
    /// Credentials used for signing.
    credentials: SharedCredentialsProvider,
}

impl EsClient {
    /// Creates a client from the AWS environment.
    ///
    /// `region` and `profile` override what the default chain would pick;
    /// `endpoint_url` overrides the regional endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if no region or no credentials provider can be resolved.
    pub async fn connect(
        region: Option<&str>,
        profile: Option<&str>,
        endpoint_url: Option<&str>,
    ) -> Result<Self> {
        let mut loader = aws_config::from_env();
        if let Some(region) = region {
            loader = loader.region(aws_config::Region::new(region.to_string()));
        }
        if let Some(profile) = profile {
            loader = loader.profile_name(profile);
        }
        let sdk_config = loader.load().await;

        let region = sdk_config
            .region()
            .map(ToString::to_string)
            .ok_or(ConfigError::MissingRegion)?;

        let credentials = sdk_config.credentials_provider().ok_or_else(|| {
            ProviderError::Credentials {
                message: String::from("no credentials provider configured"),
            }
        })?;

        let endpoint = endpoint_url.map_or_else(
            || default_endpoint(&region),
            |url| url.trim_end_matches('/').to_string(),
        );

        debug!("Using endpoint {endpoint} in region {region}");
        Ok(Self::with_credentials(credentials, region, endpoint))
    }

    /// Creates a client with explicit credentials, region and endpoint.
    #[must_use]
    pub fn with_credentials(
        credentials: SharedCredentialsProvider,
        region: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
            region: region.into(),
            credentials,
        }
    }

    /// Returns the signing region.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Sends a signed request and returns the parsed JSON response.
    async fn send(&self, method: Method, path: &str, body: Vec<u8>) -> Result<serde_json::Value> {
        let url = format!("{}{path}", self.endpoint);
        trace!("{method} {url} {}", String::from_utf8_lossy(&body));

        let credentials = self.credentials.provide_credentials().await.map_err(|e| {
            ProviderError::Credentials {
                message: e.to_string(),
            }
        })?;
        let identity = Identity::from(credentials);

        let signing_params: SigningParams<'_> = v4::SigningParams::<SigningSettings>::builder()
            .identity(&identity)
            .region(&self.region)
            .name(SIGNING_NAME)
            .time(SystemTime::now())
            .settings(SigningSettings::default())
            .build()
            .map_err(|e| signing_error(&e))?
            .into();

        let signable = SignableRequest::new(
            method.as_str(),
            url.as_str(),
            std::iter::once(("content-type", JSON_CONTENT_TYPE)),
            SignableBody::Bytes(&body),
        )
        .map_err(|e| signing_error(&e))?;

        let (instructions, _signature) = sign(signable, &signing_params)
            .map_err(|e| signing_error(&e))?
            .into_parts();

        let mut request = self
            .http
            .request(method, &url)
            .header(header::CONTENT_TYPE, JSON_CONTENT_TYPE);
        for (name, value) in instructions.headers() {
            request = request.header(name, value);
        }

        let response = request
            .body(body)
            .send()
            .await
            .map_err(|e| ProviderError::network(format!("Request failed: {e}")))?;

        let status = response.status();
        let error_type = response
            .headers()
            .get(ERROR_TYPE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(EsDomainError::Provider(parse_error(
                status.as_u16(),
                error_type.as_deref(),
                &text,
            )));
        }

        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| {
            EsDomainError::Provider(ProviderError::invalid_response(format!(
                "Failed to parse response: {e}"
            )))
        })
    }

    /// Serializes a request body.
    fn encode<T: Serialize>(body: &T) -> Result<Vec<u8>> {
        serde_json::to_vec(body).map_err(|e| {
            EsDomainError::internal(format!("Failed to serialize request body: {e}"))
        })
    }
}

#[async_trait]
impl DomainApi for EsClient {
    async fn describe_domain(&self, name: &str) -> Result<DomainDescription> {
        info!("Describing domain: {name}");

        let raw = self
            .send(Method::GET, &format!("/{API_VERSION}/es/domain/{name}"), Vec::new())
            .await?;

        DomainDescription::from_response(raw).map_err(|e| {
            EsDomainError::Provider(ProviderError::invalid_response(format!(
                "Unexpected describe response: {e}"
            )))
        })
    }

    async fn create_domain(&self, request: &CreateDomainRequest) -> Result<serde_json::Value> {
        info!("Creating domain: {}", request.domain_name);

        let body = Self::encode(request)?;
        self.send(Method::POST, &format!("/{API_VERSION}/es/domain"), body)
            .await
    }

    async fn update_domain_config(
        &self,
        request: &UpdateDomainConfigRequest,
    ) -> Result<serde_json::Value> {
        info!("Updating domain configuration: {}", request.domain_name);

        let body = Self::encode(request)?;
        self.send(
            Method::POST,
            &format!("/{API_VERSION}/es/domain/{}/config", request.domain_name),
            body,
        )
        .await
    }
}

/// Regional endpoint of the configuration API.
fn default_endpoint(region: &str) -> String {
    if region.starts_with("cn-") {
        format!("https://es.{region}.amazonaws.com.cn")
    } else {
        format!("https://es.{region}.amazonaws.com")
    }
}

fn signing_error(err: &dyn std::fmt::Display) -> EsDomainError {
    EsDomainError::Provider(ProviderError::Signing {
        message: err.to_string(),
    })
}

/// Builds a provider error from a failed response.
///
/// The code comes from the `x-amzn-ErrorType` header when present
/// (`Code:namespace-uri` form), otherwise from `__type` or `code` in the body.
fn parse_error(status: u16, error_type: Option<&str>, body: &str) -> ProviderError {
    let document: serde_json::Value = serde_json::from_str(body).unwrap_or_default();
    let field = |key: &str| document.get(key).and_then(serde_json::Value::as_str);

    let code = error_type
        .or_else(|| field("__type"))
        .or_else(|| field("code"))
        .map(|raw| {
            let raw = raw.split(':').next().unwrap_or(raw);
            raw.rsplit('#').next().unwrap_or(raw).to_string()
        })
        .unwrap_or_else(|| format!("HTTP{status}"));

    let message = field("message")
        .or_else(|| field("Message"))
        .map_or_else(|| body.trim().to_string(), String::from);

    ProviderError::api(status, code, message)
}
