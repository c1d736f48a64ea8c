//! `reqwest` transport for the management API.

use crate::collection::domain::{ApiKey, ApplianceAddress, Credentials, OperationalCommand};
use crate::collection::parsers::vendor_error;
use crate::collection::ports::{DeviceApi, DeviceApiError, DeviceApiResult};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// URL scheme used to reach the management API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiScheme {
    /// TLS transport.
    #[default]
    Https,
    /// Plain HTTP, for lab setups and local fakes.
    Http,
}

impl ApiScheme {
    /// Returns the scheme as it appears in a URL.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Https => "https",
            Self::Http => "http",
        }
    }
}

/// Transport settings for [`HttpDeviceApi`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpDeviceApiSettings {
    /// URL scheme.
    pub scheme: ApiScheme,
    /// Upper bound for each request, connect through body.
    pub request_timeout: Duration,
    /// Whether server certificates are verified.
    pub verify_tls: bool,
}

impl Default for HttpDeviceApiSettings {
    fn default() -> Self {
        Self {
            scheme: ApiScheme::Https,
            request_timeout: Duration::from_secs(10),
            verify_tls: false,
        }
    }
}

/// Management API client over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpDeviceApi {
    client: Client,
    scheme: ApiScheme,
}

impl HttpDeviceApi {
    /// Builds a client with the given settings.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceApiError::Transport`] when the TLS backend cannot be
    /// initialized.
    pub fn new(settings: HttpDeviceApiSettings) -> DeviceApiResult<Self> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .danger_accept_invalid_certs(!settings.verify_tls)
            .build()
            .map_err(DeviceApiError::transport)?;
        Ok(Self {
            client,
            scheme: settings.scheme,
        })
    }

    fn endpoint(&self, address: &ApplianceAddress) -> String {
        format!("{}://{}/api/", self.scheme.as_str(), address)
    }

    async fn get(
        &self,
        address: &ApplianceAddress,
        query: &[(&str, &str)],
    ) -> DeviceApiResult<String> {
        let response = self
            .client
            .get(self.endpoint(address))
            .query(query)
            .send()
            .await
            .map_err(|err| classify(address, err))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(DeviceApiError::Unauthorized {
                address: address.clone(),
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(DeviceApiError::Status {
                address: address.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|err| classify(address, err))?;
        debug!(address = %address, bytes = body.len(), "management API response received");
        Ok(body)
    }
}

fn classify(address: &ApplianceAddress, err: reqwest::Error) -> DeviceApiError {
    if err.is_timeout() {
        DeviceApiError::Timeout {
            address: address.clone(),
        }
    } else {
        DeviceApiError::transport(err)
    }
}

#[async_trait]
impl DeviceApi for HttpDeviceApi {
    async fn request_key(
        &self,
        address: &ApplianceAddress,
        credentials: &Credentials,
    ) -> DeviceApiResult<String> {
        self.get(
            address,
            &[
                ("type", "keygen"),
                ("user", credentials.username()),
                ("password", credentials.password()),
            ],
        )
        .await
    }

    async fn run_command(
        &self,
        address: &ApplianceAddress,
        key: &ApiKey,
        command: OperationalCommand,
    ) -> DeviceApiResult<String> {
        let body = self
            .get(
                address,
                &[("type", "op"), ("cmd", command.as_xml()), ("key", key.expose())],
            )
            .await?;
        if let Some(message) = vendor_error(&body) {
            return Err(DeviceApiError::Rejected {
                address: address.clone(),
                message,
            });
        }
        Ok(body)
    }
}
