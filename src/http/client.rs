use std::time::Duration;

use reqwest::header;

use crate::http::soap::{EnvelopeStyle, SoapRequest};
use crate::verdict::ProbeError;

/// The DUT's ContentDirectory control endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlEndpoint {
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl ControlEndpoint {
    pub fn url(&self) -> String {
        format!("http://{}:{}{}", self.host, self.port, self.path)
    }

    /// Value of the `Host` header sent with control requests.
    pub fn host_header(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Status and body of a control response, whatever the status.
#[derive(Debug, Clone)]
pub struct SoapReply {
    pub status: reqwest::StatusCode,
    pub body: String,
}

/// HTTP client for talking to the DUT. One request per probe, no retries.
#[derive(Debug, Clone)]
pub struct DutClient {
    http: reqwest::Client,
}

impl DutClient {
    pub fn new(timeout: Duration) -> Result<Self, ProbeError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("dlnaprobe/", env!("PROBE_VERSION")))
            .build()?;
        Ok(DutClient { http })
    }

    /// GET `url`. Anything but 2xx is a failure carrying the response body.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, ProbeError> {
        tracing::debug!("GET {}", url);
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!("Could not read error body from {}: {}", url, e);
                    String::new()
                }
            };
            return Err(ProbeError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// POST a SOAP action to `endpoint`. `Content-Length` comes from the body.
    ///
    /// Error statuses are returned as a normal reply: the fault body is what
    /// the error-path probe inspects.
    pub async fn post_soap(
        &self,
        endpoint: &ControlEndpoint,
        request: &SoapRequest,
        style: EnvelopeStyle,
    ) -> Result<SoapReply, ProbeError> {
        let body = request.envelope(style);
        let url = endpoint.url();
        tracing::debug!("POST {} SOAPAction: {}", url, request.soap_action());
        let response = self
            .http
            .post(&url)
            .header("SOAPAction", request.soap_action())
            .header(header::HOST, endpoint.host_header())
            .header(header::CONTENT_TYPE, "text/xml")
            .body(body)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!("{} answered HTTP {} ({} bytes)", url, status, body.len());
        Ok(SoapReply { status, body })
    }
}
