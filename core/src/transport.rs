//! Executing `HttpRequest` values.
//!
//! `Transport` is the seam between the pure build/parse core and the
//! network. Implementations return every status as data; interpreting the
//! status is `SodamClient::parse`'s job.

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

/// Performs one HTTP round-trip.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

#[cfg(feature = "blocking")]
pub use blocking::UreqTransport;

#[cfg(feature = "blocking")]
mod blocking {
    use tracing::debug;

    use super::Transport;
    use crate::error::ApiError;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// Blocking transport on a shared `ureq::Agent` (connection pooling is
    /// the agent's default).
    #[derive(Clone)]
    pub struct UreqTransport {
        agent: ureq::Agent,
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl UreqTransport {
        pub fn new() -> Self {
            // 4xx/5xx come back as responses, not errors.
            let agent = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .build()
                .new_agent();
            Self { agent }
        }
    }

    fn with_headers<B>(
        mut builder: ureq::RequestBuilder<B>,
        headers: &[(String, String)],
    ) -> ureq::RequestBuilder<B> {
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
    }

    impl Transport for UreqTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            let url = request.path.as_str();
            let headers = request.headers.as_slice();
            let body = request.body.as_deref();
            debug!(method = request.method.as_str(), url, "sending request");

            let result = match request.method {
                HttpMethod::Get => with_headers(self.agent.get(url), headers).call(),
                HttpMethod::Post => {
                    let builder = with_headers(self.agent.post(url), headers);
                    match body {
                        Some(b) => builder.send(b.as_bytes()),
                        None => builder.send_empty(),
                    }
                }
            };

            let mut response = result.map_err(|e| match e {
                ureq::Error::BadUri(msg) => ApiError::InvalidTarget(msg),
                ureq::Error::Http(e) => ApiError::InvalidTarget(e.to_string()),
                other => ApiError::Transport(other.to_string()),
            })?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
                .collect();
            let body = response
                .body_mut()
                .read_to_string()
                .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
            debug!(status, bytes = body.len(), "received response");

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }
}
