//! HTTP client for the expense API and its token endpoint.

use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde_json::Value;
use tracing::{debug, instrument, trace};

use mfexp_core::error::{ApiError, Error, TransportError};
use mfexp_core::{ApiRequest, Method, RequestBody, Result, ServiceUrl};

use crate::session::AuthenticatedSession;

/// Map a reqwest failure into the transport error taxonomy.
pub(crate) fn transport_error(err: reqwest::Error) -> Error {
    let transport = if err.is_timeout() {
        TransportError::Timeout {
            message: err.to_string(),
        }
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else if err.is_decode() {
        TransportError::Decode {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    Error::Transport(transport)
}

/// A raw response: status code and body text.
#[derive(Debug)]
pub(crate) struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client bound to the API base URL.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    api_base: ServiceUrl,
}

impl HttpClient {
    /// Create a new client for the given API base.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the TLS backend cannot be initialized.
    pub fn new(api_base: ServiceUrl) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("mfexp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(transport_error)?;

        Ok(Self { client, api_base })
    }

    /// Returns the API base URL this client is configured for.
    pub fn api_base(&self) -> &ServiceUrl {
        &self.api_base
    }

    /// Send one API request signed by `session`.
    ///
    /// Returns the parsed JSON body on 2xx and `Error::Api` with the status
    /// and verbatim body otherwise.
    #[instrument(skip(self, session, request), fields(method = %request.method, endpoint = %request.endpoint))]
    pub(crate) async fn send(
        &self,
        session: &AuthenticatedSession,
        request: &ApiRequest,
    ) -> Result<Value> {
        let authorization = session.authorization()?;
        let url = self.api_base.join_path(&request.endpoint);
        debug!(%url, "API request");
        trace!(query = ?request.query, "query parameters");

        let mut builder = self
            .client
            .request(reqwest_method(request.method), &url)
            .header(AUTHORIZATION, authorization)
            .header(ACCEPT, "application/json");

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        builder = match &request.body {
            Some(RequestBody::Json(value)) => builder.json(value),
            Some(RequestBody::Form(fields)) => builder.form(fields),
            None => builder,
        };

        let response = builder.send().await.map_err(transport_error)?;
        let raw = read_response(response).await?;

        if raw.is_success() {
            parse_json_body(&raw.body)
        } else {
            debug!(status = raw.status, "API error response");
            Err(ApiError::new(raw.status, raw.body).into())
        }
    }

    /// POST a form to an absolute URL without authorization.
    #[instrument(skip(self, fields))]
    pub(crate) async fn post_form(
        &self,
        url: &str,
        fields: &[(&str, &str)],
    ) -> Result<RawResponse> {
        debug!("Form POST");

        let response = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .form(fields)
            .send()
            .await
            .map_err(transport_error)?;

        read_response(response).await
    }
}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

async fn read_response(response: reqwest::Response) -> Result<RawResponse> {
    let status = response.status().as_u16();
    trace!(status, "HTTP response");
    let body = response.text().await.map_err(transport_error)?;
    Ok(RawResponse { status, body })
}

/// Parse a success body. An empty body (e.g. 204 on delete) is JSON null.
fn parse_json_body(body: &str) -> Result<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| {
        TransportError::Decode {
            message: e.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn client_creation() {
        let base = ServiceUrl::new("https://expense.moneyforward.com/api/external/v1").unwrap();
        let client = HttpClient::new(base.clone()).unwrap();
        assert_eq!(client.api_base(), &base);
    }

    #[test]
    fn empty_success_body_is_null() {
        assert_eq!(parse_json_body("").unwrap(), Value::Null);
        assert_eq!(parse_json_body("  \n").unwrap(), Value::Null);
    }

    #[test]
    fn success_body_is_parsed() {
        assert_eq!(
            parse_json_body(r#"{"offices":[]}"#).unwrap(),
            json!({"offices": []})
        );
    }

    #[test]
    fn invalid_success_body_is_decode_error() {
        assert!(matches!(
            parse_json_body("<html>"),
            Err(Error::Transport(TransportError::Decode { .. }))
        ));
    }
}
