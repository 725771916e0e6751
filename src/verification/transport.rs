/// Outbound HTTP for the Gumroad API
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Failure of the single outbound call: connect/timeout errors, non-2xx
/// statuses and bodies that are not JSON all land here.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    /// For transports other than [`HttpTransport`]
    #[error("{0}")]
    Other(String),
}

/// The two request shapes the verifier needs. Implementations return the
/// decoded JSON body of a successful (2xx) response.
pub trait Transport {
    /// POST `form` as `application/x-www-form-urlencoded`
    fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<Value, TransportError>;

    /// GET with `query` appended as query parameters
    fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value, TransportError>;
}

/// Blocking reqwest client with a fixed per-request timeout
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(false) // Enforce SSL verification
            .user_agent(concat!("gumroad-verify/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<Value, TransportError> {
        let body = self
            .client
            .post(url)
            .form(form)
            .send()?
            .error_for_status()?
            .json::<Value>()?;

        Ok(body)
    }

    fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value, TransportError> {
        // The query string carries the access token; keep it out of error text
        let body = self
            .client
            .get(url)
            .query(query)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<Value>())
            .map_err(reqwest::Error::without_url)?;

        Ok(body)
    }
}

/// Render an error with its whole source chain, `outer: inner: ...`
pub(crate) fn error_detail(err: &(dyn std::error::Error + 'static)) -> String {
    let mut detail = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !detail.ends_with(&text) {
            detail.push_str(": ");
            detail.push_str(&text);
        }
        source = cause.source();
    }
    detail
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("outer")]
    struct Outer(#[source] std::io::Error);

    #[test]
    fn test_error_detail_includes_sources() {
        let err = Outer(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        ));
        assert_eq!(error_detail(&err), "outer: connection refused");
    }

    #[test]
    fn test_transport_builds() {
        assert!(HttpTransport::new(Duration::from_secs(10)).is_ok());
    }

    #[test]
    fn test_sales_error_hides_query() {
        let transport = HttpTransport::new(Duration::from_secs(2)).unwrap();
        let err = transport
            .get_json("http://127.0.0.1:1/v2/sales/abc", &[("access_token", "tok_hidden")])
            .unwrap_err();
        assert!(!error_detail(&err).contains("tok_hidden"));
    }
}
