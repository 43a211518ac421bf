#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! HTTP client for the eco-guardian backend.
//!
//! The dashboard needs exactly one request: `GET {base_url}/api/dashboard`.
//! It is unauthenticated, takes no parameters, and is never retried; the
//! caller falls back to simulated data when it fails.

use std::time::Duration;

use async_trait::async_trait;
use eco_guardian_bin_models::DashboardResponse;

/// Path of the dashboard endpoint, relative to the backend base URL.
pub const DASHBOARD_PATH: &str = "/api/dashboard";

/// Maximum number of characters of a bad response body included in logs.
const BODY_PREVIEW_LEN: usize = 500;

/// Errors that can occur while fetching the dashboard payload.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// Status code returned by the backend.
        status: u16,
        /// URL that was requested.
        url: String,
    },

    /// The body was not a valid dashboard payload.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configured base URL is not a valid URL.
    #[error("Invalid base URL {url:?}: {message}")]
    Url {
        /// The URL as configured.
        url: String,
        /// Why it was rejected.
        message: String,
    },
}

/// Anything that can produce the dashboard payload.
///
/// The live implementation is [`HttpDashboardSource`]; tests drive the
/// dashboard with in-memory sources.
#[async_trait]
pub trait DashboardSource: Send + Sync {
    /// Human-readable description of where data comes from, for logs.
    fn describe(&self) -> &str;

    /// Fetches the current dashboard payload.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the request fails, the backend returns a
    /// non-success status, or the body cannot be parsed.
    async fn fetch(&self) -> Result<DashboardResponse, FetchError>;
}

/// Fetches the dashboard payload from the backend over HTTP.
#[derive(Debug, Clone)]
pub struct HttpDashboardSource {
    client: reqwest::Client,
    url: String,
}

impl HttpDashboardSource {
    /// Creates a source for the backend at `base_url`.
    ///
    /// No request timeout is applied unless `timeout` is given.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Url`] if `base_url` is not an absolute
    /// `http`/`https` URL, or [`FetchError::Http`] if the HTTP client
    /// cannot be built.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let url = dashboard_url(base_url)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            url,
        })
    }

    /// The full dashboard endpoint URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl DashboardSource for HttpDashboardSource {
    fn describe(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<DashboardResponse, FetchError> {
        log::debug!("Fetching dashboard data from {}", self.url);

        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let text = response.text().await?;
        let payload = parse_body(&text)?;

        log::debug!(
            "Received {} bins and {} alerts",
            payload.bins.len(),
            payload.alerts.as_ref().map_or(0, Vec::len)
        );

        Ok(payload)
    }
}

/// Builds the dashboard endpoint URL from a backend base URL.
///
/// # Errors
///
/// Returns [`FetchError::Url`] if `base_url` does not parse or is not
/// `http`/`https`.
pub fn dashboard_url(base_url: &str) -> Result<String, FetchError> {
    let trimmed = base_url.trim().trim_end_matches('/');

    let parsed = reqwest::Url::parse(trimmed).map_err(|e| FetchError::Url {
        url: base_url.to_string(),
        message: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(FetchError::Url {
            url: base_url.to_string(),
            message: format!("unsupported scheme {:?}", parsed.scheme()),
        });
    }

    Ok(format!("{trimmed}{DASHBOARD_PATH}"))
}

/// Parses a dashboard response body.
///
/// # Errors
///
/// Returns [`FetchError::Json`] if the body is not a dashboard payload. A
/// preview of the offending body is logged.
pub fn parse_body(text: &str) -> Result<DashboardResponse, FetchError> {
    serde_json::from_str(text).map_err(|e| {
        log::error!(
            "Dashboard payload did not parse.\n  \
             received: {} bytes\n  \
             parse error: {e}\n  \
             body preview: {}",
            text.len(),
            preview(text),
        );
        FetchError::Json(e)
    })
}

/// Truncates `text` to [`BODY_PREVIEW_LEN`] characters for logging.
fn preview(text: &str) -> String {
    match text.char_indices().nth(BODY_PREVIEW_LEN) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_dashboard_url() {
        assert_eq!(
            dashboard_url("http://localhost:5000").unwrap(),
            "http://localhost:5000/api/dashboard"
        );
        assert_eq!(
            dashboard_url("https://bins.example.org/").unwrap(),
            "https://bins.example.org/api/dashboard"
        );
    }

    #[test]
    fn rejects_bad_base_urls() {
        assert!(matches!(
            dashboard_url("localhost:5000/path"),
            Err(FetchError::Url { .. })
        ));
        assert!(matches!(dashboard_url("not a url"), Err(FetchError::Url { .. })));
        assert!(matches!(
            dashboard_url("ftp://example.org"),
            Err(FetchError::Url { .. })
        ));
    }

    #[test]
    fn parses_scenario_body() {
        let payload = parse_body(
            r#"{"bins":[{"id":1,"fill_level":45,"location":"28.7402,77.1234"}],"alerts":[]}"#,
        )
        .unwrap();

        assert_eq!(payload.bins.len(), 1);
        assert_eq!(payload.alerts, Some(Vec::new()));
        assert!(payload.real_bin().is_some());
    }

    #[test]
    fn malformed_body_is_a_json_error() {
        assert!(matches!(parse_body("<html>oops</html>"), Err(FetchError::Json(_))));
        assert!(matches!(
            parse_body(r#"{"bins": [{"id": "one"}]}"#),
            Err(FetchError::Json(_))
        ));
    }

    #[test]
    fn preview_truncates_on_char_boundaries() {
        let long = "é".repeat(BODY_PREVIEW_LEN + 10);
        let cut = preview(&long);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), BODY_PREVIEW_LEN + 3);
        assert_eq!(preview("short"), "short");
    }

    #[tokio::test]
    async fn unreachable_backend_is_an_http_error() {
        let source = HttpDashboardSource::new(
            "http://127.0.0.1:1",
            Some(Duration::from_secs(5)),
        )
        .unwrap();

        assert_eq!(source.describe(), "http://127.0.0.1:1/api/dashboard");
        assert!(matches!(source.fetch().await, Err(FetchError::Http(_))));
    }

    const SCENARIO_BODY: &str =
        r#"{"bins":[{"id":1,"fill_level":45,"location":"28.7402,77.1234"}],"alerts":[]}"#;

    /// Serves `body` with `status` from `/api/dashboard` on an ephemeral port.
    fn serve(status: u16, body: &'static str) -> (String, actix_web::dev::ServerHandle) {
        use actix_web::http::StatusCode;
        use actix_web::{App, HttpResponse, HttpServer, web};

        let server = HttpServer::new(move || {
            App::new().route(
                "/api/dashboard",
                web::get().to(move || async move {
                    HttpResponse::build(StatusCode::from_u16(status).unwrap())
                        .content_type("application/json")
                        .body(body)
                }),
            )
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();

        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        (format!("http://{addr}"), handle)
    }

    #[actix_web::test]
    async fn fetches_scenario_payload_over_http() {
        let (base_url, server) = serve(200, SCENARIO_BODY);
        let source = HttpDashboardSource::new(&base_url, Some(Duration::from_secs(5))).unwrap();

        let payload = source.fetch().await.unwrap();
        assert_eq!(payload.bins.len(), 1);
        assert!((payload.real_bin().unwrap().fill_level - 45.0).abs() < f64::EPSILON);
        assert_eq!(payload.alerts, Some(Vec::new()));

        server.stop(true).await;
    }

    #[actix_web::test]
    async fn server_error_is_a_status_error() {
        let (base_url, server) = serve(500, r#"{"error":"database unavailable"}"#);
        let source = HttpDashboardSource::new(&base_url, Some(Duration::from_secs(5))).unwrap();

        match source.fetch().await {
            Err(FetchError::Status { status, url }) => {
                assert_eq!(status, 500);
                assert_eq!(url, format!("{base_url}/api/dashboard"));
            }
            other => panic!("expected a status error, got {other:?}"),
        }

        server.stop(true).await;
    }

    #[actix_web::test]
    async fn html_error_page_is_a_json_error() {
        let (base_url, server) = serve(200, "<html>maintenance</html>");
        let source = HttpDashboardSource::new(&base_url, None).unwrap();

        assert!(matches!(source.fetch().await, Err(FetchError::Json(_))));

        server.stop(true).await;
    }
}
