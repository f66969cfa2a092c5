use crate::config::ServerConfig;
use crate::errors::{AppError, AppResult};
use tracing::{debug, info};
use url::Url;

/// Downloads remote feeds for the convert-from-URL endpoint.
///
/// Wraps a shared `reqwest::Client` (cheap to clone) configured with the
/// fetch timeout. There are no retries: a failed fetch is reported as is.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    max_bytes: usize,
}

impl Fetcher {
    /// Builds a fetcher from the server configuration.
    ///
    /// # Errors
    ///
    /// Returns `IoError` if the HTTP client cannot be constructed (e.g. TLS backend failure).
    pub fn new(config: &ServerConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.fetch_timeout())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::IoError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_bytes: config.max_download_bytes,
        })
    }

    /// Fetches `raw_url` and returns the response body.
    ///
    /// # Errors
    ///
    /// - `UrlError` if the URL does not parse or is not `http`/`https`
    /// - `FetchError` on transport failure, timeout, a non-2xx status, or a body
    ///   larger than the configured download limit
    pub async fn fetch(&self, raw_url: &str) -> AppResult<Vec<u8>> {
        let url = parse_feed_url(raw_url)?;

        // Send request and handle send errors (network/timeout errors)
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| fetch_error(&url, None, e))?;

        // Check status before error_for_status (which converts 4xx/5xx to errors)
        let status = response.status();
        let mut response = response
            .error_for_status()
            .map_err(|e| fetch_error(&url, Some(status.as_u16()), e))?;

        if let Some(length) = response.content_length() {
            if length > self.max_bytes as u64 {
                return Err(oversized_body(&url, self.max_bytes));
            }
        }

        let mut body = Vec::with_capacity(response.content_length().unwrap_or(0) as usize);
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| fetch_error(&url, Some(status.as_u16()), e))?
        {
            if body.len() + chunk.len() > self.max_bytes {
                return Err(oversized_body(&url, self.max_bytes));
            }
            body.extend_from_slice(&chunk);
        }

        debug!(url = %url, status = status.as_u16(), "Fetch response received");
        info!(url = %url, bytes = body.len(), "Fetched remote feed");
        Ok(body)
    }
}

/// Parses a user-supplied feed URL, accepting only `http` and `https`.
pub fn parse_feed_url(raw_url: &str) -> AppResult<Url> {
    let url = Url::parse(raw_url.trim())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(AppError::UrlError(format!(
            "unsupported scheme '{scheme}', expected http or https"
        ))),
    }
}

fn oversized_body(url: &Url, limit: usize) -> AppError {
    AppError::FetchError {
        url: url.to_string(),
        status: None,
        message: format!("response body exceeds the download limit of {limit} bytes"),
    }
}

fn fetch_error(url: &Url, status: Option<u16>, err: reqwest::Error) -> AppError {
    let message = match status {
        Some(code) => format!("HTTP {code}: {err}"),
        None if err.is_timeout() => format!("request timed out: {err}"),
        None => err.to_string(),
    };
    AppError::FetchError {
        url: url.to_string(),
        status,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_feed_url_accepts_http_and_https() {
        assert!(parse_feed_url("https://example.com/jobs.xml.gz").is_ok());
        assert!(parse_feed_url("  http://example.com/jobs.xml.gz \n").is_ok());
    }

    #[test]
    fn parse_feed_url_rejects_other_schemes() {
        let err = parse_feed_url("ftp://example.com/jobs.xml.gz").unwrap_err();
        assert_eq!(err.kind(), "invalid_url");
        assert!(err.to_string().contains("ftp"));

        let err = parse_feed_url("file:///etc/passwd").unwrap_err();
        assert_eq!(err.kind(), "invalid_url");
    }

    #[test]
    fn parse_feed_url_rejects_garbage() {
        assert!(matches!(
            parse_feed_url("jobs.xml.gz"),
            Err(AppError::UrlError(_))
        ));
    }

    #[tokio::test]
    async fn fetch_connection_refused_is_fetch_error() {
        // Bind then drop to get a port with nothing listening
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let fetcher = Fetcher::new(&ServerConfig::default()).unwrap();
        let err = fetcher
            .fetch(&format!("http://127.0.0.1:{port}/jobs.xml.gz"))
            .await
            .unwrap_err();
        match err {
            AppError::FetchError { status, .. } => assert_eq!(status, None),
            other => panic!("Expected FetchError, got {other:?}"),
        }
    }
}
