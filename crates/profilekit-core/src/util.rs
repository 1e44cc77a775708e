//! Small helpers shared by the API clients and the screen controller.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

/// Trim optional text, mapping blank values to `None`.
pub fn non_blank(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Whether `value` carries an `http://` or `https://` scheme.
pub fn is_http_url(value: &str) -> bool {
    let value = value.trim();
    value.starts_with("https://") || value.starts_with("http://")
}

/// Validate an API base URL and strip trailing slashes.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let base = raw.trim().trim_end_matches('/');
    if base.is_empty() {
        return Err(Error::Config("API base URL must not be empty".to_string()));
    }
    if !is_http_url(base) {
        return Err(Error::Config(
            "API base URL must include http:// or https://".to_string(),
        ));
    }
    Ok(base.to_string())
}

/// Collapse a response body into a short single-line excerpt for error messages.
pub fn excerpt(body: &str) -> String {
    let flattened = body.split_whitespace().collect::<Vec<_>>().join(" ");
    flattened.chars().take(180).collect()
}

/// Await `future` unless `token` is cancelled first.
///
/// Cancellation wins ties so a completion racing an unmount is discarded.
pub async fn until_cancelled<T>(
    token: &CancellationToken,
    future: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        () = token.cancelled() => Err(Error::Cancelled),
        result = future => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_blank_trims_and_rejects_empty() {
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(Some(" preset ")), Some("preset".to_string()));
    }

    #[test]
    fn normalize_base_url_requires_scheme_and_trims_slash() {
        assert!(normalize_base_url("").is_err());
        assert!(normalize_base_url("api.example.com").is_err());
        assert_eq!(
            normalize_base_url("https://api.example.com//").unwrap(),
            "https://api.example.com"
        );
    }

    #[test]
    fn excerpt_flattens_whitespace() {
        assert_eq!(excerpt("  bad\n  request \t"), "bad request");
        assert_eq!(excerpt(&"x".repeat(400)).len(), 180);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn until_cancelled_short_circuits_on_cancelled_token() {
        let token = CancellationToken::new();
        token.cancel();
        let result = until_cancelled(&token, async { Ok(7) }).await;
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn until_cancelled_passes_through_result() {
        let token = CancellationToken::new();
        assert_eq!(until_cancelled(&token, async { Ok(7) }).await.unwrap(), 7);
    }
}
