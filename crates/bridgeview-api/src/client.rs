// Bridge API HTTP client
//
// Wraps `reqwest::Client` with `/api/...` URL construction and
// `{success, data, error}` envelope unwrapping. Endpoint groups (sensors,
// mqtt, logs, ...) are implemented as inherent methods in sibling files so
// this module stays focused on transport mechanics.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::Envelope;
use crate::transport::TransportConfig;

/// Longest body excerpt carried in error messages.
const BODY_PREVIEW_LEN: usize = 200;

/// Raw HTTP client for the bridge monitoring API.
///
/// All methods return unwrapped `data` payloads; the envelope is stripped
/// before the caller sees it. No request is ever retried.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client for the bridge at `base_url` (e.g. `http://bridge.local:8000`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The server base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/api/{segments...}`.
    ///
    /// Each segment is percent-encoded, so sensor and group names containing
    /// `/`, spaces or `?` stay a single path component.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|()| Error::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// GET and unwrap the envelope. `Ok(None)` means `success: true` without data.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, Error> {
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;

        parse_envelope(resp).await
    }

    /// GET with query parameters and unwrap the envelope.
    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&str, String)],
    ) -> Result<Option<T>, Error> {
        debug!("GET {} {:?}", url, params);

        let resp = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(Error::Transport)?;

        parse_envelope(resp).await
    }

    /// PUT a JSON body and unwrap the envelope.
    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<Option<T>, Error> {
        debug!("PUT {}", url);

        let resp = self
            .http
            .put(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;

        parse_envelope(resp).await
    }

    /// POST a JSON body and unwrap the envelope.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<Option<T>, Error> {
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;

        parse_envelope(resp).await
    }
}

/// Turn a `success: true` response without `data` into `MissingData`.
pub(crate) fn require_data<T>(data: Option<T>, endpoint: &str) -> Result<T, Error> {
    data.ok_or_else(|| Error::MissingData {
        endpoint: endpoint.to_owned(),
    })
}

/// Parse `{ success, data?, error? }`, returning `data` on success or an
/// `Error::Api` carrying the server message verbatim.
async fn parse_envelope<T: DeserializeOwned>(resp: reqwest::Response) -> Result<Option<T>, Error> {
    let status = resp.status();
    let body = resp.text().await.map_err(Error::Transport)?;

    let envelope: Envelope = match serde_json::from_str(&body) {
        Ok(envelope) => envelope,
        Err(e) if !status.is_success() => {
            debug!("non-envelope error body: {e}");
            return Err(Error::Http {
                status: status.as_u16(),
                message: http_error_message(&body).unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("unexpected status")
                        .to_owned()
                }),
            });
        }
        Err(e) => {
            return Err(Error::Deserialization {
                message: format!("{e} (body: {})", preview(&body)),
                body,
            });
        }
    };

    if !envelope.success {
        return Err(Error::Api {
            message: envelope
                .error
                .unwrap_or_else(|| format!("request failed with status {}", status.as_u16())),
        });
    }

    match envelope.data {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(data) => serde_json::from_value(data)
            .map(Some)
            .map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body,
            }),
    }
}

/// Pull a readable message out of a non-envelope error body: the
/// framework-level `{"detail": "..."}` shape, else a preview of the body.
fn http_error_message(body: &str) -> Option<String> {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| match value.get("detail")? {
            serde_json::Value::String(detail) => Some(detail.clone()),
            other => Some(other.to_string()),
        });
    detail.or_else(|| {
        let trimmed = body.trim();
        (!trimmed.is_empty()).then(|| preview(trimmed))
    })
}

fn preview(body: &str) -> String {
    match body.char_indices().nth(BODY_PREVIEW_LEN) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_owned(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn endpoint_appends_api_prefix() {
        let c = client("http://bridge.local:8000");
        let url = c.endpoint(&["sensors", "status"]).unwrap();
        assert_eq!(url.as_str(), "http://bridge.local:8000/api/sensors/status");
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let c = client("http://proxy.local/bridge/");
        let url = c.endpoint(&["health"]).unwrap();
        assert_eq!(url.as_str(), "http://proxy.local/bridge/api/health");
    }

    #[test]
    fn endpoint_percent_encodes_names() {
        let c = client("http://bridge.local");
        let url = c.endpoint(&["mqtt", "history", "flow temp/out?"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://bridge.local/api/mqtt/history/flow%20temp%2Fout%3F"
        );
    }

    #[test]
    fn preview_truncates_long_bodies() {
        let long = "x".repeat(500);
        let p = preview(&long);
        assert_eq!(p.len(), BODY_PREVIEW_LEN + 3);
        assert!(p.ends_with("..."));
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn http_error_message_prefers_detail() {
        assert_eq!(
            http_error_message(r#"{"detail":"Not Found"}"#).as_deref(),
            Some("Not Found")
        );
        assert_eq!(
            http_error_message("Bad Gateway\n").as_deref(),
            Some("Bad Gateway")
        );
        assert_eq!(http_error_message("   "), None);
    }
}
