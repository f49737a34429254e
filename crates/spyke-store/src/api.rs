//! # Products API Client
//!
//! Typed access to the backend's draft and product endpoints.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Products API                                         │
//! │                                                                         │
//! │  save_draft(None, draft)      POST {base}/products/drafts              │
//! │  save_draft(Some(id), draft)  PUT  {base}/products/drafts/{id}         │
//! │  submit_product(id, draft)    POST {base}/products                     │
//! │                                                                         │
//! │  Headers: Authorization: Bearer <token> (optional)                     │
//! │           X-Request-Id: <uuid v4>                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Response Normalization
//! The backend is not consistent about envelopes. Every response body goes
//! through [`normalize`] exactly once, here, and nothing past this module
//! sees the raw shapes:
//!
//! ```text
//!   { "data": { "draft": T } }  ─┐
//!   { "data": T }               ─┤
//!   { "draft": T }              ─┼──► normalize(value, "draft") ──► T
//!   T                           ─┘
//! ```

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use spyke_core::ProductDraft;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ApiSettings;
use crate::error::{ApiError, ApiResult};

/// Envelope key for draft responses.
pub const DRAFT_KEY: &str = "draft";

/// Envelope key for product responses.
pub const PRODUCT_KEY: &str = "product";

// =============================================================================
// Response Types
// =============================================================================

/// A draft as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRecord {
    #[serde(alias = "_id")]
    pub id: String,

    #[serde(default)]
    pub updated_at: Option<String>,
}

/// A product created by a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedProduct {
    #[serde(alias = "_id")]
    pub id: String,

    #[serde(default)]
    pub slug: Option<String>,

    /// Moderation status, e.g. `"pending_review"`.
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    draft_id: Option<&'a str>,

    #[serde(flatten)]
    draft: &'a ProductDraft,
}

// =============================================================================
// Normalization
// =============================================================================

/// Unwraps one of the known response envelopes and decodes `T`.
///
/// `{data:{key:T}}` is tried first, then `{data:T}`, then `{key:T}`, and
/// finally the value itself.
pub fn normalize<T: DeserializeOwned>(value: Value, key: &str) -> ApiResult<T> {
    let payload = match value {
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Object(mut data)) => match data.remove(key) {
                Some(inner) => inner,
                None => Value::Object(data),
            },
            Some(data) => data,
            None => match map.remove(key) {
                Some(inner) => inner,
                None => Value::Object(map),
            },
        },
        other => other,
    };

    serde_json::from_value(payload).map_err(|e| ApiError::UnexpectedShape {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

/// Human-readable message for a failed response.
///
/// Prefers a `message` or `error` string in a JSON body, then the raw body,
/// then the status reason.
pub fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for field in ["message", "error"] {
            if let Some(Value::String(message)) = map.get(field) {
                return message.clone();
            }
        }
    }

    let body = body.trim();
    if !body.is_empty() && !body.starts_with('{') {
        return body.to_string();
    }

    status
        .canonical_reason()
        .unwrap_or("Unknown error")
        .to_string()
}

// =============================================================================
// Draft API
// =============================================================================

/// Backend operations used by the product-creation store.
#[async_trait]
pub trait DraftApi: Send + Sync {
    /// Creates a draft (`id` is `None`) or overwrites an existing one.
    async fn save_draft(&self, id: Option<&str>, draft: &ProductDraft) -> ApiResult<DraftRecord>;

    /// Publishes the draft as a product.
    async fn submit_product(
        &self,
        draft_id: Option<&str>,
        draft: &ProductDraft,
    ) -> ApiResult<SubmittedProduct>;
}

/// [`DraftApi`] over HTTP.
///
/// Requests use the HTTP client's default timeouts.
#[derive(Debug, Clone)]
pub struct HttpProductsApi {
    client: Client,
    base_url: Url,
    auth_token: Option<String>,
}

impl HttpProductsApi {
    /// Creates a client for the API rooted at `base_url`.
    pub fn new(base_url: &str) -> ApiResult<Self> {
        let invalid = |reason: String| ApiError::InvalidUrl {
            url: base_url.to_string(),
            reason,
        };

        let parsed = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
            return Err(invalid("expected an http(s) URL".to_string()));
        }

        Ok(HttpProductsApi {
            client: Client::builder().build()?,
            base_url: parsed,
            auth_token: None,
        })
    }

    /// Creates a client from the `[api]` config section.
    pub fn from_settings(settings: &ApiSettings) -> ApiResult<Self> {
        let api = Self::new(&settings.base_url)?;
        Ok(match &settings.auth_token {
            Some(token) => api.with_auth_token(token.clone()),
            None => api,
        })
    }

    /// Sends `Authorization: Bearer <token>` on every request.
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends `segments` to the base path, percent-encoding each one.
    ///
    /// Empty, `.` and `..` segments are rejected so caller-supplied ids
    /// always name a single path segment.
    pub fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(ApiError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: format!("invalid path segment {:?}", bad),
            });
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends a request and normalizes the response under `key`.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, key: &str) -> ApiResult<T> {
        let request_id = Uuid::new_v4().to_string();
        let mut request = request.header("x-request-id", &request_id);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = error_message(status, &body);
            warn!(%request_id, status = status.as_u16(), %message, "Products API request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        debug!(%request_id, status = status.as_u16(), "Products API request succeeded");

        let value: Value = serde_json::from_str(&body).map_err(|e| ApiError::UnexpectedShape {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        normalize(value, key)
    }
}

#[async_trait]
impl DraftApi for HttpProductsApi {
    async fn save_draft(&self, id: Option<&str>, draft: &ProductDraft) -> ApiResult<DraftRecord> {
        let request = match id {
            Some(id) => self.client.put(self.endpoint(&["products", "drafts", id])?),
            None => self.client.post(self.endpoint(&["products", "drafts"])?),
        };
        self.send(request.json(draft), DRAFT_KEY).await
    }

    async fn submit_product(
        &self,
        draft_id: Option<&str>,
        draft: &ProductDraft,
    ) -> ApiResult<SubmittedProduct> {
        let body = SubmitRequest { draft_id, draft };
        let request = self.client.post(self.endpoint(&["products"])?).json(&body);
        self.send(request, PRODUCT_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Path;
    use axum::http::{HeaderMap, StatusCode as AxumStatus};
    use axum::routing::{post, put};
    use axum::{Json, Router};
    use serde_json::json;

    #[test]
    fn test_normalize_all_shapes() {
        let shapes = [
            json!({"data": {"draft": {"id": "d1"}}}),
            json!({"data": {"id": "d1"}}),
            json!({"draft": {"id": "d1"}}),
            json!({"id": "d1"}),
            json!({"data": {"draft": {"_id": "d1"}}}),
        ];

        for shape in shapes {
            let record: DraftRecord = normalize(shape.clone(), DRAFT_KEY).unwrap();
            assert_eq!(record.id, "d1", "shape {}", shape);
        }
    }

    #[test]
    fn test_normalize_rejects_unknown_shape() {
        let err = normalize::<DraftRecord>(json!({"ok": true}), DRAFT_KEY).unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedShape { ref key, .. } if key == "draft"));
    }

    #[test]
    fn test_error_message() {
        let status = StatusCode::UNPROCESSABLE_ENTITY;
        assert_eq!(error_message(status, r#"{"message":"title taken"}"#), "title taken");
        assert_eq!(error_message(status, r#"{"error":"bad price"}"#), "bad price");
        assert_eq!(error_message(status, "gateway exploded"), "gateway exploded");
        assert_eq!(error_message(status, "{}"), "Unprocessable Entity");
    }

    #[test]
    fn test_submit_body_is_flat() {
        let mut draft = ProductDraft::new();
        draft.title = "Invoice Bot".into();
        let body = serde_json::to_value(SubmitRequest {
            draft_id: Some("d1"),
            draft: &draft,
        })
        .unwrap();

        assert_eq!(body["draftId"], "d1");
        assert_eq!(body["title"], "Invoice Bot");
    }

    async fn spawn_backend() -> String {
        let app = Router::new()
            .route(
                "/api/products/drafts",
                post(|headers: HeaderMap| async move {
                    let authorized = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        == Some("Bearer secret");
                    if !authorized || !headers.contains_key("x-request-id") {
                        return (AxumStatus::UNAUTHORIZED, Json(json!({"error": "unauthorized"})));
                    }
                    (AxumStatus::CREATED, Json(json!({"data": {"draft": {"id": "d1"}}})))
                }),
            )
            .route(
                "/api/products/drafts/{id}",
                put(|Path(id): Path<String>| async move {
                    Json(json!({"draft": {"id": id, "updatedAt": "2026-01-01T00:00:00Z"}}))
                }),
            )
            .route(
                "/api/products",
                post(|Json(body): Json<Value>| async move {
                    if body["title"] == "taken" {
                        return (AxumStatus::CONFLICT, Json(json!({"message": "title taken"})));
                    }
                    (AxumStatus::CREATED, Json(json!({"data": {"id": "p1", "slug": "invoice-bot"}})))
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}/api/", addr)
    }

    #[tokio::test]
    async fn test_http_round_trip() {
        let base = spawn_backend().await;
        let api = HttpProductsApi::new(&base).unwrap().with_auth_token("secret");
        let draft = ProductDraft::new();

        let created = api.save_draft(None, &draft).await.unwrap();
        assert_eq!(created.id, "d1");

        let updated = api.save_draft(Some("d1"), &draft).await.unwrap();
        assert_eq!(updated.id, "d1");
        assert_eq!(updated.updated_at.as_deref(), Some("2026-01-01T00:00:00Z"));

        let product = api.submit_product(Some("d1"), &draft).await.unwrap();
        assert_eq!(product.id, "p1");
        assert_eq!(product.slug.as_deref(), Some("invoice-bot"));
    }

    #[tokio::test]
    async fn test_http_errors() {
        let base = spawn_backend().await;

        let anonymous = HttpProductsApi::new(&base).unwrap();
        let err = anonymous.save_draft(None, &ProductDraft::new()).await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 401, ref message } if message == "unauthorized"));

        let api = HttpProductsApi::new(&base).unwrap().with_auth_token("secret");
        let mut draft = ProductDraft::new();
        draft.title = "taken".into();
        let err = api.submit_product(None, &draft).await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 409, ref message } if message == "title taken"));
    }

    #[test]
    fn test_endpoint_joins_base_path() {
        for base in ["http://localhost/api", "http://localhost/api/"] {
            let api = HttpProductsApi::new(base).unwrap();
            let url = api.endpoint(&["products", "drafts"]).unwrap();
            assert_eq!(url.as_str(), "http://localhost/api/products/drafts");
        }
    }

    #[test]
    fn test_endpoint_encodes_ids() {
        let api = HttpProductsApi::new("http://localhost/api/").unwrap();

        let url = api.endpoint(&["products", "drafts", "../../products"]).unwrap();
        assert_eq!(url.path(), "/api/products/drafts/..%2F..%2Fproducts");

        let url = api.endpoint(&["products", "drafts", "a?b#c"]).unwrap();
        assert_eq!(url.path(), "/api/products/drafts/a%3Fb%23c");
        assert_eq!(url.query(), None);

        for id in ["", ".", ".."] {
            let err = api.endpoint(&["products", "drafts", id]).unwrap_err();
            assert!(matches!(err, ApiError::InvalidUrl { .. }), "id {:?}", id);
        }
    }

    #[test]
    fn test_new_rejects_bad_base_url() {
        assert!(matches!(
            HttpProductsApi::new("not a url").unwrap_err(),
            ApiError::InvalidUrl { .. }
        ));
        assert!(matches!(
            HttpProductsApi::new("ftp://localhost/api").unwrap_err(),
            ApiError::InvalidUrl { .. }
        ));
    }

    #[tokio::test]
    async fn test_http_draft_id_stays_one_segment() {
        let base = spawn_backend().await;
        let api = HttpProductsApi::new(&base).unwrap().with_auth_token("secret");
        let draft = ProductDraft::new();

        for id in ["../../products", "a/b?c=d"] {
            let record = api.save_draft(Some(id), &draft).await.unwrap();
            assert_eq!(record.id, id);
        }

        let err = api.save_draft(Some(".."), &draft).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl { .. }));
    }
}
