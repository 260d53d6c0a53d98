//! Minimal wrapper around the vc.ru timeline and comment endpoints.
//!
//! Handles auth and request parameter shaping before delegating to the shared
//! HTTP client. Only the first timeline page is ever requested.
use crate::feed::PromoFeed;
use crate::vc::types::{Entry, Timeline};
use promo_common::{PromoError, Result};
use promo_http::{Auth, HttpClient, RequestOpts};

pub const API_BASE_URL: &str = "https://api.vc.ru/v2.31";
/// Hashtag the self-promo thread is published under.
pub const PROMO_HASHTAG: &str = "субботнийсамопиар";
const AUTH_HEADER: &str = "x-auth-token";

#[derive(Clone)]
pub struct VcApi {
    http: HttpClient,
    auth: Auth,
}

impl std::fmt::Debug for VcApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VcApi")
            .field("base", &self.http.base().as_str())
            .field("auth", &self.auth.kind())
            .finish()
    }
}

impl VcApi {
    /// Client for the production API.
    pub fn new(token: &str) -> Result<Self> {
        Self::with_base_url(API_BASE_URL, token)
    }

    /// Client for an arbitrary base URL (mock servers in tests).
    ///
    /// The token is validated as a header value here, so a bad token fails
    /// before any request is made.
    pub fn with_base_url(base: &str, token: &str) -> Result<Self> {
        let http = HttpClient::new(base).map_err(|e| PromoError::Startup(e.to_string()))?;
        let auth =
            Auth::header(AUTH_HEADER, token).map_err(|e| PromoError::Startup(e.to_string()))?;
        Ok(Self { http, auth })
    }

    /// `GET /timeline?sorting=date&hashtag=…`
    pub async fn promo_timeline(&self) -> Result<Timeline> {
        let resp: Timeline = self
            .http
            .get_json(
                "timeline",
                RequestOpts {
                    auth: Some(self.auth.clone()),
                    query: Some(vec![
                        ("sorting", "date".into()),
                        ("hashtag", PROMO_HASHTAG.into()),
                    ]),
                    ..Default::default()
                },
            )
            .await?;

        tracing::debug!(items = resp.result.items.len(), "vc.timeline.fetched");
        Ok(resp)
    }

    /// `POST /comment/add` with form body `id=…&text=…`.
    pub async fn add_comment(&self, post_id: i64, text: &str) -> Result<()> {
        let id = post_id.to_string();
        self.http
            .post_form(
                "comment/add",
                &[("id", id.as_str()), ("text", text)],
                RequestOpts {
                    auth: Some(self.auth.clone()),
                    ..Default::default()
                },
            )
            .await?;

        tracing::debug!(post_id, text_len = text.len(), "vc.comment.added");
        Ok(())
    }
}

#[async_trait::async_trait]
impl PromoFeed for VcApi {
    async fn fetch_timeline(&self) -> Result<Vec<Entry>> {
        Ok(self.promo_timeline().await?.into_entries())
    }

    async fn add_comment(&self, post_id: i64, text: &str) -> Result<()> {
        VcApi::add_comment(self, post_id, text).await
    }
}
