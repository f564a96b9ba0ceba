//! Pre-confirmation metadata cache call.
//!
//! Lets the server attach the save-info choice to the PaymentIntent before
//! Stripe confirms it. The body is form-encoded so the server's CSRF
//! middleware sees `csrfmiddlewaretoken` as a regular POST field.

use gloo_net::http::Request;
use thiserror::Error;
use web_sys::UrlSearchParams;

use crate::credentials::TransactionSecret;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("cache request failed: {0}")]
    Network(String),

    #[error("cache request rejected with status {0}")]
    Status(u16),
}

/// `POST` body for the cache endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheCheckoutData {
    pub csrfmiddlewaretoken: String,
    pub client_secret: String,
    pub save_info: bool,
}

impl CacheCheckoutData {
    pub fn new(csrf_token: impl Into<String>, secret: &TransactionSecret, save_info: bool) -> Self {
        Self {
            csrfmiddlewaretoken: csrf_token.into(),
            client_secret: secret.expose().to_string(),
            save_info,
        }
    }

    pub fn form_pairs(&self) -> [(&'static str, String); 3] {
        [
            ("csrfmiddlewaretoken", self.csrfmiddlewaretoken.clone()),
            ("client_secret", self.client_secret.clone()),
            ("save_info", self.save_info.to_string()),
        ]
    }
}

#[allow(async_fn_in_trait)]
pub trait MetadataCache {
    async fn cache(&self, data: &CacheCheckoutData) -> Result<(), CacheError>;
}

/// [`MetadataCache`] that POSTs to a server endpoint.
#[derive(Clone, Debug)]
pub struct HttpMetadataCache {
    url: String,
}

impl HttpMetadataCache {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl MetadataCache for HttpMetadataCache {
    async fn cache(&self, data: &CacheCheckoutData) -> Result<(), CacheError> {
        let params = UrlSearchParams::new().map_err(|e| CacheError::Network(format!("{:?}", e)))?;
        for (key, value) in data.form_pairs() {
            params.append(key, &value);
        }

        let response = Request::post(&self.url)
            .body(params)
            .map_err(|e| CacheError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| CacheError::Network(e.to_string()))?;

        if response.ok() {
            Ok(())
        } else {
            Err(CacheError::Status(response.status()))
        }
    }
}
