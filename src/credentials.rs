//! Server-rendered credentials.
//!
//! The page embeds the publishable key and the PaymentIntent client secret as
//! JSON string literals inside two elements (Django's `json_script`), e.g.
//! `<script id="id_stripe_public_key" type="application/json">"pk_test_123"</script>`.

use std::fmt;

use web_sys::Document;

use crate::config::CheckoutConfig;
use crate::error::{CheckoutError, Result};

/// Stripe publishable key (`pk_...`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublishableKey(String);

impl PublishableKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One-time PaymentIntent client secret (`pi_..._secret_...`).
///
/// `Debug` is redacted so the secret never ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct TransactionSecret(String);

impl TransactionSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// The PaymentIntent id this secret belongs to, safe to log.
    pub fn intent_id(&self) -> &str {
        self.0.split("_secret_").next().unwrap_or_default()
    }
}

impl fmt::Debug for TransactionSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransactionSecret({}_secret_***)", self.intent_id())
    }
}

/// Strip the quoting the server wraps around an embedded value.
///
/// JSON string literals are decoded properly (escapes included); anything else
/// loses a single leading and trailing `"` if present.
pub fn unquote(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(decoded) = serde_json::from_str::<String>(raw) {
        return decoded;
    }
    let raw = raw.strip_prefix('"').unwrap_or(raw);
    let raw = raw.strip_suffix('"').unwrap_or(raw);
    raw.to_string()
}

fn read_embedded(document: &Document, id: &str) -> Result<String> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| CheckoutError::MissingElement { id: id.to_string() })?;
    let value = unquote(&element.text_content().unwrap_or_default());
    if value.is_empty() {
        return Err(CheckoutError::MissingCredential { id: id.to_string() });
    }
    Ok(value)
}

/// Read both credentials from the page.
pub fn read_credentials(
    document: &Document,
    config: &CheckoutConfig,
) -> Result<(PublishableKey, TransactionSecret)> {
    let key = read_embedded(document, &config.public_key_element_id)?;
    let secret = read_embedded(document, &config.client_secret_element_id)?;
    tracing::debug!("credentials read for {}", secret.split("_secret_").next().unwrap_or_default());
    Ok((PublishableKey(key), TransactionSecret(secret)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_key_is_stripped() {
        assert_eq!(unquote("\"pk_test_123\""), "pk_test_123");
    }

    #[test]
    fn surrounding_whitespace_from_markup_is_ignored() {
        assert_eq!(unquote("\n  \"pi_1_secret_2\"\n"), "pi_1_secret_2");
    }

    #[test]
    fn json_escapes_are_decoded() {
        assert_eq!(unquote(r#""a&b""#), "a&b");
    }

    #[test]
    fn unbalanced_quotes_fall_back_to_stripping() {
        assert_eq!(unquote("\"pk_live_abc"), "pk_live_abc");
        assert_eq!(unquote("pk_live_abc"), "pk_live_abc");
        assert_eq!(unquote("\"\""), "");
    }

    #[test]
    fn secret_debug_is_redacted() {
        let secret = TransactionSecret::new("pi_3Abc_secret_XyZ");
        assert_eq!(secret.intent_id(), "pi_3Abc");
        let shown = format!("{:?}", secret);
        assert!(!shown.contains("XyZ"));
        assert!(shown.contains("pi_3Abc"));
    }
}
