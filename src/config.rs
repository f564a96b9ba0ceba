//! Checkout configuration.
//!
//! Passed from the page as a plain object (camelCase keys); every field has a
//! default matching the stock checkout template, so `mountCheckout({})` works.

use serde::Deserialize;

use crate::client::CardStyle;
use crate::error::{CheckoutError, Result};

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutConfig {
    pub public_key_element_id: String,
    pub client_secret_element_id: String,
    pub card_element_id: String,
    pub feedback_element_id: String,
    pub submit_button_id: String,
    pub form_id: String,
    pub save_info_element_id: String,
    pub csrf_field_name: String,
    /// POST checkout metadata to `cache_url` before confirming.
    pub enable_metadata_cache: bool,
    /// Shown in place of the form while a payment is in flight.
    pub overlay_element_id: Option<String>,
    pub cache_url: String,
    pub card_style: CardStyle,
    pub log_level: String,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            public_key_element_id: "id_stripe_public_key".into(),
            client_secret_element_id: "id_client_secret".into(),
            card_element_id: "card-element".into(),
            feedback_element_id: "card-errors".into(),
            submit_button_id: "submit-button".into(),
            form_id: "payment-form".into(),
            save_info_element_id: "id-save-info".into(),
            csrf_field_name: "csrfmiddlewaretoken".into(),
            enable_metadata_cache: false,
            overlay_element_id: None,
            cache_url: "/checkout/cache_checkout_data/".into(),
            card_style: CardStyle::default(),
            log_level: "info".into(),
        }
    }
}

impl CheckoutConfig {
    /// The variant with server-side metadata caching and a loading overlay.
    pub fn with_metadata_cache(overlay_element_id: impl Into<String>) -> Self {
        Self {
            enable_metadata_cache: true,
            overlay_element_id: Some(overlay_element_id.into()),
            ..Self::default()
        }
    }

    pub fn card_selector(&self) -> String {
        format!("#{}", self.card_element_id)
    }

    pub fn validate(&self) -> Result<()> {
        let ids = [
            ("publicKeyElementId", &self.public_key_element_id),
            ("clientSecretElementId", &self.client_secret_element_id),
            ("cardElementId", &self.card_element_id),
            ("feedbackElementId", &self.feedback_element_id),
            ("submitButtonId", &self.submit_button_id),
            ("formId", &self.form_id),
            ("saveInfoElementId", &self.save_info_element_id),
            ("csrfFieldName", &self.csrf_field_name),
        ];
        for (name, value) in ids {
            if value.trim().is_empty() {
                return Err(CheckoutError::Config(format!("{} must not be empty", name)));
            }
        }
        if matches!(&self.overlay_element_id, Some(id) if id.trim().is_empty()) {
            return Err(CheckoutError::Config("overlayElementId must not be empty".into()));
        }
        if self.enable_metadata_cache && self.cache_url.trim().is_empty() {
            return Err(CheckoutError::Config(
                "cacheUrl is required when enableMetadataCache is set".into(),
            ));
        }
        self.log_level
            .parse::<tracing::Level>()
            .map_err(|_| CheckoutError::Config(format!("unknown logLevel `{}`", self.log_level)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_object_gives_defaults() {
        let config: CheckoutConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config, CheckoutConfig::default());
        assert!(config.validate().is_ok());
        assert_eq!(config.card_selector(), "#card-element");
    }

    #[test]
    fn camel_case_overrides() {
        let config: CheckoutConfig = serde_json::from_value(json!({
            "enableMetadataCache": true,
            "overlayElementId": "loading-overlay",
            "logLevel": "debug"
        }))
        .unwrap();
        assert!(config.enable_metadata_cache);
        assert_eq!(config.overlay_element_id.as_deref(), Some("loading-overlay"));
        assert_eq!(config.form_id, "payment-form");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn cache_without_url_is_rejected() {
        let config = CheckoutConfig {
            cache_url: " ".into(),
            ..CheckoutConfig::with_metadata_cache("loading-overlay")
        };
        assert!(matches!(config.validate(), Err(CheckoutError::Config(_))));
    }

    #[test]
    fn blank_ids_and_bad_levels_are_rejected() {
        let config = CheckoutConfig {
            form_id: "".into(),
            ..CheckoutConfig::default()
        };
        assert!(config.validate().is_err());

        let config = CheckoutConfig {
            log_level: "chatty".into(),
            ..CheckoutConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
