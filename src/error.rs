//! Checkout Error Types

use thiserror::Error;
use wasm_bindgen::JsValue;
use web_sys::js_sys;

use crate::client::StripeError;

/// Result type alias
pub type Result<T> = std::result::Result<T, CheckoutError>;

/// Failures raised while wiring the checkout page together.
///
/// Anything that goes wrong once the buyer presses "pay" is reported to the
/// buyer through the feedback element instead (see [`StripeError`]).
#[derive(Error, Debug)]
pub enum CheckoutError {
    /// A required element id is not present in the document
    #[error("required element `#{id}` is missing from the page")]
    MissingElement { id: String },

    /// The element exists but is not the kind the checkout needs
    #[error("element `#{id}` is not a {expected}")]
    UnexpectedElement { id: String, expected: &'static str },

    /// A server-rendered credential is empty or unreadable
    #[error("credential element `#{id}` holds no value")]
    MissingCredential { id: String },

    /// Stripe.js refused to build or mount the card widget
    #[error("Stripe error: {0}")]
    Stripe(StripeError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Browser API failure
    #[error("JavaScript error: {0}")]
    Js(String),
}

impl CheckoutError {
    pub(crate) fn from_js(value: JsValue) -> Self {
        CheckoutError::Js(
            value
                .as_string()
                .unwrap_or_else(|| format!("{:?}", value)),
        )
    }
}

impl From<StripeError> for CheckoutError {
    fn from(err: StripeError) -> Self {
        CheckoutError::Stripe(err)
    }
}

impl From<CheckoutError> for JsValue {
    fn from(err: CheckoutError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_element() {
        let err = CheckoutError::MissingElement { id: "card-element".into() };
        assert_eq!(err.to_string(), "required element `#card-element` is missing from the page");

        let err = CheckoutError::UnexpectedElement { id: "payment-form".into(), expected: "form" };
        assert_eq!(err.to_string(), "element `#payment-form` is not a form");
    }

    #[test]
    fn stripe_errors_keep_their_message() {
        let err: CheckoutError = StripeError::new("Invalid API Key provided").into();
        assert_eq!(err.to_string(), "Stripe error: Invalid API Key provided");
    }
}
