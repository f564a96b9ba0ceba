//! stripe_checkout_form/src/client.rs
//!
//! High-level Rust API over the Stripe.js Card Element.
//!
//! This module provides:
//! - `CardStyle` / `CardElementOptions` to style the card widget.
//! - `BillingDetails`, `ShippingDetails` and `Address`, the buyer data sent with a confirmation.
//! - `StripeGateway::mount()` to create a Stripe instance, build the Card Element and mount it.
//! - `PaymentGateway`, the seam the checkout controller talks to, implemented by `StripeGateway`.
//! - `PaymentOutcome`, the discriminated result of `stripe.confirmCardPayment`.
//!
//! # Example Usage
//! ```rust,ignore
//! use stripe_checkout_form::client::{CardElementOptions, PaymentGateway, PaymentOutcome, StripeGateway};
//!
//! let gateway = StripeGateway::mount(&key, "#card-element", &CardElementOptions::default())?;
//! match gateway.confirm_card_payment(&secret, &details).await {
//!     PaymentOutcome::Succeeded(intent) => tracing::info!("Paid: {}", intent.id),
//!     PaymentOutcome::Failed(err)       => tracing::warn!("Declined: {}", err.message),
//!     other                             => tracing::warn!("Not finished: {:?}", other),
//! }
//! ```

use std::fmt;

use gloo_utils::format::JsValueSerdeExt;
use serde::{Deserialize, Serialize};
use serde_json::json;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::js_sys::{Function, Object, Reflect};

use crate::bindings::{new_stripe, JsCardElement, JsStripe};
use crate::credentials::{PublishableKey, TransactionSecret};

/// Card Element `style` option: a `base` and an `invalid` variant.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CardStyle {
    pub base: serde_json::Value,
    pub invalid: serde_json::Value,
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            base: json!({
                "color": "#000",
                "fontFamily": "\"Helvetica Neue\", Helvetica, sans-serif",
                "fontSmoothing": "antialiased",
                "fontSize": "16px",
                "::placeholder": { "color": "#aab7c4" }
            }),
            invalid: json!({
                "color": "#dc3545",
                "iconColor": "#dc3545"
            }),
        }
    }
}

/// Options for `elements.create("card", ...)`.
#[derive(Serialize, Clone, Debug, Default)]
pub struct CardElementOptions {
    pub style: CardStyle,
}

/// Postal address attached to billing or shipping details.
///
/// `postal_code` is only sent with shipping; billing leaves it to the card widget.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct Address {
    pub line1: String,
    pub line2: String,
    pub city: String,
    pub country: String,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

/// `payment_method.billing_details` for `confirmCardPayment`.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct BillingDetails {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: Address,
}

/// `shipping` for `confirmCardPayment`.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct ShippingDetails {
    pub name: String,
    pub phone: String,
    pub address: Address,
}

/// Buyer data passed alongside the card when confirming.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PaymentDetails {
    pub billing_details: BillingDetails,
    pub shipping: ShippingDetails,
}

/// Representation of a Stripe.js error object.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct StripeError {
    /// Human-readable message, shown to the buyer as is.
    pub message: String,
    /// Stripe’s error type, e.g. `"card_error"`.
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    /// Optional Stripe error code, e.g. `"card_declined"`.
    #[serde(default)]
    pub code: Option<String>,
}

impl StripeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error_type: None,
            code: None,
        }
    }
}

impl fmt::Display for StripeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for StripeError {}

/// PaymentIntent status as reported by Stripe.js.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IntentStatus {
    Succeeded,
    #[serde(alias = "requires_source_action")]
    RequiresAction,
    Processing,
    RequiresPaymentMethod,
    RequiresConfirmation,
    RequiresCapture,
    Canceled,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for IntentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IntentStatus::Succeeded => "succeeded",
            IntentStatus::RequiresAction => "requires_action",
            IntentStatus::Processing => "processing",
            IntentStatus::RequiresPaymentMethod => "requires_payment_method",
            IntentStatus::RequiresConfirmation => "requires_confirmation",
            IntentStatus::RequiresCapture => "requires_capture",
            IntentStatus::Canceled => "canceled",
            IntentStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Minimal representation of a PaymentIntent returned by Stripe.js.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct PaymentIntentInfo {
    /// Stripe’s internal identifier, e.g. `pi_1Fxxxxxx`.
    #[serde(default)]
    pub id: String,
    pub status: IntentStatus,
    #[serde(default)]
    pub last_payment_error: Option<StripeError>,
}

/// Raw `{ error }` / `{ paymentIntent }` object resolved by Stripe.js promises.
#[derive(Debug, Deserialize, Default)]
pub struct ConfirmResult {
    #[serde(default)]
    pub error: Option<StripeError>,
    #[serde(rename = "paymentIntent", default)]
    pub payment_intent: Option<PaymentIntentInfo>,
}

/// Strongly-typed outcome of attempting to confirm a card payment.
#[derive(Clone, Debug, PartialEq)]
pub enum PaymentOutcome {
    /// The PaymentIntent succeeded.
    Succeeded(PaymentIntentInfo),
    /// Stripe wants the buyer to complete an extra authentication step.
    RequiresAction(PaymentIntentInfo),
    /// Resolved without an error but in some other status.
    Incomplete(PaymentIntentInfo),
    /// Stripe reported an error.
    Failed(StripeError),
}

impl From<ConfirmResult> for PaymentOutcome {
    fn from(result: ConfirmResult) -> Self {
        if let Some(err) = result.error {
            return PaymentOutcome::Failed(err);
        }
        match result.payment_intent {
            Some(intent) => match intent.status {
                IntentStatus::Succeeded => PaymentOutcome::Succeeded(intent),
                IntentStatus::RequiresAction => PaymentOutcome::RequiresAction(intent),
                _ => PaymentOutcome::Incomplete(intent),
            },
            None => PaymentOutcome::Failed(StripeError::new(
                "Stripe returned neither a payment nor an error.",
            )),
        }
    }
}

/// Payload of the Card Element `change` event.
#[derive(Clone, Debug, Deserialize, Default, PartialEq)]
pub struct CardChange {
    #[serde(default)]
    pub error: Option<StripeError>,
    #[serde(default)]
    pub complete: bool,
    #[serde(default)]
    pub empty: bool,
}

/// The vendor operations the checkout controller depends on.
#[allow(async_fn_in_trait)]
pub trait PaymentGateway {
    /// Enable or disable card input in the widget.
    fn set_widget_disabled(&self, disabled: bool);

    /// `stripe.confirmCardPayment` with the mounted widget and the buyer details.
    async fn confirm_card_payment(
        &self,
        secret: &TransactionSecret,
        details: &PaymentDetails,
    ) -> PaymentOutcome;

    /// `stripe.handleCardAction` for an intent left in `requires_action`.
    async fn handle_card_action(&self, secret: &TransactionSecret) -> PaymentOutcome;
}

#[derive(Serialize)]
struct CardUpdate {
    disabled: bool,
}

/// [`PaymentGateway`] backed by Stripe.js and a mounted Card Element.
#[derive(Debug, Clone)]
pub struct StripeGateway {
    stripe: JsStripe,
    card: JsCardElement,
}

impl StripeGateway {
    /// Initialize Stripe.js, create the Card Element, and mount it.
    ///
    /// # Arguments
    ///
    /// * `publishable_key` – Your Stripe publishable key (starts with `pk_`).
    /// * `selector` – CSS selector of the mount point, e.g. `"#card-element"`.
    /// * `options` – Styling for the widget.
    pub fn mount(
        publishable_key: &PublishableKey,
        selector: &str,
        options: &CardElementOptions,
    ) -> Result<Self, StripeError> {
        // 1) Create Stripe instance
        let stripe = new_stripe(publishable_key.as_str()).map_err(js_to_stripe_error)?;
        let elements = stripe.elements().map_err(js_to_stripe_error)?;

        // 2) Create the card widget
        let options_js = to_js(options).map_err(serde_error_to_stripe_error)?;
        let card = elements
            .create_element("card", options_js)
            .map_err(js_to_stripe_error)?;

        // 3) Mount into DOM
        card.mount(selector).map_err(js_to_stripe_error)?;
        tracing::debug!(selector, "card element mounted");

        Ok(Self { stripe, card })
    }

    pub fn card(&self) -> &JsCardElement {
        &self.card
    }

    /// Subscribe `handler` to the widget's `change` events.
    pub fn on_change(&self, handler: &Function) {
        self.card.on("change", handler);
    }

    pub fn off_change(&self, handler: &Function) {
        self.card.off("change", handler);
    }

    /// Tear down the mounted Card Element.
    pub fn unmount(&self) -> Result<(), StripeError> {
        self.card.unmount().map_err(js_to_stripe_error)
    }

    fn confirm_data(&self, details: &PaymentDetails) -> Result<JsValue, StripeError> {
        let payment_method = Object::new();
        set(&payment_method, "card", self.card.as_ref())?;
        let billing = to_js(&details.billing_details).map_err(serde_error_to_stripe_error)?;
        set(&payment_method, "billing_details", &billing)?;

        let data = Object::new();
        set(&data, "payment_method", &payment_method)?;
        let shipping = to_js(&details.shipping).map_err(serde_error_to_stripe_error)?;
        set(&data, "shipping", &shipping)?;
        Ok(data.into())
    }
}

impl PaymentGateway for StripeGateway {
    fn set_widget_disabled(&self, disabled: bool) {
        let update = match to_js(&CardUpdate { disabled }) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("card update serialization failed: {}", err);
                return;
            }
        };
        if let Err(err) = self.card.update(update) {
            tracing::warn!("card.update failed: {}", js_to_stripe_error(err));
        }
    }

    async fn confirm_card_payment(
        &self,
        secret: &TransactionSecret,
        details: &PaymentDetails,
    ) -> PaymentOutcome {
        let data = match self.confirm_data(details) {
            Ok(data) => data,
            Err(err) => return PaymentOutcome::Failed(err),
        };
        let promise = match self.stripe.confirm_card_payment(secret.expose(), data) {
            Ok(p) => p,
            Err(e) => return PaymentOutcome::Failed(js_to_stripe_error(e)),
        };
        settle_promise(JsFuture::from(promise).await)
    }

    async fn handle_card_action(&self, secret: &TransactionSecret) -> PaymentOutcome {
        let promise = match self.stripe.handle_card_action(secret.expose()) {
            Ok(p) => p,
            Err(e) => return PaymentOutcome::Failed(js_to_stripe_error(e)),
        };
        settle_promise(JsFuture::from(promise).await)
    }
}

fn settle_promise(result: Result<JsValue, JsValue>) -> PaymentOutcome {
    match result {
        Ok(js_val) => match js_val.into_serde::<ConfirmResult>() {
            Ok(parsed) => parsed.into(),
            Err(err) => PaymentOutcome::Failed(StripeError::new(format!(
                "Unreadable response from Stripe: {}",
                err
            ))),
        },
        Err(js_err) => PaymentOutcome::Failed(js_to_stripe_error(js_err)),
    }
}

/// Serialize into plain JS objects (never `Map`s), which is what Stripe.js expects.
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, serde_wasm_bindgen::Error> {
    value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
}

fn set(target: &Object, key: &str, value: &JsValue) -> Result<(), StripeError> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(js_to_stripe_error)
}

/// Convert any caught `JsValue` into a `StripeError` with best effort.
pub(crate) fn js_to_stripe_error(value: JsValue) -> StripeError {
    serde_wasm_bindgen::from_value::<StripeError>(value.clone()).unwrap_or_else(|_| StripeError {
        message: value.as_string().unwrap_or_else(|| format!("{:?}", value)),
        error_type: None,
        code: None,
    })
}

/// Convert a `serde_wasm_bindgen::Error` (from `to_value`) into `StripeError`.
fn serde_error_to_stripe_error(err: serde_wasm_bindgen::Error) -> StripeError {
    StripeError::new(err.to_string())
}
