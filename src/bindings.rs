//! stripe_checkout_form/src/bindings.rs
//!
//! Low‐level wasm-bindgen bindings to Stripe.js v3 for the Card Element flow.
//!
//! Exposes the raw Stripe.js handles (`JsStripe`, `JsElements`, `JsCardElement`)
//! and their async methods via `js_sys::Promise`.
//! Higher-level wrappers live in `client.rs`.

use wasm_bindgen::prelude::*;
use web_sys::js_sys::{Function, Promise};

#[wasm_bindgen]
extern "C" {
    //------------------------------------------------------------------------------
    // Core Types
    //------------------------------------------------------------------------------

    /// Raw Stripe.js client handle.
    #[wasm_bindgen(js_name = Stripe, js_namespace = window)]
    #[derive(Debug, Clone)]
    pub type JsStripe;

    /// Raw Elements factory handle.
    #[wasm_bindgen(js_name = Elements)]
    #[derive(Debug, Clone)]
    pub type JsElements;

    /// Raw Card Element UI component handle.
    #[wasm_bindgen(js_name = CardElement)]
    #[derive(Debug, Clone)]
    pub type JsCardElement;

    //------------------------------------------------------------------------------
    // Constructors
    //------------------------------------------------------------------------------

    /// Construct a new `JsStripe` from your publishable key.
    ///
    /// ```js
    ///   const stripe = Stripe("pk_test_...");
    /// ```
    ///
    /// Throws (and so returns `Err`) when Stripe.js has not been loaded.
    #[wasm_bindgen(catch, js_name = Stripe, js_namespace = window)]
    pub fn new_stripe(publishable_key: &str) -> Result<JsStripe, JsValue>;

    //------------------------------------------------------------------------------
    // Instance Methods
    //------------------------------------------------------------------------------

    /// `stripe.elements()` → `JsElements`
    #[wasm_bindgen(method, catch, js_name = elements)]
    pub fn elements(this: &JsStripe) -> Result<JsElements, JsValue>;

    /// `elements.create("card", options)` → `JsCardElement`
    #[wasm_bindgen(method, catch, js_name = create)]
    pub fn create_element(
        this: &JsElements,
        element_type: &str,
        options: JsValue,
    ) -> Result<JsCardElement, JsValue>;

    /// `card.mount(selector)` → `()`
    #[wasm_bindgen(method, catch, js_name = mount)]
    pub fn mount(this: &JsCardElement, selector: &str) -> Result<(), JsValue>;

    /// `card.unmount()` → `()`
    #[wasm_bindgen(method, catch, js_name = unmount)]
    pub fn unmount(this: &JsCardElement) -> Result<(), JsValue>;

    /// `card.update({ disabled })` → `()`
    #[wasm_bindgen(method, catch, js_name = update)]
    pub fn update(this: &JsCardElement, options: JsValue) -> Result<(), JsValue>;

    /// `card.on("change", handler)`
    #[wasm_bindgen(method, js_name = on)]
    pub fn on(this: &JsCardElement, event: &str, handler: &Function);

    /// `card.off("change", handler)`
    #[wasm_bindgen(method, js_name = off)]
    pub fn off(this: &JsCardElement, event: &str, handler: &Function);

    /// `stripe.confirmCardPayment(clientSecret, data)` → JS `Promise`
    #[wasm_bindgen(method, catch, js_name = confirmCardPayment)]
    pub fn confirm_card_payment(
        this: &JsStripe,
        client_secret: &str,
        data: JsValue,
    ) -> Result<Promise, JsValue>;

    /// `stripe.handleCardAction(clientSecret)` → JS `Promise`
    #[wasm_bindgen(method, catch, js_name = handleCardAction)]
    pub fn handle_card_action(this: &JsStripe, client_secret: &str) -> Result<Promise, JsValue>;
}
