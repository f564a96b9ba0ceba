//! In-browser checks of the DOM side: feedback markup, the overlay swap and
//! the submit listener installed by `mount_checkout`.
//!
//! Run with `wasm-pack test --headless --firefox`.

#![cfg(target_arch = "wasm32")]

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;
use web_sys::js_sys::{Array, Function, Reflect};
use web_sys::{Document, Element, Event, EventInit, HtmlElement};

use stripe_checkout_form::view::{render_error, CheckoutView, DomCheckoutView};
use stripe_checkout_form::{mount_checkout, CheckoutConfig};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window().and_then(|w| w.document()).expect("test runs in a page")
}

fn config(prefix: &str) -> CheckoutConfig {
    CheckoutConfig {
        public_key_element_id: format!("{prefix}-key"),
        client_secret_element_id: format!("{prefix}-secret"),
        card_element_id: format!("{prefix}-card"),
        feedback_element_id: format!("{prefix}-errors"),
        submit_button_id: format!("{prefix}-submit"),
        form_id: format!("{prefix}-form"),
        save_info_element_id: format!("{prefix}-save-info"),
        overlay_element_id: Some(format!("{prefix}-overlay")),
        ..CheckoutConfig::default()
    }
}

/// Append a checkout page laid out for `config` to `<body>`.
fn page(config: &CheckoutConfig) -> Element {
    let doc = document();
    let root = doc.create_element("div").expect("div");
    let overlay = config.overlay_element_id.clone().unwrap_or_default();
    root.set_inner_html(&format!(
        r#"<script id="{key}" type="application/json">"pk_test_123"</script>
           <script id="{secret}" type="application/json">"pi_1_secret_2"</script>
           <form id="{form}" method="POST" action="/checkout/">
             <input name="full_name" value="Ada Lovelace">
             <div id="{card}"></div>
             <div id="{feedback}"></div>
             <button id="{button}" type="submit">Complete Order</button>
           </form>
           <div id="{overlay}" style="display: none"></div>"#,
        key = config.public_key_element_id,
        secret = config.client_secret_element_id,
        form = config.form_id,
        card = config.card_element_id,
        feedback = config.feedback_element_id,
        button = config.submit_button_id,
    ));
    doc.body().expect("body").append_child(&root).expect("append page");
    root
}

fn display_of(id: &str) -> String {
    document()
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        .expect("styled element")
        .style()
        .get_property_value("display")
        .expect("display property")
}

/// Install a stand-in `window.Stripe` whose card widget records its calls,
/// and whose confirmations never settle.
fn fake_stripe() -> JsValue {
    let factory = Function::new_no_args(
        r#"
        const calls = [];
        const card = {
            mount(selector) { calls.push("mount " + selector); },
            unmount() { calls.push("unmount"); },
            update(options) { calls.push("update " + options.disabled); },
            on(kind) { calls.push("on " + kind); },
            off(kind) { calls.push("off " + kind); },
        };
        const Stripe = function () {
            return {
                elements() { return { create() { return card; } }; },
                confirmCardPayment() { return new Promise(() => {}); },
                handleCardAction() { return new Promise(() => {}); },
            };
        };
        Stripe.calls = calls;
        return Stripe;
        "#,
    );
    let stripe = factory.call0(&JsValue::NULL).expect("fake Stripe");
    let window = web_sys::window().expect("window");
    Reflect::set(&window, &JsValue::from_str("Stripe"), &stripe).expect("install fake Stripe");
    stripe
}

fn card_calls(stripe: &JsValue) -> Vec<String> {
    Reflect::get(stripe, &JsValue::from_str("calls"))
        .expect("calls")
        .unchecked_into::<Array>()
        .iter()
        .filter_map(|call| call.as_string())
        .collect()
}

fn submit_event() -> Event {
    let init = EventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    Event::new_with_event_init_dict("submit", &init).expect("submit event")
}

#[wasm_bindgen_test]
fn error_message_is_rendered_as_text() {
    let doc = document();
    let container = doc.create_element("div").expect("div");

    render_error(&doc, &container, "<b>bold</b> & <img src=x>").expect("render");

    assert_eq!(container.child_element_count(), 2);
    let icon = container.first_element_child().expect("icon");
    assert_eq!(icon.class_name(), "icon");
    assert_eq!(icon.get_attribute("role").as_deref(), Some("alert"));
    let text = container.last_element_child().expect("message");
    assert_eq!(text.text_content().as_deref(), Some("<b>bold</b> & <img src=x>"));
    assert_eq!(text.child_element_count(), 0);
}

#[wasm_bindgen_test]
fn rendering_again_replaces_the_previous_error() {
    let doc = document();
    let container = doc.create_element("div").expect("div");

    render_error(&doc, &container, "Your card was declined.").expect("render");
    render_error(&doc, &container, "Your card has expired.").expect("render");

    assert_eq!(container.child_element_count(), 2);
    assert_eq!(
        container.last_element_child().and_then(|el| el.text_content()).as_deref(),
        Some("Your card has expired.")
    );
}

#[wasm_bindgen_test]
fn recovered_submission_restores_form_and_overlay() {
    let config = config("overlay-swap");
    let root = page(&config);
    let overlay = config.overlay_element_id.clone().expect("overlay configured");
    let view = DomCheckoutView::locate(&document(), &config).expect("locate");
    let button = document().get_element_by_id(&config.submit_button_id).expect("button");

    view.set_submitting(true);
    assert_eq!(display_of(&config.form_id), "none");
    assert_eq!(display_of(&overlay), "block");
    assert!(button.has_attribute("disabled"));

    view.set_submitting(false);
    assert_eq!(display_of(&config.form_id), "");
    assert_eq!(display_of(&overlay), "none");
    assert!(!button.has_attribute("disabled"));

    root.remove();
}

#[wasm_bindgen_test]
fn missing_overlay_fails_fast() {
    let mut config = config("overlay-missing");
    let root = page(&config);
    config.overlay_element_id = Some("overlay-missing-nowhere".into());

    let err = DomCheckoutView::locate(&document(), &config).expect_err("overlay is absent");
    assert!(err.to_string().contains("overlay-missing-nowhere"));

    root.remove();
}

#[wasm_bindgen_test]
fn mounted_checkout_intercepts_submit() {
    fake_stripe();
    let config = config("intercept");
    let root = page(&config);

    let handle = mount_checkout(&config).expect("mount");
    assert_eq!(handle.state(), "idle");

    let form = document().get_element_by_id(&config.form_id).expect("form");
    let event = submit_event();
    form.dispatch_event(&event).expect("dispatch");
    assert!(event.default_prevented());

    drop(handle);
    root.remove();
}

#[wasm_bindgen_test]
fn dispose_detaches_listeners_and_unmounts_card() {
    let stripe = fake_stripe();
    let config = config("dispose");
    let root = page(&config);

    let mut handle = mount_checkout(&config).expect("mount");
    assert_eq!(
        card_calls(&stripe),
        vec![format!("mount #{}", config.card_element_id), "on change".to_string()]
    );

    handle.dispose();
    let calls = card_calls(&stripe);
    assert_eq!(&calls[2..], ["off change", "unmount"]);

    // Detached: a later submit is left to the browser.
    let form = document().get_element_by_id(&config.form_id).expect("form");
    let event = submit_event();
    form.dispatch_event(&event).expect("dispatch");
    assert!(!event.default_prevented());

    // Dropping after dispose does not tear down twice.
    drop(handle);
    assert_eq!(card_calls(&stripe).len(), 4);

    root.remove();
}
