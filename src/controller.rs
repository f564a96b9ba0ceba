//! Submission orchestration.
//!
//! `Idle → Submitting → { Redirecting | Failed | Reloading }`, with `Failed`
//! accepting a new submission. The optional metadata-cache call is awaited
//! before Stripe is contacted, and a cache failure ends the attempt with a
//! page reload without ever reaching Stripe.

use std::cell::RefCell;

use crate::cache::{CacheCheckoutData, MetadataCache};
use crate::client::{CardChange, PaymentGateway, PaymentIntentInfo, PaymentOutcome, StripeError};
use crate::credentials::TransactionSecret;
use crate::view::CheckoutView;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting,
    Redirecting,
    /// Recoverable; holds the message shown to the buyer.
    Failed(String),
    Reloading,
}

impl SubmissionState {
    fn is_busy(&self) -> bool {
        matches!(
            self,
            SubmissionState::Submitting | SubmissionState::Redirecting | SubmissionState::Reloading
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Submitting => "submitting",
            SubmissionState::Redirecting => "redirecting",
            SubmissionState::Failed(_) => "failed",
            SubmissionState::Reloading => "reloading",
        }
    }
}

/// How a single `submit` call ended.
#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    /// Another submission was already in flight.
    Ignored,
    /// Payment succeeded and the form was handed to the browser.
    Redirected(PaymentIntentInfo),
    /// The buyer can correct and retry.
    Failed(StripeError),
    /// The cache call failed and the page is reloading.
    Reloaded,
}

pub struct CheckoutController<G, C, V> {
    gateway: G,
    cache: Option<C>,
    view: V,
    secret: TransactionSecret,
    state: RefCell<SubmissionState>,
}

impl<G, C, V> CheckoutController<G, C, V>
where
    G: PaymentGateway,
    C: MetadataCache,
    V: CheckoutView,
{
    /// `cache` is `None` for pages without the metadata-cache step.
    pub fn new(gateway: G, cache: Option<C>, view: V, secret: TransactionSecret) -> Self {
        Self {
            gateway,
            cache,
            view,
            secret,
            state: RefCell::new(SubmissionState::Idle),
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state.borrow().clone()
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    fn transition(&self, next: SubmissionState) {
        let mut state = self.state.borrow_mut();
        tracing::debug!(from = state.name(), to = next.name(), "checkout state");
        *state = next;
    }

    /// Relay a widget `change` event into the feedback element.
    pub fn handle_card_change(&self, change: &CardChange) {
        match &change.error {
            Some(err) => {
                tracing::debug!(code = ?err.code, "card validation error");
                self.view.show_error(&err.message);
            }
            None => self.view.clear_error(),
        }
    }

    /// Run one submission attempt to completion.
    pub async fn submit(&self) -> SubmitOutcome {
        if self.state.borrow().is_busy() {
            tracing::debug!("submission already in flight, ignoring");
            return SubmitOutcome::Ignored;
        }
        self.transition(SubmissionState::Submitting);
        self.gateway.set_widget_disabled(true);
        self.view.set_submitting(true);

        let fields = self.view.read_form();
        tracing::info!(intent = self.secret.intent_id(), "submitting payment");

        if let Some(cache) = &self.cache {
            let data = CacheCheckoutData::new(self.view.csrf_token(), &self.secret, fields.save_info);
            if let Err(err) = cache.cache(&data).await {
                tracing::warn!("{}; reloading page", err);
                self.transition(SubmissionState::Reloading);
                self.view.reload_page();
                return SubmitOutcome::Reloaded;
            }
            tracing::debug!("checkout metadata cached");
        }

        let details = fields.payment_details();
        let outcome = match self.gateway.confirm_card_payment(&self.secret, &details).await {
            PaymentOutcome::RequiresAction(intent) => {
                tracing::info!(intent = %intent.id, "payment requires further authentication");
                self.gateway.handle_card_action(&self.secret).await
            }
            other => other,
        };
        self.settle(outcome)
    }

    fn settle(&self, outcome: PaymentOutcome) -> SubmitOutcome {
        match outcome {
            PaymentOutcome::Succeeded(intent) => {
                tracing::info!(intent = %intent.id, "payment succeeded, submitting form");
                self.transition(SubmissionState::Redirecting);
                self.view.submit_form();
                SubmitOutcome::Redirected(intent)
            }
            PaymentOutcome::Failed(err) => self.recover(err),
            PaymentOutcome::RequiresAction(intent) => self.recover(intent.last_payment_error.unwrap_or_else(|| {
                StripeError::new("Your card requires additional authentication. Please try again.")
            })),
            PaymentOutcome::Incomplete(intent) => {
                let status = intent.status;
                self.recover(intent.last_payment_error.unwrap_or_else(|| {
                    StripeError::new(format!(
                        "Payment could not be completed (status: {}). Please try again.",
                        status
                    ))
                }))
            }
        }
    }

    fn recover(&self, err: StripeError) -> SubmitOutcome {
        tracing::warn!(code = ?err.code, "payment failed: {}", err.message);
        self.view.show_error(&err.message);
        self.gateway.set_widget_disabled(false);
        self.view.set_submitting(false);
        self.transition(SubmissionState::Failed(err.message.clone()));
        SubmitOutcome::Failed(err)
    }
}
