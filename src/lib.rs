pub mod bindings;
pub mod cache;
pub mod checkout_component;
pub mod client;
pub mod components;
pub mod config;
pub mod controller;
pub mod credentials;
pub mod error;
pub mod form;
pub mod interop;
pub mod mount;
pub mod telemetry;
pub mod view;

pub use bindings::*;
pub use checkout_component::*;
pub use client::{PaymentGateway, PaymentOutcome, StripeError, StripeGateway};
pub use components::*;
pub use config::CheckoutConfig;
pub use controller::{CheckoutController, SubmissionState, SubmitOutcome};
pub use error::CheckoutError;
pub use interop::*;
pub use mount::{mount_checkout, CheckoutHandle};
