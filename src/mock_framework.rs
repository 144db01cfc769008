//! # Mock Framework
//!
//! Utilities for testing pages in isolation.
//!
//! Use [`create_mock_api`] to get an [`ApiClient`] and the raw request receiver.
//! Then use helpers like [`expect_get_cart`] or [`expect_place_order`] to assert
//! what a page asked for and decide when and how the backend answers.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::field::{Field, Visit};
use tracing::span;
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

use crate::api::{ApiClient, ApiRequest, ServiceResponse};
use crate::domain::{CartItem, ContactFormState, OrderConfirmation, OrderPayload, SessionToken};
use crate::effects::{ParticleBurst, VisualEffects};
use crate::pages::{CheckoutClient, CheckoutView, ContactClient, ContactView};
use crate::shell::{Shell, ShellCommand};

/// Creates a mock API client and a receiver for asserting requests.
///
/// Nothing answers on its own: every request sits in the receiver until the
/// test pops it and sends a reply through its responder. That makes in-flight
/// states observable and lets a test fail a request on purpose.
pub fn create_mock_api(buffer_size: usize) -> (ApiClient, mpsc::Receiver<ApiRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ApiClient::new(sender), receiver)
}

pub fn create_shell() -> (Shell, mpsc::UnboundedReceiver<ShellCommand>) {
    Shell::new()
}

/// Helper to verify that the next message is a GetCart request
pub async fn expect_get_cart(
    receiver: &mut mpsc::Receiver<ApiRequest>,
) -> Option<(SessionToken, ServiceResponse<Vec<CartItem>>)> {
    match receiver.recv().await {
        Some(ApiRequest::GetCart { token, respond_to }) => Some((token, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a PlaceOrder request
pub async fn expect_place_order(
    receiver: &mut mpsc::Receiver<ApiRequest>,
) -> Option<(SessionToken, OrderPayload, ServiceResponse<OrderConfirmation>)> {
    match receiver.recv().await {
        Some(ApiRequest::PlaceOrder {
            token,
            payload,
            respond_to,
        }) => Some((token, payload, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a SendContactMessage request
pub async fn expect_send_message(
    receiver: &mut mpsc::Receiver<ApiRequest>,
) -> Option<(ContactFormState, ServiceResponse<()>)> {
    match receiver.recv().await {
        Some(ApiRequest::SendContactMessage {
            message,
            respond_to,
        }) => Some((message, respond_to)),
        _ => None,
    }
}

/// Effects collaborator that remembers every burst it was asked for.
#[derive(Debug, Default)]
pub struct RecordingEffects {
    bursts: Mutex<Vec<ParticleBurst>>,
}

impl RecordingEffects {
    pub fn bursts(&self) -> Vec<ParticleBurst> {
        self.bursts.lock().unwrap().clone()
    }
}

impl VisualEffects for RecordingEffects {
    fn particle_burst(&self, burst: ParticleBurst) {
        self.bursts.lock().unwrap().push(burst);
    }
}

/// Tracing layer that keeps every span and event field as `name=value`, so
/// tests can check what ends up in the logs.
#[derive(Debug, Clone, Default)]
pub struct FieldRecorder {
    fields: Arc<Mutex<Vec<String>>>,
}

impl FieldRecorder {
    pub fn fields(&self) -> Vec<String> {
        self.fields.lock().unwrap().clone()
    }
}

struct FieldVisitor<'a>(&'a mut Vec<String>);

impl Visit for FieldVisitor<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.push(format!("{}={:?}", field.name(), value));
    }
}

impl<S: tracing::Subscriber> Layer<S> for FieldRecorder {
    fn on_new_span(&self, attrs: &span::Attributes<'_>, _id: &span::Id, _ctx: Context<'_, S>) {
        attrs.record(&mut FieldVisitor(&mut self.fields.lock().unwrap()));
    }

    fn on_record(&self, _id: &span::Id, values: &span::Record<'_>, _ctx: Context<'_, S>) {
        values.record(&mut FieldVisitor(&mut self.fields.lock().unwrap()));
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        event.record(&mut FieldVisitor(&mut self.fields.lock().unwrap()));
    }
}

const VIEW_POLL_ATTEMPTS: usize = 200;
const VIEW_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Completions land on the page asynchronously, so tests poll the view until
/// it settles.
macro_rules! impl_view_when {
    ($client:ty, $view:ty) => {
        impl $client {
            pub async fn view_when(&self, ready: impl Fn(&$view) -> bool) -> $view {
                for _ in 0..VIEW_POLL_ATTEMPTS {
                    let view = self.view().await.expect("Page service gone");
                    if ready(&view) {
                        return view;
                    }
                    tokio::time::sleep(VIEW_POLL_INTERVAL).await;
                }
                panic!("View never reached the expected state");
            }
        }
    };
}

impl_view_when!(ContactClient, ContactView);
impl_view_when!(CheckoutClient, CheckoutView);

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_api() {
        let (client, mut receiver) = create_mock_api(10);

        let fetch = tokio::spawn(async move { client.get_cart(SessionToken::new("t1")).await });

        let (token, responder) = expect_get_cart(&mut receiver).await.expect("Expected GetCart");
        assert_eq!(token, SessionToken::new("t1"));
        responder.send(Ok(vec![CartItem::new("p1", "Idli", 40.0, 2)])).unwrap();

        let items = fetch.await.unwrap().unwrap();
        assert_eq!(items.len(), 1);
    }
}
