use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

use super::{ApiClient, ApiRequest, ServiceResponse};
use crate::domain::{cart_total, CartItem, ContactFormState, OrderConfirmation, OrderPayload, SessionToken};
use crate::error::ApiError;

/// Largest difference between the submitted total and the recomputed one
/// that still counts as equal.
const TOTAL_TOLERANCE: f64 = 0.005;

/// In-memory stand-in for the cart/order backend.
///
/// Carts are keyed by session token; a token with no registered cart is
/// treated as signed out. Contact messages are accepted after a fixed delay.
pub struct DemoBackend {
    receiver: mpsc::Receiver<ApiRequest>,
    carts: HashMap<SessionToken, Vec<CartItem>>,
    orders: HashMap<SessionToken, Vec<OrderPayload>>,
    next_order_id: u64,
    contact_delay: Duration,
}

impl DemoBackend {
    pub fn new(buffer_size: usize, contact_delay: Duration) -> (Self, ApiClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let backend = Self {
            receiver,
            carts: HashMap::new(),
            orders: HashMap::new(),
            next_order_id: 1,
            contact_delay,
        };
        (backend, ApiClient::new(sender))
    }

    /// Registers a session and the cart it owns.
    pub fn with_cart(mut self, token: SessionToken, items: Vec<CartItem>) -> Self {
        self.carts.insert(token, items);
        self
    }

    #[instrument(name = "demo_backend", skip(self))]
    pub async fn run(mut self) {
        info!("DemoBackend starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ApiRequest::GetCart { token, respond_to } => {
                    self.handle_get_cart(token, respond_to);
                }
                ApiRequest::PlaceOrder {
                    token,
                    payload,
                    respond_to,
                } => {
                    self.handle_place_order(token, payload, respond_to);
                }
                ApiRequest::SendContactMessage {
                    message,
                    respond_to,
                } => {
                    self.handle_send_contact_message(message, respond_to);
                }
                ApiRequest::Shutdown => {
                    info!("DemoBackend shutting down");
                    break;
                }
                #[cfg(test)]
                ApiRequest::ListOrders { token, respond_to } => {
                    let orders = self.orders.get(&token).cloned().unwrap_or_default();
                    let _ = respond_to.send(Ok(orders));
                }
            }
        }

        info!("DemoBackend stopped");
    }

    #[instrument(skip(self, token, respond_to))]
    fn handle_get_cart(&self, token: SessionToken, respond_to: ServiceResponse<Vec<CartItem>>) {
        debug!("Processing get_cart request");

        let result = match self.carts.get(&token) {
            Some(items) => {
                info!(item_count = items.len(), "Cart found");
                Ok(items.clone())
            }
            None => {
                warn!("Unknown session token");
                Err(ApiError::Unauthorized)
            }
        };

        let _ = respond_to.send(result);
    }

    #[instrument(
        fields(items = payload.items.len(), total = payload.total_price),
        skip(self, token, payload, respond_to)
    )]
    fn handle_place_order(
        &mut self,
        token: SessionToken,
        payload: OrderPayload,
        respond_to: ServiceResponse<OrderConfirmation>,
    ) {
        debug!("Processing place_order request");

        let result = self.accept_order(token, payload);
        match &result {
            Ok(confirmation) => info!(order_id = %confirmation.order_id, "Order placed"),
            Err(e) => error!(error = %e, "Order rejected"),
        }

        let _ = respond_to.send(result);
    }

    fn accept_order(
        &mut self,
        token: SessionToken,
        payload: OrderPayload,
    ) -> Result<OrderConfirmation, ApiError> {
        let cart = self.carts.get_mut(&token).ok_or(ApiError::Unauthorized)?;

        if payload.items.is_empty() {
            return Err(ApiError::Rejected("Order has no items".to_string()));
        }
        let expected = cart_total(&payload.items);
        if (expected - payload.total_price).abs() > TOTAL_TOLERANCE {
            return Err(ApiError::Rejected(format!(
                "Total {} does not match items {}",
                payload.total_price, expected
            )));
        }

        // Placing an order empties the server-side cart.
        cart.clear();

        let order_id = format!("order_{}", self.next_order_id);
        self.next_order_id += 1;
        self.orders.entry(token).or_default().push(payload);

        Ok(OrderConfirmation { order_id })
    }

    /// **Background Handler** - the spawned task owns the response channel and
    /// replies once the simulated delivery delay has passed.
    #[instrument(fields(email = %message.email), skip(self, message, respond_to))]
    fn handle_send_contact_message(
        &self,
        message: ContactFormState,
        respond_to: ServiceResponse<()>,
    ) {
        debug!("Processing send_contact_message request");

        let delay = self.contact_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            info!(
                email = %message.email,
                length = message.message.len(),
                "Contact message delivered"
            );
            let _ = respond_to.send(Ok(()));
        });
    }
}
