//! The cart/order API collaborator.
//!
//! [`ApiClient`] is a thin handle over an [`ApiRequest`] channel. Whatever task
//! drains that channel is the backend: [`backend::DemoBackend`] in the demo
//! binary, or a test holding the raw receiver.

pub mod backend;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

use crate::domain::{CartItem, ContactFormState, OrderConfirmation, OrderPayload, SessionToken};
use crate::error::ApiError;

pub type ServiceResult<T> = std::result::Result<T, ApiError>;
pub type ServiceResponse<T> = oneshot::Sender<ServiceResult<T>>;

/// Typed backend requests. Each variant carries a oneshot channel for the reply.
#[derive(Debug)]
pub enum ApiRequest {
    GetCart {
        token: SessionToken,
        respond_to: ServiceResponse<Vec<CartItem>>,
    },
    PlaceOrder {
        token: SessionToken,
        payload: OrderPayload,
        respond_to: ServiceResponse<OrderConfirmation>,
    },
    SendContactMessage {
        message: ContactFormState,
        respond_to: ServiceResponse<()>,
    },
    Shutdown,
    #[cfg(test)]
    ListOrders {
        token: SessionToken,
        respond_to: ServiceResponse<Vec<OrderPayload>>,
    },
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    sender: mpsc::Sender<ApiRequest>,
}

impl ApiClient {
    pub fn new(sender: mpsc::Sender<ApiRequest>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(ServiceResponse<T>) -> ApiRequest,
    ) -> ServiceResult<T> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| ApiError::Unavailable("Backend closed".to_string()))?;

        response
            .await
            .map_err(|_| ApiError::Unavailable("Backend dropped the request".to_string()))?
    }

    #[instrument(skip(self))]
    pub async fn get_cart(&self, token: SessionToken) -> ServiceResult<Vec<CartItem>> {
        debug!("Sending request");
        self.request(|respond_to| ApiRequest::GetCart { token, respond_to })
            .await
    }

    #[instrument(
        fields(items = payload.items.len(), total = payload.total_price),
        skip(self, payload)
    )]
    pub async fn place_order(
        &self,
        token: SessionToken,
        payload: OrderPayload,
    ) -> ServiceResult<OrderConfirmation> {
        debug!("Sending request");
        self.request(|respond_to| ApiRequest::PlaceOrder {
            token,
            payload,
            respond_to,
        })
        .await
    }

    /// Message bodies can hold personal details, so only the sender's email is traced.
    #[instrument(fields(email = %message.email), skip(self, message))]
    pub async fn send_contact_message(&self, message: ContactFormState) -> ServiceResult<()> {
        debug!("Sending request");
        self.request(|respond_to| ApiRequest::SendContactMessage {
            message,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> ServiceResult<()> {
        debug!("Sending shutdown request");
        self.sender
            .send(ApiRequest::Shutdown)
            .await
            .map_err(|_| ApiError::Unavailable("Backend closed".to_string()))
    }

    // Test-only message for inspecting what the backend accepted
    #[cfg(test)]
    pub async fn list_orders(&self, token: SessionToken) -> ServiceResult<Vec<OrderPayload>> {
        self.request(|respond_to| ApiRequest::ListOrders { token, respond_to })
            .await
    }
}
