use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info, instrument};

use super::Config;
use crate::api::backend::DemoBackend;
use crate::api::ApiClient;
use crate::domain::{CartItem, CurrentUser, SessionToken};
use crate::effects::VisualEffects;
use crate::pages::{CheckoutClient, CheckoutService, ContactClient, ContactService};
use crate::shell::{Shell, ShellCommand};

/// Owns the running backend and pages.
///
/// **Startup Order:**
/// 1. Start the backend (no dependencies)
/// 2. Start both pages with a clone of the backend client, the shell and the
///    optional effects collaborator
///
/// **Shutdown Order:** pages first, then the backend they call.
pub struct PageSystem {
    pub api_client: ApiClient,
    pub contact_client: ContactClient,
    pub checkout_client: CheckoutClient,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl PageSystem {
    /// Starts everything and returns the system plus the receiving end of the shell.
    ///
    /// `carts` registers each known session with the cart it owns on the demo
    /// backend. `session` is the user the checkout page mounts with.
    #[instrument(name = "page_system", skip_all)]
    pub fn start(
        config: &Config,
        carts: Vec<(SessionToken, Vec<CartItem>)>,
        session: Option<CurrentUser>,
        effects: Option<Arc<dyn VisualEffects>>,
    ) -> (Self, mpsc::UnboundedReceiver<ShellCommand>) {
        let mut handles = Vec::new();

        info!(
            channel_buffer = config.channel_buffer,
            contact_delay_ms = config.contact_delay.as_millis() as u64,
            "Starting page system"
        );

        let (backend, api_client) = DemoBackend::new(config.channel_buffer, config.contact_delay);
        let backend = carts
            .into_iter()
            .fold(backend, |backend, (token, items)| backend.with_cart(token, items));
        handles.push(tokio::spawn(backend.run()));

        let (shell, shell_rx) = Shell::new();

        let (contact_service, contact_client) =
            ContactService::new(config.channel_buffer, api_client.clone(), effects);
        handles.push(tokio::spawn(contact_service.run()));

        let (checkout_service, checkout_client) =
            CheckoutService::new(config.channel_buffer, session, api_client.clone(), shell);
        handles.push(tokio::spawn(checkout_service.run()));

        info!("Page system started successfully");

        let system = Self {
            api_client,
            contact_client,
            checkout_client,
            handles,
        };
        (system, shell_rx)
    }

    /// Errors from individual services are logged and shutdown carries on, so
    /// one dead task cannot hang the rest.
    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down page system");

        let _ = self.contact_client.shutdown().await;
        let _ = self.checkout_client.shutdown().await;
        let _ = self.api_client.shutdown().await;

        let mut failed = 0;
        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Service shutdown error");
                failed += 1;
            }
        }

        if failed > 0 {
            return Err(format!("{failed} service task(s) failed during shutdown"));
        }

        info!("Page system shutdown complete");
        Ok(())
    }
}
