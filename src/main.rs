use std::sync::Arc;

use tracing::{error, info, Instrument};

use foodell_pages::app_system::{setup_tracing, Config, PageSystem};
use foodell_pages::domain::{CartItem, ContactField, CurrentUser, OrderField};
use foodell_pages::effects::{LogEffects, VisualEffects};
use foodell_pages::pages::{CheckoutPhase, SubmitOutcome};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = Config::load().map_err(|e| e.to_string())?;
    info!("Starting Foodell pages demo");

    let user = CurrentUser::new("user_1", "Asha", "demo-token");
    let cart = vec![
        CartItem::new("p1", "Paneer Tikka", 100.0, 2).with_image("/img/paneer-tikka.png"),
        CartItem::new("p2", "Garlic Naan", 50.0, 1),
    ];
    let effects: Arc<dyn VisualEffects> = Arc::new(LogEffects);

    let (system, mut shell_rx) = PageSystem::start(
        &config,
        vec![(user.token.clone(), cart)],
        Some(user),
        Some(effects),
    );

    // Contact page: fill in and send, then wait for the result overlay
    let span = tracing::info_span!("contact_demo");
    async {
        let contact = &system.contact_client;
        contact.change(ContactField::Name, "Asha".into()).await?;
        contact.change(ContactField::Email, "asha@example.com".into()).await?;
        contact.change(ContactField::Message, "Loved the biryani!".into()).await?;
        contact.submit().await?;

        loop {
            let view = contact.view().await?;
            if !view.submitting {
                info!(status = ?view.status, overlay = view.overlay_visible, "Contact form settled");
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }
        contact.dismiss_overlay().await
    }
    .instrument(span)
    .await
    .map_err(|e| e.to_string())?;

    // Checkout page: wait for the cart, fill delivery details, place the order
    let span = tracing::info_span!("checkout_demo");
    async {
        let checkout = &system.checkout_client;
        let view = loop {
            let view = checkout.view().await?;
            if view.phase != CheckoutPhase::LoadingCart {
                break view;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        };
        info!(items = view.items.len(), total = view.total, "Cart ready");

        checkout.change(OrderField::Name, "Asha".into()).await?;
        checkout.change(OrderField::Address, "12 Lake Road, Kolkata".into()).await?;
        checkout.change(OrderField::Phone, "9800000000".into()).await?;
        checkout.change(OrderField::PaymentMethod, "Online Payment".into()).await?;

        match checkout.submit().await? {
            SubmitOutcome::Started(payload) => {
                info!(total = payload.total_price, "Order submitted")
            }
            SubmitOutcome::Blocked(reason) => error!(?reason, "Order not submitted"),
        }
        Ok::<_, foodell_pages::error::PageError>(())
    }
    .instrument(span)
    .await
    .map_err(|e| e.to_string())?;

    // The shell receives the placement alert followed by navigation
    while let Ok(Some(command)) =
        tokio::time::timeout(std::time::Duration::from_secs(1), shell_rx.recv()).await
    {
        info!(?command, "Shell command");
    }

    system.shutdown().await?;

    info!("Demo completed successfully");
    Ok(())
}
