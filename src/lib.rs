//! # Foodell Pages
//!
//! Headless contact and checkout pages for the Foodell food-delivery client.
//!
//! Each page runs as a small service task that owns its view state and handles
//! UI events one at a time. Callers drive a page through its cloneable client
//! handle and read back a view snapshot to render.
//!
//! - **Domain types** - form state, cart items and the order payload → [`domain`]
//! - **API collaborator** - channel handle to the cart/order backend → [`api::ApiClient`]
//! - **Pages** - [`pages::contact`] and [`pages::checkout`]
//! - **Shell** - alerts and navigation emitted by the pages → [`shell::Shell`]
//! - **Effects** - optional celebratory visuals → [`effects::VisualEffects`]
//! - **System** - startup, configuration, tracing and shutdown → [`app_system`]
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! let user = CurrentUser::new("user_1", "Asha", "token-1");
//! let (system, mut shell_rx) = PageSystem::start(
//!     &Config::load()?,
//!     vec![(user.token.clone(), cart)],
//!     Some(user),
//!     Some(effects),
//! );
//!
//! system.checkout_client.change(OrderField::Address, "12 Lake Road".into()).await?;
//! let outcome = system.checkout_client.submit().await?;
//! let alert = shell_rx.recv().await;
//!
//! system.shutdown().await?;
//! ```

#[macro_use]
mod macros;

pub mod api;
pub mod app_system;
pub mod domain;
pub mod effects;
pub mod error;
pub mod pages;
pub mod shell;

#[cfg(test)]
mod mock_framework;
