//! Page services and their client handles.
//!
//! A page service owns its view state and drains one mailbox of UI events in
//! order, which gives the single-threaded event loop a browser page would have.
//! Network calls run as background tasks and report back through a separate
//! completion channel, so the page keeps answering `view()` and can refuse a
//! second submit while a request is still out.

pub mod checkout;
pub mod contact;

use tokio::sync::oneshot;

pub use checkout::*;
pub use contact::*;

/// Reply channel for a single UI event.
pub type Response<T> = oneshot::Sender<T>;
