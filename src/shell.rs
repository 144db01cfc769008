//! The host environment around the pages.
//!
//! Pages never block on the user. Alerts and navigation are pushed to the
//! [`Shell`] as [`ShellCommand`]s and the host decides how to show them.

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    SignIn,
    Orders,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::SignIn => "/signin",
            Route::Orders => "/orders",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    /// A blocking message the user has to acknowledge.
    Alert(String),
    Navigate(Route),
}

#[derive(Clone, Debug)]
pub struct Shell {
    sender: mpsc::UnboundedSender<ShellCommand>,
}

impl Shell {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ShellCommand>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    pub fn alert(&self, message: impl Into<String>) {
        let message = message.into();
        debug!(%message, "Alert");
        self.push(ShellCommand::Alert(message));
    }

    pub fn navigate(&self, route: Route) {
        debug!(%route, "Navigate");
        self.push(ShellCommand::Navigate(route));
    }

    fn push(&self, command: ShellCommand) {
        if self.sender.send(command).is_err() {
            warn!("Shell is gone, command dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_arrive_in_order() {
        let (shell, mut rx) = Shell::new();
        shell.alert("Order placed successfully!");
        shell.navigate(Route::Orders);

        assert_eq!(
            rx.try_recv().unwrap(),
            ShellCommand::Alert("Order placed successfully!".into())
        );
        assert_eq!(rx.try_recv().unwrap(), ShellCommand::Navigate(Route::Orders));
        assert_eq!(Route::SignIn.to_string(), "/signin");
    }

    #[test]
    fn dropped_receiver_does_not_panic() {
        let (shell, rx) = Shell::new();
        drop(rx);
        shell.navigate(Route::SignIn);
    }
}
