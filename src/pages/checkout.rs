use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn, Instrument};

use super::Response;
use crate::api::{ApiClient, ServiceResult};
use crate::domain::{
    cart_total, CartItem, CurrentUser, OrderConfirmation, OrderField, OrderFormState, OrderPayload,
};
use crate::shell::{Route, Shell};

pub const MISSING_FIELDS_ALERT: &str = "Please fill all the required fields";
pub const ORDER_PLACED_ALERT: &str = "Order placed successfully!";
pub const ORDER_FAILED_ALERT: &str = "Something went wrong while placing the order.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutPhase {
    /// No session: the page shows a sign-in prompt and fetches nothing.
    Unauthenticated,
    LoadingCart,
    CartEmpty,
    CartReady,
    Submitting,
    /// The order went through and the page has navigated away.
    Submitted,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitBlock {
    SignedOut,
    /// A cart fetch or an order placement is still in flight.
    Busy,
    EmptyCart,
    AlreadySubmitted,
    MissingFields(Vec<OrderField>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Placement was requested with this payload.
    Started(OrderPayload),
    Blocked(SubmitBlock),
}

/// Everything the checkout page needs to draw itself.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutView {
    pub phase: CheckoutPhase,
    pub items: Vec<CartItem>,
    pub total: f64,
    pub form: OrderFormState,
    pub show_cart_spinner: bool,
    pub submit_enabled: bool,
    pub submit_label: &'static str,
}

#[derive(Debug)]
pub enum CheckoutRequest {
    Change {
        field: OrderField,
        value: String,
        respond_to: Response<()>,
    },
    Submit {
        respond_to: Response<SubmitOutcome>,
    },
    SignIn {
        respond_to: Response<()>,
    },
    SetSession {
        user: Option<CurrentUser>,
        respond_to: Response<()>,
    },
    View {
        respond_to: Response<CheckoutView>,
    },
    Shutdown,
}

/// Results of background requests. Cart results carry the session generation
/// that started them; an order outlives a session change.
#[derive(Debug)]
enum Completion {
    CartLoaded {
        generation: u64,
        result: ServiceResult<Vec<CartItem>>,
    },
    OrderPlaced {
        result: ServiceResult<OrderConfirmation>,
    },
}

/// The order checkout page.
///
/// Loads the signed-in user's cart once on mount, collects delivery details
/// and submits one order. Alerts and navigation go out through the [`Shell`].
pub struct CheckoutService {
    receiver: mpsc::Receiver<CheckoutRequest>,
    completions: mpsc::UnboundedReceiver<Completion>,
    completion_sender: mpsc::UnboundedSender<Completion>,
    api: ApiClient,
    shell: Shell,
    session: Option<CurrentUser>,
    generation: u64,
    items: Vec<CartItem>,
    total: f64,
    form: OrderFormState,
    loading_cart: bool,
    placing_order: bool,
    submitted: bool,
}

impl CheckoutService {
    pub fn new(
        buffer_size: usize,
        session: Option<CurrentUser>,
        api: ApiClient,
        shell: Shell,
    ) -> (Self, CheckoutClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (completion_sender, completions) = mpsc::unbounded_channel();
        let service = Self {
            receiver,
            completions,
            completion_sender,
            api,
            shell,
            session,
            generation: 0,
            items: Vec::new(),
            total: 0.0,
            form: OrderFormState::default(),
            loading_cart: false,
            placing_order: false,
            submitted: false,
        };
        (service, CheckoutClient::new(sender))
    }

    /// Main page loop
    ///
    /// Mounting happens before the first event is read, so the cart fetch is
    /// already in flight by the time a caller sees the first view.
    #[instrument(name = "checkout_page", skip(self))]
    pub async fn run(mut self) {
        info!("CheckoutService starting");
        self.load_cart();

        loop {
            tokio::select! {
                msg = self.receiver.recv() => {
                    let Some(msg) = msg else { break };
                    match msg {
                        CheckoutRequest::Change { field, value, respond_to } => {
                            self.handle_change(field, value);
                            let _ = respond_to.send(());
                        }
                        CheckoutRequest::Submit { respond_to } => {
                            let _ = respond_to.send(self.handle_submit());
                        }
                        CheckoutRequest::SignIn { respond_to } => {
                            self.shell.navigate(Route::SignIn);
                            let _ = respond_to.send(());
                        }
                        CheckoutRequest::SetSession { user, respond_to } => {
                            self.handle_set_session(user);
                            let _ = respond_to.send(());
                        }
                        CheckoutRequest::View { respond_to } => {
                            let _ = respond_to.send(self.view());
                        }
                        CheckoutRequest::Shutdown => {
                            info!("CheckoutService shutting down");
                            break;
                        }
                    }
                }
                Some(completion) = self.completions.recv() => {
                    match completion {
                        Completion::CartLoaded { generation, result } => {
                            self.handle_cart_loaded(generation, result);
                        }
                        Completion::OrderPlaced { result } => {
                            self.handle_order_placed(result);
                        }
                    }
                }
            }
        }

        info!("CheckoutService stopped");
    }

    fn load_cart(&mut self) {
        let Some(user) = &self.session else {
            info!("No session, showing sign-in prompt");
            return;
        };

        info!(user_id = %user.id, "Fetching cart");
        self.loading_cart = true;

        let api = self.api.clone();
        let done = self.completion_sender.clone();
        let token = user.token.clone();
        let generation = self.generation;
        tokio::spawn(
            async move {
                let result = api.get_cart(token).await;
                let _ = done.send(Completion::CartLoaded { generation, result });
            }
            .in_current_span(),
        );
    }

    #[instrument(skip(self, result))]
    fn handle_cart_loaded(&mut self, generation: u64, result: ServiceResult<Vec<CartItem>>) {
        if generation != self.generation {
            warn!(current = self.generation, "Discarding cart from a previous session");
            return;
        }
        self.loading_cart = false;

        match result {
            Ok(items) => {
                self.items = items;
                self.total = cart_total(&self.items);
                info!(item_count = self.items.len(), total = self.total, "Cart loaded");
            }
            Err(e) => {
                // The page stays usable with an empty cart.
                error!(error = %e, "Error fetching cart");
            }
        }
    }

    #[instrument(skip(self, value))]
    fn handle_change(&mut self, field: OrderField, value: String) {
        if let Err(e) = self.form.set(field, value) {
            warn!(error = %e, "Ignoring invalid input");
        }
    }

    #[instrument(skip(self))]
    fn handle_submit(&mut self) -> SubmitOutcome {
        let token = match &self.session {
            Some(user) => user.token.clone(),
            None => return SubmitOutcome::Blocked(SubmitBlock::SignedOut),
        };
        if self.submitted {
            return SubmitOutcome::Blocked(SubmitBlock::AlreadySubmitted);
        }
        if self.loading_cart || self.placing_order {
            debug!("Submit control disabled, request in flight");
            return SubmitOutcome::Blocked(SubmitBlock::Busy);
        }
        if self.items.is_empty() {
            debug!("Submit control disabled, cart is empty");
            return SubmitOutcome::Blocked(SubmitBlock::EmptyCart);
        }

        let missing = self.form.missing_fields();
        if !missing.is_empty() {
            warn!(?missing, "Required fields missing");
            self.shell.alert(MISSING_FIELDS_ALERT);
            return SubmitOutcome::Blocked(SubmitBlock::MissingFields(missing));
        }

        let payload = OrderPayload::assemble(&self.items, &self.form, self.total);
        info!(
            items = payload.items.len(),
            total = payload.total_price,
            payment_method = %payload.payment_method,
            "Placing order"
        );
        self.placing_order = true;

        let api = self.api.clone();
        let done = self.completion_sender.clone();
        let request = payload.clone();
        tokio::spawn(
            async move {
                let result = api.place_order(token, request).await;
                let _ = done.send(Completion::OrderPlaced { result });
            }
            .in_current_span(),
        );

        SubmitOutcome::Started(payload)
    }

    /// An accepted order is always announced, even if the session changed
    /// while it was in flight.
    #[instrument(skip(self, result))]
    fn handle_order_placed(&mut self, result: ServiceResult<OrderConfirmation>) {
        self.placing_order = false;

        match result {
            Ok(confirmation) => {
                info!(order_id = %confirmation.order_id, "Order placed");
                self.submitted = true;
                self.shell.alert(ORDER_PLACED_ALERT);
                self.shell.navigate(Route::Orders);
            }
            Err(e) => {
                error!(error = %e, "Order failed");
                self.shell.alert(ORDER_FAILED_ALERT);
            }
        }
    }

    #[instrument(skip(self, user))]
    fn handle_set_session(&mut self, user: Option<CurrentUser>) {
        if self.session == user {
            debug!("Session unchanged");
            return;
        }

        match &user {
            Some(user) => info!(user_id = %user.id, "Session changed, resetting cart"),
            None => info!("Signed out, resetting cart"),
        }
        self.generation += 1;
        self.session = user;
        self.items.clear();
        self.total = 0.0;
        self.loading_cart = false;
        // A pending placement keeps the submit control disabled.
        self.submitted = false;
        self.load_cart();
    }

    fn phase(&self) -> CheckoutPhase {
        if self.session.is_none() {
            return CheckoutPhase::Unauthenticated;
        }
        if self.submitted {
            return CheckoutPhase::Submitted;
        }
        if self.placing_order {
            return CheckoutPhase::Submitting;
        }
        if self.loading_cart {
            return CheckoutPhase::LoadingCart;
        }
        if self.items.is_empty() {
            CheckoutPhase::CartEmpty
        } else {
            CheckoutPhase::CartReady
        }
    }

    fn view(&self) -> CheckoutView {
        let loading = self.loading_cart || self.placing_order;
        CheckoutView {
            phase: self.phase(),
            items: self.items.clone(),
            total: self.total,
            form: self.form.clone(),
            show_cart_spinner: loading && self.items.is_empty(),
            submit_enabled: self.session.is_some()
                && !self.submitted
                && !loading
                && !self.items.is_empty(),
            submit_label: if loading { "Processing..." } else { "Place Order" },
        }
    }
}

#[derive(Clone)]
pub struct CheckoutClient {
    sender: mpsc::Sender<CheckoutRequest>,
}

impl CheckoutClient {
    pub fn new(sender: mpsc::Sender<CheckoutRequest>) -> Self {
        Self { sender }
    }
}

page_method!(CheckoutClient => fn change(field: OrderField, value: String) -> () as CheckoutRequest::Change);
page_method!(CheckoutClient => fn submit() -> SubmitOutcome as CheckoutRequest::Submit);
page_method!(CheckoutClient => fn sign_in() -> () as CheckoutRequest::SignIn);
page_method!(CheckoutClient => fn set_session(user: Option<CurrentUser>) -> () as CheckoutRequest::SetSession);
page_method!(CheckoutClient => fn view() -> CheckoutView as CheckoutRequest::View);
page_shutdown!(CheckoutClient, CheckoutRequest);
