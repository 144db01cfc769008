use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn, Instrument};

use super::Response;
use crate::api::{ApiClient, ServiceResult};
use crate::domain::{ContactField, ContactFormState};
use crate::effects::{ParticleBurst, VisualEffects};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactSubmitOutcome {
    Started,
    /// The submit control is disabled while a message is being sent.
    Busy,
}

/// Everything the contact page needs to draw itself.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactView {
    pub form: ContactFormState,
    pub active_field: Option<ContactField>,
    pub submitting: bool,
    pub status: Option<SubmitStatus>,
    pub overlay_visible: bool,
    pub submit_enabled: bool,
    pub submit_label: &'static str,
}

#[derive(Debug)]
pub enum ContactRequest {
    Change {
        field: ContactField,
        value: String,
        respond_to: Response<()>,
    },
    Focus {
        field: ContactField,
        respond_to: Response<()>,
    },
    Blur {
        respond_to: Response<()>,
    },
    Submit {
        respond_to: Response<ContactSubmitOutcome>,
    },
    DismissOverlay {
        respond_to: Response<()>,
    },
    View {
        respond_to: Response<ContactView>,
    },
    Shutdown,
}

/// The contact form page.
///
/// Holds the three inputs, a submitting flag and the last result. A
/// successful send clears the form and, when an effects collaborator was
/// injected, fires one particle burst.
pub struct ContactService {
    receiver: mpsc::Receiver<ContactRequest>,
    completions: mpsc::UnboundedReceiver<ServiceResult<()>>,
    completion_sender: mpsc::UnboundedSender<ServiceResult<()>>,
    api: ApiClient,
    effects: Option<Arc<dyn VisualEffects>>,
    form: ContactFormState,
    active_field: Option<ContactField>,
    submitting: bool,
    status: Option<SubmitStatus>,
}

impl ContactService {
    pub fn new(
        buffer_size: usize,
        api: ApiClient,
        effects: Option<Arc<dyn VisualEffects>>,
    ) -> (Self, ContactClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (completion_sender, completions) = mpsc::unbounded_channel();
        let service = Self {
            receiver,
            completions,
            completion_sender,
            api,
            effects,
            form: ContactFormState::default(),
            active_field: None,
            submitting: false,
            status: None,
        };
        (service, ContactClient::new(sender))
    }

    #[instrument(name = "contact_page", skip(self))]
    pub async fn run(mut self) {
        info!("ContactService starting");

        loop {
            tokio::select! {
                msg = self.receiver.recv() => {
                    let Some(msg) = msg else { break };
                    match msg {
                        ContactRequest::Change { field, value, respond_to } => {
                            self.handle_change(field, value);
                            let _ = respond_to.send(());
                        }
                        ContactRequest::Focus { field, respond_to } => {
                            self.active_field = Some(field);
                            let _ = respond_to.send(());
                        }
                        ContactRequest::Blur { respond_to } => {
                            self.active_field = None;
                            let _ = respond_to.send(());
                        }
                        ContactRequest::Submit { respond_to } => {
                            let _ = respond_to.send(self.handle_submit());
                        }
                        ContactRequest::DismissOverlay { respond_to } => {
                            self.handle_dismiss_overlay();
                            let _ = respond_to.send(());
                        }
                        ContactRequest::View { respond_to } => {
                            let _ = respond_to.send(self.view());
                        }
                        ContactRequest::Shutdown => {
                            info!("ContactService shutting down");
                            break;
                        }
                    }
                }
                Some(result) = self.completions.recv() => {
                    self.handle_sent(result);
                }
            }
        }

        info!("ContactService stopped");
    }

    #[instrument(skip(self, value))]
    fn handle_change(&mut self, field: ContactField, value: String) {
        debug!(length = value.len(), "Field changed");
        self.form.set(field, value);
    }

    #[instrument(skip(self))]
    fn handle_submit(&mut self) -> ContactSubmitOutcome {
        if self.submitting {
            warn!("Submit ignored, message already sending");
            return ContactSubmitOutcome::Busy;
        }

        info!("Sending contact message");
        self.submitting = true;

        let api = self.api.clone();
        let done = self.completion_sender.clone();
        let message = self.form.clone();
        tokio::spawn(
            async move {
                let result = api.send_contact_message(message).await;
                let _ = done.send(result);
            }
            .in_current_span(),
        );

        ContactSubmitOutcome::Started
    }

    #[instrument(skip(self, result))]
    fn handle_sent(&mut self, result: ServiceResult<()>) {
        self.submitting = false;

        match result {
            Ok(()) => {
                info!("Contact message sent");
                self.status = Some(SubmitStatus::Success);
                self.form = ContactFormState::default();
                if let Some(effects) = &self.effects {
                    effects.particle_burst(ParticleBurst::default());
                }
            }
            Err(e) => {
                error!(error = %e, "Contact message failed");
                self.status = Some(SubmitStatus::Error);
            }
        }
    }

    fn handle_dismiss_overlay(&mut self) {
        if self.status == Some(SubmitStatus::Success) {
            debug!("Success overlay dismissed");
            self.status = None;
        }
    }

    fn view(&self) -> ContactView {
        ContactView {
            form: self.form.clone(),
            active_field: self.active_field,
            submitting: self.submitting,
            status: self.status,
            overlay_visible: self.status == Some(SubmitStatus::Success),
            submit_enabled: !self.submitting,
            submit_label: if self.submitting { "Sending..." } else { "Send Message" },
        }
    }
}

#[derive(Clone)]
pub struct ContactClient {
    sender: mpsc::Sender<ContactRequest>,
}

impl ContactClient {
    pub fn new(sender: mpsc::Sender<ContactRequest>) -> Self {
        Self { sender }
    }
}

page_method!(ContactClient => fn change(field: ContactField, value: String) -> () as ContactRequest::Change);
page_method!(ContactClient => fn focus(field: ContactField) -> () as ContactRequest::Focus);
page_method!(ContactClient => fn blur() -> () as ContactRequest::Blur);
page_method!(ContactClient => fn submit() -> ContactSubmitOutcome as ContactRequest::Submit);
page_method!(ContactClient => fn dismiss_overlay() -> () as ContactRequest::DismissOverlay);
page_method!(ContactClient => fn view() -> ContactView as ContactRequest::View);
page_shutdown!(ContactClient, ContactRequest);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::mock_framework::{create_mock_api, expect_send_message, FieldRecorder, RecordingEffects};
    use tracing_subscriber::layer::SubscriberExt;

    async fn fill(client: &ContactClient) {
        client.change(ContactField::Name, "Asha".into()).await.unwrap();
        client.change(ContactField::Email, "asha@example.com".into()).await.unwrap();
        client.change(ContactField::Message, "Loved the biryani".into()).await.unwrap();
    }

    #[tokio::test]
    async fn typed_values_stay_out_of_traces() {
        let recorder = FieldRecorder::default();
        let _guard = tracing::subscriber::set_default(
            tracing_subscriber::registry().with(recorder.clone()),
        );

        let (api, _api_rx) = create_mock_api(8);
        let (service, client) = ContactService::new(8, api, None);
        let _handle = tokio::spawn(service.run());

        fill(&client).await;
        assert_eq!(client.view().await.unwrap().form.email, "asha@example.com");

        let fields = recorder.fields();
        assert!(fields.iter().any(|f| f == "field=Email"));
        assert!(fields
            .iter()
            .all(|f| !f.contains("asha@example.com") && !f.contains("biryani")));
    }

    #[tokio::test]
    async fn successful_send_clears_form_and_bursts() {
        let (api, mut api_rx) = create_mock_api(8);
        let effects = Arc::new(RecordingEffects::default());
        let (service, client) = ContactService::new(8, api, Some(effects.clone()));
        let _handle = tokio::spawn(service.run());

        fill(&client).await;
        assert_eq!(client.submit().await.unwrap(), ContactSubmitOutcome::Started);

        let (message, responder) = expect_send_message(&mut api_rx).await.expect("Expected send");
        assert_eq!(message.email, "asha@example.com");

        let view = client.view().await.unwrap();
        assert!(view.submitting);
        assert!(!view.submit_enabled);
        assert_eq!(view.submit_label, "Sending...");

        responder.send(Ok(())).unwrap();
        let view = client.view_when(|v| !v.submitting).await;
        assert_eq!(view.status, Some(SubmitStatus::Success));
        assert!(view.overlay_visible);
        assert!(view.form.is_empty());
        assert_eq!(effects.bursts(), vec![ParticleBurst::default()]);
    }

    #[tokio::test]
    async fn failed_send_keeps_input_and_flags_error() {
        let (api, mut api_rx) = create_mock_api(8);
        let effects = Arc::new(RecordingEffects::default());
        let (service, client) = ContactService::new(8, api, Some(effects.clone()));
        let _handle = tokio::spawn(service.run());

        fill(&client).await;
        client.submit().await.unwrap();
        let (_, responder) = expect_send_message(&mut api_rx).await.expect("Expected send");
        responder.send(Err(ApiError::Server("boom".into()))).unwrap();

        let view = client.view_when(|v| !v.submitting).await;
        assert_eq!(view.status, Some(SubmitStatus::Error));
        assert!(!view.overlay_visible);
        assert_eq!(view.form.name, "Asha");
        assert!(effects.bursts().is_empty());
    }

    #[tokio::test]
    async fn second_submit_while_sending_is_refused() {
        let (api, mut api_rx) = create_mock_api(8);
        let (service, client) = ContactService::new(8, api, None);
        let _handle = tokio::spawn(service.run());

        fill(&client).await;
        client.submit().await.unwrap();
        let (_, responder) = expect_send_message(&mut api_rx).await.expect("Expected send");

        assert_eq!(client.submit().await.unwrap(), ContactSubmitOutcome::Busy);
        assert!(api_rx.try_recv().is_err());

        // No effects collaborator: success still lands without a burst.
        responder.send(Ok(())).unwrap();
        let view = client.view_when(|v| !v.submitting).await;
        assert_eq!(view.status, Some(SubmitStatus::Success));
    }

    #[tokio::test]
    async fn overlay_can_be_dismissed() {
        let (api, mut api_rx) = create_mock_api(8);
        let (service, client) = ContactService::new(8, api, None);
        let _handle = tokio::spawn(service.run());

        client.submit().await.unwrap();
        let (_, responder) = expect_send_message(&mut api_rx).await.expect("Expected send");
        responder.send(Ok(())).unwrap();
        client.view_when(|v| v.overlay_visible).await;

        client.dismiss_overlay().await.unwrap();
        let view = client.view().await.unwrap();
        assert!(!view.overlay_visible);
        assert_eq!(view.status, None);
    }

    #[tokio::test]
    async fn focus_tracks_active_field() {
        let (api, _api_rx) = create_mock_api(8);
        let (service, client) = ContactService::new(8, api, None);
        let _handle = tokio::spawn(service.run());

        client.focus(ContactField::Message).await.unwrap();
        assert_eq!(client.view().await.unwrap().active_field, Some(ContactField::Message));

        client.blur().await.unwrap();
        assert_eq!(client.view().await.unwrap().active_field, None);

        client.shutdown().await.unwrap();
    }
}
