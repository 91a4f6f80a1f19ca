//! Contact form controller: owns the draft submission, drives debounced live
//! validation and performs at most one submission at a time. The rule set and
//! the submit handler are passed in explicitly, so the controller can be
//! exercised without a UI or a running server.

use std::{collections::BTreeMap, future::Future, sync::Arc, time::Duration};

use portfolio_validation::{validate_form, RuleSet, ValidationReport};
use serde::Serialize;
use thiserror::Error;
use tokio::{sync::Mutex, task::JoinHandle};

pub mod http;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Lifecycle of one form instance. `Submitting` locks out edits and further
/// submissions; `Success` and `Error` are per-attempt outcomes that return to
/// `Editing` on the next edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    Editing,
    Submitting,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Subject,
    Message,
}

impl FormField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Subject => "subject",
            Self::Message => "message",
        }
    }
}

/// The draft as typed by the user. Serializes to the submission endpoint's
/// request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactFormValues {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactFormValues {
    fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::Name => self.name = value,
            FormField::Email => self.email = value,
            FormField::Subject => self.subject = value,
            FormField::Message => self.message = value,
        }
    }

    fn entries(&self) -> [(&'static str, &str); 4] {
        [
            ("name", self.name.as_str()),
            ("email", self.email.as_str()),
            ("subject", self.subject.as_str()),
            ("message", self.message.as_str()),
        ]
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait SubmitHandler: Send + Sync + 'static {
    fn submit(
        &self,
        values: ContactFormValues,
    ) -> impl Future<Output = Result<SubmissionAccepted, SubmitError>> + Send;
}

/// Successful server response to a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionAccepted {
    pub message: String,
    pub message_id: Option<String>,
    pub simulated: bool,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    /// The server re-validated the payload and rejected it.
    #[error("The server rejected the submission.")]
    Rejected(Vec<portfolio_validation::FieldError>),
    /// The server accepted the payload but could not deliver the message.
    #[error("The server could not deliver the message.")]
    Delivery(String),
    /// The request never completed (offline, DNS failure, timeout).
    #[error("Failed to reach the server.")]
    Transport(#[source] anyhow::Error),
}

#[derive(Debug)]
pub enum SubmitOutcome {
    /// The submission was accepted and the draft has been cleared.
    Accepted(SubmissionAccepted),
    /// Local validation failed; no request was made.
    Invalid(ValidationReport),
    /// A submission is already in flight; no second request was made.
    InFlight,
    /// The request failed; the draft is retained.
    Failed(SubmitError),
}

pub struct FormController<S> {
    inner: Arc<Mutex<FormInner>>,
    rules: &'static RuleSet,
    handler: Arc<S>,
    debounce: Duration,
}

#[derive(Debug)]
struct FormInner {
    values: ContactFormValues,
    errors: BTreeMap<String, String>,
    phase: FormPhase,
    pending_validation: Option<JoinHandle<()>>,
}

impl Default for FormInner {
    fn default() -> Self {
        Self {
            values: ContactFormValues::default(),
            errors: BTreeMap::new(),
            phase: FormPhase::Idle,
            pending_validation: None,
        }
    }
}

impl FormInner {
    fn cancel_pending_validation(&mut self) {
        if let Some(task) = self.pending_validation.take() {
            task.abort();
        }
    }
}

impl<S> FormController<S>
where
    S: SubmitHandler,
{
    pub fn new(rules: &'static RuleSet, handler: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(FormInner::default())),
            rules,
            handler: Arc::new(handler),
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    pub fn with_debounce(mut self, window: Duration) -> Self {
        self.debounce = window;
        self
    }

    /// Updates a field and schedules a debounced re-validation of the whole
    /// draft. Each edit cancels the previously scheduled validation, so the
    /// rules only run once the user pauses typing. Edits are ignored while a
    /// submission is in flight.
    pub async fn set_field(&self, field: FormField, value: impl Into<String>) {
        let mut inner = self.inner.lock().await;
        if inner.phase == FormPhase::Submitting {
            return;
        }

        inner.values.set(field, value.into());
        inner.phase = FormPhase::Editing;
        inner.cancel_pending_validation();

        let state = Arc::clone(&self.inner);
        let rules = self.rules;
        let window = self.debounce;
        inner.pending_validation = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            let mut inner = state.lock().await;
            let report = validate_form(inner.values.entries(), rules);
            inner.errors = errors_to_map(report.errors);
        }));
    }

    /// Performs one submission attempt. Validation runs synchronously first;
    /// an invalid draft never reaches the network. While a previous attempt
    /// is still in flight, further calls return [`SubmitOutcome::InFlight`]
    /// without issuing a second request.
    pub async fn submit(&self) -> SubmitOutcome {
        let values = {
            let mut inner = self.inner.lock().await;
            if inner.phase == FormPhase::Submitting {
                return SubmitOutcome::InFlight;
            }
            inner.cancel_pending_validation();

            let report = validate_form(inner.values.entries(), self.rules);
            if !report.is_valid() {
                inner.errors = errors_to_map(report.errors.clone());
                inner.phase = FormPhase::Editing;
                return SubmitOutcome::Invalid(report);
            }

            inner.errors.clear();
            inner.phase = FormPhase::Submitting;
            inner.values.clone()
        };

        match self.handler.submit(values).await {
            Ok(accepted) => {
                let mut inner = self.inner.lock().await;
                inner.values = ContactFormValues::default();
                inner.errors.clear();
                inner.phase = FormPhase::Success;
                SubmitOutcome::Accepted(accepted)
            }
            Err(error) => {
                let mut inner = self.inner.lock().await;
                // The draft is retained so the user does not lose their input.
                if let SubmitError::Rejected(errors) = &error {
                    inner.errors = errors_to_map(errors.clone());
                }
                inner.phase = FormPhase::Error;
                SubmitOutcome::Failed(error)
            }
        }
    }

    pub async fn phase(&self) -> FormPhase {
        self.inner.lock().await.phase
    }

    pub async fn values(&self) -> ContactFormValues {
        self.inner.lock().await.values.clone()
    }

    pub async fn errors(&self) -> BTreeMap<String, String> {
        self.inner.lock().await.errors.clone()
    }

    pub async fn field_error(&self, field: FormField) -> Option<String> {
        self.inner
            .lock()
            .await
            .errors
            .get(field.as_str())
            .cloned()
    }
}

fn errors_to_map(
    errors: impl IntoIterator<Item = portfolio_validation::FieldError>,
) -> BTreeMap<String, String> {
    errors
        .into_iter()
        .map(|error| (error.field, error.message))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use portfolio_validation::contact_rules;

    use super::*;

    fn accepted() -> SubmissionAccepted {
        SubmissionAccepted {
            message: "Email sent successfully".into(),
            message_id: Some("<42@example.com>".into()),
            simulated: false,
        }
    }

    async fn fill_valid(controller: &FormController<impl SubmitHandler>) {
        controller.set_field(FormField::Name, "Jane Doe").await;
        controller.set_field(FormField::Email, "jane@example.com").await;
        controller.set_field(FormField::Subject, "Project inquiry").await;
        controller
            .set_field(
                FormField::Message,
                "I would like to discuss a project with you.",
            )
            .await;
    }

    /// Counts submissions and holds each one for a while before resolving.
    struct SlowHandler {
        calls: Arc<AtomicUsize>,
    }

    impl SubmitHandler for SlowHandler {
        fn submit(
            &self,
            _values: ContactFormValues,
        ) -> impl Future<Output = Result<SubmissionAccepted, SubmitError>> + Send {
            let calls = Arc::clone(&self.calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok(accepted())
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn validation_is_debounced() {
        let controller =
            FormController::new(contact_rules(), MockSubmitHandler::new());

        controller.set_field(FormField::Name, "J").await;
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(controller.errors().await.is_empty());

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(
            controller.field_error(FormField::Name).await.as_deref(),
            Some("Minimum length not met (minimum 2 characters)")
        );
        assert_eq!(controller.phase().await, FormPhase::Editing);
    }

    #[tokio::test(start_paused = true)]
    async fn each_edit_restarts_the_debounce_window() {
        let controller =
            FormController::new(contact_rules(), MockSubmitHandler::new());

        controller.set_field(FormField::Name, "J").await;
        tokio::time::sleep(Duration::from_millis(400)).await;
        controller.set_field(FormField::Name, "Jane").await;
        tokio::time::sleep(Duration::from_millis(400)).await;

        // Neither window has elapsed without interruption yet.
        assert!(controller.errors().await.is_empty());

        tokio::time::sleep(Duration::from_millis(150)).await;
        let errors = controller.errors().await;
        assert_eq!(errors.get("name"), None);
        assert_eq!(
            errors.get("email").map(String::as_str),
            Some("This field is required")
        );
    }

    #[tokio::test]
    async fn submit_rejects_invalid_draft_without_a_request() {
        // The mock has no expectations: any call would panic.
        let controller = FormController::new(contact_rules(), MockSubmitHandler::new());

        controller.set_field(FormField::Name, "Jane Doe").await;
        let outcome = controller.submit().await;

        let SubmitOutcome::Invalid(report) = outcome else {
            panic!("expected local validation failure, got {outcome:?}");
        };
        assert!(!report.is_valid());
        assert_eq!(controller.phase().await, FormPhase::Editing);
        assert_eq!(
            controller.values().await.name,
            "Jane Doe",
            "the draft must be retained"
        );
    }

    #[tokio::test]
    async fn submit_clears_the_draft_on_success() {
        let mut handler = MockSubmitHandler::new();
        handler
            .expect_submit()
            .once()
            .return_once(|_| Box::pin(std::future::ready(Ok(accepted()))));
        let controller = FormController::new(contact_rules(), handler);

        fill_valid(&controller).await;
        let outcome = controller.submit().await;

        assert!(matches!(outcome, SubmitOutcome::Accepted(_)));
        assert_eq!(controller.phase().await, FormPhase::Success);
        assert_eq!(controller.values().await, ContactFormValues::default());
    }

    #[tokio::test]
    async fn submit_retains_the_draft_on_failure() {
        let mut handler = MockSubmitHandler::new();
        handler.expect_submit().once().return_once(|_| {
            Box::pin(std::future::ready(Err(SubmitError::Delivery(
                "Could not send message".into(),
            ))))
        });
        let controller = FormController::new(contact_rules(), handler);

        fill_valid(&controller).await;
        let outcome = controller.submit().await;

        assert!(matches!(outcome, SubmitOutcome::Failed(SubmitError::Delivery(_))));
        assert_eq!(controller.phase().await, FormPhase::Error);
        assert_eq!(controller.values().await.name, "Jane Doe");
    }

    #[tokio::test]
    async fn server_rejection_populates_field_errors() {
        let mut handler = MockSubmitHandler::new();
        handler.expect_submit().once().return_once(|_| {
            Box::pin(std::future::ready(Err(SubmitError::Rejected(vec![
                portfolio_validation::FieldError {
                    field: "email".into(),
                    message: "Invalid format".into(),
                },
            ]))))
        });
        let controller = FormController::new(contact_rules(), handler);

        fill_valid(&controller).await;
        controller.submit().await;

        assert_eq!(
            controller.field_error(FormField::Email).await.as_deref(),
            Some("Invalid format")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_submits_issue_exactly_one_request() {
        let calls = Arc::new(AtomicUsize::new(0));
        let controller = FormController::new(
            contact_rules(),
            SlowHandler {
                calls: Arc::clone(&calls),
            },
        );

        fill_valid(&controller).await;
        let (first, second) = tokio::join!(controller.submit(), controller.submit());

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let in_flight = matches!(first, SubmitOutcome::InFlight) as usize
            + matches!(second, SubmitOutcome::InFlight) as usize;
        assert_eq!(in_flight, 1);
    }

    #[tokio::test]
    async fn edits_are_ignored_while_submitting() {
        let values = Arc::new(Mutex::new(None));
        let captured = Arc::clone(&values);

        struct CapturingHandler {
            captured: Arc<Mutex<Option<ContactFormValues>>>,
        }

        impl SubmitHandler for CapturingHandler {
            fn submit(
                &self,
                values: ContactFormValues,
            ) -> impl Future<Output = Result<SubmissionAccepted, SubmitError>> + Send {
                let captured = Arc::clone(&self.captured);
                async move {
                    *captured.lock().await = Some(values);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    Ok(SubmissionAccepted {
                        message: "ok".into(),
                        message_id: None,
                        simulated: true,
                    })
                }
            }
        }

        let controller = FormController::new(contact_rules(), CapturingHandler { captured });
        fill_valid(&controller).await;

        let submit = controller.submit();
        let edit = async {
            // Runs while the submission is awaited.
            controller.set_field(FormField::Name, "Intruder").await;
        };
        tokio::join!(submit, edit);

        assert_eq!(values.lock().await.as_ref().unwrap().name, "Jane Doe");
        // The ignored edit must not survive into the cleared draft either.
        assert_eq!(controller.values().await, ContactFormValues::default());
    }
}
