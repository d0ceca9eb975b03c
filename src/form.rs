//! Sign-in form state machine.
//!
//! A [`LoginForm`] is a plain value. Every user gesture is a [`FormEvent`];
//! [`LoginForm::apply`] consumes the current form and returns the next one
//! together with the side effects the caller has to run. The form itself
//! never spawns tasks or talks to the identity service.

use crate::identity::Credentials;
use crate::validation::{self, ValidationResult};

/// Banner text shown after a valid submit
pub const SUCCESS_MESSAGE: &str = "Login Successful";

/// Raw field contents as last edited
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub email: String,
    pub password: String,
}

/// Where the form is in its submit cycle.
///
/// The phase records the outcome of the last submit and is independent of the
/// banner: dismissing or expiring the notification leaves a `Valid` form `Valid`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormPhase {
    #[default]
    Idle,
    /// Only observable inside the submit transition
    Validating,
    /// The last submit failed validation
    Invalid,
    /// The last submit passed validation
    Valid,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Notification {
    #[default]
    Hidden,
    Success(String),
}

impl Notification {
    pub fn is_visible(&self) -> bool {
        !matches!(self, Notification::Hidden)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Notification::Hidden => None,
            Notification::Success(message) => Some(message.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    EditEmail(String),
    EditPassword(String),
    Submit,
    Dismiss,
    /// Fired by the auto-dismiss timer scheduled for `ticket`
    NotificationExpired { ticket: u64 },
}

/// Work requested by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Hand the validated credentials to the identity service
    Handoff(Credentials),
    /// Start the auto-dismiss countdown for the notification shown under `ticket`
    ScheduleDismiss { ticket: u64 },
    /// Stop any pending auto-dismiss countdown
    CancelDismiss,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    state: FormState,
    phase: FormPhase,
    errors: ValidationResult,
    notification: Notification,
    ticket: u64,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    /// Errors from the last submit; empty before the first one
    pub fn errors(&self) -> &ValidationResult {
        &self.errors
    }

    pub fn email_error(&self) -> String {
        self.errors.email_message()
    }

    pub fn password_error(&self) -> String {
        self.errors.password_message()
    }

    pub fn notification(&self) -> &Notification {
        &self.notification
    }

    /// Ticket of the most recently shown notification
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    pub fn apply(mut self, event: FormEvent) -> (Self, Vec<Effect>) {
        let effects = match event {
            FormEvent::EditEmail(email) => {
                self.state.email = email;
                self.phase = FormPhase::Idle;
                vec![]
            }
            FormEvent::EditPassword(password) => {
                self.state.password = password;
                self.phase = FormPhase::Idle;
                vec![]
            }
            FormEvent::Submit => self.submit(),
            FormEvent::Dismiss => {
                self.notification = Notification::Hidden;
                vec![Effect::CancelDismiss]
            }
            FormEvent::NotificationExpired { ticket } => {
                if ticket == self.ticket {
                    self.notification = Notification::Hidden;
                } else {
                    tracing::trace!(ticket, current = self.ticket, "Ignoring stale dismiss timer");
                }
                vec![]
            }
        };

        (self, effects)
    }

    /// Apply a batch of events in order, collecting every effect
    pub fn apply_all(self, events: impl IntoIterator<Item = FormEvent>) -> (Self, Vec<Effect>) {
        events
            .into_iter()
            .fold((self, Vec::new()), |(form, mut effects), event| {
                let (form, more) = form.apply(event);
                effects.extend(more);
                (form, effects)
            })
    }

    fn submit(&mut self) -> Vec<Effect> {
        self.phase = FormPhase::Validating;
        self.errors = validation::validate(&self.state.email, &self.state.password);

        if self.errors.is_valid() {
            self.phase = FormPhase::Valid;
            self.ticket += 1;
            self.notification = Notification::Success(SUCCESS_MESSAGE.to_string());
            vec![
                Effect::Handoff(Credentials::new(&self.state.email, &self.state.password)),
                Effect::ScheduleDismiss {
                    ticket: self.ticket,
                },
            ]
        } else {
            self.phase = FormPhase::Invalid;
            self.notification = Notification::Hidden;
            vec![Effect::CancelDismiss]
        }
    }
}
