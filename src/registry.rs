//! Live form instances.
//!
//! Each rendered form gets an id and an instance here. The registry applies
//! events to the instance's [`LoginForm`] and carries out the effects the
//! transition asks for: identity handoff and the auto-dismiss timer.

use crate::dismiss::DismissTimer;
use crate::form::{Effect, FormEvent, LoginForm};
use crate::identity::{Credentials, IdentityService};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

struct FormInstance {
    form: LoginForm,
    timer: Option<DismissTimer>,
    last_active: DateTime<Utc>,
}

impl FormInstance {
    fn new() -> Self {
        Self {
            form: LoginForm::new(),
            timer: None,
            last_active: Utc::now(),
        }
    }
}

pub struct FormRegistry {
    instances: Mutex<HashMap<Uuid, FormInstance>>,
    identity: Arc<dyn IdentityService>,
    dismiss_after: Duration,
    self_ref: Weak<FormRegistry>,
}

impl FormRegistry {
    pub fn new(identity: Arc<dyn IdentityService>, dismiss_after: Duration) -> Arc<Self> {
        Arc::new_cyclic(|self_ref| Self {
            instances: Mutex::new(HashMap::new()),
            identity,
            dismiss_after,
            self_ref: self_ref.clone(),
        })
    }

    pub fn dismiss_after(&self) -> Duration {
        self.dismiss_after
    }

    /// Start a new form instance
    pub async fn open(&self) -> (Uuid, LoginForm) {
        let id = Uuid::new_v4();
        self.instances.lock().await.insert(id, FormInstance::new());
        tracing::debug!(%id, "Opened form instance");
        (id, LoginForm::new())
    }

    /// Apply `events` in order to the instance `id` and run the resulting
    /// effects. An unknown id gets a fresh instance first.
    pub async fn dispatch(
        &self,
        id: Uuid,
        events: impl IntoIterator<Item = FormEvent>,
    ) -> LoginForm {
        let (form, handoffs) = {
            let mut instances = self.instances.lock().await;
            let instance = instances.entry(id).or_insert_with(|| {
                tracing::debug!(%id, "Form instance not found, starting a new one");
                FormInstance::new()
            });

            let (form, effects) = std::mem::take(&mut instance.form).apply_all(events);
            instance.form = form;
            instance.last_active = Utc::now();

            let mut handoffs = Vec::new();
            for effect in effects {
                match effect {
                    Effect::Handoff(credentials) => handoffs.push(credentials),
                    Effect::ScheduleDismiss { ticket } => {
                        // Replacing the old timer aborts it
                        instance.timer = Some(self.schedule_dismiss(id, ticket));
                    }
                    Effect::CancelDismiss => {
                        if let Some(timer) = instance.timer.take() {
                            timer.cancel();
                        }
                    }
                }
            }

            (instance.form.clone(), handoffs)
        };

        self.hand_off(id, handoffs).await;
        form
    }

    /// Current state of instance `id`, if it is still alive
    pub async fn snapshot(&self, id: Uuid) -> Option<LoginForm> {
        self.instances
            .lock()
            .await
            .get(&id)
            .map(|instance| instance.form.clone())
    }

    /// Tear down instance `id`. Returns whether it existed.
    pub async fn close(&self, id: Uuid) -> bool {
        let removed = self.instances.lock().await.remove(&id);
        if removed.is_some() {
            tracing::debug!(%id, "Closed form instance");
        }
        removed.is_some()
    }

    /// Tear down every instance last touched before `cutoff`
    pub async fn sweep_idle(&self, cutoff: DateTime<Utc>) -> usize {
        let mut instances = self.instances.lock().await;
        let before = instances.len();
        instances.retain(|_, instance| instance.last_active >= cutoff);
        before - instances.len()
    }

    pub async fn len(&self) -> usize {
        self.instances.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.instances.lock().await.is_empty()
    }

    fn schedule_dismiss(&self, id: Uuid, ticket: u64) -> DismissTimer {
        let registry = self.self_ref.clone();
        DismissTimer::schedule(self.dismiss_after, async move {
            if let Some(registry) = registry.upgrade() {
                registry.expire(id, ticket).await;
            }
        })
    }

    async fn expire(&self, id: Uuid, ticket: u64) {
        let mut instances = self.instances.lock().await;
        if let Some(instance) = instances.get_mut(&id) {
            let (form, _) = std::mem::take(&mut instance.form)
                .apply(FormEvent::NotificationExpired { ticket });
            instance.form = form;
            tracing::debug!(%id, ticket, "Notification auto-dismissed");
        }
    }

    async fn hand_off(&self, id: Uuid, handoffs: Vec<Credentials>) {
        for credentials in handoffs {
            if let Err(e) = self.identity.forward(credentials).await {
                tracing::error!(%id, "Identity handoff failed: {}", e);
            }
        }
    }
}
