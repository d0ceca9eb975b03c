use crate::{
    form::{FormEvent, FormPhase, LoginForm},
    handlers::api::AppState,
    templates,
};
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, Redirect},
    Form,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

const HX_REQUEST: &str = "hx-request";

#[derive(Debug, Deserialize)]
pub struct LoginSubmission {
    #[serde(default)]
    pub form_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct FormIdQuery {
    #[serde(default)]
    pub form_id: String,
}

fn parse_form_id(raw: &str) -> Option<Uuid> {
    raw.parse().ok()
}

fn is_htmx(headers: &HeaderMap) -> bool {
    headers.contains_key(HX_REQUEST)
}

fn full_page(state: &AppState, form_id: Uuid, form: &LoginForm) -> Html<String> {
    let content = templates::login(form_id, form, state.registry.dismiss_after());
    let page = templates::base("Sign in", content);
    Html(page.into_string())
}

pub async fn index() -> Redirect {
    Redirect::to("/login")
}

pub async fn login_page(State(state): State<Arc<AppState>>) -> Html<String> {
    let (form_id, form) = state.registry.open().await;
    full_page(&state, form_id, &form)
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(submission): Form<LoginSubmission>,
) -> Html<String> {
    let form_id = parse_form_id(&submission.form_id).unwrap_or_else(|| {
        tracing::debug!("Submission without a usable form id, starting a new form");
        Uuid::new_v4()
    });

    let form = state
        .registry
        .dispatch(
            form_id,
            [
                FormEvent::EditEmail(submission.email),
                FormEvent::EditPassword(submission.password),
                FormEvent::Submit,
            ],
        )
        .await;

    match form.phase() {
        FormPhase::Valid => tracing::info!(%form_id, "Sign-in form accepted"),
        _ => tracing::debug!(
            %form_id,
            email_error = %form.email_error(),
            password_error = %form.password_error(),
            "Sign-in form rejected"
        ),
    }

    if is_htmx(&headers) {
        // Out-of-band swaps only, so the browser keeps what the user typed
        let feedback = templates::submit_feedback(form_id, &form, state.registry.dismiss_after());
        Html(feedback.into_string())
    } else {
        full_page(&state, form_id, &form)
    }
}

pub async fn dismiss(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(params): Form<FormIdQuery>,
) -> Result<Html<String>, StatusCode> {
    let form_id = parse_form_id(&params.form_id).ok_or_else(|| {
        tracing::warn!("Dismiss request with invalid form id: {}", params.form_id);
        StatusCode::BAD_REQUEST
    })?;

    let form = state.registry.dispatch(form_id, [FormEvent::Dismiss]).await;
    tracing::debug!(%form_id, "Notification dismissed");

    if is_htmx(&headers) {
        let fragment = templates::notification(
            form_id,
            form.notification(),
            state.registry.dismiss_after(),
        );
        Ok(Html(fragment.into_string()))
    } else {
        Ok(full_page(&state, form_id, &form))
    }
}

pub async fn notification_fragment(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FormIdQuery>,
) -> Result<Html<String>, StatusCode> {
    let form_id = parse_form_id(&params.form_id).ok_or_else(|| {
        tracing::warn!("Notification request with invalid form id: {}", params.form_id);
        StatusCode::BAD_REQUEST
    })?;

    let notification = state
        .registry
        .snapshot(form_id)
        .await
        .map(|form| form.notification().clone())
        .unwrap_or_default();

    let fragment =
        templates::notification(form_id, &notification, state.registry.dismiss_after());
    Ok(Html(fragment.into_string()))
}
