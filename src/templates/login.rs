use crate::form::{LoginForm, Notification};
use maud::{html, Markup, PreEscaped};
use std::time::Duration;
use uuid::Uuid;

pub const PANEL_ID: &str = "login-panel";
pub const NOTIFICATION_ID: &str = "notification";
pub const EMAIL_HELPER_ID: &str = "email-helper";
pub const PASSWORD_HELPER_ID: &str = "password-helper";

/// Full sign-in card: notification banner plus the form
pub fn login(form_id: Uuid, form: &LoginForm, dismiss_after: Duration) -> Markup {
    html! {
        div class="w-full max-w-md" {
            h1 class="text-2xl font-semibold mb-6 text-center" { "Sign in" }
            (login_panel(form_id, form, dismiss_after))

            // Keep input error state in step with swapped helper text
            script {
                (PreEscaped(r#"
                htmx.onLoad(function (elt) {
                    const helpers = elt.matches && elt.matches('[data-field-helper]')
                        ? [elt]
                        : elt.querySelectorAll('[data-field-helper]');
                    helpers.forEach(helper => {
                        const input = document.getElementById(helper.getAttribute('data-field-helper'));
                        if (!input) {
                            return;
                        }
                        const invalid = helper.textContent.trim() !== '';
                        if (invalid) {
                            input.setAttribute('aria-invalid', 'true');
                        } else {
                            input.removeAttribute('aria-invalid');
                        }
                        input.classList.toggle('border-red-500', invalid);
                        input.classList.toggle('border-gray-300', !invalid);
                    });
                });
                "#))
            }
        }
    }
}

/// Banner and form as rendered on a full page load
pub fn login_panel(form_id: Uuid, form: &LoginForm, dismiss_after: Duration) -> Markup {
    let email_error = form.email_error();
    let password_error = form.password_error();

    html! {
        div id=(PANEL_ID) {
            (notification(form_id, form.notification(), dismiss_after))

            // htmx submits only swap the helpers and the banner, never the inputs
            form action="/login" method="post" novalidate
                hx-post="/login" hx-swap="none"
                class="bg-white shadow rounded-lg p-8 space-y-6" {

                input type="hidden" name="form_id" value=(form_id.to_string());

                // Email field
                div {
                    label for="email" class="block mb-2 text-sm font-medium" {
                        "Email Address"
                    }
                    input type="text" id="email" name="email" autocomplete="email" required autofocus
                        value=(form.state().email)
                        aria-invalid=[(!email_error.is_empty()).then_some("true")]
                        aria-describedby=(EMAIL_HELPER_ID)
                        class=(input_class(&email_error));
                    (helper(EMAIL_HELPER_ID, "email", &email_error, false))
                }

                // Password field
                div {
                    label for="password" class="block mb-2 text-sm font-medium" {
                        "Password"
                    }
                    input type="password" id="password" name="password" autocomplete="current-password" required
                        aria-invalid=[(!password_error.is_empty()).then_some("true")]
                        aria-describedby=(PASSWORD_HELPER_ID)
                        class=(input_class(&password_error));
                    (helper(PASSWORD_HELPER_ID, "password", &password_error, false))
                }

                // Submit button
                div {
                    button type="submit"
                        class="w-full rounded-lg bg-blue-600 px-4 py-2 font-medium text-white hover:bg-blue-700" {
                        "Sign In"
                    }
                }
            }
        }
    }
}

/// Out-of-band response to an htmx submit: both helpers and the banner
pub fn submit_feedback(form_id: Uuid, form: &LoginForm, dismiss_after: Duration) -> Markup {
    html! {
        (notification_markup(form_id, form.notification(), dismiss_after, true))
        (helper(EMAIL_HELPER_ID, "email", &form.email_error(), true))
        (helper(PASSWORD_HELPER_ID, "password", &form.password_error(), true))
    }
}

/// Success banner, or an empty placeholder when hidden
pub fn notification(form_id: Uuid, notification: &Notification, dismiss_after: Duration) -> Markup {
    notification_markup(form_id, notification, dismiss_after, false)
}

fn notification_markup(
    form_id: Uuid,
    notification: &Notification,
    dismiss_after: Duration,
    out_of_band: bool,
) -> Markup {
    let swap_oob = out_of_band.then_some("true");

    match notification {
        Notification::Hidden => html! {
            div id=(NOTIFICATION_ID) hx-swap-oob=[swap_oob] {}
        },
        Notification::Success(message) => html! {
            // Re-fetched once the auto-dismiss window has passed
            div id=(NOTIFICATION_ID) hx-swap-oob=[swap_oob]
                hx-get={ "/login/notification?form_id=" (form_id.to_string()) }
                hx-trigger={ "load delay:" (dismiss_after.as_millis().to_string()) "ms" }
                hx-swap="outerHTML" {
                div role="alert"
                    class="mb-4 flex items-center justify-between rounded-lg border border-green-300 bg-green-50 px-4 py-3 text-green-800" {
                    span { (message) }
                    form action="/login/dismiss" method="post"
                        hx-post="/login/dismiss" hx-target={ "#" (NOTIFICATION_ID) } hx-swap="outerHTML" {
                        input type="hidden" name="form_id" value=(form_id.to_string());
                        button type="submit" aria-label="Close" class="ml-4 font-bold" { "×" }
                    }
                }
            }
        },
    }
}

fn helper(id: &str, input_id: &str, error: &str, out_of_band: bool) -> Markup {
    html! {
        p id=(id) data-field-helper=(input_id) hx-swap-oob=[out_of_band.then_some("true")]
            aria-live="polite" class="mt-1 text-sm text-red-600" { (error) }
    }
}

fn input_class(error: &str) -> &'static str {
    if error.is_empty() {
        "block w-full rounded-lg border border-gray-300 p-2.5 text-sm"
    } else {
        "block w-full rounded-lg border border-red-500 p-2.5 text-sm"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormEvent;

    const TIMEOUT: Duration = Duration::from_secs(6);

    fn submitted(email: &str, password: &str) -> LoginForm {
        let (form, _) = LoginForm::new().apply_all([
            FormEvent::EditEmail(email.to_string()),
            FormEvent::EditPassword(password.to_string()),
            FormEvent::Submit,
        ]);
        form
    }

    #[test]
    fn test_renders_fields_and_button() {
        let html = login(Uuid::nil(), &LoginForm::new(), TIMEOUT).into_string();

        assert!(html.contains("Email Address"));
        assert!(html.contains(r#"autocomplete="email""#));
        assert!(html.contains(r#"type="password""#));
        assert!(html.contains(r#"autocomplete="current-password""#));
        assert!(html.contains("Sign In"));
        assert!(html.contains(r#"hx-swap="none""#));
        assert!(!html.contains(r#"aria-invalid="true""#));
        assert!(!html.contains("Login Successful"));
    }

    #[test]
    fn test_renders_field_errors() {
        let form = submitted("invalid-email", "short");
        let html = login_panel(Uuid::nil(), &form, TIMEOUT).into_string();

        assert!(html.contains("Please enter a valid email address"));
        assert!(html.contains("Password must be at least 8 characters"));
        assert!(html.contains(r#"aria-invalid="true""#));
        assert!(html.contains(r#"value="invalid-email""#));
        assert!(!html.contains("short"));
    }

    #[test]
    fn test_submit_feedback_leaves_inputs_alone() {
        let form = submitted("invalid-email", "short");
        let html = submit_feedback(Uuid::nil(), &form, TIMEOUT).into_string();

        assert!(html.contains(r#"<p id="email-helper" data-field-helper="email" hx-swap-oob="true""#));
        assert!(html.contains(r#"<p id="password-helper" data-field-helper="password" hx-swap-oob="true""#));
        assert!(html.contains(r#"<div id="notification" hx-swap-oob="true"></div>"#));
        assert!(html.contains("Please enter a valid email address"));
        assert!(html.contains("Password must be at least 8 characters"));
        assert!(!html.contains("<input"));
        assert!(!html.contains("<form"));
    }

    #[test]
    fn test_submit_feedback_carries_banner() {
        let form = submitted("test@example.com", "Valid123!");
        let html = submit_feedback(Uuid::nil(), &form, TIMEOUT).into_string();

        assert!(html.contains("Login Successful"));
        assert!(html.contains(r#"hx-swap-oob="true" hx-get="/login/notification"#));
        assert!(!html.contains("Valid123!"));
    }

    #[test]
    fn test_renders_dismissible_banner() {
        let id = Uuid::new_v4();
        let html = notification(
            id,
            &Notification::Success("Login Successful".to_string()),
            TIMEOUT,
        )
        .into_string();

        assert!(html.contains("Login Successful"));
        assert!(html.contains("/login/dismiss"));
        assert!(html.contains("load delay:6000ms"));
        assert!(html.contains(&id.to_string()));
        assert!(!html.contains("hx-swap-oob"));
    }

    #[test]
    fn test_hidden_banner_is_empty_placeholder() {
        let html = notification(Uuid::nil(), &Notification::Hidden, TIMEOUT).into_string();
        assert_eq!(html, r#"<div id="notification"></div>"#);
    }
}
