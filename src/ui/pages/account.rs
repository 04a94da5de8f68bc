//! Login, signup and password reset screens. Each one is a two-step OTP
//! exchange driven by an [`OtpFlow`] signal.

use dioxus::prelude::*;
use tracing::{info, warn};

use crate::app::{persist_user_state, Route};
use crate::config::AppConfig;
use crate::domain::{AppState, AuthSession, OtpFlow, OtpStep, SignupForm};
use crate::infra::{AuthClient, AuthClientError, AuthResponse};
use crate::ui::components::{push_toast, ToastKind, ToastMessage};
use crate::ui::theme;

const VERIFY_NO_TOKEN: &str = "Login response did not include a session token.";

/// Builds the auth client once per screen.
fn use_auth_client() -> Option<AuthClient> {
    let config = use_context::<AppConfig>();
    use_hook(move || match AuthClient::new(&config) {
        Ok(client) => Some(client),
        Err(err) => {
            warn!(error = %err, "failed to build auth client");
            None
        }
    })
}

/// Runs one auth request against the flow, clearing `pending` either way.
/// `on_ok` decides what a successful response means for the flow.
fn run_request<F, Fut>(
    mut flow: Signal<OtpFlow>,
    client: Option<AuthClient>,
    request: F,
    on_ok: impl FnOnce(&mut OtpFlow, AuthResponse) + 'static,
) where
    F: FnOnce(AuthClient) -> Fut + 'static,
    Fut: std::future::Future<Output = Result<AuthResponse, AuthClientError>> + 'static,
{
    if !flow.with_mut(|f| f.begin()) {
        return;
    }
    let Some(client) = client else {
        flow.with_mut(|f| f.failed("Authentication service unavailable."));
        return;
    };
    spawn(async move {
        match request(client).await {
            Ok(response) => flow.with_mut(|f| on_ok(f, response)),
            Err(err) => {
                warn!(error = %err, "auth request failed");
                flow.with_mut(|f| f.failed(err.to_string()));
            }
        }
    });
}

/// Stores the session on a successful login or signup.
fn start_session(mut state: Signal<AppState>, email: String, token: String) {
    state.with_mut(|st| st.login(AuthSession { email, token }));
    persist_user_state(&state);
    info!("user session started");
}

#[component]
fn TextInput(
    placeholder: &'static str,
    value: Signal<String>,
    #[props(default = "text")] kind: &'static str,
) -> Element {
    let mut value = value;
    rsx! {
        input {
            class: theme::INPUT,
            r#type: kind,
            placeholder,
            value: "{value}",
            oninput: move |evt| value.set(evt.value()),
        }
    }
}

#[component]
fn FlowMessage(flow: Signal<OtpFlow>) -> Element {
    let message = flow.with(|f| f.message().map(str::to_string));
    rsx! {
        if let Some(message) = message {
            p { class: "message", "{message}" }
        }
    }
}

#[component]
pub fn LoginPage() -> Element {
    let client = use_auth_client();
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let nav = use_navigator();
    let email = use_signal(String::new);
    let password = use_signal(String::new);
    let otp = use_signal(String::new);
    let flow = use_signal(OtpFlow::default);

    let on_request = {
        let client = client.clone();
        move |_| {
            let (email, password) = (email(), password());
            run_request(
                flow,
                client.clone(),
                move |client| async move { client.login_request_otp(&email, &password).await },
                |f, response| f.otp_sent(response.message),
            );
        }
    };

    let on_verify = move |_| {
        let (email, code) = (email(), otp());
        let session_email = email.clone();
        run_request(
            flow,
            client.clone(),
            move |client| async move { client.login_verify_otp(&email, &code).await },
            move |f, response| match response.token {
                Some(token) => {
                    f.verified(response.message, "Login successful");
                    start_session(state, session_email, token);
                    push_toast(toasts, ToastKind::Success, "Logged in.");
                    nav.replace(Route::Home {});
                }
                None => f.failed(VERIFY_NO_TOKEN),
            },
        );
    };

    let step = flow.with(|f| f.step());
    let pending = flow.with(|f| f.is_pending());

    rsx! {
        div { class: theme::FORM,
            h2 { class: theme::PAGE_TITLE, "ECOKISAN" }
            if step == OtpStep::Details {
                TextInput { placeholder: "Email", value: email, kind: "email" }
                TextInput { placeholder: "Password", value: password, kind: "password" }
                button { class: theme::btn_primary(), disabled: pending, onclick: on_request, "Login" }
                button {
                    class: theme::btn_link(),
                    onclick: move |_| {
                        nav.push(Route::ForgotPassword {});
                    },
                    "Forgot Password?"
                }
                button {
                    class: theme::btn_link(),
                    onclick: move |_| {
                        nav.push(Route::Signup {});
                    },
                    "No account? Signup"
                }
            } else {
                p { class: theme::MUTED, "Enter OTP sent to your email" }
                TextInput { placeholder: "OTP", value: otp }
                button { class: theme::btn_primary(), disabled: pending, onclick: on_verify, "Verify OTP" }
                button {
                    class: theme::btn_secondary(),
                    onclick: move |_| {
                        let mut flow = flow;
                        flow.with_mut(|f| f.restart());
                    },
                    "Back"
                }
            }
            FlowMessage { flow }
        }
    }
}

#[component]
pub fn SignupPage() -> Element {
    let client = use_auth_client();
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let nav = use_navigator();
    let name = use_signal(String::new);
    let email = use_signal(String::new);
    let password = use_signal(String::new);
    let phone = use_signal(String::new);
    let address = use_signal(String::new);
    let district = use_signal(String::new);
    let region = use_signal(String::new);
    let language = use_signal(String::new);
    let otp = use_signal(String::new);
    let mut flow = use_signal(OtpFlow::default);

    let on_signup = {
        let client = client.clone();
        move |_| {
            let form = SignupForm {
                name: name(),
                email: email(),
                password: password(),
                phone_number: phone(),
                address: address(),
                district: district(),
                state: region(),
                language: language(),
                ..SignupForm::default()
            };
            let missing = form.missing_fields();
            if !missing.is_empty() {
                flow.with_mut(|f| f.failed(format!("Please fill in: {}", missing.join(", "))));
                return;
            }
            run_request(
                flow,
                client.clone(),
                move |client| async move { client.signup_request_otp(&form).await },
                |f, response| f.otp_sent(response.message),
            );
        }
    };

    let on_verify = move |_| {
        let (email, code) = (email(), otp());
        let session_email = email.clone();
        run_request(
            flow,
            client.clone(),
            move |client| async move { client.signup_verify_otp(&email, &code).await },
            move |f, response| {
                f.verified(None, "Signup successful");
                if let Some(token) = response.token {
                    start_session(state, session_email, token);
                }
                push_toast(toasts, ToastKind::Success, "Signup successful.");
                nav.replace(Route::Home {});
            },
        );
    };

    let step = flow.with(|f| f.step());
    let pending = flow.with(|f| f.is_pending());

    rsx! {
        div { class: theme::FORM,
            h2 { class: theme::PAGE_TITLE, "Create Account" }
            if step == OtpStep::Details {
                TextInput { placeholder: "Name", value: name }
                TextInput { placeholder: "Email", value: email, kind: "email" }
                TextInput { placeholder: "Password", value: password, kind: "password" }
                TextInput { placeholder: "Phone", value: phone, kind: "tel" }
                TextInput { placeholder: "Address (optional)", value: address }
                TextInput { placeholder: "District (optional)", value: district }
                TextInput { placeholder: "State (optional)", value: region }
                TextInput { placeholder: "Preferred language (optional)", value: language }
                button { class: theme::btn_primary(), disabled: pending, onclick: on_signup, "Signup" }
                button {
                    class: theme::btn_link(),
                    onclick: move |_| {
                        nav.push(Route::Login {});
                    },
                    "Already have an account? Login"
                }
            } else {
                p { class: theme::MUTED, "Enter OTP sent to your email" }
                TextInput { placeholder: "OTP", value: otp }
                button { class: theme::btn_primary(), disabled: pending, onclick: on_verify, "Verify OTP" }
            }
            FlowMessage { flow }
        }
    }
}

#[component]
pub fn ForgotPasswordPage() -> Element {
    let client = use_auth_client();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let nav = use_navigator();
    let email = use_signal(String::new);
    let otp = use_signal(String::new);
    let new_password = use_signal(String::new);
    let flow = use_signal(OtpFlow::default);

    let on_request = {
        let client = client.clone();
        move |_| {
            let email = email();
            run_request(
                flow,
                client.clone(),
                move |client| async move { client.forgot_password_request_otp(&email).await },
                |f, response| f.otp_sent(response.message),
            );
        }
    };

    let on_reset = move |_| {
        let (email, code, password) = (email(), otp(), new_password());
        run_request(
            flow,
            client.clone(),
            move |client| async move { client.reset_password(&email, &code, &password).await },
            move |f, response| {
                f.verified(response.message, "Password reset successful");
                push_toast(toasts, ToastKind::Success, "Password reset. Please log in.");
                nav.replace(Route::Login {});
            },
        );
    };

    let step = flow.with(|f| f.step());
    let pending = flow.with(|f| f.is_pending());

    rsx! {
        div { class: theme::FORM,
            h2 { class: theme::PAGE_TITLE, "Forgot Password" }
            if step == OtpStep::Details {
                TextInput { placeholder: "Email", value: email, kind: "email" }
                button { class: theme::btn_primary(), disabled: pending, onclick: on_request, "Request OTP" }
            } else {
                TextInput { placeholder: "OTP", value: otp }
                TextInput { placeholder: "New Password", value: new_password, kind: "password" }
                button { class: theme::btn_primary(), disabled: pending, onclick: on_reset, "Reset Password" }
            }
            FlowMessage { flow }
        }
    }
}
