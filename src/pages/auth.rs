//! Login, sign-up and password flows.
//!
//! Submissions that fail come back as the same form page with an inline
//! error and status 200; successful ones redirect with `303 See Other`.

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::auth::cookies::{append_set_cookies, clear_session_cookies, session_cookies};
use crate::auth::{dashboard_path, login_path, SessionTokens, SignUpOutcome};
use crate::errors::{AppError, AppResult};
use crate::i18n::{Locale, Translator};

use super::path_locale;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormKind {
    Login,
    SignUp,
    SignUpSuccess,
    ForgotPassword,
    UpdatePassword,
}

/// An `auth` dictionary key with its English text.
type Text = (&'static str, &'static str);

impl FormKind {
    fn heading(self) -> (Text, Text) {
        match self {
            FormKind::Login => (
                ("login", "Login"),
                ("login_title", "Enter your email below to login to your account"),
            ),
            FormKind::SignUp => (("sign_up", "Sign up"), ("sign_up_title", "Create a new account")),
            FormKind::SignUpSuccess => (
                ("sign_up_success", "Thank you for signing up!"),
                (
                    "sign_up_success_title",
                    "Check your email to confirm your account before signing in.",
                ),
            ),
            FormKind::ForgotPassword => (
                ("reset_password", "Reset Your Password"),
                (
                    "forgot_password_title",
                    "Type in your email and we'll send you a link to reset your password",
                ),
            ),
            FormKind::UpdatePassword => (
                ("update_password", "Reset Your Password"),
                ("update_password_title", "Please enter your new password below."),
            ),
        }
    }

    fn labels(self) -> &'static [Text] {
        const EMAIL: Text = ("email", "Email");
        const PASSWORD: Text = ("password", "Password");
        const LOGIN: Text = ("login", "Login");
        const SIGN_UP: Text = ("sign_up", "Sign up");
        const ALREADY_ACCOUNT: Text = ("already_account", "Already have an account?");

        match self {
            FormKind::Login => &[
                EMAIL,
                PASSWORD,
                ("forgot_password", "Forgot your password?"),
                ("no_account", "Don't have an account?"),
                SIGN_UP,
                LOGIN,
            ],
            FormKind::SignUp => &[
                EMAIL,
                PASSWORD,
                ("repeat_password", "Repeat Password"),
                ALREADY_ACCOUNT,
                LOGIN,
                SIGN_UP,
            ],
            FormKind::SignUpSuccess => &[],
            FormKind::ForgotPassword => &[EMAIL, LOGIN, ALREADY_ACCOUNT],
            FormKind::UpdatePassword => &[
                ("new_password", "New password"),
                ("save_password", "Save new password"),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FormLabel {
    pub key: &'static str,
    pub text: &'static str,
}

/// Payload of an authentication page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPage {
    pub locale: Locale,
    pub form: FormKind,
    pub title: &'static str,
    pub description: &'static str,
    pub labels: Vec<FormLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl AuthPage {
    pub fn new(locale: Locale, form: FormKind) -> Self {
        let tr = Translator::new(locale);
        let ((title_key, title), (description_key, description)) = form.heading();

        Self {
            locale,
            form,
            title: tr.t("auth", title_key, title),
            description: tr.t("auth", description_key, description),
            labels: form
                .labels()
                .iter()
                .map(|&(key, literal)| FormLabel {
                    key,
                    text: tr.t("auth", key, literal),
                })
                .collect(),
            error: None,
            success: false,
            email: None,
        }
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string()).filter(|email| !email.is_empty());
        self
    }

    /// Forgot-password after the reset mail went out.
    fn sent(mut self) -> Self {
        let tr = Translator::new(self.locale);
        self.success = true;
        self.title = tr.t("auth", "check_email", "Check Your Email");
        self.description = tr.t("auth", "email_sent", "Password reset instructions sent");
        self.labels.clear();
        self
    }
}

fn form_error(page: AuthPage, err: &AppError) -> Response {
    Json(page.with_error(err.display_message())).into_response()
}

fn redirect_with_cookies(location: &str, cookies: &[axum::http::HeaderValue]) -> Response {
    let mut response = Redirect::to(location).into_response();
    append_set_cookies(&mut response, cookies);
    response
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
    pub repeat_password: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailForm {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordForm {
    pub password: String,
}

pub async fn login_form(Path(lang): Path<String>) -> AppResult<Json<AuthPage>> {
    Ok(Json(AuthPage::new(path_locale(&lang)?, FormKind::Login)))
}

pub async fn login_submit(
    State(state): State<AppState>,
    Path(lang): Path<String>,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let locale = path_locale(&lang)?;
    let email = form.email.trim();
    let page = AuthPage::new(locale, FormKind::Login).with_email(email);

    match state.sessions.identity_provider().sign_in(email, &form.password).await {
        Ok(session) => {
            tracing::info!(user_id = %session.user.id, "signed in");
            let cookies = session_cookies(&state.config, &session);
            Ok(redirect_with_cookies(&dashboard_path(locale), &cookies))
        }
        Err(err) => {
            tracing::info!(error = %err, "sign-in rejected");
            Ok(form_error(page, &err))
        }
    }
}

pub async fn sign_up_form(Path(lang): Path<String>) -> AppResult<Json<AuthPage>> {
    Ok(Json(AuthPage::new(path_locale(&lang)?, FormKind::SignUp)))
}

pub async fn sign_up_submit(
    State(state): State<AppState>,
    Path(lang): Path<String>,
    Form(form): Form<SignUpForm>,
) -> AppResult<Response> {
    let locale = path_locale(&lang)?;
    let email = form.email.trim();
    let page = AuthPage::new(locale, FormKind::SignUp).with_email(email);

    if form.password != form.repeat_password {
        let message = Translator::new(locale).t("auth", "passwords_dont_match", "Passwords do not match");
        return Ok(Json(page.with_error(message)).into_response());
    }

    let redirect_to = format!("{}{}", state.config.public_origin, dashboard_path(locale));
    let success = locale.localize("/auth/sign-up-success");

    match state
        .sessions
        .identity_provider()
        .sign_up(email, &form.password, &redirect_to)
        .await
    {
        Ok(SignUpOutcome::ConfirmationSent) => {
            tracing::info!("sign-up pending email confirmation");
            Ok(Redirect::to(&success).into_response())
        }
        Ok(SignUpOutcome::SignedIn(session)) => {
            tracing::info!(user_id = %session.user.id, "signed up");
            let cookies = session_cookies(&state.config, &session);
            Ok(redirect_with_cookies(&success, &cookies))
        }
        Err(err) => {
            tracing::info!(error = %err, "sign-up rejected");
            Ok(form_error(page, &err))
        }
    }
}

pub async fn sign_up_success(Path(lang): Path<String>) -> AppResult<Json<AuthPage>> {
    Ok(Json(AuthPage::new(path_locale(&lang)?, FormKind::SignUpSuccess)))
}

pub async fn forgot_password_form(Path(lang): Path<String>) -> AppResult<Json<AuthPage>> {
    Ok(Json(AuthPage::new(path_locale(&lang)?, FormKind::ForgotPassword)))
}

pub async fn forgot_password_submit(
    State(state): State<AppState>,
    Path(lang): Path<String>,
    Form(form): Form<EmailForm>,
) -> AppResult<Response> {
    let locale = path_locale(&lang)?;
    let email = form.email.trim();
    let page = AuthPage::new(locale, FormKind::ForgotPassword).with_email(email);
    let redirect_to = format!(
        "{}{}",
        state.config.public_origin,
        locale.localize("/auth/update-password")
    );

    match state
        .sessions
        .identity_provider()
        .send_password_reset(email, &redirect_to)
        .await
    {
        Ok(()) => Ok(Json(page.sent()).into_response()),
        Err(err) => {
            tracing::warn!(error = %err, "password reset request failed");
            Ok(form_error(page, &err))
        }
    }
}

pub async fn update_password_form(Path(lang): Path<String>) -> AppResult<Json<AuthPage>> {
    Ok(Json(AuthPage::new(path_locale(&lang)?, FormKind::UpdatePassword)))
}

/// Sets a new password for the session established by the reset link.
pub async fn update_password_submit(
    State(state): State<AppState>,
    Path(lang): Path<String>,
    tokens: SessionTokens,
    Form(form): Form<PasswordForm>,
) -> AppResult<Response> {
    let locale = path_locale(&lang)?;
    let page = AuthPage::new(locale, FormKind::UpdatePassword);

    let Some(access_token) = tokens.access_token.as_deref() else {
        return Ok(form_error(page, &AppError::unauthorized("Auth session missing!")));
    };

    match state
        .sessions
        .identity_provider()
        .update_password(access_token, &form.password)
        .await
    {
        Ok(()) => Ok(Redirect::to(&dashboard_path(locale)).into_response()),
        Err(err) => {
            tracing::info!(error = %err, "password update rejected");
            Ok(form_error(page, &err))
        }
    }
}

/// Revokes the session upstream and drops the cookies either way.
pub async fn logout(
    State(state): State<AppState>,
    Path(lang): Path<String>,
    tokens: SessionTokens,
) -> AppResult<Response> {
    let locale = path_locale(&lang)?;

    if let Some(access_token) = tokens.access_token.as_deref() {
        if let Err(err) = state.sessions.identity_provider().sign_out(access_token).await {
            tracing::warn!(error = %err, "sign-out failed upstream, clearing cookies anyway");
        }
    }

    let cookies = clear_session_cookies(&state.config);
    Ok(redirect_with_cookies(&login_path(locale), &cookies))
}
