// ============================
// guichet-lib/src/handlers.rs
// ============================
//! HTTP request handlers for the register / login / profile web flow.
//!
//! Every failure is recovered here: handlers turn each error into a
//! flash message plus redirect, so no request ever surfaces a bare
//! status page or takes the process down.
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

use crate::error::AppError;
use crate::flow;
use crate::store::CredentialStore;
use crate::views;
use crate::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "sid";

/// Form fields shared by the login and registration forms.
#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
}

/// GET / — login form, with any pending flash message rendered once.
pub async fn login_page<S: CredentialStore>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Response {
    let (token, cookie) = establish_session(&state, &headers).await;
    let flash = state.sessions.take_flash(&token).await;
    with_cookie(
        Html(views::login_page(flash.as_deref())).into_response(),
        cookie,
    )
}

/// GET /inscription — registration form, with any pending flash message.
pub async fn register_page<S: CredentialStore>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Response {
    let (token, cookie) = establish_session(&state, &headers).await;
    let flash = state.sessions.take_flash(&token).await;
    with_cookie(
        Html(views::register_page(flash.as_deref())).into_response(),
        cookie,
    )
}

/// POST /inscription — create the account, then send the user to the
/// login page. Registration never logs the user in.
pub async fn register_submit<S: CredentialStore>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Form(form): Form<CredentialsForm>,
) -> Response {
    let (token, cookie) = establish_session(&state, &headers).await;

    let (target, message) = match flow::register(&state.store, &form.username, form.password).await
    {
        Ok(_) => ("/", "Account created. Please log in.".to_string()),
        Err(e) => {
            tracing::warn!(username = %form.username, error = %e, "registration failed");
            ("/inscription", e.user_message())
        },
    };

    state.sessions.set_flash(&token, message).await;
    with_cookie(Redirect::to(target).into_response(), cookie)
}

/// POST /connexion — verify credentials and bind the session on success.
pub async fn login_submit<S: CredentialStore>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Form(form): Form<CredentialsForm>,
) -> Response {
    let (token, cookie) = establish_session(&state, &headers).await;

    match flow::login(&state.store, &form.username, &form.password).await {
        Ok(user_id) => {
            state.sessions.bind_user(&token, user_id).await;
            with_cookie(Redirect::to("/profil").into_response(), cookie)
        },
        Err(e) => {
            tracing::debug!(username = %form.username, error = %e, "login rejected");
            state.sessions.set_flash(&token, e.user_message()).await;
            with_cookie(Redirect::to("/").into_response(), cookie)
        },
    }
}

/// GET /profil — render the profile for the session's user, or bounce to
/// the login page with a flash message.
pub async fn profile_page<S: CredentialStore>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Response {
    let (token, cookie) = establish_session(&state, &headers).await;

    let user_id = state.sessions.get(&token).await.and_then(|s| s.user_id);
    let Some(user_id) = user_id else {
        state
            .sessions
            .set_flash(&token, AppError::Unauthenticated.user_message())
            .await;
        return with_cookie(Redirect::to("/").into_response(), cookie);
    };

    match flow::view_profile(&state.store, user_id).await {
        Ok(profile) => with_cookie(Html(views::profile_page(&profile)).into_response(), cookie),
        Err(e) => {
            // Stale binding (user row gone) or a storage failure: drop the
            // session and carry the message in a fresh anonymous one.
            tracing::warn!(user_id, error = %e, "profile lookup failed");
            state.sessions.destroy(&token).await;
            let token = state.sessions.create().await;
            state.sessions.set_flash(&token, e.user_message()).await;
            with_cookie(
                Redirect::to("/").into_response(),
                Some(session_cookie(&token)),
            )
        },
    }
}

/// Resolve the request's session, creating one when the cookie is absent
/// or no longer maps to a live session. Returns the token and, when a
/// session was created, the Set-Cookie value the response must carry.
async fn establish_session<S>(
    state: &AppState<S>,
    headers: &HeaderMap,
) -> (String, Option<String>) {
    if let Some(token) = session_token(headers) {
        if state.sessions.get(&token).await.is_some() {
            return (token, None);
        }
    }
    let token = state.sessions.create().await;
    let cookie = session_cookie(&token);
    (token, Some(cookie))
}

/// Extract the session token from the Cookie header.
fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

/// Set-Cookie value for a freshly issued session token.
fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

fn with_cookie(mut response: Response, cookie: Option<String>) -> Response {
    if let Some(cookie) = cookie {
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().insert(header::SET_COOKIE, value);
        }
    }
    response
}
