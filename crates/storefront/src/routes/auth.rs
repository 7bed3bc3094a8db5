//! Admin login and logout handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{PageContext, clear_admin, push_flash, set_admin};
use crate::models::Flash;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub page: PageContext,
    pub username: String,
}

/// Display the login page.
#[instrument(skip(page))]
pub async fn login_page(page: PageContext) -> LoginTemplate {
    LoginTemplate {
        page,
        username: String::new(),
    }
}

/// Handle login form submission.
///
/// Success sets the admin flag and goes to the dashboard. A failure renders
/// the form again with the username kept.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let auth = AuthService::new(&state.config().admin);

    match auth.verify_admin(&form.username, &form.password) {
        Ok(()) => {
            set_admin(&session).await?;
            set_sentry_user(&form.username);
            tracing::info!(username = %form.username, "Admin logged in");

            push_flash(&session, Flash::success("You are now logged in as admin!")).await?;
            Ok(Redirect::to("/admin_dashboard").into_response())
        }
        Err(e) => {
            tracing::warn!(username = %form.username, error = %e, "Admin login failed");

            let page = PageContext::load(&session)
                .await?
                .with_flash(Flash::danger("Invalid username or password."));
            Ok(LoginTemplate {
                page,
                username: form.username,
            }
            .into_response())
        }
    }
}

/// Clear the admin flag. The cart survives.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_admin(&session).await?;
    clear_sentry_user();
    tracing::info!("Admin logged out");

    push_flash(&session, Flash::info("You have been logged out of the admin panel.")).await?;
    Ok(Redirect::to("/"))
}
