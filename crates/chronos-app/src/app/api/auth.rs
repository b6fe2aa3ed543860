use salvo::{Depot, Request, Response, Router, handler, http::StatusCode, writing::Json};

use chronos_core::constants::AUTH_ROUTE_COMPONENT;
use chronos_service::auth::service::{
    self as auth_service, ForgotPasswordRequest, LoginRequest, RefreshRequest, RegisterRequest,
    ResetPasswordRequest,
};
use chronos_service::mail::get_mailer_from_depot;

use super::util::{parse_body, require_user_id};
use crate::config::get_config_from_depot;
use crate::db_handler::get_db_from_depot;
use crate::error::AppError;

/// ## Summary
/// POST /api/auth/register - Create an account and sign in
///
/// ## Side Effects
/// - Creates an inactive user
/// - Stores a refresh session
/// - Sends an activation mail
///
/// ## Errors
/// Returns HTTP 400 for invalid input or an email that is already registered
#[handler]
async fn register(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let body: RegisterRequest = match parse_body(req).await {
        Ok(b) => b,
        Err(e) => return e.render(res),
    };
    let config = match get_config_from_depot(depot) {
        Ok(c) => c,
        Err(e) => return e.render(res),
    };
    let mailer = match get_mailer_from_depot(depot) {
        Ok(m) => m,
        Err(e) => return AppError::from(e).render(res),
    };
    let provider = match get_db_from_depot(depot) {
        Ok(p) => p,
        Err(e) => return e.render(res),
    };
    let mut conn = match provider.get_connection().await {
        Ok(c) => c,
        Err(e) => return AppError::from(e).render(res),
    };

    match auth_service::register(&mut conn, &config, mailer.as_ref(), &body).await {
        Ok(pair) => {
            res.status_code(StatusCode::CREATED);
            res.render(Json(pair));
        }
        Err(e) => AppError::from(e).render(res),
    }
}

/// ## Summary
/// POST /api/auth/login - Exchange email and password for a token pair
///
/// ## Errors
/// Returns HTTP 400 if the credentials do not match
#[handler]
async fn login(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let body: LoginRequest = match parse_body(req).await {
        Ok(b) => b,
        Err(e) => return e.render(res),
    };
    let config = match get_config_from_depot(depot) {
        Ok(c) => c,
        Err(e) => return e.render(res),
    };
    let provider = match get_db_from_depot(depot) {
        Ok(p) => p,
        Err(e) => return e.render(res),
    };
    let mut conn = match provider.get_connection().await {
        Ok(c) => c,
        Err(e) => return AppError::from(e).render(res),
    };

    match auth_service::login(&mut conn, &config, &body).await {
        Ok(pair) => res.render(Json(pair)),
        Err(e) => AppError::from(e).render(res),
    }
}

/// ## Summary
/// POST /api/auth/refresh - Trade a refresh token for a new token pair
///
/// ## Errors
/// Returns HTTP 403 if the refresh token is invalid or already used
#[handler]
async fn refresh(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let body: RefreshRequest = match parse_body(req).await {
        Ok(b) => b,
        Err(e) => return e.render(res),
    };
    let config = match get_config_from_depot(depot) {
        Ok(c) => c,
        Err(e) => return e.render(res),
    };
    let provider = match get_db_from_depot(depot) {
        Ok(p) => p,
        Err(e) => return e.render(res),
    };
    let mut conn = match provider.get_connection().await {
        Ok(c) => c,
        Err(e) => return AppError::from(e).render(res),
    };

    match auth_service::refresh(&mut conn, &config, &body.refresh_token).await {
        Ok(pair) => res.render(Json(pair)),
        Err(e) => AppError::from(e).render(res),
    }
}

/// ## Summary
/// POST /api/auth/logout - Revoke a refresh token
#[handler]
async fn logout(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let body: RefreshRequest = match parse_body(req).await {
        Ok(b) => b,
        Err(e) => return e.render(res),
    };
    let config = match get_config_from_depot(depot) {
        Ok(c) => c,
        Err(e) => return e.render(res),
    };
    let provider = match get_db_from_depot(depot) {
        Ok(p) => p,
        Err(e) => return e.render(res),
    };
    let mut conn = match provider.get_connection().await {
        Ok(c) => c,
        Err(e) => return AppError::from(e).render(res),
    };

    match auth_service::logout(&mut conn, &config, &body.refresh_token).await {
        Ok(done) => res.render(Json(done)),
        Err(e) => AppError::from(e).render(res),
    }
}

/// ## Summary
/// POST /api/auth/activate/{token} - Activate the caller's account
///
/// ## Errors
/// Returns HTTP 401 for public requests and HTTP 400 for a bad token
#[handler]
async fn activate(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let user_id = match require_user_id(depot) {
        Ok(id) => id,
        Err(e) => return e.render(res),
    };
    let Some(token) = req.param::<String>("token") else {
        return AppError::BadRequest("token is required".to_string()).render(res);
    };
    let config = match get_config_from_depot(depot) {
        Ok(c) => c,
        Err(e) => return e.render(res),
    };
    let provider = match get_db_from_depot(depot) {
        Ok(p) => p,
        Err(e) => return e.render(res),
    };
    let mut conn = match provider.get_connection().await {
        Ok(c) => c,
        Err(e) => return AppError::from(e).render(res),
    };

    match auth_service::activate(&mut conn, &config, &token, user_id).await {
        Ok(done) => res.render(Json(done)),
        Err(e) => AppError::from(e).render(res),
    }
}

/// ## Summary
/// POST /api/auth/forgot-password - Mail a password reset link
///
/// ## Errors
/// Returns HTTP 400 if no account uses the email
#[handler]
async fn forgot_password(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let body: ForgotPasswordRequest = match parse_body(req).await {
        Ok(b) => b,
        Err(e) => return e.render(res),
    };
    let config = match get_config_from_depot(depot) {
        Ok(c) => c,
        Err(e) => return e.render(res),
    };
    let mailer = match get_mailer_from_depot(depot) {
        Ok(m) => m,
        Err(e) => return AppError::from(e).render(res),
    };
    let provider = match get_db_from_depot(depot) {
        Ok(p) => p,
        Err(e) => return e.render(res),
    };
    let mut conn = match provider.get_connection().await {
        Ok(c) => c,
        Err(e) => return AppError::from(e).render(res),
    };

    match auth_service::send_reset_password_link(&mut conn, &config, mailer.as_ref(), &body).await
    {
        Ok(done) => res.render(Json(done)),
        Err(e) => AppError::from(e).render(res),
    }
}

/// ## Summary
/// POST /api/auth/reset-password - Set a new password with a reset token
///
/// ## Side Effects
/// Revokes every refresh session of the user
#[handler]
async fn reset_password(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let body: ResetPasswordRequest = match parse_body(req).await {
        Ok(b) => b,
        Err(e) => return e.render(res),
    };
    let config = match get_config_from_depot(depot) {
        Ok(c) => c,
        Err(e) => return e.render(res),
    };
    let provider = match get_db_from_depot(depot) {
        Ok(p) => p,
        Err(e) => return e.render(res),
    };
    let mut conn = match provider.get_connection().await {
        Ok(c) => c,
        Err(e) => return AppError::from(e).render(res),
    };

    match auth_service::reset_password(&mut conn, &config, &body).await {
        Ok(done) => res.render(Json(done)),
        Err(e) => AppError::from(e).render(res),
    }
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(AUTH_ROUTE_COMPONENT)
        .push(Router::with_path("register").post(register))
        .push(Router::with_path("login").post(login))
        .push(Router::with_path("refresh").post(refresh))
        .push(Router::with_path("logout").post(logout))
        .push(Router::with_path("activate/{token}").post(activate))
        .push(Router::with_path("forgot-password").post(forgot_password))
        .push(Router::with_path("reset-password").post(reset_password))
}
