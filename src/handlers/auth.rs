//! Handler for the OAuth login endpoint.

use actix_web::{web, HttpRequest, HttpResponse};
use std::fmt;

use crate::metrics::Metrics;
use crate::models::{LoginError, LoginRequest, LoginResponse, UserRole};
use crate::services::{DynOAuthProvider, DynSessionSigner};
use crate::storage::DynStorage;

/// Log a client-input rejection and hand the failure back for the response.
fn reject(req: &HttpRequest, failure: LoginError, reason: impl fmt::Display) -> LoginError {
    tracing::warn!(
        method = %req.method(),
        uri = %req.uri(),
        reason = %reason,
        "{}",
        failure.message()
    );
    failure
}

/// Log a server-side failure and hand it back for the response.
fn fail(req: &HttpRequest, failure: LoginError, cause: impl fmt::Display) -> LoginError {
    tracing::error!(
        method = %req.method(),
        uri = %req.uri(),
        error = %cause,
        "{}",
        failure.message()
    );
    failure
}

/// `POST /oauth`
///
/// Completes the GitHub login flow: authorization code → access token →
/// user identity → registration check → session JWT. The pipeline is
/// strictly sequential; the first failure is terminal, logged exactly once
/// here at the point of detection, and mapped to its contractual status and
/// plain-text body by [`LoginError`].
pub async fn login(
    req: HttpRequest,
    body: web::Bytes,
    storage: web::Data<DynStorage>,
    oauth: web::Data<DynOAuthProvider>,
    signer: web::Data<DynSessionSigner>,
    metrics: web::Data<Metrics>,
) -> Result<HttpResponse, LoginError> {
    let fields: LoginRequest = serde_json::from_slice(&body)
        .map_err(|err| reject(&req, LoginError::MalformedBody, err))?;

    if fields.code.is_empty() || fields.role.is_empty() {
        return Err(reject(
            &req,
            LoginError::EmptyBodyParameters,
            "empty code or type field",
        ));
    }

    // The role set is closed; an unknown value is a client error, not a
    // silently-skipped lookup.
    let role = UserRole::parse(&fields.role).ok_or_else(|| {
        reject(
            &req,
            LoginError::MalformedBody,
            format!("unknown role `{}`", fields.role),
        )
    })?;

    let access_token = oauth
        .exchange_code(&fields.code)
        .await
        .map_err(|err| fail(&req, LoginError::AccessTokenExchange, err))?;

    let user_info = oauth
        .fetch_user(&access_token)
        .await
        .map_err(|err| fail(&req, LoginError::UserInfoFetch, err))?;

    let registered = match role {
        UserRole::Student => storage
            .get_student_by_username(&user_info.username)
            .await
            .map(|row| row.is_some()),
        UserRole::Mentor => storage
            .get_mentor_by_username(&user_info.username)
            .await
            .map(|row| row.is_some()),
    }
    .map_err(|err| fail(&req, LoginError::DatabaseUnavailable, err))?;
    let is_new_user = !registered;

    let jwt = signer
        .sign(&user_info.username)
        .map_err(|err| fail(&req, LoginError::JwtSigning, err))?;

    let response = LoginResponse {
        username: user_info.username,
        name: user_info.name,
        email: user_info.email,
        role,
        is_new_user,
        jwt,
    };

    let body = serde_json::to_string(&response)
        .map_err(|err| fail(&req, LoginError::ResponseEncoding, err))?;

    metrics
        .oauth_logins_total
        .with_label_values(&[role.as_str(), if is_new_user { "new" } else { "returning" }])
        .inc();

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .body(body))
}
