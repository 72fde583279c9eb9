use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use diesel::SqliteConnection;
use http::header;
use log::{error, info};

use super::AdminState;
use crate::auth::{verify_password, BasicCredentials};
use crate::errors::NotAuthorized;
use crate::handler::WithDB;
use crate::models::User;

/// Returns the user only when they exist, are staff and the password matches.
pub fn authenticate(
    conn: &mut SqliteConnection,
    credentials: &BasicCredentials,
) -> Result<Option<User>, anyhow::Error> {
    let user = match User::by_username(conn, &credentials.username)? {
        Some(user) if user.is_staff => user,
        _ => return Ok(None),
    };
    if verify_password(&credentials.password, &user.password_hash)? {
        Ok(Some(user))
    } else {
        Ok(None)
    }
}

pub async fn require_staff(State(state): State<Arc<AdminState>>, request: Request, next: Next) -> Response {
    let not_authorized = || {
        NotAuthorized {
            realm: state.realm.clone(),
        }
        .into_response()
    };

    let credentials = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(BasicCredentials::from_header);
    let credentials = match credentials {
        Some(credentials) => credentials,
        None => return not_authorized(),
    };

    let user = match state.db.dbconn() {
        Ok(mut conn) => authenticate(&mut conn, &credentials),
        Err(e) => return http::StatusCode::from(e).into_response(),
    };

    match user {
        Ok(Some(_)) => next.run(request).await,
        Ok(None) => {
            info!("rejected admin login for {:?}", credentials.username);
            not_authorized()
        }
        Err(e) => {
            error!("{:?}", e);
            http::StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
