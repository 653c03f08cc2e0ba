use axum::{
    Extension, Json, response::IntoResponse,
    extract::{TypedHeader, State},
    headers::{Authorization, authorization::Basic},
    http::StatusCode,
};
use sqlx::MySqlPool;
use log::{debug, error, info};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use pwhash::bcrypt;

use crate::models::user::*;
use crate::errors::CustomError;
use crate::Claims;
use crate::AppState;

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////
//handler logging in. We extract Basic authentication to retrieve username and password from db. If password
//checks out we generate and return the JWT Bearer token which has the expiration encoded within
///////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn login( State(state): State<AppState>,
                    Extension(pool): Extension<MySqlPool>,
                    TypedHeader(basic): TypedHeader<Authorization<Basic>>
                    ) -> Result<impl IntoResponse, CustomError> {

    info!("login request by user: {}", basic.username());

    // Fetch the user using the username from the basic authentication header
    let user = fetch_user_by_username(&pool, basic.username())
        .await
        .map_err(|err| {
            error!("error retrieving user: {:?}", err);
            CustomError::InternalServerError
        })?
        .ok_or(CustomError::UserNotFound)?;

    //Check password hash is equal to stored password hash. if not, error out
    if !bcrypt::verify(basic.password(), &user.password_hash) {
        error!("Wrong password for user: {}", user.username);
        return Err(CustomError::WrongPassword);
    }

    let token = issue_token(&state, &user.username)?;
    debug!("Generated token for {}", user.username);

    Ok((StatusCode::OK, Json(AuthResponse{access_token: token, token_type: "bearer".to_string(), expires_in: state.token_duration})))
}

// Encode a bearer token for the given user name, valid for the configured token duration
pub fn issue_token(state: &AppState, username: &str) -> Result<String, CustomError> {

    // Define the registered <Expiration Time> claim (exp) which is the current timestmap plus the defined offset
    let now = Utc::now();
    let exp = now
        .checked_add_signed(Duration::seconds(state.token_duration))
        .ok_or_else(|| {
            error!("Token duration {} overflows the clock", state.token_duration);
            CustomError::InternalServerError
        })?;

    let claims = Claims {
        sub: username.to_string(),          // username
        iat: now.timestamp() as usize,      // valid from
        exp: exp.timestamp() as usize,      // valid until
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.jwt_secret.as_bytes())
    ).map_err(|err| {
        error!("Unexpected error while encoding the bearer token ({:?})", err);
        CustomError::InternalServerError
    })
}
