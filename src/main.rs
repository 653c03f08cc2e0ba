use axum::{ extract::Extension, routing::get, Router,
    headers::{Authorization, authorization::Bearer}
};
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use simplelog::{Config as LogConfig, SimpleLogger};
mod config;
mod errors;
mod controllers;
mod models;
#[cfg(test)]
mod test_utils;
use jsonwebtoken::{decode, DecodingKey, Validation};
use crate::config::Config;
use crate::errors::CustomError;
use crate::models::user::{fetch_user_by_username, User};

// The claims struct used for creating a Bearer token
#[derive(Deserialize, Serialize, Debug)]
pub struct Claims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

// Shared immutable state
#[derive(Clone)]
pub struct AppState {
    pub jwt_secret: String,
    pub token_duration: i64,
    pub version: String,
}

impl From<&Config> for AppState {
    fn from(config: &Config) -> Self {
        AppState {
            jwt_secret: config.jwt_secret.clone(),
            token_duration: config.token_duration,
            version: config.version.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {

    // Retrieve the settings from the environment, bail out if something mandatory is missing
    let config = Config::from_env()?;

    // set up logging facility
    let _ = SimpleLogger::init(config.log_level, LogConfig::default());
    info!("Starting erre2 server {}..", config.version);

    let pool = MySqlPoolOptions::new()
        .connect(&config.database_url)
        .await?;

    let app = app(AppState::from(&config), pool);

    debug!("Listening on {}", config.bind_address);
    axum::Server::bind(&config.bind_address)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Stopped");
    Ok(())
}

// Define routes. FastAPI-style clients may call the server endpoints with or without the trailing slash.
pub fn app(state: AppState, pool: MySqlPool) -> Router {
    Router::new()
        .route("/login", get(controllers::user::login))
        .route("/server", get(controllers::server::read_server).patch(controllers::server::patch_server))
        .route("/server/", get(controllers::server::read_server).patch(controllers::server::patch_server))
        .route("/server/planetarium", get(controllers::server::planetarium_retrieve))
        .with_state(state)
        .layer(Extension(pool))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Unable to listen for the shutdown signal: {:?}", err);
    }
    info!("Shutdown signal received");
}

// Helper function to check if a bearer token is valid (user is logged in).
// The JWT secret is retrieved from the state shared across all handlers (fetched from an env in main)
pub fn check_access(state: &AppState, bearer: Option<&Authorization<Bearer>>) -> Result<String, CustomError> {

    let bearer = bearer.ok_or_else(|| {
        error!("No bearer token in request");
        CustomError::InvalidToken
    })?;

    // Decode the Bearer token from the header. When succesfull return decoded user_name (sub field)
    match decode::<Claims>(
        bearer.token(),
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &Validation::default(),
    ) {
        Ok(token_data) => Ok(token_data.claims.sub),
        Err(err) => {
            error!("Invalid token: {:?}", err.kind());
            Err(CustomError::InvalidToken)
        }
    }
}

// Resolve the logged in user. A valid token for a user that no longer exists is treated as an invalid token.
pub async fn current_user(state: &AppState, pool: &MySqlPool, bearer: Option<&Authorization<Bearer>>) -> Result<User, CustomError> {

    let user_name = check_access(state, bearer)?;

    match fetch_user_by_username(pool, &user_name).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => {
            error!("Token subject {} is not a known user", user_name);
            Err(CustomError::InvalidToken)
        }
        Err(err) => {
            error!("error retrieving user: {:?}", err);
            Err(CustomError::InternalServerError)
        }
    }
}

// The protocol version reported to the planetarium
pub fn erre2_version(state: &AppState) -> &str {
    &state.version
}
