use axum::{
    Extension, Json, response::IntoResponse,
    extract::{TypedHeader, State, rejection::JsonRejection},
    headers::{Authorization, authorization::Bearer},
    http::StatusCode,
};
use sqlx::MySqlPool;
use log::{error, info};
use crate::models::server::{self, Planetarium, ServerUpdate};
use crate::errors::CustomError;

use crate::AppState;
use crate::{current_user, erre2_version};

//handler for getting the current state of the server. this request can be done without any auth
pub async fn read_server(   State(_state): State<AppState>,
                            Extension(pool): Extension<MySqlPool>
                            ) -> Result<impl IntoResponse, CustomError> {

    info!("server request");

    match server::fetch_server(&pool).await {
        Ok(Some(row)) => Ok((StatusCode::OK, Json(row.to_schema()))),
        Ok(None) => {
            error!("Server info requested but the server table is empty");
            Err(CustomError::ServerNotFound)
        }
        Err(err) => {
            error!("Unexpected error fetching server info. Error: {:?}", err);
            Err(CustomError::InternalServerError)
        }
    }
}

// Handler for updating the server. Any logged in user may do this, the owner sub-object is not returned.
pub async fn patch_server(  State(state): State<AppState>,
                            Extension(pool): Extension<MySqlPool>,
                            bearer: Option<TypedHeader<Authorization<Bearer>>>,
                            body: Result<Json<ServerUpdate>, JsonRejection>,
                            ) -> Result<impl IntoResponse, CustomError> {

    info!("Update server request");

    //check if user is logged in, bail out if not. This goes before the body so anonymous requests always get a 401
    let user = current_user(&state, &pool, bearer.as_ref().map(|TypedHeader(b)| b)).await?;

    let Json(update) = body.map_err(|rejection| {
        error!("Invalid server update payload: {}", rejection);
        CustomError::BadRequest
    })?;

    match server::update_server(&pool, &update).await {
        Ok(Some(row)) => {
            info!("Server updated by {}", user.username);
            Ok((StatusCode::OK, Json(row.to_schema_without_owner())))
        }
        Ok(None) => Err(CustomError::ServerNotFound),
        Err(err) => {
            error!("Error updating server: {:?}", err);
            Err(update_error(err))
        }
    }
}

// Only an error reported by the database itself (constraint violation, bad value) is the client's fault
fn update_error(err: sqlx::Error) -> CustomError {
    match err {
        sqlx::Error::Database(_) => CustomError::BadRequest,
        _ => CustomError::InternalServerError,
    }
}

// Handler answering the planetarium master server with our metadata and protocol version
pub async fn planetarium_retrieve(  State(state): State<AppState>,
                                    Extension(pool): Extension<MySqlPool>
                                    ) -> Result<impl IntoResponse, CustomError> {

    info!("planetarium request");

    let version = erre2_version(&state);

    match server::fetch_server(&pool).await {
        Ok(Some(row)) => Ok((StatusCode::OK, Json(Planetarium::new(version, row.to_schema())))),
        Ok(None) => {
            error!("Planetarium requested but the server table is empty");
            Err(CustomError::ServerNotFound)
        }
        Err(err) => {
            error!("Unexpected error fetching server info for planetarium. Error: {:?}", err);
            Err(CustomError::InternalServerError)
        }
    }
}
