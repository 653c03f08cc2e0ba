use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

use crate::models::user::UserSchema;

// The server row joined with its owner. Owner columns are optional because of the left join.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct ServerRow {
    pub name: String,
    pub university: String,
    pub monetization_link: Option<String>,
    pub motd: Option<String>,
    pub owner_id: i32,
    pub owner_uid: Option<i32>,
    pub owner_email: Option<String>,
    pub owner_username: Option<String>,
}

// The struct used to respond with the server state as json
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ServerSchema {
    pub name: String,
    pub university: String,
    pub monetization_link: Option<String>,
    pub motd: Option<String>,
    pub owner_id: i32,
    pub owner: Option<UserSchema>,
}

// The struct used for receiving a partial update of the server as json. Omitted fields are left untouched.
#[derive(Deserialize, Debug)]
pub struct ServerUpdate {
    pub name: Option<String>,
    pub university: Option<String>,
    pub monetization_link: Option<String>,
    pub motd: Option<String>,
    pub owner_id: Option<i32>,
}

// The struct used to answer the planetarium master server
#[derive(Deserialize, Serialize, Debug, PartialEq)]
pub struct Planetarium {
    pub version: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub server: ServerSchema,
}

pub const PLANETARIUM_TYPE: &str = "Erre2";

impl ServerRow {
    pub fn owner(&self) -> Option<UserSchema> {
        match (self.owner_uid, &self.owner_email, &self.owner_username) {
            (Some(uid), Some(email), Some(username)) => Some(UserSchema {
                uid,
                email: email.clone(),
                username: username.clone(),
            }),
            _ => None,
        }
    }

    pub fn to_schema(self) -> ServerSchema {
        let owner = self.owner();
        ServerSchema { owner, ..self.to_schema_without_owner() }
    }

    pub fn to_schema_without_owner(self) -> ServerSchema {
        ServerSchema {
            name: self.name,
            university: self.university,
            monetization_link: self.monetization_link,
            motd: self.motd,
            owner_id: self.owner_id,
            owner: None,
        }
    }
}

impl Planetarium {
    pub fn new(version: &str, server: ServerSchema) -> Planetarium {
        Planetarium {
            version: version.to_string(),
            kind: PLANETARIUM_TYPE.to_string(),
            server,
        }
    }
}

const SELECT_SERVER: &str = "SELECT s.name, s.university, s.monetization_link, s.motd, s.owner_id, \
    u.uid AS owner_uid, u.email AS owner_email, u.username AS owner_username \
    FROM server s LEFT JOIN user u ON u.uid = s.owner_id LIMIT 1";

// Fetch the single server row together with its owner. None if the server was never configured.
pub async fn fetch_server(pool: &MySqlPool) -> Result<Option<ServerRow>, sqlx::Error> {
    sqlx::query_as::<_, ServerRow>(SELECT_SERVER)
        .fetch_optional(pool)
        .await
}

// Apply a partial update to the server row and return the fresh row.
// COALESCE keeps the stored value for every field missing from the payload.
pub async fn update_server(pool: &MySqlPool, update: &ServerUpdate) -> Result<Option<ServerRow>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let sql = "UPDATE server SET name=COALESCE(?, name), university=COALESCE(?, university), \
        monetization_link=COALESCE(?, monetization_link), motd=COALESCE(?, motd), owner_id=COALESCE(?, owner_id)";
    sqlx::query(sql)
        .bind(&update.name)
        .bind(&update.university)
        .bind(&update.monetization_link)
        .bind(&update.motd)
        .bind(update.owner_id)
        .execute(&mut tx)
        .await?;

    let server = sqlx::query_as::<_, ServerRow>(SELECT_SERVER)
        .fetch_optional(&mut tx)
        .await?;

    tx.commit().await?;
    Ok(server)
}
