use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

#[derive(Deserialize, Serialize, sqlx::FromRow, Debug)]
pub struct User {
    pub uid: i32,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

// The public projection of a user, embedded as the owner of the server
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct UserSchema {
    pub uid: i32,
    pub email: String,
    pub username: String,
}

// The struct used to respond with an official json for the bearer token
#[derive(Deserialize, Serialize, Debug)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

pub async fn fetch_user_by_username(pool: &MySqlPool, username: &str) -> Result<Option<User>, sqlx::Error> {
    let sql = "SELECT uid, email, username, password_hash FROM user WHERE username = ?";
    sqlx::query_as::<_, User>(sql)
        .bind(username)
        .fetch_optional(pool)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User {
            uid: 1,
            email: "owner@example.org".to_string(),
            username: "owner".to_string(),
            password_hash: "$2b$12$hash".to_string(),
        };
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("password_hash").is_none());
        assert_eq!(value, json!({"uid": 1, "email": "owner@example.org", "username": "owner"}));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn fetch_user_by_username_finds_stored_user(pool: MySqlPool) {
        let uid = crate::test_utils::create_test_user(&pool, "owner", "owner@example.org", "pw").await;

        let user = fetch_user_by_username(&pool, "owner").await.unwrap().unwrap();
        assert_eq!(user.uid, uid);
        assert_eq!(user.email, "owner@example.org");
        assert!(pwhash::bcrypt::verify("pw", &user.password_hash));

        assert!(fetch_user_by_username(&pool, "nobody").await.unwrap().is_none());
    }
}
