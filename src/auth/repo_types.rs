use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use super::password::HashedPassword;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String, // trimmed and lower-cased
    pub name: String,
    pub password_hash: String, // argon2 PHC string
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub deleted_at: Option<OffsetDateTime>,
}

/// Validated input for [`UserStore::create`](super::repo::UserStore::create).
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: HashedPassword,
}
