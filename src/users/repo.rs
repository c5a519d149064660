use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The `User` columns minus the hash; used wherever the hash must never even
/// be selected (FindByEmail, DeleteUser).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl User {
    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await
    }

    pub async fn email_taken(db: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(db)
            .await
    }

    pub async fn username_taken(db: &PgPool, username: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(db)
            .await
    }

    pub async fn exists(db: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(db)
            .await
    }

    pub async fn create(
        db: &PgPool,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await
    }

    /// With a new hash the stored one is replaced; without, it is untouched.
    pub async fn update(
        db: &PgPool,
        id: i64,
        username: &str,
        email: &str,
        password_hash: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        match password_hash {
            Some(hash) => {
                sqlx::query_as::<_, User>(
                    r#"
                    UPDATE users SET username = $2, email = $3, password_hash = $4
                    WHERE id = $1
                    RETURNING id, username, email, password_hash, created_at
                    "#,
                )
                .bind(id)
                .bind(username)
                .bind(email)
                .bind(hash)
                .fetch_optional(db)
                .await
            }
            None => {
                sqlx::query_as::<_, User>(
                    r#"
                    UPDATE users SET username = $2, email = $3
                    WHERE id = $1
                    RETURNING id, username, email, password_hash, created_at
                    "#,
                )
                .bind(id)
                .bind(username)
                .bind(email)
                .fetch_optional(db)
                .await
            }
        }
    }
}

impl PublicUser {
    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Vec<PublicUser>, sqlx::Error> {
        sqlx::query_as::<_, PublicUser>(
            r#"
            SELECT id, username, email, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_all(db)
        .await
    }

    pub async fn delete(db: &PgPool, id: i64) -> Result<Option<PublicUser>, sqlx::Error> {
        sqlx::query_as::<_, PublicUser>(
            r#"
            DELETE FROM users
            WHERE id = $1
            RETURNING id, username, email, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }
}
