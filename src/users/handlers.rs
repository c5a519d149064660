use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::{info, instrument, warn};

use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::state::AppState;

use super::dto::{DeleteUserParams, FindUserParams, LoginParams, RegisterParams, UpdateUserParams};
use super::password::{hash_password, verify_password};
use super::repo::{PublicUser, User};

#[instrument(skip(state, query, body))]
pub async fn register(
    State(state): State<AppState>,
    Query(query): Query<RegisterParams>,
    body: Option<Json<RegisterParams>>,
) -> Result<(StatusCode, Json<Envelope<User>>), ApiError> {
    let p = body.map(|Json(b)| b).unwrap_or_default().or(query);
    let (Some(username), Some(email), Some(password)) = (p.username, p.email, p.password) else {
        return Err(ApiError::validation(
            "Username, email and password are required",
        ));
    };

    if User::email_taken(&state.db, &email).await? {
        warn!(%email, "email already used");
        return Err(ApiError::conflict("Email already used"));
    }
    if User::username_taken(&state.db, &username).await? {
        warn!(%username, "username already taken");
        return Err(ApiError::conflict("Username already taken"));
    }

    let hash = hash_password(&password)?;
    let user = User::create(&state.db, &username, &email, &hash).await?;

    info!(user_id = user.id, %email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(Envelope::success("User created", user)),
    ))
}

#[instrument(skip(state, query, body))]
pub async fn login(
    State(state): State<AppState>,
    Query(query): Query<LoginParams>,
    body: Option<Json<LoginParams>>,
) -> Result<(StatusCode, Json<Envelope<User>>), ApiError> {
    let p = body.map(|Json(b)| b).unwrap_or_default().or(query);
    let (Some(email), Some(password)) = (p.email, p.password) else {
        return Err(ApiError::validation("Email and password are required"));
    };

    // Unknown email and wrong password take the same exit path.
    let Some(user) = User::find_by_email(&state.db, &email).await? else {
        warn!(%email, "login with unknown email");
        return Err(ApiError::InvalidCredentials);
    };
    if !verify_password(&password, &user.password_hash)? {
        warn!(%email, user_id = user.id, "login with wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    info!(user_id = user.id, %email, "user logged in");
    Ok((
        StatusCode::OK,
        Json(Envelope::success("Login successful", user)),
    ))
}

#[instrument(skip(state, query, body))]
pub async fn find_user(
    State(state): State<AppState>,
    Path(path_email): Path<String>,
    Query(query): Query<FindUserParams>,
    body: Option<Json<FindUserParams>>,
) -> Result<(StatusCode, Json<Envelope<Vec<PublicUser>>>), ApiError> {
    let p = body
        .map(|Json(b)| b)
        .unwrap_or_default()
        .or(query)
        .or(FindUserParams {
            email: Some(path_email),
        });
    let Some(email) = p.email else {
        return Err(ApiError::validation("Email is required"));
    };

    let users = PublicUser::find_by_email(&state.db, &email).await?;
    if users.is_empty() {
        return Err(ApiError::not_found("User not found"));
    }
    Ok((StatusCode::OK, Json(Envelope::success("User found", users))))
}

#[instrument(skip(state, query, body))]
pub async fn update_user(
    State(state): State<AppState>,
    Query(query): Query<UpdateUserParams>,
    body: Option<Json<UpdateUserParams>>,
) -> Result<(StatusCode, Json<Envelope<User>>), ApiError> {
    let p = body.map(|Json(b)| b).unwrap_or_default().or(query);
    let (Some(id), Some(username), Some(email)) = (p.id, p.username, p.email) else {
        return Err(ApiError::validation("ID, username and email are required"));
    };
    let id = id
        .as_i64()
        .ok_or_else(|| ApiError::validation("ID must be a number"))?;

    // Only re-hash when a new password was supplied.
    let hash = match p.password {
        Some(password) => Some(hash_password(&password)?),
        None => None,
    };

    let user = User::update(&state.db, id, &username, &email, hash.as_deref())
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    info!(user_id = id, "user updated");
    Ok((
        StatusCode::OK,
        Json(Envelope::success("User updated", user)),
    ))
}

#[instrument(skip(state, query, body))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(path_id): Path<String>,
    Query(query): Query<DeleteUserParams>,
    body: Option<Json<DeleteUserParams>>,
) -> Result<(StatusCode, Json<Envelope<PublicUser>>), ApiError> {
    let p = body
        .map(|Json(b)| b)
        .unwrap_or_default()
        .or(query)
        .or(DeleteUserParams {
            id: Some(path_id.into()),
        });
    let Some(id) = p.id else {
        return Err(ApiError::validation("ID is required"));
    };
    let id = id
        .as_i64()
        .ok_or_else(|| ApiError::validation("ID must be a number"))?;

    let user = PublicUser::delete(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    info!(user_id = id, "user deleted");
    Ok((
        StatusCode::OK,
        Json(Envelope::success("User deleted", user)),
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sqlx::PgPool;

    use super::*;
    use crate::config::AppConfig;
    use crate::params::RawParam;

    fn test_state(pool: PgPool) -> AppState {
        AppState {
            db: pool,
            config: Arc::new(AppConfig {
                database_url: String::new(),
                host: "127.0.0.1".into(),
                port: 0,
                db_max_connections: 5,
            }),
        }
    }

    fn register_params(username: &str, email: &str, password: &str) -> RegisterParams {
        RegisterParams {
            username: Some(username.into()),
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    async fn register_user(state: &AppState, username: &str, email: &str, password: &str) -> User {
        let (status, Json(env)) = register(
            State(state.clone()),
            Query(RegisterParams::default()),
            Some(Json(register_params(username, email, password))),
        )
        .await
        .expect("register should succeed");
        assert_eq!(status, StatusCode::CREATED);
        env.payload.expect("created user in payload")
    }

    async fn login_user(state: &AppState, email: &str, password: &str) -> Result<User, ApiError> {
        login(
            State(state.clone()),
            Query(LoginParams::default()),
            Some(Json(LoginParams {
                email: Some(email.into()),
                password: Some(password.into()),
            })),
        )
        .await
        .map(|(_, Json(env))| env.payload.expect("logged-in user in payload"))
    }

    #[sqlx::test]
    async fn duplicate_email_is_rejected_and_one_row_kept(pool: PgPool) {
        let state = test_state(pool.clone());
        register_user(&state, "first", "same@example.com", "pw-one").await;

        let err = register(
            State(state.clone()),
            Query(RegisterParams::default()),
            Some(Json(register_params("second", "same@example.com", "pw-two"))),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
        assert_eq!(err.to_string(), "Email already used");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1")
            .bind("same@example.com")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[sqlx::test]
    async fn duplicate_username_is_rejected_and_one_row_kept(pool: PgPool) {
        let state = test_state(pool.clone());
        register_user(&state, "taken", "one@example.com", "pw-one").await;

        let err = register(
            State(state.clone()),
            Query(RegisterParams::default()),
            Some(Json(register_params("taken", "two@example.com", "pw-two"))),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
        assert_eq!(err.to_string(), "Username already taken");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = $1")
            .bind("taken")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[sqlx::test]
    async fn login_failures_share_one_message(pool: PgPool) {
        let state = test_state(pool);
        register_user(&state, "player", "player@example.com", "right-password").await;

        let wrong = login_user(&state, "player@example.com", "wrong-password")
            .await
            .unwrap_err();
        let unknown = login_user(&state, "ghost@example.com", "whatever")
            .await
            .unwrap_err();
        assert!(matches!(wrong, ApiError::InvalidCredentials));
        assert!(matches!(unknown, ApiError::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[sqlx::test]
    async fn update_without_password_keeps_old_login(pool: PgPool) {
        let state = test_state(pool);
        let user = register_user(&state, "player", "player@example.com", "pw-original").await;

        update_user(
            State(state.clone()),
            Query(UpdateUserParams::default()),
            Some(Json(UpdateUserParams {
                id: Some(RawParam::Int(user.id)),
                username: Some("renamed".into()),
                email: Some("player@example.com".into()),
                password: None,
            })),
        )
        .await
        .expect("update should succeed");

        let logged_in = login_user(&state, "player@example.com", "pw-original")
            .await
            .expect("old password should still authenticate");
        assert_eq!(logged_in.username, "renamed");
    }

    #[sqlx::test]
    async fn update_with_new_password_invalidates_old(pool: PgPool) {
        let state = test_state(pool);
        let user = register_user(&state, "player", "player@example.com", "pw-old").await;

        update_user(
            State(state.clone()),
            Query(UpdateUserParams::default()),
            Some(Json(UpdateUserParams {
                id: Some(RawParam::Int(user.id)),
                username: Some("player".into()),
                email: Some("player@example.com".into()),
                password: Some("pw-new".into()),
            })),
        )
        .await
        .expect("update should succeed");

        let err = login_user(&state, "player@example.com", "pw-old")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredentials));
        login_user(&state, "player@example.com", "pw-new")
            .await
            .expect("new password should authenticate");
    }
}
