use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::{info, instrument, warn};

use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::params::RawParam;
use crate::state::AppState;
use crate::users::repo::User;

use super::dto::{
    AddScoreParams, LeaderboardParams, ScoreIdParams, UpdateScoreParams, UserScoresParams,
};
use super::repo::{LeaderboardEntry, Score};

fn parse_score(raw: RawParam) -> Result<i64, ApiError> {
    raw.as_i64()
        .filter(|v| *v >= 0)
        .ok_or_else(|| ApiError::validation("Score must be a positive number"))
}

fn parse_id(raw: RawParam, message: &str) -> Result<i64, ApiError> {
    raw.as_i64()
        .ok_or_else(|| ApiError::validation(message))
}

#[instrument(skip(state, query, body))]
pub async fn add_score(
    State(state): State<AppState>,
    Query(query): Query<AddScoreParams>,
    body: Option<Json<AddScoreParams>>,
) -> Result<(StatusCode, Json<Envelope<Score>>), ApiError> {
    let p = body.map(|Json(b)| b).unwrap_or_default().or(query);
    let (Some(user_id), Some(score)) = (p.user_id, p.score) else {
        return Err(ApiError::validation("User ID and score are required"));
    };
    let score = parse_score(score)?;
    let user_id = parse_id(user_id, "User ID must be a number")?;

    // Explicit existence check before the insert; the FK only backstops the
    // race where the user disappears in between.
    if !User::exists(&state.db, user_id).await? {
        warn!(user_id, "score submitted for unknown user");
        return Err(ApiError::not_found("User not found"));
    }

    let row = Score::insert(&state.db, user_id, score).await?;
    info!(score_id = row.id, user_id, score, "score recorded");
    Ok((
        StatusCode::CREATED,
        Json(Envelope::success("Score recorded successfully", row)),
    ))
}

#[instrument(skip(state, query, body))]
pub async fn get_user_scores(
    State(state): State<AppState>,
    Path(path_user_id): Path<String>,
    Query(query): Query<UserScoresParams>,
    body: Option<Json<UserScoresParams>>,
) -> Result<(StatusCode, Json<Envelope<Vec<Score>>>), ApiError> {
    let p = body
        .map(|Json(b)| b)
        .unwrap_or_default()
        .or(query)
        .or(UserScoresParams {
            user_id: Some(path_user_id.into()),
        });
    let Some(user_id) = p.user_id else {
        return Err(ApiError::validation("User ID is required"));
    };
    let user_id = parse_id(user_id, "User ID must be a number")?;

    if !User::exists(&state.db, user_id).await? {
        return Err(ApiError::not_found("User not found"));
    }

    let scores = Score::list_by_user(&state.db, user_id).await?;
    Ok((
        StatusCode::OK,
        Json(Envelope::success("User scores retrieved", scores)),
    ))
}

#[instrument(skip(state, query, body))]
pub async fn get_score(
    State(state): State<AppState>,
    Path(path_id): Path<String>,
    Query(query): Query<ScoreIdParams>,
    body: Option<Json<ScoreIdParams>>,
) -> Result<(StatusCode, Json<Envelope<Score>>), ApiError> {
    let p = body
        .map(|Json(b)| b)
        .unwrap_or_default()
        .or(query)
        .or(ScoreIdParams {
            id: Some(path_id.into()),
        });
    let Some(id) = p.id else {
        return Err(ApiError::validation("Score ID is required"));
    };
    let id = parse_id(id, "Score ID must be a number")?;

    let score = Score::get(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Score not found"))?;
    Ok((
        StatusCode::OK,
        Json(Envelope::success("Score retrieved", score)),
    ))
}

#[instrument(skip(state, query, body))]
pub async fn update_score(
    State(state): State<AppState>,
    Query(query): Query<UpdateScoreParams>,
    body: Option<Json<UpdateScoreParams>>,
) -> Result<(StatusCode, Json<Envelope<Score>>), ApiError> {
    let p = body.map(|Json(b)| b).unwrap_or_default().or(query);
    let (Some(id), Some(score)) = (p.id, p.score) else {
        return Err(ApiError::validation("Score ID and value are required"));
    };
    let score = parse_score(score)?;
    let id = parse_id(id, "Score ID must be a number")?;

    // The owning user is not re-checked here; only the row must exist.
    let row = Score::update(&state.db, id, score)
        .await?
        .ok_or_else(|| ApiError::not_found("Score not found"))?;

    info!(score_id = id, score, "score updated");
    Ok((
        StatusCode::OK,
        Json(Envelope::success("Score updated", row)),
    ))
}

#[instrument(skip(state, query, body))]
pub async fn delete_score(
    State(state): State<AppState>,
    Path(path_id): Path<String>,
    Query(query): Query<ScoreIdParams>,
    body: Option<Json<ScoreIdParams>>,
) -> Result<(StatusCode, Json<Envelope<Score>>), ApiError> {
    let p = body
        .map(|Json(b)| b)
        .unwrap_or_default()
        .or(query)
        .or(ScoreIdParams {
            id: Some(path_id.into()),
        });
    let Some(id) = p.id else {
        return Err(ApiError::validation("Score ID is required"));
    };
    let id = parse_id(id, "Score ID must be a number")?;

    let row = Score::delete(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Score not found"))?;

    info!(score_id = id, "score deleted");
    Ok((
        StatusCode::OK,
        Json(Envelope::success("Score deleted", row)),
    ))
}

#[instrument(skip(state, query, body))]
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardParams>,
    body: Option<Json<LeaderboardParams>>,
) -> Result<(StatusCode, Json<Envelope<Vec<LeaderboardEntry>>>), ApiError> {
    let limit = body
        .map(|Json(b)| b)
        .unwrap_or_default()
        .or(query)
        .resolve_limit();

    let entries = Score::leaderboard(&state.db, limit).await?;
    Ok((
        StatusCode::OK,
        Json(Envelope::success("Leaderboard retrieved", entries)),
    ))
}
