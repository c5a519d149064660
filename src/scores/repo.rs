use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Score {
    pub id: i64,
    pub user_id: i64,
    pub score: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub achieved_at: OffsetDateTime,
}

/// One leaderboard row: a score joined with its owner's username.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LeaderboardEntry {
    pub id: i64,
    pub score: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub achieved_at: OffsetDateTime,
    pub user_id: i64,
    pub username: String,
}

impl Score {
    pub async fn insert(db: &PgPool, user_id: i64, score: i64) -> Result<Score, sqlx::Error> {
        sqlx::query_as::<_, Score>(
            r#"
            INSERT INTO scores (user_id, score)
            VALUES ($1, $2)
            RETURNING id, user_id, score, achieved_at
            "#,
        )
        .bind(user_id)
        .bind(score)
        .fetch_one(db)
        .await
    }

    pub async fn list_by_user(db: &PgPool, user_id: i64) -> Result<Vec<Score>, sqlx::Error> {
        sqlx::query_as::<_, Score>(
            r#"
            SELECT id, user_id, score, achieved_at
            FROM scores
            WHERE user_id = $1
            ORDER BY achieved_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await
    }

    pub async fn get(db: &PgPool, id: i64) -> Result<Option<Score>, sqlx::Error> {
        sqlx::query_as::<_, Score>(
            r#"
            SELECT id, user_id, score, achieved_at
            FROM scores
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn update(db: &PgPool, id: i64, score: i64) -> Result<Option<Score>, sqlx::Error> {
        sqlx::query_as::<_, Score>(
            r#"
            UPDATE scores SET score = $2
            WHERE id = $1
            RETURNING id, user_id, score, achieved_at
            "#,
        )
        .bind(id)
        .bind(score)
        .fetch_optional(db)
        .await
    }

    pub async fn delete(db: &PgPool, id: i64) -> Result<Option<Score>, sqlx::Error> {
        sqlx::query_as::<_, Score>(
            r#"
            DELETE FROM scores
            WHERE id = $1
            RETURNING id, user_id, score, achieved_at
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Ties in score break on earliest achieved_at so the ordering is stable.
    pub async fn leaderboard(db: &PgPool, limit: i64) -> Result<Vec<LeaderboardEntry>, sqlx::Error> {
        sqlx::query_as::<_, LeaderboardEntry>(
            r#"
            SELECT s.id, s.score, s.achieved_at, u.id AS user_id, u.username
            FROM scores s
            INNER JOIN users u ON s.user_id = u.id
            ORDER BY s.score DESC, s.achieved_at ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(db)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn score_serializes_with_rfc3339_timestamp() {
        let score = Score {
            id: 3,
            user_id: 1,
            score: 128,
            achieved_at: datetime!(2024-06-15 12:30:00 UTC),
        };
        let json = serde_json::to_value(&score).unwrap();
        assert_eq!(json["score"], 128);
        assert_eq!(json["achieved_at"], "2024-06-15T12:30:00Z");
    }

    #[test]
    fn leaderboard_entry_carries_owner_fields() {
        let entry = LeaderboardEntry {
            id: 3,
            score: 128,
            achieved_at: datetime!(2024-06-15 12:30:00 UTC),
            user_id: 1,
            username: "clicker".into(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["user_id"], 1);
        assert_eq!(json["username"], "clicker");
    }
}
