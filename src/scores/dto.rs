use serde::Deserialize;

use crate::params::{present, RawParam};

pub const DEFAULT_LEADERBOARD_LIMIT: i64 = 10;

#[derive(Debug, Default, Deserialize)]
pub struct AddScoreParams {
    pub user_id: Option<RawParam>,
    pub score: Option<RawParam>,
}

impl AddScoreParams {
    pub fn or(self, fallback: Self) -> Self {
        Self {
            user_id: present(self.user_id).or(present(fallback.user_id)),
            score: present(self.score).or(present(fallback.score)),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UserScoresParams {
    pub user_id: Option<RawParam>,
}

impl UserScoresParams {
    pub fn or(self, fallback: Self) -> Self {
        Self {
            user_id: present(self.user_id).or(present(fallback.user_id)),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ScoreIdParams {
    pub id: Option<RawParam>,
}

impl ScoreIdParams {
    pub fn or(self, fallback: Self) -> Self {
        Self {
            id: present(self.id).or(present(fallback.id)),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateScoreParams {
    pub id: Option<RawParam>,
    pub score: Option<RawParam>,
}

impl UpdateScoreParams {
    pub fn or(self, fallback: Self) -> Self {
        Self {
            id: present(self.id).or(present(fallback.id)),
            score: present(self.score).or(present(fallback.score)),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardParams {
    pub limit: Option<RawParam>,
}

impl LeaderboardParams {
    pub fn or(self, fallback: Self) -> Self {
        Self {
            limit: present(self.limit).or(present(fallback.limit)),
        }
    }

    /// Absent, non-numeric, or negative limits all fall back to the default.
    pub fn resolve_limit(self) -> i64 {
        self.limit
            .and_then(|l| l.as_i64())
            .filter(|v| *v >= 0)
            .unwrap_or(DEFAULT_LEADERBOARD_LIMIT)
    }
}
