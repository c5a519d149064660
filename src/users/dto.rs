use serde::Deserialize;

use crate::params::{non_empty, present, RawParam};

/// Each request struct can be filled from the JSON body, the query string,
/// or a path segment; `or` keeps the first non-empty value in that order.

#[derive(Debug, Default, Deserialize)]
pub struct RegisterParams {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl RegisterParams {
    pub fn or(self, fallback: Self) -> Self {
        Self {
            username: non_empty(self.username).or(non_empty(fallback.username)),
            email: non_empty(self.email).or(non_empty(fallback.email)),
            password: non_empty(self.password).or(non_empty(fallback.password)),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginParams {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginParams {
    pub fn or(self, fallback: Self) -> Self {
        Self {
            email: non_empty(self.email).or(non_empty(fallback.email)),
            password: non_empty(self.password).or(non_empty(fallback.password)),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FindUserParams {
    pub email: Option<String>,
}

impl FindUserParams {
    pub fn or(self, fallback: Self) -> Self {
        Self {
            email: non_empty(self.email).or(non_empty(fallback.email)),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserParams {
    pub id: Option<RawParam>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl UpdateUserParams {
    pub fn or(self, fallback: Self) -> Self {
        Self {
            id: present(self.id).or(present(fallback.id)),
            username: non_empty(self.username).or(non_empty(fallback.username)),
            email: non_empty(self.email).or(non_empty(fallback.email)),
            password: non_empty(self.password).or(non_empty(fallback.password)),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteUserParams {
    pub id: Option<RawParam>,
}

impl DeleteUserParams {
    pub fn or(self, fallback: Self) -> Self {
        Self {
            id: present(self.id).or(present(fallback.id)),
        }
    }
}
