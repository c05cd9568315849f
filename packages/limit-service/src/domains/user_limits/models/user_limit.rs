use serde::{Deserialize, Serialize};

/// Lifecycle classification of a limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "limit_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LimitStatus {
    Active,
    Future,
    Expired,
}

/// Reset cadence of a limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "limit_period", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LimitPeriod {
    CalendarDay,
    CalendarWeek,
    CalendarMonth,
}

/// What the cap constrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "limit_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LimitType {
    Balance,
    Deposit,
    Loss,
    Bet,
}

/// Persisted user limit entity.
///
/// Monetary fields are decimal-as-string; temporal fields are epoch
/// milliseconds as `i64` (ordinary values exceed 32 bits).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserLimit {
    /// Assigned by storage on creation; immutable afterwards.
    pub user_limit_id: String,
    pub user_id: String,
    pub brand_id: String,
    pub currency_code: String,
    pub value: String,
    pub previous_limit_value: Option<String>,
    /// Accumulated usage toward the cap; non-negative decimal string.
    pub progress: Option<String>,
    pub status: LimitStatus,
    pub period: LimitPeriod,
    #[serde(rename = "type")]
    pub limit_type: LimitType,
    pub active_from: i64,
    pub active_until: Option<i64>,
    pub next_reset_time: Option<i64>,
    pub created_at: Option<i64>,
}

/// Create-request shape. Identity is storage-assigned: an inbound
/// `userLimitId` is accepted for wire compatibility and ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUserLimit {
    pub user_id: String,
    pub brand_id: String,
    pub currency_code: String,
    pub value: String,
    #[serde(default)]
    pub previous_limit_value: Option<String>,
    #[serde(default)]
    pub progress: Option<String>,
    pub status: LimitStatus,
    pub period: LimitPeriod,
    #[serde(rename = "type")]
    pub limit_type: LimitType,
    pub active_from: i64,
    #[serde(default)]
    pub active_until: Option<i64>,
    #[serde(default)]
    pub next_reset_time: Option<i64>,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub user_limit_id: Option<String>,
}

/// Partial update keyed by the entity id. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLimitPatch {
    pub user_limit_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub progress: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub previous_limit_value: Option<String>,
    #[serde(default)]
    pub status: Option<LimitStatus>,
    #[serde(default)]
    pub active_until: Option<i64>,
    #[serde(default)]
    pub next_reset_time: Option<i64>,
}
