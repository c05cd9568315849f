//! Shared fixtures for integration tests.

use std::sync::Arc;

use limit_service::domains::user_limits::data::{
    InMemoryUserLimitRepository, UserLimitRepository,
};
use limit_service::domains::user_limits::models::{
    LimitPeriod, LimitStatus, LimitType, NewUserLimit, UserLimit,
};
use limit_service::domains::user_limits::service::UserLimitService;
use limit_service::kernel::{BaseUserDirectory, StaticUserDirectory};

pub struct TestDeps {
    pub repository: Arc<InMemoryUserLimitRepository>,
    pub service: Arc<UserLimitService>,
}

/// Wire a service against the in-memory repository and the given directory.
pub fn build_service(directory: StaticUserDirectory) -> TestDeps {
    let repository = Arc::new(InMemoryUserLimitRepository::new());
    let service = Arc::new(UserLimitService::new(
        repository.clone() as Arc<dyn UserLimitRepository>,
        Arc::new(directory) as Arc<dyn BaseUserDirectory>,
    ));
    TestDeps {
        repository,
        service,
    }
}

/// A valid create candidate for the given owner.
pub fn new_limit(user_id: &str, active_from: i64) -> NewUserLimit {
    NewUserLimit {
        user_id: user_id.to_string(),
        brand_id: "b1".to_string(),
        currency_code: "USD".to_string(),
        value: "1000".to_string(),
        previous_limit_value: None,
        progress: Some("0".to_string()),
        status: LimitStatus::Active,
        period: LimitPeriod::CalendarDay,
        limit_type: LimitType::Balance,
        active_from,
        active_until: None,
        next_reset_time: None,
        created_at: None,
        user_limit_id: None,
    }
}

/// A persisted limit for seeding the repository directly.
pub fn persisted_limit(user_limit_id: &str, user_id: &str, progress: &str) -> UserLimit {
    UserLimit {
        user_limit_id: user_limit_id.to_string(),
        user_id: user_id.to_string(),
        brand_id: "b1".to_string(),
        currency_code: "USD".to_string(),
        value: "1000".to_string(),
        previous_limit_value: None,
        progress: Some(progress.to_string()),
        status: LimitStatus::Active,
        period: LimitPeriod::CalendarDay,
        limit_type: LimitType::Balance,
        active_from: 1_735_689_600_000,
        active_until: None,
        next_reset_time: None,
        created_at: Some(1_735_689_600_000),
    }
}
