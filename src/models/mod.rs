use chrono::{DateTime, SubsecRound, Utc};

pub mod posts;
pub mod query;
pub mod users;

/// Current time truncated to the microsecond precision of `TIMESTAMPTZ`.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
