use chrono::{DateTime, SubsecRound, Utc};

/// Current time at the microsecond precision PostgreSQL stores.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
