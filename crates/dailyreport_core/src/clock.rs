//! Time source for audit timestamps.

use crate::model::EpochMillis;

/// Supplies "now" to the lifecycle services.
pub trait Clock {
    fn now_millis(&self) -> EpochMillis;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_millis(&self) -> EpochMillis {
        (**self).now_millis()
    }
}

/// Wall clock in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> EpochMillis {
        chrono::Utc::now().timestamp_millis()
    }
}
