use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::Clock;

// System clock adapter used for cookie expiry.
#[derive(Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_seconds(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}
