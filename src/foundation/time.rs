use std::fmt;

use crate::foundation::error::{ClockError, ClockResult};

/// Non-negative clock reading in whole seconds.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct TimeValue(pub u64);

impl TimeValue {
    pub const ZERO: Self = Self(0);

    /// Build from hours/minutes/seconds. Minutes and seconds may exceed 59; they are folded into
    /// the total.
    pub fn from_hms(hours: u64, minutes: u64, seconds: u64) -> ClockResult<Self> {
        hours
            .checked_mul(3600)
            .and_then(|h| minutes.checked_mul(60).and_then(|m| h.checked_add(m)))
            .and_then(|hm| hm.checked_add(seconds))
            .map(Self)
            .ok_or_else(|| {
                ClockError::validation(format!(
                    "duration {hours}h {minutes}m {seconds}s overflows the seconds counter"
                ))
            })
    }

    pub fn total_seconds(self) -> u64 {
        self.0
    }

    /// Split into `(hours, minutes, seconds)`.
    pub fn hms(self) -> (u64, u64, u64) {
        let hours = self.0 / 3600;
        let rem = self.0 % 3600;
        (hours, rem / 60, rem % 60)
    }
}

/// `HH:MM:SS`, zero padded. Hours widen past two digits rather than truncating.
impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, m, s) = self.hms();
        write!(f, "{h:02}:{m:02}:{s:02}")
    }
}
