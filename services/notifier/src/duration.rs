/// Whole days/hours/minutes/seconds in a millisecond count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Breakdown {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Breakdown {
    /// Sub-second remainders are dropped; negative counts clamp to zero.
    pub fn from_millis(ms: i64) -> Self {
        let total = u64::try_from(ms).unwrap_or(0) / 1000;
        Self {
            days: total / 86_400,
            hours: total % 86_400 / 3600,
            minutes: total % 3600 / 60,
            seconds: total % 60,
        }
    }
}
