use chrono::{Local, NaiveDateTime};

/// Source of the alert timestamp.
pub trait Clock: Send + Sync {
    /// Current wall-clock time in the host's local timezone.
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
