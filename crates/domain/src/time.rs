//! Time helpers.

use chrono::{Local, NaiveDateTime};

/// Return the current local wall-clock time (daily schedules are expressed
/// in local time).
#[must_use]
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}
