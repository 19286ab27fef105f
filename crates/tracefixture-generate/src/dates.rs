use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::Rng;

/// Uniform date in `[start, end]`. Collapses to `start` when the window is empty.
pub fn date_between<R: Rng + ?Sized>(rng: &mut R, start: NaiveDate, end: NaiveDate) -> NaiveDate {
    if end <= start {
        return start;
    }
    let span = (end - start).num_days();
    start + Duration::days(rng.random_range(0..=span))
}

/// Uniform minute-aligned timestamp in `[start, end]`.
pub fn minute_between<R: Rng + ?Sized>(
    rng: &mut R,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> NaiveDateTime {
    if end <= start {
        return start;
    }
    let span = (end - start).num_minutes();
    start + Duration::minutes(rng.random_range(0..=span))
}

/// Drop seconds and sub-second precision.
pub fn truncate_to_minute(value: NaiveDateTime) -> NaiveDateTime {
    let seconds = value.and_utc().timestamp();
    let truncated = seconds - seconds.rem_euclid(60);
    chrono::DateTime::from_timestamp(truncated, 0)
        .map(|value| value.naive_utc())
        .unwrap_or(value)
}

pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
