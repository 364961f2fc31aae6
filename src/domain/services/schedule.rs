use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use crate::error::AppError;

pub const OPENING_HOUR: u32 = 10;
pub const CLOSING_HOUR: u32 = 22;
pub const SLOT_DURATION_MIN: i64 = 60;

pub fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format (YYYY-MM-DD)".into()))
}

pub fn is_business_hour(hour: u32) -> bool {
    (OPENING_HOUR..CLOSING_HOUR).contains(&hour)
}

fn local_to_utc(tz: Tz, date: NaiveDate, hour: u32) -> Option<DateTime<Utc>> {
    let time = NaiveTime::from_hms_opt(hour, 0, 0)?;
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// UTC bounds [start, end) of one calendar day in the business timezone.
pub fn day_bounds(tz: Tz, date: NaiveDate) -> Result<(DateTime<Utc>, DateTime<Utc>), AppError> {
    let next = date.succ_opt().ok_or(AppError::Validation("Date out of range".into()))?;
    let start = local_to_utc(tz, date, 0)
        .ok_or_else(|| AppError::Internal(format!("No local midnight on {}", date)))?;
    let end = local_to_utc(tz, next, 0)
        .ok_or_else(|| AppError::Internal(format!("No local midnight on {}", next)))?;
    Ok((start, end))
}

/// Start and end of the one-hour slot beginning at `hour` local time.
pub fn slot_bounds(tz: Tz, date: NaiveDate, hour: u32) -> Result<(DateTime<Utc>, DateTime<Utc>), AppError> {
    if !is_business_hour(hour) {
        return Err(AppError::Validation(format!(
            "Hour {} is outside business hours ({}:00-{}:00)",
            hour, OPENING_HOUR, CLOSING_HOUR
        )));
    }
    let start = local_to_utc(tz, date, hour)
        .ok_or(AppError::Validation("Invalid local time (skipped due to DST)".into()))?;
    Ok((start, start + Duration::minutes(SLOT_DURATION_MIN)))
}

pub fn local_date(tz: Tz, instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

pub fn local_hour(tz: Tz, instant: DateTime<Utc>) -> u32 {
    instant.with_timezone(&tz).hour()
}
