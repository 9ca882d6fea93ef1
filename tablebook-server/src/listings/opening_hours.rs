//! Opening hours rendering
//!
//! Turns the per-weekday edit state into the stored day-labeled windows.
//! Unset components default independently to hour `8`, minute `00` and
//! `AM`; explicit values are copied verbatim, so `"05"` stays `"05"`.

use shared::models::{Meridiem, OpeningTimeDraft, OpeningWindow, WEEKDAYS, WeeklyDraft};

use crate::utils::ErrorCode;
use crate::utils::validation::FieldErrors;

pub const DEFAULT_HOUR: &str = "8";
pub const DEFAULT_MINUTE: &str = "00";
pub const DEFAULT_MERIDIEM: Meridiem = Meridiem::Am;

fn render(hour: Option<&str>, minute: Option<&str>, am_pm: Option<Meridiem>) -> String {
    format!(
        "{}:{} {}",
        hour.unwrap_or(DEFAULT_HOUR),
        minute.unwrap_or(DEFAULT_MINUTE),
        am_pm.unwrap_or(DEFAULT_MERIDIEM)
    )
}

/// Render one weekday
pub fn render_day(day: &str, draft: &OpeningTimeDraft) -> OpeningWindow {
    OpeningWindow {
        day: day.to_string(),
        from: render(
            draft.from_hour.as_deref(),
            draft.from_minute.as_deref(),
            draft.from_am_pm,
        ),
        to: render(
            draft.to_hour.as_deref(),
            draft.to_minute.as_deref(),
            draft.to_am_pm,
        ),
        closed: draft.closed,
    }
}

/// Render the whole week, Monday first
pub fn render_week(week: &WeeklyDraft) -> Vec<OpeningWindow> {
    WEEKDAYS
        .iter()
        .zip(week.iter())
        .map(|(day, draft)| render_day(day, draft))
        .collect()
}

/// Range-check explicit hour (1-12) and minute (0-59) values.
/// Closed days are not checked.
pub fn validate_week(week: &WeeklyDraft, errors: &mut FieldErrors) {
    for (day, draft) in WEEKDAYS.iter().zip(week.iter()) {
        if draft.closed {
            continue;
        }
        let checks = [
            ("fromHour", draft.from_hour.as_deref(), 1..=12),
            ("fromMinute", draft.from_minute.as_deref(), 0..=59),
            ("toHour", draft.to_hour.as_deref(), 1..=12),
            ("toMinute", draft.to_minute.as_deref(), 0..=59),
        ];
        for (component, value, range) in checks {
            let Some(value) = value else { continue };
            let in_range = value.len() <= 2
                && value
                    .parse::<u8>()
                    .map(|n| range.contains(&n))
                    .unwrap_or(false);
            if !in_range {
                errors.push(
                    format!("openingTime.{day}.{component}"),
                    ErrorCode::ValueOutOfRange,
                    format!(
                        "{day} {component} must be between {} and {}",
                        range.start(),
                        range.end()
                    ),
                );
            }
        }
    }
}
