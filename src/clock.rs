//! Taskbar clock and terminal date formatting

use chrono::{DateTime, Local, TimeZone, Timelike};
use std::fmt::Display;

/// 24-hour `HH:MM` rendering used by the taskbar clock
pub fn format_clock<T: Timelike>(time: &T) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Current local time for the taskbar clock
pub fn clock_now() -> String {
    format_clock(&Local::now())
}

/// Long date line printed by the terminal `date` command
pub fn format_date<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    time.format("%a %b %d %Y %H:%M:%S GMT%z").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveTime, Utc};

    #[test]
    fn test_clock_is_zero_padded_24_hour() {
        let morning = NaiveTime::from_hms_opt(7, 5, 59).unwrap();
        assert_eq!(format_clock(&morning), "07:05");

        let evening = NaiveTime::from_hms_opt(23, 45, 0).unwrap();
        assert_eq!(format_clock(&evening), "23:45");
    }

    #[test]
    fn test_clock_now_shape() {
        let now = clock_now();
        assert_eq!(now.len(), 5);
        assert_eq!(&now[2..3], ":");
    }

    #[test]
    fn test_date_line() {
        let time = Utc.with_ymd_and_hms(2024, 3, 9, 14, 30, 5).unwrap();
        assert_eq!(format_date(&time), "Sat Mar 09 2024 14:30:05 GMT+0000");

        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let local = offset.with_ymd_and_hms(2024, 3, 9, 16, 30, 5).unwrap();
        assert_eq!(format_date(&local), "Sat Mar 09 2024 16:30:05 GMT+0200");
    }
}
