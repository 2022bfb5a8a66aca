use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Values that can be shown as a calendar date.
///
/// Timestamps are converted to UTC first, so a given instant always
/// renders the same day regardless of server locale.
pub trait CalendarDate {
    fn calendar_date(&self) -> Option<NaiveDate>;
}

impl CalendarDate for NaiveDate {
    fn calendar_date(&self) -> Option<NaiveDate> {
        Some(*self)
    }
}

impl<Tz: TimeZone> CalendarDate for DateTime<Tz> {
    fn calendar_date(&self) -> Option<NaiveDate> {
        Some(self.with_timezone(&Utc).date_naive())
    }
}

impl CalendarDate for str {
    fn calendar_date(&self) -> Option<NaiveDate> {
        let s = self.trim();
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Some(date);
        }
        if let Ok(timestamp) = DateTime::parse_from_rfc3339(s) {
            return timestamp.calendar_date();
        }
        // ISO timestamps without an offset are taken as UTC
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.date())
    }
}

impl CalendarDate for String {
    fn calendar_date(&self) -> Option<NaiveDate> {
        self.as_str().calendar_date()
    }
}

impl<T: CalendarDate + ?Sized> CalendarDate for &T {
    fn calendar_date(&self) -> Option<NaiveDate> {
        (**self).calendar_date()
    }
}

/// Render a date as `"June 1, 2024"`.
///
/// Unparseable strings render as `"Invalid Date"`.
pub fn format_date<D: CalendarDate + ?Sized>(date: &D) -> String {
    match date.calendar_date() {
        Some(date) => date.format("%B %-d, %Y").to_string(),
        None => "Invalid Date".to_string(),
    }
}
