use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Date of the Friday identifying the work week `now` belongs to.
///
/// Monday through Friday roll forward to that span's Friday. Saturday and
/// Sunday roll back to the Friday just passed: weekend check-ins cannot
/// happen through the normal flow, but a delayed rollover lands on the
/// week that actually earned the count. Operates on local calendar date
/// components only; no timezone conversion.
pub fn week_ending(now: NaiveDate) -> NaiveDate {
    match now.weekday() {
        Weekday::Sat => now - Days::new(1),
        Weekday::Sun => now - Days::new(2),
        wd => {
            let ahead = Weekday::Fri.num_days_from_monday() - wd.num_days_from_monday();
            now + Days::new(u64::from(ahead))
        }
    }
}
