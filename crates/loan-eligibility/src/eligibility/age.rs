use chrono::{Datelike, Months, NaiveDate};

/// Whole completed years between `birth` and `reference`.
///
/// Anniversaries of Feb 29 fall on Feb 28 in common years. A birth date after the reference
/// date yields a negative age, which no rule range accepts.
pub fn age_on(birth: NaiveDate, reference: NaiveDate) -> i32 {
    let mut age = reference.year() - birth.year();
    if let Some(anniversary) = shift_years(birth, age) {
        if reference < anniversary {
            age -= 1;
        }
    }
    age
}

fn shift_years(date: NaiveDate, years: i32) -> Option<NaiveDate> {
    let months = Months::new(years.unsigned_abs().checked_mul(12)?);
    if years >= 0 {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    }
}
