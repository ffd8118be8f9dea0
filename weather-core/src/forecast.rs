//! Collapses the provider's 3-hourly forecast list into one sample per day.

use chrono::{NaiveDate, NaiveTime};

use crate::model::{DailySummary, RawSample};

/// Upper bound on the number of days a reduced forecast carries.
pub const MAX_FORECAST_DAYS: usize = 5;

fn is_midday(time: NaiveTime) -> bool {
    NaiveTime::from_hms_opt(12, 0, 0) == Some(time)
}

/// Pick one sample per calendar date, in first-seen date order, keeping at
/// most [`MAX_FORECAST_DAYS`] dates.
///
/// The first sample of a date is kept unless a later one for the same date
/// falls exactly on 12:00:00, in which case that one replaces it. Nothing
/// replaces a midday pick afterwards.
pub fn reduce(samples: &[RawSample]) -> Vec<DailySummary> {
    // (date, pick) in first-seen date order.
    let mut chosen: Vec<(NaiveDate, &RawSample)> = Vec::new();

    for sample in samples {
        let date = sample.timestamp.date();

        match chosen.iter_mut().find(|(d, _)| *d == date) {
            Some(slot) => {
                if is_midday(sample.timestamp.time()) {
                    slot.1 = sample;
                }
            }
            None => chosen.push((date, sample)),
        }
    }

    chosen
        .into_iter()
        .take(MAX_FORECAST_DAYS)
        .map(|(date, sample)| DailySummary {
            date,
            temperature: sample.temperature,
            description: sample.description.clone(),
            icon: sample.icon.clone(),
        })
        .collect()
}
