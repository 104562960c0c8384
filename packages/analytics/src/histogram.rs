//! Equal-width date histogram for the binned frequency chart.

use chrono::{Days, NaiveDate};
use incident_trends_analytics_models::DateBin;
use incident_trends_incident_models::IncidentRecord;

/// Splits the observed date span into at most `bins` equal-width,
/// contiguous bins of whole days and counts incidents per bin.
///
/// Bins with no incidents are kept so the bars line up on a time axis.
/// Returns an empty vector for `bins == 0` or no records.
#[must_use]
pub fn date_histogram(records: &[IncidentRecord], bins: usize) -> Vec<DateBin> {
    let Some(first) = records.iter().map(|r| r.occur_date).min() else {
        return Vec::new();
    };
    let Some(last) = records.iter().map(|r| r.occur_date).max() else {
        return Vec::new();
    };
    if bins == 0 {
        return Vec::new();
    }

    // Both ends inclusive.
    let span_days = u64::try_from((last - first).num_days()).unwrap_or(0) + 1;
    let width = span_days.div_ceil(bins as u64).max(1);
    let bin_count = span_days.div_ceil(width);

    let mut out: Vec<DateBin> = (0..bin_count)
        .map(|i| {
            let start = add_days(first, i * width);
            let end = add_days(start, width - 1).min(last);
            DateBin {
                start,
                end,
                count: 0,
            }
        })
        .collect();

    for record in records {
        let offset = u64::try_from((record.occur_date - first).num_days()).unwrap_or(0);
        let idx = usize::try_from(offset / width).unwrap_or(usize::MAX);
        if let Some(bin) = out.get_mut(idx) {
            bin.count += 1;
        }
    }

    out
}

fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}
