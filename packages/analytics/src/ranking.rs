//! Top-N / bottom-N years by incident count.
//!
//! Both rankings do a full stable sort of the yearly totals in ascending
//! year order, so equal counts keep their year order. Each slice is
//! computed independently: with more than half the years requested, top
//! and bottom overlap.

use std::collections::BTreeMap;

use incident_trends_analytics_models::RankedYear;

fn ranked(totals: &BTreeMap<i32, u64>) -> Vec<RankedYear> {
    totals
        .iter()
        .map(|(year, count)| RankedYear {
            year: *year,
            count: *count,
        })
        .collect()
}

/// The `n` years with the most incidents, largest first.
#[must_use]
pub fn top_years(totals: &BTreeMap<i32, u64>, n: usize) -> Vec<RankedYear> {
    let mut years = ranked(totals);
    years.sort_by(|a, b| b.count.cmp(&a.count));
    years.truncate(n);
    years
}

/// The `n` years with the fewest incidents, smallest first.
#[must_use]
pub fn bottom_years(totals: &BTreeMap<i32, u64>, n: usize) -> Vec<RankedYear> {
    let mut years = ranked(totals);
    years.sort_by(|a, b| a.count.cmp(&b.count));
    years.truncate(n);
    years
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ry(year: i32, count: u64) -> RankedYear {
        RankedYear { year, count }
    }

    #[test]
    fn ranks_scenario_years() {
        let totals = BTreeMap::from([(2005, 2), (2006, 1)]);
        assert_eq!(top_years(&totals, 1), vec![ry(2005, 2)]);
        assert_eq!(bottom_years(&totals, 1), vec![ry(2006, 1)]);
    }

    #[test]
    fn ties_keep_ascending_year_order() {
        let totals = BTreeMap::from([(2008, 5), (2006, 5), (2007, 9), (2009, 1)]);
        assert_eq!(
            top_years(&totals, 3),
            vec![ry(2007, 9), ry(2006, 5), ry(2008, 5)]
        );
        assert_eq!(
            bottom_years(&totals, 3),
            vec![ry(2009, 1), ry(2006, 5), ry(2008, 5)]
        );
    }

    #[test]
    fn slices_are_independent() {
        let totals = BTreeMap::from([(2006, 3), (2007, 2), (2008, 1)]);
        let top = top_years(&totals, 2);
        let bottom = bottom_years(&totals, 2);
        assert!(top.contains(&ry(2007, 2)));
        assert!(bottom.contains(&ry(2007, 2)));
    }

    #[test]
    fn oversized_and_zero_n() {
        let totals = BTreeMap::from([(2006, 3), (2007, 2)]);
        assert_eq!(top_years(&totals, 10).len(), 2);
        assert!(bottom_years(&totals, 0).is_empty());
        assert!(top_years(&BTreeMap::new(), 5).is_empty());
    }
}
