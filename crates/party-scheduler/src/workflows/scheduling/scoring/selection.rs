use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::super::domain::CandidateDates;

/// Highest-scoring date; among equal scores the chronologically earliest wins.
/// Dates missing from `scores` count as zero.
pub(crate) fn select_best(
    dates: &CandidateDates,
    scores: &BTreeMap<NaiveDate, u64>,
) -> (NaiveDate, u64) {
    let score_of = |date: NaiveDate| scores.get(&date).copied().unwrap_or(0);
    let first = dates.first();

    dates
        .iter()
        .fold((first, score_of(first)), |best, date| {
            let score = score_of(date);
            if score > best.1 {
                (date, score)
            } else {
                best
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, d).expect("valid date")
    }

    fn dates(days: &[u32]) -> CandidateDates {
        CandidateDates::new(days.iter().map(|d| day(*d)).collect()).expect("valid dates")
    }

    #[test]
    fn ties_resolve_to_the_earliest_date() {
        let scores = BTreeMap::from([(day(3), 4), (day(1), 2), (day(2), 4)]);
        assert_eq!(select_best(&dates(&[1, 2, 3]), &scores), (day(2), 4));
    }

    #[test]
    fn all_zero_scores_pick_the_first_date() {
        let scores = BTreeMap::from([(day(7), 0), (day(5), 0), (day(6), 0)]);
        assert_eq!(select_best(&dates(&[5, 6, 7]), &scores), (day(5), 0));
    }

    #[test]
    fn unscored_dates_count_as_zero() {
        let scores = BTreeMap::from([(day(9), 1)]);
        assert_eq!(select_best(&dates(&[8, 9]), &scores), (day(9), 1));
        assert_eq!(select_best(&dates(&[8]), &BTreeMap::new()), (day(8), 0));
    }
}
