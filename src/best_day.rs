//! Best-day selection

use crate::models::DailyForecast;

/// Index of the day with the highest score (`temp_high - precip_probability`).
///
/// Only a strictly greater score replaces the current pick, so ties go to the
/// earliest day. An empty slice yields 0.
#[must_use]
pub fn select_best_day(daily: &[DailyForecast]) -> usize {
    let mut best_index = 0;
    let mut best_score = i32::MIN;

    for (index, day) in daily.iter().enumerate() {
        let score = day.score();
        if score > best_score {
            best_score = score;
            best_index = index;
        }
    }

    best_index
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};
    use rstest::rstest;

    fn week(days: &[(i32, i32)]) -> Vec<DailyForecast> {
        let start = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        days.iter()
            .enumerate()
            .map(|(i, (high, precip))| {
                DailyForecast::new(start + Days::new(i as u64), 1, *high, high - 8, *precip)
            })
            .collect()
    }

    /// Build days whose score equals the given value (precip fixed at 0)
    fn scored(scores: &[i32]) -> Vec<DailyForecast> {
        week(&scores.iter().map(|s| (*s, 0)).collect::<Vec<_>>())
    }

    #[test]
    fn test_tie_goes_to_earliest_day() {
        // both score 10
        let daily = week(&[(20, 10), (22, 12), (5, 50), (5, 50), (5, 50), (5, 50), (5, 50)]);
        assert_eq!(select_best_day(&daily), 0);
    }

    #[test]
    fn test_first_of_two_maxima() {
        let daily = scored(&[5, 9, 3, 9, 1, 0, -2]);
        assert_eq!(select_best_day(&daily), 1);
    }

    #[rstest]
    #[case(&[1, 2, 3, 4, 5, 6, 7], 6)]
    #[case(&[7, 6, 5, 4, 3, 2, 1], 0)]
    #[case(&[-40, -30, -35, -30, -50, -60, -31], 1)]
    #[case(&[0, 0, 0, 0, 0, 0, 0], 0)]
    fn test_selects_maximum(#[case] scores: &[i32], #[case] expected: usize) {
        assert_eq!(select_best_day(&scored(scores)), expected);
    }

    #[test]
    fn test_rain_outweighs_warmth() {
        // 30 degrees with 90% rain loses to 18 degrees dry
        let daily = week(&[(30, 90), (18, 0), (25, 40), (22, 20), (19, 5), (17, 0), (16, 0)]);
        assert_eq!(select_best_day(&daily), 1);
    }

    #[test]
    fn test_result_always_in_range() {
        for shift in -20..20 {
            let scores: Vec<i32> = (0..7).map(|i| ((i * 7 + shift) % 11) - 5).collect();
            let daily = scored(&scores);
            assert!(select_best_day(&daily) < daily.len());
        }
    }

    #[test]
    fn test_empty_input_yields_zero() {
        assert_eq!(select_best_day(&[]), 0);
    }
}
