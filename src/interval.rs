//! Intervalles absolus `[start, end)` dérivés d'une date de travail et d'un gabarit.

use crate::model::ShiftTemplate;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Intervalle semi-ouvert en heure locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Interval {
    /// Ancre des heures de début/fin sur `work_date`.
    ///
    /// Si la fin n'est pas strictement après le début, elle bascule au lendemain.
    pub fn from_times(work_date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Self {
        let start = work_date.and_time(start);
        let mut end = work_date.and_time(end);
        if end <= start {
            end += Duration::days(1);
        }
        Self { start, end }
    }

    pub fn for_template(work_date: NaiveDate, template: &ShiftTemplate) -> Self {
        Self::from_times(work_date, template.start_time, template.end_time)
    }

    /// Les bornes qui se touchent ne se chevauchent pas.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Vrai si l'intervalle déborde au-delà du début de `day`.
    pub fn reaches_into(&self, day: NaiveDate) -> bool {
        self.end > day.and_time(NaiveTime::MIN)
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn night_shift_rolls_over_midnight() {
        let iv = Interval::from_times(d(2024, 1, 10), t(22, 0), t(6, 0));
        assert_eq!(iv.start, d(2024, 1, 10).and_time(t(22, 0)));
        assert_eq!(iv.end, d(2024, 1, 11).and_time(t(6, 0)));
        assert_eq!(iv.duration_minutes(), 480);
        assert!(iv.reaches_into(d(2024, 1, 11)));
    }

    #[test]
    fn equal_times_span_a_full_day() {
        let iv = Interval::from_times(d(2024, 1, 10), t(8, 0), t(8, 0));
        assert_eq!(iv.duration_minutes(), 24 * 60);
    }

    #[test]
    fn touching_intervals_do_not_overlap() {
        let night = Interval::from_times(d(2024, 1, 10), t(22, 0), t(6, 0));
        let morning = Interval::from_times(d(2024, 1, 11), t(6, 0), t(14, 0));
        assert!(!night.overlaps(&morning));
        assert!(!morning.overlaps(&night));

        let early = Interval::from_times(d(2024, 1, 11), t(5, 0), t(13, 0));
        assert!(night.overlaps(&early));
        assert!(early.overlaps(&night));
    }

    #[test]
    fn day_shift_stays_on_its_date() {
        let iv = Interval::from_times(d(2024, 1, 10), t(9, 0), t(18, 0));
        assert!(!iv.reaches_into(d(2024, 1, 11)));
    }
}
