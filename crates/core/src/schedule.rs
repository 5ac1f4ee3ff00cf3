//! Voting calendar.
//!
//! All calendar decisions happen in one configured timezone: the local date a
//! vote belongs to, the Monday that starts its week, the business-day check
//! behind the daily selection attempt and the midday cutoff after which the
//! day's leader is disclosed.

use chrono::{
    DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc, Weekday,
};
use chrono_tz::Tz;
use teamlunch_common::{AppError, AppResult, config::ScheduleConfig};

/// Upper bound on days searched for the next selection attempt.
const MAX_LOOKAHEAD_DAYS: u32 = 14;

/// Selection and disclosure calendar.
#[derive(Debug, Clone)]
pub struct Schedule {
    winner_time: NaiveTime,
    business_days: Vec<Weekday>,
    disclosure_cutoff: NaiveTime,
    timezone: Tz,
}

impl Default for Schedule {
    /// Weekdays, selection at 11:50, disclosure until noon, UTC.
    fn default() -> Self {
        let config = ScheduleConfig::default();
        Self {
            winner_time: config.winner_time,
            business_days: config.business_days,
            disclosure_cutoff: config.disclosure_cutoff,
            timezone: Tz::UTC,
        }
    }
}

impl Schedule {
    /// Create a schedule. `business_days` must not be empty.
    pub fn new(
        winner_time: NaiveTime,
        business_days: Vec<Weekday>,
        disclosure_cutoff: NaiveTime,
        timezone: Tz,
    ) -> AppResult<Self> {
        if business_days.is_empty() {
            return Err(AppError::Config(
                "at least one business day is required".to_string(),
            ));
        }
        Ok(Self {
            winner_time,
            business_days,
            disclosure_cutoff,
            timezone,
        })
    }

    /// Build a schedule from configuration.
    pub fn from_config(config: &ScheduleConfig) -> AppResult<Self> {
        let timezone: Tz = config
            .timezone
            .parse()
            .map_err(|_| AppError::Config(format!("unknown timezone: {}", config.timezone)))?;
        Self::new(
            config.winner_time,
            config.business_days.clone(),
            config.disclosure_cutoff,
            timezone,
        )
    }

    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.timezone
    }

    #[must_use]
    pub const fn winner_time(&self) -> NaiveTime {
        self.winner_time
    }

    #[must_use]
    pub const fn disclosure_cutoff(&self) -> NaiveTime {
        self.disclosure_cutoff
    }

    /// `now` in the schedule's timezone.
    #[must_use]
    pub fn local_now(&self, now: DateTime<Utc>) -> DateTime<Tz> {
        now.with_timezone(&self.timezone)
    }

    /// Calendar date of `now` in the schedule's timezone.
    #[must_use]
    pub fn local_date(&self, now: DateTime<Utc>) -> NaiveDate {
        self.local_now(now).date_naive()
    }

    /// Monday of the week containing `date`.
    #[must_use]
    pub fn week_start(date: NaiveDate) -> NaiveDate {
        date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
    }

    /// Sunday of the week starting at `week_start`.
    #[must_use]
    pub fn week_end(week_start: NaiveDate) -> NaiveDate {
        week_start + Duration::days(6)
    }

    /// Half-open `[monday, next monday)` bounds of the week containing `date`.
    #[must_use]
    pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
        let start = Self::week_start(date);
        (start, start + Duration::days(7))
    }

    #[must_use]
    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        self.business_days.contains(&date.weekday())
    }

    /// Instant of the selection attempt on `date`, if that wall time exists.
    fn selection_instant(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        self.timezone
            .from_local_datetime(&date.and_time(self.winner_time))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Next instant at which a selection attempt should run.
    ///
    /// Today's attempt counts if it is still ahead of `now`. Otherwise the
    /// next business day is used. Days where the winner time falls into a
    /// DST gap are skipped.
    #[must_use]
    pub fn next_check(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = self.local_date(now);

        if self.is_business_day(today) {
            if let Some(at) = self.selection_instant(today) {
                if now < at {
                    return at;
                }
            }
        }

        let mut day = today;
        for _ in 0..MAX_LOOKAHEAD_DAYS {
            let Some(next) = day.succ_opt() else {
                break;
            };
            day = next;
            if !self.is_business_day(day) {
                continue;
            }
            if let Some(at) = self.selection_instant(day) {
                return at;
            }
        }

        // unreachable with a non-empty business day set
        now + Duration::days(1)
    }

    /// Whether `now` falls in the selection minute of a business day.
    #[must_use]
    pub fn is_selection_time(&self, now: DateTime<Utc>) -> bool {
        let local = self.local_now(now);
        self.is_business_day(local.date_naive())
            && local.hour() == self.winner_time.hour()
            && local.minute() == self.winner_time.minute()
    }

    /// Whether the day's leader may be disclosed. Voting stays blind until
    /// the cutoff, so this is true strictly before it.
    #[must_use]
    pub fn can_show_winner(&self, now: DateTime<Utc>) -> bool {
        self.local_now(now).time() < self.disclosure_cutoff
    }

    /// Date on which a hidden leader becomes visible again.
    #[must_use]
    pub fn next_disclosure_date(&self, now: DateTime<Utc>) -> NaiveDate {
        let today = self.local_date(now);
        today.succ_opt().unwrap_or(today)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn test_week_start_is_monday() {
        // 2024-01-08 is a Monday
        assert_eq!(Schedule::week_start(date(2024, 1, 8)), date(2024, 1, 8));
        assert_eq!(Schedule::week_start(date(2024, 1, 10)), date(2024, 1, 8));
        assert_eq!(Schedule::week_start(date(2024, 1, 14)), date(2024, 1, 8));
        assert_eq!(Schedule::week_start(date(2024, 1, 15)), date(2024, 1, 15));
    }

    #[test]
    fn test_week_start_across_year_boundary() {
        // Wednesday 2025-01-01 belongs to the week of Monday 2024-12-30
        assert_eq!(Schedule::week_start(date(2025, 1, 1)), date(2024, 12, 30));
    }

    #[test]
    fn test_week_end_and_bounds() {
        assert_eq!(Schedule::week_end(date(2024, 1, 8)), date(2024, 1, 14));
        assert_eq!(
            Schedule::week_bounds(date(2024, 1, 12)),
            (date(2024, 1, 8), date(2024, 1, 15))
        );
    }

    #[test]
    fn test_business_days_default_to_weekdays() {
        let schedule = Schedule::default();
        assert!(schedule.is_business_day(date(2024, 1, 12))); // Friday
        assert!(!schedule.is_business_day(date(2024, 1, 13))); // Saturday
        assert!(!schedule.is_business_day(date(2024, 1, 14))); // Sunday
    }

    #[test]
    fn test_next_check_later_today() {
        let schedule = Schedule::default();
        // Friday 10:00
        let next = schedule.next_check(utc(2024, 1, 12, 10, 0, 0));
        assert_eq!(next, utc(2024, 1, 12, 11, 50, 0));
    }

    #[test]
    fn test_next_check_after_friday_slot_skips_weekend() {
        let schedule = Schedule::default();
        // Friday 12:00
        let next = schedule.next_check(utc(2024, 1, 12, 12, 0, 0));
        assert_eq!(next, utc(2024, 1, 15, 11, 50, 0));
    }

    #[test]
    fn test_next_check_exactly_at_slot_moves_on() {
        let schedule = Schedule::default();
        let next = schedule.next_check(utc(2024, 1, 9, 11, 50, 0));
        assert_eq!(next, utc(2024, 1, 10, 11, 50, 0));
    }

    #[test]
    fn test_next_check_on_weekend() {
        let schedule = Schedule::default();
        let next = schedule.next_check(utc(2024, 1, 13, 9, 0, 0));
        assert_eq!(next, utc(2024, 1, 15, 11, 50, 0));
    }

    #[test]
    fn test_next_check_respects_timezone() {
        let schedule = Schedule::new(
            NaiveTime::from_hms_opt(11, 50, 0).unwrap(),
            vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
            NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            chrono_tz::Europe::Berlin,
        )
        .unwrap();
        // 08:00 UTC is 09:00 in Berlin in January; 11:50 local is 10:50 UTC
        let next = schedule.next_check(utc(2024, 1, 10, 8, 0, 0));
        assert_eq!(next, utc(2024, 1, 10, 10, 50, 0));
    }

    #[test]
    fn test_next_check_skips_dst_gap() {
        // Berlin springs forward on 2024-03-31 at 02:00
        let schedule = Schedule::new(
            NaiveTime::from_hms_opt(2, 30, 0).unwrap(),
            vec![Weekday::Sun, Weekday::Mon],
            NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            chrono_tz::Europe::Berlin,
        )
        .unwrap();
        // Saturday 2024-03-30 noon local
        let next = schedule.next_check(utc(2024, 3, 30, 11, 0, 0));
        // Monday 02:30 CEST is 00:30 UTC
        assert_eq!(next, utc(2024, 4, 1, 0, 30, 0));
    }

    #[test]
    fn test_is_selection_time_matches_minute() {
        let schedule = Schedule::default();
        assert!(schedule.is_selection_time(utc(2024, 1, 9, 11, 50, 0)));
        assert!(schedule.is_selection_time(utc(2024, 1, 9, 11, 50, 59)));
        assert!(!schedule.is_selection_time(utc(2024, 1, 9, 11, 51, 0)));
        assert!(!schedule.is_selection_time(utc(2024, 1, 13, 11, 50, 0)));
    }

    #[test]
    fn test_disclosure_gate() {
        let schedule = Schedule::default();
        assert!(schedule.can_show_winner(utc(2024, 1, 9, 11, 59, 59)));
        assert!(!schedule.can_show_winner(utc(2024, 1, 9, 12, 0, 0)));
        assert!(!schedule.can_show_winner(utc(2024, 1, 9, 18, 0, 0)));
        assert!(schedule.can_show_winner(utc(2024, 1, 10, 0, 0, 0)));
    }

    #[test]
    fn test_next_disclosure_date_is_tomorrow() {
        let schedule = Schedule::default();
        assert_eq!(
            schedule.next_disclosure_date(utc(2024, 1, 12, 13, 0, 0)),
            date(2024, 1, 13)
        );
    }

    #[test]
    fn test_local_date_uses_timezone() {
        let schedule = Schedule::new(
            NaiveTime::from_hms_opt(11, 50, 0).unwrap(),
            vec![Weekday::Mon],
            NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            chrono_tz::America::New_York,
        )
        .unwrap();
        // 02:00 UTC on the 9th is still the evening of the 8th in New York
        assert_eq!(schedule.local_date(utc(2024, 1, 9, 2, 0, 0)), date(2024, 1, 8));
    }

    #[test]
    fn test_empty_business_days_rejected() {
        let result = Schedule::new(
            NaiveTime::from_hms_opt(11, 50, 0).unwrap(),
            Vec::new(),
            NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            Tz::UTC,
        );
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_from_config_rejects_unknown_timezone() {
        let config = ScheduleConfig {
            timezone: "Mars/Olympus_Mons".to_string(),
            ..ScheduleConfig::default()
        };
        assert!(matches!(
            Schedule::from_config(&config),
            Err(AppError::Config(_))
        ));
    }
}
