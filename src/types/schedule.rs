// Copyright 2026 The recall Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use chrono::NaiveDate;
use chrono::TimeDelta;

use crate::types::date::Date;

/// Milliseconds in a day. Delays are kept at sub-day precision.
pub const TICKS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// The interval, in days, of an item's first schedule.
pub const INITIAL_INTERVAL: f64 = 1.0;

/// Ease is an integer percentage: an ease of 250 multiplies the interval by
/// 2.5 on a good response.
pub type Ease = i64;

/// Sibling cards share a single annotation, but not every sibling may have
/// been reviewed yet. Siblings without history carry this due date so their
/// position in the annotation is kept.
const SENTINEL_DUE_DATE: Date = match NaiveDate::from_ymd_opt(2000, 1, 1) {
    Some(date) => Date::new(date),
    None => panic!("invalid sentinel date"),
};

/// The scheduling state of a single item.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduleRecord {
    /// The date the item becomes due.
    pub due_date: Date,
    /// Days until the next review.
    pub interval: f64,
    pub ease: Ease,
    /// How late the review happened relative to the due date. Positive when
    /// the item was overdue.
    pub delay_before_review: TimeDelta,
}

impl ScheduleRecord {
    pub fn new(due_date: Date, interval: f64, ease: Ease, delay_before_review: TimeDelta) -> Self {
        Self {
            due_date,
            interval,
            ease,
            delay_before_review,
        }
    }

    /// The placeholder record for a sibling card that was never reviewed.
    pub fn sentinel(base_ease: Ease) -> Self {
        Self::new(SENTINEL_DUE_DATE, INITIAL_INTERVAL, base_ease, TimeDelta::zero())
    }

    /// Sentinel records mean "new", never "overdue".
    pub fn is_sentinel(&self) -> bool {
        self.due_date == SENTINEL_DUE_DATE
    }

    /// Whether the item can be reviewed today. Items that already have an
    /// interval of at least a day remain eligible until the end of the day.
    pub fn is_due(&self, today: Date) -> bool {
        let due = self.due_date.start_of_day();
        due <= today.start_of_day() || (due <= today.end_of_day() && self.interval >= 1.0)
    }

    /// The delay in whole days, rounded up.
    pub fn delay_days(&self) -> i64 {
        let ticks = self.delay_before_review.num_milliseconds() as f64;
        (ticks / TICKS_PER_DAY as f64).ceil() as i64
    }

    pub fn format_due_date(&self) -> String {
        self.due_date.to_string()
    }

    /// Format as a single sibling group: `!date,interval,ease`.
    pub fn format_schedule(&self) -> String {
        format!("!{},{},{}", self.format_due_date(), self.interval, self.ease)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(due_date: Date, interval: f64) -> ScheduleRecord {
        ScheduleRecord::new(due_date, interval, 250, TimeDelta::zero())
    }

    #[test]
    fn test_due_today_regardless_of_interval() {
        let today = Date::ymd(2024, 5, 10);
        assert!(record(today, 0.0).is_due(today));
        assert!(record(today, 0.5).is_due(today));
        assert!(record(today, 30.0).is_due(today));
    }

    #[test]
    fn test_due_in_past() {
        let today = Date::ymd(2024, 5, 10);
        assert!(record(today.add_days(-4), 3.0).is_due(today));
    }

    #[test]
    fn test_not_due_in_future() {
        let today = Date::ymd(2024, 5, 10);
        assert!(!record(today.add_days(1), 3.0).is_due(today));
    }

    #[test]
    fn test_sentinel() {
        let sentinel = ScheduleRecord::sentinel(250);
        assert!(sentinel.is_sentinel());
        assert_eq!(sentinel.format_schedule(), "!2000-01-01,1,250");
        assert!(!record(Date::ymd(2000, 1, 2), 1.0).is_sentinel());
    }

    #[test]
    fn test_delay_days_rounds_up() {
        let mut r = record(Date::ymd(2024, 5, 10), 1.0);
        r.delay_before_review = TimeDelta::hours(1);
        assert_eq!(r.delay_days(), 1);
        r.delay_before_review = TimeDelta::days(3);
        assert_eq!(r.delay_days(), 3);
        r.delay_before_review = TimeDelta::zero();
        assert_eq!(r.delay_days(), 0);
        r.delay_before_review = TimeDelta::days(-2);
        assert_eq!(r.delay_days(), -2);
    }

    #[test]
    fn test_format_schedule() {
        let r = ScheduleRecord::new(Date::ymd(2023, 9, 2), 4.5, 270, TimeDelta::zero());
        assert_eq!(r.format_schedule(), "!2023-09-02,4.5,270");
    }
}
