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

use chrono::TimeDelta;

use crate::scheduler::ReviewInput;
use crate::scheduler::compute_schedule;
use crate::scheduler::histogram::DueHistogram;
use crate::settings::Settings;
use crate::types::date::Date;
use crate::types::response::Response;
use crate::types::schedule::Ease;
use crate::types::schedule::INITIAL_INTERVAL;
use crate::types::schedule::ScheduleRecord;

/// Turns review responses into schedule records.
pub struct ScheduleCalculator<'a> {
    settings: &'a Settings,
}

impl<'a> ScheduleCalculator<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Queue an item again as though it had never been seen.
    pub fn reset_schedule(&self, today: Date) -> ScheduleRecord {
        ScheduleRecord::new(
            today.add_days(INITIAL_INTERVAL as i64),
            INITIAL_INTERVAL,
            self.settings.base_ease,
            TimeDelta::zero(),
        )
    }

    /// The schedule after an item's first review. The ease starts from the
    /// owning document's average, when it has one.
    pub fn new_card_schedule(
        &self,
        response: Response,
        note_ease: Option<Ease>,
        today: Date,
        histogram: &mut DueHistogram,
    ) -> ScheduleRecord {
        let input = ReviewInput {
            interval: INITIAL_INTERVAL,
            ease: note_ease.unwrap_or(self.settings.base_ease),
            delay_days: 0,
            first_review: true,
        };
        self.schedule(response, &input, today, histogram)
    }

    /// The schedule after reviewing an item that has history.
    pub fn updated_schedule(
        &self,
        response: Response,
        current: &ScheduleRecord,
        today: Date,
        histogram: &mut DueHistogram,
    ) -> ScheduleRecord {
        let input = ReviewInput {
            interval: current.interval,
            ease: current.ease,
            delay_days: current.delay_days().max(0),
            first_review: false,
        };
        self.schedule(response, &input, today, histogram)
    }

    fn schedule(
        &self,
        response: Response,
        input: &ReviewInput,
        today: Date,
        histogram: &mut DueHistogram,
    ) -> ScheduleRecord {
        let output = compute_schedule(response, input, self.settings, histogram);
        let due_date = today.add_days(output.interval.round() as i64);
        log::debug!(
            "Response {response}: interval {} -> {}, ease {} -> {}, due {due_date}.",
            input.interval,
            output.interval,
            input.ease,
            output.ease
        );
        ScheduleRecord::new(due_date, output.interval, output.ease, TimeDelta::zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        let mut settings = Settings::default();
        settings.load_balance.enabled = false;
        settings
    }

    #[test]
    fn test_reset_schedule() {
        let settings = settings();
        let calc = ScheduleCalculator::new(&settings);
        let today = Date::ymd(2024, 6, 1);
        let record = calc.reset_schedule(today);
        assert_eq!(record.interval, 1.0);
        assert_eq!(record.ease, settings.base_ease);
        assert_eq!(record.delay_before_review, TimeDelta::zero());
        assert_eq!(record.due_date, Date::ymd(2024, 6, 2));
    }

    #[test]
    fn test_new_card_uses_base_ease() {
        let settings = settings();
        let calc = ScheduleCalculator::new(&settings);
        let today = Date::ymd(2024, 6, 1);
        let mut histogram = DueHistogram::new();
        let record = calc.new_card_schedule(Response::Good, None, today, &mut histogram);
        assert_eq!(record.interval, 2.5);
        assert_eq!(record.ease, 250);
        assert_eq!(record.due_date, Date::ymd(2024, 6, 4));
    }

    #[test]
    fn test_new_card_uses_note_ease() {
        let settings = settings();
        let calc = ScheduleCalculator::new(&settings);
        let today = Date::ymd(2024, 6, 1);
        let mut histogram = DueHistogram::new();
        let record = calc.new_card_schedule(Response::Good, Some(300), today, &mut histogram);
        assert_eq!(record.interval, 3.0);
        assert_eq!(record.ease, 300);
        assert_eq!(record.due_date, Date::ymd(2024, 6, 4));
    }

    #[test]
    fn test_updated_schedule_counts_lateness() {
        let settings = settings();
        let calc = ScheduleCalculator::new(&settings);
        let today = Date::ymd(2024, 6, 10);
        let mut histogram = DueHistogram::new();
        let current = ScheduleRecord::new(Date::ymd(2024, 6, 6), 4.0, 250, TimeDelta::days(4));
        let record = calc.updated_schedule(Response::Good, &current, today, &mut histogram);
        assert_eq!(record.interval, 15.0);
        assert_eq!(record.due_date, Date::ymd(2024, 6, 25));
    }

    #[test]
    fn test_early_review_is_not_rewarded() {
        let settings = settings();
        let calc = ScheduleCalculator::new(&settings);
        let today = Date::ymd(2024, 6, 10);
        let mut histogram = DueHistogram::new();
        let current = ScheduleRecord::new(Date::ymd(2024, 6, 12), 4.0, 250, TimeDelta::days(-2));
        let record = calc.updated_schedule(Response::Good, &current, today, &mut histogram);
        assert_eq!(record.interval, 10.0);
    }

    #[test]
    fn test_failure() {
        let settings = settings();
        let calc = ScheduleCalculator::new(&settings);
        let today = Date::ymd(2024, 6, 10);
        let mut histogram = DueHistogram::new();
        let current = ScheduleRecord::new(today, 30.0, 250, TimeDelta::zero());
        let record = calc.updated_schedule(Response::Again, &current, today, &mut histogram);
        assert_eq!(record.interval, 1.0);
        assert_eq!(record.ease, 230);
        assert_eq!(record.due_date, Date::ymd(2024, 6, 11));
    }
}
