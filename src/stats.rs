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

use std::collections::BTreeMap;
use std::fmt::Write;

use serde::Serialize;

use crate::db::ReviewCounts;
use crate::types::date::Date;
use crate::types::item_kind::ItemKind;
use crate::types::schedule::Ease;
use crate::types::schedule::ScheduleRecord;

/// Items with an interval of at least this many days are mature.
pub const MATURE_INTERVAL: f64 = 32.0;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub kind: ItemKind,
    pub reviewed_today: ReviewCounts,
    /// Items due by day offset from today. Overdue items count as today.
    pub forecast: BTreeMap<i64, usize>,
    /// Items by interval, in whole days.
    pub intervals: BTreeMap<i64, usize>,
    pub eases: BTreeMap<Ease, usize>,
    pub new_count: usize,
    pub young_count: usize,
    pub mature_count: usize,
    pub average_interval: f64,
    pub longest_interval: f64,
    pub average_ease: Ease,
    pub reviews_per_day: f64,
}

impl Stats {
    /// Summarize the schedules of every item of `kind`. `None` and sentinel
    /// schedules are new items.
    pub fn compute<'a>(
        kind: ItemKind,
        schedules: impl IntoIterator<Item = Option<&'a ScheduleRecord>>,
        reviewed_today: ReviewCounts,
        today: Date,
    ) -> Self {
        let mut stats = Stats {
            kind,
            reviewed_today,
            forecast: BTreeMap::new(),
            intervals: BTreeMap::new(),
            eases: BTreeMap::new(),
            new_count: 0,
            young_count: 0,
            mature_count: 0,
            average_interval: 0.0,
            longest_interval: 0.0,
            average_ease: 0,
            reviews_per_day: 0.0,
        };
        let mut interval_sum = 0.0;
        let mut ease_sum: Ease = 0;
        for schedule in schedules {
            let Some(schedule) = schedule.filter(|s| !s.is_sentinel()) else {
                stats.new_count += 1;
                continue;
            };
            let offset = schedule.due_date.days_since(today).max(0);
            *stats.forecast.entry(offset).or_insert(0) += 1;
            *stats
                .intervals
                .entry(schedule.interval.round() as i64)
                .or_insert(0) += 1;
            *stats.eases.entry(schedule.ease).or_insert(0) += 1;
            if schedule.interval >= MATURE_INTERVAL {
                stats.mature_count += 1;
            } else {
                stats.young_count += 1;
            }
            interval_sum += schedule.interval;
            ease_sum += schedule.ease;
            stats.longest_interval = stats.longest_interval.max(schedule.interval);
        }
        let scheduled = stats.young_count + stats.mature_count;
        if scheduled > 0 {
            stats.average_interval = (interval_sum / scheduled as f64 * 10.0).round() / 10.0;
            stats.average_ease = (ease_sum as f64 / scheduled as f64).round() as Ease;
            let days = stats.forecast.keys().max().copied().unwrap_or(0).max(1);
            stats.reviews_per_day = scheduled as f64 / days as f64;
        }
        stats
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let reviewed = self.reviewed_today.due + self.reviewed_today.new;
        let _ = writeln!(out, "Statistics for {}s", self.kind);
        let _ = writeln!(
            out,
            "Reviewed today: {reviewed} ({} new, {} due)",
            self.reviewed_today.new, self.reviewed_today.due
        );
        let _ = writeln!(
            out,
            "New: {}, young: {}, mature: {}",
            self.new_count, self.young_count, self.mature_count
        );
        let _ = writeln!(
            out,
            "Average interval: {} days, longest: {} days",
            self.average_interval, self.longest_interval
        );
        let _ = writeln!(out, "Average ease: {}", self.average_ease);
        let _ = writeln!(out, "Reviews per day: {:.1}", self.reviews_per_day);
        let _ = writeln!(out, "Forecast:");
        for (offset, count) in &self.forecast {
            let label = if *offset == 0 {
                "today".to_string()
            } else {
                format!("+{offset}d")
            };
            let _ = writeln!(out, "  {label:>6} {count}");
        }
        out
    }
}
