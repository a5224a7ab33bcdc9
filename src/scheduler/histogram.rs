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

use crate::types::date::Date;
use crate::types::schedule::ScheduleRecord;

/// How many items fall due on each day, keyed by the offset in days from
/// today. Offsets never counted read as zero.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DueHistogram {
    counts: BTreeMap<i64, usize>,
}

impl DueHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every stored schedule by its due offset from `today`.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a ScheduleRecord>, today: Date) -> Self {
        let mut histogram = Self::new();
        for record in records {
            if !record.is_sentinel() {
                histogram.increment(record.due_date.days_since(today));
            }
        }
        histogram
    }

    pub fn count(&self, offset: i64) -> usize {
        self.counts.get(&offset).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, offset: i64) {
        *self.counts.entry(offset).or_insert(0) += 1;
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Pick a due offset within `window` days of `target`. The target wins
    /// if nothing is due on it yet. Otherwise the first free day in the
    /// window is taken, and failing that the least loaded one, earliest
    /// first.
    pub fn balance(&self, target: i64, window: i64) -> i64 {
        if self.count(target) == 0 {
            return target;
        }
        let mut best = target;
        for offset in (target - window)..=(target + window) {
            let count = self.count(offset);
            if count == 0 {
                return offset;
            }
            if count < self.count(best) {
                best = offset;
            }
        }
        best
    }

    /// Counts by offset, in ascending order of offset.
    pub fn iter(&self) -> impl Iterator<Item = (i64, usize)> + '_ {
        self.counts.iter().map(|(offset, count)| (*offset, *count))
    }
}
