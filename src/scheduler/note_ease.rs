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

use std::collections::HashMap;

use crate::db::ItemRow;
use crate::tracker::table::TrackedTable;
use crate::types::item_id::ItemId;
use crate::types::schedule::Ease;

/// The average ease of each document's reviewed items. A card reviewed for
/// the first time starts from its document's average instead of the base
/// ease.
#[derive(Clone, Debug, Default)]
pub struct NoteEases {
    eases: HashMap<String, (Ease, usize)>,
}

impl NoteEases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Average the scheduled items of every tracked document.
    pub fn from_collection(table: &TrackedTable, items: &HashMap<ItemId, ItemRow>) -> Self {
        let mut eases = Self::new();
        for file in table.files() {
            for item_id in file.item_ids() {
                let schedule = items.get(&item_id).and_then(|row| row.schedule.as_ref());
                if let Some(schedule) = schedule.filter(|s| !s.is_sentinel()) {
                    eases.add(&file.path, schedule.ease);
                }
            }
        }
        eases
    }

    pub fn add(&mut self, document: &str, ease: Ease) {
        let entry = self.eases.entry(document.to_string()).or_insert((0, 0));
        entry.0 += ease;
        entry.1 += 1;
    }

    pub fn get(&self, document: &str) -> Option<Ease> {
        let (sum, count) = self.eases.get(document)?;
        if *count == 0 {
            return None;
        }
        Some((*sum as f64 / *count as f64).round() as Ease)
    }
}
