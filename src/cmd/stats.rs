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

use std::fmt::Display;
use std::fmt::Formatter;

use clap::ValueEnum;

use crate::cmd::sync::sync_collection;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::stats::Stats;
use crate::types::date::Date;
use crate::types::item_id::ItemId;
use crate::types::item_kind::ItemKind;
use crate::types::timestamp::Timestamp;

#[derive(ValueEnum, Clone)]
pub enum StatsFormat {
    /// Plain text output.
    Text,
    /// JSON output.
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Text => write!(f, "text"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

/// Statistics over the tracked items of `kind`.
pub fn collection_stats(collection: &Collection, kind: ItemKind, today: Date) -> Fallible<Stats> {
    let items = collection.db.items_by_id(today)?;
    let mut item_ids: Vec<ItemId> = Vec::new();
    for file in collection.table.files() {
        match kind {
            ItemKind::Note => {
                if file.is_tracked_note() {
                    item_ids.extend(file.note_id);
                }
            }
            ItemKind::Card => item_ids.extend(file.card_ids()),
        }
    }
    let schedules = item_ids
        .iter()
        .filter_map(|item_id| items.get(item_id))
        .map(|row| row.schedule.as_ref());
    let reviewed_today = collection.db.today_review_counts(today)?;
    Ok(Stats::compute(kind, schedules, reviewed_today, today))
}

pub fn print_stats(directory: Option<String>, format: StatsFormat, cards: bool) -> Fallible<()> {
    let mut collection = Collection::new(directory)?;
    let now = Timestamp::now();
    sync_collection(&mut collection, now)?;
    let kind = if cards { ItemKind::Card } else { ItemKind::Note };
    let stats = collection_stats(&collection, kind, now.local_date())?;
    match format {
        StatsFormat::Text => print!("{}", stats.to_text()),
        StatsFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
    }
    Ok(())
}
