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

//! Bringing the tracked-file table and the item store in line with the
//! documents on disk.

use crate::annotation::parse_schedules;
use crate::db::Database;
use crate::error::Fallible;
use crate::parser::CardParser;
use crate::settings::Settings;
use crate::tracker::card_info::CardOccurrence;
use crate::tracker::occurrence::card_occurrences;
use crate::tracker::table::TrackedTable;
use crate::types::date::Date;
use crate::types::item_id::ItemId;
use crate::types::item_kind::ItemKind;
use crate::types::timestamp::Timestamp;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SyncReport {
    pub documents: usize,
    pub cards: usize,
    /// Identities allocated during the sync.
    pub new_items: usize,
    /// Schedules imported from existing annotations.
    pub imported: usize,
}

impl SyncReport {
    fn add(&mut self, other: SyncReport) {
        self.documents += other.documents;
        self.cards += other.cards;
        self.new_items += other.new_items;
        self.imported += other.imported;
    }
}

/// Sync a whole collection, given each document's path and text.
pub fn sync_documents(
    documents: &[(String, String)],
    table: &mut TrackedTable,
    db: &mut Database,
    parser: &CardParser,
    settings: &Settings,
    now: Timestamp,
) -> Fallible<SyncReport> {
    let mut report = SyncReport::default();
    for (path, content) in documents {
        report.add(sync_document(path, content, table, db, parser, settings, now)?);
    }
    Ok(report)
}

/// Reconcile one document's cards with its tracking record, allocating
/// identities for new cards and for siblings a card has gained.
pub fn sync_document(
    path: &str,
    content: &str,
    table: &mut TrackedTable,
    db: &mut Database,
    parser: &CardParser,
    settings: &Settings,
    now: Timestamp,
) -> Fallible<SyncReport> {
    let today = now.local_date();
    let occurrences = card_occurrences(parser, content, &settings.edit_later_tag);
    if occurrences.is_empty() && !table.is_tracked(path) {
        return Ok(SyncReport::default());
    }
    let file = table.get_or_insert(path);
    let mut report = SyncReport {
        documents: 1,
        cards: occurrences.len(),
        ..SyncReport::default()
    };

    if file.is_tracked_note() && file.note_id.is_none() {
        file.note_id = Some(db.insert_item(ItemKind::Note, now)?);
        report.new_items += 1;
    }

    let owners = file.sync_cards(&occurrences);
    let mut new_cards = 0;
    for (occurrence, index) in occurrences.iter().zip(owners) {
        let card = &mut file.card_items[index];
        let existing = card.item_ids.len();
        if existing == 0 {
            log::debug!(
                "New card in {path} at line {}: {}.",
                occurrence.line_number + 1,
                occurrence.fingerprint.short()
            );
            new_cards += 1;
        }
        if existing >= occurrence.sibling_count {
            continue;
        }
        let mut allocated: Vec<(usize, ItemId)> = Vec::new();
        for sibling in existing..occurrence.sibling_count {
            let item_id = db.insert_item(ItemKind::Card, now)?;
            card.item_ids.push(item_id);
            allocated.push((sibling, item_id));
        }
        report.new_items += allocated.len();
        report.imported += import_annotation(db, occurrence, &allocated, today)?;
    }

    log::debug!(
        "Synced {path}: {} cards, {} new.",
        occurrences.len(),
        new_cards
    );
    Ok(report)
}

/// Seed freshly allocated siblings with the schedules already written in
/// the card's annotation. Sentinel records are skipped.
fn import_annotation(
    db: &mut Database,
    occurrence: &CardOccurrence,
    allocated: &[(usize, ItemId)],
    today: Date,
) -> Fallible<usize> {
    let records = parse_schedules(&occurrence.raw_text, today);
    let mut imported = 0;
    for (sibling, item_id) in allocated {
        if let Some(record) = records.get(*sibling) {
            if !record.is_sentinel() {
                db.set_schedule(*item_id, record)?;
                imported += 1;
            }
        }
    }
    Ok(imported)
}
