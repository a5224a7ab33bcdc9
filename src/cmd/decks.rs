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

use crate::cmd::sync::sync_collection;
use crate::collection::Collection;
use crate::deck::build_decks;
use crate::error::Fallible;
use crate::types::item_kind::ItemKind;
use crate::types::timestamp::Timestamp;

#[derive(Debug, PartialEq)]
pub struct DeckSummary {
    pub name: String,
    pub due: usize,
    pub new: usize,
}

/// Sync, then count what each deck has to review.
pub fn deck_summaries(
    collection: &mut Collection,
    kind: ItemKind,
    now: Timestamp,
) -> Fallible<Vec<DeckSummary>> {
    sync_collection(collection, now)?;
    let today = now.local_date();
    let items = collection.db.items_by_id(today)?;
    let decks = build_decks(&collection.table, &items, kind, today, &collection.importance)?;
    Ok(decks
        .values()
        .map(|deck| DeckSummary {
            name: deck.deck_name.clone(),
            due: deck.due_notes_count,
            new: deck.new_notes.len(),
        })
        .collect())
}

pub fn decks_command(directory: Option<String>, cards: bool) -> Fallible<()> {
    let mut collection = Collection::new(directory)?;
    let kind = if cards { ItemKind::Card } else { ItemKind::Note };
    let summaries = deck_summaries(&mut collection, kind, Timestamp::now())?;
    if summaries.is_empty() {
        println!("No {kind} decks in {}.", collection.directory.display());
    }
    for summary in summaries {
        println!("{}: {} due, {} new", summary.name, summary.due, summary.new);
    }
    Ok(())
}
