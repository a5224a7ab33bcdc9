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

//! Review queues: which items are new, which are scheduled, and in what
//! order they come up.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::collections::HashMap;

use rand::Rng;

use crate::db::ItemRow;
use crate::error::Fallible;
use crate::error::fail;
use crate::importance::Importance;
use crate::settings::DEFAULT_DECK_NAME;
use crate::tracker::table::TrackedTable;
use crate::types::date::Date;
use crate::types::item_id::ItemId;
use crate::types::item_kind::ItemKind;
use crate::types::schedule::ScheduleRecord;

/// Where a card item lives inside its document.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardPosition {
    pub line_number: usize,
    /// Index among the card's siblings.
    pub sibling: usize,
}

/// An item waiting in a deck.
#[derive(Clone, Debug, PartialEq)]
pub struct SchedNote {
    pub item_id: ItemId,
    /// The document the item belongs to.
    pub path: String,
    /// `None` for note items.
    pub card: Option<CardPosition>,
    /// `None` while the item is new.
    pub schedule: Option<ScheduleRecord>,
}

impl SchedNote {
    pub fn is_new(&self) -> bool {
        self.schedule.is_none()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReviewDeck {
    pub deck_name: String,
    /// Never reviewed, most important first.
    pub new_notes: Vec<SchedNote>,
    /// Earliest due first; ties go to the more important document.
    pub scheduled_notes: Vec<SchedNote>,
    pub due_notes_count: usize,
}

impl ReviewDeck {
    pub fn new(deck_name: &str) -> Self {
        Self {
            deck_name: deck_name.to_string(),
            new_notes: Vec::new(),
            scheduled_notes: Vec::new(),
            due_notes_count: 0,
        }
    }

    pub fn sort_notes(&mut self, importance: &Importance) {
        let by_importance =
            |a: &SchedNote, b: &SchedNote| importance.score(&b.path).total_cmp(&importance.score(&a.path));
        self.new_notes.sort_by(by_importance);
        self.scheduled_notes.sort_by(|a, b| {
            let due = due_date(a).cmp(&due_date(b));
            if due != Ordering::Equal {
                return due;
            }
            by_importance(a, b)
        });
    }

    /// File an item as new or scheduled, counting it if it is due.
    pub fn push(&mut self, note: SchedNote, today: Date) {
        match &note.schedule {
            None => self.new_notes.push(note),
            Some(schedule) => {
                if schedule.is_due(today) {
                    self.due_notes_count += 1;
                }
                self.scheduled_notes.push(note);
            }
        }
    }

    /// Take an item out of the deck after it was reviewed.
    pub fn remove(&mut self, item_id: ItemId, today: Date) -> Option<SchedNote> {
        if let Some(index) = self.new_notes.iter().position(|n| n.item_id == item_id) {
            return Some(self.new_notes.remove(index));
        }
        let index = self
            .scheduled_notes
            .iter()
            .position(|n| n.item_id == item_id)?;
        let note = self.scheduled_notes.remove(index);
        if note.schedule.as_ref().is_some_and(|s| s.is_due(today)) {
            self.due_notes_count = self.due_notes_count.saturating_sub(1);
        }
        Some(note)
    }

    /// The due items, in review order.
    pub fn due_notes(&self) -> &[SchedNote] {
        let count = self.due_notes_count.min(self.scheduled_notes.len());
        &self.scheduled_notes[..count]
    }
}

fn due_date(note: &SchedNote) -> Option<Date> {
    note.schedule.as_ref().map(|s| s.due_date)
}

/// Build the decks holding every tracked item of `kind`. Notes land in
/// their document's deck; cards too, or in the default deck when the
/// document has none. Every tracked identity must exist in `items`.
pub fn build_decks(
    table: &TrackedTable,
    items: &HashMap<ItemId, ItemRow>,
    kind: ItemKind,
    today: Date,
    importance: &Importance,
) -> Fallible<BTreeMap<String, ReviewDeck>> {
    let mut decks: BTreeMap<String, ReviewDeck> = BTreeMap::new();
    for file in table.files() {
        let mut entries: Vec<(ItemId, Option<CardPosition>)> = Vec::new();
        let deck_name = match kind {
            ItemKind::Note => {
                let (Some(deck_name), Some(note_id)) = (file.deck_name(), file.note_id) else {
                    continue;
                };
                entries.push((note_id, None));
                deck_name
            }
            ItemKind::Card => {
                for card in &file.card_items {
                    for (sibling, item_id) in card.item_ids.iter().enumerate() {
                        let position = CardPosition {
                            line_number: card.line_number,
                            sibling,
                        };
                        entries.push((*item_id, Some(position)));
                    }
                }
                file.deck_name().unwrap_or(DEFAULT_DECK_NAME)
            }
        };
        for (item_id, card) in entries {
            let Some(row) = items.get(&item_id) else {
                return fail(format!("{} refers to missing item {item_id}.", file.path));
            };
            let schedule = row.schedule.clone().filter(|s| !s.is_sentinel());
            let note = SchedNote {
                item_id,
                path: file.path.clone(),
                card,
                schedule,
            };
            decks
                .entry(deck_name.to_string())
                .or_insert_with(|| ReviewDeck::new(deck_name))
                .push(note, today);
        }
    }
    for deck in decks.values_mut() {
        deck.sort_notes(importance);
    }
    Ok(decks)
}

/// The index of the next item to review among `count`: the first, or a
/// random one. `None` when there is nothing to review.
pub fn next_due_note_index(count: usize, randomize: bool, rng: &mut impl Rng) -> Option<usize> {
    if count == 0 {
        None
    } else if !randomize {
        Some(0)
    } else {
        Some(rng.gen_range(0..count))
    }
}

/// Decks with something to review: those with due items, then those with
/// new items. A deck with both is listed twice.
pub fn review_candidates(decks: &BTreeMap<String, ReviewDeck>) -> Vec<&str> {
    let due = decks
        .values()
        .filter(|deck| deck.due_notes_count > 0)
        .map(|deck| deck.deck_name.as_str());
    let new = decks
        .values()
        .filter(|deck| !deck.new_notes.is_empty())
        .map(|deck| deck.deck_name.as_str());
    due.chain(new).collect()
}

/// Pick a deck to review when none was asked for.
pub fn deck_for_review_directly(
    decks: &BTreeMap<String, ReviewDeck>,
    rng: &mut impl Rng,
) -> Option<String> {
    let candidates = review_candidates(decks);
    if candidates.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..candidates.len());
    Some(candidates[index].to_string())
}
