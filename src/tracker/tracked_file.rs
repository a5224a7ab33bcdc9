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

use serde::Deserialize;
use serde::Serialize;

use crate::settings::DEFAULT_DECK_NAME;
use crate::tracker::card_info::CardInfo;
use crate::tracker::card_info::CardOccurrence;
use crate::tracker::reconcile::Reconciled;
use crate::tracker::reconcile::reconcile;
use crate::types::fingerprint::Fingerprint;
use crate::types::item_id::ItemId;
use crate::types::item_kind::ItemKind;

/// What a document is tracked as, and which deck its note belongs to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tracking {
    pub kind: ItemKind,
    /// `None` when the note itself is not tracked.
    pub deck_name: Option<String>,
}

/// The tracking record of one document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackedFile {
    /// Collection-relative path, with `/` separators.
    pub path: String,
    /// The identity of the note-level item, once allocated.
    pub note_id: Option<ItemId>,
    /// Sorted by line number.
    pub card_items: Vec<CardInfo>,
    pub tracking: Tracking,
}

impl TrackedFile {
    pub fn new(path: &str, kind: ItemKind, deck_name: Option<String>) -> Self {
        let mut file = Self {
            path: path.to_string(),
            note_id: None,
            card_items: Vec::new(),
            tracking: Tracking {
                kind,
                deck_name: None,
            },
        };
        file.track(kind, deck_name);
        file
    }

    /// Start tracking. Notes without an explicit deck go to the default
    /// deck.
    pub fn track(&mut self, kind: ItemKind, deck_name: Option<String>) {
        let deck_name = match (kind, deck_name) {
            (_, Some(name)) => Some(name),
            (ItemKind::Note, None) => Some(DEFAULT_DECK_NAME.to_string()),
            (ItemKind::Card, None) => None,
        };
        self.tracking = Tracking { kind, deck_name };
    }

    /// Stop tracking the note. Card records are kept.
    pub fn untrack(&mut self) {
        self.tracking.deck_name = None;
    }

    /// Move the note to another deck.
    pub fn retag(&mut self, deck_name: &str) {
        if self.tracking.deck_name.as_deref() != Some(deck_name) {
            self.tracking.deck_name = Some(deck_name.to_string());
        }
    }

    pub fn rename(&mut self, new_path: &str) {
        log::info!("Updated tracking: {} -> {}", self.path, new_path);
        self.path = new_path.to_string();
    }

    pub fn deck_name(&self) -> Option<&str> {
        self.tracking.deck_name.as_deref()
    }

    pub fn is_tracked(&self) -> bool {
        self.is_tracked_note() || self.has_cards()
    }

    pub fn is_tracked_note(&self) -> bool {
        self.tracking.deck_name.is_some()
    }

    pub fn has_cards(&self) -> bool {
        !self.card_items.is_empty()
    }

    /// Every card identity, in line order.
    pub fn card_ids(&self) -> Vec<ItemId> {
        self.card_items
            .iter()
            .flat_map(|card| card.item_ids.iter().copied())
            .collect()
    }

    /// The note identity, if any, followed by the card identities.
    pub fn item_ids(&self) -> Vec<ItemId> {
        self.note_id.into_iter().chain(self.card_ids()).collect()
    }

    /// The card holding `item_id`, and the item's sibling index in it.
    pub fn find_card(&self, item_id: ItemId) -> Option<(&CardInfo, usize)> {
        self.card_items.iter().find_map(|card| {
            card.item_ids
                .iter()
                .position(|id| *id == item_id)
                .map(|sibling| (card, sibling))
        })
    }

    /// Record a new card at a line, keeping the list sorted by line.
    /// Returns the record's index.
    pub fn track_card(&mut self, line_number: usize, fingerprint: Fingerprint) -> usize {
        let index = self
            .card_items
            .partition_point(|card| card.line_number <= line_number);
        self.card_items
            .insert(index, CardInfo::new(line_number, fingerprint));
        index
    }

    /// Bring the card records in line with the document's current cards,
    /// recording any card seen for the first time. Returns, for each
    /// occurrence, the index of its record.
    pub fn sync_cards(&mut self, occurrences: &[CardOccurrence]) -> Vec<usize> {
        let prior = std::mem::take(&mut self.card_items);
        let Reconciled { cards, mut owners } = reconcile(prior, occurrences);
        self.card_items = cards;
        for (i, occurrence) in occurrences.iter().enumerate() {
            if owners[i].is_some() {
                continue;
            }
            let index = self.track_card(occurrence.line_number, occurrence.fingerprint.clone());
            for owner in owners.iter_mut().flatten() {
                if *owner >= index {
                    *owner += 1;
                }
            }
            owners[i] = Some(index);
        }
        owners.into_iter().flatten().collect()
    }
}
