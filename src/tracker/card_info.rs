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

use crate::types::fingerprint::Fingerprint;
use crate::types::item_id::ItemId;

/// The recorded position and identities of one card in a document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardInfo {
    /// Last known 0-based line of the card.
    pub line_number: usize,
    pub fingerprint: Fingerprint,
    /// One identity per sibling, in sibling order.
    pub item_ids: Vec<ItemId>,
}

impl CardInfo {
    pub fn new(line_number: usize, fingerprint: Fingerprint) -> Self {
        Self {
            line_number,
            fingerprint,
            item_ids: Vec::new(),
        }
    }

    /// Whether an occurrence with this fingerprint is the same card. The
    /// recorded fingerprint may contain the occurrence's.
    pub fn matches_fingerprint(&self, fingerprint: &Fingerprint) -> bool {
        self.fingerprint.contains(fingerprint)
    }
}

/// A card as it appears in the current text of a document.
#[derive(Clone, Debug, PartialEq)]
pub struct CardOccurrence {
    pub line_number: usize,
    pub fingerprint: Fingerprint,
    /// The normalized card text the fingerprint was computed from.
    pub text: String,
    /// The card's full text, annotation included.
    pub raw_text: String,
    /// How many identities the card needs.
    pub sibling_count: usize,
}
