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

use std::sync::LazyLock;

use regex::Regex;

use crate::annotation::strip_schedules;
use crate::parser::CardParser;
use crate::tracker::card_info::CardOccurrence;
use crate::types::fingerprint::Fingerprint;

static DECK_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#[^\s#]+").unwrap());

/// The text a card is fingerprinted by: without its schedule annotation or
/// a leading deck tag. `None` for cards marked for later editing.
pub fn normalize_card_text(text: &str, edit_later_tag: &str) -> Option<String> {
    if !edit_later_tag.is_empty() && text.contains(edit_later_tag) {
        return None;
    }
    let text = strip_schedules(text);
    let text = DECK_TAG.replace(&text, "");
    Some(text.trim().to_string())
}

/// Every schedulable card in `content`, in document order.
pub fn card_occurrences(
    parser: &CardParser,
    content: &str,
    edit_later_tag: &str,
) -> Vec<CardOccurrence> {
    let mut occurrences = Vec::new();
    for card in parser.parse(content) {
        let Some(text) = normalize_card_text(&card.text, edit_later_tag) else {
            continue;
        };
        occurrences.push(CardOccurrence {
            line_number: card.line_number,
            fingerprint: Fingerprint::of_text(&text),
            sibling_count: parser.sibling_count(&card),
            text,
            raw_text: card.text,
        });
    }
    occurrences
}
