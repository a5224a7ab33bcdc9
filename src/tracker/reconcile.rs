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

use crate::tracker::card_info::CardInfo;
use crate::tracker::card_info::CardOccurrence;

/// The outcome of matching a document's cards against the recorded ones.
#[derive(Debug)]
pub struct Reconciled {
    /// Every record, sorted by line. Records of removed cards are kept.
    pub cards: Vec<CardInfo>,
    /// For each occurrence, the index in `cards` of the record it claimed,
    /// or `None` if it needs a fresh record.
    pub owners: Vec<Option<usize>>,
}

/// Match the cards in a document's current text against the recorded ones.
///
/// Each occurrence is matched first by fingerprint, then by line number,
/// against recorded cards not yet claimed by an earlier occurrence. A match
/// moves the record to the occurrence's line and fingerprint; its identities
/// never change.
///
/// If some occurrence matched nothing but the document holds exactly as many
/// cards as were recorded, the cards were edited rather than added: the
/// unclaimed records are realigned with the unmatched occurrences by
/// position.
pub fn reconcile(prior: Vec<CardInfo>, current: &[CardOccurrence]) -> Reconciled {
    let mut cards = prior;
    let mut claimed = vec![false; cards.len()];
    let mut owners: Vec<Option<usize>> = vec![None; current.len()];

    for (i, occurrence) in current.iter().enumerate() {
        if let Some(index) = find_match(&cards, &claimed, occurrence) {
            claimed[index] = true;
            owners[i] = Some(index);
            update(&mut cards[index], occurrence);
        }
    }

    let unmatched: Vec<usize> = (0..current.len()).filter(|i| owners[*i].is_none()).collect();
    if !unmatched.is_empty() && current.len() == cards.len() {
        log::debug!("Realigning {} edited cards by position.", unmatched.len());
        let unclaimed: Vec<usize> = (0..cards.len()).filter(|index| !claimed[*index]).collect();
        for (index, i) in unclaimed.into_iter().zip(unmatched) {
            owners[i] = Some(index);
            update(&mut cards[index], &current[i]);
        }
    }

    // Sort by line, carrying the claims along.
    let mut order: Vec<usize> = (0..cards.len()).collect();
    order.sort_by_key(|index| cards[*index].line_number);
    let mut position = vec![0; cards.len()];
    for (new, old) in order.iter().enumerate() {
        position[*old] = new;
    }
    let mut slots: Vec<Option<CardInfo>> = cards.into_iter().map(Some).collect();
    let cards = order.iter().filter_map(|old| slots[*old].take()).collect();
    let owners = owners
        .into_iter()
        .map(|owner| owner.map(|old| position[old]))
        .collect();
    Reconciled { cards, owners }
}

fn find_match(cards: &[CardInfo], claimed: &[bool], occurrence: &CardOccurrence) -> Option<usize> {
    let available = |index: &usize| !claimed[*index];
    (0..cards.len())
        .filter(available)
        .find(|index| cards[*index].matches_fingerprint(&occurrence.fingerprint))
        .or_else(|| {
            (0..cards.len())
                .filter(available)
                .find(|index| cards[*index].line_number == occurrence.line_number)
        })
}

fn update(card: &mut CardInfo, occurrence: &CardOccurrence) {
    card.line_number = occurrence.line_number;
    if card.fingerprint != occurrence.fingerprint {
        card.fingerprint = occurrence.fingerprint.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fingerprint::Fingerprint;
    use crate::types::item_id::ItemId;

    fn occurrence(line_number: usize, text: &str) -> CardOccurrence {
        CardOccurrence {
            line_number,
            fingerprint: Fingerprint::of_text(text),
            text: text.to_string(),
            raw_text: text.to_string(),
            sibling_count: 1,
        }
    }

    fn card(line_number: usize, text: &str, id: i64) -> CardInfo {
        CardInfo {
            line_number,
            fingerprint: Fingerprint::of_text(text),
            item_ids: vec![ItemId::new(id)],
        }
    }

    /// Reconcile, returning the records and the occurrences left unclaimed.
    fn run(prior: Vec<CardInfo>, current: &[CardOccurrence]) -> (Vec<CardInfo>, Vec<CardOccurrence>) {
        let Reconciled { cards, owners } = reconcile(prior, current);
        let new = current
            .iter()
            .zip(owners)
            .filter(|(_, owner)| owner.is_none())
            .map(|(occurrence, _)| occurrence.clone())
            .collect();
        (cards, new)
    }

    fn ids_by_line(cards: &[CardInfo]) -> Vec<(usize, Vec<ItemId>)> {
        cards
            .iter()
            .map(|c| (c.line_number, c.item_ids.clone()))
            .collect()
    }

    #[test]
    fn test_idempotent() {
        let prior = vec![card(0, "a::1", 1), card(2, "b::2", 2), card(4, "c::3", 3)];
        let current = vec![occurrence(0, "a::1"), occurrence(2, "b::2"), occurrence(4, "c::3")];
        let (first, new) = run(prior.clone(), &current);
        assert!(new.is_empty());
        assert_eq!(first, prior);
        let (second, new) = run(first.clone(), &current);
        assert!(new.is_empty());
        assert_eq!(second, first);
    }

    #[test]
    fn test_insertion_shifts_lines() {
        let prior = vec![card(0, "a::1", 1), card(2, "b::2", 2), card(4, "c::3", 3)];
        let n = 5;
        let current = vec![
            occurrence(n, "a::1"),
            occurrence(2 + n, "b::2"),
            occurrence(4 + n, "c::3"),
        ];
        let (cards, new) = run(prior.clone(), &current);
        assert!(new.is_empty());
        for (before, after) in prior.iter().zip(cards.iter()) {
            assert_eq!(after.line_number, before.line_number + n);
            assert_eq!(after.item_ids, before.item_ids);
            assert_eq!(after.fingerprint, before.fingerprint);
        }
    }

    #[test]
    fn test_edit_in_place_matches_by_line() {
        let prior = vec![card(0, "a::1", 1), card(2, "b::2", 2)];
        let current = vec![occurrence(0, "a::1"), occurrence(2, "b::two")];
        let (cards, new) = run(prior, &current);
        assert!(new.is_empty());
        assert_eq!(cards[1].item_ids, vec![ItemId::new(2)]);
        assert_eq!(cards[1].fingerprint, Fingerprint::of_text("b::two"));
    }

    #[test]
    fn test_edit_and_shift_realigns_by_position() {
        let prior = vec![card(0, "a::1", 1), card(2, "b::2", 2), card(4, "c::3", 3)];
        let current = vec![
            occurrence(3, "a::1"),
            occurrence(6, "b::changed"),
            occurrence(9, "c::changed"),
        ];
        let (cards, new) = run(prior, &current);
        assert!(new.is_empty());
        assert_eq!(
            ids_by_line(&cards),
            vec![
                (3, vec![ItemId::new(1)]),
                (6, vec![ItemId::new(2)]),
                (9, vec![ItemId::new(3)]),
            ]
        );
        assert_eq!(cards[2].fingerprint, Fingerprint::of_text("c::changed"));
    }

    #[test]
    fn test_new_card() {
        let prior = vec![card(0, "a::1", 1), card(2, "b::2", 2)];
        let current = vec![occurrence(0, "a::1"), occurrence(3, "new::card"), occurrence(5, "b::2")];
        let (cards, new) = run(prior, &current);
        assert_eq!(new.len(), 1);
        assert_eq!(new[0].line_number, 3);
        assert_eq!(
            ids_by_line(&cards),
            vec![(0, vec![ItemId::new(1)]), (5, vec![ItemId::new(2)])]
        );
    }

    #[test]
    fn test_removed_card_is_kept() {
        let prior = vec![card(0, "a::1", 1), card(2, "b::2", 2), card(4, "c::3", 3)];
        let current = vec![occurrence(0, "a::1"), occurrence(2, "c::3")];
        let (cards, new) = run(prior, &current);
        assert!(new.is_empty());
        assert_eq!(cards.len(), 3);
        let c = cards.iter().find(|c| c.item_ids == vec![ItemId::new(3)]).unwrap();
        assert_eq!(c.line_number, 2);
    }

    #[test]
    fn test_reordered_cards_keep_identities() {
        let prior = vec![card(0, "a::1", 1), card(2, "b::2", 2)];
        let current = vec![occurrence(0, "b::2"), occurrence(2, "a::1")];
        let (cards, new) = run(prior, &current);
        assert!(new.is_empty());
        assert_eq!(
            ids_by_line(&cards),
            vec![(0, vec![ItemId::new(2)]), (2, vec![ItemId::new(1)])]
        );
    }

    #[test]
    fn test_identical_cards_stay_distinct() {
        let prior = vec![card(0, "same::card", 1), card(2, "same::card", 2)];
        let current = vec![occurrence(0, "same::card"), occurrence(2, "same::card")];
        let (cards, new) = run(prior.clone(), &current);
        assert!(new.is_empty());
        assert_eq!(cards, prior);
    }

    #[test]
    fn test_first_sync() {
        let current = vec![occurrence(0, "a::1"), occurrence(2, "b::2")];
        let (cards, new) = run(Vec::new(), &current);
        assert!(cards.is_empty());
        assert_eq!(new, current);
    }

    #[test]
    fn test_owners_point_into_sorted_records() {
        let prior = vec![card(0, "a::1", 1), card(2, "b::2", 2)];
        let current = vec![occurrence(0, "b::2"), occurrence(2, "a::1")];
        let Reconciled { cards, owners } = reconcile(prior, &current);
        assert_eq!(owners, vec![Some(0), Some(1)]);
        assert_eq!(cards[0].item_ids, vec![ItemId::new(2)]);
        assert_eq!(cards[1].item_ids, vec![ItemId::new(1)]);
    }

    #[test]
    fn test_delete_card_above_reversed_card() {
        let mut reversed = card(2, "b:::2", 2);
        reversed.item_ids.push(ItemId::new(3));
        let prior = vec![card(0, "a::1", 1), reversed];
        // The reversed card moves up onto the line the deleted card held.
        let current = vec![occurrence(0, "b:::2")];
        let Reconciled { cards, owners } = reconcile(prior, &current);
        assert_eq!(cards.len(), 2);
        let owner = owners[0].unwrap();
        assert_eq!(cards[owner].item_ids, vec![ItemId::new(2), ItemId::new(3)]);
        assert_eq!(cards[owner].line_number, 0);
        let stale = cards.iter().find(|c| c.item_ids == vec![ItemId::new(1)]).unwrap();
        assert_eq!(stale.line_number, 0);
        assert_eq!(stale.fingerprint, Fingerprint::of_text("a::1"));
    }
}
