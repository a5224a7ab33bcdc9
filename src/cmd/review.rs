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

//! The interactive review loop.

use std::io::BufRead;
use std::io::Write;
use std::io::stdin;
use std::io::stdout;

use rand::Rng;
use rand::thread_rng;

use crate::cmd::sync::sync_collection;
use crate::collection::Collection;
use crate::db::Review;
use crate::deck::ReviewDeck;
use crate::deck::SchedNote;
use crate::deck::build_decks;
use crate::deck::deck_for_review_directly;
use crate::deck::next_due_note_index;
use crate::document::set_sibling_schedule;
use crate::document::write_card_schedules;
use crate::error::Fallible;
use crate::error::fail;
use crate::scheduler::calculator::ScheduleCalculator;
use crate::scheduler::note_ease::NoteEases;
use crate::session::ReviewAction;
use crate::session::ReviewOutcome;
use crate::session::ReviewSession;
use crate::sync::sync_document;
use crate::tracker::occurrence::card_occurrences;
use crate::tracker::table::TrackedTable;
use crate::types::item_kind::ItemKind;
use crate::types::response::Response;
use crate::types::schedule::ScheduleRecord;
use crate::types::timestamp::Timestamp;

const ANSWER_PROMPT: &str = "[1 again, 2 hard, 3 good, 4 easy, r reset, s skip, q quit]";

pub struct ReviewOptions {
    /// Review this deck instead of picking one.
    pub deck: Option<String>,
    pub kind: ItemKind,
}

#[derive(Debug, PartialEq)]
enum Choice {
    Act(ReviewAction),
    Quit,
}

fn parse_choice(input: &str) -> Option<Choice> {
    match input {
        "q" => Some(Choice::Quit),
        "r" => Some(Choice::Act(ReviewAction::Reset)),
        "s" => Some(Choice::Act(ReviewAction::Skip)),
        _ => {
            let number: u8 = input.parse().ok()?;
            let response = Response::try_from(number).ok()?;
            Some(Choice::Act(ReviewAction::Respond(response)))
        }
    }
}

/// A trimmed line of input, or `None` at end of input.
fn read_input(input: &mut impl BufRead) -> Fallible<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

enum Shown {
    Ready,
    /// The card is no longer in its document.
    Missing,
    Quit,
}

/// Review one deck until it runs out or the reviewer quits. Returns how
/// many items were rescheduled.
pub fn review_collection(
    collection: &mut Collection,
    options: &ReviewOptions,
    now: Timestamp,
    input: &mut impl BufRead,
    output: &mut impl Write,
    rng: &mut impl Rng,
) -> Fallible<usize> {
    sync_collection(collection, now)?;
    let today = now.local_date();
    let items = collection.db.items_by_id(today)?;
    let mut decks = build_decks(
        &collection.table,
        &items,
        options.kind,
        today,
        &collection.importance,
    )?;
    let deck_name = match &options.deck {
        Some(name) => name.clone(),
        None => match deck_for_review_directly(&decks, rng) {
            Some(name) => name,
            None => {
                writeln!(output, "Nothing to review.")?;
                return Ok(0);
            }
        },
    };
    let Some(mut deck) = decks.remove(&deck_name) else {
        return fail(format!("no {} deck named {deck_name}.", options.kind));
    };
    log::debug!(
        "Reviewing {deck_name}: {} due, {} new.",
        deck.due_notes_count,
        deck.new_notes.len()
    );

    let note_eases = NoteEases::from_collection(&collection.table, &items);
    let stored = items.values().filter_map(|row| row.schedule.as_ref());
    let mut session = ReviewSession::new(&collection.settings, now, stored);

    loop {
        let queue = pending(&deck, &collection.table, &session);
        let Some(index) =
            next_due_note_index(queue.len(), collection.settings.open_random_note, rng)
        else {
            break;
        };
        let note = queue[index].clone();

        match show(collection, &note, &deck_name, input, output)? {
            Shown::Ready => {}
            Shown::Missing => {
                log::warn!("Skipping item {}: its card is gone from {}.", note.item_id, note.path);
                session.skip(note.item_id);
                continue;
            }
            Shown::Quit => break,
        }

        let choice = loop {
            writeln!(output, "{ANSWER_PROMPT}")?;
            output.flush()?;
            let Some(line) = read_input(input)? else {
                break Choice::Quit;
            };
            match parse_choice(&line) {
                Some(choice) => break choice,
                None => writeln!(output, "Invalid input.")?,
            }
        };
        let action = match choice {
            Choice::Quit => break,
            Choice::Act(action) => action,
        };

        let reviewed_at = Timestamp::now();
        let calculator = ScheduleCalculator::new(&collection.settings);
        let note_ease = note_eases.get(&note.path);
        match session.apply(&note, action, &calculator, note_ease) {
            ReviewOutcome::Skipped => {
                if let Some(item_id) = session.current {
                    log::debug!("Skipped item {item_id}.");
                }
            }
            ReviewOutcome::Rescheduled {
                schedule,
                response,
                was_new,
            } => {
                match response {
                    Some(response) => collection.db.record_review(&Review {
                        item_id: note.item_id,
                        reviewed_at,
                        response,
                        schedule: schedule.clone(),
                        was_new,
                    })?,
                    None => collection.db.set_schedule(note.item_id, &schedule)?,
                }
                if note.card.is_some() {
                    write_back(collection, &note, &schedule, now)?;
                    if collection.settings.bury_sibling_cards {
                        if let Some(file) = collection.table.get(&note.path) {
                            session.bury(file.card_items.iter().map(|c| c.fingerprint.clone()));
                        }
                    }
                }
                deck.remove(note.item_id, today);
                writeln!(
                    output,
                    "Next review on {} (interval {}, ease {}).",
                    schedule.format_due_date(),
                    schedule.interval,
                    schedule.ease
                )?;
                if note.card.is_none() && !collection.settings.auto_next_note {
                    break;
                }
            }
        }
    }

    collection.save()?;
    let reviewed = session.reviewed();
    log::info!(
        "Session started at {} reviewed {reviewed} items.",
        session.started_at.local().format("%H:%M")
    );
    if reviewed == 1 {
        writeln!(output, "Reviewed 1 item.")?;
    } else {
        writeln!(output, "Reviewed {reviewed} items.")?;
    }
    Ok(reviewed)
}

/// What is left to review: the due items, or once those are done, the new
/// ones. Skipped and buried items are left out.
fn pending<'a>(
    deck: &'a ReviewDeck,
    table: &TrackedTable,
    session: &ReviewSession,
) -> Vec<&'a SchedNote> {
    let available = |note: &&SchedNote| {
        !session.is_skipped(note.item_id) && !is_buried(table, session, note)
    };
    let due: Vec<&SchedNote> = deck.due_notes().iter().filter(available).collect();
    if !due.is_empty() {
        return due;
    }
    deck.new_notes.iter().filter(available).collect()
}

fn is_buried(table: &TrackedTable, session: &ReviewSession, note: &SchedNote) -> bool {
    note.card.is_some()
        && table
            .get(&note.path)
            .and_then(|file| file.find_card(note.item_id))
            .is_some_and(|(card, _)| session.is_buried(&card.fingerprint))
}

/// Print an item. For cards, the answer is revealed after the reviewer
/// presses enter.
fn show(
    collection: &Collection,
    note: &SchedNote,
    deck_name: &str,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Fallible<Shown> {
    writeln!(output)?;
    let Some(position) = note.card else {
        writeln!(output, "[{deck_name}] {}", note.path)?;
        return Ok(Shown::Ready);
    };
    let Some((card, _)) = collection
        .table
        .get(&note.path)
        .and_then(|file| file.find_card(note.item_id))
    else {
        return Ok(Shown::Missing);
    };
    let Ok(content) = collection.read_document(&note.path) else {
        return Ok(Shown::Missing);
    };
    let edit_later_tag = &collection.settings.edit_later_tag;
    let present = card_occurrences(&collection.parser, &content, edit_later_tag)
        .iter()
        .any(|o| o.line_number == card.line_number && card.matches_fingerprint(&o.fingerprint));
    let parsed = collection
        .parser
        .parse(&content)
        .into_iter()
        .find(|parsed| parsed.line_number == card.line_number);
    let (true, Some(parsed)) = (present, parsed) else {
        return Ok(Shown::Missing);
    };

    let (front, back) = collection.parser.sides(&parsed, position.sibling);
    writeln!(output, "[{deck_name}] {}:{}", note.path, card.line_number + 1)?;
    writeln!(output, "{front}")?;
    writeln!(output, "[enter to reveal, q to quit]")?;
    output.flush()?;
    match read_input(input)?.as_deref() {
        None | Some("q") => return Ok(Shown::Quit),
        Some(_) => {}
    }
    writeln!(output, "{back}")?;
    Ok(Shown::Ready)
}

/// Write the schedules of every sibling of the reviewed card into its
/// annotation, then resync the document so later cards keep their lines.
fn write_back(
    collection: &mut Collection,
    note: &SchedNote,
    schedule: &ScheduleRecord,
    now: Timestamp,
) -> Fallible<()> {
    let today = now.local_date();
    let base_ease = collection.settings.base_ease;
    let Some((card, sibling)) = collection
        .table
        .get(&note.path)
        .and_then(|file| file.find_card(note.item_id))
    else {
        return Ok(());
    };
    let line_number = card.line_number;
    let item_ids = card.item_ids.clone();

    let mut records = Vec::with_capacity(item_ids.len());
    for item_id in &item_ids {
        let record = collection
            .db
            .get_schedule(*item_id, today)?
            .unwrap_or_else(|| ScheduleRecord::sentinel(base_ease));
        records.push(record);
    }
    set_sibling_schedule(&mut records, item_ids.len(), sibling, schedule.clone(), base_ease);

    let content = collection.read_document(&note.path)?;
    let updated = write_card_schedules(&content, &collection.parser, line_number, &records)?;
    collection.write_document(&note.path, &updated)?;
    sync_document(
        &note.path,
        &updated,
        &mut collection.table,
        &mut collection.db,
        &collection.parser,
        &collection.settings,
        now,
    )?;
    Ok(())
}

pub fn review_command(directory: Option<String>, deck: Option<String>, cards: bool) -> Fallible<()> {
    let mut collection = Collection::new(directory)?;
    let options = ReviewOptions {
        deck,
        kind: if cards { ItemKind::Card } else { ItemKind::Note },
    };
    let mut input = stdin().lock();
    let mut output = stdout().lock();
    let mut rng = thread_rng();
    review_collection(
        &mut collection,
        &options,
        Timestamp::now(),
        &mut input,
        &mut output,
        &mut rng,
    )?;
    Ok(())
}
