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

//! Adding documents to review as notes, and moving their records.

use std::path::Path;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::error::fail;
use crate::settings::DEFAULT_DECK_NAME;
use crate::sync::sync_document;
use crate::types::item_kind::ItemKind;
use crate::types::timestamp::Timestamp;

/// Track a document as a note. An already tracked note keeps its deck
/// unless a new one is given.
pub fn track_document(
    collection: &mut Collection,
    file: &Path,
    deck: Option<String>,
    now: Timestamp,
) -> Fallible<String> {
    let path = collection.relative_path(file)?;
    if collection.is_ignored(&path) {
        return fail("document in ignored location.");
    }
    if !collection.directory.join(&path).is_file() {
        return fail(format!("{path} does not exist."));
    }
    let content = collection.read_document(&path)?;

    let record = collection.table.get_or_insert(&path);
    match (record.is_tracked_note(), deck) {
        (true, Some(deck)) => record.retag(&deck),
        (true, None) => {}
        (false, deck) => record.track(ItemKind::Note, deck),
    }
    let deck = record.deck_name().unwrap_or(DEFAULT_DECK_NAME).to_string();

    sync_document(
        &path,
        &content,
        &mut collection.table,
        &mut collection.db,
        &collection.parser,
        &collection.settings,
        now,
    )?;
    collection.save()?;
    log::info!("Tracking {path} in deck {deck}.");
    Ok(deck)
}

/// Stop reviewing a document as a note. Its cards stay tracked.
pub fn untrack_document(collection: &mut Collection, file: &Path) -> Fallible<()> {
    let path = collection.relative_path(file)?;
    let Some(record) = collection.table.get_mut(&path) else {
        return fail(format!("{path} is not tracked."));
    };
    if !record.is_tracked_note() {
        return fail(format!("{path} is not tracked."));
    }
    record.untrack();
    collection.save()?;
    log::info!("Untracked {path}.");
    Ok(())
}

/// Move a document's record after the file itself was moved.
pub fn rename_document(collection: &mut Collection, from: &Path, to: &Path) -> Fallible<()> {
    let old_path = collection.relative_path(from)?;
    let new_path = collection.relative_path(to)?;
    if collection.is_ignored(&new_path) {
        return fail("document in ignored location.");
    }
    collection.table.rename(&old_path, &new_path)?;
    collection.save()
}

pub fn track_command(directory: Option<String>, file: &str, deck: Option<String>) -> Fallible<()> {
    let mut collection = Collection::new(directory)?;
    let deck = track_document(&mut collection, Path::new(file), deck, Timestamp::now())?;
    println!("Tracking {file} in deck {deck}.");
    Ok(())
}

pub fn untrack_command(directory: Option<String>, file: &str) -> Fallible<()> {
    let mut collection = Collection::new(directory)?;
    untrack_document(&mut collection, Path::new(file))?;
    println!("Untracked {file}.");
    Ok(())
}

pub fn rename_command(directory: Option<String>, from: &str, to: &str) -> Fallible<()> {
    let mut collection = Collection::new(directory)?;
    rename_document(&mut collection, Path::new(from), Path::new(to))?;
    println!("Moved {from} to {to}.");
    Ok(())
}
