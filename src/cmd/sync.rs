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

use std::time::Instant;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::sync::SyncReport;
use crate::sync::sync_documents;
use crate::types::timestamp::Timestamp;

/// Sync every document in the collection and save the tracked-file table.
pub fn sync_collection(collection: &mut Collection, now: Timestamp) -> Fallible<SyncReport> {
    let start = Instant::now();
    let mut documents = Vec::new();
    for path in collection.documents()? {
        let content = collection.read_document(&path)?;
        documents.push((path, content));
    }
    let report = sync_documents(
        &documents,
        &mut collection.table,
        &mut collection.db,
        &collection.parser,
        &collection.settings,
        now,
    )?;
    collection.save()?;
    let duration = start.elapsed().as_millis();
    log::debug!("Synced {} documents in {duration}ms.", report.documents);
    Ok(report)
}

pub fn sync_command(directory: Option<String>) -> Fallible<()> {
    let mut collection = Collection::new(directory)?;
    let report = sync_collection(&mut collection, Timestamp::now())?;
    println!(
        "Synced {} documents: {} cards, {} new items, {} imported schedules.",
        report.documents, report.cards, report.new_items, report.imported
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::create_tmp_copy_of_test_directory;
    use crate::tracker::table::TrackedTable;

    #[test]
    fn test_sync_collection() -> Fallible<()> {
        let directory = create_tmp_copy_of_test_directory()?;
        let mut collection = Collection::new(Some(directory))?;
        let report = sync_collection(&mut collection, Timestamp::now())?;
        assert_eq!(report.documents, 2);
        // France, Germany (2), Japan, the cloze and Newton.
        assert_eq!(report.new_items, 6);

        let saved = TrackedTable::load(&collection.directory)?;
        assert_eq!(saved, collection.table);
        assert!(saved.get("archive/old.md").is_none());

        let again = sync_collection(&mut collection, Timestamp::now())?;
        assert_eq!(again.new_items, 0);
        Ok(())
    }
}
