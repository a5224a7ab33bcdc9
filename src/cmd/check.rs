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

use crate::collection::Collection;
use crate::error::Fallible;
use crate::error::fail;

/// Load the collection, parse every document, and make sure every tracked
/// identity exists in the item store.
pub fn check_collection(directory: Option<String>) -> Fallible<()> {
    let collection = Collection::new(directory)?;
    let mut cards = 0;
    for path in collection.documents()? {
        let content = collection.read_document(&path)?;
        cards += collection.parser.parse(&content).len();
    }
    log::debug!("Parsed {cards} cards.");
    for file in collection.table.files() {
        for item_id in file.item_ids() {
            if collection.db.item_kind(item_id).is_err() {
                return fail(format!("{} refers to missing item {item_id}.", file.path));
            }
        }
    }
    println!("ok");
    Ok(())
}
