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

use std::collections::BTreeMap;
use std::fs::read_to_string;
use std::fs::write;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use crate::error::Fallible;
use crate::error::fail;
use crate::tracker::tracked_file::TrackedFile;
use crate::types::item_kind::ItemKind;

/// The name of the tracked-file table at the collection root.
pub const TRACKED_FILES_FILE: &str = "tracked_files.json";

/// Every tracked document, keyed by path.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackedTable {
    files: BTreeMap<String, TrackedFile>,
}

impl TrackedTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the table from the collection root. A missing file is an empty
    /// table.
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join(TRACKED_FILES_FILE);
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = read_to_string(&path)?;
        let table: TrackedTable = serde_json::from_str(&content)?;
        log::debug!("Loaded {} tracked files.", table.len());
        Ok(table)
    }

    pub fn save(&self, directory: &Path) -> Fallible<()> {
        let content = serde_json::to_string_pretty(self)?;
        write(directory.join(TRACKED_FILES_FILE), content)?;
        Ok(())
    }

    pub fn get(&self, path: &str) -> Option<&TrackedFile> {
        self.files.get(path)
    }

    pub fn get_mut(&mut self, path: &str) -> Option<&mut TrackedFile> {
        self.files.get_mut(path)
    }

    /// The record for `path`, created as an untracked card container if
    /// there is none.
    pub fn get_or_insert(&mut self, path: &str) -> &mut TrackedFile {
        self.files
            .entry(path.to_string())
            .or_insert_with(|| TrackedFile::new(path, ItemKind::Card, None))
    }

    pub fn is_tracked(&self, path: &str) -> bool {
        self.files.get(path).is_some_and(|file| file.is_tracked())
    }

    pub fn rename(&mut self, old_path: &str, new_path: &str) -> Fallible<()> {
        if self.files.contains_key(new_path) {
            return fail(format!("{new_path} is already tracked."));
        }
        let Some(mut file) = self.files.remove(old_path) else {
            return fail(format!("{old_path} is not tracked."));
        };
        file.rename(new_path);
        self.files.insert(new_path.to_string(), file);
        Ok(())
    }

    /// Tracked documents, in path order.
    pub fn files(&self) -> impl Iterator<Item = &TrackedFile> {
        self.files.values()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }
}
