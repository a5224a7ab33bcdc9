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

use std::env::current_dir;
use std::fs::read_to_string;
use std::fs::write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use walkdir::WalkDir;

use crate::db::DATABASE_FILE;
use crate::db::Database;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::importance::Importance;
use crate::parser::CardParser;
use crate::settings::Settings;
use crate::tracker::table::TrackedTable;

/// A directory of documents, with its settings and stores.
pub struct Collection {
    pub directory: PathBuf,
    pub settings: Settings,
    pub parser: CardParser,
    pub db: Database,
    pub table: TrackedTable,
    pub importance: Importance,
}

impl Collection {
    pub fn new(directory: Option<String>) -> Fallible<Self> {
        let directory: PathBuf = match directory {
            Some(dir) => PathBuf::from(dir),
            None => current_dir()?,
        };
        let directory = if directory.exists() {
            directory.canonicalize()?
        } else {
            return fail("directory does not exist.");
        };

        let settings = Settings::load(&directory)?;
        let parser = CardParser::new(&settings.delimiters)?;

        let db_path: PathBuf = directory.join(DATABASE_FILE);
        let db_path: &str = db_path
            .to_str()
            .ok_or_else(|| ErrorReport::new("invalid path"))?;
        let db: Database = Database::new(db_path)?;

        let table = TrackedTable::load(&directory)?;
        let importance = Importance::load(&directory)?;

        Ok(Self {
            directory,
            settings,
            parser,
            db,
            table,
            importance,
        })
    }

    /// Every document in the collection outside the ignored folders, as
    /// collection-relative paths in sorted order.
    pub fn documents(&self) -> Fallible<Vec<String>> {
        log::debug!("Listing documents...");
        let start = Instant::now();
        let mut documents = Vec::new();
        for entry in WalkDir::new(&self.directory) {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "md") {
                let relative = self.relative_path(path)?;
                if is_ignored(&self.settings.ignored_folders, &relative) {
                    log::debug!("Skipping {relative}: ignored folder.");
                    continue;
                }
                documents.push(relative);
            }
        }
        documents.sort();
        let duration = start.elapsed().as_millis();
        log::debug!("Found {} documents in {duration}ms.", documents.len());
        Ok(documents)
    }

    /// The collection-relative path of a file, with `/` separators.
    pub fn relative_path(&self, path: &Path) -> Fallible<String> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            current_dir()?.join(path)
        };
        let absolute = if absolute.exists() {
            absolute.canonicalize()?
        } else {
            absolute
        };
        let Ok(relative) = absolute.strip_prefix(&self.directory) else {
            return fail(format!("{} is not in the collection.", path.display()));
        };
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Ok(parts.join("/"))
    }

    pub fn is_ignored(&self, path: &str) -> bool {
        is_ignored(&self.settings.ignored_folders, path)
    }

    pub fn read_document(&self, path: &str) -> Fallible<String> {
        Ok(read_to_string(self.directory.join(path))?)
    }

    pub fn write_document(&self, path: &str, content: &str) -> Fallible<()> {
        write(self.directory.join(path), content)?;
        Ok(())
    }

    /// Persist the tracked-file table.
    pub fn save(&self) -> Fallible<()> {
        self.table.save(&self.directory)
    }
}

/// Whether `path` lies inside one of `folders`.
pub fn is_ignored(folders: &[String], path: &str) -> bool {
    folders.iter().any(|folder| {
        let folder = folder.trim_matches('/');
        !folder.is_empty()
            && (path == folder
                || path
                    .strip_prefix(folder)
                    .is_some_and(|rest| rest.starts_with('/')))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::create_tmp_copy_of_test_directory;

    #[test]
    fn test_non_existent_directory() {
        assert!(Collection::new(Some("./derpherp".to_string())).is_err());
    }

    #[test]
    fn test_documents() -> Fallible<()> {
        let directory = create_tmp_copy_of_test_directory()?;
        let collection = Collection::new(Some(directory))?;
        let documents = collection.documents()?;
        assert!(documents.contains(&"capitals.md".to_string()));
        assert!(documents.contains(&"science/physics.md".to_string()));
        assert!(!documents.iter().any(|d| d.starts_with("archive/")));
        Ok(())
    }

    #[test]
    fn test_relative_path() -> Fallible<()> {
        let directory = create_tmp_copy_of_test_directory()?;
        let collection = Collection::new(Some(directory))?;
        let path = collection.directory.join("science").join("physics.md");
        assert_eq!(collection.relative_path(&path)?, "science/physics.md");
        assert!(collection.relative_path(Path::new("/elsewhere/x.md")).is_err());
        Ok(())
    }

    #[test]
    fn test_is_ignored() {
        let folders = vec!["archive".to_string(), "drafts/".to_string()];
        assert!(is_ignored(&folders, "archive/old.md"));
        assert!(is_ignored(&folders, "drafts/x/y.md"));
        assert!(!is_ignored(&folders, "archived.md"));
        assert!(!is_ignored(&folders, "notes/archive/x.md"));
        assert!(!is_ignored(&[], "archive/old.md"));
    }
}
