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

use std::fs::copy;
use std::fs::create_dir_all;
use std::path::PathBuf;

use tempfile::tempdir;
use walkdir::WalkDir;

use crate::db::DATABASE_FILE;
use crate::error::Fallible;
use crate::tracker::table::TRACKED_FILES_FILE;

pub fn create_tmp_copy_of_test_directory() -> Fallible<String> {
    let source: PathBuf = PathBuf::from("./test").canonicalize()?;
    let target: PathBuf = tempdir()?.path().to_path_buf();
    create_dir_all(&target)?;
    let target = target.canonicalize()?;
    for entry in WalkDir::new(&source) {
        let entry = entry?;
        let path = entry.path();
        let Ok(relative) = path.strip_prefix(&source) else {
            continue;
        };
        let target_path = target.join(relative);
        if path.is_dir() {
            create_dir_all(&target_path)?;
        } else if path.is_file() {
            if let Some(file_name) = path.file_name() {
                if file_name != DATABASE_FILE && file_name != TRACKED_FILES_FILE {
                    copy(path, &target_path)?;
                }
            }
        }
    }
    Ok(target.display().to_string())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_create_tmp_copy_of_test_directory() -> Fallible<()> {
        let result = create_tmp_copy_of_test_directory()?;
        let root = Path::new(&result);
        assert!(root.join("capitals.md").exists());
        assert!(root.join("science").join("physics.md").exists());
        Ok(())
    }
}
