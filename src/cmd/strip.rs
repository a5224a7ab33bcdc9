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

use std::path::Path;

use crate::annotation::has_annotation;
use crate::collection::Collection;
use crate::document::strip_document;
use crate::error::Fallible;

/// Remove every schedule annotation from a document. Returns whether the
/// document changed.
pub fn strip_file(collection: &Collection, file: &Path) -> Fallible<bool> {
    let path = collection.relative_path(file)?;
    let content = collection.read_document(&path)?;
    if !has_annotation(&content) {
        return Ok(false);
    }
    collection.write_document(&path, &strip_document(&content))?;
    log::info!("Stripped schedules from {path}.");
    Ok(true)
}

pub fn strip_command(directory: Option<String>, file: &str) -> Fallible<()> {
    let collection = Collection::new(directory)?;
    if strip_file(&collection, Path::new(file))? {
        println!("Stripped {file}.");
    } else {
        println!("Nothing to strip in {file}.");
    }
    Ok(())
}
