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

use std::collections::HashMap;
use std::fs::read_to_string;
use std::path::Path;

use crate::error::Fallible;

/// The name of the importance file at the collection root.
pub const IMPORTANCE_FILE: &str = "importance.json";

/// Externally computed importance scores, by document path. Documents
/// without a score count as zero.
#[derive(Clone, Debug, Default)]
pub struct Importance {
    scores: HashMap<String, f64>,
}

impl Importance {
    pub fn new(scores: HashMap<String, f64>) -> Self {
        Self { scores }
    }

    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join(IMPORTANCE_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = read_to_string(&path)?;
        let scores: HashMap<String, f64> = serde_json::from_str(&content)?;
        log::debug!("Loaded {} importance scores.", scores.len());
        Ok(Self { scores })
    }

    pub fn score(&self, path: &str) -> f64 {
        self.scores.get(path).copied().unwrap_or(0.0)
    }
}
