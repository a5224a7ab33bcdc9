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

use std::fs::read_to_string;
use std::path::Path;

use regex::Regex;
use serde::Deserialize;

use crate::error::Fallible;
use crate::types::response::Response;
use crate::types::schedule::Ease;

/// The name of the settings file at the collection root.
pub const SETTINGS_FILE: &str = "recall.toml";

/// The deck a note lands in when it is tracked without a deck name.
pub const DEFAULT_DECK_NAME: &str = "default";

#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlgorithmKind {
    /// Ease-factor based interval growth.
    Classic,
    /// The FSRS memory model.
    Memory,
}

/// Where the due-date histogram used for load balancing comes from.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistogramScope {
    /// Starts empty with every review session.
    Session,
    /// Seeded from every stored schedule when a session starts.
    Collection,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub algorithm: AlgorithmKind,
    /// The ease given to items with no history.
    pub base_ease: Ease,
    /// Ease never drops below this.
    pub min_ease: Ease,
    /// Subtracted from the ease on a failed review.
    pub lapse_penalty: Ease,
    pub ease_step_hard: Ease,
    pub ease_step_good: Ease,
    pub ease_step_easy: Ease,
    pub hard_interval_factor: f64,
    pub easy_bonus: f64,
    /// The longest interval, in days.
    pub maximum_interval: f64,
    pub load_balance: LoadBalance,
    pub delimiters: Delimiters,
    /// Cards containing this tag are not scheduled.
    pub edit_later_tag: String,
    pub auto_next_note: bool,
    pub open_random_note: bool,
    /// Skip a note's cards for the rest of the session after reviewing the
    /// note itself.
    pub bury_sibling_cards: bool,
    /// Collection-relative folders whose documents are never tracked.
    pub ignored_folders: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            algorithm: AlgorithmKind::Classic,
            base_ease: 250,
            min_ease: 130,
            lapse_penalty: 20,
            ease_step_hard: -15,
            ease_step_good: 0,
            ease_step_easy: 15,
            hard_interval_factor: 1.2,
            easy_bonus: 1.3,
            maximum_interval: 36525.0,
            load_balance: LoadBalance::default(),
            delimiters: Delimiters::default(),
            edit_later_tag: "#edit-later".to_string(),
            auto_next_note: false,
            open_random_note: false,
            bury_sibling_cards: false,
            ignored_folders: Vec::new(),
        }
    }
}

/// Controls how computed due dates are spread over nearby days.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LoadBalance {
    pub enabled: bool,
    pub scope: HistogramScope,
    /// Intervals up to this many days are never moved.
    pub min_interval: i64,
    /// Window for intervals under a week.
    pub short_window: i64,
    /// Window, as a fraction of the interval, for intervals under a month.
    pub medium_ratio: f64,
    /// Window, as a fraction of the interval, for longer intervals.
    pub long_ratio: f64,
}

impl Default for LoadBalance {
    fn default() -> Self {
        Self {
            enabled: true,
            scope: HistogramScope::Collection,
            min_interval: 4,
            short_window: 1,
            medium_ratio: 0.15,
            long_ratio: 0.05,
        }
    }
}

impl LoadBalance {
    /// How many days either side of `interval` the due date may move.
    pub fn window(&self, interval: i64) -> i64 {
        if interval <= self.min_interval {
            0
        } else if interval < 7 {
            self.short_window
        } else if interval < 30 {
            (interval as f64 * self.medium_ratio).floor().max(2.0) as i64
        } else {
            (interval as f64 * self.long_ratio).floor().max(4.0) as i64
        }
    }
}

/// The markers that turn a block of text into a card.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Delimiters {
    pub single_line: String,
    pub single_line_reversed: String,
    pub multi_line: String,
    pub multi_line_reversed: String,
    /// Regular expressions; a line matching any of them starts a cloze card.
    pub cloze_patterns: Vec<String>,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            single_line: "::".to_string(),
            single_line_reversed: ":::".to_string(),
            multi_line: "?".to_string(),
            multi_line_reversed: "??".to_string(),
            cloze_patterns: vec![
                r"==.*?==".to_string(),
                r"\{\{.*?\}\}".to_string(),
            ],
        }
    }
}

impl Delimiters {
    pub fn compile_cloze_patterns(&self) -> Fallible<Vec<Regex>> {
        let mut patterns = Vec::new();
        for pattern in &self.cloze_patterns {
            patterns.push(Regex::new(pattern)?);
        }
        Ok(patterns)
    }
}

impl Settings {
    /// Load settings from the collection root. A missing file yields the
    /// defaults.
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join(SETTINGS_FILE);
        if !path.exists() {
            log::debug!("No settings file, using defaults.");
            return Ok(Self::default());
        }
        let content = read_to_string(&path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Fallible<Self> {
        let settings: Settings = toml::from_str(content)?;
        // Surface broken patterns now rather than on the first parse.
        settings.delimiters.compile_cloze_patterns()?;
        Ok(settings)
    }

    /// The ease change for a successful response tier.
    pub fn ease_step(&self, response: Response) -> Ease {
        match response {
            Response::Again => -self.lapse_penalty,
            Response::Hard => self.ease_step_hard,
            Response::Good => self.ease_step_good,
            Response::Easy => self.ease_step_easy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() -> Fallible<()> {
        let settings = Settings::parse("")?;
        assert_eq!(settings.algorithm, AlgorithmKind::Classic);
        assert_eq!(settings.base_ease, 250);
        assert_eq!(settings.min_ease, 130);
        assert_eq!(settings.delimiters.single_line, "::");
        assert_eq!(settings.load_balance.scope, HistogramScope::Collection);
        Ok(())
    }

    #[test]
    fn test_partial_file() -> Fallible<()> {
        let content = r#"
algorithm = "memory"
base_ease = 300

[load_balance]
scope = "session"

[delimiters]
single_line = ">>"
"#;
        let settings = Settings::parse(content)?;
        assert_eq!(settings.algorithm, AlgorithmKind::Memory);
        assert_eq!(settings.base_ease, 300);
        assert_eq!(settings.min_ease, 130);
        assert_eq!(settings.load_balance.scope, HistogramScope::Session);
        assert!(settings.load_balance.enabled);
        assert_eq!(settings.delimiters.single_line, ">>");
        assert_eq!(settings.delimiters.multi_line, "?");
        Ok(())
    }

    #[test]
    fn test_invalid_cloze_pattern() {
        let content = r#"
[delimiters]
cloze_patterns = ["(unclosed"]
"#;
        assert!(Settings::parse(content).is_err());
    }

    #[test]
    fn test_unknown_algorithm() {
        assert!(Settings::parse("algorithm = \"random\"").is_err());
    }

    #[test]
    fn test_window() {
        let lb = LoadBalance::default();
        assert_eq!(lb.window(1), 0);
        assert_eq!(lb.window(4), 0);
        assert_eq!(lb.window(5), 1);
        assert_eq!(lb.window(10), 2);
        assert_eq!(lb.window(20), 3);
        assert_eq!(lb.window(40), 4);
        assert_eq!(lb.window(200), 10);
    }

    #[test]
    fn test_ease_step() {
        let settings = Settings::default();
        assert_eq!(settings.ease_step(Response::Again), -20);
        assert_eq!(settings.ease_step(Response::Hard), -15);
        assert_eq!(settings.ease_step(Response::Good), 0);
        assert_eq!(settings.ease_step(Response::Easy), 15);
    }
}
