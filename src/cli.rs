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

use clap::Parser;

use crate::cmd::check::check_collection;
use crate::cmd::decks::decks_command;
use crate::cmd::review::review_command;
use crate::cmd::stats::StatsFormat;
use crate::cmd::stats::print_stats;
use crate::cmd::strip::strip_command;
use crate::cmd::sync::sync_command;
use crate::cmd::track::rename_command;
use crate::cmd::track::track_command;
use crate::cmd::track::untrack_command;
use crate::error::Fallible;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Check the integrity of a collection.
    Check {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
    },
    /// Bring card identities in line with the documents.
    Sync {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
    },
    /// Review a document as a note.
    Track {
        /// The document to track.
        file: String,
        /// The deck to put the note in.
        #[arg(long)]
        deck: Option<String>,
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
    },
    /// Stop reviewing a document as a note.
    Untrack {
        file: String,
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
    },
    /// Move a document's tracking record after moving the document.
    Rename {
        from: String,
        to: String,
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
    },
    /// List decks with their due and new counts.
    Decks {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        /// List card decks instead of note decks.
        #[arg(long)]
        cards: bool,
    },
    /// Review due and new items.
    Review {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        /// The deck to review. By default, one with something to review is picked at random.
        #[arg(long)]
        deck: Option<String>,
        /// Review cards instead of notes.
        #[arg(long)]
        cards: bool,
    },
    /// Print collection statistics.
    Stats {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        /// Output format.
        #[arg(long, default_value_t = StatsFormat::Text)]
        format: StatsFormat,
        /// Statistics for cards instead of notes.
        #[arg(long)]
        cards: bool,
    },
    /// Remove every schedule annotation from a document.
    Strip {
        file: String,
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
    },
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Check { directory } => check_collection(directory),
        Command::Sync { directory } => sync_command(directory),
        Command::Track {
            file,
            deck,
            directory,
        } => track_command(directory, &file, deck),
        Command::Untrack { file, directory } => untrack_command(directory, &file),
        Command::Rename {
            from,
            to,
            directory,
        } => rename_command(directory, &from, &to),
        Command::Decks { directory, cards } => decks_command(directory, cards),
        Command::Review {
            directory,
            deck,
            cards,
        } => review_command(directory, deck, cards),
        Command::Stats {
            directory,
            format,
            cards,
        } => print_stats(directory, format, cards),
        Command::Strip { file, directory } => strip_command(directory, &file),
    }
}
