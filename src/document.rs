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

//! Writing schedules back into document text.

use crate::annotation::format_annotation;
use crate::annotation::has_annotation;
use crate::annotation::strip_schedules;
use crate::error::Fallible;
use crate::error::fail;
use crate::parser::CardParser;
use crate::types::schedule::Ease;
use crate::types::schedule::ScheduleRecord;

/// Put `record` in the slot of sibling `index`, padding missing siblings
/// with sentinel records so every sibling keeps its position.
pub fn set_sibling_schedule(
    records: &mut Vec<ScheduleRecord>,
    sibling_count: usize,
    index: usize,
    record: ScheduleRecord,
    base_ease: Ease,
) {
    let len = sibling_count.max(index + 1);
    records.truncate(len);
    while records.len() < len {
        records.push(ScheduleRecord::sentinel(base_ease));
    }
    records[index] = record;
}

/// Rewrite the annotation of the card anchored at `line_number`, returning
/// the whole new document text.
pub fn write_card_schedules(
    content: &str,
    parser: &CardParser,
    line_number: usize,
    records: &[ScheduleRecord],
) -> Fallible<String> {
    let Some(card) = parser
        .parse(content)
        .into_iter()
        .find(|card| card.line_number == line_number)
    else {
        return fail(format!("no card at line {}.", line_number + 1));
    };
    let normalized = content.replace("\r\n", "\n");
    let lines: Vec<&str> = normalized.split('\n').collect();
    let last_line = card.last_line.min(lines.len().saturating_sub(1));

    // The card's own lines, comments and fences included, minus any
    // annotation they hold. The new annotation goes on a line of its own.
    let mut card_lines: Vec<String> = Vec::with_capacity(last_line + 2 - card.first_line);
    for line in &lines[card.first_line..=last_line] {
        if !has_annotation(line) {
            card_lines.push(line.to_string());
            continue;
        }
        let stripped = strip_schedules(line);
        if !stripped.trim().is_empty() {
            card_lines.push(stripped.trim_end().to_string());
        }
    }
    card_lines.push(format_annotation(records));

    let mut output: Vec<&str> = Vec::with_capacity(lines.len() + 1);
    output.extend(&lines[..card.first_line]);
    output.extend(card_lines.iter().map(String::as_str));
    output.extend(&lines[last_line + 1..]);
    Ok(output.join("\n"))
}

/// Remove every schedule annotation from a document. Lines holding nothing
/// but an annotation are removed entirely.
pub fn strip_document(content: &str) -> String {
    let lines: Vec<String> = content
        .split('\n')
        .filter_map(|line| {
            if !has_annotation(line) {
                return Some(line.to_string());
            }
            let stripped = strip_schedules(line);
            if stripped.trim().is_empty() {
                None
            } else {
                Some(stripped.trim_end().to_string())
            }
        })
        .collect();
    lines.join("\n")
}
