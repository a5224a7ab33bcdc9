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

//! Schedule annotations embedded in documents.
//!
//! A card's schedule lives in an HTML comment after its answer. The legacy
//! encoding holds one record:
//!
//! ```text
//! <!--SR:2023-09-02,4,270-->
//! ```
//!
//! Cards with siblings (reversed cards, clozes with several deletions) use
//! one `!`-prefixed group per sibling, in document order:
//!
//! ```text
//! <!--SR:!2023-09-02,4,270!2023-09-02,5,270-->
//! ```

use std::sync::LazyLock;

use chrono::TimeDelta;
use regex::Captures;
use regex::Regex;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::types::date::Date;
use crate::types::schedule::ScheduleRecord;

static ANNOTATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<!--SR:(.*?)-->").unwrap());

static SIBLING_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!([\d-]+),([\d.]+),(\d+)").unwrap());

static LEGACY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!--SR:([\d-]+),([\d.]+),(\d+)-->").unwrap());

/// Extract every schedule record from `text`. Malformed annotations yield no
/// records at all, so the card is treated as new.
pub fn parse_schedules(text: &str, today: Date) -> Vec<ScheduleRecord> {
    let mut groups: Vec<Captures> = Vec::new();
    for annotation in ANNOTATION.captures_iter(text) {
        if let Some(body) = annotation.get(1) {
            groups.extend(SIBLING_GROUP.captures_iter(body.as_str()));
        }
    }
    if groups.is_empty() {
        groups = LEGACY.captures_iter(text).collect();
    }
    let mut records = Vec::with_capacity(groups.len());
    for group in groups {
        match parse_group(&group, today) {
            Ok(record) => records.push(record),
            Err(e) => {
                log::warn!("Ignoring malformed schedule annotation: {e}");
                return Vec::new();
            }
        }
    }
    records
}

fn parse_group(group: &Captures, today: Date) -> Fallible<ScheduleRecord> {
    let due_date = Date::parse(&group[1])?;
    let interval: f64 = group[2]
        .parse()
        .map_err(|_| ErrorReport::new(format!("bad interval {}", &group[2])))?;
    let ease: i64 = group[3]
        .parse()
        .map_err(|_| ErrorReport::new(format!("bad ease {}", &group[3])))?;
    let delay = TimeDelta::days(today.days_since(due_date));
    Ok(ScheduleRecord::new(due_date, interval, ease, delay))
}

/// Format sibling records as a single multi-record annotation.
pub fn format_annotation(records: &[ScheduleRecord]) -> String {
    let groups: String = records.iter().map(|r| r.format_schedule()).collect();
    format!("<!--SR:{groups}-->")
}

/// Remove every schedule annotation, leaving all other text untouched.
pub fn strip_schedules(text: &str) -> String {
    ANNOTATION.replace_all(text, "").into_owned()
}

pub fn has_annotation(text: &str) -> bool {
    ANNOTATION.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> Date {
        Date::ymd(2023, 9, 1)
    }

    #[test]
    fn test_multi_record() {
        let text = "Question::Answer\n<!--SR:!2023-09-02,4,270!2023-09-02,5,270-->";
        let records = parse_schedules(text, today());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].due_date, Date::ymd(2023, 9, 2));
        assert_eq!(records[0].interval, 4.0);
        assert_eq!(records[0].ease, 270);
        assert_eq!(records[1].due_date, Date::ymd(2023, 9, 2));
        assert_eq!(records[1].interval, 5.0);
        assert_eq!(records[1].ease, 270);
    }

    #[test]
    fn test_legacy_record() {
        let text = "Question\n?\nAnswer <!--SR:2023-08-25,12,230-->";
        let records = parse_schedules(text, today());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].due_date, Date::ymd(2023, 8, 25));
        assert_eq!(records[0].interval, 12.0);
        assert_eq!(records[0].ease, 230);
        // Reviewed a week after it became due.
        assert_eq!(records[0].delay_before_review, TimeDelta::days(7));
        assert_eq!(records[0].delay_days(), 7);
    }

    #[test]
    fn test_no_annotation() {
        assert!(parse_schedules("Question::Answer", today()).is_empty());
    }

    #[test]
    fn test_malformed_annotation_is_new() {
        assert!(parse_schedules("Q::A <!--SR:!2023-13-45,4,270-->", today()).is_empty());
        assert!(parse_schedules("Q::A <!--SR:!2023-09-02,4.4.4,270-->", today()).is_empty());
        assert!(parse_schedules("Q::A <!--SR:garbage-->", today()).is_empty());
        // One bad sibling spoils the whole annotation.
        let text = "Q:::A <!--SR:!2023-09-02,4,270!2023-09-32,5,270-->";
        assert!(parse_schedules(text, today()).is_empty());
    }

    #[test]
    fn test_exclamation_outside_annotation_ignored() {
        let text = "Wow!2023-09-02,4,270 is not a schedule::Answer";
        assert!(parse_schedules(text, today()).is_empty());
    }

    #[test]
    fn test_sentinel_sibling() {
        let text = "A:::B <!--SR:!2000-01-01,1,250!2023-09-05,3,250-->";
        let records = parse_schedules(text, today());
        assert_eq!(records.len(), 2);
        assert!(records[0].is_sentinel());
        assert!(!records[1].is_sentinel());
    }

    #[test]
    fn test_round_trip() {
        let records = vec![
            ScheduleRecord::new(Date::ymd(2023, 9, 2), 1.0, 250, TimeDelta::zero()),
            ScheduleRecord::new(Date::ymd(2024, 1, 31), 17.5, 235, TimeDelta::zero()),
        ];
        let annotation = format_annotation(&records);
        assert_eq!(annotation, "<!--SR:!2023-09-02,1,250!2024-01-31,17.5,235-->");
        let parsed = parse_schedules(&annotation, today());
        assert_eq!(parsed.len(), records.len());
        for (a, b) in parsed.iter().zip(records.iter()) {
            assert_eq!(a.due_date, b.due_date);
            assert_eq!(a.interval, b.interval);
            assert_eq!(a.ease, b.ease);
        }
    }

    #[test]
    fn test_strip() {
        let text = "# Title\n\nQ::A\n<!--SR:!2023-09-02,4,270-->\n\nQ2\n?\nA2 <!--SR:2023-09-02,4,270-->\n<!-- keep me -->";
        let stripped = strip_schedules(text);
        assert_eq!(stripped, "# Title\n\nQ::A\n\n\nQ2\n?\nA2 \n<!-- keep me -->");
        assert!(!has_annotation(&stripped));
    }

    #[test]
    fn test_strip_two_on_one_line() {
        let text = "a <!--SR:!2023-09-02,4,270--> b <!--SR:!2023-09-03,4,270--> c";
        assert_eq!(strip_schedules(text), "a  b  c");
    }
}
