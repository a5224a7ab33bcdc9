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

use std::collections::HashSet;

use crate::deck::SchedNote;
use crate::scheduler::calculator::ScheduleCalculator;
use crate::scheduler::histogram::DueHistogram;
use crate::settings::HistogramScope;
use crate::settings::Settings;
use crate::types::date::Date;
use crate::types::fingerprint::Fingerprint;
use crate::types::item_id::ItemId;
use crate::types::response::Response;
use crate::types::schedule::Ease;
use crate::types::schedule::ScheduleRecord;
use crate::types::timestamp::Timestamp;

/// What the reviewer chose to do with an item.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ReviewAction {
    /// Queue the item again as though it were never seen.
    Reset,
    /// Leave the schedule alone.
    Skip,
    Respond(Response),
}

/// The result of applying a review action.
#[derive(Clone, Debug, PartialEq)]
pub enum ReviewOutcome {
    Rescheduled {
        schedule: ScheduleRecord,
        response: Option<Response>,
        was_new: bool,
    },
    Skipped,
}

/// State held for the length of one review session.
pub struct ReviewSession {
    pub started_at: Timestamp,
    pub today: Date,
    /// The item under review.
    pub current: Option<ItemId>,
    buried: HashSet<Fingerprint>,
    skipped: HashSet<ItemId>,
    histogram: DueHistogram,
    reviewed: usize,
}

impl ReviewSession {
    /// Start a session. The load-balancing histogram starts from `stored`
    /// when its scope is the whole collection.
    pub fn new<'a>(
        settings: &Settings,
        started_at: Timestamp,
        stored: impl IntoIterator<Item = &'a ScheduleRecord>,
    ) -> Self {
        let today = started_at.local_date();
        let histogram = match settings.load_balance.scope {
            HistogramScope::Session => DueHistogram::new(),
            HistogramScope::Collection => DueHistogram::from_records(stored, today),
        };
        log::debug!("Balancing due dates over {} scheduled items.", histogram.total());
        Self {
            started_at,
            today,
            current: None,
            buried: HashSet::new(),
            skipped: HashSet::new(),
            histogram,
            reviewed: 0,
        }
    }

    /// Apply an action to an item, computing its new schedule.
    pub fn apply(
        &mut self,
        note: &SchedNote,
        action: ReviewAction,
        calculator: &ScheduleCalculator,
        note_ease: Option<Ease>,
    ) -> ReviewOutcome {
        self.current = Some(note.item_id);
        let (schedule, response) = match action {
            ReviewAction::Skip => {
                self.skipped.insert(note.item_id);
                return ReviewOutcome::Skipped;
            }
            ReviewAction::Reset => (calculator.reset_schedule(self.today), None),
            ReviewAction::Respond(response) => {
                let schedule = match &note.schedule {
                    Some(current) => {
                        calculator.updated_schedule(response, current, self.today, &mut self.histogram)
                    }
                    None => calculator.new_card_schedule(
                        response,
                        note_ease,
                        self.today,
                        &mut self.histogram,
                    ),
                };
                (schedule, Some(response))
            }
        };
        self.reviewed += 1;
        ReviewOutcome::Rescheduled {
            schedule,
            response,
            was_new: note.is_new(),
        }
    }

    /// Hide these cards for the rest of the session.
    pub fn bury(&mut self, fingerprints: impl IntoIterator<Item = Fingerprint>) {
        self.buried.extend(fingerprints);
    }

    pub fn is_buried(&self, fingerprint: &Fingerprint) -> bool {
        self.buried.contains(fingerprint)
    }

    /// Leave an item out of the rest of the session.
    pub fn skip(&mut self, item_id: ItemId) {
        self.skipped.insert(item_id);
    }

    pub fn is_skipped(&self, item_id: ItemId) -> bool {
        self.skipped.contains(&item_id)
    }

    /// How many items were rescheduled in this session.
    pub fn reviewed(&self) -> usize {
        self.reviewed
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use chrono::TimeZone;
    use chrono::Utc;

    use super::*;

    fn note(schedule: Option<ScheduleRecord>) -> SchedNote {
        SchedNote {
            item_id: ItemId::new(1),
            path: "a.md".to_string(),
            card: None,
            schedule,
        }
    }

    fn session(settings: &Settings) -> ReviewSession {
        let started_at = Timestamp::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        ReviewSession::new(settings, started_at, &[])
    }

    #[test]
    fn test_apply() {
        let mut settings = Settings::default();
        settings.load_balance.enabled = false;
        let calculator = ScheduleCalculator::new(&settings);
        let mut session = session(&settings);
        let today = session.today;

        let outcome = session.apply(&note(None), ReviewAction::Skip, &calculator, None);
        assert_eq!(outcome, ReviewOutcome::Skipped);
        assert!(session.is_skipped(ItemId::new(1)));
        assert_eq!(session.current, Some(ItemId::new(1)));
        assert_eq!(session.reviewed(), 0);

        let outcome = session.apply(
            &note(None),
            ReviewAction::Respond(Response::Good),
            &calculator,
            None,
        );
        let ReviewOutcome::Rescheduled {
            schedule, was_new, ..
        } = outcome
        else {
            panic!("expected a new schedule");
        };
        assert!(was_new);
        assert_eq!(schedule.interval, 2.5);

        let current = ScheduleRecord::new(today, 10.0, 250, TimeDelta::zero());
        let outcome = session.apply(&note(Some(current)), ReviewAction::Reset, &calculator, None);
        assert_eq!(
            outcome,
            ReviewOutcome::Rescheduled {
                schedule: calculator.reset_schedule(today),
                response: None,
                was_new: false,
            }
        );
        assert_eq!(session.reviewed(), 2);
    }

    #[test]
    fn test_rescheduled_items_leave_today() {
        let mut settings = Settings::default();
        settings.load_balance.enabled = false;
        let calculator = ScheduleCalculator::new(&settings);
        let mut session = session(&settings);
        let today = session.today;
        let current = ScheduleRecord::new(today, 3.0, 250, TimeDelta::zero());
        let actions = [
            ReviewAction::Reset,
            ReviewAction::Respond(Response::Again),
            ReviewAction::Respond(Response::Hard),
            ReviewAction::Respond(Response::Good),
            ReviewAction::Respond(Response::Easy),
        ];
        for action in actions {
            for schedule in [None, Some(current.clone())] {
                let outcome = session.apply(&note(schedule), action, &calculator, None);
                let ReviewOutcome::Rescheduled { schedule, .. } = outcome else {
                    panic!("expected a new schedule");
                };
                assert!(schedule.due_date > today);
            }
        }
    }

    #[test]
    fn test_bury() {
        let settings = Settings::default();
        let mut session = session(&settings);
        let fp = Fingerprint::of_text("q::a");
        assert!(!session.is_buried(&fp));
        session.bury([fp.clone()]);
        assert!(session.is_buried(&fp));
    }

    #[test]
    fn test_histogram_scope() {
        let started_at = Timestamp::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        let today = started_at.local_date();
        let stored = vec![ScheduleRecord::new(today.add_days(3), 3.0, 250, TimeDelta::zero())];
        let mut settings = Settings::default();
        let session = ReviewSession::new(&settings, started_at, &stored);
        assert_eq!(session.histogram.count(3), 1);
        settings.load_balance.scope = HistogramScope::Session;
        let session = ReviewSession::new(&settings, started_at, &stored);
        assert_eq!(session.histogram.total(), 0);
    }
}
