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

//! Computing the next schedule of an item from a review response.

pub mod calculator;
pub mod classic;
pub mod histogram;
pub mod memory;
pub mod note_ease;

use crate::scheduler::classic::Classic;
use crate::scheduler::histogram::DueHistogram;
use crate::scheduler::memory::Memory;
use crate::settings::AlgorithmKind;
use crate::settings::Settings;
use crate::types::response::Response;
use crate::types::schedule::Ease;
use crate::types::schedule::INITIAL_INTERVAL;

/// The state an algorithm computes from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReviewInput {
    pub interval: f64,
    pub ease: Ease,
    /// Lateness in whole days, never negative.
    pub delay_days: i64,
    /// Whether the item has never been reviewed.
    pub first_review: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReviewOutput {
    pub interval: f64,
    pub ease: Ease,
}

pub trait Algorithm {
    fn review(&self, response: Response, input: &ReviewInput, settings: &Settings) -> ReviewOutput;
}

fn algorithm(kind: AlgorithmKind) -> &'static dyn Algorithm {
    match kind {
        AlgorithmKind::Classic => &Classic,
        AlgorithmKind::Memory => &Memory,
    }
}

/// Compute the new interval and ease for a response, then move the due day
/// to a quieter one nearby if load balancing is enabled. The chosen day is
/// counted in `histogram`.
pub fn compute_schedule(
    response: Response,
    input: &ReviewInput,
    settings: &Settings,
    histogram: &mut DueHistogram,
) -> ReviewOutput {
    let output = algorithm(settings.algorithm).review(response, input, settings);
    let mut interval = output.interval.max(INITIAL_INTERVAL);
    if settings.load_balance.enabled {
        let target = interval.round() as i64;
        let window = settings.load_balance.window(target);
        let day = histogram.balance(target, window);
        histogram.increment(day);
        interval = day as f64;
    }
    interval = interval.min(settings.maximum_interval);
    ReviewOutput {
        interval: (interval * 10.0).round() / 10.0,
        ease: output.ease,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSES: [Response; 4] = [Response::Again, Response::Hard, Response::Good, Response::Easy];

    fn inputs() -> Vec<ReviewInput> {
        let mut inputs = Vec::new();
        for interval in [0.0, 1.0, 2.5, 4.0, 13.0, 60.0, 400.0] {
            for ease in [100, 130, 250, 400] {
                for delay_days in [0, 1, 7, 90] {
                    for first_review in [false, true] {
                        inputs.push(ReviewInput {
                            interval,
                            ease,
                            delay_days,
                            first_review,
                        });
                    }
                }
            }
        }
        inputs
    }

    fn check_properties(settings: &Settings) {
        let mut histogram = DueHistogram::new();
        for input in inputs() {
            for response in RESPONSES {
                let out = compute_schedule(response, &input, settings, &mut histogram);
                if response.is_failure() {
                    assert_eq!(out.interval, INITIAL_INTERVAL, "{response} {input:?}");
                    assert!(out.ease <= input.ease, "{response} {input:?}");
                } else {
                    assert!(out.interval > 0.0, "{response} {input:?}");
                    assert!(out.ease >= settings.min_ease, "{response} {input:?}");
                }
                assert!(out.interval <= settings.maximum_interval);
            }
        }
    }

    #[test]
    fn test_classic_properties() {
        check_properties(&Settings::default());
    }

    #[test]
    fn test_memory_properties() {
        let settings = Settings {
            algorithm: AlgorithmKind::Memory,
            ..Settings::default()
        };
        check_properties(&settings);
    }

    #[test]
    fn test_deterministic() {
        let settings = Settings::default();
        let input = ReviewInput {
            interval: 20.0,
            ease: 250,
            delay_days: 2,
            first_review: false,
        };
        let mut a = DueHistogram::new();
        let mut b = DueHistogram::new();
        for _ in 0..10 {
            let x = compute_schedule(Response::Good, &input, &settings, &mut a);
            let y = compute_schedule(Response::Good, &input, &settings, &mut b);
            assert_eq!(x, y);
        }
        assert_eq!(a, b);
    }

    #[test]
    fn test_load_balancing_spreads_due_days() {
        let settings = Settings::default();
        let input = ReviewInput {
            interval: 8.0,
            ease: 250,
            delay_days: 0,
            first_review: false,
        };
        let mut histogram = DueHistogram::new();
        let first = compute_schedule(Response::Good, &input, &settings, &mut histogram);
        let second = compute_schedule(Response::Good, &input, &settings, &mut histogram);
        assert_eq!(first.interval, 20.0);
        assert_ne!(first.interval, second.interval);
        assert_eq!(histogram.count(20), 1);
        assert_eq!(histogram.total(), 2);
    }

    #[test]
    fn test_without_load_balancing_keeps_fraction() {
        let mut settings = Settings::default();
        settings.load_balance.enabled = false;
        let input = ReviewInput {
            interval: 1.0,
            ease: 250,
            delay_days: 0,
            first_review: false,
        };
        let mut histogram = DueHistogram::new();
        let out = compute_schedule(Response::Good, &input, &settings, &mut histogram);
        assert_eq!(out.interval, 2.5);
        assert_eq!(histogram.total(), 0);
    }

    #[test]
    fn test_maximum_interval() {
        let mut settings = Settings::default();
        settings.maximum_interval = 100.0;
        let input = ReviewInput {
            interval: 90.0,
            ease: 300,
            delay_days: 0,
            first_review: false,
        };
        let mut histogram = DueHistogram::new();
        let out = compute_schedule(Response::Easy, &input, &settings, &mut histogram);
        assert_eq!(out.interval, 100.0);
    }
}
