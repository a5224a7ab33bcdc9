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

use crate::fsrs;
use crate::scheduler::Algorithm;
use crate::scheduler::ReviewInput;
use crate::scheduler::ReviewOutput;
use crate::settings::Settings;
use crate::types::response::Response;
use crate::types::schedule::Ease;
use crate::types::schedule::INITIAL_INTERVAL;

/// The FSRS memory model, fitted to the interval/ease contract. At the
/// desired retention the interval equals the stability, so the interval is
/// read back as stability. Difficulty is stored as ease, `1000 / D`.
pub struct Memory;

fn ease_to_difficulty(ease: Ease) -> fsrs::D {
    fsrs::clamp_d(1000.0 / ease.max(1) as f64)
}

fn difficulty_to_ease(d: fsrs::D) -> Ease {
    (1000.0 / d).round() as Ease
}

impl Algorithm for Memory {
    fn review(&self, response: Response, input: &ReviewInput, settings: &Settings) -> ReviewOutput {
        let (s, d) = if input.first_review {
            (
                fsrs::initial_stability(response),
                fsrs::initial_difficulty(response),
            )
        } else {
            let s = input.interval.max(0.1);
            let d = ease_to_difficulty(input.ease);
            let elapsed = input.interval + input.delay_days.max(0) as f64;
            let r = fsrs::retrievability(elapsed, s);
            (
                fsrs::stability(d, s, r, response),
                fsrs::difficulty(d, response),
            )
        };
        let ease = difficulty_to_ease(d).max(settings.min_ease);
        if response.is_failure() {
            ReviewOutput {
                interval: INITIAL_INTERVAL,
                ease: ease.min(input.ease),
            }
        } else {
            ReviewOutput {
                interval: fsrs::interval(s).max(1.0),
                ease,
            }
        }
    }
}
