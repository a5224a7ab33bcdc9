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

use crate::scheduler::Algorithm;
use crate::scheduler::ReviewInput;
use crate::scheduler::ReviewOutput;
use crate::settings::Settings;
use crate::types::response::Response;
use crate::types::schedule::INITIAL_INTERVAL;

/// Ease-factor interval growth. Lateness counts in full towards an easy
/// response, half towards a good one, and a quarter towards a hard one.
pub struct Classic;

impl Algorithm for Classic {
    fn review(&self, response: Response, input: &ReviewInput, settings: &Settings) -> ReviewOutput {
        let delay = input.delay_days.max(0) as f64;
        let interval = input.interval;
        let ease = (input.ease + settings.ease_step(response)).max(settings.min_ease);
        match response {
            Response::Again => ReviewOutput {
                interval: INITIAL_INTERVAL,
                ease: ease.min(input.ease),
            },
            Response::Hard => ReviewOutput {
                interval: ((interval + delay / 4.0) * settings.hard_interval_factor).max(1.0),
                ease,
            },
            Response::Good => ReviewOutput {
                interval: (interval + delay / 2.0) * ease as f64 / 100.0,
                ease,
            },
            Response::Easy => ReviewOutput {
                interval: (interval + delay) * ease as f64 / 100.0 * settings.easy_bonus,
                ease,
            },
        }
    }
}
