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

//! The FSRS memory model, used by the `memory` scheduling algorithm.

use crate::types::response::Response;

pub type R = f64;
pub type S = f64;
pub type D = f64;
pub type T = f64;

const F: f64 = 19.0 / 81.0;
const C: f64 = -0.5;

/// At this retention, the interval equals the stability.
pub const DESIRED_RETENTION: f64 = 0.9;

const W: [f64; 19] = [
    0.40255, 1.18385, 3.173, 15.69105, 7.1949, 0.5345, 1.4604, 0.0046, 1.54575, 0.1192, 1.01925,
    1.9395, 0.11, 0.29605, 2.2698, 0.2315, 2.9898, 0.51655, 0.6621,
];

fn grade(response: Response) -> f64 {
    match response {
        Response::Again => 1.0,
        Response::Hard => 2.0,
        Response::Good => 3.0,
        Response::Easy => 4.0,
    }
}

/// Probability of recall after `t` days at stability `s`.
pub fn retrievability(t: T, s: S) -> R {
    (1.0 + F * (t / s)).powf(C)
}

/// Days until retrievability falls to the desired retention.
pub fn interval(s: S) -> T {
    (s / F) * (DESIRED_RETENTION.powf(1.0 / C) - 1.0)
}

pub fn initial_stability(response: Response) -> S {
    match response {
        Response::Again => W[0],
        Response::Hard => W[1],
        Response::Good => W[2],
        Response::Easy => W[3],
    }
}

pub fn initial_difficulty(response: Response) -> D {
    clamp_d(W[4] - f64::exp(W[5] * (grade(response) - 1.0)) + 1.0)
}

pub fn clamp_d(d: D) -> D {
    d.clamp(1.0, 10.0)
}

fn s_success(d: D, s: S, r: R, response: Response) -> S {
    let t_d = 11.0 - d;
    let t_s = s.powf(-W[9]);
    let t_r = f64::exp(W[10] * (1.0 - r)) - 1.0;
    let h = if response == Response::Hard { W[15] } else { 1.0 };
    let b = if response == Response::Easy { W[16] } else { 1.0 };
    let c = f64::exp(W[8]);
    let alpha = 1.0 + t_d * t_s * t_r * h * b * c;
    s * alpha
}

fn s_fail(d: D, s: S, r: R) -> S {
    let d_f = d.powf(-W[12]);
    let s_f = (s + 1.0).powf(W[13]) - 1.0;
    let r_f = f64::exp(W[14] * (1.0 - r));
    let c_f = W[11];
    let s_f = d_f * s_f * r_f * c_f;
    f64::min(s_f, s)
}

/// Stability after a review at retrievability `r`.
pub fn stability(d: D, s: S, r: R, response: Response) -> S {
    if response.is_failure() {
        s_fail(d, s, r)
    } else {
        s_success(d, s, r, response)
    }
}

/// Difficulty after a review, with mean reversion towards the initial
/// difficulty of an easy response.
pub fn difficulty(d: D, response: Response) -> D {
    let delta_d = -W[6] * (grade(response) - 3.0);
    let dp = d + delta_d * ((10.0 - d) / 9.0);
    clamp_d(W[7] * initial_difficulty(Response::Easy) + (1.0 - W[7]) * dp)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Response; 4] = [Response::Again, Response::Hard, Response::Good, Response::Easy];

    #[test]
    fn test_retrievability_at_zero() {
        assert!((retrievability(0.0, 1.0) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_interval_equals_stability() {
        for s in [0.5, 5.0, 120.0] {
            assert!((interval(s) - s).abs() < 1e-9);
        }
    }

    #[test]
    fn test_retrievability_at_stability() {
        let r = retrievability(7.0, 7.0);
        assert!((r - DESIRED_RETENTION).abs() < 1e-9);
    }

    #[test]
    fn test_stability_grows_on_success() {
        let r = retrievability(3.0, 3.0);
        for response in [Response::Hard, Response::Good, Response::Easy] {
            assert!(stability(5.0, 3.0, r, response) > 3.0);
        }
        assert!(stability(5.0, 3.0, r, Response::Easy) > stability(5.0, 3.0, r, Response::Good));
    }

    #[test]
    fn test_stability_shrinks_on_failure() {
        let r = retrievability(3.0, 3.0);
        assert!(stability(5.0, 3.0, r, Response::Again) < 3.0);
    }

    #[test]
    fn test_initial_values_ordered() {
        for pair in ALL.windows(2) {
            assert!(initial_stability(pair[0]) < initial_stability(pair[1]));
            assert!(initial_difficulty(pair[0]) > initial_difficulty(pair[1]));
        }
    }

    #[test]
    fn test_difficulty_clamped() {
        let mut d = initial_difficulty(Response::Again);
        for _ in 0..100 {
            d = difficulty(d, Response::Again);
        }
        assert!((1.0..=10.0).contains(&d));
        let mut d = initial_difficulty(Response::Easy);
        for _ in 0..100 {
            d = difficulty(d, Response::Easy);
        }
        assert!((1.0..=10.0).contains(&d));
    }
}
