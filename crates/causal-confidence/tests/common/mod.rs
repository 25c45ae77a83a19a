//! Shared utilities for integration tests

#![allow(dead_code)]

use causal_core::Dataset;
use causal_glm::{Family, Glm, ModelSpec};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Bernoulli, Normal, Uniform};

/// Average effect of quitting smoking on weight change in [`smoking_cohort`]
pub const TRUE_EFFECT: f64 = 3.5;

pub const EXPOSURE: &str = "qsmk";
pub const OUTCOME: &str = "wt82_71";

/// Install a test subscriber once; `RUST_LOG=causal_confidence=debug`
/// shows the engine's progress
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn expit(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Simulated smoking-cessation cohort
///
/// Confounders sex, age, exercise and smoking intensity drive both
/// quitting (`qsmk`) and the weight change (`wt82_71`); baseline weight
/// `wt71` only affects the outcome. About 4% of outcomes are missing.
pub fn smoking_cohort(n: usize, seed: u64) -> Dataset {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let age_dist = Uniform::new(25.0, 74.0);
    let intensity_dist = Uniform::new(1.0, 60.0);
    let weight_dist = Normal::new(70.0, 15.0).unwrap();
    let noise = Normal::new(0.0, 4.0).unwrap();
    let missing = Bernoulli::new(0.04).unwrap();
    let exercise_levels = ["much", "moderate", "little"];

    let mut sex = Vec::with_capacity(n);
    let mut age = Vec::with_capacity(n);
    let mut exercise = Vec::with_capacity(n);
    let mut intensity = Vec::with_capacity(n);
    let mut wt71 = Vec::with_capacity(n);
    let mut qsmk = Vec::with_capacity(n);
    let mut outcome = Vec::with_capacity(n);

    for _ in 0..n {
        let male = rng.gen_bool(0.5);
        let a_i: f64 = age_dist.sample(&mut rng);
        let ex = rng.gen_range(0..3usize);
        let smk: f64 = intensity_dist.sample(&mut rng);
        let w: f64 = weight_dist.sample(&mut rng);

        let male_f = if male { 1.0 } else { 0.0 };
        let little = if ex == 2 { 1.0 } else { 0.0 };
        let logit = -1.2 + 0.4 * male_f + 0.05 * (a_i - 45.0) + 0.3 * little - 0.02 * (smk - 20.0);
        let quit = if rng.gen_bool(expit(logit)) { 1.0 } else { 0.0 };

        let y = 2.0 + TRUE_EFFECT * quit + 1.0 * male_f - 0.2 * (a_i - 45.0) - 0.8 * little
            + 0.02 * (w - 70.0)
            + noise.sample(&mut rng);

        sex.push(if male { "male" } else { "female" });
        age.push(a_i);
        exercise.push(exercise_levels[ex]);
        intensity.push(smk);
        wt71.push(w);
        qsmk.push(quit);
        outcome.push(if missing.sample(&mut rng) { f64::NAN } else { y });
    }

    Dataset::builder()
        .categorical("sex", &sex)
        .numeric("age", age)
        .categorical("exercise", &exercise)
        .numeric("smokeintensity", intensity)
        .numeric("wt71", wt71)
        .numeric(EXPOSURE, qsmk)
        .numeric(OUTCOME, outcome)
        .build()
        .unwrap()
}

/// Gaussian outcome model: exposure plus confounders plus baseline weight
pub fn outcome_model() -> Glm {
    Glm::new(
        ModelSpec::new(OUTCOME, Family::Gaussian)
            .linear(EXPOSURE)
            .categorical("sex")
            .linear_and_quadratic("age")
            .categorical("exercise")
            .linear("wt71"),
    )
}

/// Logistic propensity model for quitting
pub fn propensity_model() -> Glm {
    Glm::new(
        ModelSpec::new(EXPOSURE, Family::Binomial)
            .categorical("sex")
            .linear("age")
            .categorical("exercise")
            .linear("smokeintensity"),
    )
}
