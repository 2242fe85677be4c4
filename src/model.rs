use crate::error::{Error, Result};
use rand::Rng;
use rand_distr::{Distribution, Uniform};

/// State of the simulation at a given generation.
pub struct State {
    /// Resistance level of the environment reservoir.
    pub env: f64,

    /// Resistance level of each host.
    pub host_vec: Vec<f64>,
}

/// Move `cur` towards `target` at rate `mix_rate` and apply selection against resistance.
///
/// The result is unguarded: callers keep `sel_coef * cur < 1` and bound the output.
pub fn select_update(cur: f64, target: f64, mix_rate: f64, sel_coef: f64) -> f64 {
    cur + mix_rate * (target - cur) - sel_coef * cur * (1.0 - cur) / (1.0 - sel_coef * cur)
}

/// New fraction of strain A when strain A has fitness `fit_a` and strain B has `fit_b`.
///
/// If neither strain survives the fraction is left unchanged.
pub fn select_fraction(frac_a: f64, fit_a: f64, fit_b: f64) -> f64 {
    let fit_mean = fit_a * frac_a + fit_b * (1.0 - frac_a);
    if fit_mean == 0.0 {
        return frac_a;
    }
    fit_a * frac_a / fit_mean
}

/// Select `cur` with the two-strain fitnesses, then replace a fraction `mix_rate` with `target`.
pub fn mix_select_fraction(
    cur: f64,
    target: f64,
    mix_rate: f64,
    fit_res: f64,
    fit_sens: f64,
) -> f64 {
    mix_rate * target + (1.0 - mix_rate) * select_fraction(cur, fit_res, fit_sens)
}

/// Boolean draw with a fixed success probability.
///
/// Every call consumes exactly one uniform draw from `[0, 1)`, whatever the probability.
pub struct Bernoulli {
    prob: f64,
    unit_dist: Uniform<f64>,
}

impl Bernoulli {
    pub fn new(prob: f64) -> Result<Self> {
        let unit_dist =
            Uniform::new(0.0, 1.0).map_err(|error| Error::Distribution(error.to_string()))?;
        Ok(Self { prob, unit_dist })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        self.unit_dist.sample(rng) < self.prob
    }
}
