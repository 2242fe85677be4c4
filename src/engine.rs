use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{Bernoulli, State, mix_select_fraction, select_update};
use crate::stats::compute_mean;
use anyhow::Context;
use rand::prelude::*;
use rand_chacha::ChaCha12Rng;

/// Result of a completed simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Streaming mean of the final host resistance levels.
    pub host_mean: f64,
    /// Final environment resistance level.
    pub env: f64,
    /// Number of environment updates clamped into `[0, 1]`.
    pub n_env_clamps: usize,
    /// Number of host updates clamped into `[0, 1]`.
    pub n_host_clamps: usize,
}

/// Simulation engine.
///
/// Holds the configuration, current state, and random number generator,
/// and advances the environment and the hosts one generation at a time.
pub struct Engine<R = ChaCha12Rng> {
    cfg: Config,
    state: State,
    rng: R,
    treat_dist: Bernoulli,
    n_untreated: usize,
    generation: usize,
    n_env_clamps: usize,
    n_host_clamps: usize,
}

impl Engine<ChaCha12Rng> {
    /// Create a new `Engine` seeded from the configuration, or from the OS if no seed is set.
    pub fn generate_initial_condition(cfg: Config) -> anyhow::Result<Self> {
        let rng = match cfg.init.seed {
            Some(seed) => ChaCha12Rng::seed_from_u64(seed),
            None => ChaCha12Rng::try_from_os_rng().context("failed to seed rng")?,
        };
        let engine = Self::with_rng(cfg, rng).context("failed to initialize engine")?;
        Ok(engine)
    }
}

impl<R: Rng> Engine<R> {
    /// Create a new `Engine` drawing from the given random source.
    pub fn with_rng(cfg: Config, rng: R) -> Result<Self> {
        cfg.validate()?;

        let n_hosts = cfg.init.n_hosts;
        let mut host_vec = Vec::new();
        host_vec
            .try_reserve_exact(n_hosts)
            .map_err(|source| Error::Allocation { n_hosts, source })?;
        host_vec.resize(n_hosts, cfg.init.host_res);

        let state = State {
            env: cfg.init.env_res,
            host_vec,
        };

        let treat_dist = Bernoulli::new(cfg.prob_treat())?;
        let n_untreated = cfg.n_untreated();

        Ok(Self {
            cfg,
            state,
            rng,
            treat_dist,
            n_untreated,
            generation: 0,
            n_env_clamps: 0,
            n_host_clamps: 0,
        })
    }

    /// Check whether every configured generation has been performed.
    pub fn is_completed(&self) -> bool {
        self.generation >= self.cfg.output.n_generations
    }

    /// Perform all remaining generations.
    pub fn perform_simulation(&mut self) -> Result<()> {
        let n_generations = self.cfg.output.n_generations;
        while !self.is_completed() {
            self.perform_step()?;

            if let Some(log_interval) = self.cfg.output.log_interval {
                if self.generation % log_interval == 0 || self.is_completed() {
                    self.log_trajectory(n_generations);
                }
            }
        }
        Ok(())
    }

    /// Consume the engine and report the final host mean.
    pub fn into_outcome(self) -> Outcome {
        Outcome {
            host_mean: compute_mean(&self.state.host_vec),
            env: self.state.env,
            n_env_clamps: self.n_env_clamps,
            n_host_clamps: self.n_host_clamps,
        }
    }

    fn perform_step(&mut self) -> Result<()> {
        let n_clamps_prev = self.n_env_clamps + self.n_host_clamps;

        // Compute the new environment from the hosts before they are updated.
        let env_new = self.compute_environment()?;

        // Update hosts against the previous environment.
        self.update_hosts()?;

        self.state.env = env_new;
        self.generation += 1;

        if n_clamps_prev == 0 && self.n_env_clamps + self.n_host_clamps > 0 {
            log::warn!(
                "resistance left [0, 1] at generation {} and was clamped",
                self.generation
            );
        }

        Ok(())
    }

    fn compute_environment(&mut self) -> Result<f64> {
        let model = &self.cfg.model;
        let host_mean = compute_mean(&self.state.host_vec);
        let env_new = match model.sens_cost {
            None => select_update(self.state.env, host_mean, model.env_mix_rate, model.sel_coef),
            // The sensitive strain is never treated in the environment.
            Some(_) => mix_select_fraction(
                self.state.env,
                host_mean,
                model.env_mix_rate,
                1.0 - model.sel_coef,
                1.0,
            ),
        };

        let (env_new, clamped) = clamp_unit(env_new).ok_or(Error::NotANumber {
            what: "environment resistance",
            generation: self.generation,
        })?;
        if clamped {
            self.n_env_clamps += 1;
        }

        Ok(env_new)
    }

    fn update_hosts(&mut self) -> Result<()> {
        let model = &self.cfg.model;
        let env = self.state.env;

        for (i_host, host) in self.state.host_vec.iter_mut().enumerate() {
            // Untreated hosts draw no randomness.
            let treated = i_host >= self.n_untreated && self.treat_dist.sample(&mut self.rng);

            let host_new = match (model.sens_cost, treated) {
                (None, true) => {
                    *host = 1.0;
                    continue;
                }
                (None, false) => select_update(*host, env, model.host_mix_rate, model.sel_coef),
                (Some(sens_cost), treated) => {
                    let fit_sens = if treated { 1.0 - sens_cost } else { 1.0 };
                    mix_select_fraction(
                        *host,
                        env,
                        model.host_mix_rate,
                        1.0 - model.sel_coef,
                        fit_sens,
                    )
                }
            };
            let (host_new, clamped) = clamp_unit(host_new).ok_or(Error::NotANumber {
                what: "host resistance",
                generation: self.generation,
            })?;
            if clamped {
                self.n_host_clamps += 1;
            }
            *host = host_new;
        }

        Ok(())
    }

    fn log_trajectory(&self, n_generations: usize) {
        let progress = 100.0 * self.generation as f64 / n_generations as f64;
        log::info!(
            "generation {} host {:.6} env {:.6} (completed {progress:06.2}%)",
            self.generation,
            compute_mean(&self.state.host_vec),
            self.state.env,
        );
    }
}

/// Clamp a value into `[0, 1]`, reporting whether it was out of range.
///
/// Returns `None` for NaN.
fn clamp_unit(val: f64) -> Option<(f64, bool)> {
    if val.is_nan() {
        return None;
    }
    let clamped = val.clamp(0.0, 1.0);
    Some((clamped, clamped != val))
}
