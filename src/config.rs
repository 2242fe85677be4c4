use crate::error::{Error, Result};
use anyhow::Context;
use serde::Deserialize;
use std::{fs, ops::RangeBounds, path::Path};

/// Model parameters of the simulation.
#[derive(Debug, PartialEq, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Selection coefficient against resistance.
    pub sel_coef: f64,
    /// Average number of treatments per year.
    pub treat_rate: f64,
    /// Fraction of the environment replaced by host-shed bugs each generation.
    pub env_mix_rate: f64,
    /// Fraction of each host replaced by environmental bugs each generation.
    pub host_mix_rate: f64,
    /// Generation time in years.
    pub gen_time: f64,
    /// Fraction of hosts that never receive treatment.
    #[serde(default)]
    pub frac_untreated: f64,
    /// Fitness cost of treatment to the sensitive strain.
    ///
    /// When set, hosts and environment follow the two-strain model: treatment
    /// lowers the sensitive strain's fitness to `1 - sens_cost` instead of
    /// forcing full resistance.
    #[serde(default)]
    pub sens_cost: Option<f64>,
}

/// Initial condition parameters.
#[derive(Debug, PartialEq, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InitConfig {
    /// Number of hosts.
    pub n_hosts: usize,
    /// Initial resistance of every host.
    #[serde(default = "default_host_res")]
    pub host_res: f64,
    /// Initial resistance of the environment.
    #[serde(default = "default_env_res")]
    pub env_res: f64,
    /// Random number generator seed (random if absent).
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Output parameters.
#[derive(Debug, PartialEq, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Number of generations to simulate.
    pub n_generations: usize,
    /// Number of generations between logged trajectory points (none if absent).
    #[serde(default)]
    pub log_interval: Option<usize>,
}

/// Simulation configuration.
///
/// Loaded from a TOML file and validated before use.
/// See [`Config::from_file`] for loading.
#[derive(Debug, PartialEq, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub model: ModelConfig,
    pub init: InitConfig,
    pub output: OutputConfig,
}

fn default_host_res() -> f64 {
    0.91
}

fn default_env_res() -> f64 {
    0.5
}

impl Config {
    /// Load a [`Config`] from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> anyhow::Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        let config: Config = toml::from_str(&contents).context("failed to parse config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    /// Check every parameter against its valid range.
    pub fn validate(&self) -> Result<()> {
        let model = &self.model;
        check_num("selection coefficient", model.sel_coef, 0.0..1.0, "[0, 1)")?;
        check_num("treatment rate", model.treat_rate, 0.0.., "[0, inf)")?;
        check_num("environment mixing rate", model.env_mix_rate, 0.0..=1.0, "[0, 1]")?;
        check_num("host mixing rate", model.host_mix_rate, 0.0..=1.0, "[0, 1]")?;
        check_num("generation time", model.gen_time, 0.0.., "[0, inf)")?;
        check_num("untreated fraction", model.frac_untreated, 0.0..1.0, "[0, 1)")?;
        if let Some(sens_cost) = model.sens_cost {
            check_num("sensitive strain cost", sens_cost, 0.0..=1.0, "[0, 1]")?;
        }

        let init = &self.init;
        check_num("number of hosts", init.n_hosts as f64, 1.0.., "[1, inf)")?;
        check_num("initial host resistance", init.host_res, 0.0..=1.0, "[0, 1]")?;
        check_num("initial environment resistance", init.env_res, 0.0..=1.0, "[0, 1]")?;

        if let Some(log_interval) = self.output.log_interval {
            check_num("logging interval", log_interval as f64, 1.0.., "[1, inf)")?;
        }

        Ok(())
    }

    /// Number of hosts that never receive treatment.
    pub fn n_untreated(&self) -> usize {
        (self.model.frac_untreated * self.init.n_hosts as f64) as usize
    }

    /// Per-generation treatment probability of a treatable host.
    ///
    /// Untreated hosts are compensated for, so the population-wide
    /// treatment rate stays `treat_rate`.
    pub fn prob_treat(&self) -> f64 {
        let n_hosts = self.init.n_hosts;
        let frac_treated = (n_hosts - self.n_untreated()) as f64 / n_hosts as f64;
        self.model.treat_rate * self.model.gen_time / frac_treated
    }
}

fn check_num<R>(name: &'static str, num: f64, range: R, range_str: &'static str) -> Result<()>
where
    R: RangeBounds<f64>,
{
    if !num.is_finite() || !range.contains(&num) {
        return Err(Error::InvalidParam {
            name,
            range: range_str,
            value: num,
        });
    }
    Ok(())
}
