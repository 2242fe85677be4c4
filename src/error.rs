//! Simulation error types.

use std::collections::TryReserveError;

/// Errors raised by the simulation core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A parameter is outside its valid range.
    #[error("invalid {name}: must be in the range {range}, but is {value}")]
    InvalidParam {
        name: &'static str,
        range: &'static str,
        value: f64,
    },

    /// Storage for the host population could not be obtained.
    #[error("failed to allocate storage for {n_hosts} hosts")]
    Allocation {
        n_hosts: usize,
        #[source]
        source: TryReserveError,
    },

    /// An update produced NaN. Infinite values are clamped instead.
    #[error("{what} became NaN at generation {generation}")]
    NotANumber {
        what: &'static str,
        generation: usize,
    },

    /// The unit sampling distribution could not be built.
    #[error("failed to build sampling distribution: {0}")]
    Distribution(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_a_number_names_quantity_and_generation() {
        let error = Error::NotANumber {
            what: "host resistance",
            generation: 12,
        };
        assert_eq!(error.to_string(), "host resistance became NaN at generation 12");
    }
}
