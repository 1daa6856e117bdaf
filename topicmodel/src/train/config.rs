//Copyright 2024 Felix Engl
//
//Licensed under the Apache License, Version 2.0 (the "License");
//you may not use this file except in compliance with the License.
//You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
//Unless required by applicable law or agreed to in writing, software
//distributed under the License is distributed on an "AS IS" BASIS,
//WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//See the License for the specific language governing permissions and
//limitations under the License.


use derive_builder::Builder;
use crate::errors::{PlsaError, PlsaResult};

/// The config of a training run.
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct PlsaConfig {
    /// The number of latent topics K.
    pub topics: usize,
    /// The maximum number of expectation/maximization iterations. 0 only initializes.
    #[builder(default = "1000")]
    pub max_iterations: usize,
    /// The training stops as soon as the relative improvement of the log likelihood
    /// falls below this threshold.
    #[builder(default = "1e-6")]
    pub eta: f64,
    /// Seeds all random draws. Without a seed every run differs.
    #[builder(default, setter(strip_option))]
    pub seed: Option<u64>,
}

impl PlsaConfig {
    pub const DEFAULT_MAX_ITERATIONS: usize = 1000;
    pub const DEFAULT_ETA: f64 = 1e-6;
    pub const DETERMINISTIC_SEED: u64 = 1;

    pub fn new(topics: usize) -> Self {
        Self {
            topics,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
            eta: Self::DEFAULT_ETA,
            seed: None,
        }
    }

    /// A config with a fixed seed, every run with it initializes identically.
    pub fn deterministic(topics: usize) -> Self {
        Self {
            seed: Some(Self::DETERMINISTIC_SEED),
            ..Self::new(topics)
        }
    }

    pub fn validate(&self) -> PlsaResult<()> {
        if self.topics < 1 {
            return Err(PlsaError::invalid_input("At least one topic is required."));
        }
        if !(self.eta.is_finite() && self.eta > 0.0) {
            return Err(PlsaError::invalid_input(format!("The threshold eta has to be positive, but is {}.", self.eta)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::errors::PlsaError;
    use crate::train::{PlsaConfig, PlsaConfigBuilder};

    #[test]
    fn builder_uses_the_defaults(){
        let config = PlsaConfigBuilder::default().topics(4).build().unwrap();
        assert_eq!(PlsaConfig::new(4), config);
        assert_eq!(1000, config.max_iterations);
        assert_eq!(None, config.seed);

        let seeded = PlsaConfigBuilder::default().topics(2).seed(1).max_iterations(0).build().unwrap();
        assert_eq!(Some(1), seeded.seed);
        assert_eq!(0, seeded.max_iterations);
        assert!(seeded.validate().is_ok());
    }

    #[test]
    fn builder_requires_the_topics(){
        let err: PlsaError = PlsaConfigBuilder::default().eta(0.1).build().unwrap_err().into();
        assert!(matches!(err, PlsaError::Config(_)));
    }

    #[test]
    fn validation(){
        assert!(matches!(PlsaConfig::new(0).validate(), Err(PlsaError::InvalidInput(_))));
        for eta in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = PlsaConfig { eta, ..PlsaConfig::deterministic(2) };
            assert!(matches!(config.validate(), Err(PlsaError::InvalidInput(_))));
        }
    }
}
