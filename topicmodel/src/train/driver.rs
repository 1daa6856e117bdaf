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


use std::fmt::{Display, Formatter};
use std::sync::Arc;
use strum::AsRefStr;
use crate::corpus::{DocumentCollection, DocumentStore};
use crate::document::{Document, DocumentEncoder};
use crate::errors::{PlsaError, PlsaResult};
use crate::model::{expectation_step, log_likelihood, maximization_step, PlsaModel, TopicWordTable};
use crate::random::RunSeed;
use crate::train::PlsaConfig;
use crate::vocabulary::{BasicVocabulary, Vocabulary};

/// The states of a training run.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, AsRefStr, strum::Display)]
pub enum TrainingState {
    Uninitialized,
    Initialized,
    Iterating,
    Converged,
    MaxIterReached,
}

impl TrainingState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TrainingState::Converged | TrainingState::MaxIterReached)
    }
}

/// The log likelihood after an iteration. Iteration 0 is the initialization.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct IterationReport {
    pub iteration: usize,
    pub log_likelihood: f64,
    /// The relative improvement to the previous iteration, none for the initialization.
    pub improvement: Option<f64>,
}

impl IterationReport {
    pub fn initial(log_likelihood: f64) -> Self {
        Self { iteration: 0, log_likelihood, improvement: None }
    }

    pub fn improvement_percent(&self) -> Option<f64> {
        self.improvement.map(|value| value * 100.0)
    }
}

impl Display for IterationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "L({})={:.5}", self.iteration, self.log_likelihood)?;
        if let Some(percent) = self.improvement_percent() {
            write!(f, " with {percent:.6}% improvement")?;
        }
        Ok(())
    }
}

/// All reports of a training run, starting with the initialization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingHistory {
    reports: Vec<IterationReport>,
}

impl TrainingHistory {
    fn push(&mut self, report: IterationReport) {
        log::info!("{report}");
        self.reports.push(report);
    }

    pub fn reports(&self) -> &[IterationReport] {
        &self.reports
    }

    pub fn initial(&self) -> Option<&IterationReport> {
        self.reports.first()
    }

    pub fn last(&self) -> Option<&IterationReport> {
        self.reports.last()
    }

    /// The number of performed expectation/maximization iterations.
    pub fn iterations(&self) -> usize {
        self.reports.len().saturating_sub(1)
    }

    pub fn log_likelihoods(&self) -> impl Iterator<Item=f64> + '_ {
        self.reports.iter().map(|report| report.log_likelihood)
    }
}

/// The relative change from `previous` to `current`.
/// Falls back to the absolute change if `previous` is exactly zero.
pub fn relative_improvement(previous: f64, current: f64) -> PlsaResult<f64> {
    let difference = (previous - current).abs();
    let improvement = if previous == 0.0 {
        log::warn!("The previous log likelihood is 0, use the absolute difference {difference} as improvement.");
        difference
    } else {
        difference / previous.abs()
    };
    if improvement.is_finite() {
        Ok(improvement)
    } else {
        Err(PlsaError::ConvergenceCheck { previous, current })
    }
}

/// A running training.
///
/// Created in [TrainingState::Initialized], every [TrainingRun::step] runs an expectation
/// and a maximization step until [TrainingState::Converged] or
/// [TrainingState::MaxIterReached] is reached. Any error ends the run.
pub struct TrainingRun<D> {
    config: PlsaConfig,
    seed: RunSeed,
    vocabulary: Arc<Vocabulary<String>>,
    documents: D,
    table: Arc<TopicWordTable>,
    history: TrainingHistory,
    state: TrainingState,
}

impl<D: DocumentStore> TrainingRun<D> {
    /// Builds the vocabulary, encodes the documents, draws the initial table and
    /// calculates the initial log likelihood.
    pub fn initialize<C>(config: PlsaConfig, corpus: &C) -> PlsaResult<Self>
    where
        C: DocumentCollection<Item=Vec<String>, Mapped<Document>=D>
    {
        config.validate()?;
        let seed = RunSeed::resolve(config.seed);
        log::debug!("{}: start with seed {seed} and {} documents.", TrainingState::Uninitialized, corpus.len());

        let vocabulary = Arc::new(Vocabulary::build(corpus)?);
        let documents = {
            let encoder = DocumentEncoder::new(&vocabulary, config.topics, seed);
            corpus.try_map_enumerated(|document_id, tokens| encoder.encode(document_id, tokens.as_slice()))?
        };
        let table = Arc::new(TopicWordTable::initialize(config.topics, vocabulary.len(), &mut seed.table_rng())?);

        let mut history = TrainingHistory::default();
        history.push(IterationReport::initial(log_likelihood(&documents, &table)?));

        log::debug!("{} -> {}", TrainingState::Uninitialized, TrainingState::Initialized);
        Ok(Self {
            config,
            seed,
            vocabulary,
            documents,
            table,
            history,
            state: TrainingState::Initialized,
        })
    }

    /// Runs a single expectation/maximization iteration.
    /// Does nothing if the run already reached a terminal state.
    pub fn step(self) -> PlsaResult<Self> {
        if self.state.is_terminal() {
            return Ok(self);
        }
        if self.history.iterations() >= self.config.max_iterations {
            return Ok(self.transition(TrainingState::MaxIterReached));
        }

        let Self { config, seed, vocabulary, documents, table, mut history, state } = self;
        let documents = expectation_step(documents, &table)?;
        let (documents, successor) = maximization_step(documents, &table)?;
        let table = Arc::new(successor);

        let current = log_likelihood(&documents, &table)?;
        let previous = history.last().map_or(current, |report| report.log_likelihood);
        let improvement = relative_improvement(previous, current)?;
        let iteration = history.iterations() + 1;
        history.push(IterationReport { iteration, log_likelihood: current, improvement: Some(improvement) });

        let run = Self { config, seed, vocabulary, documents, table, history, state };
        Ok(if improvement < run.config.eta {
            run.transition(TrainingState::Converged)
        } else if iteration >= run.config.max_iterations {
            run.transition(TrainingState::MaxIterReached)
        } else {
            run.transition(TrainingState::Iterating)
        })
    }

    /// Iterates until a terminal state is reached.
    pub fn run(self) -> PlsaResult<PlsaModel<D>> {
        let mut run = self;
        while !run.state.is_terminal() {
            run = run.step()?;
        }
        Ok(run.into_model())
    }

    fn transition(mut self, next: TrainingState) -> Self {
        if self.state != next {
            log::debug!("{} -> {next}", self.state);
        }
        self.state = next;
        self
    }

    pub fn into_model(self) -> PlsaModel<D> {
        PlsaModel::new(self.vocabulary, self.table, self.documents, self.history, self.state, self.seed)
    }
}

impl<D> TrainingRun<D> {
    pub fn state(&self) -> TrainingState {
        self.state
    }

    pub fn config(&self) -> &PlsaConfig {
        &self.config
    }

    pub fn seed(&self) -> RunSeed {
        self.seed
    }

    pub fn history(&self) -> &TrainingHistory {
        &self.history
    }

    pub fn table(&self) -> &Arc<TopicWordTable> {
        &self.table
    }

    pub fn vocabulary(&self) -> &Arc<Vocabulary<String>> {
        &self.vocabulary
    }

    pub fn documents(&self) -> &D {
        &self.documents
    }
}
