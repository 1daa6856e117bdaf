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


//! Training of a model by expectation maximization.

mod config;
mod driver;

pub use config::*;
pub use driver::*;

use crate::corpus::{DocumentCollection, DocumentStore};
use crate::document::Document;
use crate::errors::PlsaResult;
use crate::model::PlsaModel;

/// Trains models with a fixed config.
#[derive(Debug, Clone)]
pub struct Plsa {
    config: PlsaConfig,
}

impl Plsa {
    pub fn new(config: PlsaConfig) -> PlsaResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PlsaConfig {
        &self.config
    }

    /// Initializes a run on `corpus` that can be stepped manually.
    pub fn start<C>(&self, corpus: &C) -> PlsaResult<TrainingRun<C::Mapped<Document>>>
    where
        C: DocumentCollection<Item=Vec<String>>,
        C::Mapped<Document>: DocumentStore
    {
        TrainingRun::initialize(self.config.clone(), corpus)
    }

    /// Trains on `corpus` until convergence or the maximum number of iterations.
    pub fn train<C>(&self, corpus: &C) -> PlsaResult<PlsaModel<C::Mapped<Document>>>
    where
        C: DocumentCollection<Item=Vec<String>>,
        C::Mapped<Document>: DocumentStore
    {
        self.start(corpus)?.run()
    }
}

#[cfg(test)]
mod test {
    use std::io::{BufReader, Cursor};
    use approx::assert_relative_eq;
    use ndarray::Axis;
    use crate::corpus::{DocumentCollection, DocumentStore, ParallelCorpus, SequentialCorpus};
    use crate::errors::PlsaError;
    use crate::io::{read_corpus, read_doc_topic, read_word_given_topic};
    use crate::train::{Plsa, PlsaConfig, PlsaConfigBuilder, TrainingRun, TrainingState};
    use crate::vocabulary::{BasicVocabulary, SearchableVocabulary};

    fn corpus(lines: &[&str]) -> Vec<Vec<String>> {
        lines
            .iter()
            .map(|line| line.split(' ').map(str::to_string).collect())
            .collect()
    }

    fn assert_distributions<D: DocumentStore>(run: &TrainingRun<D>) {
        for sum in run.table().probabilities().sum_axis(Axis(1)) {
            assert_relative_eq!(1.0, sum, epsilon = 1e-9);
        }
        let sums = run.documents().map(|document| {
            let words_ok = document.words().values().all(|entry| (entry.topic_word().sum() - 1.0).abs() < 1e-9);
            (document.topic().sum(), words_ok)
        });
        for (sum, words_ok) in sums.collect() {
            assert_relative_eq!(1.0, sum, epsilon = 1e-9);
            assert!(words_ok);
        }
    }

    #[test]
    fn trains_a_small_corpus(){
        let _ = env_logger::builder().is_test(true).try_init();
        let corpus = ParallelCorpus::new(corpus(&["a b a", "b c"]));
        let model = Plsa::new(PlsaConfig::deterministic(2)).unwrap().train(&corpus).unwrap();
        assert_eq!(TrainingState::Converged, model.state());
        assert!(model.history().iterations() < 1000);
        assert_eq!((2, 3), model.table().dim());
        assert_eq!(Some(0), model.vocabulary().get_id("a"));
        assert_eq!(Some(2), model.vocabulary().get_id("c"));
        for sum in model.table().probabilities().sum_axis(Axis(1)) {
            assert_relative_eq!(1.0, sum, epsilon = 1e-9);
        }
        let distributions = model.doc_topic_distributions();
        assert_eq!(2, distributions.len());
        for distribution in distributions {
            assert_relative_eq!(1.0, distribution.sum(), epsilon = 1e-9);
        }
    }

    #[test]
    fn empty_corpus_is_rejected(){
        let plsa = Plsa::new(PlsaConfig::deterministic(2)).unwrap();
        let result = plsa.train(&ParallelCorpus::<Vec<String>>::new(Vec::new()));
        assert!(matches!(result, Err(PlsaError::InvalidInput(_))));
        let result = plsa.train(&SequentialCorpus::new(vec![Vec::<String>::new()]));
        assert!(matches!(result, Err(PlsaError::InvalidInput(_))));
    }

    #[test]
    fn invalid_configs_are_rejected(){
        assert!(matches!(Plsa::new(PlsaConfig::deterministic(0)), Err(PlsaError::InvalidInput(_))));
        let config = PlsaConfigBuilder::default().topics(2).eta(-1.0).build().unwrap();
        assert!(matches!(Plsa::new(config), Err(PlsaError::InvalidInput(_))));
    }

    #[test]
    fn single_topic_learns_the_word_frequencies(){
        let corpus = SequentialCorpus::new(corpus(&["a b a", "b c"]));
        let model = Plsa::new(PlsaConfig::deterministic(1)).unwrap().train(&corpus).unwrap();
        assert_eq!(TrainingState::Converged, model.state());
        assert_relative_eq!(0.4, model.table().get_probability(0, 0).unwrap(), epsilon = 1e-12);
        assert_relative_eq!(0.4, model.table().get_probability(0, 1).unwrap(), epsilon = 1e-12);
        assert_relative_eq!(0.2, model.table().get_probability(0, 2).unwrap(), epsilon = 1e-12);
        for distribution in model.doc_topic_distributions() {
            assert_relative_eq!(1.0, distribution[0], epsilon = 1e-12);
        }
        let expected = 4.0 * 0.4f64.ln() + 0.2f64.ln();
        assert_relative_eq!(expected, model.history().last().unwrap().log_likelihood, epsilon = 1e-9);
    }

    #[test]
    fn zero_iterations_only_initialize(){
        let corpus = SequentialCorpus::new(corpus(&["a b a", "b c"]));
        let config = PlsaConfigBuilder::default().topics(2).max_iterations(0usize).seed(7u64).build().unwrap();
        let plsa = Plsa::new(config).unwrap();
        let run = plsa.start(&corpus).unwrap();
        assert_eq!(TrainingState::Initialized, run.state());
        let initial = run.table().clone();
        let model = run.run().unwrap();
        assert_eq!(TrainingState::MaxIterReached, model.state());
        assert_eq!(1, model.history().reports().len());
        assert_eq!(0, model.history().iterations());
        assert_eq!(0, model.table().version());
        assert_eq!(initial.probabilities(), model.table().probabilities());
    }

    #[test]
    fn likelihood_never_decreases(){
        let corpus = SequentialCorpus::new(corpus(&["a b a d", "b c c", "d e a", "e e b c"]));
        let config = PlsaConfigBuilder::default().topics(3).max_iterations(50usize).seed(3u64).build().unwrap();
        let mut run = Plsa::new(config).unwrap().start(&corpus).unwrap();
        assert_distributions(&run);
        while !run.state().is_terminal() {
            run = run.step().unwrap();
            assert_distributions(&run);
            assert_eq!(run.history().iterations(), run.table().version());
        }
        for (previous, current) in run.history().log_likelihoods().zip(run.history().log_likelihoods().skip(1)) {
            assert!(current >= previous - 1e-9, "{previous} -> {current}");
        }
        let model = run.into_model();
        assert!(model.history().iterations() <= 50);
        assert_eq!(5, model.vocabulary().len());
    }

    #[test]
    fn steps_after_the_end_change_nothing(){
        let corpus = SequentialCorpus::new(corpus(&["a b"]));
        let config = PlsaConfigBuilder::default().topics(2).max_iterations(1usize).seed(1u64).build().unwrap();
        let run = Plsa::new(config).unwrap().start(&corpus).unwrap().step().unwrap();
        assert!(run.state().is_terminal());
        let version = run.table().version();
        let run = run.step().unwrap();
        assert_eq!(version, run.table().version());
        assert_eq!(1, run.history().iterations());
    }

    #[test]
    fn parallel_and_sequential_runs_agree(){
        let lines = corpus(&["a b a d", "b c c", "d e a", "e e b c", "a a a", "c d"]);
        let config = PlsaConfigBuilder::default().topics(2).max_iterations(5usize).seed(11u64).build().unwrap();
        let plsa = Plsa::new(config).unwrap();
        let parallel = plsa.train(&ParallelCorpus::new(lines.clone())).unwrap();
        let sequential = plsa.train(&SequentialCorpus::new(lines)).unwrap();
        assert_eq!(parallel.history().iterations(), sequential.history().iterations());
        for (a, b) in parallel.table().probabilities().iter().zip(sequential.table().probabilities()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-9);
        }
        for (a, b) in parallel.doc_topic_distributions().iter().zip(sequential.doc_topic_distributions().iter()) {
            for (x, y) in a.iter().zip(b) {
                assert_relative_eq!(*x, *y, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn tokens_with_inner_whitespace_train_and_round_trip(){
        let lines = read_corpus(Cursor::new("caf\u{a0}au lait\nnew\tline b\n")).unwrap();
        assert_eq!(vec![vec!["caf\u{a0}au", "lait"], vec!["new\tline", "b"]], lines);
        let model = Plsa::new(PlsaConfig::deterministic(2)).unwrap().train(&ParallelCorpus::new(lines)).unwrap();
        assert_eq!(4, model.vocabulary().len());

        let dir = tempfile::tempdir().unwrap();
        let word_topic = dir.path().join("word_topic.txt");
        let doc_topic = dir.path().join("doc_topic.txt");
        model.save(&word_topic, &doc_topic).unwrap();

        let file = plsa_toolkit::fs::open_input_file(&word_topic).unwrap();
        let read = read_word_given_topic(BufReader::new(file)).unwrap();
        assert_eq!(model.vocabulary(), &read.vocabulary);
        assert_eq!(model.table().probabilities(), &read.probabilities);

        let file = plsa_toolkit::fs::open_input_file(&doc_topic).unwrap();
        let distributions = read_doc_topic(BufReader::new(file)).unwrap();
        assert_eq!(2, distributions.nrows());
        for (read, trained) in distributions.rows().into_iter().zip(model.doc_topic_distributions()) {
            assert_eq!(trained, read);
        }
    }
}
