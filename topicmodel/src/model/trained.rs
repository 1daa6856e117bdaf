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


use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use itertools::Itertools;
use crate::corpus::{DocumentCollection, DocumentStore};
use crate::io::{write_doc_topic, write_word_given_topic};
use crate::model::{DocumentTo, Probability, TopicId, TopicTo, TopicWordTable, WordId};
use crate::random::RunSeed;
use crate::train::{TrainingHistory, TrainingState};
use crate::vocabulary::{BasicVocabulary, Vocabulary};

/// The result of a finished training run.
pub struct PlsaModel<D> {
    vocabulary: Arc<Vocabulary<String>>,
    table: Arc<TopicWordTable>,
    documents: D,
    history: TrainingHistory,
    state: TrainingState,
    seed: RunSeed,
}

impl<D> PlsaModel<D> {
    pub(crate) fn new(
        vocabulary: Arc<Vocabulary<String>>,
        table: Arc<TopicWordTable>,
        documents: D,
        history: TrainingHistory,
        state: TrainingState,
        seed: RunSeed,
    ) -> Self {
        Self { vocabulary, table, documents, history, state, seed }
    }

    pub fn vocabulary(&self) -> &Vocabulary<String> {
        &self.vocabulary
    }

    /// P(word | topic), Row = Topic, Col = Word
    pub fn table(&self) -> &TopicWordTable {
        &self.table
    }

    pub fn documents(&self) -> &D {
        &self.documents
    }

    pub fn history(&self) -> &TrainingHistory {
        &self.history
    }

    /// Either [TrainingState::Converged] or [TrainingState::MaxIterReached].
    pub fn state(&self) -> TrainingState {
        self.state
    }

    /// The seed the run was initialized with, allows to reproduce the run.
    pub fn seed(&self) -> RunSeed {
        self.seed
    }

    pub fn topic_count(&self) -> usize {
        self.table.topic_count()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn into_documents(self) -> D {
        self.documents
    }

    /// The `n` most probable words of `topic_id`, ties are ordered by word id.
    pub fn get_n_best_for_topic(&self, topic_id: TopicId, n: usize) -> Option<Vec<(WordId, Probability)>> {
        let row = self.table.topic_row(topic_id)?;
        Some(
            row.iter()
                .copied()
                .enumerate()
                .sorted_by(|(a_id, a), (b_id, b)| b.total_cmp(a).then(a_id.cmp(b_id)))
                .take(n)
                .collect()
        )
    }

    pub fn get_n_best_for_topics(&self, n: usize) -> Vec<Vec<(WordId, Probability)>> {
        (0..self.topic_count())
            .filter_map(|topic_id| self.get_n_best_for_topic(topic_id, n))
            .collect()
    }

    pub fn show_to(&self, n: usize, out: &mut impl Write) -> io::Result<()> {
        for (topic_id, topic_entries) in self.get_n_best_for_topics(n).iter().enumerate() {
            if topic_id != 0 {
                out.write_all(b"\n")?;
            }
            write!(out, "Topic({topic_id}):")?;
            for (rank, (word_id, probability)) in topic_entries.iter().enumerate() {
                let token = self.vocabulary.get_value_by_id(*word_id).map_or("", String::as_str);
                write!(out, "\n    {token}: {probability} ({})", rank + 1)?;
            }
        }
        Ok(())
    }
}

impl<D: DocumentStore> PlsaModel<D> {
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// P(topic | document) for every document, in corpus order.
    pub fn doc_topic_distributions(&self) -> DocumentTo<TopicTo<Probability>> {
        self.documents.map(|document| document.topic().clone()).collect()
    }

    /// Writes P(word | topic) to `word_topic_path` and P(topic | document) to `doc_topic_path`.
    pub fn save(&self, word_topic_path: impl AsRef<Path>, doc_topic_path: impl AsRef<Path>) -> io::Result<()> {
        let mut out = plsa_toolkit::fs::create_output_file(word_topic_path)?;
        let words = write_word_given_topic(&mut out, &self.vocabulary, &self.table)?;
        out.flush()?;

        let distributions = self.doc_topic_distributions();
        let mut out = plsa_toolkit::fs::create_output_file(doc_topic_path)?;
        let documents = write_doc_topic(&mut out, distributions.iter().map(|topic| topic.view()))?;
        out.flush()?;
        log::info!("Saved {words} words and {documents} documents.");
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;
    use ndarray::array;
    use crate::corpus::SequentialCorpus;
    use crate::model::test::{create_test_document, create_test_table};
    use crate::model::PlsaModel;
    use crate::random::RunSeed;
    use crate::train::{TrainingHistory, TrainingState};
    use crate::vocabulary::Vocabulary;

    fn create_test_model() -> PlsaModel<SequentialCorpus<crate::document::Document>> {
        PlsaModel::new(
            Arc::new(Vocabulary::from(vec!["plane".to_string(), "wing".to_string()])),
            Arc::new(create_test_table()),
            SequentialCorpus::new(vec![create_test_document(0), create_test_document(1)]),
            TrainingHistory::default(),
            TrainingState::Converged,
            RunSeed::new(1),
        )
    }

    #[test]
    fn best_words_are_sorted_by_probability(){
        let model = create_test_model();
        assert_eq!(Some(vec![(1, 0.8), (0, 0.2)]), model.get_n_best_for_topic(1, 5));
        assert_eq!(Some(vec![(0, 0.5)]), model.get_n_best_for_topic(0, 1));
        assert_eq!(None, model.get_n_best_for_topic(2, 1));
    }

    #[test]
    fn show_lists_the_best_words(){
        let model = create_test_model();
        let mut out = Vec::new();
        model.show_to(1, &mut out).unwrap();
        assert_eq!(
            "Topic(0):\n    plane: 0.5 (1)\nTopic(1):\n    wing: 0.8 (1)",
            String::from_utf8(out).unwrap()
        );
    }

    #[test]
    fn save_writes_both_tables(){
        let model = create_test_model();
        assert_eq!(vec![array![0.4, 0.6], array![0.4, 0.6]], model.doc_topic_distributions());
        let dir = tempfile::tempdir().unwrap();
        let word_topic = dir.path().join("out").join("word_topic.txt");
        let doc_topic = dir.path().join("out").join("doc_topic.txt");
        model.save(&word_topic, &doc_topic).unwrap();
        assert_eq!("plane 0.5 0.2\nwing 0.5 0.8\n", std::fs::read_to_string(word_topic).unwrap());
        assert_eq!("0.4 0.6\n0.4 0.6\n", std::fs::read_to_string(doc_topic).unwrap());
    }
}
