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


mod expectation;
mod maximization;
mod likelihood;
mod trained;

pub use expectation::*;
pub use maximization::*;
pub use likelihood::*;
pub use trained::*;

use ndarray::{Array1, Array2, ArrayView1, Axis};
use rand::Rng;
use crate::errors::{PlsaError, PlsaResult};
use crate::math::{draw_open_unit_matrix, normalize_rows};

pub type TopicTo<T> = Array1<T>;
pub type DocumentTo<T> = Vec<T>;
pub type Probability = f64;

pub type WordId = usize;
pub type TopicId = usize;
pub type DocumentId = usize;
pub type WordFrequency = u64;
pub type DocumentLength = u64;

/// The dense table P(word | topic), shared read only by all documents of a step.
///
/// A table is never changed after creation. Every maximization step creates a
/// successor with a higher version that replaces the old one as a whole.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicWordTable {
    version: usize,
    // Row = Topic
    // Col = Word
    probabilities: Array2<Probability>,
}

impl TopicWordTable {
    /// Draws a random table with `topics` rows over `vocabulary_size` words.
    /// Every row is a proper distribution.
    pub fn initialize<R: Rng + ?Sized>(topics: usize, vocabulary_size: usize, rng: &mut R) -> PlsaResult<Self> {
        if topics == 0 || vocabulary_size == 0 {
            return Err(PlsaError::invalid_input(format!(
                "Can not create a word given topic table with {topics} topics and {vocabulary_size} words."
            )));
        }
        let mut probabilities = draw_open_unit_matrix(rng, topics, vocabulary_size);
        normalize_rows(&mut probabilities, "word given topic distribution")?;
        Ok(Self { version: 0, probabilities })
    }

    /// Wraps an existing table, every row has to be a distribution.
    pub fn from_probabilities(probabilities: Array2<Probability>) -> PlsaResult<Self> {
        if probabilities.is_empty() {
            return Err(PlsaError::invalid_input("The word given topic table is empty."));
        }
        if probabilities.iter().any(|value| !value.is_finite() || *value < 0.0) {
            return Err(PlsaError::invalid_input("The word given topic table contains negative or non finite values."));
        }
        for (topic_id, sum) in probabilities.sum_axis(Axis(1)).iter().enumerate() {
            if (sum - 1.0).abs() > 1e-9 {
                return Err(PlsaError::invalid_input(format!("The topic {topic_id} sums up to {sum}.")));
            }
        }
        Ok(Self { version: 0, probabilities })
    }

    /// Row normalizes the summed up `accumulator` of a maximization step and
    /// returns it as the next version of this table.
    pub fn successor(&self, mut accumulator: Array2<Probability>) -> PlsaResult<Self> {
        if accumulator.dim() != self.probabilities.dim() {
            return Err(PlsaError::invalid_input(format!(
                "The accumulated table has the shape {:?} but {:?} was expected.",
                accumulator.dim(),
                self.probabilities.dim()
            )));
        }
        normalize_rows(&mut accumulator, "word given topic distribution")?;
        Ok(Self { version: self.version + 1, probabilities: accumulator })
    }

    /// The number of maximization steps that lead to this table.
    pub fn version(&self) -> usize {
        self.version
    }

    pub fn topic_count(&self) -> usize {
        self.probabilities.nrows()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.probabilities.ncols()
    }

    pub fn dim(&self) -> (usize, usize) {
        self.probabilities.dim()
    }

    pub fn probabilities(&self) -> &Array2<Probability> {
        &self.probabilities
    }

    pub fn get_probability(&self, topic_id: TopicId, word_id: WordId) -> Option<Probability> {
        self.probabilities.get((topic_id, word_id)).copied()
    }

    /// P(word | topic) for every word of the topic.
    pub fn topic_row(&self, topic_id: TopicId) -> Option<ArrayView1<Probability>> {
        (topic_id < self.topic_count()).then(|| self.probabilities.row(topic_id))
    }

    /// P(word | topic) of `word_id` for every topic.
    pub fn word_column(&self, word_id: WordId) -> PlsaResult<ArrayView1<Probability>> {
        if word_id < self.vocabulary_size() {
            Ok(self.probabilities.column(word_id))
        } else {
            Err(PlsaError::invalid_input(format!(
                "The word {word_id} is outside of the vocabulary with {} words.",
                self.vocabulary_size()
            )))
        }
    }

    pub fn into_probabilities(self) -> Array2<Probability> {
        self.probabilities
    }
}

#[cfg(test)]
pub(crate) mod test {
    use std::collections::BTreeMap;
    use approx::assert_relative_eq;
    use ndarray::{array, Array1, Array2, Axis};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use crate::document::{Document, WordEntry};
    use crate::errors::PlsaError;
    use crate::model::TopicWordTable;

    /// Two topics over two words.
    pub fn create_test_table() -> TopicWordTable {
        TopicWordTable::from_probabilities(array![[0.5, 0.5], [0.2, 0.8]]).unwrap()
    }

    /// Word 0 twice and word 1 once.
    pub fn create_test_document(id: usize) -> Document {
        let mut words = BTreeMap::new();
        words.insert(0, WordEntry { count: 2, topic_word: Array1::from(vec![0.5, 0.5]) });
        words.insert(1, WordEntry { count: 1, topic_word: Array1::from(vec![0.5, 0.5]) });
        Document { id, words, topic: array![0.4, 0.6] }
    }

    #[test]
    fn initialized_rows_are_distributions(){
        let mut rng = StdRng::seed_from_u64(1);
        let table = TopicWordTable::initialize(3, 17, &mut rng).unwrap();
        assert_eq!((3, 17), table.dim());
        assert_eq!(0, table.version());
        for sum in table.probabilities().sum_axis(Axis(1)) {
            assert_relative_eq!(1.0, sum, epsilon = 1e-12);
        }
        assert!(table.probabilities().iter().all(|p| *p > 0.0));
    }

    #[test]
    fn initialization_rejects_empty_shapes(){
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(TopicWordTable::initialize(0, 3, &mut rng), Err(PlsaError::InvalidInput(_))));
        assert!(matches!(TopicWordTable::initialize(2, 0, &mut rng), Err(PlsaError::InvalidInput(_))));
    }

    #[test]
    fn successor_is_normalized_and_versioned(){
        let table = create_test_table();
        let next = table.successor(array![[1.0, 3.0], [2.0, 2.0]]).unwrap();
        assert_eq!(1, next.version());
        assert_relative_eq!(0.25, next.get_probability(0, 0).unwrap());
        assert_relative_eq!(0.5, next.get_probability(1, 1).unwrap());
        assert!(table.successor(Array2::zeros((3, 2))).is_err());
        assert!(table.successor(Array2::zeros((2, 2))).is_err());
    }

    #[test]
    fn columns_and_rows(){
        let table = create_test_table();
        assert_eq!(array![0.5, 0.8], table.word_column(1).unwrap());
        assert_eq!(array![0.2, 0.8], table.topic_row(1).unwrap());
        assert!(table.word_column(2).is_err());
        assert!(table.topic_row(2).is_none());
        assert!(TopicWordTable::from_probabilities(array![[0.5, 0.6]]).is_err());
    }
}
