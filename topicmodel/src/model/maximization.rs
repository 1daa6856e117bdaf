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


use ndarray::Array2;
use crate::corpus::DocumentStore;
use crate::document::Document;
use crate::errors::{Location, PlsaError, PlsaResult};
use crate::math::normalize_in_place;
use crate::model::{Probability, TopicTo, TopicWordTable};

/// Re-estimates P(topic | document) from the posteriors of the words in `document`.
pub fn maximization(mut document: Document) -> PlsaResult<Document> {
    let mut topic = TopicTo::<Probability>::zeros(document.topic.len());
    for entry in document.words.values() {
        topic.scaled_add(entry.count as Probability, &entry.topic_word);
    }
    normalize_in_place(&mut topic, "document topic distribution", Location::Document(document.id))?;
    document.topic = topic;
    Ok(document)
}

/// Adds count * P(topic | word, document) of every word in `document` to the column
/// of the word in `accumulator`.
pub fn accumulate_topic_words(document: &Document, accumulator: &mut Array2<Probability>) -> PlsaResult<()> {
    for (&word_id, entry) in document.words.iter() {
        if word_id >= accumulator.ncols() || entry.topic_word.len() != accumulator.nrows() {
            return Err(PlsaError::invalid_input(format!(
                "The word {word_id} of document {} does not fit into the accumulator of shape {:?}.",
                document.id,
                accumulator.dim()
            )));
        }
        accumulator.column_mut(word_id).scaled_add(entry.count as Probability, &entry.topic_word);
    }
    Ok(())
}

/// The maximization step over the whole corpus.
///
/// Returns the re-estimated documents and the successor of `table`. The successor is
/// only created after the contributions of all documents are summed up.
pub fn maximization_step<C: DocumentStore>(corpus: C, table: &TopicWordTable) -> PlsaResult<(C, TopicWordTable)> {
    let corpus = corpus.try_map_into(maximization)?;
    let shape = table.dim();
    let accumulator = corpus.try_aggregate(
        || Array2::<Probability>::zeros(shape),
        |mut accumulator, document| {
            accumulate_topic_words(document, &mut accumulator)?;
            Ok::<_, PlsaError>(accumulator)
        },
        |a, b| a + b
    )?;
    let successor = table.successor(accumulator)?;
    Ok((corpus, successor))
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;
    use ndarray::{array, Array2, Axis};
    use crate::corpus::{DocumentCollection, ParallelCorpus, SequentialCorpus};
    use crate::errors::{Location, PlsaError};
    use crate::model::test::{create_test_document, create_test_table};
    use crate::model::{accumulate_topic_words, expectation, maximization, maximization_step};

    #[test]
    fn document_topic_is_the_weighted_posterior_sum(){
        let document = expectation(create_test_document(0), &create_test_table()).unwrap();
        let document = maximization(document).unwrap();
        // 2 * [0.625, 0.375] + [0.2/0.68, 0.48/0.68]
        let expected_0 = 1.25 + 0.2 / 0.68;
        let expected_1 = 0.75 + 0.48 / 0.68;
        assert_relative_eq!(expected_0 / 3.0, document.topic()[0], epsilon = 1e-12);
        assert_relative_eq!(expected_1 / 3.0, document.topic()[1], epsilon = 1e-12);
    }

    #[test]
    fn accumulates_counts_times_posteriors(){
        let mut accumulator = Array2::zeros((2, 3));
        accumulate_topic_words(&create_test_document(0), &mut accumulator).unwrap();
        accumulate_topic_words(&create_test_document(1), &mut accumulator).unwrap();
        assert_eq!(array![[2.0, 1.0, 0.0], [2.0, 1.0, 0.0]], accumulator);

        let mut too_small = Array2::zeros((2, 1));
        assert!(matches!(
            accumulate_topic_words(&create_test_document(0), &mut too_small),
            Err(PlsaError::InvalidInput(_))
        ));
    }

    #[test]
    fn step_publishes_a_normalized_successor(){
        let table = create_test_table();
        let documents = vec![create_test_document(0), create_test_document(1)];
        let (parallel, parallel_table) = maximization_step(ParallelCorpus::from(documents.clone()), &table).unwrap();
        let (sequential, sequential_table) = maximization_step(SequentialCorpus::from(documents), &table).unwrap();
        assert_eq!(1, parallel_table.version());
        for sum in parallel_table.probabilities().sum_axis(Axis(1)) {
            assert_relative_eq!(1.0, sum, epsilon = 1e-12);
        }
        // every posterior is [0.5, 0.5], so both topics see word 0 twice as often as word 1
        assert_relative_eq!(2.0 / 3.0, parallel_table.get_probability(0, 0).unwrap(), epsilon = 1e-12);
        assert_relative_eq!(1.0 / 3.0, parallel_table.get_probability(1, 1).unwrap(), epsilon = 1e-12);
        assert_eq!(sequential_table.dim(), parallel_table.dim());
        for (a, b) in sequential_table.probabilities().iter().zip(parallel_table.probabilities().iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }
        assert_eq!(sequential.collect(), parallel.collect());
    }

    #[test]
    fn a_topic_without_mass_is_degenerated(){
        let mut document = create_test_document(0);
        for entry in document.words.values_mut() {
            entry.topic_word = array![1.0, 0.0];
        }
        let result = maximization_step(SequentialCorpus::from(vec![document]), &create_test_table());
        assert!(matches!(
            result,
            Err(PlsaError::NumericalDegeneracy { location: Location::Topic(1), .. })
        ));
    }
}
