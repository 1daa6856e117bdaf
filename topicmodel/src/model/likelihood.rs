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


use crate::corpus::DocumentCollection;
use crate::document::Document;
use crate::errors::{Degeneracy, Location, PlsaError, PlsaResult};
use crate::model::{Probability, TopicWordTable};

/// The log likelihood of `document`:
/// sum over the words of count * log(P(topic | document) · P(word | topic)).
pub fn document_log_likelihood(document: &Document, table: &TopicWordTable) -> PlsaResult<f64> {
    let mut likelihood = 0.0;
    for (&word_id, entry) in document.words.iter() {
        let column = table.word_column(word_id)?;
        if column.len() != document.topic.len() {
            return Err(PlsaError::invalid_input(format!(
                "The document {} has {} topics but the table has {}.",
                document.id,
                document.topic.len(),
                column.len()
            )));
        }
        let argument = document.topic.dot(&column);
        if !(argument.is_finite() && argument > 0.0) {
            return Err(PlsaError::degenerated(
                Location::Word { document_id: document.id, word_id },
                Degeneracy::Logarithm { argument }
            ));
        }
        likelihood += entry.count as Probability * argument.ln();
    }
    Ok(likelihood)
}

/// The log likelihood of the whole corpus under the current parameters.
pub fn log_likelihood<C>(corpus: &C, table: &TopicWordTable) -> PlsaResult<f64>
where
    C: DocumentCollection<Item=Document>
{
    corpus.try_aggregate(
        || 0.0,
        |likelihood, document| Ok::<_, PlsaError>(likelihood + document_log_likelihood(document, table)?),
        |a, b| a + b
    )
}
