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


use crate::corpus::DocumentStore;
use crate::document::Document;
use crate::errors::{Location, PlsaError, PlsaResult};
use crate::math::normalize_in_place;
use crate::model::TopicWordTable;

/// Recalculates P(topic | word, document) of every word in `document`.
/// The topic distribution of the document itself is not touched.
pub fn expectation(mut document: Document, table: &TopicWordTable) -> PlsaResult<Document> {
    let document_id = document.id;
    if document.topic.len() != table.topic_count() {
        return Err(PlsaError::invalid_input(format!(
            "The document {document_id} has {} topics but the table has {}.",
            document.topic.len(),
            table.topic_count()
        )));
    }
    let Document { words, topic, .. } = &mut document;
    for (&word_id, entry) in words.iter_mut() {
        let column = table.word_column(word_id)?;
        entry.topic_word = &column * &*topic;
        normalize_in_place(&mut entry.topic_word, "topic word posterior", Location::Word { document_id, word_id })?;
    }
    Ok(document)
}

/// The expectation step over the whole corpus.
pub fn expectation_step<C: DocumentStore>(corpus: C, table: &TopicWordTable) -> PlsaResult<C> {
    corpus.try_map_into(|document| expectation(document, table))
}
