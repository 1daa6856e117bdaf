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


use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use ndarray::Array1;
use crate::errors::{Location, PlsaError, PlsaResult};
use crate::math::draw_distribution;
use crate::model::{DocumentId, DocumentLength, Probability, TopicTo, WordFrequency, WordId};
use crate::random::RunSeed;
use crate::vocabulary::{SearchableVocabulary, Vocabulary};

/// The state of a single distinct word in a document.
#[derive(Debug, Clone, PartialEq)]
pub struct WordEntry {
    /// The number of occurrences in the document, always positive.
    pub(crate) count: WordFrequency,
    /// P(topic | word, document)
    pub(crate) topic_word: TopicTo<Probability>,
}

impl WordEntry {
    pub fn count(&self) -> WordFrequency {
        self.count
    }

    pub fn topic_word(&self) -> &TopicTo<Probability> {
        &self.topic_word
    }
}

/// A document with its latent state.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub(crate) id: DocumentId,
    /// Exactly the distinct words of the document.
    pub(crate) words: BTreeMap<WordId, WordEntry>,
    /// P(topic | document)
    pub(crate) topic: TopicTo<Probability>,
}

impl Document {
    /// The position of the document in the corpus.
    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn words(&self) -> &BTreeMap<WordId, WordEntry> {
        &self.words
    }

    pub fn topic(&self) -> &TopicTo<Probability> {
        &self.topic
    }

    pub fn topic_count(&self) -> usize {
        self.topic.len()
    }

    /// The number of tokens in the document.
    pub fn length(&self) -> DocumentLength {
        self.words.values().map(|entry| entry.count).sum()
    }
}

/// Converts token sequences into [Document]s with freshly initialized latent state.
pub struct DocumentEncoder<'a> {
    vocabulary: &'a Vocabulary<String>,
    topics: usize,
    seed: RunSeed,
}

impl<'a> DocumentEncoder<'a> {
    pub fn new(vocabulary: &'a Vocabulary<String>, topics: usize, seed: RunSeed) -> Self {
        Self { vocabulary, topics, seed }
    }

    /// Tallies the tokens of the document and draws the initial distributions.
    /// The posterior of every word is normalized right away.
    pub fn encode<S: AsRef<str>>(&self, document_id: DocumentId, tokens: &[S]) -> PlsaResult<Document> {
        if tokens.is_empty() {
            return Err(PlsaError::invalid_input(format!("The document {document_id} does not contain any token.")));
        }
        let mut rng = self.seed.document_rng(document_id);
        let mut words: BTreeMap<WordId, WordEntry> = BTreeMap::new();
        for token in tokens {
            let token = token.as_ref();
            let word_id = self.vocabulary.get_id(token).ok_or_else(|| {
                PlsaError::invalid_input(format!("The token {token:?} of document {document_id} is not in the vocabulary."))
            })?;
            match words.entry(word_id) {
                Entry::Occupied(mut entry) => {
                    entry.get_mut().count += 1;
                }
                Entry::Vacant(entry) => {
                    let topic_word = draw_distribution(
                        &mut rng,
                        self.topics,
                        "topic word posterior",
                        Location::Word { document_id, word_id }
                    )?;
                    entry.insert(WordEntry { count: 1, topic_word });
                }
            }
        }
        let topic: Array1<Probability> = draw_distribution(
            &mut rng,
            self.topics,
            "document topic distribution",
            Location::Document(document_id)
        )?;
        Ok(Document { id: document_id, words, topic })
    }
}
