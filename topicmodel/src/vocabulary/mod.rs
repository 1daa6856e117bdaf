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


mod traits;

pub use traits::*;
use std::borrow::Borrow;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::hash::Hash;
use itertools::Itertools;
use crate::corpus::DocumentCollection;
use crate::errors::{PlsaError, PlsaResult};

/// A vocabulary mapping between an usize id and a specific object (word)
#[derive(Clone, Debug)]
pub struct Vocabulary<T> {
    id2entry: Vec<T>,
    entry2id: HashMap<T, usize>,
}

impl<T> Vocabulary<T> {
    /// Create a new empty vocabulary.
    pub fn empty() -> Self {
        Self {
            id2entry: Vec::new(),
            entry2id: HashMap::new(),
        }
    }

    /// Create a new empty vocabulary but sets the [capacity] of the mappings.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            id2entry: Vec::with_capacity(capacity),
            entry2id: HashMap::with_capacity(capacity),
        }
    }
}

impl Vocabulary<String> {
    /// Collects the distinct tokens of `corpus`. The ids are assigned in the order of
    /// the first occurrence and stay fixed for the lifetime of the vocabulary.
    ///
    /// Fails for an empty corpus and for tokens that can not be exported
    /// as a single space separated cell. Any other whitespace is part of the token.
    pub fn build<C>(corpus: &C) -> PlsaResult<Self>
    where
        C: DocumentCollection<Item=Vec<String>>
    {
        if corpus.is_empty() {
            return Err(PlsaError::invalid_input("The corpus does not contain any document."));
        }
        let distinct = corpus.distinct_flattened(|doc| doc.clone());
        if distinct.is_empty() {
            return Err(PlsaError::invalid_input("The corpus does not contain any token."));
        }
        if let Some(illegal) = distinct.iter().find(|token| token.is_empty() || token.contains(' ')) {
            return Err(PlsaError::invalid_input(format!("The token {illegal:?} is empty or contains a space.")));
        }
        let vocabulary = Self::from(distinct);
        log::debug!("Built a vocabulary with {} distinct tokens.", vocabulary.len());
        Ok(vocabulary)
    }
}

impl<T> BasicVocabulary<T> for Vocabulary<T> {
    fn len(&self) -> usize {
        self.id2entry.len()
    }
}

impl<T> Default for Vocabulary<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> AsRef<[T]> for Vocabulary<T> {
    fn as_ref(&self) -> &[T] {
        &self.id2entry
    }
}

impl<T> From<Vec<T>> for Vocabulary<T>
where
    T: Eq + Hash + Clone
{
    /// Duplicates keep the id of their first occurrence.
    fn from(value: Vec<T>) -> Self {
        let mut voc = Self::with_capacity(value.len());
        for entry in value {
            voc.add_value(entry);
        }
        voc
    }
}

impl<T> SearchableVocabulary<T> for Vocabulary<T>
where
    T: Eq + Hash + Clone
{
    fn get_id<Q: ?Sized>(&self, value: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: Hash + Eq
    {
        self.entry2id.get(value).copied()
    }
}

impl<T> VocabularyMut<T> for Vocabulary<T> where T: Eq + Hash + Clone {
    /// Adds the `value` to the vocabulary and returns the associated id
    fn add_value(&mut self, value: T) -> usize {
        match self.entry2id.entry(value) {
            Entry::Occupied(entry) => {
                *entry.get()
            }
            Entry::Vacant(entry) => {
                let pos = self.id2entry.len();
                self.id2entry.push(entry.key().clone());
                entry.insert(pos);
                pos
            }
        }
    }
}

impl<T> PartialEq for Vocabulary<T> where T: Eq {
    fn eq(&self, other: &Self) -> bool {
        self.id2entry.len() == other.id2entry.len() &&
            self.id2entry.iter()
                .zip_eq(other.id2entry.iter())
                .all(|(a, b)| a.eq(b))
    }
}

impl<T> Eq for Vocabulary<T> where T: Eq {}

impl<T> Display for Vocabulary<T> where T: Display {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Vocabulary[{}]", self.id2entry.iter().join(", "))
    }
}
