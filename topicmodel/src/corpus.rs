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


//! The collection of documents a training run works on.
//!
//! Every step of the training is expressed through [DocumentCollection], so the
//! execution substrate can be exchanged without touching the algorithm.

use std::hash::Hash;
use indexmap::IndexSet;
use rayon::prelude::*;
use crate::document::Document;
use crate::model::DocumentId;

/// A collection of documents supporting map, flatten + deduplicate, collect and
/// sum-over-all. No order of execution between the documents is guaranteed.
pub trait DocumentCollection: Sized {
    type Item: Send + Sync;
    type Mapped<R: Send + Sync>: DocumentCollection<Item=R>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Applies `f` to every document.
    fn map<R, F>(&self, f: F) -> Self::Mapped<R>
    where
        R: Send + Sync,
        F: Fn(&Self::Item) -> R + Sync + Send;

    /// Applies `f` to every document and its position in the collection.
    /// Fails with the first error encountered.
    fn try_map_enumerated<R, E, F>(&self, f: F) -> Result<Self::Mapped<R>, E>
    where
        R: Send + Sync,
        E: Send,
        F: Fn(DocumentId, &Self::Item) -> Result<R, E> + Sync + Send;

    /// Consumes the collection and replaces every document by the result of `f`.
    /// Fails with the first error encountered, nothing of the partial result survives.
    fn try_map_into<R, E, F>(self, f: F) -> Result<Self::Mapped<R>, E>
    where
        R: Send + Sync,
        E: Send,
        F: Fn(Self::Item) -> Result<R, E> + Sync + Send;

    /// Flattens the values produced by `f` and removes the duplicates.
    /// The result is in the order of the first occurrence.
    fn distinct_flattened<T, I, F>(&self, f: F) -> Vec<T>
    where
        T: Hash + Eq + Send,
        I: IntoIterator<Item=T>,
        F: Fn(&Self::Item) -> I + Sync + Send;

    /// Folds every document into a partial result and merges the partial results with
    /// `combine`. `combine` has to be commutative and associative.
    fn try_aggregate<S, E, ID, F, OP>(&self, identity: ID, fold: F, combine: OP) -> Result<S, E>
    where
        S: Send,
        E: Send,
        ID: Fn() -> S + Sync + Send,
        F: Fn(S, &Self::Item) -> Result<S, E> + Sync + Send,
        OP: Fn(S, S) -> S + Sync + Send;

    /// Collects all documents into a single list, in collection order.
    fn collect(self) -> Vec<Self::Item>;
}

/// A collection of encoded documents that stays the same kind of collection when a
/// training step replaces its documents.
pub trait DocumentStore: DocumentCollection<Item=Document, Mapped<Document>=Self> {}

impl<C> DocumentStore for C where C: DocumentCollection<Item=Document, Mapped<Document>=C> {}

/// A [DocumentCollection] processed by the rayon thread pool.
#[derive(Debug, Clone, Default)]
pub struct ParallelCorpus<T> {
    items: Vec<T>
}

/// A [DocumentCollection] processed on the calling thread.
#[derive(Debug, Clone, Default)]
pub struct SequentialCorpus<T> {
    items: Vec<T>
}

macro_rules! impl_corpus_basics {
    ($name: ident) => {
        impl<T> $name<T> {
            pub fn new(items: Vec<T>) -> Self {
                Self { items }
            }
        }

        impl<T> From<Vec<T>> for $name<T> {
            fn from(items: Vec<T>) -> Self {
                Self::new(items)
            }
        }
    };
}

impl_corpus_basics!(ParallelCorpus);
impl_corpus_basics!(SequentialCorpus);

impl<T> DocumentCollection for ParallelCorpus<T> where T: Send + Sync {
    type Item = T;
    type Mapped<R: Send + Sync> = ParallelCorpus<R>;

    fn len(&self) -> usize {
        self.items.len()
    }

    fn map<R, F>(&self, f: F) -> Self::Mapped<R>
    where
        R: Send + Sync,
        F: Fn(&Self::Item) -> R + Sync + Send
    {
        ParallelCorpus::new(self.items.par_iter().map(f).collect())
    }

    fn try_map_enumerated<R, E, F>(&self, f: F) -> Result<Self::Mapped<R>, E>
    where
        R: Send + Sync,
        E: Send,
        F: Fn(DocumentId, &Self::Item) -> Result<R, E> + Sync + Send
    {
        self.items
            .par_iter()
            .enumerate()
            .map(|(document_id, item)| f(document_id, item))
            .collect::<Result<Vec<_>, E>>()
            .map(ParallelCorpus::new)
    }

    fn try_map_into<R, E, F>(self, f: F) -> Result<Self::Mapped<R>, E>
    where
        R: Send + Sync,
        E: Send,
        F: Fn(Self::Item) -> Result<R, E> + Sync + Send
    {
        self.items
            .into_par_iter()
            .map(f)
            .collect::<Result<Vec<_>, E>>()
            .map(ParallelCorpus::new)
    }

    fn distinct_flattened<V, I, F>(&self, f: F) -> Vec<V>
    where
        V: Hash + Eq + Send,
        I: IntoIterator<Item=V>,
        F: Fn(&Self::Item) -> I + Sync + Send
    {
        // Deduplicate per document in parallel, merge in document order.
        let partial: Vec<IndexSet<V>> = self.items
            .par_iter()
            .map(|item| f(item).into_iter().collect())
            .collect();
        partial.into_iter().flatten().collect::<IndexSet<V>>().into_iter().collect()
    }

    fn try_aggregate<S, E, ID, F, OP>(&self, identity: ID, fold: F, combine: OP) -> Result<S, E>
    where
        S: Send,
        E: Send,
        ID: Fn() -> S + Sync + Send,
        F: Fn(S, &Self::Item) -> Result<S, E> + Sync + Send,
        OP: Fn(S, S) -> S + Sync + Send
    {
        self.items
            .par_iter()
            .try_fold(&identity, |acc, item| fold(acc, item))
            .try_reduce(&identity, |a, b| Ok(combine(a, b)))
    }

    fn collect(self) -> Vec<Self::Item> {
        self.items
    }
}

impl<T> DocumentCollection for SequentialCorpus<T> where T: Send + Sync {
    type Item = T;
    type Mapped<R: Send + Sync> = SequentialCorpus<R>;

    fn len(&self) -> usize {
        self.items.len()
    }

    fn map<R, F>(&self, f: F) -> Self::Mapped<R>
    where
        R: Send + Sync,
        F: Fn(&Self::Item) -> R + Sync + Send
    {
        SequentialCorpus::new(self.items.iter().map(f).collect())
    }

    fn try_map_enumerated<R, E, F>(&self, f: F) -> Result<Self::Mapped<R>, E>
    where
        R: Send + Sync,
        E: Send,
        F: Fn(DocumentId, &Self::Item) -> Result<R, E> + Sync + Send
    {
        self.items
            .iter()
            .enumerate()
            .map(|(document_id, item)| f(document_id, item))
            .collect::<Result<Vec<_>, E>>()
            .map(SequentialCorpus::new)
    }

    fn try_map_into<R, E, F>(self, f: F) -> Result<Self::Mapped<R>, E>
    where
        R: Send + Sync,
        E: Send,
        F: Fn(Self::Item) -> Result<R, E> + Sync + Send
    {
        self.items
            .into_iter()
            .map(f)
            .collect::<Result<Vec<_>, E>>()
            .map(SequentialCorpus::new)
    }

    fn distinct_flattened<V, I, F>(&self, f: F) -> Vec<V>
    where
        V: Hash + Eq + Send,
        I: IntoIterator<Item=V>,
        F: Fn(&Self::Item) -> I + Sync + Send
    {
        self.items.iter().flat_map(f).collect::<IndexSet<V>>().into_iter().collect()
    }

    fn try_aggregate<S, E, ID, F, OP>(&self, identity: ID, fold: F, _combine: OP) -> Result<S, E>
    where
        S: Send,
        E: Send,
        ID: Fn() -> S + Sync + Send,
        F: Fn(S, &Self::Item) -> Result<S, E> + Sync + Send,
        OP: Fn(S, S) -> S + Sync + Send
    {
        self.items.iter().try_fold(identity(), fold)
    }

    fn collect(self) -> Vec<Self::Item> {
        self.items
    }
}
