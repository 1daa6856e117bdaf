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


use std::borrow::Borrow;
use std::hash::Hash;
use std::ops::Range;
use std::slice::Iter;
use crate::model::WordId;

/// Read access to the dense id space of a vocabulary.
/// Ids start at 0 and every id below [BasicVocabulary::len] is assigned.
pub trait BasicVocabulary<T>: AsRef<[T]> {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All assigned ids.
    fn ids(&self) -> Range<WordId> {
        0..self.len()
    }

    /// The entries in id order, the position is the id.
    fn iter(&self) -> Iter<T> {
        self.as_ref().iter()
    }

    fn get_value_by_id(&self, id: WordId) -> Option<&T> {
        self.as_ref().get(id)
    }

    fn contains_id(&self, id: WordId) -> bool {
        id < self.len()
    }
}

/// Lookup of the id assigned to an entry.
pub trait SearchableVocabulary<T>: BasicVocabulary<T> where T: Eq + Hash {
    fn get_id<Q: ?Sized>(&self, value: &Q) -> Option<WordId>
    where
        T: Borrow<Q>,
        Q: Hash + Eq;

    fn contains_value<Q: ?Sized>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq
    {
        self.get_id(value).is_some()
    }
}

/// A vocabulary that only grows. Assigned ids never change.
pub trait VocabularyMut<T>: SearchableVocabulary<T> where T: Eq + Hash + Clone {
    /// Returns the id of `value`, a new one if it was unknown.
    fn add_value(&mut self, value: T) -> WordId;

    fn add<V: Into<T>>(&mut self, value: V) -> WordId {
        self.add_value(value.into())
    }
}
