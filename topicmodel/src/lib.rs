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


//! Probabilistic latent semantic analysis, trained by expectation maximization.

pub mod errors;
pub mod vocabulary;
pub mod corpus;
pub mod document;
pub mod model;
pub mod train;
pub mod io;
pub mod random;
mod math;

pub use corpus::{DocumentCollection, DocumentStore, ParallelCorpus, SequentialCorpus};
pub use errors::{PlsaError, PlsaResult};
pub use model::PlsaModel;
pub use train::{Plsa, PlsaConfig, PlsaConfigBuilder};
