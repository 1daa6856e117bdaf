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


use std::fmt::{Display, Formatter};
use thiserror::Error;
use plsa_toolkit::from_str_ex::ParseErrorEx;
use crate::model::{DocumentId, TopicId, WordId};
use crate::train::PlsaConfigBuilderError;

/// The errors of a training run. None of them is recoverable for the running training.
#[derive(Debug, Error)]
pub enum PlsaError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Numerical degeneracy at {location}: {cause}")]
    NumericalDegeneracy {
        location: Location,
        cause: Degeneracy,
    },
    #[error("Can not calculate the improvement from {previous} to {current}!")]
    ConvergenceCheck {
        previous: f64,
        current: f64,
    },
    #[error(transparent)]
    Config(#[from] PlsaConfigBuilderError),
}

impl PlsaError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn degenerated(location: Location, cause: Degeneracy) -> Self {
        Self::NumericalDegeneracy { location, cause }
    }
}

pub type PlsaResult<T> = Result<T, PlsaError>;

/// What exactly degenerated.
#[derive(Debug, Copy, Clone, PartialEq, Error)]
pub enum Degeneracy {
    #[error("the {vector} sums up to {sum} and can not be normalized")]
    Sum {
        vector: &'static str,
        sum: f64,
    },
    #[error("log({argument}) is undefined")]
    Logarithm {
        argument: f64
    },
}

/// Where a degenerated value lives.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Location {
    Document(DocumentId),
    Word { document_id: DocumentId, word_id: WordId },
    Topic(TopicId),
    Initialization,
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Document(document_id) => write!(f, "document {document_id}"),
            Location::Word { document_id, word_id } => write!(f, "word {word_id} of document {document_id}"),
            Location::Topic(topic_id) => write!(f, "topic {topic_id}"),
            Location::Initialization => f.write_str("initialization"),
        }
    }
}

/// The errors while reading exported tables.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    ParseFloat(#[from] ParseErrorEx<std::num::ParseFloatError>),
    #[error("Line {line} has {found} probabilities but {expected} were expected!")]
    ColumnMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("Line {line} has no token!")]
    MissingToken {
        line: usize
    },
    #[error("Line {line} has no probabilities!")]
    MissingProbabilities {
        line: usize
    },
    #[error("The token {token:?} in line {line} was already read!")]
    DuplicateToken {
        line: usize,
        token: String,
    },
    #[error("The table is empty!")]
    Empty,
    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}
