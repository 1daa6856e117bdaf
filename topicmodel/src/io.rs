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


//! The plain text exchange formats.
//!
//! Word given topic: one line per word in vocabulary order, `token p_0 ... p_{K-1}`.
//! Document topic: one line per document in corpus order, `p_0 ... p_{K-1}`.
//! Corpus: one document per line, tokens separated by single spaces. Lines without
//! tokens are not documents, so document ids count only the non empty lines.
//!
//! Probabilities are written in the shortest form that parses back to the same value.

use std::io;
use std::io::{BufRead, Write};
use itertools::Itertools;
use ndarray::{Array2, ArrayView1};
use plsa_toolkit::from_str_ex::ParseEx;
use crate::errors::ReadError;
use crate::model::{Probability, TopicWordTable};
use crate::vocabulary::{BasicVocabulary, SearchableVocabulary, Vocabulary, VocabularyMut};

fn write_probabilities(out: &mut impl Write, probabilities: ArrayView1<Probability>) -> io::Result<()> {
    write!(out, "{}", probabilities.iter().join(" "))
}

/// Writes the table as one line per word. Returns the number of written lines.
pub fn write_word_given_topic(out: &mut impl Write, vocabulary: &Vocabulary<String>, table: &TopicWordTable) -> io::Result<usize> {
    if vocabulary.len() != table.vocabulary_size() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("The vocabulary has {} words but the table {}.", vocabulary.len(), table.vocabulary_size())
        ));
    }
    for (word_id, token) in vocabulary.iter().enumerate() {
        write!(out, "{token} ")?;
        write_probabilities(out, table.probabilities().column(word_id))?;
        writeln!(out)?;
    }
    Ok(vocabulary.len())
}

/// Writes one line per document topic distribution. Returns the number of written lines.
pub fn write_doc_topic<'a, I>(out: &mut impl Write, distributions: I) -> io::Result<usize>
where
    I: IntoIterator<Item=ArrayView1<'a, Probability>>
{
    let mut written = 0usize;
    for distribution in distributions {
        write_probabilities(out, distribution)?;
        writeln!(out)?;
        written += 1;
    }
    Ok(written)
}

/// A word given topic table read from its text form.
#[derive(Debug, Clone, PartialEq)]
pub struct WordGivenTopicTable {
    pub vocabulary: Vocabulary<String>,
    /// Row = Topic, Col = Word
    pub probabilities: Array2<Probability>,
}

fn parse_probabilities<'a>(
    cells: impl Iterator<Item=&'a str>,
    line: usize,
    first_column: usize,
    expected: &mut Option<usize>,
    target: &mut Vec<Probability>,
) -> Result<(), ReadError> {
    let before = target.len();
    for (column, cell) in cells.enumerate() {
        target.push(cell.parse_ex_at(line, first_column + column)?);
    }
    let found = target.len() - before;
    if found == 0 {
        return Err(ReadError::MissingProbabilities { line });
    }
    match *expected {
        None => *expected = Some(found),
        Some(expected) if expected != found => {
            return Err(ReadError::ColumnMismatch { line, expected, found })
        }
        _ => {}
    }
    Ok(())
}

/// Reads a table written by [write_word_given_topic]. Empty lines are skipped.
pub fn read_word_given_topic(reader: impl BufRead) -> Result<WordGivenTopicTable, ReadError> {
    let mut vocabulary = Vocabulary::empty();
    let mut values = Vec::new();
    let mut topics = None;
    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = line_idx + 1;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        let mut cells = line.split(' ');
        let token = match cells.next() {
            Some(token) if !token.is_empty() => token,
            _ => return Err(ReadError::MissingToken { line: line_no })
        };
        if vocabulary.contains_value(token) {
            return Err(ReadError::DuplicateToken { line: line_no, token: token.to_string() });
        }
        parse_probabilities(cells, line_no, 2, &mut topics, &mut values)?;
        vocabulary.add(token);
    }
    let topics = topics.ok_or(ReadError::Empty)?;
    // The file is word major, the table is topic major.
    let probabilities = Array2::from_shape_vec((vocabulary.len(), topics), values)?
        .reversed_axes()
        .as_standard_layout()
        .into_owned();
    Ok(WordGivenTopicTable { vocabulary, probabilities })
}

/// Reads the document topic distributions written by [write_doc_topic].
/// Row = Document, Col = Topic
pub fn read_doc_topic(reader: impl BufRead) -> Result<Array2<Probability>, ReadError> {
    let mut values = Vec::new();
    let mut topics = None;
    let mut documents = 0usize;
    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        parse_probabilities(line.split(' '), line_idx + 1, 1, &mut topics, &mut values)?;
        documents += 1;
    }
    let topics = topics.ok_or(ReadError::Empty)?;
    Ok(Array2::from_shape_vec((documents, topics), values)?)
}

/// Reads a corpus with one document per line. Tokens are separated by single
/// spaces, empty tokens and empty lines are dropped. The n-th returned document is
/// the n-th non empty line, not necessarily line n.
pub fn read_corpus(reader: impl BufRead) -> io::Result<Vec<Vec<String>>> {
    let mut documents = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let tokens = line
            .trim_end_matches('\r')
            .split(' ')
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect_vec();
        if !tokens.is_empty() {
            documents.push(tokens);
        }
    }
    log::debug!("Read {} documents.", documents.len());
    Ok(documents)
}
