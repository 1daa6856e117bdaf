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
use std::str::FromStr;
use sealed::sealed;
use thiserror::Error;

/// The place of a cell in a line based text table.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct CellPosition {
    pub line: usize,
    pub column: usize,
}

impl CellPosition {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Display for CellPosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A parse error that remembers what was parsed and where it was found.
#[derive(Debug, Error)]
#[error("{}Failed parsing of {parse_target:?}.\nCause: {source}", .position.map(|v| format!("{v}: ")).unwrap_or_default())]
pub struct ParseErrorEx<E> {
    parse_target: String,
    position: Option<CellPosition>,
    #[source]
    source: E
}

impl<E> ParseErrorEx<E> {
    pub fn new(parse_target: String, position: Option<CellPosition>, source: E) -> Self {
        Self { parse_target, position, source }
    }

    pub fn at(parse_target: &str, position: CellPosition, source: E) -> Self {
        Self::new(parse_target.to_string(), Some(position), source)
    }

    pub fn parse_target(&self) -> &str {
        &self.parse_target
    }

    pub fn position(&self) -> Option<CellPosition> {
        self.position
    }
}

pub trait FromStrEx: FromStr {
    fn from_str_ex_at(s: &str, position: CellPosition) -> Result<Self, ParseErrorEx<<Self as FromStr>::Err>>;
}

impl<T> FromStrEx for T where T: FromStr {
    fn from_str_ex_at(s: &str, position: CellPosition) -> Result<Self, ParseErrorEx<<Self as FromStr>::Err>> {
        <Self as FromStr>::from_str(s).map_err(|e| {
            ParseErrorEx::at(s, position, e)
        })
    }
}

#[sealed]
pub trait ParseEx {
    fn parse_ex_at<F: FromStr>(&self, line: usize, column: usize) -> Result<F, ParseErrorEx<F::Err>>;
}

#[sealed]
impl ParseEx for str {
    fn parse_ex_at<F: FromStr>(&self, line: usize, column: usize) -> Result<F, ParseErrorEx<F::Err>> {
        F::from_str_ex_at(self, CellPosition::new(line, column))
    }
}
