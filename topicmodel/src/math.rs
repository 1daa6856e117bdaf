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


use ndarray::{Array1, Array2, ArrayBase, Axis, DataMut, Ix1};
use rand::distr::Open01;
use rand::Rng;
use crate::errors::{Degeneracy, Location, PlsaError, PlsaResult};
use crate::model::Probability;

/// Divides every entry by the sum of `values`.
/// A sum that is not strictly positive and finite can not be normalized.
pub(crate) fn normalize_in_place<S>(values: &mut ArrayBase<S, Ix1>, vector: &'static str, location: Location) -> PlsaResult<()>
where
    S: DataMut<Elem=Probability>
{
    let sum = values.sum();
    if !(sum.is_finite() && sum > 0.0) {
        return Err(PlsaError::degenerated(location, Degeneracy::Sum { vector, sum }));
    }
    values.mapv_inplace(|value| value / sum);
    Ok(())
}

/// Normalizes every row of `matrix`, a row is identified by its topic.
pub(crate) fn normalize_rows(matrix: &mut Array2<Probability>, vector: &'static str) -> PlsaResult<()> {
    for (topic_id, mut row) in matrix.axis_iter_mut(Axis(0)).enumerate() {
        normalize_in_place(&mut row, vector, Location::Topic(topic_id))?;
    }
    Ok(())
}

/// Draws `len` independent values from the open interval (0, 1).
pub(crate) fn draw_open_unit<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Array1<Probability> {
    Array1::from_shape_fn(len, |_| rng.sample::<f64, _>(Open01))
}

/// Draws a `rows` x `columns` matrix of independent values from the open interval (0, 1).
pub(crate) fn draw_open_unit_matrix<R: Rng + ?Sized>(rng: &mut R, rows: usize, columns: usize) -> Array2<Probability> {
    Array2::from_shape_fn((rows, columns), |_| rng.sample::<f64, _>(Open01))
}

/// Draws a random distribution with `len` entries.
pub(crate) fn draw_distribution<R: Rng + ?Sized>(rng: &mut R, len: usize, vector: &'static str, location: Location) -> PlsaResult<Array1<Probability>> {
    let mut drawn = draw_open_unit(rng, len);
    normalize_in_place(&mut drawn, vector, location)?;
    Ok(drawn)
}
