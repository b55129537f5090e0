use crate::error::CoreError;
use crate::index::{ListingMatrix, SparseVector};

/// Cosine similarity. A zero-magnitude vector on either side scores 0.
pub fn cosine(a: &SparseVector, b: &SparseVector) -> f64 {
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        return 0.0;
    }
    a.dot(b) / denom
}

/// Scores `query` against every row of `matrix`, keeping row order.
pub fn cosine_all(query: &SparseVector, matrix: &ListingMatrix) -> Result<Vec<f64>, CoreError> {
    if query.dim != matrix.dim {
        return Err(CoreError::DimensionMismatch { query: query.dim, matrix: matrix.dim });
    }
    let q_norm = query.norm();
    if q_norm == 0.0 {
        return Ok(vec![0.0; matrix.len()]);
    }
    Ok(matrix
        .rows
        .iter()
        .map(|row| {
            let r_norm = row.norm();
            if r_norm == 0.0 { 0.0 } else { query.dot(row) / (q_norm * r_norm) }
        })
        .collect())
}
