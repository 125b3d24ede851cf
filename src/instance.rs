//! Module for parsing and representing QAP instances.
//!
//! This module handles the QAPLIB plain-text format (problem size followed by
//! the flow and distance matrices) and provides deterministic random instance
//! generation for experiments and tests.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Square matrix of non-negative integers addressed by (row, col).
///
/// Storage is row-major; all access goes through the 2D accessor so call
/// sites never do flattening arithmetic themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matrix {
    n: usize,
    data: Vec<i64>,
}

impl Matrix {
    pub fn zeros(n: usize) -> Self {
        Matrix {
            n,
            data: vec![0; n * n],
        }
    }

    /// Build a matrix from rows, validating shape and sign.
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Result<Self, String> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(format!(
                    "matrix is not square: row {} has {} entries, expected {}",
                    i,
                    row.len(),
                    n
                ));
            }
            for &value in row {
                if value < 0 {
                    return Err(format!("matrix entries must be non-negative, found {}", value));
                }
                data.push(value);
            }
        }
        Ok(Matrix { n, data })
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// Value at (row, col).
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> i64 {
        self.data[row * self.n + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: i64) {
        self.data[row * self.n + col] = value;
    }

    pub fn is_symmetric(&self) -> bool {
        for i in 0..self.n {
            for j in (i + 1)..self.n {
                if self.at(i, j) != self.at(j, i) {
                    return false;
                }
            }
        }
        true
    }

    pub fn max_value(&self) -> i64 {
        self.data.iter().copied().max().unwrap_or(0)
    }

    /// Mean over off-diagonal entries.
    pub fn mean_off_diagonal(&self) -> f64 {
        if self.n < 2 {
            return 0.0;
        }
        let sum: i64 = (0..self.n)
            .flat_map(|i| (0..self.n).map(move |j| (i, j)))
            .filter(|&(i, j)| i != j)
            .map(|(i, j)| self.at(i, j))
            .sum();
        sum as f64 / (self.n * self.n - self.n) as f64
    }
}

/// Represents a complete QAP instance.
///
/// The objective of an assignment `p` (facility -> location) is
/// `sum over i, j of flow(i, j) * distance(p[i], p[j])`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QAPInstance {
    /// Name of the instance
    pub name: String,
    /// Comment/description
    pub comment: String,
    /// Number of facilities (= number of locations)
    pub n: usize,
    /// Flow between facility pairs
    pub flow: Matrix,
    /// Distance between location pairs
    pub distance: Matrix,
}

impl QAPInstance {
    /// Assemble an instance from its matrices, failing fast on bad shapes.
    pub fn new(name: &str, flow: Matrix, distance: Matrix) -> Result<Self, String> {
        let n = flow.n();
        if n < 2 {
            return Err(format!("instance needs n >= 2, got {}", n));
        }
        if distance.n() != n {
            return Err(format!(
                "flow is {0}x{0} but distance is {1}x{1}",
                n,
                distance.n()
            ));
        }
        Ok(QAPInstance {
            name: name.to_string(),
            comment: String::new(),
            n,
            flow,
            distance,
        })
    }

    /// Parse a QAP instance from a QAPLIB format file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let text = fs::read_to_string(&path).map_err(|e| format!("Cannot open file: {}", e))?;
        let name = path
            .as_ref()
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "unnamed".to_string());
        Self::from_qaplib_str(&name, &text)
    }

    /// Parse the QAPLIB plain-text layout: n, then the n x n flow matrix,
    /// then the n x n distance matrix. Whitespace and line breaks between
    /// numbers are not significant.
    pub fn from_qaplib_str(name: &str, text: &str) -> Result<Self, String> {
        let mut tokens = text.split_whitespace();

        let n: usize = tokens
            .next()
            .ok_or("empty instance file")?
            .parse()
            .map_err(|_| "Invalid problem size".to_string())?;
        if n < 2 {
            return Err(format!("instance needs n >= 2, got {}", n));
        }

        let mut read_matrix = |label: &str| -> Result<Matrix, String> {
            let mut rows = Vec::with_capacity(n);
            for i in 0..n {
                let mut row = Vec::with_capacity(n);
                for j in 0..n {
                    let token = tokens.next().ok_or_else(|| {
                        format!("{} matrix truncated at entry ({}, {})", label, i, j)
                    })?;
                    let value: i64 = token
                        .parse()
                        .map_err(|_| format!("Invalid {} entry '{}'", label, token))?;
                    row.push(value);
                }
                rows.push(row);
            }
            Matrix::from_rows(rows)
        };

        let flow = read_matrix("flow")?;
        let distance = read_matrix("distance")?;

        QAPInstance::new(name, flow, distance)
    }

    /// Render the instance in the QAPLIB plain-text layout.
    pub fn to_qaplib_string(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.n);
        for matrix in [&self.flow, &self.distance] {
            let _ = writeln!(out);
            for i in 0..self.n {
                let row: Vec<String> = (0..self.n).map(|j| matrix.at(i, j).to_string()).collect();
                let _ = writeln!(out, "{}", row.join(" "));
            }
        }
        out
    }

    /// Save the instance to a QAPLIB format file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        fs::write(path, self.to_qaplib_string())
    }

    /// Generate a random instance with entries in [0, max_value].
    ///
    /// Diagonals are zero and both matrices are mirrored when `symmetric`
    /// is set, matching the classical QAPLIB conventions. Deterministic via
    /// seed.
    pub fn random(
        name: &str,
        n: usize,
        max_value: i64,
        symmetric: bool,
        seed: u64,
    ) -> Result<Self, String> {
        if n < 2 {
            return Err(format!("instance needs n >= 2, got {}", n));
        }
        if max_value < 1 {
            return Err(format!("max_value must be >= 1, got {}", max_value));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let fill = |rng: &mut ChaCha8Rng| {
            let mut matrix = Matrix::zeros(n);
            for i in 0..n {
                for j in 0..n {
                    if i == j {
                        continue;
                    }
                    if symmetric && j < i {
                        let mirrored = matrix.at(j, i);
                        matrix.set(i, j, mirrored);
                    } else {
                        matrix.set(i, j, rng.gen_range(0..=max_value));
                    }
                }
            }
            matrix
        };

        let flow = fill(&mut rng);
        let distance = fill(&mut rng);

        let mut instance = QAPInstance::new(name, flow, distance)?;
        instance.comment = format!(
            "random instance (n={}, max={}, symmetric={}, seed={})",
            n, max_value, symmetric, seed
        );
        Ok(instance)
    }

    /// Objective value of an assignment: `permutation[f]` is the location of
    /// facility `f`. The sum runs over all ordered facility pairs.
    pub fn evaluate(&self, permutation: &[usize]) -> i64 {
        let mut cost = 0i64;
        for i in 0..self.n {
            for j in 0..self.n {
                cost += self.flow.at(i, j) * self.distance.at(permutation[i], permutation[j]);
            }
        }
        cost
    }

    /// Get statistics about the instance.
    pub fn statistics(&self) -> InstanceStatistics {
        InstanceStatistics {
            name: self.name.clone(),
            n: self.n,
            avg_flow: self.flow.mean_off_diagonal(),
            max_flow: self.flow.max_value(),
            avg_distance: self.distance.mean_off_diagonal(),
            max_distance: self.distance.max_value(),
            flow_symmetric: self.flow.is_symmetric(),
            distance_symmetric: self.distance.is_symmetric(),
        }
    }
}

/// Statistics about a QAP instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceStatistics {
    pub name: String,
    pub n: usize,
    pub avg_flow: f64,
    pub max_flow: i64,
    pub avg_distance: f64,
    pub max_distance: i64,
    pub flow_symmetric: bool,
    pub distance_symmetric: bool,
}

impl std::fmt::Display for InstanceStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Instance: {}", self.name)?;
        writeln!(f, "  Size: {} facilities / locations", self.n)?;
        writeln!(
            f,
            "  Flow: avg {:.2}, max {} (symmetric: {})",
            self.avg_flow, self.max_flow, self.flow_symmetric
        )?;
        writeln!(
            f,
            "  Distance: avg {:.2}, max {} (symmetric: {})",
            self.avg_distance, self.max_distance, self.distance_symmetric
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_accessor() {
        let matrix = Matrix::from_rows(vec![vec![0, 1, 2], vec![3, 0, 5], vec![6, 7, 0]]).unwrap();
        assert_eq!(matrix.n(), 3);
        assert_eq!(matrix.at(0, 2), 2);
        assert_eq!(matrix.at(2, 1), 7);
        assert!(!matrix.is_symmetric());
    }

    #[test]
    fn test_matrix_rejects_ragged_rows() {
        let result = Matrix::from_rows(vec![vec![0, 1], vec![2]]);
        assert!(result.is_err());
    }

    #[test]
    fn test_matrix_rejects_negative_entries() {
        let result = Matrix::from_rows(vec![vec![0, -1], vec![1, 0]]);
        assert!(result.is_err());
    }

    #[test]
    fn test_qaplib_parsing() {
        let text = "3\n\n0 1 2\n1 0 3\n2 3 0\n\n0 4 5\n4 0 6\n5 6 0\n";
        let instance = QAPInstance::from_qaplib_str("toy", text).unwrap();

        assert_eq!(instance.n, 3);
        assert_eq!(instance.flow.at(1, 2), 3);
        assert_eq!(instance.distance.at(0, 2), 5);
    }

    #[test]
    fn test_qaplib_parsing_rejects_truncated_input() {
        let text = "3\n0 1 2\n1 0 3\n";
        assert!(QAPInstance::from_qaplib_str("bad", text).is_err());
    }

    #[test]
    fn test_qaplib_round_trip() {
        let instance = QAPInstance::random("rt", 5, 30, true, 9).unwrap();
        let text = instance.to_qaplib_string();
        let parsed = QAPInstance::from_qaplib_str("rt", &text).unwrap();

        assert_eq!(parsed.flow, instance.flow);
        assert_eq!(parsed.distance, instance.distance);
    }

    #[test]
    fn test_random_instance_is_deterministic() {
        let a = QAPInstance::random("a", 6, 50, false, 123).unwrap();
        let b = QAPInstance::random("b", 6, 50, false, 123).unwrap();
        assert_eq!(a.flow, b.flow);
        assert_eq!(a.distance, b.distance);
    }

    #[test]
    fn test_random_symmetric_instance_has_zero_diagonal() {
        let instance = QAPInstance::random("sym", 7, 40, true, 5).unwrap();
        assert!(instance.flow.is_symmetric());
        assert!(instance.distance.is_symmetric());
        for i in 0..instance.n {
            assert_eq!(instance.flow.at(i, i), 0);
            assert_eq!(instance.distance.at(i, i), 0);
        }
    }

    #[test]
    fn test_evaluate_small_instance() {
        let flow = Matrix::from_rows(vec![vec![0, 2], vec![2, 0]]).unwrap();
        let distance = Matrix::from_rows(vec![vec![0, 3], vec![3, 0]]).unwrap();
        let instance = QAPInstance::new("tiny", flow, distance).unwrap();

        // Both assignments score 2*3 in each ordered direction.
        assert_eq!(instance.evaluate(&[0, 1]), 12);
        assert_eq!(instance.evaluate(&[1, 0]), 12);
    }

    #[test]
    fn test_instance_rejects_mismatched_matrices() {
        let flow = Matrix::zeros(3);
        let distance = Matrix::zeros(4);
        assert!(QAPInstance::new("bad", flow, distance).is_err());
    }

    #[test]
    fn test_instance_rejects_degenerate_size() {
        let flow = Matrix::zeros(1);
        let distance = Matrix::zeros(1);
        assert!(QAPInstance::new("bad", flow, distance).is_err());
    }
}
