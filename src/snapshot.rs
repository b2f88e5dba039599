use std::path::Path;

use anyhow::Context as _;

use crate::error::{SimanimError, SimanimResult};

/// One timestep's 2-D scalar field, stored row-major.
///
/// Snapshots are loaded transiently: the pipeline reads one, folds it into
/// whatever it is computing, and drops it before touching the next, so the
/// full series never has to fit in memory at once.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Snapshot {
    /// Parse the `frame<N>.txt` format: one matrix row per line, values
    /// separated by single spaces, trailing newline expected (its empty
    /// final line is discarded).
    pub fn parse(text: &str) -> SimanimResult<Self> {
        let mut data = Vec::new();
        let mut rows = 0usize;
        let mut cols: Option<usize> = None;

        let mut lines = text.split('\n').enumerate().peekable();
        while let Some((lineno, line)) = lines.next() {
            if line.is_empty() && lines.peek().is_none() {
                break;
            }
            let mut count = 0usize;
            for token in line.split(' ') {
                let v: f64 = token.trim().parse().map_err(|_| {
                    SimanimError::data(format!(
                        "matrix line {} has a non-numeric value: '{token}'",
                        lineno + 1
                    ))
                })?;
                data.push(v);
                count += 1;
            }
            match cols {
                None => cols = Some(count),
                Some(c) if c != count => {
                    return Err(SimanimError::data(format!(
                        "matrix line {} has {count} values, expected {c}",
                        lineno + 1
                    )));
                }
                Some(_) => {}
            }
            rows += 1;
        }

        let Some(cols) = cols else {
            return Err(SimanimError::data("matrix is empty"));
        };
        Ok(Self { rows, cols, data })
    }

    pub fn load(path: &Path) -> SimanimResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read snapshot file '{}'", path.display()))?;
        Self::parse(&text).map_err(|e| match e {
            SimanimError::Data(msg) => {
                SimanimError::data(format!("snapshot file '{}': {msg}", path.display()))
            }
            other => other,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    /// All elements in row-major order.
    pub fn values(&self) -> &[f64] {
        &self.data
    }
}
