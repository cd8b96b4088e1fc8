use std::ops::{Index, IndexMut};

use photoatomic_data::Table2Record;

use crate::error::{PhotonError, Result};

/// Dense row-major two-dimensional table of fixed shape.
///
/// Owners document what the axes mean; indexing is bounds checked and panics
/// on an out-of-range row or column like slice indexing does.
#[derive(Debug, Clone, PartialEq)]
pub struct Table2 {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl Table2 {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Table2 {
            rows,
            cols,
            values: vec![0.0; rows * cols],
        }
    }

    pub fn from_vec(rows: usize, cols: usize, values: Vec<f64>) -> Result<Self> {
        if values.len() != rows * cols {
            return Err(PhotonError::DataError(format!(
                "table of shape {rows}x{cols} needs {} values, got {}",
                rows * cols,
                values.len()
            )));
        }
        Ok(Table2 { rows, cols, values })
    }

    pub fn from_record(record: &Table2Record) -> Result<Self> {
        Self::from_vec(
            record.rows as usize,
            record.cols as usize,
            record.values.clone(),
        )
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.values[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn row(&self, row: usize) -> &[f64] {
        assert!(row < self.rows, "row {row} out of range for {} rows", self.rows);
        &self.values[row * self.cols..(row + 1) * self.cols]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        assert!(row < self.rows, "row {row} out of range for {} rows", self.rows);
        &mut self.values[row * self.cols..(row + 1) * self.cols]
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[inline]
    fn offset(&self, (row, col): (usize, usize)) -> usize {
        assert!(
            row < self.rows && col < self.cols,
            "index ({row}, {col}) out of range for shape {}x{}",
            self.rows,
            self.cols
        );
        row * self.cols + col
    }
}

impl Index<(usize, usize)> for Table2 {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &f64 {
        &self.values[self.offset(index)]
    }
}

impl IndexMut<(usize, usize)> for Table2 {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut f64 {
        let offset = self.offset(index);
        &mut self.values[offset]
    }
}
