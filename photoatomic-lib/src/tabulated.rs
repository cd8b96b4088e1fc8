use photoatomic_data::TabulatedRecord;

use crate::error::{PhotonError, Result};
use crate::interp::lower_bound_index;

/// ENDF interpolation laws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    Histogram,
    LinLin,
    LinLog,
    LogLin,
    LogLog,
}

impl Interpolation {
    pub fn from_endf(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Histogram),
            2 => Some(Self::LinLin),
            3 => Some(Self::LinLog),
            4 => Some(Self::LogLin),
            5 => Some(Self::LogLog),
            _ => None,
        }
    }
}

/// Piecewise function of one variable given by tabulated points.
#[derive(Debug, Clone, PartialEq)]
pub struct Tabulated1D {
    x: Vec<f64>,
    y: Vec<f64>,
    breakpoints: Vec<usize>,
    interpolation: Vec<Interpolation>,
}

impl Tabulated1D {
    /// Single lin-lin region.
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        Self::with_regions(x, y, Vec::new(), Vec::new())
    }

    pub fn with_regions(
        x: Vec<f64>,
        y: Vec<f64>,
        breakpoints: Vec<usize>,
        interpolation: Vec<Interpolation>,
    ) -> Result<Self> {
        if x.len() != y.len() {
            return Err(PhotonError::DataError(format!(
                "tabulated function has {} abscissae but {} ordinates",
                x.len(),
                y.len()
            )));
        }
        if x.len() < 2 {
            return Err(PhotonError::DataError(
                "tabulated function needs at least two points".to_string(),
            ));
        }
        if x.windows(2).any(|w| w[1] < w[0]) {
            return Err(PhotonError::DataError(
                "tabulated abscissae must be non-decreasing".to_string(),
            ));
        }
        if breakpoints.len() != interpolation.len() {
            return Err(PhotonError::DataError(
                "tabulated breakpoints and interpolation laws differ in length".to_string(),
            ));
        }
        Ok(Tabulated1D {
            x,
            y,
            breakpoints,
            interpolation,
        })
    }

    pub fn from_record(record: &TabulatedRecord) -> Result<Self> {
        let interpolation = record
            .interpolation
            .iter()
            .map(|&code| {
                Interpolation::from_endf(code).ok_or_else(|| {
                    PhotonError::DataError(format!("unknown interpolation code {code}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::with_regions(
            record.x.clone(),
            record.y.clone(),
            record.breakpoints.iter().map(|&b| b as usize).collect(),
            interpolation,
        )
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    fn law(&self, interval: usize) -> Interpolation {
        self.breakpoints
            .iter()
            .zip(&self.interpolation)
            .find(|(nbt, _)| interval + 1 < **nbt)
            .or_else(|| self.breakpoints.iter().zip(&self.interpolation).last())
            .map_or(Interpolation::LinLin, |(_, &law)| law)
    }

    /// Evaluate the function. Outside the tabulated range the boundary value
    /// is returned.
    pub fn evaluate(&self, x: f64) -> f64 {
        let n = self.x.len();
        if x <= self.x[0] {
            return self.y[0];
        }
        if x >= self.x[n - 1] {
            return self.y[n - 1];
        }

        let i = lower_bound_index(&self.x, x);
        let (x0, x1) = (self.x[i], self.x[i + 1]);
        let (y0, y1) = (self.y[i], self.y[i + 1]);
        if x1 == x0 {
            return y1;
        }

        match self.law(i) {
            Interpolation::Histogram => y0,
            Interpolation::LinLin => y0 + (x - x0) / (x1 - x0) * (y1 - y0),
            Interpolation::LinLog => y0 + (x / x0).ln() / (x1 / x0).ln() * (y1 - y0),
            Interpolation::LogLin => y0 * ((x - x0) / (x1 - x0) * (y1 / y0).ln()).exp(),
            Interpolation::LogLog => {
                y0 * ((x / x0).ln() / (x1 / x0).ln() * (y1 / y0).ln()).exp()
            }
        }
    }
}
