use photoatomic_data::SubshellRecord;

use crate::error::{PhotonError, Result};
use crate::interp::log_or_floor;

/// Canonical ENDF subshell labels. The designator code of a subshell is its
/// position in this list plus one; code 0 means "no subshell".
pub const SUBSHELLS: [&str; 39] = [
    "K", "L1", "L2", "L3", "M1", "M2", "M3", "M4", "M5", "N1", "N2", "N3", "N4", "N5", "N6", "N7",
    "O1", "O2", "O3", "O4", "O5", "O6", "O7", "O8", "O9", "P1", "P2", "P3", "P4", "P5", "P6", "P7",
    "P8", "P9", "P10", "P11", "Q1", "Q2", "Q3",
];

/// Designator code of a subshell label, or `None` for an unknown label.
pub fn designator_code(label: &str) -> Option<u8> {
    SUBSHELLS
        .iter()
        .position(|&s| s == label)
        .map(|i| (i + 1) as u8)
}

/// Label of a designator code, or `None` for 0 and out-of-range codes.
pub fn designator_label(code: u8) -> Option<&'static str> {
    (code as usize)
        .checked_sub(1)
        .and_then(|i| SUBSHELLS.get(i))
        .copied()
}

/// One relaxation channel of a vacancy, with designators already resolved to
/// indices into the parent element's shell list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// Shell that receives the new vacancy, if any
    pub primary: Option<usize>,
    /// Shell that emits the Auger electron; `None` for fluorescence
    pub secondary: Option<usize>,
    /// Energy of the emitted particle (eV)
    pub energy: f64,
    pub probability: f64,
}

impl Transition {
    pub fn is_radiative(&self) -> bool {
        self.secondary.is_none()
    }
}

/// One atomic subshell of an element.
#[derive(Debug, Clone)]
pub struct ElectronSubshell {
    /// Position of the designator in [`SUBSHELLS`]
    pub index_subshell: usize,
    /// First energy grid index at which photoionization is possible
    pub threshold: usize,
    pub n_electrons: f64,
    /// Binding energy (eV)
    pub binding_energy: f64,
    /// ln of the photoionization cross section (barns), aligned with the
    /// element grid from `threshold` onward
    pub cross_section: Vec<f64>,
    pub(crate) transitions: Vec<Transition>,
    /// Running sum of the transition probabilities
    pub(crate) cumulative: Vec<f64>,
}

impl ElectronSubshell {
    /// Build a subshell without its transitions, which need the full shell
    /// map of the element to resolve.
    pub(crate) fn from_record(
        element: &str,
        record: &SubshellRecord,
        n_grid: usize,
    ) -> Result<Self> {
        let code = designator_code(&record.designator).ok_or_else(|| PhotonError::InvalidGrid {
            element: element.to_string(),
            dataset: format!("subshells/{}", record.designator),
            reason: "unknown subshell designator".to_string(),
        })?;
        let threshold = record.threshold_idx as usize;
        if threshold >= n_grid {
            return Err(PhotonError::InvalidGrid {
                element: element.to_string(),
                dataset: format!("subshells/{}/threshold_idx", record.designator),
                reason: format!("threshold {threshold} outside a grid of {n_grid} points"),
            });
        }
        if record.xs.len() != n_grid - threshold {
            return Err(PhotonError::LengthMismatch {
                element: element.to_string(),
                dataset: format!("subshells/{}/xs", record.designator),
                expected: n_grid - threshold,
                found: record.xs.len(),
            });
        }
        if record.xs.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(PhotonError::InvalidGrid {
                element: element.to_string(),
                dataset: format!("subshells/{}/xs", record.designator),
                reason: "negative or non-finite cross section".to_string(),
            });
        }
        if !(record.binding_energy >= 0.0) || !(record.num_electrons >= 0.0) {
            return Err(PhotonError::InvalidGrid {
                element: element.to_string(),
                dataset: format!("subshells/{}", record.designator),
                reason: "negative binding energy or electron count".to_string(),
            });
        }

        Ok(ElectronSubshell {
            index_subshell: (code - 1) as usize,
            threshold,
            n_electrons: record.num_electrons,
            binding_energy: record.binding_energy,
            cross_section: record.xs.iter().map(|&v| log_or_floor(v)).collect(),
            transitions: Vec::new(),
            cumulative: Vec::new(),
        })
    }

    pub fn designator(&self) -> u8 {
        (self.index_subshell + 1) as u8
    }

    pub fn label(&self) -> &'static str {
        SUBSHELLS[self.index_subshell]
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// A shell without transitions ends a relaxation cascade.
    pub fn is_terminal(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Transition whose cumulative probability first exceeds `c`, for `c`
    /// uniform in [0, 1).
    pub fn sample_transition(&self, c: f64) -> Option<&Transition> {
        let i = self.cumulative.partition_point(|&p| p <= c);
        self.transitions
            .get(i.min(self.transitions.len().saturating_sub(1)))
    }

    /// Install transitions after checking their probabilities. A set whose
    /// sum lies within `tolerance` of one is renormalized to sum exactly to
    /// one; returns whether that changed anything.
    pub(crate) fn set_transitions(
        &mut self,
        element: &str,
        transitions: Vec<Transition>,
        tolerance: f64,
    ) -> Result<bool> {
        if transitions.is_empty() {
            self.transitions.clear();
            self.cumulative.clear();
            return Ok(false);
        }
        let sum: f64 = transitions.iter().map(|t| t.probability).sum();
        let bad_entry = transitions
            .iter()
            .any(|t| !(t.probability >= 0.0) || !(t.energy >= 0.0));
        if bad_entry || !((sum - 1.0).abs() <= tolerance) {
            return Err(PhotonError::TransitionProbability {
                element: element.to_string(),
                shell: self.label().to_string(),
                sum,
            });
        }

        let renormalized = sum != 1.0;
        let mut running = 0.0;
        self.cumulative = transitions
            .iter()
            .map(|t| {
                running += t.probability / sum;
                running
            })
            .collect();
        if let Some(last) = self.cumulative.last_mut() {
            *last = 1.0;
        }
        self.transitions = transitions
            .into_iter()
            .map(|t| Transition {
                probability: t.probability / sum,
                ..t
            })
            .collect();
        Ok(renormalized)
    }
}
