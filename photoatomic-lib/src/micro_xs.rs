use crate::element::PhotonInteraction;
use crate::interp::{exp_interp, upper_bound_index};

/// Interpolated microscopic cross sections (barns) of one element at one
/// energy.
///
/// Values are only meaningful for the element and energy they were computed
/// for; [`ElementMicroXS::evaluate`] recomputes whenever either changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementMicroXS {
    /// Atomic number of the element the cache holds, `None` before first use
    pub element: Option<u32>,
    pub index_grid: usize,
    pub interp_factor: f64,
    /// Energy of the last evaluation (eV)
    pub last_e: f64,
    pub total: f64,
    pub coherent: f64,
    pub incoherent: f64,
    pub photoelectric: f64,
    pub pair_production: f64,
}

impl Default for ElementMicroXS {
    fn default() -> Self {
        ElementMicroXS {
            element: None,
            index_grid: 0,
            interp_factor: 0.0,
            last_e: 0.0,
            total: 0.0,
            coherent: 0.0,
            incoherent: 0.0,
            photoelectric: 0.0,
            pair_production: 0.0,
        }
    }
}

impl ElementMicroXS {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the cache already holds `element` at exactly `energy`.
    pub fn is_current(&self, element: &PhotonInteraction, energy: f64) -> bool {
        self.element == Some(element.z()) && self.last_e.to_bits() == energy.to_bits()
    }

    /// Bring the cache up to date for `element` at `energy`. A call for the
    /// element and energy already cached leaves every value untouched.
    pub fn evaluate(&mut self, element: &PhotonInteraction, energy: f64) {
        if !self.is_current(element, energy) {
            self.recompute(element, energy);
        }
    }

    /// Recompute every channel. Energies outside the grid are clamped to the
    /// nearest grid end.
    pub fn recompute(&mut self, element: &PhotonInteraction, energy: f64) {
        let log_grid = element.log_energy();
        let n = log_grid.len();
        let log_e = if energy > 0.0 {
            energy.ln().clamp(log_grid[0], log_grid[n - 1])
        } else {
            log_grid[0]
        };

        let i = upper_bound_index(log_grid, log_e);
        let f = (log_e - log_grid[i]) / (log_grid[i + 1] - log_grid[i]);

        self.coherent = exp_interp(element.coherent(), i, f);
        self.incoherent = exp_interp(element.incoherent(), i, f);
        self.photoelectric = element
            .shells()
            .iter()
            .filter(|shell| i >= shell.threshold)
            .map(|shell| exp_interp(&shell.cross_section, i - shell.threshold, f))
            .sum();
        self.pair_production = exp_interp(element.pair_production_total(), i, f);
        self.total = self.coherent + self.incoherent + self.photoelectric + self.pair_production;

        self.index_grid = i;
        self.interp_factor = f;
        self.last_e = energy;
        self.element = Some(element.z());
    }

    /// Photoionization cross section of one shell at the cached position.
    pub fn shell_photoelectric(&self, element: &PhotonInteraction, shell: usize) -> f64 {
        let Some(shell) = element.shells().get(shell) else {
            return 0.0;
        };
        if self.index_grid < shell.threshold {
            return 0.0;
        }
        exp_interp(
            &shell.cross_section,
            self.index_grid - shell.threshold,
            self.interp_factor,
        )
    }
}

/// Per-thread set of micro cross-section caches, one slot per element of a
/// library, indexed like [`crate::PhotonLibrary::elements`].
#[derive(Debug, Clone, Default)]
pub struct MicroXsCache {
    slots: Vec<ElementMicroXS>,
}

impl MicroXsCache {
    pub fn new(n_elements: usize) -> Self {
        MicroXsCache {
            slots: vec![ElementMicroXS::default(); n_elements],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Cache slot `index`, brought up to date for `element` at `energy`.
    /// Slots are created on demand.
    pub fn evaluate(
        &mut self,
        index: usize,
        element: &PhotonInteraction,
        energy: f64,
    ) -> &ElementMicroXS {
        let slot = self.slot_mut(index);
        slot.evaluate(element, energy);
        slot
    }

    /// Mutable access to slot `index`, e.g. to pass to
    /// [`crate::sample_photon_reaction`]. Slots are created on demand.
    pub fn slot_mut(&mut self, index: usize) -> &mut ElementMicroXS {
        if index >= self.slots.len() {
            self.slots.resize(index + 1, ElementMicroXS::default());
        }
        &mut self.slots[index]
    }

    pub fn get(&self, index: usize) -> Option<&ElementMicroXS> {
        self.slots.get(index)
    }

    /// Forget every cached value.
    pub fn clear(&mut self) {
        self.slots.fill(ElementMicroXS::default());
    }
}
