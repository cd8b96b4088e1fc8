use photoatomic_data::SharedGridsRecord;

use crate::error::{PhotonError, Result};
use crate::interp::is_strictly_increasing;

/// Grids shared read-only by every element of a library.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SharedGrids {
    /// Projected electron momentum for Compton profiles (atomic units)
    pub compton_profile_pz: Vec<f64>,
    /// Incident electron kinetic energy for bremsstrahlung tables (eV)
    pub ttb_e_grid: Vec<f64>,
    /// Reduced photon energy W/T for the bremsstrahlung DCS
    pub ttb_k_grid: Vec<f64>,
}

impl SharedGrids {
    pub fn from_record(record: &SharedGridsRecord) -> Result<Self> {
        let grids = SharedGrids {
            compton_profile_pz: record.compton_profile_pz.clone(),
            ttb_e_grid: record.ttb_electron_energy.clone(),
            ttb_k_grid: record.ttb_photon_fraction.clone(),
        };
        grids.validate()?;
        Ok(grids)
    }

    /// Empty grids are allowed (the data they serve is then unavailable);
    /// non-empty grids must hold two or more strictly increasing points.
    pub fn validate(&self) -> Result<()> {
        for (name, grid) in [
            ("compton_profile_pz", &self.compton_profile_pz),
            ("ttb_electron_energy", &self.ttb_e_grid),
            ("ttb_photon_fraction", &self.ttb_k_grid),
        ] {
            if grid.is_empty() {
                continue;
            }
            if grid.len() < 2 || !is_strictly_increasing(grid) {
                return Err(PhotonError::InvalidGrid {
                    element: "shared".to_string(),
                    dataset: name.to_string(),
                    reason: "grid must hold at least two strictly increasing points".to_string(),
                });
            }
        }
        if self.ttb_e_grid.first().is_some_and(|&e| e <= 0.0) {
            return Err(PhotonError::InvalidGrid {
                element: "shared".to_string(),
                dataset: "ttb_electron_energy".to_string(),
                reason: "energies must be positive".to_string(),
            });
        }
        Ok(())
    }
}
