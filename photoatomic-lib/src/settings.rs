use serde::{Deserialize, Serialize};

use crate::error::{PhotonError, Result};
use crate::particle::ParticleType;

/// How electrons and positrons produced by photon interactions are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElectronTreatment {
    /// Local energy deposition
    Led,
    /// Thick-target bremsstrahlung approximation
    #[default]
    Ttb,
}

/// Energy below which a particle of each type is killed (eV).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyCutoff {
    pub photon: f64,
    pub electron: f64,
    pub positron: f64,
}

impl Default for EnergyCutoff {
    fn default() -> Self {
        EnergyCutoff {
            photon: 1000.0,
            electron: 1000.0,
            positron: 1000.0,
        }
    }
}

impl EnergyCutoff {
    pub fn for_particle(&self, kind: ParticleType) -> f64 {
        match kind {
            ParticleType::Photon => self.photon,
            ParticleType::Electron => self.electron,
            ParticleType::Positron => self.positron,
        }
    }
}

/// Run-wide photon physics options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotonSettings {
    pub electron_treatment: ElectronTreatment,
    pub energy_cutoff: EnergyCutoff,
    /// Apply Doppler broadening to incoherent scattering
    pub doppler_broadening: bool,
    /// Cap on every rejection-sampling loop
    pub max_sampling_iterations: u32,
    /// Largest accepted deviation of a subshell's transition probabilities
    /// from a sum of one
    pub transition_tolerance: f64,
}

impl Default for PhotonSettings {
    fn default() -> Self {
        PhotonSettings {
            electron_treatment: ElectronTreatment::default(),
            energy_cutoff: EnergyCutoff::default(),
            doppler_broadening: true,
            max_sampling_iterations: 10_000,
            transition_tolerance: 1.0e-4,
        }
    }
}

impl PhotonSettings {
    /// Parse settings from JSON. Missing keys take their default values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: PhotonSettings = serde_json::from_str(json)
            .map_err(|e| PhotonError::DataError(format!("invalid settings: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_sampling_iterations == 0 {
            return Err(PhotonError::DataError(
                "max_sampling_iterations must be positive".to_string(),
            ));
        }
        if !(self.transition_tolerance >= 0.0) {
            return Err(PhotonError::DataError(
                "transition_tolerance must be non-negative".to_string(),
            ));
        }
        let cutoff = self.energy_cutoff;
        if [cutoff.photon, cutoff.electron, cutoff.positron]
            .iter()
            .any(|&c| !(c >= 0.0))
        {
            return Err(PhotonError::DataError(
                "energy cutoffs must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}
