#![no_std]

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// A complete photon interaction library, as written by the generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotonLibraryRecord {
    pub version: Vec<VersionRecord>,
    pub shared: SharedGridsRecord,
    pub elements: Vec<ElementRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionRecord {
    pub tag: String,
    pub date: String,
    pub notes: String,
}

/// Grids shared by every element in a library.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SharedGridsRecord {
    /// Compton profile projected-momentum grid (atomic units).
    pub compton_profile_pz: Vec<f64>,
    /// Incident electron kinetic energies for bremsstrahlung tables (eV).
    pub ttb_electron_energy: Vec<f64>,
    /// Reduced photon energies W/T for bremsstrahlung tables.
    pub ttb_photon_fraction: Vec<f64>,
}

/// Photon interaction data for one element. Cross sections are in barns and
/// energies in eV.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementRecord {
    pub atomic_number: u16,
    pub symbol: String,
    /// Lower-case element name, e.g. "copper"
    #[serde(default)]
    pub name: String,
    pub molar_mass: f64,
    pub energy: Vec<f64>,
    pub coherent: CoherentRecord,
    pub incoherent: IncoherentRecord,
    pub photoelectric: Vec<f64>,
    pub pair_production_electron: Vec<f64>,
    #[serde(default)]
    pub pair_production_nuclear: Option<Vec<f64>>,
    pub subshells: Vec<SubshellRecord>,
    pub compton_profiles: ComptonProfileRecord,
    #[serde(default)]
    pub stopping_powers: Option<StoppingPowerRecord>,
    #[serde(default)]
    pub bremsstrahlung: Option<BremsstrahlungRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoherentRecord {
    pub xs: Vec<f64>,
    pub integrated_form_factor: TabulatedRecord,
    #[serde(default)]
    pub anomalous_real: Option<TabulatedRecord>,
    #[serde(default)]
    pub anomalous_imag: Option<TabulatedRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncoherentRecord {
    pub xs: Vec<f64>,
    pub scattering_factor: TabulatedRecord,
}

/// ENDF-style tabulated function: `breakpoints[i]` is the 1-based index of
/// the last point of region `i`, `interpolation[i]` its ENDF interpolation
/// code. Empty breakpoints mean a single lin-lin region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabulatedRecord {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    #[serde(default)]
    pub breakpoints: Vec<u32>,
    #[serde(default)]
    pub interpolation: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubshellRecord {
    /// Subshell label, e.g. "K", "L1", "M3".
    pub designator: String,
    pub binding_energy: f64,
    pub num_electrons: f64,
    pub threshold_idx: u32,
    pub xs: Vec<f64>,
    #[serde(default)]
    pub transitions: Vec<TransitionRecord>,
}

/// One relaxation channel of a vacancy. Subshells are given as ENDF
/// designator codes (K = 1, L1 = 2, ...); a `secondary` of 0 is a radiative
/// transition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub primary: u8,
    pub secondary: u8,
    pub energy: f64,
    pub probability: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComptonProfileRecord {
    pub num_electrons: Vec<f64>,
    pub binding_energy: Vec<f64>,
    /// Profiles J(p_z): one row per shell, one column per momentum point.
    pub profiles: Table2Record,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoppingPowerRecord {
    pub mean_excitation_energy: f64,
    /// Mass collision stopping power on the shared electron grid (eV cm²/g).
    pub collision: Vec<f64>,
    /// Mass radiative stopping power on the shared electron grid (eV cm²/g).
    pub radiative: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BremsstrahlungRecord {
    /// Scaled DCS (mb): one row per electron energy, one column per reduced
    /// photon energy.
    pub dcs: Table2Record,
}

/// Row-major dense two-dimensional table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table2Record {
    pub rows: u32,
    pub cols: u32,
    pub values: Vec<f64>,
}
