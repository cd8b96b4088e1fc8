pub mod angle;
pub mod bremsstrahlung;
pub mod compton;
pub mod constants;
pub mod db;
pub mod element;
pub mod error;
pub mod grids;
pub mod interp;
pub mod micro_xs;
pub mod pair;
pub mod particle;
pub mod physics;
pub mod rayleigh;
pub mod relaxation;
pub mod rng;
pub mod settings;
pub mod subshell;
pub mod table;
pub mod tabulated;

pub use bremsstrahlung::{Bremsstrahlung, BremsstrahlungData, thick_target_bremsstrahlung};
pub use compton::{ComptonSample, klein_nishina, klein_nishina_dcs, sample_klein_nishina};
pub use db::PhotonLibrary;
pub use element::{ComptonProfiles, PhotonInteraction, StoppingPowers};
pub use error::{PhotonError, Result};
pub use grids::SharedGrids;
pub use micro_xs::{ElementMicroXS, MicroXsCache};
pub use pair::PairProductionSample;
pub use particle::{Particle, ParticleType, SecondaryParticle};
pub use physics::{
    PhotonEvent, sample_electron_reaction, sample_photon_reaction, sample_positron_reaction,
};
pub use relaxation::RelaxationCascade;
pub use rng::FastRng;
pub use settings::{ElectronTreatment, EnergyCutoff, PhotonSettings};
pub use subshell::{ElectronSubshell, SUBSHELLS, Transition};
pub use table::Table2;
pub use tabulated::{Interpolation, Tabulated1D};
pub use photoatomic_data;
