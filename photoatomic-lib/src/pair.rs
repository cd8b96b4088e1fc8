use rand::Rng;

use crate::constants::{INVERSE_FINE_STRUCTURE, MASS_ELECTRON_EV};
use crate::element::PhotonInteraction;
use crate::error::{PhotonError, Result};

/// Reduced screening radius (screening radius over the electron Compton
/// wavelength) for Z = 1-99, from PENELOPE-2011.
const SCREENING_RADIUS: [f64; 99] = [
    122.81, 73.167, 69.228, 67.301, 64.696, 61.228, 57.524, 54.033, 50.787, 47.851, 46.373,
    45.401, 44.503, 43.815, 43.074, 42.321, 41.586, 40.953, 40.524, 40.256, 39.756, 39.144,
    38.462, 37.778, 37.174, 36.663, 35.986, 35.317, 34.688, 34.197, 33.786, 33.422, 33.068,
    32.740, 32.438, 32.143, 31.884, 31.622, 31.438, 31.142, 30.950, 30.758, 30.561, 30.388,
    30.209, 30.044, 29.870, 29.702, 29.545, 29.395, 29.248, 29.110, 28.974, 28.845, 28.725,
    28.608, 28.495, 28.383, 28.280, 28.178, 28.080, 27.981, 27.889, 27.799, 27.711, 27.623,
    27.541, 27.461, 27.383, 27.307, 27.232, 27.158, 27.085, 27.013, 26.943, 26.874, 26.806,
    26.740, 26.674, 26.609, 26.545, 26.482, 26.420, 26.359, 26.298, 26.238, 26.179, 26.121,
    26.063, 26.006, 25.950, 25.894, 25.839, 25.785, 25.731, 25.677, 25.624, 25.572, 25.520,
];

/// Pair production threshold in electron rest-mass units
pub const PAIR_THRESHOLD_ALPHA: f64 = 2.0;

/// Kinetic energies (eV) and direction cosines of a sampled pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairProductionSample {
    pub e_electron: f64,
    pub e_positron: f64,
    pub mu_electron: f64,
    pub mu_positron: f64,
}

/// Screening functions phi_1 and phi_2 of the PENELOPE pair production DCS,
/// less the energy-independent term `t4`.
fn screening(b: f64) -> (f64, f64) {
    let t1 = 2.0 * (1.0 + b * b).ln();
    let t2 = b * (1.0 / b).atan();
    let t3 = b * b * (4.0 - 4.0 * t2 - 3.0 * (1.0 + 1.0 / (b * b)).ln());
    (
        7.0 / 3.0 - t1 - 6.0 * t2 - t3,
        11.0 / 6.0 - t1 - 3.0 * t2 + 0.5 * t3,
    )
}

/// Cosine of a lepton direction drawn from p(μ) ∝ (1 - βμ)⁻².
fn lepton_cosine(kinetic_energy: f64, xi: f64) -> f64 {
    let beta = (kinetic_energy * (kinetic_energy + 2.0 * MASS_ELECTRON_EV)).sqrt()
        / (kinetic_energy + MASS_ELECTRON_EV);
    let rn = 2.0 * xi - 1.0;
    ((rn + beta) / (rn * beta + 1.0)).clamp(-1.0, 1.0)
}

impl PhotonInteraction {
    /// Sample electron and positron energies and directions for a photon of
    /// reduced energy `alpha`, using the screened Bethe–Heitler DCS with
    /// Coulomb and low-energy corrections.
    pub fn pair_production(
        &self,
        alpha: f64,
        rng: &mut impl Rng,
        max_iterations: u32,
    ) -> Result<PairProductionSample> {
        if !(alpha > PAIR_THRESHOLD_ALPHA) {
            return Err(PhotonError::BelowThreshold {
                alpha,
                threshold: PAIR_THRESHOLD_ALPHA,
            });
        }

        let z = self.z().clamp(1, SCREENING_RADIUS.len() as u32) as usize;
        let r = SCREENING_RADIUS[z - 1];

        // High-energy Coulomb correction
        let a = self.z() as f64 / INVERSE_FINE_STRUCTURE;
        let a2 = a * a;
        let c = a2
            * (1.0 / (1.0 + a2)
                + 0.202059
                + a2 * (-0.03693
                    + a2 * (0.00835
                        + a2 * (-0.00201 + a2 * (0.00049 + a2 * (-0.00012 + a2 * 0.00003))))));

        // Low-energy correction
        let q = (2.0 / alpha).sqrt();
        let f = q * (-0.1774 - 12.10 * a + 11.18 * a2)
            + q.powi(2) * (8.523 + 73.26 * a - 44.41 * a2)
            + q.powi(3) * (-13.52 - 121.1 * a + 96.41 * a2)
            + q.powi(4) * (8.946 + 62.05 * a - 63.41 * a2);

        // phi_1 and phi_2 peak at e = 1/2
        let t4 = 4.0 * r.ln() - 4.0 * c + f;
        let (phi1, phi2) = screening(2.0 * r / alpha);
        let phi1_max = phi1 + t4;
        let phi2_max = phi2 + t4;

        let half_width = 0.5 - 1.0 / alpha;
        let u1 = 2.0 / 3.0 * half_width.powi(2) * phi1_max;
        let u2 = phi2_max;

        let mut reduced_energy = None;
        for _ in 0..max_iterations {
            let rn = rng.random::<f64>();
            let first = rng.random::<f64>() < u1 / (u1 + u2);
            let e = if first {
                if rn >= 0.5 {
                    0.5 + half_width * (2.0 * rn - 1.0).cbrt()
                } else {
                    0.5 - half_width * (1.0 - 2.0 * rn).cbrt()
                }
            } else {
                1.0 / alpha + half_width * 2.0 * rn
            };

            let (phi1, phi2) = screening(r / (2.0 * alpha * e * (1.0 - e)));
            let accept = if first {
                rng.random::<f64>() <= (phi1 + t4) / phi1_max
            } else {
                rng.random::<f64>() <= (phi2 + t4) / phi2_max
            };
            if accept {
                reduced_energy = Some(e);
                break;
            }
        }
        let e = reduced_energy.ok_or(PhotonError::SamplingFailure {
            kernel: "pair production",
            iterations: max_iterations,
        })?;

        let e_electron = (alpha * e - 1.0) * MASS_ELECTRON_EV;
        let e_positron = (alpha * (1.0 - e) - 1.0) * MASS_ELECTRON_EV;
        let mu_electron = lepton_cosine(e_electron, rng.random::<f64>());
        let mu_positron = lepton_cosine(e_positron, rng.random::<f64>());

        Ok(PairProductionSample {
            e_electron,
            e_positron,
            mu_electron,
            mu_positron,
        })
    }
}
