use std::f64::consts::PI;

use rand::Rng;

use crate::constants::{
    CM2_PER_BARN, INVERSE_FINE_STRUCTURE, MASS_ELECTRON_EV, MOMENTUM_PER_ALPHA, R_ELECTRON_CM,
};
use crate::element::PhotonInteraction;
use crate::error::{PhotonError, Result};
use crate::interp::lower_bound_index;

/// Outcome of an incoherent scattering event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComptonSample {
    /// Outgoing photon energy in electron rest-mass units
    pub alpha_out: f64,
    /// Cosine of the scattering angle
    pub mu: f64,
    /// Compton-profile shell of the struck electron, when Doppler
    /// broadening picked one
    pub shell: Option<usize>,
}

/// Klein–Nishina differential cross section dσ/dμ per electron (barns).
pub fn klein_nishina_dcs(alpha: f64, mu: f64) -> f64 {
    let mu = mu.clamp(-1.0, 1.0);
    let ratio = 1.0 / (1.0 + alpha * (1.0 - mu));
    let r_e2 = R_ELECTRON_CM * R_ELECTRON_CM / CM2_PER_BARN;
    PI * r_e2 * ratio * ratio * (ratio + 1.0 / ratio - 1.0 + mu * mu)
}

/// Integrated Klein–Nishina cross section per electron and the largest
/// value of [`klein_nishina_dcs`] over μ in [-1, 1], both in barns.
pub fn klein_nishina(alpha: f64) -> (f64, f64) {
    let r_e2 = R_ELECTRON_CM * R_ELECTRON_CM / CM2_PER_BARN;
    let sigma = if alpha < 1.0e-4 {
        // Series about the Thomson limit; the closed form cancels badly here
        8.0 / 3.0 * PI * r_e2 * (1.0 - 2.0 * alpha + 5.2 * alpha * alpha)
    } else {
        let beta = 1.0 + 2.0 * alpha;
        let log_beta = beta.ln();
        2.0 * PI
            * r_e2
            * ((1.0 + alpha) / (alpha * alpha)
                * (2.0 * (1.0 + alpha) / beta - log_beta / alpha)
                + log_beta / (2.0 * alpha)
                - (1.0 + 3.0 * alpha) / (beta * beta))
    };
    let dcs_max = klein_nishina_dcs(alpha, 1.0).max(klein_nishina_dcs(alpha, -1.0));
    (sigma, dcs_max)
}

/// Sample `(alpha_out, mu)` from the Klein–Nishina distribution: Kahn's
/// rejection method below alpha = 3, Koblinger's direct method above.
pub fn sample_klein_nishina(
    alpha: f64,
    rng: &mut impl Rng,
    max_iterations: u32,
) -> Result<(f64, f64)> {
    let beta = 1.0 + 2.0 * alpha;
    if alpha < 3.0 {
        let t = beta / (beta + 8.0);
        for _ in 0..max_iterations {
            if rng.random::<f64>() < t {
                let r = 2.0 * rng.random::<f64>();
                let x = 1.0 + alpha * r;
                if rng.random::<f64>() < 4.0 / x * (1.0 - 1.0 / x) {
                    return Ok((alpha / x, 1.0 - r));
                }
            } else {
                let x = beta / (1.0 + 2.0 * alpha * rng.random::<f64>());
                let mu = 1.0 + (1.0 - x) / alpha;
                if rng.random::<f64>() < 0.5 * (mu * mu + 1.0 / x) {
                    return Ok((alpha / x, mu.clamp(-1.0, 1.0)));
                }
            }
        }
        Err(PhotonError::SamplingFailure {
            kernel: "klein-nishina",
            iterations: max_iterations,
        })
    } else {
        let gamma = 1.0 - beta.powi(-2);
        let s = rng.random::<f64>()
            * (4.0 / alpha + 0.5 * gamma + (1.0 - (1.0 + beta) / (alpha * alpha)) * beta.ln());
        let alpha_out = if s <= 2.0 / alpha {
            alpha / (1.0 + 2.0 * alpha * rng.random::<f64>())
        } else if s <= 4.0 / alpha {
            alpha * (1.0 + 2.0 * alpha * rng.random::<f64>()) / beta
        } else if s <= 4.0 / alpha + 0.5 * gamma {
            alpha * (1.0 - gamma * rng.random::<f64>()).sqrt()
        } else {
            alpha / beta.powf(rng.random::<f64>())
        };
        let mu = 1.0 + 1.0 / alpha - 1.0 / alpha_out;
        Ok((alpha_out, mu.clamp(-1.0, 1.0)))
    }
}

impl PhotonInteraction {
    /// Sample an incoherent scattering event for a photon of reduced energy
    /// `alpha`.
    ///
    /// Klein–Nishina candidates are accepted with probability S(x)/S(x_max)
    /// where S is the incoherent scattering function. With `doppler` set, the
    /// outgoing energy is then broadened by the momentum of a bound electron.
    pub fn compton_scatter(
        &self,
        alpha: f64,
        doppler: bool,
        rng: &mut impl Rng,
        max_iterations: u32,
    ) -> Result<ComptonSample> {
        let form_factor = self.incoherent_form_factor();
        let form_factor_xmax = form_factor.evaluate(MOMENTUM_PER_ALPHA * alpha);

        for _ in 0..max_iterations {
            let (alpha_out, mu) = sample_klein_nishina(alpha, rng, max_iterations)?;

            let x = MOMENTUM_PER_ALPHA * alpha * (0.5 * (1.0 - mu)).sqrt();
            let accept = if form_factor_xmax > 0.0 {
                rng.random::<f64>() < form_factor.evaluate(x) / form_factor_xmax
            } else {
                true
            };
            if !accept {
                continue;
            }

            if doppler {
                let (e_out, shell) = self.compton_doppler(alpha, mu, rng, max_iterations)?;
                return Ok(ComptonSample {
                    alpha_out: e_out / MASS_ELECTRON_EV,
                    mu,
                    shell: Some(shell),
                });
            }
            return Ok(ComptonSample {
                alpha_out,
                mu,
                shell: None,
            });
        }
        Err(PhotonError::SamplingFailure {
            kernel: "compton",
            iterations: max_iterations,
        })
    }

    /// Doppler-broadened outgoing photon energy (eV) for a photon scattered
    /// through `mu`, and the Compton-profile shell of the struck electron.
    fn compton_doppler(
        &self,
        alpha: f64,
        mu: f64,
        rng: &mut impl Rng,
        max_iterations: u32,
    ) -> Result<(f64, usize)> {
        let profiles = self.compton_profiles();
        let pz_grid = &self.grids().compton_profile_pz;
        let n = pz_grid.len();
        let e = alpha * MASS_ELECTRON_EV;
        let free_electron = alpha / (1.0 + alpha * (1.0 - mu)) * MASS_ELECTRON_EV;

        for _ in 0..max_iterations {
            let shell = sample_index(&profiles.electron_pdf, rng.random::<f64>());
            let e_b = profiles.binding_energy[shell];
            if e < e_b {
                return Ok((free_electron, shell));
            }

            let pz_max = -INVERSE_FINE_STRUCTURE * (e_b - (e - e_b) * alpha * (1.0 - mu))
                / (2.0 * e * (e - e_b) * (1.0 - mu) + e_b * e_b).sqrt();
            if !(pz_max >= 0.0) {
                return Ok((free_electron, shell));
            }

            let pdf = profiles.pdf.row(shell);
            let cdf = profiles.cdf.row(shell);

            // CDF at pz_max, with the profile linear between grid points
            let c_max = if pz_max > pz_grid[n - 1] {
                cdf[n - 1]
            } else {
                let i = lower_bound_index(pz_grid, pz_max);
                let (pz_l, pz_r) = (pz_grid[i], pz_grid[i + 1]);
                let (p_l, p_r, c_l) = (pdf[i], pdf[i + 1], cdf[i]);
                if pz_l == pz_r {
                    c_l
                } else if p_l == p_r {
                    c_l + (pz_max - pz_l) * p_l
                } else {
                    let m = (p_l - p_r) / (pz_l - pz_r);
                    c_l + ((m * (pz_max - pz_l) + p_l).powi(2) - p_l * p_l) / (2.0 * m)
                }
            };

            // Invert the bounded CDF for the projected momentum
            let c = rng.random::<f64>() * c_max;
            let i = lower_bound_index(cdf, c);
            let (pz_l, pz_r) = (pz_grid[i], pz_grid[i + 1]);
            let (p_l, p_r, c_l) = (pdf[i], pdf[i + 1], cdf[i]);
            let pz = if pz_l == pz_r {
                pz_l
            } else if p_l == p_r {
                if p_l > 0.0 { pz_l + (c - c_l) / p_l } else { pz_l }
            } else {
                let m = (p_l - p_r) / (pz_l - pz_r);
                pz_l + ((p_l * p_l + 2.0 * m * (c - c_l)).max(0.0).sqrt() - p_l) / m
            };

            // Outgoing energy from the relativistic Doppler relation, a
            // quadratic in E'
            let momentum_sq = (pz / INVERSE_FINE_STRUCTURE).powi(2);
            let f = 1.0 + alpha * (1.0 - mu);
            let a = momentum_sq - f * f;
            let b = 2.0 * e * (f - momentum_sq * mu);
            let c = e * e * (momentum_sq - 1.0);

            let quad = b * b - 4.0 * a * c;
            if quad < 0.0 || a == 0.0 {
                continue;
            }
            let quad = quad.sqrt();
            let e_out1 = -(b + quad) / (2.0 * a);
            let e_out2 = -(b - quad) / (2.0 * a);

            let e_out = match (e_out1 > 0.0, e_out2 > 0.0) {
                (true, true) => {
                    if rng.random::<f64>() < 0.5 {
                        e_out1
                    } else {
                        e_out2
                    }
                }
                (true, false) => e_out1,
                (false, true) => e_out2,
                (false, false) => continue,
            };
            if e_out < e - e_b {
                return Ok((e_out, shell));
            }
        }
        Err(PhotonError::SamplingFailure {
            kernel: "compton doppler",
            iterations: max_iterations,
        })
    }
}

/// Index `i` of a discrete distribution whose running sum first exceeds `xi`.
pub(crate) fn sample_index(pdf: &[f64], xi: f64) -> usize {
    let mut c = 0.0;
    for (i, p) in pdf.iter().enumerate() {
        c += p;
        if xi < c {
            return i;
        }
    }
    pdf.len().saturating_sub(1)
}
