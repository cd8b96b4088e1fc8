use crate::constants::{AVOGADRO, CM2_PER_MILLIBARN, LOG_FLOOR, MASS_ELECTRON_EV};
use crate::element::{PhotonInteraction, StoppingPowers};
use crate::error::Result;
use crate::grids::SharedGrids;
use crate::interp::{interp_one, log_or_floor, lower_bound_index};
use crate::particle::{Particle, ParticleType};
use crate::settings::PhotonSettings;
use crate::table::Table2;

/// Photon-number tables of the thick-target approximation for one charged
/// particle type.
///
/// Both tables are indexed (incident energy, photon energy) on the shared
/// electron energy grid: `pdf[(j, i)]` is the number of photons per unit
/// energy emitted at `E_i` while slowing down from `E_j`, and `cdf` its
/// integral from the bottom of the grid.
#[derive(Debug, Clone)]
pub struct BremsstrahlungData {
    pub pdf: Table2,
    pub cdf: Table2,
    /// ln of the photon number yield per incident energy
    pub yield_log: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct Bremsstrahlung {
    pub electron: BremsstrahlungData,
    pub positron: BremsstrahlungData,
}

impl Bremsstrahlung {
    pub fn for_particle(&self, kind: ParticleType) -> &BremsstrahlungData {
        match kind {
            ParticleType::Positron => &self.positron,
            _ => &self.electron,
        }
    }
}

/// Ratio of positron to electron radiative stopping power (PENELOPE).
pub fn positron_factor(energy: f64, z_sq: f64) -> f64 {
    let t = (1.0 + 1.0e6 * energy / (z_sq * MASS_ELECTRON_EV)).ln();
    let poly = t
        * (-1.2359e-1
            + t * (6.1274e-2
                + t * (-3.1516e-2
                    + t * (7.7446e-3 + t * (-1.0595e-3 + t * (7.0568e-5 + t * -1.8080e-6))))));
    1.0 - poly.exp()
}

/// Build electron and positron TTB tables for an element.
pub(crate) fn build_tables(
    z: u32,
    molar_mass: f64,
    stopping_powers: &StoppingPowers,
    dcs: &Table2,
    grids: &SharedGrids,
) -> Bremsstrahlung {
    let z_sq = (z as f64).powi(2);
    Bremsstrahlung {
        electron: build_particle_tables(z_sq, molar_mass, stopping_powers, dcs, grids, false),
        positron: build_particle_tables(z_sq, molar_mass, stopping_powers, dcs, grids, true),
    }
}

fn build_particle_tables(
    z_sq: f64,
    molar_mass: f64,
    stopping_powers: &StoppingPowers,
    dcs: &Table2,
    grids: &SharedGrids,
    positron: bool,
) -> BremsstrahlungData {
    let e_grid = &grids.ttb_e_grid;
    let k_grid = &grids.ttb_k_grid;
    let n_e = e_grid.len();
    let grams_per_atom = molar_mass / AVOGADRO;

    let factor: Vec<f64> = e_grid
        .iter()
        .map(|&e| if positron { positron_factor(e, z_sq) } else { 1.0 })
        .collect();

    // Total stopping power per atom (eV cm²)
    let stopping_power: Vec<f64> = (0..n_e)
        .map(|j| {
            (stopping_powers.collision[j] + factor[j] * stopping_powers.radiative[j])
                * grams_per_atom
        })
        .collect();

    let mut pdf = Table2::zeros(n_e, n_e);
    let mut f = vec![0.0; n_e];
    for i in 0..n_e - 1 {
        let w = e_grid[i];

        // Photon emission density at W = E_i for every incident energy above it
        for j in i..n_e {
            let e = e_grid[j];
            let x = factor[j] * z_sq * interp_one(w / e, k_grid, dcs.row(j)) * CM2_PER_MILLIBARN;
            let beta_sq = e * (e + 2.0 * MASS_ELECTRON_EV) / (e + MASS_ELECTRON_EV).powi(2);
            f[j] = if stopping_power[j] > 0.0 {
                x / (beta_sq * stopping_power[j] * w)
            } else {
                0.0
            };
        }

        // Integrate over the incident energy
        let mut c = 0.0;
        for j in i..n_e - 1 {
            c += 0.5 * (e_grid[j + 1] - e_grid[j]) * (f[j] + f[j + 1]);
            pdf[(j + 1, i)] = c.max(LOG_FLOOR.exp());
        }
    }

    let mut cdf = Table2::zeros(n_e, n_e);
    let mut yield_log = vec![LOG_FLOOR; n_e];
    for j in 1..n_e {
        pdf[(j, j)] = LOG_FLOOR.exp();

        // Trapezoidal rule in log-log space over the photon energy
        let mut c = 0.0;
        for i in 0..j {
            let w_l = e_grid[i].ln();
            let w_r = e_grid[i + 1].ln();
            let x_l = log_or_floor(pdf[(j, i)]);
            let x_r = log_or_floor(pdf[(j, i + 1)]);
            c += 0.5 * (w_r - w_l) * ((w_l + x_l).exp() + (w_r + x_r).exp());
            cdf[(j, i + 1)] = c;
        }
        yield_log[j] = log_or_floor(c);
    }

    BremsstrahlungData {
        pdf,
        cdf,
        yield_log,
    }
}

/// Bank the bremsstrahlung photons an electron or positron would emit while
/// slowing down to rest, and return the energy they carry (eV).
///
/// Photons at or below the photon cutoff are not banked and their energy is
/// not counted as lost. Each photon is capped at the energy the particle has
/// left, so the returned loss never exceeds `particle.energy`.
pub fn thick_target_bremsstrahlung(
    element: &PhotonInteraction,
    particle: &mut Particle,
    settings: &PhotonSettings,
) -> Result<f64> {
    let photon_cutoff = settings.energy_cutoff.photon;
    if particle.energy < photon_cutoff {
        return Ok(0.0);
    }
    let Some(ttb) = element.ttb() else {
        return Ok(0.0);
    };
    let data = ttb.for_particle(particle.kind);
    let e_grid = &element.grids().ttb_e_grid;
    let n_e = e_grid.len();

    let energy = particle.energy.clamp(e_grid[0], e_grid[n_e - 1]);
    let e = energy.ln();
    let j = lower_bound_index(e_grid, energy);
    let e_l = e_grid[j].ln();
    let e_r = e_grid[j + 1].ln();

    // Weight of the table at j + 1 in a log-energy interpolation
    let f = ((e - e_l) / (e_r - e_l)).clamp(0.0, 1.0);

    let y = (data.yield_log[j] + (data.yield_log[j + 1] - data.yield_log[j]) * f).exp();
    let n = (y + particle.prn()) as usize;
    if n == 0 {
        return Ok(0.0);
    }

    // Use the tabulated distribution at j + 1 with probability f
    let (i_e, c_max) = if particle.prn() <= f || j == 0 {
        let i_e = j + 1;
        let p_l = data.pdf[(i_e, i_e - 1)];
        let p_r = data.pdf[(i_e, i_e)];
        let c_l = data.cdf[(i_e, i_e - 1)];
        let a = (p_r / p_l).ln() / (e_r - e_l) + 1.0;
        let c_max = if a.abs() > 1e-12 {
            c_l + e_l.exp() * p_l / a * ((a * (e - e_l)).exp() - 1.0)
        } else {
            c_l + e_l.exp() * p_l * (e - e_l)
        };
        (i_e, c_max)
    } else {
        (j, data.cdf[(j, j)])
    };

    let cdf_row = &data.cdf.row(i_e)[..=i_e];
    let mut e_lost = 0.0;
    for _ in 0..n {
        let remaining = particle.energy - e_lost;
        if remaining <= photon_cutoff {
            break;
        }
        let c = particle.prn() * c_max;
        let i_w = lower_bound_index(cdf_row, c);

        let w_l = e_grid[i_w].ln();
        let w_r = e_grid[i_w + 1].ln();
        let p_l = data.pdf[(i_e, i_w)];
        let p_r = data.pdf[(i_e, i_w + 1)];
        let c_l = data.cdf[(i_e, i_w)];
        let a = (p_r / p_l).ln() / (w_r - w_l) + 1.0;
        let scale = w_l.exp() * p_l;
        let w = if a.abs() > 1e-12 {
            w_l.exp() * (a * (c - c_l) / scale + 1.0).max(0.0).powf(1.0 / a)
        } else {
            w_l.exp() * ((c - c_l) / scale).exp()
        };
        let w = w.min(remaining);

        if w > photon_cutoff {
            particle.create_secondary(particle.direction, w, ParticleType::Photon);
            e_lost += w;
        }
    }
    Ok(e_lost)
}
