use std::f64::consts::PI;

use log::trace;

use crate::angle::{isotropic_direction, rotate_angle};
use crate::bremsstrahlung::thick_target_bremsstrahlung;
use crate::constants::MASS_ELECTRON_EV;
use crate::element::PhotonInteraction;
use crate::error::{PhotonError, Result};
use crate::micro_xs::ElementMicroXS;
use crate::pair::PAIR_THRESHOLD_ALPHA;
use crate::particle::{Particle, ParticleType};
use crate::relaxation::RelaxationCascade;
use crate::settings::{ElectronTreatment, PhotonSettings};

/// ENDF reaction numbers of the photon channels
pub const MT_COHERENT: u32 = 502;
pub const MT_INCOHERENT: u32 = 504;
pub const MT_PAIR_PRODUCTION: u32 = 516;
/// Photoionization of the K shell; shell with designator `d` is `533 + d`
pub const MT_PHOTOELECTRIC_K: u32 = 534;

/// Outcome of one photon collision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhotonEvent {
    /// Photon was below the photon cutoff and was killed
    BelowCutoff,
    Coherent {
        mu: f64,
    },
    Incoherent {
        mu: f64,
        alpha_out: f64,
        /// Compton-profile shell of the struck electron
        shell: Option<usize>,
        cascade: Option<RelaxationCascade>,
    },
    Photoelectric {
        /// Index of the ionized shell in [`PhotonInteraction::shells`]
        shell: usize,
        cascade: RelaxationCascade,
    },
    PairProduction,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Channel {
    Coherent,
    Incoherent,
    Photoelectric(usize),
    PairProduction,
}

/// Choose a channel with probability proportional to its cross section at
/// the cached energy.
fn select_channel(
    element: &PhotonInteraction,
    micro: &ElementMicroXS,
    alpha: f64,
    xi: f64,
) -> Channel {
    let cutoff = xi * micro.total;
    let mut last_positive = None;

    let mut prob = micro.coherent;
    if micro.coherent > 0.0 {
        last_positive = Some(Channel::Coherent);
    }
    if prob > cutoff {
        return Channel::Coherent;
    }

    prob += micro.incoherent;
    if micro.incoherent > 0.0 {
        last_positive = Some(Channel::Incoherent);
    }
    if prob > cutoff {
        return Channel::Incoherent;
    }

    for i_shell in 0..element.shells().len() {
        let xs = micro.shell_photoelectric(element, i_shell);
        prob += xs;
        if xs > 0.0 {
            last_positive = Some(Channel::Photoelectric(i_shell));
        }
        if prob > cutoff {
            return Channel::Photoelectric(i_shell);
        }
    }

    if micro.pair_production > 0.0 && alpha > PAIR_THRESHOLD_ALPHA {
        return Channel::PairProduction;
    }
    // Only reached through roundoff in the running sum
    last_positive.unwrap_or(Channel::Coherent)
}

/// Sample and apply one photon collision with `element`.
///
/// `micro` is recomputed first if it does not hold `element` at the
/// particle's energy.
pub fn sample_photon_reaction(
    element: &PhotonInteraction,
    micro: &mut ElementMicroXS,
    particle: &mut Particle,
    settings: &PhotonSettings,
) -> Result<PhotonEvent> {
    if particle.energy < settings.energy_cutoff.photon {
        particle.energy = 0.0;
        particle.alive = false;
        return Ok(PhotonEvent::BelowCutoff);
    }

    micro.evaluate(element, particle.energy);
    let alpha = particle.energy / MASS_ELECTRON_EV;
    let max_iterations = settings.max_sampling_iterations;

    let channel = select_channel(element, micro, alpha, particle.prn());
    trace!("{}: photon at {} eV takes {:?}", element.name(), particle.energy, channel);

    match channel {
        Channel::Coherent => {
            let mu = element.rayleigh_scatter(alpha, &mut particle.rng, max_iterations)?;
            let phi = 2.0 * PI * particle.prn();
            particle.direction = rotate_angle(particle.direction, mu, phi);
            particle.event_mt = MT_COHERENT;
            Ok(PhotonEvent::Coherent { mu })
        }
        Channel::Incoherent => {
            let sample = element.compton_scatter(
                alpha,
                settings.doppler_broadening,
                &mut particle.rng,
                max_iterations,
            )?;
            let (alpha_out, mu) = (sample.alpha_out, sample.mu);
            let e_b = sample
                .shell
                .and_then(|i| element.profile_binding_energy(i))
                .unwrap_or(0.0);

            let phi = 2.0 * PI * particle.prn();
            let e_electron = (alpha - alpha_out) * MASS_ELECTRON_EV - e_b;
            if e_electron >= settings.energy_cutoff.electron {
                let denom =
                    (alpha * alpha + alpha_out * alpha_out - 2.0 * alpha * alpha_out * mu).sqrt();
                let mu_electron = if denom > 0.0 {
                    (alpha - alpha_out * mu) / denom
                } else {
                    1.0
                };
                let u = rotate_angle(particle.direction, mu_electron, phi);
                particle.create_secondary(u, e_electron, ParticleType::Electron);
            }

            // Compton-profile shells are matched to relaxation shells by index
            let cascade = match sample.shell {
                Some(i) if i < element.shells().len() => {
                    Some(element.atomic_relaxation(i, particle)?)
                }
                _ => None,
            };

            particle.energy = alpha_out * MASS_ELECTRON_EV;
            particle.direction = rotate_angle(particle.direction, mu, phi + PI);
            particle.event_mt = MT_INCOHERENT;
            Ok(PhotonEvent::Incoherent {
                mu,
                alpha_out,
                shell: sample.shell,
                cascade,
            })
        }
        Channel::Photoelectric(i_shell) => {
            let shell = &element.shells()[i_shell];
            let e_electron = particle.energy - shell.binding_energy;

            if e_electron > 0.0 {
                let mu = sauter_cosine(particle, e_electron, max_iterations)?;
                let phi = 2.0 * PI * particle.prn();
                let u = rotate_angle(particle.direction, mu, phi);
                particle.create_secondary(u, e_electron, ParticleType::Electron);
            }

            let cascade = element.atomic_relaxation(i_shell, particle)?;
            particle.event_mt = MT_PHOTOELECTRIC_K - 1 + shell.designator() as u32;
            particle.energy = 0.0;
            particle.alive = false;
            Ok(PhotonEvent::Photoelectric {
                shell: i_shell,
                cascade,
            })
        }
        Channel::PairProduction => {
            let pair = element.pair_production(alpha, &mut particle.rng, max_iterations)?;

            let phi = 2.0 * PI * particle.prn();
            let u = rotate_angle(particle.direction, pair.mu_electron, phi);
            particle.create_secondary(u, pair.e_electron, ParticleType::Electron);

            let phi = 2.0 * PI * particle.prn();
            let u = rotate_angle(particle.direction, pair.mu_positron, phi);
            particle.create_secondary(u, pair.e_positron, ParticleType::Positron);

            particle.event_mt = MT_PAIR_PRODUCTION;
            particle.energy = 0.0;
            particle.alive = false;
            Ok(PhotonEvent::PairProduction)
        }
    }
}

/// Photoelectron direction cosine from the non-relativistic Sauter
/// distribution.
fn sauter_cosine(particle: &mut Particle, e_electron: f64, max_iterations: u32) -> Result<f64> {
    let beta = (e_electron * (e_electron + 2.0 * MASS_ELECTRON_EV)).sqrt()
        / (e_electron + MASS_ELECTRON_EV);
    for _ in 0..max_iterations {
        let r = particle.prn();
        if 4.0 * (1.0 - r) * r >= particle.prn() {
            let mu = (2.0 * r + beta - 1.0) / (2.0 * beta * r - beta + 1.0);
            return Ok(mu.clamp(-1.0, 1.0));
        }
    }
    Err(PhotonError::SamplingFailure {
        kernel: "sauter",
        iterations: max_iterations,
    })
}

/// Slow an electron down to rest in `element`. Returns the energy deposited
/// locally, which excludes the energy of any banked bremsstrahlung photons.
pub fn sample_electron_reaction(
    element: &PhotonInteraction,
    particle: &mut Particle,
    settings: &PhotonSettings,
) -> Result<f64> {
    let e_lost = if settings.electron_treatment == ElectronTreatment::Ttb {
        thick_target_bremsstrahlung(element, particle, settings)?
    } else {
        0.0
    };
    let deposited = particle.energy - e_lost;
    particle.energy = 0.0;
    particle.alive = false;
    Ok(deposited)
}

/// Slow a positron down to rest in `element` and bank its two annihilation
/// photons. Returns the kinetic energy deposited locally.
pub fn sample_positron_reaction(
    element: &PhotonInteraction,
    particle: &mut Particle,
    settings: &PhotonSettings,
) -> Result<f64> {
    let deposited = sample_electron_reaction(element, particle, settings)?;

    let u = isotropic_direction(particle.prn(), particle.prn());
    particle.create_secondary(u, MASS_ELECTRON_EV, ParticleType::Photon);
    particle.create_secondary([-u[0], -u[1], -u[2]], MASS_ELECTRON_EV, ParticleType::Photon);
    Ok(deposited)
}
