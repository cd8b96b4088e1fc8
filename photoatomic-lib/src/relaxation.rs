use crate::angle::isotropic_direction;
use crate::element::PhotonInteraction;
use crate::error::{PhotonError, Result};
use crate::particle::{Particle, ParticleType};

/// Summary of one relaxation cascade.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RelaxationCascade {
    /// Vacancies processed. An Auger transition leaves two vacancies, so
    /// this can exceed the number of shells.
    pub steps: usize,
    /// Longest chain of vacancies from the initial one to a terminal shell.
    /// Transition tables are acyclic, so this never exceeds the shell count.
    pub depth: usize,
    /// Secondaries banked
    pub emitted: usize,
    /// Energy carried away by the banked secondaries (eV)
    pub emitted_energy: f64,
    /// Binding energy of the vacancies left in terminal shells (eV), to be
    /// deposited locally
    pub residual_energy: f64,
}

impl PhotonInteraction {
    /// Fill a vacancy in shell `i_shell`, banking fluorescence photons and
    /// Auger electrons on `particle` until every vacancy has reached a shell
    /// without transition data.
    pub fn atomic_relaxation(
        &self,
        i_shell: usize,
        particle: &mut Particle,
    ) -> Result<RelaxationCascade> {
        let shells = self.shells();
        if i_shell >= shells.len() {
            return Err(PhotonError::DataError(format!(
                "{}: no subshell at index {i_shell}",
                self.name()
            )));
        }

        let mut cascade = RelaxationCascade::default();
        let mut vacancies = vec![(i_shell, 1)];

        while let Some((i_hole, depth)) = vacancies.pop() {
            cascade.steps += 1;
            cascade.depth = cascade.depth.max(depth);
            let shell = &shells[i_hole];

            if shell.is_terminal() {
                cascade.residual_energy += shell.binding_energy;
                continue;
            }

            let c = particle.prn();
            let Some(&transition) = shell.sample_transition(c) else {
                continue;
            };
            let u = isotropic_direction(particle.prn(), particle.prn());

            if let Some(primary) = transition.primary {
                vacancies.push((primary, depth + 1));
            }
            let kind = match transition.secondary {
                Some(secondary) => {
                    vacancies.push((secondary, depth + 1));
                    ParticleType::Electron
                }
                None => ParticleType::Photon,
            };
            particle.create_secondary(u, transition.energy, kind);
            cascade.emitted += 1;
            cascade.emitted_energy += transition.energy;
        }

        Ok(cascade)
    }
}
