use crate::rng::FastRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleType {
    Photon,
    Electron,
    Positron,
}

/// A particle created during a collision, waiting to be transported.
#[derive(Debug, Clone, PartialEq)]
pub struct SecondaryParticle {
    pub kind: ParticleType,
    pub position: [f64; 3],
    pub direction: [f64; 3],
    pub energy: f64,
}

/// Minimal transport-facing particle state: what the physics kernels read
/// and mutate during a collision.
#[derive(Debug, Clone)]
pub struct Particle {
    pub kind: ParticleType,
    pub position: [f64; 3],
    pub direction: [f64; 3],
    /// Kinetic energy (eV)
    pub energy: f64,
    pub alive: bool,
    /// ENDF MT number of the last sampled event, 0 before any collision
    pub event_mt: u32,
    pub rng: FastRng,
    pub secondaries: Vec<SecondaryParticle>,
}

impl Particle {
    pub fn new(
        kind: ParticleType,
        position: [f64; 3],
        direction: [f64; 3],
        energy: f64,
        rng: FastRng,
    ) -> Self {
        Self {
            kind,
            position,
            direction,
            energy,
            alive: true,
            event_mt: 0,
            rng,
            secondaries: Vec::new(),
        }
    }

    /// Next uniform random number in [0, 1) from the particle's own stream.
    #[inline]
    pub fn prn(&mut self) -> f64 {
        self.rng.prn()
    }

    /// Bank a secondary at the particle's position.
    pub fn create_secondary(&mut self, direction: [f64; 3], energy: f64, kind: ParticleType) {
        self.secondaries.push(SecondaryParticle {
            kind,
            position: self.position,
            direction,
            energy,
        });
    }

    /// Total energy held in the secondary bank.
    pub fn banked_energy(&self) -> f64 {
        self.secondaries.iter().map(|s| s.energy).sum()
    }
}
