use rand::Rng;

use crate::constants::MOMENTUM_PER_ALPHA;
use crate::element::PhotonInteraction;
use crate::error::{PhotonError, Result};
use crate::interp::lower_bound_index;

impl PhotonInteraction {
    /// Sample the scattering cosine of a coherent (Rayleigh) event for a
    /// photon of reduced energy `alpha`.
    ///
    /// x² is drawn from the integrated coherent form factor up to x²_max,
    /// then μ = 1 - 2x²/x²_max is accepted with probability (1 + μ²)/2.
    pub fn rayleigh_scatter(
        &self,
        alpha: f64,
        rng: &mut impl Rng,
        max_iterations: u32,
    ) -> Result<f64> {
        let form_factor = self.coherent_int_form_factor();
        let x = form_factor.x();
        let y = form_factor.y();

        let x2_max = (MOMENTUM_PER_ALPHA * alpha).powi(2);
        let f_max = form_factor.evaluate(x2_max);

        for _ in 0..max_iterations {
            let f = rng.random::<f64>() * f_max;

            let i = lower_bound_index(y, f);
            let r = if y[i + 1] > y[i] {
                (f - y[i]) / (y[i + 1] - y[i])
            } else {
                0.0
            };
            let x2 = x[i] + r * (x[i + 1] - x[i]);

            let mu = if x2_max > 0.0 {
                (1.0 - 2.0 * x2 / x2_max).clamp(-1.0, 1.0)
            } else {
                1.0
            };
            if rng.random::<f64>() < 0.5 * (1.0 + mu * mu) {
                return Ok(mu);
            }
        }
        Err(PhotonError::SamplingFailure {
            kernel: "rayleigh",
            iterations: max_iterations,
        })
    }
}
