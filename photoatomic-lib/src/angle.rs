use std::f64::consts::PI;

use nalgebra::Vector3;

/// Rotate `u` through a polar angle with cosine `mu` and azimuth `phi`.
pub fn rotate_angle(u: [f64; 3], mu: f64, phi: f64) -> [f64; 3] {
    let mu = mu.clamp(-1.0, 1.0);
    let u_old = Vector3::from_row_slice(&u);
    let sin_theta = (1.0 - mu * mu).max(0.0).sqrt();

    let perp = if u_old.x.abs() < 0.99 {
        Vector3::new(1.0, 0.0, 0.0).cross(&u_old).normalize()
    } else {
        Vector3::new(0.0, 1.0, 0.0).cross(&u_old).normalize()
    };
    let ortho = u_old.cross(&perp);

    let u_new = (mu * u_old + sin_theta * phi.cos() * perp + sin_theta * phi.sin() * ortho)
        .normalize();
    [u_new.x, u_new.y, u_new.z]
}

/// Direction uniformly distributed on the unit sphere from two random numbers.
pub fn isotropic_direction(xi1: f64, xi2: f64) -> [f64; 3] {
    let mu = 2.0 * xi1 - 1.0;
    let phi = 2.0 * PI * xi2;
    let sin_theta = (1.0 - mu * mu).max(0.0).sqrt();
    [sin_theta * phi.cos(), sin_theta * phi.sin(), mu]
}
