mod common;

use approx::assert_relative_eq;
use photoatomic::constants::MASS_ELECTRON_EV;
use photoatomic::{FastRng, PhotonError, klein_nishina, sample_klein_nishina};

use common::copper;

const MAX_ITER: u32 = 10_000;

#[test]
fn test_free_electron_kinematics() {
    let cu = copper();
    let mut rng = FastRng::new(7);
    for alpha in [0.01, 0.2, 1.0, 2.5, 5.0, 40.0] {
        for _ in 0..500 {
            let sample = cu.compton_scatter(alpha, false, &mut rng, MAX_ITER).unwrap();
            assert!(sample.shell.is_none());
            assert!((-1.0..=1.0).contains(&sample.mu));
            assert!(sample.alpha_out <= alpha * (1.0 + 1e-12));
            assert!(sample.alpha_out >= alpha / (1.0 + 2.0 * alpha) * (1.0 - 1e-12));
            // Compton relation between energy and angle
            let expected = alpha / (1.0 + alpha * (1.0 - sample.mu));
            assert_relative_eq!(sample.alpha_out, expected, max_relative = 1e-9);
        }
    }
}

#[test]
fn test_thomson_limit() {
    let cu = copper();
    let mut rng = FastRng::new(11);
    let alpha = 1.0e-3;
    let mut sum_mu = 0.0;
    let n = 2000;
    for _ in 0..n {
        let sample = cu.compton_scatter(alpha, false, &mut rng, MAX_ITER).unwrap();
        assert!(sample.alpha_out / alpha > 0.99);
        sum_mu += sample.mu;
    }
    // Binding suppresses forward scattering
    assert!(sum_mu / (n as f64) < 0.1);

    let (sigma, _) = klein_nishina(alpha);
    assert_relative_eq!(sigma, 0.6652, max_relative = 1e-2);
}

#[test]
fn test_klein_nishina_is_pure() {
    assert_eq!(klein_nishina(0.5), klein_nishina(0.5));
    let (sigma_low, _) = klein_nishina(0.1);
    let (sigma_high, _) = klein_nishina(10.0);
    assert!(sigma_high < sigma_low);
}

#[test]
fn test_klein_nishina_sampling_forward_at_high_energy() {
    let mut rng = FastRng::new(3);
    let mut sum_mu = 0.0;
    for _ in 0..2000 {
        let (_, mu) = sample_klein_nishina(20.0, &mut rng, MAX_ITER).unwrap();
        sum_mu += mu;
    }
    // Mean cosine of the Klein-Nishina distribution at alpha = 20 is 0.56
    assert!(sum_mu / 2000.0 > 0.45);
}

#[test]
fn test_doppler_broadened_energies() {
    let cu = copper();
    let mut rng = FastRng::new(19);
    for alpha in [0.05, 0.2, 1.0] {
        let e = alpha * MASS_ELECTRON_EV;
        let mut shells_seen = [false; 3];
        for _ in 0..2000 {
            let sample = cu.compton_scatter(alpha, true, &mut rng, MAX_ITER).unwrap();
            let shell = sample.shell.unwrap();
            assert!(shell < 3);
            shells_seen[shell] = true;
            assert!(sample.alpha_out > 0.0);
            assert!(sample.alpha_out * MASS_ELECTRON_EV <= e * (1.0 + 1e-12));
            assert!((-1.0..=1.0).contains(&sample.mu));
        }
        assert!(shells_seen.iter().all(|&s| s));
    }
}

#[test]
fn test_doppler_spreads_energy_at_fixed_angle() {
    let cu = copper();
    let mut rng = FastRng::new(5);
    let alpha = 0.2;
    // Broadened energies differ from the free-electron value
    let mut differs = 0;
    for _ in 0..500 {
        let sample = cu.compton_scatter(alpha, true, &mut rng, MAX_ITER).unwrap();
        let free = alpha / (1.0 + alpha * (1.0 - sample.mu));
        if (sample.alpha_out - free).abs() > 1e-9 * free {
            differs += 1;
        }
    }
    assert!(differs > 250);
}

#[test]
fn test_same_seed_same_samples() {
    let cu = copper();
    let mut a = FastRng::new(2024);
    let mut b = FastRng::new(2024);
    for _ in 0..200 {
        let sa = cu.compton_scatter(0.3, true, &mut a, MAX_ITER).unwrap();
        let sb = cu.compton_scatter(0.3, true, &mut b, MAX_ITER).unwrap();
        assert_eq!(sa, sb);
    }
}

#[test]
fn test_iteration_limit_reports_failure() {
    let cu = copper();
    let mut rng = FastRng::new(1);
    let err = cu.compton_scatter(0.5, false, &mut rng, 0).unwrap_err();
    assert!(matches!(
        err,
        PhotonError::SamplingFailure { kernel: "compton", iterations: 0 }
    ));
    assert!(matches!(
        sample_klein_nishina(0.5, &mut rng, 0),
        Err(PhotonError::SamplingFailure { .. })
    ));
}
