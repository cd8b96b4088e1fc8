#![allow(dead_code)]

use std::sync::Arc;

use photoatomic::photoatomic_data::{
    BremsstrahlungRecord, CoherentRecord, ComptonProfileRecord, ElementRecord,
    IncoherentRecord, PhotonLibraryRecord, SharedGridsRecord, StoppingPowerRecord,
    SubshellRecord, Table2Record, TabulatedRecord, TransitionRecord, VersionRecord,
};
use photoatomic::{
    FastRng, Particle, ParticleType, PhotonInteraction, PhotonSettings, SharedGrids,
};

pub const K_BINDING: f64 = 8979.0;
pub const L1_BINDING: f64 = 1096.7;
pub const M1_BINDING: f64 = 122.5;

/// Element energy grid: 1 keV to 100 MeV, ten points per decade
pub fn energy_grid() -> Vec<f64> {
    (0..=50).map(|k| 10f64.powf(3.0 + 0.1 * k as f64)).collect()
}

pub fn shared_grids_record() -> SharedGridsRecord {
    SharedGridsRecord {
        compton_profile_pz: (0..=80).map(|i| 0.5 * i as f64).collect(),
        ttb_electron_energy: (0..=30).map(|k| 10f64.powf(3.0 + 0.2 * k as f64)).collect(),
        ttb_photon_fraction: (0..=20).map(|i| 0.05 * i as f64).collect(),
    }
}

pub fn shared_grids() -> Arc<SharedGrids> {
    Arc::new(SharedGrids::from_record(&shared_grids_record()).unwrap())
}

fn log_grid(lo: f64, hi: f64, per_decade: usize) -> Vec<f64> {
    let decades = (hi / lo).log10().round() as usize;
    (0..=decades * per_decade)
        .map(|i| lo * 10f64.powf(i as f64 / per_decade as f64))
        .collect()
}

fn shell_xs(energy: &[f64], binding: f64, scale: f64) -> (u32, Vec<f64>) {
    let threshold = energy.iter().position(|&e| e >= binding).unwrap();
    let xs = energy[threshold..]
        .iter()
        .map(|&e| scale * (binding / e).powf(2.7))
        .collect();
    (threshold as u32, xs)
}

fn transition(primary: u8, secondary: u8, energy: f64, probability: f64) -> TransitionRecord {
    TransitionRecord {
        primary,
        secondary,
        energy,
        probability,
    }
}

/// Synthetic element with K, L1 and M1 shells. A K vacancy relaxes either
/// radiatively into L1 or by an Auger transition leaving L1 and M1 vacancies;
/// L1 fluoresces into M1; M1 is terminal.
pub fn element_record(z: u16, symbol: &str, name: &str, molar_mass: f64) -> ElementRecord {
    let energy = energy_grid();
    let zf = z as f64;

    let (k_threshold, k_xs) = shell_xs(&energy, K_BINDING, 5.0e4);
    let (l1_threshold, l1_xs) = shell_xs(&energy, L1_BINDING, 4.0e3);
    let (m1_threshold, m1_xs) = shell_xs(&energy, M1_BINDING, 5.0e2);

    let mut photoelectric = vec![0.0; energy.len()];
    for (threshold, xs) in [(k_threshold, &k_xs), (l1_threshold, &l1_xs), (m1_threshold, &m1_xs)]
    {
        for (i, v) in xs.iter().enumerate() {
            photoelectric[threshold as usize + i] += v;
        }
    }

    let subshells = vec![
        SubshellRecord {
            designator: "K".to_string(),
            binding_energy: K_BINDING,
            num_electrons: 2.0,
            threshold_idx: k_threshold,
            xs: k_xs,
            transitions: vec![
                transition(2, 0, K_BINDING - L1_BINDING, 0.6),
                transition(2, 5, K_BINDING - L1_BINDING - M1_BINDING, 0.4),
            ],
        },
        SubshellRecord {
            designator: "L1".to_string(),
            binding_energy: L1_BINDING,
            num_electrons: 2.0,
            threshold_idx: l1_threshold,
            xs: l1_xs,
            transitions: vec![transition(5, 0, L1_BINDING - M1_BINDING, 1.0)],
        },
        SubshellRecord {
            designator: "M1".to_string(),
            binding_energy: M1_BINDING,
            num_electrons: 2.0,
            threshold_idx: m1_threshold,
            xs: m1_xs,
            transitions: Vec::new(),
        },
    ];

    // Incoherent scattering function S(x) = Z (1 - exp(-2x))
    let mut x = vec![0.0];
    x.extend(log_grid(1e-3, 1e4, 5));
    let s = x.iter().map(|&x| zf * (1.0 - (-2.0 * x).exp())).collect();

    // Integrated coherent form factor in x²
    let mut x2 = vec![0.0];
    x2.extend(log_grid(1e-4, 1e8, 5));
    let ff = x2.iter().map(|&t| zf * zf * t / (1.0 + t)).collect();

    let grids = shared_grids_record();
    let pz = &grids.compton_profile_pz;
    let widths = [8.0, 3.0, 1.0];
    let mut profiles = Vec::new();
    for w in widths {
        profiles.extend(pz.iter().map(|&p| (-(p * p) / (2.0 * w * w)).exp() / w));
    }

    let e_grid = &grids.ttb_electron_energy;
    let k_grid = &grids.ttb_photon_fraction;
    let mut dcs = Vec::new();
    for _ in e_grid {
        dcs.extend(k_grid.iter().map(|&k| 8.0 - 2.0 * k));
    }

    ElementRecord {
        atomic_number: z,
        symbol: symbol.to_string(),
        name: name.to_string(),
        molar_mass,
        coherent: CoherentRecord {
            xs: energy.iter().map(|&e| 50.0 * (1.0e4 / e).powf(1.2)).collect(),
            integrated_form_factor: TabulatedRecord {
                x: x2,
                y: ff,
                breakpoints: Vec::new(),
                interpolation: Vec::new(),
            },
            anomalous_real: None,
            anomalous_imag: None,
        },
        incoherent: IncoherentRecord {
            xs: energy
                .iter()
                .map(|&e| 15.0 * (1.0 + e / 5.0e5).powf(-0.8))
                .collect(),
            scattering_factor: TabulatedRecord {
                x,
                y: s,
                breakpoints: Vec::new(),
                interpolation: Vec::new(),
            },
        },
        photoelectric,
        pair_production_electron: energy
            .iter()
            .map(|&e| if e > 2.044e6 { 0.01 * (e / 2.044e6).ln() } else { 0.0 })
            .collect(),
        pair_production_nuclear: Some(
            energy
                .iter()
                .map(|&e| if e > 1.022e6 { 0.5 * (e / 1.022e6).ln() } else { 0.0 })
                .collect(),
        ),
        subshells,
        compton_profiles: ComptonProfileRecord {
            num_electrons: vec![2.0, 2.0, 2.0],
            binding_energy: vec![K_BINDING, L1_BINDING, M1_BINDING],
            profiles: Table2Record {
                rows: 3,
                cols: pz.len() as u32,
                values: profiles,
            },
        },
        stopping_powers: Some(StoppingPowerRecord {
            mean_excitation_energy: 322.0,
            collision: e_grid.iter().map(|&e| 1.3e6 * (e / 1.0e6).powf(-0.4)).collect(),
            radiative: e_grid.iter().map(|&e| 1.0e5 * (e / 1.0e6).powf(0.9)).collect(),
        }),
        bremsstrahlung: Some(BremsstrahlungRecord {
            dcs: Table2Record {
                rows: e_grid.len() as u32,
                cols: k_grid.len() as u32,
                values: dcs,
            },
        }),
        energy,
    }
}

pub fn copper_record() -> ElementRecord {
    element_record(29, "Cu", "copper", 63.546)
}

pub fn library_record() -> PhotonLibraryRecord {
    PhotonLibraryRecord {
        version: vec![VersionRecord {
            tag: "synthetic".to_string(),
            date: "2026-01-01".to_string(),
            notes: "test fixture".to_string(),
        }],
        shared: shared_grids_record(),
        elements: vec![
            copper_record(),
            element_record(82, "Pb", "lead", 207.2),
        ],
    }
}

pub fn build(record: &ElementRecord) -> PhotonInteraction {
    PhotonInteraction::from_record(record, shared_grids(), &PhotonSettings::default()).unwrap()
}

pub fn copper() -> PhotonInteraction {
    build(&copper_record())
}

/// Element on a two-point grid (1 keV, 10 keV) whose coherent channel and
/// single shell rise linearly from 1 to 10 barns.
pub fn two_point_record() -> ElementRecord {
    let mut record = copper_record();
    record.energy = vec![1.0e3, 1.0e4];
    record.coherent.xs = vec![1.0, 10.0];
    record.incoherent.xs = vec![2.0, 20.0];
    record.photoelectric = vec![1.0, 10.0];
    record.pair_production_electron = vec![0.0, 0.0];
    record.pair_production_nuclear = None;
    record.subshells = vec![SubshellRecord {
        designator: "K".to_string(),
        binding_energy: 500.0,
        num_electrons: 2.0,
        threshold_idx: 0,
        xs: vec![1.0, 10.0],
        transitions: Vec::new(),
    }];
    record
}

/// Element with one shell whose only transition is a fluorescence photon
/// of energy `energy` leaving no further vacancy.
pub fn single_shell_record(energy: f64) -> ElementRecord {
    let mut record = copper_record();
    let threshold = record.subshells[0].threshold_idx;
    let xs = record.subshells[0].xs.clone();
    record.subshells = vec![SubshellRecord {
        designator: "K".to_string(),
        binding_energy: energy,
        num_electrons: 2.0,
        threshold_idx: threshold,
        xs,
        transitions: vec![transition(0, 0, energy, 1.0)],
    }];
    record
}

pub fn particle(kind: ParticleType, energy: f64, seed: u64) -> Particle {
    Particle::new(kind, [0.0, 0.0, 0.0], [0.0, 0.0, 1.0], energy, FastRng::new(seed))
}

pub fn photon(energy: f64, seed: u64) -> Particle {
    particle(ParticleType::Photon, energy, seed)
}
