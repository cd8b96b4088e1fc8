mod common;

use std::sync::Arc;

use approx::assert_relative_eq;
use photoatomic::constants::LOG_FLOOR;
use photoatomic::photoatomic_data::{Table2Record, TransitionRecord};
use photoatomic::{
    ElectronTreatment, PhotonError, PhotonInteraction, PhotonSettings, SharedGrids, interp,
};

use common::{copper, copper_record, shared_grids, shared_grids_record, two_point_record};

fn try_build(record: &photoatomic::photoatomic_data::ElementRecord) -> photoatomic::Result<PhotonInteraction> {
    PhotonInteraction::from_record(record, shared_grids(), &PhotonSettings::default())
}

#[test]
fn test_identity() {
    let cu = copper();
    assert_eq!(cu.name(), "Cu");
    assert_eq!(cu.long_name(), "copper");
    assert_eq!(cu.z(), 29);
    assert_relative_eq!(cu.molar_mass(), 63.546);
}

#[test]
fn test_grid_and_channels_aligned() {
    let cu = copper();
    let n = cu.energy().len();
    assert!(interp::is_strictly_increasing(cu.energy()));
    for channel in [
        cu.coherent(),
        cu.incoherent(),
        cu.photoelectric_total(),
        cu.pair_production_total(),
        cu.pair_production_electron(),
        cu.pair_production_nuclear(),
    ] {
        assert_eq!(channel.len(), n);
    }
    for shell in cu.shells() {
        assert_eq!(shell.cross_section.len(), n - shell.threshold);
    }
}

#[test]
fn test_channels_stored_as_logs() {
    let record = copper_record();
    let cu = copper();
    assert_relative_eq!(cu.coherent()[7], record.coherent.xs[7].ln(), epsilon = 1e-12);
    // Pair production is zero at 1 keV
    assert_eq!(cu.pair_production_total()[0], LOG_FLOOR);
    let last = record.energy.len() - 1;
    let total = record.pair_production_electron[last]
        + record.pair_production_nuclear.as_ref().unwrap()[last];
    assert_relative_eq!(cu.pair_production_total()[last].exp(), total, max_relative = 1e-12);
}

#[test]
fn test_missing_nuclear_pair_production_defaults_to_zero() {
    let mut record = copper_record();
    record.pair_production_nuclear = None;
    let element = try_build(&record).unwrap();
    assert!(element.pair_production_nuclear().iter().all(|&v| v == LOG_FLOOR));
    assert_eq!(element.pair_production_total(), element.pair_production_electron());
}

#[test]
fn test_shell_lookup() {
    let cu = copper();
    assert_eq!(cu.shell_index(1).unwrap(), 0);
    assert_eq!(cu.shell_index(2).unwrap(), 1);
    assert_eq!(cu.shell_index(5).unwrap(), 2);
    assert_eq!(cu.shell(5).unwrap().label(), "M1");
    assert_relative_eq!(cu.shell(1).unwrap().binding_energy, common::K_BINDING);
    assert!(matches!(
        cu.shell_index(3),
        Err(PhotonError::UnknownShell { designator: 3, .. })
    ));
}

#[test]
fn test_transition_tables_normalized() {
    let cu = copper();
    for shell in cu.shells() {
        if shell.is_terminal() {
            continue;
        }
        let sum: f64 = shell.transitions().iter().map(|t| t.probability).sum();
        assert!((sum - 1.0).abs() < 1e-9, "{}: {sum}", shell.label());
    }
    let k = cu.shell(1).unwrap();
    assert!(k.transitions()[0].is_radiative());
    assert_eq!(k.transitions()[1].secondary, Some(2));
    assert!(cu.shell(5).unwrap().is_terminal());
}

#[test]
fn test_transitions_renormalized_within_tolerance() {
    let mut record = copper_record();
    record.subshells[0].transitions[0].probability = 0.60005;
    let element = try_build(&record).unwrap();
    let k = element.shell(1).unwrap();
    let sum: f64 = k.transitions().iter().map(|t| t.probability).sum();
    assert!((sum - 1.0).abs() < 1e-12);
}

#[test]
fn test_transition_sum_outside_tolerance() {
    let mut record = copper_record();
    record.subshells[0].transitions[0].probability = 0.5;
    let err = try_build(&record).unwrap_err();
    match err {
        PhotonError::TransitionProbability { element, shell, sum } => {
            assert_eq!(element, "Cu");
            assert_eq!(shell, "K");
            assert_relative_eq!(sum, 0.9);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_negative_transition_probability() {
    let mut record = copper_record();
    record.subshells[0].transitions = vec![
        TransitionRecord { primary: 2, secondary: 0, energy: 1.0, probability: 1.5 },
        TransitionRecord { primary: 2, secondary: 0, energy: 1.0, probability: -0.5 },
    ];
    assert!(matches!(
        try_build(&record),
        Err(PhotonError::TransitionProbability { .. })
    ));
}

#[test]
fn test_transition_to_missing_shell() {
    let mut record = copper_record();
    // M3 is not one of the element's shells
    record.subshells[1].transitions[0].primary = 7;
    assert!(matches!(
        try_build(&record),
        Err(PhotonError::UnknownShell { designator: 7, .. })
    ));
}

#[test]
fn test_cyclic_transitions_rejected() {
    let mut record = copper_record();
    // M1 refills from K, which already feeds M1
    record.subshells[2].transitions = vec![TransitionRecord {
        primary: 1,
        secondary: 0,
        energy: 10.0,
        probability: 1.0,
    }];
    assert!(matches!(
        try_build(&record),
        Err(PhotonError::TransitionCycle { .. })
    ));

    let mut record = copper_record();
    record.subshells[2].transitions = vec![TransitionRecord {
        primary: 5,
        secondary: 0,
        energy: 10.0,
        probability: 1.0,
    }];
    assert!(matches!(
        try_build(&record),
        Err(PhotonError::TransitionCycle { .. })
    ));
}

#[test]
fn test_non_monotonic_grid() {
    let mut record = copper_record();
    record.energy.swap(3, 4);
    assert!(matches!(
        try_build(&record),
        Err(PhotonError::InvalidGrid { .. })
    ));

    let mut record = copper_record();
    record.energy[4] = record.energy[3];
    assert!(try_build(&record).is_err());
}

#[test]
fn test_channel_length_mismatch() {
    let mut record = copper_record();
    record.incoherent.xs.pop();
    match try_build(&record).unwrap_err() {
        PhotonError::LengthMismatch { dataset, expected, found, .. } => {
            assert_eq!(dataset, "incoherent");
            assert_eq!(expected, 51);
            assert_eq!(found, 50);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_negative_cross_section() {
    let mut record = copper_record();
    record.coherent.xs[10] = -1.0;
    assert!(matches!(
        try_build(&record),
        Err(PhotonError::InvalidGrid { .. })
    ));
}

#[test]
fn test_subshell_problems() {
    let mut record = copper_record();
    record.subshells.clear();
    assert!(try_build(&record).is_err());

    let mut record = copper_record();
    record.subshells[1].designator = "K".to_string();
    assert!(matches!(
        try_build(&record),
        Err(PhotonError::InvalidGrid { .. })
    ));

    let mut record = copper_record();
    record.subshells[0].threshold_idx -= 1;
    assert!(matches!(
        try_build(&record),
        Err(PhotonError::LengthMismatch { .. })
    ));
}

#[test]
fn test_compton_profile_shape_mismatch() {
    let mut record = copper_record();
    record.compton_profiles.profiles.values.pop();
    assert!(try_build(&record).is_err());

    let mut record = copper_record();
    record.compton_profiles.binding_energy.pop();
    assert!(matches!(
        try_build(&record),
        Err(PhotonError::LengthMismatch { .. })
    ));
}

#[test]
fn test_compton_profiles_built() {
    let cu = copper();
    let profiles = cu.compton_profiles();
    assert_eq!(profiles.pdf.shape(), profiles.cdf.shape());
    let sum: f64 = profiles.electron_pdf.iter().sum();
    assert_relative_eq!(sum, 1.0, epsilon = 1e-12);
    for i in 0..profiles.cdf.rows() {
        let row = profiles.cdf.row(i);
        assert_eq!(row[0], 0.0);
        assert!(row.windows(2).all(|w| w[1] >= w[0]));
    }
    // A half-Gaussian of unit area per width integrates to sqrt(pi/2)
    let k_row = profiles.cdf.row(0);
    assert_relative_eq!(
        k_row[k_row.len() - 1],
        (std::f64::consts::PI / 2.0).sqrt(),
        max_relative = 1e-2
    );
}

#[test]
fn test_bremsstrahlung_shape_mismatch() {
    let mut record = copper_record();
    record.bremsstrahlung.as_mut().unwrap().dcs.cols -= 1;
    assert!(try_build(&record).is_err());

    let mut record = copper_record();
    record.stopping_powers.as_mut().unwrap().collision.pop();
    assert!(matches!(
        try_build(&record),
        Err(PhotonError::LengthMismatch { .. })
    ));
}

#[test]
fn test_bremsstrahlung_needs_photon_fraction_grid() {
    let mut grids_record = shared_grids_record();
    grids_record.ttb_photon_fraction.clear();
    let grids = Arc::new(SharedGrids::from_record(&grids_record).unwrap());

    let mut record = copper_record();
    let rows = grids_record.ttb_electron_energy.len() as u32;
    record.bremsstrahlung.as_mut().unwrap().dcs = Table2Record {
        rows,
        cols: 0,
        values: Vec::new(),
    };
    for treatment in [ElectronTreatment::Ttb, ElectronTreatment::Led] {
        let settings = PhotonSettings {
            electron_treatment: treatment,
            ..PhotonSettings::default()
        };
        assert!(matches!(
            PhotonInteraction::from_record(&record, grids.clone(), &settings),
            Err(PhotonError::InvalidGrid { .. })
        ));
    }

    // Without bremsstrahlung data the empty grid is harmless
    record.bremsstrahlung = None;
    let element =
        PhotonInteraction::from_record(&record, grids, &PhotonSettings::default()).unwrap();
    assert!(element.ttb().is_none());
}

#[test]
fn test_photoelectric_total_matches_subshells() {
    assert!(copper().photoelectric_mismatch() < 1e-12);
    assert!(try_build(&two_point_record()).unwrap().photoelectric_mismatch() < 1e-12);

    // A disagreeing total still loads; the gap is reported
    let mut record = copper_record();
    for v in &mut record.photoelectric {
        *v *= 2.0;
    }
    let element = try_build(&record).unwrap();
    assert_relative_eq!(element.photoelectric_mismatch(), 0.5, max_relative = 1e-9);
}

#[test]
fn test_ttb_tables_follow_settings() {
    assert!(copper().ttb().is_some());

    let settings = PhotonSettings {
        electron_treatment: ElectronTreatment::Led,
        ..PhotonSettings::default()
    };
    let led = PhotonInteraction::from_record(&copper_record(), shared_grids(), &settings).unwrap();
    assert!(led.ttb().is_none());
    assert!(led.bremsstrahlung_dcs().is_some());

    let mut record = copper_record();
    record.stopping_powers = None;
    let element = try_build(&record).unwrap();
    assert!(element.ttb().is_none());
}

#[test]
fn test_element_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<PhotonInteraction>();
    assert_send_sync::<photoatomic::PhotonLibrary>();
}
