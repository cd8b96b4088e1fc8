use std::path::Path;

use photoatomic_data::{ElementRecord, SharedGridsRecord, VersionRecord};

/// Read `Version.dat`: one `tag // date // notes` entry per line.
pub fn parse_version(path: &Path) -> Vec<VersionRecord> {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()));
    version_entries(&content)
}

/// Comment lines start with `#`. Lines without a tag or without all three
/// fields are skipped; a `//` inside the notes is kept.
fn version_entries(content: &str) -> Vec<VersionRecord> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#'))
        .filter_map(|line| {
            let (tag, rest) = line.split_once("//")?;
            let (date, notes) = rest.split_once("//")?;
            let tag = tag.trim();
            (!tag.is_empty()).then(|| VersionRecord {
                tag: tag.to_string(),
                date: date.trim().to_string(),
                notes: notes.trim().to_string(),
            })
        })
        .collect()
}

pub fn parse_shared_grids(path: &Path) -> SharedGridsRecord {
    let content = std::fs::read_to_string(path).expect("failed to read shared_grids.json");
    let grids: SharedGridsRecord =
        serde_json::from_str(&content).expect("failed to parse shared_grids.json");

    for (name, grid) in [
        ("compton_profile_pz", &grids.compton_profile_pz),
        ("ttb_electron_energy", &grids.ttb_electron_energy),
        ("ttb_photon_fraction", &grids.ttb_photon_fraction),
    ] {
        assert!(
            grid.windows(2).all(|w| w[1] > w[0]),
            "shared grid {name} is not strictly increasing"
        );
    }
    grids
}

/// Read every `*.json` element file in `dir`, sorted by atomic number.
pub fn parse_elements(dir: &Path, grids: &SharedGridsRecord) -> Vec<ElementRecord> {
    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .expect("failed to read elements directory")
        .map(|entry| entry.expect("failed to read directory entry").path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut records: Vec<ElementRecord> = paths
        .iter()
        .map(|path| parse_element(path, grids))
        .collect();
    records.sort_by_key(|r| r.atomic_number);

    for pair in records.windows(2) {
        assert!(
            pair[0].atomic_number != pair[1].atomic_number,
            "element Z = {} defined twice",
            pair[0].atomic_number
        );
    }
    records
}

fn parse_element(path: &Path, grids: &SharedGridsRecord) -> ElementRecord {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()));
    let mut record: ElementRecord = serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("failed to parse {}: {e}", path.display()));

    let n = record.energy.len();
    assert!(n >= 2, "{}: energy grid too short", record.symbol);
    assert!(
        record.energy.windows(2).all(|w| w[1] > w[0]),
        "{}: energy grid is not strictly increasing",
        record.symbol
    );
    for (name, xs) in [
        ("coherent", &record.coherent.xs),
        ("incoherent", &record.incoherent.xs),
        ("photoelectric", &record.photoelectric),
        ("pair_production_electron", &record.pair_production_electron),
    ] {
        assert_eq!(xs.len(), n, "{}: {name} length", record.symbol);
    }

    // Shells without an explicit threshold start where the grid first
    // reaches their binding energy
    for shell in &mut record.subshells {
        if shell.xs.len() < n && shell.threshold_idx == 0 {
            shell.threshold_idx = (n - shell.xs.len()) as u32;
        }
        assert_eq!(
            shell.threshold_idx as usize + shell.xs.len(),
            n,
            "{} {}: subshell cross section does not end on the grid",
            record.symbol,
            shell.designator
        );
    }

    let profiles = &record.compton_profiles.profiles;
    assert_eq!(
        profiles.cols as usize,
        grids.compton_profile_pz.len(),
        "{}: Compton profile columns",
        record.symbol
    );
    if let Some(brem) = &record.bremsstrahlung {
        assert_eq!(
            (brem.dcs.rows as usize, brem.dcs.cols as usize),
            (
                grids.ttb_electron_energy.len(),
                grids.ttb_photon_fraction.len()
            ),
            "{}: bremsstrahlung DCS shape",
            record.symbol
        );
    }
    record
}
