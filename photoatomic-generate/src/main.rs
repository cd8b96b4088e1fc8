mod parsers;

use std::io::Write;
use std::path::{Path, PathBuf};

use photoatomic_data::PhotonLibraryRecord;

fn main() {
    let workspace = Path::new(env!("CARGO_MANIFEST_DIR")).parent().unwrap();
    let data_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| workspace.join("data_sources"));

    if !data_dir.exists() {
        eprintln!("Error: data_sources directory not found at {:?}", data_dir);
        eprintln!(
            "Expected shared_grids.json, Version.dat and elements/*.json; \
             pass another directory as the first argument"
        );
        std::process::exit(1);
    }

    println!("Parsing photon data from {:?}...", data_dir);

    let version_path = data_dir.join("Version.dat");
    let version = if version_path.exists() {
        parsers::parse_version(&version_path)
    } else {
        Vec::new()
    };
    println!("  Version: {} entries", version.len());

    let shared = parsers::parse_shared_grids(&data_dir.join("shared_grids.json"));
    println!(
        "  Shared grids: {} pz, {} TTB energies, {} photon fractions",
        shared.compton_profile_pz.len(),
        shared.ttb_electron_energy.len(),
        shared.ttb_photon_fraction.len()
    );

    let elements = parsers::parse_elements(&data_dir.join("elements"), &shared);
    let n_shells: usize = elements.iter().map(|e| e.subshells.len()).sum();
    let n_ttb = elements
        .iter()
        .filter(|e| e.stopping_powers.is_some() && e.bremsstrahlung.is_some())
        .count();
    println!(
        "  Elements: {} ({} subshells, {} with bremsstrahlung data)",
        elements.len(),
        n_shells,
        n_ttb
    );

    let library = PhotonLibraryRecord {
        version,
        shared,
        elements,
    };

    println!("\nSerializing with postcard...");
    let serialized = postcard::to_allocvec(&library).expect("postcard serialization failed");
    println!(
        "  Serialized size: {} bytes ({:.2} MB)",
        serialized.len(),
        serialized.len() as f64 / 1_048_576.0
    );

    println!("Compressing with zstd (level 19)...");
    let compressed = zstd::encode_all(&serialized[..], 19).expect("zstd compression failed");
    println!(
        "  Compressed size: {} bytes ({:.2} MB), ratio {:.1}x",
        compressed.len(),
        compressed.len() as f64 / 1_048_576.0,
        serialized.len() as f64 / compressed.len() as f64
    );

    let out_path = workspace
        .join("photoatomic-lib")
        .join("data")
        .join("photon_library.bin.zst");

    std::fs::create_dir_all(out_path.parent().unwrap()).unwrap();
    let mut f = std::fs::File::create(&out_path).expect("failed to create output file");
    f.write_all(&compressed)
        .expect("failed to write compressed data");

    println!("\nWrote {:?}", out_path);

    println!("Verifying round-trip deserialization...");
    let decompressed = zstd::decode_all(&compressed[..]).expect("zstd decompression failed");
    assert_eq!(decompressed.len(), serialized.len());
    let check: PhotonLibraryRecord =
        postcard::from_bytes(&decompressed).expect("postcard deserialization failed");
    assert_eq!(check.elements.len(), library.elements.len());
    println!("  Round-trip OK!");
}
