use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, warn};
use photoatomic_data::{ComptonProfileRecord, ElementRecord, TransitionRecord};

use crate::bremsstrahlung::{self, Bremsstrahlung};
use crate::constants::LOG_FLOOR;
use crate::error::{PhotonError, Result};
use crate::grids::SharedGrids;
use crate::interp::{is_strictly_increasing, log_or_floor};
use crate::settings::{ElectronTreatment, PhotonSettings};
use crate::subshell::{ElectronSubshell, Transition, designator_label};
use crate::table::Table2;
use crate::tabulated::Tabulated1D;

/// Momentum distribution of bound electrons, per Compton-profile shell.
///
/// `pdf` and `cdf` have one row per profile shell and one column per point
/// of the shared momentum grid.
#[derive(Debug, Clone)]
pub struct ComptonProfiles {
    pub pdf: Table2,
    pub cdf: Table2,
    /// Binding energy of each profile shell (eV)
    pub binding_energy: Vec<f64>,
    /// Probability of striking an electron of each profile shell
    pub electron_pdf: Vec<f64>,
}

/// Electron stopping powers on the shared bremsstrahlung energy grid.
#[derive(Debug, Clone)]
pub struct StoppingPowers {
    /// Mean excitation energy (eV)
    pub mean_excitation_energy: f64,
    /// Mass collision stopping power (eV cm²/g)
    pub collision: Vec<f64>,
    /// Mass radiative stopping power (eV cm²/g)
    pub radiative: Vec<f64>,
}

/// Immutable photon interaction data for one element.
///
/// Cross-section channels are stored as natural logarithms aligned with
/// the energy grid; zeros are stored as [`crate::constants::LOG_FLOOR`].
#[derive(Debug, Clone)]
pub struct PhotonInteraction {
    name: String,
    long_name: String,
    z: u32,
    molar_mass: f64,

    energy: Vec<f64>,
    log_energy: Vec<f64>,
    coherent: Vec<f64>,
    incoherent: Vec<f64>,
    photoelectric_total: Vec<f64>,
    /// Largest relative gap between the tabulated photoelectric total and
    /// the sum of the subshell cross sections
    photoelectric_mismatch: f64,
    pair_production_total: Vec<f64>,
    pair_production_electron: Vec<f64>,
    pair_production_nuclear: Vec<f64>,

    incoherent_form_factor: Tabulated1D,
    coherent_int_form_factor: Tabulated1D,
    coherent_anomalous_real: Option<Tabulated1D>,
    coherent_anomalous_imag: Option<Tabulated1D>,

    shell_map: HashMap<u8, usize>,
    shells: Vec<ElectronSubshell>,

    compton: ComptonProfiles,
    stopping_powers: Option<StoppingPowers>,
    /// Scaled bremsstrahlung DCS (mb): rows follow the shared electron
    /// energy grid, columns the shared reduced photon energy grid
    dcs: Option<Table2>,
    ttb: Option<Bremsstrahlung>,

    grids: Arc<SharedGrids>,
}

impl PhotonInteraction {
    /// Build and validate an element from its persisted record.
    pub fn from_record(
        record: &ElementRecord,
        grids: Arc<SharedGrids>,
        settings: &PhotonSettings,
    ) -> Result<Self> {
        let name = record.symbol.clone();
        let n = record.energy.len();

        if n < 2 {
            return Err(invalid(&name, "energy", "grid needs at least two points"));
        }
        if !is_strictly_increasing(&record.energy) {
            return Err(invalid(&name, "energy", "grid is not strictly increasing"));
        }
        if !(record.energy[0] > 0.0) {
            return Err(invalid(&name, "energy", "grid energies must be positive"));
        }
        if !(record.molar_mass > 0.0) {
            return Err(invalid(&name, "molar_mass", "must be positive"));
        }

        let coherent = log_channel(&name, "coherent", &record.coherent.xs, n)?;
        let incoherent = log_channel(&name, "incoherent", &record.incoherent.xs, n)?;
        let photoelectric_total = log_channel(&name, "photoelectric", &record.photoelectric, n)?;
        check_channel(
            &name,
            "pair_production_electron",
            &record.pair_production_electron,
            n,
        )?;
        let nuclear = match &record.pair_production_nuclear {
            Some(xs) => {
                check_channel(&name, "pair_production_nuclear", xs, n)?;
                xs.clone()
            }
            None => vec![0.0; n],
        };
        let pair_production_total = record
            .pair_production_electron
            .iter()
            .zip(&nuclear)
            .map(|(e, n)| log_or_floor(e + n))
            .collect();
        let pair_production_electron = record
            .pair_production_electron
            .iter()
            .map(|&v| log_or_floor(v))
            .collect();
        let pair_production_nuclear = nuclear.iter().map(|&v| log_or_floor(v)).collect();

        let incoherent_form_factor =
            Tabulated1D::from_record(&record.incoherent.scattering_factor)?;
        let coherent_int_form_factor =
            Tabulated1D::from_record(&record.coherent.integrated_form_factor)?;
        if coherent_int_form_factor.y().windows(2).any(|w| w[1] < w[0]) {
            return Err(invalid(
                &name,
                "coherent/integrated_form_factor",
                "integrated form factor must be non-decreasing",
            ));
        }
        let coherent_anomalous_real = record
            .coherent
            .anomalous_real
            .as_ref()
            .map(Tabulated1D::from_record)
            .transpose()?;
        let coherent_anomalous_imag = record
            .coherent
            .anomalous_imag
            .as_ref()
            .map(Tabulated1D::from_record)
            .transpose()?;

        let (shell_map, shells) = build_shells(&name, record, n, settings.transition_tolerance)?;
        let photoelectric_mismatch = subshell_sum_mismatch(&record.photoelectric, &shells);
        if photoelectric_mismatch > PHOTOELECTRIC_SUM_TOLERANCE {
            warn!(
                "{name}: photoelectric total differs from the subshell sum by up to {:.2}%",
                100.0 * photoelectric_mismatch
            );
        }
        let compton = build_compton_profiles(&name, &record.compton_profiles, &grids)?;

        let stopping_powers = match &record.stopping_powers {
            Some(sp) => {
                let n_e = grids.ttb_e_grid.len();
                check_channel(&name, "stopping_powers/collision", &sp.collision, n_e)?;
                check_channel(&name, "stopping_powers/radiative", &sp.radiative, n_e)?;
                Some(StoppingPowers {
                    mean_excitation_energy: sp.mean_excitation_energy,
                    collision: sp.collision.clone(),
                    radiative: sp.radiative.clone(),
                })
            }
            None => None,
        };
        let dcs = match &record.bremsstrahlung {
            Some(brem) => {
                if grids.ttb_e_grid.len() < 2 || grids.ttb_k_grid.len() < 2 {
                    return Err(invalid(
                        &name,
                        "bremsstrahlung/dcs",
                        "shared electron energy and photon fraction grids need at least two points",
                    ));
                }
                let dcs = Table2::from_record(&brem.dcs)?;
                let expected = (grids.ttb_e_grid.len(), grids.ttb_k_grid.len());
                if dcs.shape() != expected {
                    return Err(PhotonError::LengthMismatch {
                        element: name.clone(),
                        dataset: "bremsstrahlung/dcs".to_string(),
                        expected: expected.0 * expected.1,
                        found: dcs.values().len(),
                    });
                }
                if dcs.values().iter().any(|v| !v.is_finite() || *v < 0.0) {
                    return Err(invalid(&name, "bremsstrahlung/dcs", "negative or non-finite value"));
                }
                Some(dcs)
            }
            None => None,
        };

        let ttb = if settings.electron_treatment == ElectronTreatment::Ttb {
            match (&stopping_powers, &dcs) {
                (Some(sp), Some(dcs)) if grids.ttb_e_grid.len() >= 2 => {
                    Some(bremsstrahlung::build_tables(
                        record.atomic_number as u32,
                        record.molar_mass,
                        sp,
                        dcs,
                        &grids,
                    ))
                }
                _ => {
                    warn!(
                        "{name}: thick-target bremsstrahlung requested but stopping powers \
                         or bremsstrahlung data are missing; electrons deposit locally"
                    );
                    None
                }
            }
        } else {
            None
        };

        debug!(
            "loaded {name} (Z = {}): {n} grid points, {} subshells",
            record.atomic_number,
            shells.len()
        );

        Ok(PhotonInteraction {
            name,
            long_name: record.name.to_lowercase(),
            z: record.atomic_number as u32,
            molar_mass: record.molar_mass,
            log_energy: record.energy.iter().map(|e| e.ln()).collect(),
            energy: record.energy.clone(),
            coherent,
            incoherent,
            photoelectric_total,
            photoelectric_mismatch,
            pair_production_total,
            pair_production_electron,
            pair_production_nuclear,
            incoherent_form_factor,
            coherent_int_form_factor,
            coherent_anomalous_real,
            coherent_anomalous_imag,
            shell_map,
            shells,
            compton,
            stopping_powers,
            dcs,
            ttb,
            grids,
        })
    }

    /// Element symbol
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lower-case element name; empty when the library carries none
    pub fn long_name(&self) -> &str {
        &self.long_name
    }

    pub fn z(&self) -> u32 {
        self.z
    }

    /// Molar mass (g/mol)
    pub fn molar_mass(&self) -> f64 {
        self.molar_mass
    }

    /// Energy grid (eV)
    pub fn energy(&self) -> &[f64] {
        &self.energy
    }

    pub fn log_energy(&self) -> &[f64] {
        &self.log_energy
    }

    pub fn coherent(&self) -> &[f64] {
        &self.coherent
    }

    pub fn incoherent(&self) -> &[f64] {
        &self.incoherent
    }

    pub fn photoelectric_total(&self) -> &[f64] {
        &self.photoelectric_total
    }

    /// Largest relative deviation of the photoelectric total from the sum
    /// of the subshell cross sections over the energy grid.
    pub fn photoelectric_mismatch(&self) -> f64 {
        self.photoelectric_mismatch
    }

    pub fn pair_production_total(&self) -> &[f64] {
        &self.pair_production_total
    }

    pub fn pair_production_electron(&self) -> &[f64] {
        &self.pair_production_electron
    }

    pub fn pair_production_nuclear(&self) -> &[f64] {
        &self.pair_production_nuclear
    }

    /// Incoherent scattering function S(x), x in Å⁻¹
    pub fn incoherent_form_factor(&self) -> &Tabulated1D {
        &self.incoherent_form_factor
    }

    /// Integrated coherent form factor as a function of x² (Å⁻²)
    pub fn coherent_int_form_factor(&self) -> &Tabulated1D {
        &self.coherent_int_form_factor
    }

    pub fn coherent_anomalous_real(&self) -> Option<&Tabulated1D> {
        self.coherent_anomalous_real.as_ref()
    }

    pub fn coherent_anomalous_imag(&self) -> Option<&Tabulated1D> {
        self.coherent_anomalous_imag.as_ref()
    }

    pub fn shells(&self) -> &[ElectronSubshell] {
        &self.shells
    }

    /// Dense shell index for an ENDF designator code.
    pub fn shell_index(&self, designator: u8) -> Result<usize> {
        self.shell_map
            .get(&designator)
            .copied()
            .ok_or_else(|| PhotonError::UnknownShell {
                element: self.name.clone(),
                designator,
            })
    }

    pub fn shell(&self, designator: u8) -> Result<&ElectronSubshell> {
        Ok(&self.shells[self.shell_index(designator)?])
    }

    pub fn compton_profiles(&self) -> &ComptonProfiles {
        &self.compton
    }

    pub fn stopping_powers(&self) -> Option<&StoppingPowers> {
        self.stopping_powers.as_ref()
    }

    pub fn bremsstrahlung_dcs(&self) -> Option<&Table2> {
        self.dcs.as_ref()
    }

    /// Thick-target bremsstrahlung tables; present only when the element
    /// was built for TTB electron treatment and carries the needed data.
    pub fn ttb(&self) -> Option<&Bremsstrahlung> {
        self.ttb.as_ref()
    }

    pub fn grids(&self) -> &Arc<SharedGrids> {
        &self.grids
    }

    /// Binding energy of a Compton-profile shell (eV).
    pub fn profile_binding_energy(&self, i_shell: usize) -> Option<f64> {
        self.compton.binding_energy.get(i_shell).copied()
    }
}

const PHOTOELECTRIC_SUM_TOLERANCE: f64 = 1e-3;

fn subshell_sum_mismatch(total: &[f64], shells: &[ElectronSubshell]) -> f64 {
    let mut sum = vec![0.0; total.len()];
    for shell in shells {
        for (s, xs) in sum[shell.threshold..].iter_mut().zip(&shell.cross_section) {
            if *xs > LOG_FLOOR {
                *s += xs.exp();
            }
        }
    }
    total
        .iter()
        .zip(&sum)
        .filter(|(t, s)| **t > 0.0 || **s > 0.0)
        .map(|(t, s)| (t - s).abs() / t.max(*s))
        .fold(0.0, f64::max)
}

fn invalid(element: &str, dataset: &str, reason: &str) -> PhotonError {
    PhotonError::InvalidGrid {
        element: element.to_string(),
        dataset: dataset.to_string(),
        reason: reason.to_string(),
    }
}

fn check_channel(element: &str, dataset: &str, xs: &[f64], n: usize) -> Result<()> {
    if xs.len() != n {
        return Err(PhotonError::LengthMismatch {
            element: element.to_string(),
            dataset: dataset.to_string(),
            expected: n,
            found: xs.len(),
        });
    }
    if xs.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err(invalid(element, dataset, "negative or non-finite value"));
    }
    Ok(())
}

fn log_channel(element: &str, dataset: &str, xs: &[f64], n: usize) -> Result<Vec<f64>> {
    check_channel(element, dataset, xs, n)?;
    Ok(xs.iter().map(|&v| log_or_floor(v)).collect())
}

fn build_shells(
    element: &str,
    record: &ElementRecord,
    n_grid: usize,
    tolerance: f64,
) -> Result<(HashMap<u8, usize>, Vec<ElectronSubshell>)> {
    if record.subshells.is_empty() {
        return Err(invalid(element, "subshells", "no subshell data"));
    }

    let mut shell_map = HashMap::new();
    let mut shells = Vec::with_capacity(record.subshells.len());
    for shell_record in &record.subshells {
        let shell = ElectronSubshell::from_record(element, shell_record, n_grid)?;
        if shell_map.insert(shell.designator(), shells.len()).is_some() {
            return Err(invalid(
                element,
                &format!("subshells/{}", shell_record.designator),
                "duplicate subshell designator",
            ));
        }
        shells.push(shell);
    }

    let resolve = |code: u8| -> Result<Option<usize>> {
        if code == 0 {
            return Ok(None);
        }
        shell_map
            .get(&code)
            .copied()
            .map(Some)
            .ok_or_else(|| PhotonError::UnknownShell {
                element: element.to_string(),
                designator: code,
            })
    };

    let mut resolved = Vec::with_capacity(shells.len());
    for shell_record in &record.subshells {
        let transitions = shell_record
            .transitions
            .iter()
            .map(|t: &TransitionRecord| {
                Ok(Transition {
                    primary: resolve(t.primary)?,
                    secondary: resolve(t.secondary)?,
                    energy: t.energy,
                    probability: t.probability,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        resolved.push(transitions);
    }
    for (shell, transitions) in shells.iter_mut().zip(resolved) {
        if shell.set_transitions(element, transitions, tolerance)? {
            debug!("{element} {}: renormalized transition probabilities", shell.label());
        }
    }

    check_acyclic(element, &shells)?;
    Ok((shell_map, shells))
}

/// Reject transition tables in which a vacancy can lead back to itself.
fn check_acyclic(element: &str, shells: &[ElectronSubshell]) -> Result<()> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        New,
        Active,
        Done,
    }

    let mut marks = vec![Mark::New; shells.len()];
    for start in 0..shells.len() {
        if marks[start] != Mark::New {
            continue;
        }
        // (shell, next transition slot to visit); each transition has two
        // outgoing edges, primary then secondary
        let mut stack = vec![(start, 0usize)];
        marks[start] = Mark::Active;
        while let Some(&(node, slot)) = stack.last() {
            let transitions = shells[node].transitions();
            if slot >= 2 * transitions.len() {
                marks[node] = Mark::Done;
                stack.pop();
                continue;
            }
            let top = stack.len() - 1;
            stack[top].1 += 1;
            let t = &transitions[slot / 2];
            let target = if slot % 2 == 0 { t.primary } else { t.secondary };
            let Some(next) = target else { continue };
            match marks[next] {
                Mark::Active => {
                    return Err(PhotonError::TransitionCycle {
                        element: element.to_string(),
                        shell: designator_label(shells[next].designator())
                            .unwrap_or("?")
                            .to_string(),
                    });
                }
                Mark::New => {
                    marks[next] = Mark::Active;
                    stack.push((next, 0));
                }
                Mark::Done => {}
            }
        }
    }
    Ok(())
}

fn build_compton_profiles(
    element: &str,
    record: &ComptonProfileRecord,
    grids: &SharedGrids,
) -> Result<ComptonProfiles> {
    let pz = &grids.compton_profile_pz;
    let pdf = Table2::from_record(&record.profiles)?;
    let n_shell = record.num_electrons.len();

    if pz.len() < 2 {
        return Err(invalid(element, "compton_profiles", "shared momentum grid is missing"));
    }
    if n_shell == 0 || record.binding_energy.len() != n_shell {
        return Err(PhotonError::LengthMismatch {
            element: element.to_string(),
            dataset: "compton_profiles/binding_energy".to_string(),
            expected: n_shell,
            found: record.binding_energy.len(),
        });
    }
    if pdf.shape() != (n_shell, pz.len()) {
        return Err(PhotonError::LengthMismatch {
            element: element.to_string(),
            dataset: "compton_profiles/J".to_string(),
            expected: n_shell * pz.len(),
            found: pdf.values().len(),
        });
    }
    if pdf.values().iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err(invalid(element, "compton_profiles/J", "negative or non-finite value"));
    }
    let total_electrons: f64 = record.num_electrons.iter().sum();
    if record.num_electrons.iter().any(|&n| !(n >= 0.0)) || !(total_electrons > 0.0) {
        return Err(invalid(
            element,
            "compton_profiles/num_electrons",
            "electron counts must be non-negative with a positive sum",
        ));
    }

    let mut cdf = Table2::zeros(n_shell, pz.len());
    for i in 0..n_shell {
        let mut c = 0.0;
        for j in 0..pz.len() - 1 {
            c += 0.5 * (pz[j + 1] - pz[j]) * (pdf[(i, j)] + pdf[(i, j + 1)]);
            cdf[(i, j + 1)] = c;
        }
    }

    Ok(ComptonProfiles {
        pdf,
        cdf,
        binding_energy: record.binding_energy.clone(),
        electron_pdf: record
            .num_electrons
            .iter()
            .map(|n| n / total_electrons)
            .collect(),
    })
}
