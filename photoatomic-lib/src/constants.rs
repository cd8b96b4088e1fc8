/// Avogadro's number (mol^-1)
pub const AVOGADRO: f64 = 6.02214076e23;

/// Planck's constant times speed of light (eV·Å)
pub const PLANCK_HC_ANGSTROM: f64 = 12398.419843320026;

/// Electron rest mass energy (eV)
pub const MASS_ELECTRON_EV: f64 = 0.51099895000e6;

/// Inverse fine-structure constant; also the speed of light in atomic units
pub const INVERSE_FINE_STRUCTURE: f64 = 137.035999084;

/// Classical electron radius (cm)
pub const R_ELECTRON_CM: f64 = 2.8179403262e-13;

/// Square centimetres per barn
pub const CM2_PER_BARN: f64 = 1.0e-24;

/// Square centimetres per millibarn
pub const CM2_PER_MILLIBARN: f64 = 1.0e-27;

/// Floor used for the logarithm of zero-valued tabulated data
pub const LOG_FLOOR: f64 = -500.0;

/// Momentum transfer per unit reduced energy, m_e c² / hc (Å^-1)
pub const MOMENTUM_PER_ALPHA: f64 = MASS_ELECTRON_EV / PLANCK_HC_ANGSTROM;
