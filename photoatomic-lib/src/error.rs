use std::fmt;

#[derive(Debug)]
pub enum PhotonError {
    UnknownElement(String),
    UnknownShell { element: String, designator: u8 },
    InvalidGrid { element: String, dataset: String, reason: String },
    LengthMismatch { element: String, dataset: String, expected: usize, found: usize },
    TransitionProbability { element: String, shell: String, sum: f64 },
    TransitionCycle { element: String, shell: String },
    SamplingFailure { kernel: &'static str, iterations: u32 },
    BelowThreshold { alpha: f64, threshold: f64 },
    DataError(String),
    Io(std::io::Error),
}

pub type Result<T> = std::result::Result<T, PhotonError>;

impl fmt::Display for PhotonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownElement(e) => write!(f, "unknown element: {e}"),
            Self::UnknownShell { element, designator } => {
                write!(f, "unknown subshell designator {designator} for element '{element}'")
            }
            Self::InvalidGrid { element, dataset, reason } => {
                write!(f, "invalid dataset '{dataset}' for element '{element}': {reason}")
            }
            Self::LengthMismatch { element, dataset, expected, found } => write!(
                f,
                "dataset '{dataset}' for element '{element}' has {found} values, expected {expected}"
            ),
            Self::TransitionProbability { element, shell, sum } => write!(
                f,
                "transition probabilities of {element} {shell} sum to {sum}, expected 1"
            ),
            Self::TransitionCycle { element, shell } => {
                write!(f, "relaxation transitions of {element} revisit subshell {shell}")
            }
            Self::SamplingFailure { kernel, iterations } => {
                write!(f, "{kernel} sampling did not converge after {iterations} iterations")
            }
            Self::BelowThreshold { alpha, threshold } => {
                write!(f, "reduced energy {alpha} is below the threshold {threshold}")
            }
            Self::DataError(msg) => write!(f, "data error: {msg}"),
            Self::Io(err) => write!(f, "i/o error: {err}"),
        }
    }
}

impl std::error::Error for PhotonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PhotonError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
