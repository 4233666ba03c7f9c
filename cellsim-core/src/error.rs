//! Error types for the tick engine.
//!
//! Every error is raised before any agent is touched, so a rejected tick
//! leaves the population exactly as it was.

use core::fmt;

/// Result type for engine operations.
pub type Result<T> = core::result::Result<T, SimError>;

/// Errors that can occur while configuring or advancing a simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Invalid parameters or species layout.
    Config(ConfigError),
    /// Population arrays that do not match the configuration.
    State(StateError),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Config(e) => write!(f, "Config error: {}", e),
            SimError::State(e) => write!(f, "State error: {}", e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Config(e) => Some(e),
            SimError::State(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SimError {
    fn from(e: ConfigError) -> Self {
        SimError::Config(e)
    }
}

impl From<StateError> for SimError {
    fn from(e: StateError) -> Self {
        SimError::State(e)
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Arena width or height is not a positive finite number.
    InvalidDomain { width: f64, height: f64 },
    /// A parameter is NaN or infinite.
    NotFinite { name: &'static str },
    /// A radius or speed is negative.
    Negative { name: &'static str, value: f64 },
    /// The hard-core radius must be strictly below the interaction cutoff.
    RadiiOrder { core: f64, cutoff: f64 },
    /// Species cutoffs are unordered or fall outside `[0, n]`.
    SpeciesBoundaries { bounds: [i64; 3] },
    /// Species counts overflow the index space.
    PopulationOverflow,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDomain { width, height } => {
                write!(f, "arena must be positive and finite, got {}x{}", width, height)
            }
            ConfigError::NotFinite { name } => write!(f, "{} must be finite", name),
            ConfigError::Negative { name, value } => {
                write!(f, "{} must be non-negative, got {}", name, value)
            }
            ConfigError::RadiiOrder { core, cutoff } => write!(
                f,
                "hard-core radius {} must be below interaction radius {}",
                core, cutoff
            ),
            ConfigError::SpeciesBoundaries { bounds } => write!(
                f,
                "species boundaries {:?} must be ascending and within the population",
                bounds
            ),
            ConfigError::PopulationOverflow => write!(f, "species counts overflow"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Population state errors.
#[derive(Debug, Clone, PartialEq)]
pub enum StateError {
    /// An agent array does not have the expected length.
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::LengthMismatch {
                field,
                expected,
                actual,
            } => write!(
                f,
                "{} has {} entries, expected {}",
                field, actual, expected
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StateError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_display_wraps_family() {
        let err: SimError = ConfigError::RadiiOrder {
            core: 2.0,
            cutoff: 1.0,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Config error: hard-core radius 2 must be below interaction radius 1"
        );
    }

    #[test]
    fn test_length_mismatch_message() {
        let err: SimError = StateError::LengthMismatch {
            field: "pos_x",
            expected: 4,
            actual: 3,
        }
        .into();
        assert_eq!(err.to_string(), "State error: pos_x has 3 entries, expected 4");
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_every_family_is_a_std_error() {
        fn boxed<E: std::error::Error + Send + Sync + 'static>(e: E) -> Box<dyn std::error::Error> {
            Box::new(e)
        }
        let config = boxed(ConfigError::PopulationOverflow);
        assert_eq!(config.to_string(), "species counts overflow");
        let state = boxed(StateError::LengthMismatch {
            field: "heading_y",
            expected: 2,
            actual: 1,
        });
        assert!(state.to_string().starts_with("heading_y"));

        let wrapped = SimError::from(ConfigError::PopulationOverflow);
        let source = std::error::Error::source(&wrapped).unwrap();
        assert_eq!(source.to_string(), "species counts overflow");
    }
}
