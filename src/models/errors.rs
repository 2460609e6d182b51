use std::fmt;

/// Recoverable errors of the bullet crate.
///
/// Only data coming from outside the simulation can fail this way
/// (weapon tables, configuration, save files). Broken simulation
/// invariants panic instead.
#[derive(Debug)]
pub enum BulletError {
    /// JSON could not be read or written
    Serialization(serde_json::Error),
    /// I/O error while reading or writing data
    IoError(std::io::Error),
    /// Save was written by an incompatible layout
    UnsupportedSaveVersion { found: u32, expected: u32 },
    /// Save is internally inconsistent
    CorruptSave(String),
    /// Weapon table entry is unusable
    InvalidWeaponTable(String),
    /// Configuration value out of range
    InvalidConfig(String),
}

/// Type alias for Results using BulletError
pub type BulletResult<T> = Result<T, BulletError>;

impl fmt::Display for BulletError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BulletError::Serialization(err) => write!(f, "Serialization error: {}", err),
            BulletError::IoError(err) => write!(f, "I/O error: {}", err),
            BulletError::UnsupportedSaveVersion { found, expected } => {
                write!(
                    f,
                    "Unsupported save version {} (expected {})",
                    found, expected
                )
            }
            BulletError::CorruptSave(msg) => write!(f, "Corrupt save: {}", msg),
            BulletError::InvalidWeaponTable(msg) => write!(f, "Invalid weapon table: {}", msg),
            BulletError::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for BulletError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BulletError::Serialization(err) => Some(err),
            BulletError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BulletError {
    fn from(err: std::io::Error) -> Self {
        BulletError::IoError(err)
    }
}

impl From<serde_json::Error> for BulletError {
    fn from(err: serde_json::Error) -> Self {
        BulletError::Serialization(err)
    }
}
