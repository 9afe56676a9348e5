use std::fmt;

/// Compile-time metadata embedded by `build.rs`.
#[derive(Debug, Clone, Copy)]
pub struct BuildMetadata {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub git_status: &'static str,
    pub timestamp: &'static str,
    pub target: &'static str,
    pub profile: &'static str,
    pub rustc: &'static str,
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn current() -> BuildMetadata {
    BuildMetadata {
        version: VERSION,
        git_hash: option_env!("SQUAREONE_BUILD_HASH").unwrap_or("unknown"),
        git_status: option_env!("SQUAREONE_BUILD_STATUS").unwrap_or("unknown"),
        timestamp: option_env!("SQUAREONE_BUILD_TIMESTAMP").unwrap_or("unknown"),
        target: option_env!("SQUAREONE_BUILD_TARGET").unwrap_or("unknown"),
        profile: option_env!("SQUAREONE_BUILD_PROFILE").unwrap_or("unknown"),
        rustc: option_env!("SQUAREONE_BUILD_RUSTC").unwrap_or("unknown"),
    }
}

impl BuildMetadata {
    /// `(label, value)` rows for the `version` command.
    pub fn rows(&self) -> [(&'static str, &'static str); 6] {
        [
            ("commit", self.git_hash),
            ("tree", self.git_status),
            ("built", self.timestamp),
            ("target", self.target),
            ("profile", self.profile),
            ("rustc", self.rustc),
        ]
    }
}

impl fmt::Display for BuildMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "squareone {} ({}", self.version, self.git_hash)?;
        if self.git_status == "dirty" {
            f.write_str("-dirty")?;
        }
        write!(f, ", {})", self.profile)
    }
}
