//! Platform target types.
//!
//! A PlatformTarget identifies the build target a descriptor set is being
//! resolved for. The set is closed: every supported platform is a variant,
//! and per-platform packaging behavior hangs off capability methods rather
//! than conditional chains at the call sites.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A build target platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformTarget {
    /// 64-bit Windows
    #[serde(alias = "windows")]
    Win64,

    /// macOS
    #[serde(alias = "macos")]
    Mac,

    /// Linux (x86_64)
    Linux,

    /// iOS
    Ios,

    /// Android (multi-architecture)
    Android,
}

impl PlatformTarget {
    /// All supported platforms, in canonical order.
    pub const ALL: [PlatformTarget; 5] = [
        PlatformTarget::Win64,
        PlatformTarget::Mac,
        PlatformTarget::Linux,
        PlatformTarget::Ios,
        PlatformTarget::Android,
    ];

    /// Canonical identifier used in manifests and output.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformTarget::Win64 => "win64",
            PlatformTarget::Mac => "mac",
            PlatformTarget::Linux => "linux",
            PlatformTarget::Ios => "ios",
            PlatformTarget::Android => "android",
        }
    }

    /// Whether shared libraries on this platform use deferred symbol binding.
    ///
    /// Delay-load entries are only valid on platforms where this is true;
    /// everywhere else a shared library is a direct link dependency.
    pub fn supports_delay_load(&self) -> bool {
        matches!(self, PlatformTarget::Win64 | PlatformTarget::Linux)
    }

    /// Whether this platform packages native dependencies as app bundles
    /// or frameworks instead of raw library paths.
    pub fn uses_bundles(&self) -> bool {
        matches!(self, PlatformTarget::Mac | PlatformTarget::Ios)
    }

    /// Whether this platform fans a library template out over multiple
    /// CPU architectures.
    pub fn is_multi_arch(&self) -> bool {
        matches!(self, PlatformTarget::Android)
    }

    /// Default architecture set for multi-arch platforms.
    ///
    /// Descriptors may override this with an explicit `architectures` list.
    pub fn default_architectures(&self) -> &'static [&'static str] {
        match self {
            PlatformTarget::Android => &["armeabi-v7a", "arm64-v8a", "x86", "x86_64"],
            _ => &[],
        }
    }

    /// Typical shared-library extension on this platform.
    pub fn shared_lib_extension(&self) -> &'static str {
        match self {
            PlatformTarget::Win64 => "dll",
            PlatformTarget::Mac | PlatformTarget::Ios => "dylib",
            PlatformTarget::Linux | PlatformTarget::Android => "so",
        }
    }
}

impl fmt::Display for PlatformTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "win64" | "windows" => Ok(PlatformTarget::Win64),
            "mac" | "macos" => Ok(PlatformTarget::Mac),
            "linux" => Ok(PlatformTarget::Linux),
            "ios" => Ok(PlatformTarget::Ios),
            "android" => Ok(PlatformTarget::Android),
            _ => Err(format!(
                "unknown platform '{}'; expected one of: win64, mac, linux, ios, android",
                s
            )),
        }
    }
}
