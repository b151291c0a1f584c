//! Target SDK version policy.
//!
//! Each supported `mcp` SDK release is bound to a fixed template contract.
//! Adding a release means adding a row to [`SUPPORTED_CONTRACTS`].

use crate::error::{Result, WrapError};

const LOWLEVEL_SERVER: &str = include_str!("../templates/lowlevel_server.py.tera");

/// Supported target SDK releases and their templates.
pub const SUPPORTED_CONTRACTS: &[SdkContract] = &[
    SdkContract::new("1.2.0", "lowlevel_server.py", LOWLEVEL_SERVER),
    SdkContract::new("1.3.0", "lowlevel_server.py", LOWLEVEL_SERVER),
    SdkContract::new("1.4.1", "lowlevel_server.py", LOWLEVEL_SERVER),
    SdkContract::new("1.5.0", "lowlevel_server.py", LOWLEVEL_SERVER),
    SdkContract::new("1.6.0", "lowlevel_server.py", LOWLEVEL_SERVER),
];

/// Version suggested when the caller has no preference.
pub const DEFAULT_SDK_VERSION: &str = "1.6.0";

static BUILTIN: SdkVersionPolicy = SdkVersionPolicy {
    contracts: SUPPORTED_CONTRACTS,
    default_version: DEFAULT_SDK_VERSION,
};

/// Template contract for one target SDK release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SdkContract {
    version: &'static str,
    template_name: &'static str,
    template: &'static str,
}

impl SdkContract {
    /// Bind a version to a named template source.
    pub const fn new(
        version: &'static str,
        template_name: &'static str,
        template: &'static str,
    ) -> Self {
        Self {
            version,
            template_name,
            template,
        }
    }

    /// SDK version string.
    pub fn version(&self) -> &'static str {
        self.version
    }

    /// Name the template is registered under when rendering.
    pub fn template_name(&self) -> &'static str {
        self.template_name
    }

    /// Template source.
    pub fn template(&self) -> &'static str {
        self.template
    }
}

/// Immutable table of supported target SDK versions.
#[derive(Debug, Clone, Copy)]
pub struct SdkVersionPolicy {
    contracts: &'static [SdkContract],
    default_version: &'static str,
}

impl SdkVersionPolicy {
    /// Build a policy from a contract table.
    pub const fn new(contracts: &'static [SdkContract], default_version: &'static str) -> Self {
        Self {
            contracts,
            default_version,
        }
    }

    /// The policy shipped with this crate.
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Supported version strings, in table order.
    pub fn supported(&self) -> Vec<&'static str> {
        self.contracts.iter().map(SdkContract::version).collect()
    }

    /// The designated default version.
    pub fn default_version(&self) -> &'static str {
        self.default_version
    }

    /// Select the contract for an exact version string.
    pub fn select(&self, version: &str) -> Result<&'static SdkContract> {
        self.contracts
            .iter()
            .find(|contract| contract.version == version)
            .ok_or_else(|| WrapError::UnsupportedVersion {
                requested: version.to_string(),
                supported: self.supported().into_iter().map(str::to_string).collect(),
            })
    }
}
