//! Caller-facing parameter and result shapes.

use netsetup_core::attrs::AttrMap;
use netsetup_core::reconcile::SetupOptions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parameters of one invocation. Every field defaults, so an empty
/// document is a valid (if pointless) request.
#[derive(Debug, Default, Deserialize)]
pub struct ModuleParams {
    #[serde(default)]
    pub networks: BTreeMap<String, AttrMap>,
    #[serde(default)]
    pub bondings: BTreeMap<String, AttrMap>,
    #[serde(default)]
    pub options: OptionsParams,
}

/// Caller-side option names, translated to the setup service's wire
/// names by [`OptionsParams::into_setup`].
#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct OptionsParams {
    #[serde(default)]
    pub connectivity_check: bool,
    #[serde(default = "default_connectivity_timeout")]
    pub connectivity_timeout: u32,
}

fn default_connectivity_timeout() -> u32 {
    10
}

impl Default for OptionsParams {
    fn default() -> Self {
        Self {
            connectivity_check: false,
            connectivity_timeout: default_connectivity_timeout(),
        }
    }
}

impl OptionsParams {
    pub fn into_setup(self) -> SetupOptions {
        SetupOptions {
            connectivity_check: self.connectivity_check,
            connectivity_timeout: self.connectivity_timeout,
        }
    }
}

/// Result document printed on stdout: either `{"changed": bool}` or
/// `{"failed": true, "msg": "..."}`.
#[derive(Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ModuleResult {
    Changed { changed: bool },
    Failed { failed: bool, msg: String },
}

impl ModuleResult {
    pub fn changed(changed: bool) -> Self {
        ModuleResult::Changed { changed }
    }

    pub fn failed(msg: impl Into<String>) -> Self {
        ModuleResult::Failed {
            failed: true,
            msg: msg.into(),
        }
    }

    /// Success exits 0 regardless of the changed value.
    pub fn exit_code(&self) -> i32 {
        match self {
            ModuleResult::Changed { .. } => 0,
            ModuleResult::Failed { .. } => 1,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"failed": true, "msg": "failed to serialize result"}"#.into())
    }
}
