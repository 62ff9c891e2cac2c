//! Typed view of an effective app configuration.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result as ConfigResult};

/// Ordered vendor mapping: vendor name to a path relative to the workspace.
pub type VendorMap = IndexMap<String, String>;

/// How debug builds choose between `vendorDebug` and `vendor`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VendorPrecedence {
    /// Debug builds read `vendorDebug` only; a missing key means no vendors.
    #[default]
    Strict,
    /// Debug builds read `vendorDebug`, falling back to `vendor` when absent.
    DebugFallback,
}

/// The recognized options of a merged configuration document.
///
/// Unknown keys are kept in `extra` so nothing from either source is lost.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minify: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub srcmaps: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_vendor: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<VendorMap>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_debug: Option<VendorMap>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl AppConfig {
    /// Create from an already merged document.
    ///
    /// A null document is treated as empty.
    ///
    /// # Example
    ///
    /// ```
    /// use lovin_config::AppConfig;
    /// use serde_json::json;
    ///
    /// let config = AppConfig::from_value(json!({
    ///     "minify": false,
    ///     "vendor": { "jquery": "vendor/jquery.js" }
    /// }))
    /// .unwrap();
    ///
    /// assert_eq!(config.minify, Some(false));
    /// assert_eq!(config.vendor.unwrap()["jquery"], "vendor/jquery.js");
    /// ```
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }

        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            message: e.to_string(),
        })
    }

    /// Convert to serde_json::Value
    pub fn to_value(&self) -> ConfigResult<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            message: e.to_string(),
        })
    }

    /// Whether declared vendor files are prepended to the script list.
    ///
    /// Only an explicit `defaultVendor: false` turns this off.
    pub fn includes_default_vendor(&self) -> bool {
        self.default_vendor != Some(false)
    }

    /// Select the vendor mapping for a build mode.
    ///
    /// Returns `None` when the selected key is not declared.
    pub fn vendor_map(&self, debug: bool, precedence: VendorPrecedence) -> Option<&VendorMap> {
        if !debug {
            return self.vendor.as_ref();
        }

        match precedence {
            VendorPrecedence::Strict => self.vendor_debug.as_ref(),
            VendorPrecedence::DebugFallback => {
                self.vendor_debug.as_ref().or(self.vendor.as_ref())
            }
        }
    }
}
