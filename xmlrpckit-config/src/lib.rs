use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Operating mode for the XML-RPC layer.
///
/// `Limited` only exposes views that were explicitly registered for
/// XML-RPC. `Omnipresent` additionally installs the traversal catch-all
/// view and forces the XML-RPC renderer on every classified request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Limited,
    Omnipresent,
}

fn default_mode() -> Mode {
    Mode::Limited
}

fn default_repr_permission() -> String {
    "view".to_string()
}

/// xmlrpckit settings loaded from YAML.
///
/// All keys are optional; a missing key falls back to its default, so an
/// empty mapping (`{}`) yields a limited-mode configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Operating mode (default: `limited`)
    #[serde(default = "default_mode")]
    pub mode: Mode,
    /// Permission required for `__repr__` introspection over traversal
    /// (default: `"view"`)
    #[serde(default = "default_repr_permission")]
    pub repr_permission: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            repr_permission: default_repr_permission(),
        }
    }
}

impl Settings {
    /// Loads settings from a YAML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML settings file
    ///
    /// # Returns
    ///
    /// Returns the parsed settings or an error if the file cannot be read
    /// or parsed.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use xmlrpckit_config::Settings;
    /// use std::path::Path;
    ///
    /// let settings = Settings::from_file(Path::new("xmlrpc.yaml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let settings = serde_yaml_ng::from_str(&contents)?;
        Ok(settings)
    }

    /// Parses settings from a YAML string.
    ///
    /// This is primarily used for testing and programmatic configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use xmlrpckit_config::{Mode, Settings};
    ///
    /// let yaml = r#"
    /// mode: omnipresent
    /// repr_permission: "inspect"
    /// "#;
    ///
    /// let settings = Settings::parse(yaml).unwrap();
    /// assert_eq!(settings.mode, Mode::Omnipresent);
    /// assert_eq!(settings.repr_permission, "inspect");
    /// ```
    pub fn parse(contents: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let settings = serde_yaml_ng::from_str(contents)?;
        Ok(settings)
    }
}
