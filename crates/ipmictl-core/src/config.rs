//! Configuration loading and types

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{IpmiError, Result};

/// Environment variable pointing at an explicit configuration file
pub const CONFIG_ENV: &str = "IPMICTL_CONFIG";

/// Top-level configuration for ipmictl
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Settings shared with the rest of the cluster tooling
    #[serde(default)]
    pub common: CommonConfig,
    /// IPMI specific settings
    #[serde(default)]
    pub ipmi: IpmiConfig,
}

/// `[common]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommonConfig {
    /// Secrets file holding `IMMUSER` and `IMMPASSWORD`
    #[serde(default = "default_passwd_file")]
    pub master_passwd_file: PathBuf,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            master_passwd_file: default_passwd_file(),
        }
    }
}

fn default_passwd_file() -> PathBuf {
    PathBuf::from("/etc/ipmictl/master.passwd")
}

/// `[ipmi]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpmiConfig {
    /// Address of the conman daemon
    #[serde(default)]
    pub conmand: Option<String>,
    /// Prefix turning a node name into its management controller name
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// ipmitool interface
    #[serde(default = "default_interface")]
    pub interface: String,
}

impl Default for IpmiConfig {
    fn default() -> Self {
        Self {
            conmand: None,
            prefix: default_prefix(),
            interface: default_interface(),
        }
    }
}

fn default_prefix() -> String {
    "imm".to_string()
}

fn default_interface() -> String {
    "lanplus".to_string()
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    /// Returns `IpmiError::ConfigError` if the file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| IpmiError::ConfigError(format!("{}: {e}", path.display())))?;
        Self::parse(&content)
            .map_err(|e| IpmiError::ConfigError(format!("{}: {e}", path.display())))
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// Returns the TOML error message when the document is invalid
    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load from `explicit`, the environment, or the default paths
    ///
    /// Falls back to built-in defaults when no file is found.
    ///
    /// # Errors
    /// Returns an error if a file is found but cannot be loaded
    pub fn load_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::load(Path::new(&path));
        }

        for path in Self::search_paths() {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading configuration");
                return Self::load(&path);
            }
        }

        tracing::warn!("no config file found, using defaults");
        Ok(Config::default())
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from("ipmictl.toml"),
            PathBuf::from("/etc/ipmictl/ipmictl.toml"),
        ];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("ipmictl/ipmictl.toml"));
        }
        paths
    }

    /// Look up a value by `(section, key)`
    pub fn get(&self, section: &str, key: &str) -> Option<String> {
        match (section, key) {
            ("common", "master_passwd_file") => {
                Some(self.common.master_passwd_file.display().to_string())
            }
            ("ipmi", "conmand") => self.ipmi.conmand.clone(),
            ("ipmi", "prefix") => Some(self.ipmi.prefix.clone()),
            ("ipmi", "interface") => Some(self.ipmi.interface.clone()),
            _ => None,
        }
        .filter(|v| !v.is_empty())
    }

    /// Like [`Config::get`] but a missing value is an error
    ///
    /// # Errors
    /// Returns `IpmiError::ConfigError` naming the section and key
    pub fn require(&self, section: &str, key: &str) -> Result<String> {
        self.get(section, key).ok_or_else(|| {
            IpmiError::ConfigError(format!("missing value for [{section}] {key}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full() {
        let config = Config::parse(
            r#"
[common]
master_passwd_file = "/srv/secrets/passwd"

[ipmi]
conmand = "admin1"
prefix = "bmc-"
interface = "lan"
"#,
        )
        .unwrap();

        assert_eq!(
            config.common.master_passwd_file,
            PathBuf::from("/srv/secrets/passwd")
        );
        assert_eq!(config.require("ipmi", "conmand").unwrap(), "admin1");
        assert_eq!(config.ipmi.prefix, "bmc-");
        assert_eq!(config.ipmi.interface, "lan");
    }

    #[test]
    fn test_defaults() {
        let config = Config::parse("").unwrap();

        assert_eq!(config.ipmi.prefix, "imm");
        assert_eq!(config.ipmi.interface, "lanplus");
        assert!(config.get("ipmi", "conmand").is_none());
    }

    #[test]
    fn test_require_missing_key() {
        let config = Config::default();
        let err = config.require("ipmi", "conmand").unwrap_err();

        assert!(matches!(err, IpmiError::ConfigError(_)));
        assert!(err.to_string().contains("[ipmi] conmand"));
    }

    #[test]
    fn test_unknown_key() {
        let config = Config::default();
        assert!(config.get("nope", "nothing").is_none());
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Config::parse("[ipmi\nprefix=").is_err());
    }
}
