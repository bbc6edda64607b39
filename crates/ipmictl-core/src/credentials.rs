//! Management controller credentials read from the shared secrets file

use std::fmt;
use std::path::Path;

use crate::error::{IpmiError, Result};

/// Key holding the management controller user name
pub const USER_KEY: &str = "IMMUSER";
/// Key holding the management controller password
pub const PASSWORD_KEY: &str = "IMMPASSWORD";

/// Username and password for the management controllers
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// User name passed with `-U`
    pub user: String,
    /// Password handed to ipmitool through `IPMI_PASSWORD`
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Read both keys from the secrets file at `path`
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or a key is missing or empty
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| IpmiError::CredentialsUnreadable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Self::parse(&content, path)
    }

    /// Extract both keys from secrets file content; `path` is only used in errors
    ///
    /// # Errors
    /// Returns `IpmiError::CredentialMissing` for an absent or empty key
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let lookup = |key: &str| {
            value_from_str(content, key).ok_or_else(|| IpmiError::CredentialMissing {
                path: path.to_path_buf(),
                key: key.to_string(),
            })
        };

        Ok(Self {
            user: lookup(USER_KEY)?,
            password: lookup(PASSWORD_KEY)?,
        })
    }
}

/// Find `key` in `KEY=VALUE` lines; first occurrence wins
pub fn value_from_str(content: &str, key: &str) -> Option<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .find(|(k, _)| k.trim() == key)
        .map(|(_, v)| unquote(v.trim()).to_string())
        .filter(|v| !v.is_empty())
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
# management controllers
IMMUSER=USERID
IMMPASSWORD = "PASSW0RD"
ROOTPASSWORD=ignored
"#;

    #[test]
    fn test_parse_credentials() {
        let creds = Credentials::parse(SAMPLE, Path::new("/etc/passwd.test")).unwrap();

        assert_eq!(creds.user, "USERID");
        assert_eq!(creds.password, "PASSW0RD");
    }

    #[test]
    fn test_missing_password() {
        let err = Credentials::parse("IMMUSER=admin\n", Path::new("/tmp/x")).unwrap_err();

        assert!(matches!(
            err,
            IpmiError::CredentialMissing { ref key, .. } if key == PASSWORD_KEY
        ));
    }

    #[test]
    fn test_first_occurrence_wins() {
        assert_eq!(value_from_str("A=1\nA=2\n", "A").as_deref(), Some("1"));
    }

    #[test]
    fn test_key_prefix_does_not_match() {
        assert!(value_from_str("IMMUSER_OLD=x\n", "IMMUSER").is_none());
    }

    #[test]
    fn test_commented_key_ignored() {
        assert!(value_from_str("#IMMUSER=x\n", "IMMUSER").is_none());
    }

    #[test]
    fn test_single_quotes_and_inner_equals() {
        assert_eq!(
            value_from_str("IMMPASSWORD='a=b'\n", "IMMPASSWORD").as_deref(),
            Some("a=b")
        );
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials {
            user: "admin".to_string(),
            password: "hunter2".to_string(),
        };
        assert!(!format!("{creds:?}").contains("hunter2"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Credentials::load(Path::new("/nonexistent/ipmictl/passwd")).unwrap_err();
        assert!(matches!(err, IpmiError::CredentialsUnreadable { .. }));
    }
}
