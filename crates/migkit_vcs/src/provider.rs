//! Supported VCS provider identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VcsError;

/// Version-control provider a repository can be created on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VcsProvider {
    #[serde(rename = "github")]
    GitHub,
    #[serde(rename = "github_enterprise")]
    GitHubEnterprise,
    #[serde(rename = "gitlab")]
    GitLab,
    AzureDevops,
    Bitbucket,
}

impl VcsProvider {
    pub const ALL: [VcsProvider; 5] = [
        Self::GitHub,
        Self::GitHubEnterprise,
        Self::GitLab,
        Self::AzureDevops,
        Self::Bitbucket,
    ];

    /// Identifier as written in the configuration document.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GitHub => "github",
            Self::GitHubEnterprise => "github_enterprise",
            Self::GitLab => "gitlab",
            Self::AzureDevops => "azure_devops",
            Self::Bitbucket => "bitbucket",
        }
    }

    /// Username paired with the token for Git-over-HTTPS basic auth.
    ///
    /// Bitbucket app passwords are tied to the account, so its username is
    /// used; the other providers accept a fixed placeholder.
    pub fn git_username<'a>(&self, account_username: Option<&'a str>) -> &'a str {
        match self {
            Self::GitHub | Self::GitHubEnterprise => "x-access-token",
            Self::GitLab => "oauth2",
            Self::AzureDevops => "pat",
            Self::Bitbucket => account_username.unwrap_or("x-token-auth"),
        }
    }
}

impl fmt::Display for VcsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VcsProvider {
    type Err = VcsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| VcsError::UnsupportedProvider(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_identifiers() {
        for provider in VcsProvider::ALL {
            assert_eq!(provider.as_str().parse::<VcsProvider>().unwrap(), provider);
        }
    }

    #[test]
    fn test_parse_unsupported() {
        let err = "sourcehut".parse::<VcsProvider>().unwrap_err();
        assert!(matches!(err, VcsError::UnsupportedProvider(ref p) if p == "sourcehut"));
        assert_eq!(
            err.to_string(),
            "You have not provided a supported vcs provider: sourcehut"
        );
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("GitHub".parse::<VcsProvider>().is_err());
    }

    #[test]
    fn test_serde_names_match_identifiers() {
        for provider in VcsProvider::ALL {
            let yaml = serde_json::to_string(&provider).unwrap();
            assert_eq!(yaml, format!("\"{}\"", provider.as_str()));
        }
    }

    #[test]
    fn test_git_username() {
        assert_eq!(VcsProvider::GitHub.git_username(None), "x-access-token");
        assert_eq!(VcsProvider::GitLab.git_username(Some("ignored")), "oauth2");
        assert_eq!(VcsProvider::Bitbucket.git_username(Some("jdoe")), "jdoe");
    }
}
