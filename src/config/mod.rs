use std::env;

/// Config holds all provisioning configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub netbox_url: String,
    pub netbox_token: String,
    pub timeout_secs: u64,
    pub page_limit: u32,
    pub legacy_groups: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn load() -> Self {
        Self {
            netbox_url: get_env("NETBOX_URL", ""),
            netbox_token: get_env("NETBOX_TOKEN", ""),
            timeout_secs: get_env("NETBOX_TIMEOUT_SECS", "30")
                .parse()
                .unwrap_or(30),
            page_limit: get_env("NETBOX_PAGE_LIMIT", "1000")
                .parse()
                .unwrap_or(1000),
            legacy_groups: parse_groups(&get_env("OPTICAL_LEGACY_GROUPS", "Optical Settings")),
        }
    }

    /// Apply CLI overrides on top of the environment
    pub fn with_overrides(mut self, url: Option<String>, token: Option<String>) -> Self {
        if let Some(url) = url {
            self.netbox_url = url;
        }
        if let Some(token) = token {
            self.netbox_token = token;
        }
        self
    }

    pub fn is_configured(&self) -> bool {
        !self.netbox_url.is_empty() && !self.netbox_token.is_empty()
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Split a comma-separated group list, dropping blanks
fn parse_groups(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        Config {
            netbox_url: String::new(),
            netbox_token: "abc".to_string(),
            timeout_secs: 30,
            page_limit: 1000,
            legacy_groups: vec![],
        }
    }

    #[test]
    fn test_parse_groups() {
        assert_eq!(parse_groups("Optical Settings"), vec!["Optical Settings"]);
        assert_eq!(parse_groups(" A , ,B,"), vec!["A", "B"]);
        assert!(parse_groups("").is_empty());
    }

    #[test]
    fn test_overrides() {
        let cfg = sample();
        assert!(!cfg.is_configured());

        let cfg = cfg.with_overrides(Some("http://netbox.local".to_string()), None);
        assert_eq!(cfg.netbox_url, "http://netbox.local");
        assert_eq!(cfg.netbox_token, "abc");
        assert!(cfg.is_configured());
    }
}
