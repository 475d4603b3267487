//! Persisted configuration types

use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// One configured application tile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub icon: String,
    /// Optional dedicated health path probed instead of `url`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_endpoint: Option<String>,
    /// Require a valid TLS certificate when probing this target.
    /// Off by default so self-signed homelab services don't read as offline.
    #[serde(default, skip_serializing_if = "is_false")]
    pub verify_tls: bool,
}

impl Application {
    /// Address used for liveness probing
    pub fn probe_target(&self) -> &str {
        match &self.status_endpoint {
            Some(endpoint) if !endpoint.is_empty() => endpoint,
            _ => &self.url,
        }
    }
}

/// The single persisted document: access policy plus the application list.
/// Replaced wholesale on every save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub require_passcode: bool,
    #[serde(default)]
    pub passcode: String,
    #[serde(default)]
    pub apps: Vec<Application>,
}

impl Configuration {
    /// Check the document invariants, collecting every violation.
    ///
    /// Duplicate names and URLs are allowed; list order is the only
    /// identity the UI relies on.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        for (i, app) in self.apps.iter().enumerate() {
            if app.name.is_empty() {
                errors.push(field_error(i, "name", "Name is required"));
            }
            if app.url.is_empty() {
                errors.push(field_error(i, "url", "URL is required"));
            }
            if app.icon.is_empty() {
                errors.push(field_error(i, "icon", "Icon is required"));
            }
        }
        errors
    }

    /// Document written on first run
    pub fn seed() -> Self {
        Self {
            require_passcode: false,
            passcode: String::new(),
            apps: vec![
                Application {
                    name: "Nextcloud".to_string(),
                    description: "Personal cloud storage".to_string(),
                    url: "https://datalab.local".to_string(),
                    icon: "🗂️".to_string(),
                    status_endpoint: Some("https://datalab.local/status".to_string()),
                    verify_tls: false,
                },
                Application {
                    name: "Jellyfin".to_string(),
                    description: "Media streaming server".to_string(),
                    url: "http://192.168.50.10:8096".to_string(),
                    icon: "🎞️".to_string(),
                    status_endpoint: None,
                    verify_tls: false,
                },
            ],
        }
    }
}

fn field_error(index: usize, field: &str, message: &str) -> FieldError {
    FieldError {
        field: format!("apps[{}].{}", index, field),
        message: message.to_string(),
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_app() -> Application {
        Application {
            name: "Jellyfin".to_string(),
            description: "Media streaming server".to_string(),
            url: "http://192.168.50.10:8096".to_string(),
            icon: "🎞️".to_string(),
            status_endpoint: None,
            verify_tls: false,
        }
    }

    #[test]
    fn parse_full_config() {
        let json = r#"{
            "require_passcode": true,
            "passcode": "abc123",
            "apps": [
                {
                    "name": "Nextcloud",
                    "description": "Personal cloud storage",
                    "url": "https://datalab.local",
                    "icon": "🗂️",
                    "status_endpoint": "https://datalab.local/status"
                }
            ]
        }"#;

        let config: Configuration = serde_json::from_str(json).unwrap();
        assert!(config.require_passcode);
        assert_eq!(config.passcode, "abc123");
        assert_eq!(config.apps.len(), 1);
        assert_eq!(config.apps[0].name, "Nextcloud");
        assert_eq!(
            config.apps[0].status_endpoint.as_deref(),
            Some("https://datalab.local/status")
        );
        assert!(!config.apps[0].verify_tls);
    }

    #[test]
    fn parse_minimal_config() {
        let config: Configuration = serde_json::from_str("{}").unwrap();
        assert!(!config.require_passcode);
        assert!(config.passcode.is_empty());
        assert!(config.apps.is_empty());
    }

    #[test]
    fn status_endpoint_omitted_when_absent() {
        let json = serde_json::to_string(&valid_app()).unwrap();
        assert!(!json.contains("status_endpoint"));
        assert!(!json.contains("verify_tls"));
    }

    #[test]
    fn probe_target_prefers_status_endpoint() {
        let mut app = valid_app();
        app.status_endpoint = Some("http://health.local/ping".to_string());
        assert_eq!(app.probe_target(), "http://health.local/ping");
    }

    #[test]
    fn probe_target_falls_back_to_url() {
        let mut app = valid_app();
        assert_eq!(app.probe_target(), "http://192.168.50.10:8096");

        app.status_endpoint = Some(String::new());
        assert_eq!(app.probe_target(), "http://192.168.50.10:8096");
    }

    #[test]
    fn validate_accepts_valid_config() {
        let config = Configuration {
            apps: vec![valid_app()],
            ..Configuration::default()
        };
        assert!(config.validate().is_empty());
    }

    #[test]
    fn validate_collects_all_field_errors() {
        let config = Configuration {
            apps: vec![
                valid_app(),
                Application {
                    name: String::new(),
                    description: String::new(),
                    url: String::new(),
                    icon: String::new(),
                    status_endpoint: None,
                    verify_tls: false,
                },
            ],
            ..Configuration::default()
        };

        let errors = config.validate();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0].field, "apps[1].name");
        assert_eq!(errors[0].message, "Name is required");
        assert_eq!(errors[1].field, "apps[1].url");
        assert_eq!(errors[2].field, "apps[1].icon");
    }

    #[test]
    fn validate_allows_duplicates() {
        let config = Configuration {
            apps: vec![valid_app(), valid_app()],
            ..Configuration::default()
        };
        assert!(config.validate().is_empty());
    }

    #[test]
    fn validate_allows_empty_description() {
        let mut app = valid_app();
        app.description = String::new();
        let config = Configuration {
            apps: vec![app],
            ..Configuration::default()
        };
        assert!(config.validate().is_empty());
    }

    #[test]
    fn seed_is_valid() {
        let seed = Configuration::seed();
        assert!(!seed.require_passcode);
        assert_eq!(seed.apps.len(), 2);
        assert!(seed.validate().is_empty());
    }

    #[test]
    fn seed_round_trips_through_json() {
        let seed = Configuration::seed();
        let json = serde_json::to_string_pretty(&seed).unwrap();
        let parsed: Configuration = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, seed);
    }
}
