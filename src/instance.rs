//! Instance identity discovery.
//!
//! Each running container learns who it is from platform environment
//! variables: `CF_INSTANCE_INDEX` carries the instance index and
//! `VCAP_APPLICATION` is a JSON document carrying the application name.
//! Off-platform both are absent and the configured application name with
//! index -1 is used, so local runs still produce a readable identity.

use serde::Deserialize;

/// Identity of one running service instance, e.g. `frontend/0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceInfo {
    /// Application name, from the platform or the config fallback.
    pub application: String,
    /// Instance index within the application, -1 when unknown.
    pub index: i32,
}

#[derive(Deserialize)]
struct VcapApplication {
    application_name: Option<String>,
}

impl InstanceInfo {
    /// Discover the identity from the process environment.
    pub fn from_env(fallback_name: &str) -> Self {
        Self::from_parts(
            fallback_name,
            std::env::var("CF_INSTANCE_INDEX").ok(),
            std::env::var("VCAP_APPLICATION").ok(),
        )
    }

    fn from_parts(fallback_name: &str, index: Option<String>, vcap_json: Option<String>) -> Self {
        let index = index.and_then(|v| v.parse::<i32>().ok()).unwrap_or(-1);

        let application = vcap_json
            .and_then(|json| serde_json::from_str::<VcapApplication>(&json).ok())
            .and_then(|vcap| vcap.application_name)
            .unwrap_or_else(|| fallback_name.to_string());

        Self { application, index }
    }
}

impl std::fmt::Display for InstanceInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.application, self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn off_platform_uses_fallbacks() {
        let info = InstanceInfo::from_parts("frontend", None, None);
        assert_eq!(info.application, "frontend");
        assert_eq!(info.index, -1);
        assert_eq!(info.to_string(), "frontend/-1");
    }

    #[test]
    fn platform_identity_wins() {
        let vcap = r#"{"application_name":"doorbell-frontend","space_name":"demo"}"#;
        let info = InstanceInfo::from_parts("frontend", Some("2".into()), Some(vcap.into()));
        assert_eq!(info.application, "doorbell-frontend");
        assert_eq!(info.index, 2);
        assert_eq!(info.to_string(), "doorbell-frontend/2");
    }

    #[test]
    fn malformed_platform_values_fall_back() {
        let info = InstanceInfo::from_parts("backend", Some("first".into()), Some("{".into()));
        assert_eq!(info.application, "backend");
        assert_eq!(info.index, -1);
    }

    #[test]
    fn vcap_without_name_keeps_configured_name() {
        let info = InstanceInfo::from_parts("backend", Some("0".into()), Some("{}".into()));
        assert_eq!(info.application, "backend");
        assert_eq!(info.index, 0);
    }
}
