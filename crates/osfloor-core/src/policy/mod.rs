//! Device compliance policy records and the update payload.

pub mod client;

pub use client::PolicyClient;

use serde::{Deserialize, Serialize};

/// A device compliance policy as returned by the management API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompliancePolicy {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub os_minimum_version: Option<String>,
    /// Type discriminator, e.g. `#microsoft.graph.iosCompliancePolicy`.
    #[serde(rename = "@odata.type", default)]
    pub odata_type: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl CompliancePolicy {
    pub fn platform(&self) -> Option<Platform> {
        Platform::from_odata_type(&self.odata_type)
    }

    /// Current minimum OS version, empty if unset.
    pub fn current_version(&self) -> &str {
        self.os_minimum_version.as_deref().unwrap_or("")
    }
}

/// Graph collection envelope for one page of policies.
#[derive(Debug, Deserialize)]
pub struct PolicyPage {
    #[serde(default)]
    pub value: Vec<CompliancePolicy>,
    #[serde(rename = "@odata.nextLink", default)]
    pub next_link: Option<String>,
}

/// Partial update sent with PATCH.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePayload {
    #[serde(rename = "@odata.type")]
    pub odata_type: String,
    pub description: String,
    #[serde(rename = "osMinimumVersion")]
    pub os_minimum_version: String,
}

impl UpdatePayload {
    /// Payload raising `policy` to `version`, keeping its type discriminator.
    pub fn for_policy(policy: &CompliancePolicy, description: String, version: String) -> Self {
        Self {
            odata_type: policy.odata_type.clone(),
            description,
            os_minimum_version: version,
        }
    }
}

/// Device platform a compliance policy targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    MacOs,
    Android,
    Windows,
}

impl Platform {
    /// Derive from an `@odata.type` such as `#microsoft.graph.macOSCompliancePolicy`.
    pub fn from_odata_type(odata_type: &str) -> Option<Self> {
        let name = odata_type.rsplit('.').next()?.to_ascii_lowercase();
        if name.starts_with("ios") {
            Some(Platform::Ios)
        } else if name.starts_with("macos") {
            Some(Platform::MacOs)
        } else if name.starts_with("android") {
            Some(Platform::Android)
        } else if name.starts_with("windows") {
            Some(Platform::Windows)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::MacOs => "macos",
            Platform::Android => "android",
            Platform::Windows => "windows",
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ios" => Ok(Platform::Ios),
            "macos" => Ok(Platform::MacOs),
            "android" => Ok(Platform::Android),
            "windows" => Ok(Platform::Windows),
            other => Err(format!(
                "unknown platform '{other}' (expected ios, macos, android or windows)"
            )),
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick the policy whose id equals `id` exactly.
pub fn select_policy<'a>(policies: &'a [CompliancePolicy], id: &str) -> Option<&'a CompliancePolicy> {
    policies.iter().find(|p| p.id == id)
}

/// First two characters of the current minimum version.
///
/// Informational only; nothing filters on it.
pub fn major_version_hint(version: &str) -> &str {
    match version.char_indices().nth(2) {
        Some((idx, _)) => &version[..idx],
        None => version,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(id: &str) -> CompliancePolicy {
        CompliancePolicy {
            id: id.into(),
            display_name: format!("Policy {id}"),
            os_minimum_version: Some("26.0.1".into()),
            odata_type: "#microsoft.graph.iosCompliancePolicy".into(),
            description: None,
        }
    }

    #[test]
    fn deserializes_graph_record() {
        let json = r##"{
            "@odata.type": "#microsoft.graph.iosCompliancePolicy",
            "id": "0b1c2d3e",
            "displayName": "iOS baseline",
            "description": "",
            "osMinimumVersion": "26.0.1",
            "passcodeRequired": true,
            "version": 7
        }"##;
        let p: CompliancePolicy = serde_json::from_str(json).unwrap();
        assert_eq!(p.id, "0b1c2d3e");
        assert_eq!(p.display_name, "iOS baseline");
        assert_eq!(p.current_version(), "26.0.1");
        assert_eq!(p.platform(), Some(Platform::Ios));
    }

    #[test]
    fn null_minimum_version_reads_as_empty() {
        let json = r##"{"id":"x","osMinimumVersion":null,"@odata.type":"#microsoft.graph.iosCompliancePolicy"}"##;
        let p: CompliancePolicy = serde_json::from_str(json).unwrap();
        assert_eq!(p.os_minimum_version, None);
        assert_eq!(p.current_version(), "");
    }

    #[test]
    fn select_policy_uses_exact_equality() {
        let policies = vec![policy("abc-1"), policy("abc-12"), policy("xyz")];
        assert_eq!(select_policy(&policies, "abc-1").unwrap().id, "abc-1");
        assert_eq!(select_policy(&policies, "abc-12").unwrap().id, "abc-12");
        assert!(select_policy(&policies, "abc").is_none());
        assert!(select_policy(&policies, "ABC-1").is_none());
        assert!(select_policy(&[], "abc-1").is_none());
    }

    #[test]
    fn payload_serializes_graph_field_names() {
        let p = policy("abc");
        let payload = UpdatePayload::for_policy(&p, "synced".into(), "26.1.0".into());
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["@odata.type"], "#microsoft.graph.iosCompliancePolicy");
        assert_eq!(value["description"], "synced");
        assert_eq!(value["osMinimumVersion"], "26.1.0");
        assert_eq!(value.as_object().unwrap().len(), 3);
    }

    #[test]
    fn platform_from_odata_type() {
        let cases = [
            ("#microsoft.graph.iosCompliancePolicy", Some(Platform::Ios)),
            ("#microsoft.graph.macOSCompliancePolicy", Some(Platform::MacOs)),
            ("#microsoft.graph.androidWorkProfileCompliancePolicy", Some(Platform::Android)),
            ("#microsoft.graph.windows10CompliancePolicy", Some(Platform::Windows)),
            ("#microsoft.graph.aospDeviceOwnerCompliancePolicy", None),
            ("", None),
        ];
        for (odata_type, expected) in cases {
            assert_eq!(Platform::from_odata_type(odata_type), expected, "{odata_type}");
        }
    }

    #[test]
    fn platform_parses_cli_names() {
        assert_eq!("iOS".parse::<Platform>().unwrap(), Platform::Ios);
        assert_eq!("macos".parse::<Platform>().unwrap(), Platform::MacOs);
        assert!("tvos".parse::<Platform>().is_err());
    }

    #[test]
    fn major_version_hint_takes_two_chars() {
        assert_eq!(major_version_hint("26.0.1"), "26");
        assert_eq!(major_version_hint("9.3"), "9.");
        assert_eq!(major_version_hint("8"), "8");
        assert_eq!(major_version_hint(""), "");
    }
}
