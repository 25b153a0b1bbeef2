//! Records exchanged with the remote service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tokens::{QName, ResourceId, TypeToken, Urn};

/// A stack as returned by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStack {
    pub org_name: String,
    #[serde(default)]
    pub project_name: String,
    pub stack_name: QName,
    pub cloud_name: String,
    #[serde(default)]
    pub active_update: Option<String>,
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub resources: Vec<ApiResource>,
}

/// One managed resource as returned by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResource {
    pub urn: Urn,
    #[serde(default)]
    pub custom: bool,
    #[serde(default)]
    pub delete: bool,
    #[serde(default)]
    pub id: Option<ResourceId>,
    #[serde(rename = "type")]
    pub type_: TypeToken,
    #[serde(default)]
    pub inputs: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub outputs: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub parent: Option<Urn>,
    #[serde(default)]
    pub protect: bool,
    /// Accepted on the wire; not carried into snapshots.
    #[serde(default)]
    pub dependencies: Vec<Urn>,
}

/// A row in a stack listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStackSummary {
    pub org_name: String,
    #[serde(default)]
    pub project_name: String,
    pub stack_name: QName,
    #[serde(default)]
    pub last_update: Option<DateTime<Utc>>,
    #[serde(default)]
    pub resource_count: Option<u64>,
}

/// An exported deployment. The payload is opaque to this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UntypedDeployment {
    pub version: i32,
    pub deployment: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_stack_record() {
        let record = json!({
            "orgName": "acme",
            "projectName": "website",
            "stackName": "dev",
            "cloudName": "stackline",
            "resources": [{
                "urn": "urn:stackline:dev::website::aws:s3/bucket:Bucket::assets",
                "custom": true,
                "id": "assets-1234",
                "type": "aws:s3/bucket:Bucket",
                "inputs": {"acl": "private"},
                "outputs": {"arn": "arn:aws:s3:::assets-1234"},
                "protect": true,
                "dependencies": ["urn:stackline:dev::website::pkg:index:Other::x"]
            }]
        });

        let stack: ApiStack = serde_json::from_value(record).unwrap();
        assert_eq!(stack.org_name, "acme");
        assert_eq!(stack.stack_name.as_str(), "dev");
        assert_eq!(stack.version, 0);
        assert!(stack.active_update.is_none());

        let res = &stack.resources[0];
        assert!(res.custom);
        assert!(res.protect);
        assert!(res.parent.is_none());
        assert_eq!(res.id.as_ref().map(|id| id.as_str()), Some("assets-1234"));
        assert_eq!(res.type_.as_str(), "aws:s3/bucket:Bucket");
        assert_eq!(res.dependencies.len(), 1);
    }

    #[test]
    fn test_component_record_without_id() {
        let record = json!({
            "urn": "urn:stackline:dev::website::pkg:index:Component::web",
            "type": "pkg:index:Component"
        });

        let res: ApiResource = serde_json::from_value(record).unwrap();
        assert!(!res.custom);
        assert!(res.id.is_none());
        assert!(res.inputs.is_empty());
    }
}
