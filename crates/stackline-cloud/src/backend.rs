//! The cloud backend that remote stacks belong to.

use async_trait::async_trait;
use stackline_config::BackendSettings;
use stackline_core::apitype::ApiStackSummary;
use stackline_core::{Dispatcher, QName};
use std::sync::Arc;
use tracing::debug;
use url::Url;

use crate::client::ServiceClient;
use crate::stack::{CloudStack, CloudStackReference};
use crate::{CloudError, CloudResult};

/// What a [`CloudStack`] needs from the backend that produced it.
#[async_trait]
pub trait CloudBackend: Send + Sync {
    /// URL of the service API.
    fn cloud_url(&self) -> &str;

    /// Name of the currently authenticated account.
    async fn current_account_name(&self) -> CloudResult<String>;

    /// Console path for a stack, relative to the console root.
    async fn stack_console_path(&self, reference: &CloudStackReference) -> CloudResult<String>;

    /// Absolute console URL for a relative path, or an empty string if the
    /// console location cannot be determined.
    fn cloud_console_url(&self, path: &str) -> String;
}

/// Derive the web console URL from the API URL.
///
/// The console host is `console_domain` when given, otherwise `localhost:8080`
/// maps to `localhost:3000` and `api.<domain>` maps to `app.<domain>`. Any
/// other host has no known console and yields an empty string.
pub fn cloud_console_url(cloud_url: &str, console_domain: Option<&str>, path: &str) -> String {
    let Ok(api) = Url::parse(cloud_url) else {
        return String::new();
    };
    let Some(host) = api.host_str() else {
        return String::new();
    };
    let authority = match api.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };

    let console_host = match console_domain.filter(|d| !d.is_empty()) {
        Some(domain) => domain.to_string(),
        None if authority == "localhost:8080" => "localhost:3000".to_string(),
        None => match authority.strip_prefix("api.") {
            Some(rest) => format!("app.{}", rest),
            None => return String::new(),
        },
    };

    Url::parse(&format!("{}://{}/", api.scheme(), console_host))
        .and_then(|root| root.join(path.trim_start_matches('/')))
        .map(|url| url.to_string())
        .unwrap_or_default()
}

/// Split `owner/name` or `name` into its parts.
pub fn split_stack_reference(reference: &str) -> CloudResult<(Option<&str>, QName)> {
    let invalid = |message: String| CloudError::InvalidStackReference {
        reference: reference.to_string(),
        message,
    };

    let (owner, name) = match reference.split('/').collect::<Vec<_>>().as_slice() {
        [name] => (None, *name),
        [owner, name] if !owner.is_empty() => (Some(*owner), *name),
        [_, _] => return Err(invalid("owner cannot be empty".to_string())),
        _ => {
            return Err(invalid(
                "expected a stack name optionally prefixed by its owner, e.g. 'acme/dev'"
                    .to_string(),
            ));
        }
    };

    let name = QName::parse(name).map_err(|e| invalid(e.to_string()))?;
    Ok((owner, name))
}

/// A backend backed by the Stackline service.
pub struct ServiceBackend {
    client: ServiceClient,
    settings: BackendSettings,
    dispatcher: Arc<dyn Dispatcher>,
}

impl ServiceBackend {
    pub fn new(settings: BackendSettings, dispatcher: Arc<dyn Dispatcher>) -> Self {
        let client = ServiceClient::new(&settings.cloud_url, settings.access_token.clone());
        Self {
            client,
            settings,
            dispatcher,
        }
    }

    pub fn client(&self) -> &ServiceClient {
        &self.client
    }

    /// Parse a user-supplied stack reference.
    ///
    /// A bare name belongs to the current account; failing to resolve that
    /// account is an error here, since there is no name to fall back to.
    pub async fn parse_stack_reference(
        self: &Arc<Self>,
        reference: &str,
    ) -> CloudResult<CloudStackReference> {
        let (owner, name) = split_stack_reference(reference)?;
        let owner = match owner {
            Some(owner) => owner.to_string(),
            None => self.client.get_account_name().await?,
        };

        let backend: Arc<dyn CloudBackend> = self.clone();
        Ok(CloudStackReference::new(owner, name, &backend))
    }

    /// Fetch a stack and rebuild its state. Returns `None` if it does not exist.
    pub async fn get_stack(
        self: &Arc<Self>,
        reference: &CloudStackReference,
    ) -> CloudResult<Option<CloudStack>> {
        let Some(record) = self
            .client
            .get_stack(reference.owner(), reference.name())
            .await?
        else {
            debug!(stack = %reference, "Stack not found");
            return Ok(None);
        };

        let backend: Arc<dyn CloudBackend> = self.clone();
        Ok(Some(CloudStack::new(
            record,
            &backend,
            self.dispatcher.clone(),
        )))
    }

    pub async fn list_stacks(&self) -> CloudResult<Vec<ApiStackSummary>> {
        self.client.list_stacks().await
    }

    /// Full console URL for a stack.
    pub async fn stack_console_url(&self, reference: &CloudStackReference) -> CloudResult<String> {
        let path = self.stack_console_path(reference).await?;
        let url = self.cloud_console_url(&path);
        if url.is_empty() {
            return Err(CloudError::ConsoleUrlUnavailable);
        }
        Ok(url)
    }
}

#[async_trait]
impl CloudBackend for ServiceBackend {
    fn cloud_url(&self) -> &str {
        &self.settings.cloud_url
    }

    async fn current_account_name(&self) -> CloudResult<String> {
        self.client.get_account_name().await
    }

    async fn stack_console_path(&self, reference: &CloudStackReference) -> CloudResult<String> {
        let owner = if reference.owner().is_empty() {
            self.client.get_account_name().await?
        } else {
            reference.owner().to_string()
        };
        Ok(format!(
            "{}/{}",
            urlencoding::encode(&owner),
            urlencoding::encode(reference.name().as_str())
        ))
    }

    fn cloud_console_url(&self, path: &str) -> String {
        cloud_console_url(
            &self.settings.cloud_url,
            self.settings.console_domain.as_deref(),
            path,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_url_from_api_host() {
        assert_eq!(
            cloud_console_url("https://api.stackline.io", None, "acme/dev"),
            "https://app.stackline.io/acme/dev"
        );
    }

    #[test]
    fn test_console_url_for_local_service() {
        assert_eq!(
            cloud_console_url("http://localhost:8080", None, "acme/dev"),
            "http://localhost:3000/acme/dev"
        );
    }

    #[test]
    fn test_console_domain_override() {
        assert_eq!(
            cloud_console_url(
                "https://stackline.internal.example.com",
                Some("console.example.com"),
                "/acme/dev"
            ),
            "https://console.example.com/acme/dev"
        );
    }

    #[test]
    fn test_console_url_unknown_host() {
        assert_eq!(
            cloud_console_url("https://stackline.internal.example.com", None, "acme/dev"),
            ""
        );
        assert_eq!(cloud_console_url("not a url", None, "acme/dev"), "");
    }

    #[test]
    fn test_split_qualified_reference() {
        let (owner, name) = split_stack_reference("acme/dev").unwrap();
        assert_eq!(owner, Some("acme"));
        assert_eq!(name.as_str(), "dev");
    }

    #[test]
    fn test_split_bare_reference() {
        let (owner, name) = split_stack_reference("dev").unwrap();
        assert_eq!(owner, None);
        assert_eq!(name.as_str(), "dev");
    }

    #[test]
    fn test_split_rejects_malformed_references() {
        for reference in ["acme/team/dev", "/dev", "acme/", "acme/bad name", ""] {
            assert!(
                matches!(
                    split_stack_reference(reference),
                    Err(CloudError::InvalidStackReference { .. })
                ),
                "expected {:?} to be rejected",
                reference
            );
        }
    }

    struct NoopDispatcher;

    #[async_trait]
    impl Dispatcher for NoopDispatcher {
        async fn preview_stack(
            &self,
            _stack: &dyn stackline_core::Stack,
            _op: stackline_core::engine::UpdateOperation<'_>,
        ) -> stackline_core::Result<stackline_core::engine::ResourceChanges> {
            unimplemented!()
        }

        async fn update_stack(
            &self,
            _stack: &dyn stackline_core::Stack,
            _op: stackline_core::engine::UpdateOperation<'_>,
        ) -> stackline_core::Result<stackline_core::engine::ResourceChanges> {
            unimplemented!()
        }

        async fn refresh_stack(
            &self,
            _stack: &dyn stackline_core::Stack,
            _op: stackline_core::engine::UpdateOperation<'_>,
        ) -> stackline_core::Result<stackline_core::engine::ResourceChanges> {
            unimplemented!()
        }

        async fn destroy_stack(
            &self,
            _stack: &dyn stackline_core::Stack,
            _op: stackline_core::engine::UpdateOperation<'_>,
        ) -> stackline_core::Result<stackline_core::engine::ResourceChanges> {
            unimplemented!()
        }

        async fn remove_stack(
            &self,
            _stack: &dyn stackline_core::Stack,
            _force: bool,
        ) -> stackline_core::Result<bool> {
            unimplemented!()
        }

        async fn get_stack_logs(
            &self,
            _stack: &dyn stackline_core::Stack,
            _query: &stackline_core::operations::LogQuery,
        ) -> stackline_core::Result<Vec<stackline_core::operations::LogEntry>> {
            unimplemented!()
        }

        async fn export_stack_deployment(
            &self,
            _stack: &dyn stackline_core::Stack,
        ) -> stackline_core::Result<stackline_core::apitype::UntypedDeployment> {
            unimplemented!()
        }

        async fn import_stack_deployment(
            &self,
            _stack: &dyn stackline_core::Stack,
            _deployment: &stackline_core::apitype::UntypedDeployment,
        ) -> stackline_core::Result<()> {
            unimplemented!()
        }
    }

    fn service_backend(console_domain: Option<&str>) -> Arc<ServiceBackend> {
        let settings = BackendSettings {
            cloud_url: "https://api.stackline.io".to_string(),
            access_token: None,
            console_domain: console_domain.map(str::to_string),
        };
        Arc::new(ServiceBackend::new(settings, Arc::new(NoopDispatcher)))
    }

    #[tokio::test]
    async fn test_stack_console_url_for_qualified_reference() {
        let backend = service_backend(None);
        let dyn_backend: Arc<dyn CloudBackend> = backend.clone();
        let reference = CloudStackReference::new("acme", QName::new("dev"), &dyn_backend);

        assert_eq!(
            backend.stack_console_url(&reference).await.unwrap(),
            "https://app.stackline.io/acme/dev"
        );
    }

    #[tokio::test]
    async fn test_stack_console_url_encodes_owner() {
        let backend = service_backend(None);
        let dyn_backend: Arc<dyn CloudBackend> = backend.clone();
        let reference = CloudStackReference::new("team:x", QName::new("dev"), &dyn_backend);

        assert_eq!(
            backend.stack_console_path(&reference).await.unwrap(),
            "team%3Ax/dev"
        );
        assert_eq!(
            backend.stack_console_url(&reference).await.unwrap(),
            "https://app.stackline.io/team%3Ax/dev"
        );
    }

    #[tokio::test]
    async fn test_qualified_reference_needs_no_lookup() {
        let backend = service_backend(None);
        let reference = backend.parse_stack_reference("acme/dev").await.unwrap();
        assert_eq!(reference.owner(), "acme");
        assert_eq!(reference.qualified_name(), "acme/dev");
        assert_eq!(backend.cloud_url(), "https://api.stackline.io");
    }
}
