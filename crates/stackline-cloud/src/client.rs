//! HTTP client for the Stackline service API.

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use stackline_core::QName;
use stackline_core::apitype::{ApiStack, ApiStackSummary};
use tracing::debug;

use crate::{CloudError, CloudResult};

/// Service API client.
///
/// Requests are issued one at a time with no retries; timeouts are left to
/// the underlying `reqwest` client.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    client: reqwest::Client,
    api_url: String,
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceUser {
    github_login: String,
}

#[derive(Debug, Deserialize)]
struct ListStacksResponse {
    #[serde(default)]
    stacks: Vec<ApiStackSummary>,
}

impl ServiceClient {
    pub fn new(api_url: impl Into<String>, access_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            access_token,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Name of the account the access token belongs to.
    pub async fn get_account_name(&self) -> CloudResult<String> {
        let user: ServiceUser = self.send_json(self.request(Method::GET, "user")).await?;
        Ok(user.github_login)
    }

    /// Fetch a stack and its resources. Returns `None` if it does not exist.
    pub async fn get_stack(&self, owner: &str, stack: &QName) -> CloudResult<Option<ApiStack>> {
        let builder = self.request(Method::GET, &stack_path(owner, stack));
        match self.send_json(builder).await {
            Ok(stack) => Ok(Some(stack)),
            Err(CloudError::Api { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// List the stacks visible to the current account.
    pub async fn list_stacks(&self) -> CloudResult<Vec<ApiStackSummary>> {
        let response: ListStacksResponse = self
            .send_json(self.request(Method::GET, "user/stacks"))
            .await?;
        Ok(response.stacks)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.api_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.endpoint(path);
        debug!(method = %method, url = %url, "Service request");

        let builder = self
            .client
            .request(method, url)
            .header("Accept", "application/json")
            .header("User-Agent", "stackline");

        match &self.access_token {
            Some(token) => builder.header("Authorization", format!("token {}", token)),
            None => builder,
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> CloudResult<T> {
        let response = builder
            .send()
            .await
            .map_err(|e| CloudError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(api_error(status, text));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CloudError::Parse(e.to_string()))
    }
}

fn stack_path(owner: &str, stack: &QName) -> String {
    format!(
        "stacks/{}/{}",
        urlencoding::encode(owner),
        urlencoding::encode(stack.as_str())
    )
}

fn api_error(status: StatusCode, body: String) -> CloudError {
    let message = if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        body
    };
    CloudError::Api {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = ServiceClient::new("https://api.stackline.io/", None);
        assert_eq!(client.api_url(), "https://api.stackline.io");
        assert_eq!(
            client.endpoint("user"),
            "https://api.stackline.io/api/user"
        );
    }

    #[test]
    fn test_stack_path_encodes_segments() {
        let path = stack_path("acme corp", &QName::new("dev"));
        assert_eq!(path, "stacks/acme%20corp/dev");
    }

    #[test]
    fn test_api_error_falls_back_to_reason() {
        match api_error(StatusCode::NOT_FOUND, String::new()) {
            CloudError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Not Found");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
