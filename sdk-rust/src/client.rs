use crate::{
    client_utils, opentelemetry, AgentArticlesResponse, GetAgentArticlesOptions, InkPilotsError,
    InkPilotsResult,
};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use std::{env, fmt, time::Duration};

/// Environment variable read when no API key is passed explicitly.
pub const API_KEY_ENV: &str = "INKPILOTS_API_KEY";
pub const DEFAULT_BASE_URL: &str = "https://www.inkpilots.com/api/v1";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

const DEFAULT_ARTICLES_LIMIT: u32 = 50;

/// Client for the InkPilots API. Cheap to clone; clones share the
/// underlying connection pool.
#[derive(Clone)]
pub struct InkPilotsClient {
    api_key: String,
    base_url: String,
    timeout: Duration,
    client: Client,
}

#[derive(Clone, Default)]
pub struct InkPilotsClientOptions {
    /// Defaults to the `INKPILOTS_API_KEY` environment variable.
    pub api_key: Option<String>,
    /// Defaults to `https://www.inkpilots.com/api/v1`.
    pub base_url: Option<String>,
    /// Defaults to 30 seconds.
    pub timeout_ms: Option<u64>,
    pub client: Option<Client>,
}

struct RequestOptions<'a> {
    method: Method,
    path: String,
    /// Path with placeholders, used to name the request in traces.
    route: &'static str,
    query: &'a [(&'a str, Option<String>)],
}

impl InkPilotsClient {
    /// Create a client. Fails when no API key is available.
    pub fn new(options: InkPilotsClientOptions) -> InkPilotsResult<Self> {
        let InkPilotsClientOptions {
            api_key,
            base_url,
            timeout_ms,
            client,
        } = options;

        let api_key = resolve_api_key(api_key, || env::var(API_KEY_ENV).ok())?;

        let timeout_ms = timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS);
        if timeout_ms == 0 {
            return Err(InkPilotsError::InvalidInput(
                "timeout_ms must be greater than 0".to_string(),
            ));
        }

        let base_url = base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            api_key,
            base_url,
            timeout: Duration::from_millis(timeout_ms),
            client: client.unwrap_or_default(),
        })
    }

    /// Create a client configured only from the environment.
    pub fn from_env() -> InkPilotsResult<Self> {
        Self::new(InkPilotsClientOptions::default())
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `GET /agents/:agentId/articles?limit=&skip=&status=`
    pub async fn get_agent_articles(
        &self,
        agent_id: &str,
        options: GetAgentArticlesOptions,
    ) -> InkPilotsResult<AgentArticlesResponse> {
        if agent_id.is_empty() {
            return Err(InkPilotsError::InvalidInput(
                "agent_id must not be empty".to_string(),
            ));
        }

        let GetAgentArticlesOptions {
            limit,
            skip,
            status,
        } = options;

        self.request(RequestOptions {
            method: Method::GET,
            path: format!("/agents/{}/articles", urlencoding::encode(agent_id)),
            route: "/agents/{agentId}/articles",
            query: &[
                (
                    "limit",
                    Some(limit.unwrap_or(DEFAULT_ARTICLES_LIMIT).to_string()),
                ),
                ("skip", Some(skip.unwrap_or(0).to_string())),
                ("status", Some(status.unwrap_or_default().to_string())),
            ],
        })
        .await
    }

    async fn request<T: DeserializeOwned>(&self, options: RequestOptions<'_>) -> InkPilotsResult<T> {
        let url = client_utils::build_url(&self.base_url, &options.path, options.query)?;
        let headers = client_utils::request_headers(&self.api_key)?;

        opentelemetry::trace_request(&options.method, options.route, &url, || {
            client_utils::send_json(
                &self.client,
                options.method.clone(),
                url.clone(),
                headers,
                self.timeout,
            )
        })
        .await
    }
}

impl fmt::Debug for InkPilotsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InkPilotsClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// An explicit key wins over the environment, even when it is empty.
fn resolve_api_key(
    explicit: Option<String>,
    from_env: impl FnOnce() -> Option<String>,
) -> InkPilotsResult<String> {
    explicit
        .or_else(from_env)
        .filter(|key| !key.is_empty())
        .ok_or(InkPilotsError::MissingApiKey)
}
