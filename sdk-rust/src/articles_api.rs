use crate::{AgentArticlesResponse, GetAgentArticlesOptions, InkPilotsClient, InkPilotsResult};
use futures::future::BoxFuture;

/// The read operations of the InkPilots API. Depend on this trait instead of
/// [`InkPilotsClient`] to swap in [`crate::inkpilots_test::MockArticlesApi`]
/// in tests.
pub trait ArticlesApi: Send + Sync {
    fn get_agent_articles<'a>(
        &'a self,
        agent_id: &'a str,
        options: GetAgentArticlesOptions,
    ) -> BoxFuture<'a, InkPilotsResult<AgentArticlesResponse>>;
}

impl ArticlesApi for InkPilotsClient {
    fn get_agent_articles<'a>(
        &'a self,
        agent_id: &'a str,
        options: GetAgentArticlesOptions,
    ) -> BoxFuture<'a, InkPilotsResult<AgentArticlesResponse>> {
        Box::pin(InkPilotsClient::get_agent_articles(self, agent_id, options))
    }
}
