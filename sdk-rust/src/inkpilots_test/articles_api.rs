use std::{
    collections::VecDeque,
    sync::{Mutex, MutexGuard, PoisonError},
};

use futures::future::BoxFuture;

use crate::{
    AgentArticlesResponse, ArticlesApi, GetAgentArticlesOptions, InkPilotsError, InkPilotsResult,
};

/// Result for a mocked `get_agent_articles` call.
/// It can either be a full response or an error to return.
pub enum MockArticlesResult {
    Response(AgentArticlesResponse),
    Error(InkPilotsError),
}

impl MockArticlesResult {
    /// Construct a result that yields the provided response.
    pub fn response(response: AgentArticlesResponse) -> Self {
        Self::Response(response)
    }

    /// Construct a result that yields the provided error.
    pub fn error(error: impl Into<InkPilotsError>) -> Self {
        Self::Error(error.into())
    }
}

impl From<AgentArticlesResponse> for MockArticlesResult {
    fn from(response: AgentArticlesResponse) -> Self {
        Self::response(response)
    }
}

impl From<InkPilotsResult<AgentArticlesResponse>> for MockArticlesResult {
    fn from(result: InkPilotsResult<AgentArticlesResponse>) -> Self {
        match result {
            Ok(response) => Self::Response(response),
            Err(error) => Self::Error(error),
        }
    }
}

/// Arguments of one call received by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedArticlesCall {
    pub agent_id: String,
    pub options: GetAgentArticlesOptions,
}

#[derive(Default)]
struct MockArticlesApiState {
    mocked_results: VecDeque<MockArticlesResult>,
    tracked_calls: Vec<TrackedArticlesCall>,
}

/// A mock [`ArticlesApi`] that tracks calls and yields predefined results in
/// order.
#[derive(Default)]
pub struct MockArticlesApi {
    state: Mutex<MockArticlesApiState>,
}

impl MockArticlesApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockArticlesApiState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enqueue one or more mocked results.
    pub fn enqueue_results<I>(&self, results: I) -> &Self
    where
        I: IntoIterator<Item = MockArticlesResult>,
    {
        let mut state = self.state();
        state.mocked_results.extend(results);
        drop(state);
        self
    }

    /// Convenience to enqueue a single mocked result.
    pub fn enqueue<R>(&self, result: R) -> &Self
    where
        R: Into<MockArticlesResult>,
    {
        self.enqueue_results(std::iter::once(result.into()))
    }

    pub fn tracked_calls(&self) -> Vec<TrackedArticlesCall> {
        let state = self.state();
        state.tracked_calls.clone()
    }

    /// Clear both tracked calls and enqueued results.
    pub fn restore(&self) {
        let mut state = self.state();
        state.mocked_results.clear();
        state.tracked_calls.clear();
    }
}

impl ArticlesApi for MockArticlesApi {
    fn get_agent_articles<'a>(
        &'a self,
        agent_id: &'a str,
        options: GetAgentArticlesOptions,
    ) -> BoxFuture<'a, InkPilotsResult<AgentArticlesResponse>> {
        let result = {
            let mut state = self.state();
            state.tracked_calls.push(TrackedArticlesCall {
                agent_id: agent_id.to_string(),
                options,
            });
            state.mocked_results.pop_front()
        };

        Box::pin(async move {
            match result {
                Some(MockArticlesResult::Response(response)) => Ok(response),
                Some(MockArticlesResult::Error(error)) => Err(error),
                None => Err(InkPilotsError::InvalidResponse(
                    "no mocked get_agent_articles results available".to_string(),
                )),
            }
        })
    }
}
