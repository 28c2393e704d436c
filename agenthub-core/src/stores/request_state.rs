use std::future::Future;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::error::HubResult;
use crate::models::{Agent, Chat};

const UNKNOWN_ERROR: &str = "Unknown error";

/// Loading flag, last error and last data of one kind of request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestState<T> {
    pub is_loading: bool,
    pub error: Option<String>,
    pub data: Option<T>,
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self {
            is_loading: false,
            error: None,
            data: None,
        }
    }
}

impl<T> RequestState<T> {
    pub fn begin(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    pub fn succeed(&mut self, data: T) {
        self.is_loading = false;
        self.data = Some(data);
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.is_loading = false;
        self.data = None;
        self.error = Some(if message.is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            message
        });
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RequestStates {
    pub agents: RequestState<Vec<Agent>>,
    pub chats: RequestState<Vec<Chat>>,
    pub send_message: RequestState<()>,
}

impl RequestStates {
    pub fn is_any_loading(&self) -> bool {
        self.agents.is_loading || self.chats.is_loading || self.send_message.is_loading
    }

    pub fn clear_all(&mut self) {
        self.agents.reset();
        self.chats.reset();
        self.send_message.reset();
    }
}

/// Runs `request` while tracking it in the slot selected from `owner`.
///
/// The lock is not held while the request is pending.
pub async fn execute<S, T, Fut>(
    owner: &RwLock<S>,
    slot: fn(&mut S) -> &mut RequestState<T>,
    request: Fut,
) -> HubResult<T>
where
    T: Clone,
    Fut: Future<Output = HubResult<T>>,
{
    slot(&mut *owner.write().await).begin();

    let result = request.await;

    let mut guard = owner.write().await;
    let state = slot(&mut *guard);
    match &result {
        Ok(data) => state.succeed(data.clone()),
        Err(e) => state.fail(e.display_message()),
    }

    result
}
