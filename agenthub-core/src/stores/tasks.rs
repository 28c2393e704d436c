use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use serde::Serialize;
use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::api::HubClient;
use crate::config::StreamConfig;
use crate::error::{HubError, HubResult};
use crate::models::{ChatMessage, Sender, Task, TaskAgent, TaskCreate};
use crate::stream::{FrameDecoder, StreamEvent};

/// Live progress of the chat stream of one task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StreamProgress {
    pub is_streaming: bool,
    /// Transient agent response, replaced by every `chunk` event.
    pub response: String,
    pub error: Option<String>,
    #[serde(skip)]
    stream_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TasksState {
    pub tasks: Vec<Task>,
    pub active_task_id: Option<String>,
    pub active_agent_id: Option<String>,
    pub streams: HashMap<String, StreamProgress>,
    pub loading: bool,
    pub error: Option<String>,
}

impl TasksState {
    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn current_task(&self) -> Option<&Task> {
        self.task(self.active_task_id.as_deref()?)
    }

    pub fn current_agent(&self) -> Option<&TaskAgent> {
        self.current_task()?.agent(self.active_agent_id.as_deref()?)
    }

    /// Chat history of the current task; empty when no task is active.
    pub fn active_chat(&self) -> &[ChatMessage] {
        self.current_task()
            .map(|t| t.chat_history.as_slice())
            .unwrap_or(&[])
    }

    pub fn progress(&self, task_id: &str) -> StreamProgress {
        self.streams.get(task_id).cloned().unwrap_or_default()
    }

    pub fn is_streaming(&self, task_id: &str) -> bool {
        self.streams
            .get(task_id)
            .map(|p| p.is_streaming)
            .unwrap_or(false)
    }

    fn append_message(&mut self, task_id: &str, message: ChatMessage) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == task_id) {
            Some(task) => {
                task.chat_history.push(message);
                true
            }
            None => false,
        }
    }

    fn replace_history(&mut self, task_id: &str, history: Vec<ChatMessage>) {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) {
            task.chat_history = history;
        }
    }

    fn upsert_task(&mut self, task: Task) {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task,
            None => self.tasks.insert(0, task),
        }
    }

    /// Merges one stream event into the state of the stream for `task_id`.
    ///
    /// `chunk` replaces the transient response. `task_completed` commits a
    /// non-empty transient response as one agent message, then replaces the
    /// history if the event carries one, then clears the transient response.
    /// `error` only sets the error field.
    pub fn apply_event(&mut self, task_id: &str, event: &StreamEvent) {
        match event {
            StreamEvent::Chunk(data) => {
                self.streams.entry(task_id.to_string()).or_default().response = data.text.clone();
            }
            StreamEvent::AgentCreated(_) => {}
            StreamEvent::TaskCompleted(data) => {
                let response = self
                    .streams
                    .get_mut(task_id)
                    .map(|p| std::mem::take(&mut p.response))
                    .unwrap_or_default();

                if !response.is_empty() {
                    if let Some(target) = data.task_id.as_deref() {
                        self.append_message(target, ChatMessage::now(Sender::Agent, response));
                    }
                }

                if let Some(history) = &data.chat_history {
                    let target = data.task_id.as_deref().unwrap_or(task_id);
                    self.replace_history(target, history.clone());
                }
            }
            StreamEvent::Error(data) => {
                self.streams.entry(task_id.to_string()).or_default().error =
                    Some(data.message.clone());
            }
        }
    }

    /// Commits a transient response left over when the body ended without a
    /// `task_completed` event. Returns true if a message was appended.
    pub fn flush_response(&mut self, task_id: &str) -> bool {
        let response = self
            .streams
            .get_mut(task_id)
            .map(|p| std::mem::take(&mut p.response))
            .unwrap_or_default();

        if response.is_empty() {
            return false;
        }
        self.append_message(task_id, ChatMessage::now(Sender::Agent, response))
    }

    fn owns_stream(&self, task_id: &str, stream_id: Uuid) -> bool {
        self.streams
            .get(task_id)
            .map(|p| p.stream_id == Some(stream_id))
            .unwrap_or(false)
    }
}

/// Event observed on a task's chat stream.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskStreamEvent {
    pub task_id: String,
    pub event: StreamEvent,
}

struct InFlight {
    stream_id: Uuid,
    abort: AbortHandle,
}

/// Tasks from the hub backend and the merge of their streamed chat replies.
///
/// Streams are keyed by task id. Starting a stream for a task that already
/// has one aborts the older stream; streams of different tasks run side by
/// side.
#[derive(Clone)]
pub struct TaskStore {
    client: HubClient,
    state: Arc<RwLock<TasksState>>,
    in_flight: Arc<Mutex<HashMap<String, InFlight>>>,
    events: broadcast::Sender<TaskStreamEvent>,
    flush_on_end: bool,
}

impl TaskStore {
    pub fn new(client: HubClient, stream: &StreamConfig) -> Self {
        let (events, _) = broadcast::channel(stream.event_buffer.max(1));
        Self {
            client,
            state: Arc::new(RwLock::new(TasksState::default())),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            events,
            flush_on_end: stream.flush_on_end,
        }
    }

    pub fn client(&self) -> &HubClient {
        &self.client
    }

    /// Receives every decoded stream event, including `agent_created`.
    pub fn subscribe(&self) -> broadcast::Receiver<TaskStreamEvent> {
        self.events.subscribe()
    }

    pub async fn state(&self) -> TasksState {
        self.state.read().await.clone()
    }

    pub async fn current_task(&self) -> Option<Task> {
        self.state.read().await.current_task().cloned()
    }

    pub async fn current_agent(&self) -> Option<TaskAgent> {
        self.state.read().await.current_agent().cloned()
    }

    pub async fn active_chat(&self) -> Vec<ChatMessage> {
        self.state.read().await.active_chat().to_vec()
    }

    pub async fn progress(&self, task_id: &str) -> StreamProgress {
        self.state.read().await.progress(task_id)
    }

    pub async fn create_task_with_agents(
        &self,
        title: &str,
        description: &str,
        user_message: &str,
    ) -> HubResult<Task> {
        let body = TaskCreate {
            title: title.to_string(),
            description: description.to_string(),
            user_message: user_message.to_string(),
        };

        self.begin_loading().await;
        let result = self.client.create_task(&body).await;

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(task) => {
                info!(task_id = %task.id, "Created task '{}'", task.title);
                state.active_task_id = Some(task.id.clone());
                state.active_agent_id = Some(task.main_agent_id.clone());
                state.tasks.retain(|t| t.id != task.id);
                state.tasks.insert(0, task.clone());
                Ok(task)
            }
            Err(e) => Err(Self::record_failure(&mut state, e)),
        }
    }

    pub async fn list_tasks(&self) -> HubResult<Vec<Task>> {
        self.begin_loading().await;
        let result = self.client.list_tasks().await;

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(tasks) => {
                debug!("Loaded {} tasks", tasks.len());
                state.tasks = tasks.clone();
                Ok(tasks)
            }
            Err(e) => Err(Self::record_failure(&mut state, e)),
        }
    }

    /// Fetches one task and inserts or replaces it in the list.
    pub async fn refresh_task(&self, task_id: &str) -> HubResult<Task> {
        let result = self.client.get_task(task_id).await;

        let mut state = self.state.write().await;
        match result {
            Ok(task) => {
                state.upsert_task(task.clone());
                state.error = None;
                Ok(task)
            }
            Err(e) => Err(Self::record_failure(&mut state, e)),
        }
    }

    pub async fn task_agents(&self, task_id: &str) -> HubResult<Vec<TaskAgent>> {
        let result = self.client.task_agents(task_id).await;

        let mut state = self.state.write().await;
        match result {
            Ok(agents) => {
                if let Some(task) = state.tasks.iter_mut().find(|t| t.id == task_id) {
                    task.agents = agents.clone();
                }
                Ok(agents)
            }
            Err(e) => Err(Self::record_failure(&mut state, e)),
        }
    }

    pub async fn chat_with_agent(&self, agent_id: &str, message: &str) -> HubResult<String> {
        self.client.chat_with_agent(agent_id, message).await
    }

    /// Selects a task and clears the selected agent.
    pub async fn set_active_task(&self, task_id: &str) {
        let mut state = self.state.write().await;
        state.active_task_id = Some(task_id.to_string());
        state.active_agent_id = None;
    }

    pub async fn set_active_agent(&self, agent_id: &str) {
        self.state.write().await.active_agent_id = Some(agent_id.to_string());
    }

    /// Sends `message` to the task's chat stream and waits for the stream to
    /// end. Returns [`HubError::StreamCancelled`] if it was replaced or
    /// cancelled before finishing.
    pub async fn stream_chat_message(&self, task_id: &str, message: &str) -> HubResult<()> {
        let handle = self.start_stream(task_id, message).await;
        match handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(HubError::StreamCancelled(task_id.to_string())),
            Err(e) => Err(HubError::Internal(format!("Stream task failed: {}", e))),
        }
    }

    /// Starts streaming `message` for `task_id` in the background.
    ///
    /// The user message is appended before this returns.
    pub async fn start_stream(&self, task_id: &str, message: &str) -> JoinHandle<HubResult<()>> {
        let user_message = ChatMessage::now(Sender::User, message);
        let store = self.clone();
        let owned_task = task_id.to_string();
        let owned_message = message.to_string();

        self.launch(task_id, Some(user_message), move |stream_id| async move {
            let response = store
                .client
                .open_chat_stream(&owned_task, &owned_message)
                .await?;
            store
                .consume(stream_id, &owned_task, response.bytes_stream())
                .await
        })
        .await
    }

    /// Applies an already open body to the task's stream state, with the
    /// same replacement and end-of-stream rules as [`Self::start_stream`].
    pub async fn ingest_stream<S, B, E>(&self, task_id: &str, body: S) -> JoinHandle<HubResult<()>>
    where
        S: Stream<Item = Result<B, E>> + Send + 'static,
        B: AsRef<[u8]> + Send,
        E: Display + Send,
    {
        let store = self.clone();
        let owned_task = task_id.to_string();

        self.launch(task_id, None, move |stream_id| async move {
            store.consume(stream_id, &owned_task, body).await
        })
        .await
    }

    async fn launch<F, Fut>(
        &self,
        task_id: &str,
        user_message: Option<ChatMessage>,
        run: F,
    ) -> JoinHandle<HubResult<()>>
    where
        F: FnOnce(Uuid) -> Fut,
        Fut: std::future::Future<Output = HubResult<()>> + Send + 'static,
    {
        let stream_id = Uuid::new_v4();
        let mut in_flight = self.in_flight.lock().await;

        if let Some(previous) = in_flight.remove(task_id) {
            info!(task_id = %task_id, "Replacing in-flight stream {}", previous.stream_id);
            previous.abort.abort();
        }

        {
            let mut state = self.state.write().await;
            state.streams.insert(
                task_id.to_string(),
                StreamProgress {
                    is_streaming: true,
                    response: String::new(),
                    error: None,
                    stream_id: Some(stream_id),
                },
            );
            if let Some(message) = user_message {
                state.append_message(task_id, message);
            }
        }

        let store = self.clone();
        let owned_task = task_id.to_string();
        let work = run(stream_id);

        let handle = tokio::spawn(async move {
            let result = work.await;
            store.finish(stream_id, &owned_task, &result).await;
            result
        });

        in_flight.insert(
            task_id.to_string(),
            InFlight {
                stream_id,
                abort: handle.abort_handle(),
            },
        );
        debug!(task_id = %task_id, stream_id = %stream_id, "Stream started");

        handle
    }

    async fn consume<S, B, E>(&self, stream_id: Uuid, task_id: &str, body: S) -> HubResult<()>
    where
        S: Stream<Item = Result<B, E>>,
        B: AsRef<[u8]>,
        E: Display,
    {
        let mut body = std::pin::pin!(body);
        let mut decoder = FrameDecoder::new();

        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| HubError::StreamReadFailed(e.to_string()))?;
            for payload in decoder.push(chunk.as_ref()) {
                self.handle_payload(stream_id, task_id, &payload).await;
            }
        }

        if let Some(payload) = decoder.finish() {
            self.handle_payload(stream_id, task_id, &payload).await;
        }

        Ok(())
    }

    async fn handle_payload(&self, stream_id: Uuid, task_id: &str, payload: &str) {
        let event = match StreamEvent::parse(payload) {
            Ok(event) => event,
            Err(e) => {
                warn!(task_id = %task_id, "Skipping stream frame: {}", e);
                return;
            }
        };

        {
            let mut state = self.state.write().await;
            if !state.owns_stream(task_id, stream_id) {
                return;
            }
            state.apply_event(task_id, &event);
        }

        let _ = self.events.send(TaskStreamEvent {
            task_id: task_id.to_string(),
            event,
        });
    }

    async fn finish(&self, stream_id: Uuid, task_id: &str, result: &HubResult<()>) {
        {
            let mut state = self.state.write().await;
            if state.owns_stream(task_id, stream_id) {
                match result {
                    Ok(()) => {
                        if self.flush_on_end && state.flush_response(task_id) {
                            debug!(task_id = %task_id, "Flushed uncommitted response");
                        }
                    }
                    Err(e) => {
                        warn!(task_id = %task_id, "Streaming error: {}", e);
                        if let Some(progress) = state.streams.get_mut(task_id) {
                            progress.error = Some(e.display_message());
                        }
                    }
                }
                if let Some(progress) = state.streams.get_mut(task_id) {
                    progress.is_streaming = false;
                    progress.stream_id = None;
                }
            }
        }

        let mut in_flight = self.in_flight.lock().await;
        if in_flight
            .get(task_id)
            .map(|f| f.stream_id == stream_id)
            .unwrap_or(false)
        {
            in_flight.remove(task_id);
        }
        info!(task_id = %task_id, "Stream finished");
    }

    /// Aborts the stream of one task, discarding its transient response.
    pub async fn cancel_stream(&self, task_id: &str) -> bool {
        let Some(previous) = self.in_flight.lock().await.remove(task_id) else {
            return false;
        };
        previous.abort.abort();

        let mut state = self.state.write().await;
        if let Some(progress) = state.streams.get_mut(task_id) {
            progress.is_streaming = false;
            progress.response.clear();
            progress.stream_id = None;
        }
        info!(task_id = %task_id, "Stream cancelled");
        true
    }

    /// Aborts every stream and resets all progress.
    pub async fn clear_streaming_state(&self) {
        for (_, flight) in self.in_flight.lock().await.drain() {
            flight.abort.abort();
        }
        self.state.write().await.streams.clear();
    }

    pub async fn active_streams(&self) -> Vec<String> {
        self.in_flight.lock().await.keys().cloned().collect()
    }

    async fn begin_loading(&self) {
        let mut state = self.state.write().await;
        state.loading = true;
        state.error = None;
    }

    fn record_failure(state: &mut TasksState, err: HubError) -> HubError {
        err.log();
        state.error = Some(err.display_message());
        err
    }
}
