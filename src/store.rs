//! Client-side state container: a pure reducer over [`StoreState`] plus
//! [`ToolStore`], which binds the reducer to an injectable API client.
//! Every state change goes through [`StoreState::apply`], so transition
//! semantics are testable without any UI or network.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::warn;

use crate::client::ApiClient;
use crate::models::{AppSettings, MessageResponse, Tool, ToolRequest, ToolResponse};
use crate::persist::PersistedState;

/// The API surface the store depends on. The HTTP client implements it;
/// tests substitute their own.
#[async_trait]
pub trait ToolsApi {
    async fn list_tools(&self) -> Result<Vec<Tool>>;
    async fn process_tool(&self, tool_id: &str, request: &ToolRequest) -> Result<ToolResponse>;
    async fn update_settings(&self, settings: &AppSettings) -> Result<MessageResponse>;
}

#[async_trait]
impl ToolsApi for ApiClient {
    async fn list_tools(&self) -> Result<Vec<Tool>> {
        ApiClient::list_tools(self).await
    }

    async fn process_tool(&self, tool_id: &str, request: &ToolRequest) -> Result<ToolResponse> {
        ApiClient::process_tool(self, tool_id, request).await
    }

    async fn update_settings(&self, settings: &AppSettings) -> Result<MessageResponse> {
        ApiClient::update_settings(self, settings).await
    }
}

/// Per-tool session state. Created lazily on first selection, retained for
/// the rest of the session so navigating away and back keeps work intact.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ToolState {
    pub input: String,
    pub output: String,
    pub processing: bool,
    pub error: Option<String>,
    pub settings: Map<String, Value>,
}

impl Default for ToolState {
    fn default() -> Self {
        Self {
            input: String::new(),
            output: String::new(),
            processing: false,
            error: None,
            settings: Map::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct StoreState {
    pub tools: Vec<Tool>,
    pub loading_tools: bool,
    pub tools_error: Option<String>,
    pub current_tool: Option<String>,
    pub tool_states: HashMap<String, ToolState>,
    pub settings: AppSettings,
}

#[derive(Debug, Clone)]
pub enum Action {
    ToolsLoading,
    ToolsLoaded(Vec<Tool>),
    ToolsFailed(String),
    SelectTool(Option<String>),
    SetInput { tool_id: String, input: String },
    SetToolSettings { tool_id: String, settings: Map<String, Value> },
    ProcessStarted { tool_id: String },
    ProcessCompleted { tool_id: String, response: ToolResponse },
    ProcessFailed { tool_id: String, message: String },
    ClearTool { tool_id: String },
    SettingsChanged(AppSettings),
}

impl StoreState {
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::ToolsLoading => {
                self.loading_tools = true;
                self.tools_error = None;
            }
            Action::ToolsLoaded(tools) => {
                self.tools = tools;
                self.loading_tools = false;
            }
            Action::ToolsFailed(message) => {
                self.tools_error = Some(message);
                self.loading_tools = false;
            }
            Action::SelectTool(tool_id) => {
                if let Some(ref id) = tool_id {
                    self.entry(id);
                }
                self.current_tool = tool_id;
            }
            Action::SetInput { tool_id, input } => {
                let state = self.entry(&tool_id);
                state.input = input;
                // Stale-error invalidation: editing clears the last failure.
                state.error = None;
            }
            Action::SetToolSettings { tool_id, settings } => {
                self.entry(&tool_id).settings = settings;
            }
            Action::ProcessStarted { tool_id } => {
                let state = self.entry(&tool_id);
                state.processing = true;
                state.error = None;
            }
            Action::ProcessCompleted { tool_id, response } => {
                let state = self.entry(&tool_id);
                state.output = response.output;
                state.error = response.error;
                state.processing = false;
            }
            Action::ProcessFailed { tool_id, message } => {
                let state = self.entry(&tool_id);
                state.error = Some(message);
                state.processing = false;
            }
            Action::ClearTool { tool_id } => {
                self.tool_states.insert(tool_id, ToolState::default());
            }
            Action::SettingsChanged(settings) => {
                self.settings = settings;
            }
        }
    }

    pub fn tool_state(&self, tool_id: &str) -> Option<&ToolState> {
        self.tool_states.get(tool_id)
    }

    pub fn current_state(&self) -> Option<&ToolState> {
        self.current_tool
            .as_deref()
            .and_then(|id| self.tool_states.get(id))
    }

    fn entry(&mut self, tool_id: &str) -> &mut ToolState {
        self.tool_states.entry(tool_id.to_string()).or_default()
    }
}

pub struct ToolStore<A> {
    state: StoreState,
    api: A,
}

impl<A: ToolsApi> ToolStore<A> {
    pub fn new(api: A) -> Self {
        Self {
            state: StoreState::default(),
            api,
        }
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) {
        self.state.apply(action);
    }

    pub async fn load_tools(&mut self) -> Result<()> {
        self.dispatch(Action::ToolsLoading);
        match self.api.list_tools().await {
            Ok(tools) => {
                self.dispatch(Action::ToolsLoaded(tools));
                Ok(())
            }
            Err(e) => {
                self.dispatch(Action::ToolsFailed(e.to_string()));
                Err(e)
            }
        }
    }

    pub fn select_tool(&mut self, tool_id: Option<&str>) {
        self.dispatch(Action::SelectTool(tool_id.map(str::to_string)));
    }

    pub fn set_input(&mut self, tool_id: &str, input: impl Into<String>) {
        self.dispatch(Action::SetInput {
            tool_id: tool_id.to_string(),
            input: input.into(),
        });
    }

    pub fn set_tool_settings(&mut self, tool_id: &str, settings: Map<String, Value>) {
        self.dispatch(Action::SetToolSettings {
            tool_id: tool_id.to_string(),
            settings,
        });
    }

    /// Run the current input through the backend. The request snapshot is
    /// taken before `ProcessStarted`, so edits racing the response cannot
    /// change what was sent. Errors are recorded in state and returned.
    pub async fn process(&mut self, tool_id: &str) -> Result<()> {
        let request = match self.state.tool_state(tool_id) {
            Some(state) => ToolRequest {
                input: state.input.clone(),
                settings: state.settings.clone(),
            },
            None => return Ok(()),
        };

        self.dispatch(Action::ProcessStarted {
            tool_id: tool_id.to_string(),
        });

        match self.api.process_tool(tool_id, &request).await {
            Ok(response) => {
                self.dispatch(Action::ProcessCompleted {
                    tool_id: tool_id.to_string(),
                    response,
                });
                Ok(())
            }
            Err(e) => {
                self.dispatch(Action::ProcessFailed {
                    tool_id: tool_id.to_string(),
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    pub fn clear(&mut self, tool_id: &str) {
        self.dispatch(Action::ClearTool {
            tool_id: tool_id.to_string(),
        });
    }

    pub fn update_settings(&mut self, settings: AppSettings) {
        self.dispatch(Action::SettingsChanged(settings));
    }

    /// Mirror settings to the backend. Best-effort: failures are logged and
    /// swallowed, local state stays authoritative.
    pub async fn save_settings(&self) {
        if let Err(e) = self.api.update_settings(&self.state.settings).await {
            warn!("Failed to save settings: {}", e);
        }
    }

    /// Restore a persisted snapshot. Any persisted `processing` flag is
    /// dropped: a restored session has no call in flight.
    pub fn hydrate(&mut self, persisted: PersistedState) {
        self.state.settings = persisted.settings;
        self.state.tool_states = persisted.tool_states;
        for state in self.state.tool_states.values_mut() {
            state.processing = false;
        }
    }

    pub fn snapshot(&self) -> PersistedState {
        PersistedState {
            settings: self.state.settings.clone(),
            tool_states: self.state.tool_states.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Theme;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeApi {
        tools: Vec<Tool>,
        list_error: Option<String>,
        process_result: Option<std::result::Result<ToolResponse, String>>,
        process_calls: Mutex<Vec<(String, ToolRequest)>>,
        settings_saved: Mutex<Vec<AppSettings>>,
    }

    #[async_trait]
    impl ToolsApi for FakeApi {
        async fn list_tools(&self) -> Result<Vec<Tool>> {
            match &self.list_error {
                Some(message) => Err(anyhow::anyhow!(message.clone())),
                None => Ok(self.tools.clone()),
            }
        }

        async fn process_tool(
            &self,
            tool_id: &str,
            request: &ToolRequest,
        ) -> Result<ToolResponse> {
            self.process_calls
                .lock()
                .unwrap()
                .push((tool_id.to_string(), request.clone()));
            match self.process_result.clone() {
                Some(Ok(response)) => Ok(response),
                Some(Err(message)) => Err(anyhow::anyhow!(message)),
                None => Ok(ToolResponse::ok("")),
            }
        }

        async fn update_settings(&self, settings: &AppSettings) -> Result<MessageResponse> {
            self.settings_saved.lock().unwrap().push(settings.clone());
            Ok(MessageResponse {
                message: "ok".to_string(),
            })
        }
    }

    #[test]
    fn select_creates_default_state_lazily() {
        let mut state = StoreState::default();
        assert!(state.tool_state("base64").is_none());

        state.apply(Action::SelectTool(Some("base64".to_string())));
        let tool_state = state.tool_state("base64").unwrap();
        assert_eq!(tool_state.input, "");
        assert_eq!(tool_state.output, "");
        assert!(!tool_state.processing);
        assert!(tool_state.error.is_none());

        state.apply(Action::SelectTool(None));
        assert!(state.current_tool.is_none());
        assert!(state.tool_state("base64").is_some());
    }

    #[test]
    fn set_input_clears_error_and_overwrites() {
        let mut state = StoreState::default();
        state.apply(Action::ProcessFailed {
            tool_id: "json".to_string(),
            message: "boom".to_string(),
        });

        state.apply(Action::SetInput {
            tool_id: "json".to_string(),
            input: "x".to_string(),
        });
        state.apply(Action::SetInput {
            tool_id: "json".to_string(),
            input: "y".to_string(),
        });

        let tool_state = state.tool_state("json").unwrap();
        assert_eq!(tool_state.input, "y");
        assert!(tool_state.error.is_none());
    }

    #[test]
    fn process_transitions_through_the_reducer() {
        let mut state = StoreState::default();
        state.apply(Action::SelectTool(Some("base64".to_string())));
        assert!(!state.tool_state("base64").unwrap().processing);

        state.apply(Action::ProcessStarted {
            tool_id: "base64".to_string(),
        });
        assert!(state.tool_state("base64").unwrap().processing);

        state.apply(Action::ProcessCompleted {
            tool_id: "base64".to_string(),
            response: ToolResponse::ok("aGVsbG8="),
        });
        let tool_state = state.tool_state("base64").unwrap();
        assert!(!tool_state.processing);
        assert_eq!(tool_state.output, "aGVsbG8=");
        assert!(tool_state.error.is_none());
    }

    #[test]
    fn soft_errors_land_in_the_error_field() {
        let mut state = StoreState::default();
        state.apply(Action::ProcessCompleted {
            tool_id: "json".to_string(),
            response: ToolResponse::err("Invalid JSON: oops"),
        });

        let tool_state = state.tool_state("json").unwrap();
        assert_eq!(tool_state.error.as_deref(), Some("Invalid JSON: oops"));
        assert_eq!(tool_state.output, "");
    }

    #[tokio::test]
    async fn process_success_sets_output() {
        let api = FakeApi {
            process_result: Some(Ok(ToolResponse::ok("aGVsbG8="))),
            ..FakeApi::default()
        };
        let mut store = ToolStore::new(api);
        store.select_tool(Some("base64"));
        store.set_input("base64", "hello");

        store.process("base64").await.unwrap();

        let tool_state = store.state().tool_state("base64").unwrap();
        assert_eq!(tool_state.output, "aGVsbG8=");
        assert!(!tool_state.processing);

        let calls = store.api.process_calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "base64");
        assert_eq!(calls[0].1.input, "hello");
    }

    #[tokio::test]
    async fn process_failure_keeps_prior_output() {
        let api = FakeApi {
            process_result: Some(Err("connection refused".to_string())),
            ..FakeApi::default()
        };
        let mut store = ToolStore::new(api);
        store.select_tool(Some("url"));
        store.dispatch(Action::ProcessCompleted {
            tool_id: "url".to_string(),
            response: ToolResponse::ok("earlier output"),
        });
        store.set_input("url", "a b");

        let result = store.process("url").await;
        assert!(result.is_err());

        let tool_state = store.state().tool_state("url").unwrap();
        assert_eq!(tool_state.error.as_deref(), Some("connection refused"));
        assert_eq!(tool_state.output, "earlier output");
        assert!(!tool_state.processing);
    }

    #[tokio::test]
    async fn process_without_state_is_a_no_op() {
        let api = FakeApi::default();
        let mut store = ToolStore::new(api);

        store.process("base64").await.unwrap();
        assert!(store.api.process_calls.lock().unwrap().is_empty());
        assert!(store.state().tool_state("base64").is_none());
    }

    #[test]
    fn clear_resets_to_defaults() {
        let mut state = StoreState::default();
        state.apply(Action::SetInput {
            tool_id: "html".to_string(),
            input: "<b>".to_string(),
        });
        state.apply(Action::ProcessCompleted {
            tool_id: "html".to_string(),
            response: ToolResponse::ok("&lt;b&gt;"),
        });

        state.apply(Action::ClearTool {
            tool_id: "html".to_string(),
        });
        assert_eq!(state.tool_state("html").unwrap(), &ToolState::default());
    }

    #[test]
    fn settings_changed_replaces_the_record() {
        let mut state = StoreState::default();
        let mut settings = AppSettings::default();
        settings.theme = Theme::Dark;
        settings.auto_save = false;

        state.apply(Action::SettingsChanged(settings.clone()));
        assert_eq!(state.settings, settings);
    }

    #[tokio::test]
    async fn load_tools_failure_is_recorded() {
        let api = FakeApi {
            list_error: Some("HTTP 500".to_string()),
            ..FakeApi::default()
        };
        let mut store = ToolStore::new(api);

        assert!(store.load_tools().await.is_err());
        assert_eq!(store.state().tools_error.as_deref(), Some("HTTP 500"));
        assert!(!store.state().loading_tools);
    }

    #[tokio::test]
    async fn save_settings_swallows_failures() {
        struct FailingApi;

        #[async_trait]
        impl ToolsApi for FailingApi {
            async fn list_tools(&self) -> Result<Vec<Tool>> {
                unreachable!()
            }
            async fn process_tool(&self, _: &str, _: &ToolRequest) -> Result<ToolResponse> {
                unreachable!()
            }
            async fn update_settings(&self, _: &AppSettings) -> Result<MessageResponse> {
                Err(anyhow::anyhow!("offline"))
            }
        }

        let store = ToolStore::new(FailingApi);
        store.save_settings().await;
    }

    #[test]
    fn hydrate_restores_snapshot_but_drops_processing() {
        let mut snapshot = PersistedState::default();
        snapshot.settings.theme = Theme::Dark;
        snapshot.tool_states.insert(
            "base64".to_string(),
            ToolState {
                input: "hello".to_string(),
                output: "aGVsbG8=".to_string(),
                processing: true,
                error: None,
                settings: Map::new(),
            },
        );

        let mut store = ToolStore::new(FakeApi::default());
        store.hydrate(snapshot);

        assert_eq!(store.state().settings.theme, Theme::Dark);
        let tool_state = store.state().tool_state("base64").unwrap();
        assert_eq!(tool_state.input, "hello");
        assert!(!tool_state.processing);

        let round_trip = store.snapshot();
        assert_eq!(round_trip.tool_states["base64"].output, "aGVsbG8=");
    }
}
