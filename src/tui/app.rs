use serde_json::Value;
use std::path::PathBuf;
use tracing::warn;

use crate::client::ApiClient;
use crate::models::Theme;
use crate::persist;
use crate::store::ToolStore;
use crate::tools;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Tools,
    Input,
}

pub struct App {
    pub should_quit: bool,
    pub api_url: String,
    pub store: ToolStore<ApiClient>,
    pub focus: Focus,
    pub selected_index: Option<usize>,
    pub status_message: String,
    pub state_path: PathBuf,
}

impl App {
    pub fn new(api_url: String, state_path: PathBuf) -> Self {
        let store = ToolStore::new(ApiClient::new(api_url.clone()));
        Self {
            should_quit: false,
            api_url,
            store,
            focus: Focus::Tools,
            selected_index: None,
            status_message: String::new(),
            state_path,
        }
    }

    /// Restore the previous session's snapshot, if any. Corrupt state files
    /// are ignored rather than blocking startup.
    pub fn restore_session(&mut self) {
        match persist::load(&self.state_path) {
            Ok(Some(snapshot)) => self.store.hydrate(snapshot),
            Ok(None) => {}
            Err(e) => warn!("Ignoring unreadable state file: {}", e),
        }
    }

    pub fn quit(&mut self) {
        self.persist_session();
        self.should_quit = true;
    }

    pub async fn reload_tools(&mut self) {
        self.status_message = "Loading tools...".to_string();
        match self.store.load_tools().await {
            Ok(()) => {
                let count = self.store.state().tools.len();
                self.status_message = format!("Loaded {} tools", count);
                // Keep the selection valid if the list changed size.
                match self.selected_index {
                    Some(i) if i >= count => {
                        self.selected_index = count.checked_sub(1);
                    }
                    None if count > 0 => {
                        self.selected_index = Some(0);
                    }
                    _ => {}
                }
            }
            Err(e) => {
                self.status_message = format!("Error loading tools: {}", e);
            }
        }
    }

    pub fn select_next_tool(&mut self) {
        let len = self.store.state().tools.len();
        if len == 0 {
            return;
        }
        self.selected_index = Some(match self.selected_index {
            Some(i) => (i + 1) % len,
            None => 0,
        });
    }

    pub fn select_previous_tool(&mut self) {
        let len = self.store.state().tools.len();
        if len == 0 {
            return;
        }
        self.selected_index = Some(match self.selected_index {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => len - 1,
        });
    }

    pub fn selected_tool_id(&self) -> Option<String> {
        self.selected_index
            .and_then(|i| self.store.state().tools.get(i))
            .map(|tool| tool.id.clone())
    }

    pub fn open_selected_tool(&mut self) {
        if let Some(tool_id) = self.selected_tool_id() {
            self.store.select_tool(Some(&tool_id));
            self.status_message = format!("Opened {}", tool_id);
        }
    }

    pub fn current_tool_id(&self) -> Option<String> {
        self.store.state().current_tool.clone()
    }

    pub fn start_editing(&mut self) {
        if self.current_tool_id().is_some() {
            self.focus = Focus::Input;
        } else {
            self.status_message = "Open a tool first (Enter)".to_string();
        }
    }

    pub fn stop_editing(&mut self) {
        self.focus = Focus::Tools;
    }

    pub fn push_input_char(&mut self, c: char) {
        if let Some(tool_id) = self.current_tool_id() {
            let mut input = self.current_input();
            input.push(c);
            self.store.set_input(&tool_id, input);
        }
    }

    pub fn push_input_newline(&mut self) {
        self.push_input_char('\n');
    }

    pub fn pop_input_char(&mut self) {
        if let Some(tool_id) = self.current_tool_id() {
            let mut input = self.current_input();
            input.pop();
            self.store.set_input(&tool_id, input);
        }
    }

    /// Rotate the current tool's `mode` setting through its mode cycle.
    pub fn cycle_mode(&mut self) {
        let Some(tool_id) = self.current_tool_id() else {
            return;
        };
        let modes = tools::modes(&tool_id);
        if modes.is_empty() {
            return;
        }

        let current = self.current_mode();
        let position = modes.iter().position(|m| *m == current);
        let next = match position {
            Some(i) => modes[(i + 1) % modes.len()],
            None => modes[0],
        };

        let mut settings = self
            .store
            .state()
            .tool_state(&tool_id)
            .map(|state| state.settings.clone())
            .unwrap_or_default();
        settings.insert("mode".to_string(), Value::String(next.to_string()));
        self.store.set_tool_settings(&tool_id, settings);
        self.status_message = format!("Mode: {}", next);
    }

    pub fn current_mode(&self) -> String {
        let Some(tool_id) = self.current_tool_id() else {
            return String::new();
        };
        self.store
            .state()
            .tool_state(&tool_id)
            .and_then(|state| state.settings.get("mode"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| {
                tools::modes(&tool_id)
                    .first()
                    .copied()
                    .unwrap_or_default()
                    .to_string()
            })
    }

    /// Trigger processing for the open tool. Preconditions are UI-enforced:
    /// non-empty input and no call already in flight.
    pub async fn process_current(&mut self) {
        let Some(tool_id) = self.current_tool_id() else {
            self.status_message = "Open a tool first (Enter)".to_string();
            return;
        };

        let tool_state = self.store.state().tool_state(&tool_id);
        let input_empty = tool_state.map(|s| s.input.is_empty()).unwrap_or(true);
        let processing = tool_state.map(|s| s.processing).unwrap_or(false);
        if input_empty {
            self.status_message = "Nothing to process: input is empty".to_string();
            return;
        }
        if processing {
            self.status_message = "Already processing".to_string();
            return;
        }

        self.status_message = format!("Processing {}...", tool_id);
        match self.store.process(&tool_id).await {
            Ok(()) => {
                let error = self
                    .store
                    .state()
                    .tool_state(&tool_id)
                    .and_then(|s| s.error.clone());
                self.status_message = match error {
                    Some(e) => format!("{} failed: {}", tool_id, e),
                    None => format!("Processed {}", tool_id),
                };
            }
            Err(e) => {
                self.status_message = format!("Request failed: {}", e);
            }
        }

        self.persist_session();
    }

    pub fn clear_current(&mut self) {
        if let Some(tool_id) = self.current_tool_id() {
            self.store.clear(&tool_id);
            self.status_message = format!("Cleared {}", tool_id);
        }
    }

    pub async fn save_settings(&mut self) {
        self.store.save_settings().await;
        self.status_message = "Settings mirrored to server".to_string();
    }

    pub fn toggle_theme(&mut self) {
        let mut settings = self.store.state().settings.clone();
        settings.theme = match settings.theme {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::System,
            Theme::System => Theme::Light,
        };
        self.status_message = format!("Theme: {:?}", settings.theme).to_lowercase();
        self.store.update_settings(settings);
        self.persist_session();
    }

    fn current_input(&self) -> String {
        self.current_tool_id()
            .and_then(|id| self.store.state().tool_state(&id).map(|s| s.input.clone()))
            .unwrap_or_default()
    }

    fn persist_session(&mut self) {
        if !self.store.state().settings.auto_save {
            return;
        }
        if let Err(e) = persist::save(&self.state_path, &self.store.snapshot()) {
            self.status_message = format!("Failed to save session: {}", e);
        }
    }
}
