use std::{collections::VecDeque, path::PathBuf};

use anyhow::Result;

use crate::domain::{
    action_state::ActionKind,
    chat_message::ChatReply,
    events::{AppEvent, JobCompletion, KeyInput, ServerHealth},
    file_list_state::{EntryId, FileStatus},
    shell_state::{
        DropZoneState, FocusPane, Modal, ShellState, CLEAR_FAILURE_TEXT, CLEAR_SUCCESS_TEXT,
    },
    text_input_state::TextInputState,
};

use super::{
    contracts::{Clock, JobDispatcher, ShellOrchestrator},
    dispatcher::ApiJob,
    ingest_text::prepare_ingest,
    upload_files::{display_name, parse_dropped_paths},
};

const CHAT_SCROLL_STEP: usize = 5;

pub struct DefaultShellOrchestrator<D, C>
where
    D: JobDispatcher,
    C: Clock,
{
    state: ShellState,
    dispatcher: D,
    clock: C,
    pending_uploads: VecDeque<PathBuf>,
}

impl<D, C> DefaultShellOrchestrator<D, C>
where
    D: JobDispatcher,
    C: Clock,
{
    pub fn new(dispatcher: D, clock: C) -> Self {
        Self {
            state: ShellState::default(),
            dispatcher,
            clock,
            pending_uploads: VecDeque::new(),
        }
    }

    /// Queues the initial health probe.
    pub fn start(&mut self) {
        self.submit(ApiJob::Health);
    }

    fn submit(&mut self, job: ApiJob) {
        if let Err(error) = self.dispatcher.dispatch(job.clone()) {
            tracing::warn!(error = %error, "job dispatch failed; settling as failed");
            self.apply_completion(job.failure_completion());
        }
    }

    fn handle_key(&mut self, key: KeyInput) {
        if let Some(modal) = self.state.modal().cloned() {
            self.handle_modal_key(modal, &key);
            return;
        }

        if key.ctrl {
            match key.key.as_str() {
                "r" => self.submit(ApiJob::Health),
                "s" if self.state.focus() == FocusPane::IngestInput => self.submit_ingest(),
                _ => {}
            }
            return;
        }

        match key.key.as_str() {
            "tab" => {
                let next = self.state.focus().next();
                self.state.set_focus(next);
                return;
            }
            "backtab" => {
                let previous = self.state.focus().previous();
                self.state.set_focus(previous);
                return;
            }
            "pageup" => {
                self.state.chat_log_mut().scroll_up(CHAT_SCROLL_STEP);
                return;
            }
            "pagedown" => {
                self.state.chat_log_mut().scroll_down(CHAT_SCROLL_STEP);
                return;
            }
            _ => {}
        }

        match self.state.focus() {
            FocusPane::ChatInput => {
                if key.key == "enter" {
                    self.submit_chat();
                } else {
                    edit_text(self.state.chat_input_mut(), &key, false);
                }
            }
            FocusPane::IngestInput => {
                edit_text(self.state.ingest_input_mut(), &key, true);
            }
            FocusPane::FileList => self.handle_file_list_key(&key),
        }
    }

    fn handle_modal_key(&mut self, modal: Modal, key: &KeyInput) {
        match modal {
            Modal::Notice(_) => {
                self.state.close_modal();
            }
            Modal::ConfirmClear => match key.key.as_str() {
                "y" | "Y" => {
                    self.state.close_modal();
                    self.begin_clear();
                }
                "n" | "N" | "esc" => {
                    self.state.close_modal();
                    tracing::debug!("knowledge base clear cancelled");
                }
                _ => {}
            },
            Modal::UploadPrompt => match key.key.as_str() {
                "enter" => {
                    let raw = self.state.upload_prompt().text().to_owned();
                    self.drop_files(&raw);
                }
                "esc" => {
                    self.state.close_modal();
                    self.state.upload_prompt_mut().clear();
                    self.state.set_drop_zone(DropZoneState::Idle);
                }
                _ => edit_text(self.state.upload_prompt_mut(), key, false),
            },
        }
    }

    fn handle_file_list_key(&mut self, key: &KeyInput) {
        match key.key.as_str() {
            "u" => {
                self.state.upload_prompt_mut().clear();
                self.state.open_modal(Modal::UploadPrompt);
                self.state.set_drop_zone(DropZoneState::DragOver);
            }
            "x" => {
                if self.state.in_flight().is_busy(ActionKind::Clear) {
                    self.note_busy(ActionKind::Clear);
                } else {
                    self.state.open_modal(Modal::ConfirmClear);
                }
            }
            "j" | "down" => self.state.file_list_mut().select_next(),
            "k" | "up" => self.state.file_list_mut().select_previous(),
            _ => {}
        }
    }

    fn handle_paste(&mut self, pasted: &str) {
        match self.state.modal() {
            Some(Modal::UploadPrompt) => {
                self.drop_files(pasted);
                return;
            }
            Some(_) => return,
            None => {}
        }

        match self.state.focus() {
            FocusPane::ChatInput => self.state.chat_input_mut().insert_str(pasted, false),
            FocusPane::IngestInput => self.state.ingest_input_mut().insert_str(pasted, true),
            FocusPane::FileList => self.drop_files(pasted),
        }
    }

    fn submit_chat(&mut self) {
        let message = self.state.chat_input().trimmed().to_owned();
        if message.is_empty() {
            return;
        }

        if !self.state.in_flight_mut().try_begin(ActionKind::Chat) {
            self.note_busy(ActionKind::Chat);
            return;
        }

        self.state.chat_input_mut().clear();
        self.state.chat_log_mut().push_user(message.clone());
        self.state.chat_log_mut().push_loading();
        self.submit(ApiJob::Chat { message });
    }

    /// Treats `raw` as dropped paths and starts a sequential upload batch.
    fn drop_files(&mut self, raw: &str) {
        self.state.close_modal();
        self.state.upload_prompt_mut().clear();
        self.state.set_drop_zone(DropZoneState::Idle);

        let paths = parse_dropped_paths(raw);
        if paths.is_empty() {
            return;
        }

        if !self.state.in_flight_mut().try_begin(ActionKind::Upload) {
            self.note_busy(ActionKind::Upload);
            return;
        }

        tracing::info!(files = paths.len(), "starting upload batch");
        self.pending_uploads = paths.into();
        self.start_next_upload();
    }

    fn start_next_upload(&mut self) {
        let Some(path) = self.pending_uploads.pop_front() else {
            self.state.in_flight_mut().finish(ActionKind::Upload);
            return;
        };

        let entry = self
            .state
            .file_list_mut()
            .add(display_name(&path), FileStatus::Uploading);
        self.submit(ApiJob::Upload { entry, path });
    }

    fn submit_ingest(&mut self) {
        let Some(prepared) = prepare_ingest(self.state.ingest_input().text(), self.clock.now())
        else {
            return;
        };

        if !self.state.in_flight_mut().try_begin(ActionKind::Ingest) {
            self.note_busy(ActionKind::Ingest);
            return;
        }

        let entry = self
            .state
            .file_list_mut()
            .add(prepared.display_name.clone(), FileStatus::Ingesting);
        self.submit(ApiJob::Ingest { entry, prepared });
    }

    fn begin_clear(&mut self) {
        if !self.state.in_flight_mut().try_begin(ActionKind::Clear) {
            self.note_busy(ActionKind::Clear);
            return;
        }

        self.submit(ApiJob::Clear);
    }

    fn apply_completion(&mut self, completion: JobCompletion) {
        match completion {
            JobCompletion::Chat(reply) => {
                match &reply {
                    ChatReply::Answer { .. } => {
                        self.state.set_server_health(ServerHealth::Healthy);
                    }
                    ChatReply::ConnectionFailure => {
                        self.state.set_server_health(ServerHealth::Unreachable);
                    }
                    ChatReply::ApplicationFailure => {}
                }
                self.state.chat_log_mut().resolve_loading(reply);
                self.state.in_flight_mut().finish(ActionKind::Chat);
            }
            JobCompletion::Upload { entry, succeeded } => {
                self.settle_entry(entry, succeeded);
                self.start_next_upload();
            }
            JobCompletion::Ingest { entry, succeeded } => {
                self.settle_entry(entry, succeeded);
                self.state.in_flight_mut().finish(ActionKind::Ingest);
                if succeeded {
                    self.state.ingest_input_mut().clear();
                }
            }
            JobCompletion::Clear { succeeded } => {
                self.state.in_flight_mut().finish(ActionKind::Clear);
                let notice = if succeeded {
                    self.state.file_list_mut().clear();
                    tracing::info!("knowledge base cleared");
                    CLEAR_SUCCESS_TEXT
                } else {
                    CLEAR_FAILURE_TEXT
                };
                self.state.open_modal(Modal::Notice(notice.to_owned()));
            }
            JobCompletion::Health(health) => self.state.set_server_health(health),
        }
    }

    fn settle_entry(&mut self, entry: EntryId, succeeded: bool) {
        let status = FileStatus::settled(succeeded);
        if !self.state.file_list_mut().settle(entry, status) {
            tracing::debug!(?entry, "completion for a row that is gone or settled");
        }
    }

    fn note_busy(&mut self, action: ActionKind) {
        tracing::debug!(action = action.as_label(), "action already in flight; ignored");
        self.state
            .set_status_note(format!("{} already in progress", action.as_label()));
    }
}

impl<D, C> ShellOrchestrator for DefaultShellOrchestrator<D, C>
where
    D: JobDispatcher,
    C: Clock,
{
    fn state(&self) -> &ShellState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ShellState {
        &mut self.state
    }

    fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Tick => {}
            AppEvent::QuitRequested => self.state.stop(),
            AppEvent::InputKey(key) => {
                self.state.clear_status_note();
                self.handle_key(key);
            }
            AppEvent::Paste(text) => {
                self.state.clear_status_note();
                self.handle_paste(&text);
            }
            AppEvent::JobCompleted(completion) => self.apply_completion(completion),
        }

        Ok(())
    }
}

/// Applies an editing key to `input`; `enter` inserts a newline when `multiline`.
fn edit_text(input: &mut TextInputState, key: &KeyInput, multiline: bool) {
    match key.key.as_str() {
        "backspace" => input.delete_char_before(),
        "delete" => input.delete_char_at(),
        "left" => input.move_cursor_left(),
        "right" => input.move_cursor_right(),
        "home" => input.move_cursor_home(),
        "end" => input.move_cursor_end(),
        "enter" if multiline => {
            input.insert_char('\n');
        }
        other => {
            let mut chars = other.chars();
            if let (Some(ch), None) = (chars.next(), chars.next()) {
                input.insert_char(ch);
            }
        }
    }
}
