use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    domain::FieldTree,
    form::{FocusColumn, FormCommand, FormEngine, FormState},
    presentation::{self, LevelPreview, UiContext},
};

use super::{
    input::{AppCommand, CommandDispatch, InputRouter},
    options::UiOptions,
    popup::TypePopup,
    status::StatusLine,
    terminal::TerminalGuard,
};

/// What the user saved before leaving the builder.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildResult {
    pub fields: FieldTree,
    pub document: Value,
}

pub(crate) struct App {
    form_state: FormState,
    options: UiOptions,
    title: String,
    status: StatusLine,
    exit_armed: bool,
    should_quit: bool,
    result: Option<BuildResult>,
    popup: Option<TypePopup>,
    input_router: InputRouter,
}

impl App {
    pub fn new(form_state: FormState, options: UiOptions, title: impl Into<String>) -> Self {
        let input_router = InputRouter::new(options.keymap.clone());
        Self {
            form_state,
            options,
            title: title.into(),
            status: StatusLine::new(),
            exit_armed: false,
            should_quit: false,
            result: None,
            popup: None,
            input_router,
        }
    }

    pub fn run(&mut self) -> Result<BuildResult> {
        let mut terminal = TerminalGuard::enter()?;
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            if !event::poll(self.options.tick_rate)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) => self.handle_key(key),
                Event::Resize(..) => {
                    terminal.autoresize()?;
                }
                Event::Mouse(_) | Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
            }
        }

        self.result
            .take()
            .ok_or_else(|| anyhow!("user exited without saving"))
    }

    fn current_help_text(&self) -> Option<String> {
        if !self.options.show_help {
            return None;
        }
        self.input_router
            .help_text(self.form_state.focused_row(), self.form_state.column())
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let help = self.current_help_text();
        let indent = self.options.preview_indent;
        let preview = self.form_state.editor().preview(indent);
        let level_preview = if self.options.show_level_preview {
            self.form_state
                .focused_nested_editor()
                .map(|(label, editor)| (label.to_string(), editor.preview(indent)))
        } else {
            None
        };
        let focus_label = self
            .form_state
            .focused_row()
            .map(|row| row.label.clone());
        let dirty = self.form_state.is_dirty();

        presentation::draw(
            frame,
            &mut self.form_state,
            UiContext {
                title: &self.title,
                preview: &preview,
                level_preview: level_preview.as_ref().map(|(label, text)| LevelPreview {
                    label,
                    text,
                }),
                status_message: self.status.message(),
                dirty,
                help: help.as_deref(),
                focus_label: focus_label.as_deref(),
                popup: self.popup.as_ref().map(TypePopup::as_render),
            },
        );
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if self.handle_popup_key(&key) {
            return;
        }

        let dispatch = self.input_router.classify(
            &key,
            self.form_state.focused_row(),
            self.form_state.column(),
        );
        match dispatch {
            CommandDispatch::Form(command) => self.dispatch_form_command(command),
            CommandDispatch::App(command) => self.handle_app_command(command),
            CommandDispatch::Input(event) => {
                self.dispatch_form_command(FormCommand::EditKey(event));
            }
        }
    }

    fn handle_popup_key(&mut self, key: &KeyEvent) -> bool {
        let Some(popup) = self.popup.as_mut() else {
            return false;
        };
        match key.code {
            KeyCode::Esc => {
                self.popup = None;
                self.status.ready();
            }
            KeyCode::Up | KeyCode::Left => popup.select_previous(),
            KeyCode::Down | KeyCode::Right => popup.select_next(),
            KeyCode::Enter => {
                let selection = popup.selection();
                self.popup = None;
                self.dispatch_form_command(FormCommand::SetType(selection));
            }
            _ => {}
        }
        true
    }

    fn dispatch_form_command(&mut self, command: FormCommand) {
        let mut engine = FormEngine::new(&mut self.form_state);
        match engine.dispatch(command) {
            Ok(Some(message)) => {
                self.exit_armed = false;
                self.status.set_raw(message);
            }
            Ok(None) => {}
            Err(message) => self.status.set_raw(message),
        }
    }

    fn handle_app_command(&mut self, command: AppCommand) {
        match command {
            AppCommand::Save => self.on_save(),
            AppCommand::Quit => self.on_exit(),
            AppCommand::ResetStatus => {
                self.exit_armed = false;
                self.status.ready();
            }
            AppCommand::Activate => self.on_activate(),
        }
    }

    /// Enter: add on an add row, open the selector on the type column,
    /// remove on the remove column, advance from the key column.
    fn on_activate(&mut self) {
        let Some(row) = self.form_state.focused_row() else {
            return;
        };
        if row.is_add() {
            self.dispatch_form_command(FormCommand::AppendField);
            return;
        }
        match self.form_state.column() {
            FocusColumn::Key => self.form_state.set_column(FocusColumn::Type),
            FocusColumn::Type => {
                if let Some(current) = row.field_type() {
                    self.popup = Some(TypePopup::new(&row.label, current));
                    self.status.choosing_type();
                }
            }
            FocusColumn::Remove => self.dispatch_form_command(FormCommand::RemoveField),
        }
    }

    fn on_save(&mut self) {
        let fields = self.form_state.fields().clone();
        let document = Value::Object(self.form_state.editor().derive_json());
        info!(fields = fields.len(), "saved preview");
        self.result = Some(BuildResult { fields, document });
        self.form_state.mark_clean();
        self.exit_armed = false;
        self.status.saved();
    }

    fn on_exit(&mut self) {
        if self.options.confirm_exit && self.form_state.is_dirty() && !self.exit_armed {
            self.exit_armed = true;
            self.status.pending_exit();
            return;
        }
        debug!(saved = self.result.is_some(), "leaving builder");
        self.should_quit = true;
    }
}
