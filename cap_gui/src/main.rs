//! # Pilecap GUI Application
//!
//! Desktop client for pile-cap design. The form and reaction table feed the
//! staged workflow in `cap_core`; the calculation service does the
//! engineering, and this application draws and tabulates what comes back.
//!
//! ## Layout
//!
//! - Toolbar: session New / Open / Save / Save As
//! - Left: session info, design inputs, reaction table, step buttons
//! - Right: pile plan, force tables, footing/shear/advanced results
//! - Bottom: file, lock holder, workflow stage, status

mod form;
mod ui;

use std::path::PathBuf;

use iced::widget::{column, row, stack, text};
use iced::{Element, Length, Padding, Task};
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cap_core::config::ClientConfig;
use cap_core::errors::{CapError, CapResult};
use cap_core::file_io::{load_session_with_lock_check, save_session, with_session_extension, SessionLock};
use cap_core::hit_test::Interaction;
use cap_core::layout::{DesignInputs, LayoutRequest};
use cap_core::reactions::{ReactionField, ReactionRow, ReactionTable};
use cap_core::service::{CoordinatesResponse, DesignCheck, DesignCheckRequest, ServiceClient};
use cap_core::session::DesignSession;
use cap_core::viewport::{PointerEvent, Viewport};
use cap_core::workflow::{AdvancedJob, Applied, ForceJob, LayoutJob, WorkflowController};

use form::{DesignForm, FormField};
use ui::modal::{ModalType, PendingAction};

pub const SAVED_MESSAGE: &str = "Load combinations saved successfully";
const SESSION_FILTER: (&str, &[&str]) = ("Pile cap session", &["pcap"]);

fn main() -> iced::Result {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cap_core=info,cap_gui=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting Pilecap");

    iced::application(App::new, App::update, App::view)
        .title(App::title)
        .window_size((1360.0, 900.0))
        .run()
}

#[derive(Debug, Clone)]
pub enum Message {
    // Session
    NewSession,
    OpenSession,
    SaveSession,
    SaveSessionAs,
    SessionPicked(Option<PathBuf>),
    SaveTargetPicked(Option<PathBuf>),
    EngineerChanged(String),
    JobIdChanged(String),
    ClientChanged(String),
    ModalSave,
    ModalDontSave,
    ModalCancel,

    // Design form
    FormChanged(FormField, String),

    // Quick check of the design inputs
    CheckDesign,
    DesignChecked(u64, CapResult<DesignCheck>),

    // Workflow steps
    GenerateCoordinates,
    CoordinatesLoaded(LayoutJob, CapResult<CoordinatesResponse>),
    CalculateForces,
    ForcesLoaded(ForceJob, CapResult<CoordinatesResponse>),
    CalculateAdvanced,
    AdvancedLoaded(AdvancedJob, CapResult<Value>),

    // Reaction table
    ReactionsFetched(CapResult<Vec<ReactionRow>>),
    ReactionCellChanged(usize, ReactionField, String),
    ReactionPasteRequested(usize, ReactionField),
    ReactionClipboard(usize, ReactionField, Option<String>),
    AddReactionRow,
    ClearReactions,
    ToggleReactionEditing,
    SaveReactions,
    ReactionsSaved(CapResult<Vec<ReactionRow>>),

    // Plan drawing
    Pointer(PointerEvent),
}

pub struct App {
    client: Option<ServiceClient>,
    pub session: DesignSession,
    pub current_file: Option<PathBuf>,
    lock: Option<SessionLock>,
    pub lock_holder: Option<String>,
    pub is_modified: bool,
    pub modal: Option<ModalType>,

    pub form: DesignForm,
    pub workflow: WorkflowController,
    pub interaction: Interaction,
    pub reactions: ReactionTable,
    /// Last quick check, for the inputs currently in the form
    pub design_check: Option<DesignCheck>,
    /// Bumped whenever a check result would no longer match the form
    check_seq: u64,

    /// Label of the request in flight, if any
    pub busy: Option<&'static str>,
    /// Confirmation of the last successful action
    pub notice: Option<String>,
    pub status: String,
}

impl App {
    fn new() -> (Self, Task<Message>) {
        let config = ClientConfig::from_env();
        tracing::info!(service = %config.service_url, "using calculation service");

        let mut workflow = WorkflowController::new();
        let client = match ServiceClient::new(&config) {
            Ok(client) => Some(client),
            Err(err) => {
                tracing::error!(error = %err, "HTTP client unavailable");
                workflow.report(&err);
                None
            }
        };

        let app = App {
            client,
            session: DesignSession::new(whoami::username(), "", ""),
            current_file: None,
            lock: None,
            lock_holder: None,
            is_modified: false,
            modal: None,
            form: DesignForm::default(),
            workflow,
            interaction: Interaction::new(Viewport::new(config.canvas())),
            reactions: ReactionTable::new(),
            design_check: None,
            check_seq: 0,
            busy: None,
            notice: None,
            status: "Ready".to_string(),
        };
        let startup = app.fetch_reactions();
        (app, startup)
    }

    fn title(&self) -> String {
        let modified = if self.is_modified { " *" } else { "" };
        format!("Pilecap - {}{}", self.session.title(), modified)
    }

    pub fn is_read_only(&self) -> bool {
        self.lock_holder.is_some()
    }

    fn service(&mut self) -> Option<ServiceClient> {
        if self.client.is_none() {
            self.workflow.report(&CapError::Internal {
                message: "HTTP client unavailable".to_string(),
            });
        }
        self.client.clone()
    }

    fn fetch_reactions(&self) -> Task<Message> {
        match self.client.clone() {
            Some(client) => Task::perform(async move { client.fetch_reactions().await }, Message::ReactionsFetched),
            None => Task::none(),
        }
    }

    /// Parsed form values, or the first validation error surfaced.
    fn form_values(&mut self) -> Option<(LayoutRequest, DesignInputs)> {
        match self.form.layout().and_then(|layout| Ok((layout, self.form.inputs()?))) {
            Ok(values) => Some(values),
            Err(err) => {
                self.workflow.report(&err);
                None
            }
        }
    }

    /// Settle a finished request. Stale answers leave the busy label alone.
    fn settle(&mut self, applied: CapResult<Applied>, done: impl FnOnce(&mut Self)) {
        match applied {
            Ok(Applied::Updated) => {
                self.busy = None;
                self.interaction.sync_layout(self.workflow.display_piles());
                done(self);
            }
            Ok(Applied::Stale) => {}
            Err(_) => {
                self.busy = None;
                self.interaction.sync_layout(self.workflow.display_piles());
                self.status = "Request failed".to_string();
            }
        }
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            // ===== Session =====
            Message::NewSession => {
                if self.is_modified {
                    self.modal = Some(ModalType::UnsavedChanges {
                        action: PendingAction::NewSession,
                    });
                    return Task::none();
                }
                self.reset_session();
            }
            Message::OpenSession => {
                if self.is_modified {
                    self.modal = Some(ModalType::UnsavedChanges {
                        action: PendingAction::OpenSession,
                    });
                    return Task::none();
                }
                return pick_session_file();
            }
            Message::SaveSession => match self.current_file.clone() {
                Some(path) if !self.is_read_only() => self.write_session(path),
                _ => return self.pick_save_target(),
            },
            Message::SaveSessionAs => return self.pick_save_target(),
            Message::SessionPicked(Some(path)) => self.open_session(path),
            Message::SaveTargetPicked(Some(path)) => {
                let path = with_session_extension(&path);
                if self.current_file.as_ref() != Some(&path) || self.lock.is_none() {
                    match SessionLock::acquire(&path, whoami::username()) {
                        Ok(lock) => {
                            self.lock = Some(lock);
                            self.lock_holder = None;
                        }
                        Err(err) => {
                            self.workflow.report(&err);
                            return Task::none();
                        }
                    }
                }
                self.write_session(path);
            }
            Message::SessionPicked(None) | Message::SaveTargetPicked(None) => {}
            Message::EngineerChanged(value) => {
                self.session.meta.engineer = value;
                self.is_modified = true;
            }
            Message::JobIdChanged(value) => {
                self.session.meta.job_id = value;
                self.is_modified = true;
            }
            Message::ClientChanged(value) => {
                self.session.meta.client = value;
                self.is_modified = true;
            }
            Message::ModalSave => {
                let pending = self.take_pending();
                match self.current_file.clone() {
                    Some(path) if !self.is_read_only() => {
                        self.write_session(path);
                        if !self.is_modified {
                            return self.run_pending(pending);
                        }
                    }
                    _ => return self.pick_save_target(),
                }
            }
            Message::ModalDontSave => {
                let pending = self.take_pending();
                return self.run_pending(pending);
            }
            Message::ModalCancel => self.modal = None,

            // ===== Design form =====
            Message::FormChanged(field, value) => {
                self.form.set(field, value);
                self.design_check = None;
                self.check_seq += 1;
                self.is_modified = true;
            }

            // ===== Design check =====
            Message::CheckDesign => {
                self.notice = None;
                let Some((layout, inputs)) = self.form_values() else {
                    return Task::none();
                };
                self.workflow.clear_error();
                let Some(client) = self.service() else {
                    return Task::none();
                };
                let request = DesignCheckRequest::build(&layout, &inputs);
                self.check_seq += 1;
                let seq = self.check_seq;
                return Task::perform(
                    async move { client.calculate(&request).await },
                    move |outcome| Message::DesignChecked(seq, outcome),
                );
            }
            Message::DesignChecked(seq, outcome) => {
                // Inputs edited or session replaced since the check was sent
                if seq != self.check_seq {
                    tracing::debug!("dropping design check for superseded inputs");
                    return Task::none();
                }
                match outcome {
                    Ok(check) => self.design_check = Some(check),
                    Err(err) => {
                        self.design_check = None;
                        self.workflow.report(&err);
                    }
                }
            }

            // ===== Workflow =====
            Message::GenerateCoordinates => {
                self.notice = None;
                let Some((layout, inputs)) = self.form_values() else {
                    return Task::none();
                };
                let Ok(job) = self.workflow.begin_layout(layout, inputs) else {
                    return Task::none();
                };
                let Some(client) = self.service() else {
                    return Task::none();
                };
                self.busy = Some("Generating pile coordinates...");
                let spec = job.spec.clone();
                return Task::perform(
                    async move { client.pile_coordinates(&spec, false).await },
                    move |outcome| Message::CoordinatesLoaded(job, outcome),
                );
            }
            Message::CoordinatesLoaded(job, outcome) => {
                let applied = self.workflow.apply_layout(job, outcome);
                self.settle(applied, |app| {
                    app.status = format!("{} piles generated", app.workflow.coordinates().len());
                });
            }
            Message::CalculateForces => {
                self.notice = None;
                let Ok(job) = self.workflow.begin_forces() else {
                    return Task::none();
                };
                let Some(client) = self.service() else {
                    return Task::none();
                };
                self.busy = Some("Calculating pile forces...");
                let spec = job.spec.clone();
                return Task::perform(
                    async move { client.compute_forces(&spec).await },
                    move |outcome| Message::ForcesLoaded(job, outcome),
                );
            }
            Message::ForcesLoaded(job, outcome) => {
                let applied = self.workflow.apply_forces(job, outcome);
                self.settle(applied, |app| app.status = "Pile forces calculated".to_string());
            }
            Message::CalculateAdvanced => {
                self.notice = None;
                let Some((layout, inputs)) = self.form_values() else {
                    return Task::none();
                };
                let Ok(job) = self.workflow.begin_advanced(&layout, &inputs) else {
                    return Task::none();
                };
                let Some(client) = self.service() else {
                    return Task::none();
                };
                self.busy = Some("Running advanced pile cap design...");
                let request = job.request.clone();
                return Task::perform(
                    async move { client.advanced_design(&request).await },
                    move |outcome| Message::AdvancedLoaded(job, outcome),
                );
            }
            Message::AdvancedLoaded(job, outcome) => {
                let applied = self.workflow.apply_advanced(job, outcome);
                self.settle(applied, |app| app.status = "Advanced design complete".to_string());
            }

            // ===== Reaction table =====
            Message::ReactionsFetched(Ok(rows)) => self.reactions.load(rows),
            Message::ReactionsFetched(Err(err)) => {
                tracing::warn!(error = %err, "could not load stored reactions");
            }
            Message::ReactionCellChanged(row, field, value) => self.reactions.set_cell(row, field, &value),
            Message::ReactionPasteRequested(row, field) => {
                self.reactions.focus(row, field);
                return iced::clipboard::read().map(move |text| Message::ReactionClipboard(row, field, text));
            }
            Message::ReactionClipboard(row, field, Some(text)) => {
                self.reactions.focus(row, field);
                if let Err(err) = self.reactions.paste(&text) {
                    self.workflow.report(&err);
                }
            }
            Message::ReactionClipboard(_, _, None) => {}
            Message::AddReactionRow => self.reactions.add_row(),
            Message::ClearReactions => self.reactions.clear(),
            Message::ToggleReactionEditing => self.reactions.toggle_editing(),
            Message::SaveReactions => {
                self.notice = None;
                self.workflow.clear_error();
                let rows = match self.reactions.payload() {
                    Ok(rows) => rows,
                    Err(err) => {
                        self.workflow.report(&err);
                        return Task::none();
                    }
                };
                let Some(client) = self.service() else {
                    return Task::none();
                };
                self.busy = Some("Saving load combinations...");
                return Task::perform(
                    async move { client.save_reactions(&rows).await },
                    Message::ReactionsSaved,
                );
            }
            Message::ReactionsSaved(outcome) => {
                self.busy = None;
                match outcome {
                    Ok(rows) => {
                        self.workflow.confirm_reactions(&rows);
                        self.reactions.confirm_saved(rows);
                        self.notice = Some(SAVED_MESSAGE.to_string());
                    }
                    Err(err) => self.workflow.report(&err),
                }
            }

            // ===== Plan drawing =====
            Message::Pointer(event) => {
                self.interaction.handle(event, self.workflow.display_piles());
            }
        }
        Task::none()
    }

    fn reset_session(&mut self) {
        self.lock = None;
        self.lock_holder = None;
        self.current_file = None;
        self.session = DesignSession::new(whoami::username(), "", "");
        self.form = DesignForm::from_values(&self.session.layout, &self.session.inputs);
        self.workflow.reset();
        self.busy = None;
        self.design_check = None;
        self.check_seq += 1;
        self.interaction.sync_layout(self.workflow.display_piles());
        self.is_modified = false;
        self.notice = None;
        self.status = "New session".to_string();
    }

    fn open_session(&mut self, path: PathBuf) {
        let (session, existing_lock) = match load_session_with_lock_check(&path) {
            Ok(loaded) => loaded,
            Err(err) => {
                self.workflow.report(&err);
                return;
            }
        };

        self.lock = None;
        self.lock_holder = match existing_lock {
            Some(info) => Some(info.holder()),
            None => match SessionLock::acquire(&path, whoami::username()) {
                Ok(lock) => {
                    self.lock = Some(lock);
                    None
                }
                Err(err) => {
                    tracing::warn!(error = %err, "opening session read-only");
                    Some("another process".to_string())
                }
            },
        };

        self.form = DesignForm::from_values(&session.layout, &session.inputs);
        self.session = session;
        self.workflow.reset();
        self.busy = None;
        self.design_check = None;
        self.check_seq += 1;
        self.interaction.sync_layout(self.workflow.display_piles());
        self.status = format!("Opened {}", path.display());
        self.current_file = Some(path);
        self.is_modified = false;
        self.notice = None;
    }

    fn write_session(&mut self, path: PathBuf) {
        let Some((layout, inputs)) = self.form_values() else {
            return;
        };
        self.session.update(&layout, &inputs);
        self.session.touch();
        match save_session(&self.session, &path) {
            Ok(()) => {
                self.status = format!("Saved {}", path.display());
                self.current_file = Some(path);
                self.is_modified = false;
            }
            Err(err) => self.workflow.report(&err),
        }
    }

    fn pick_save_target(&self) -> Task<Message> {
        let file_name = format!("{}.pcap", self.session.title());
        Task::perform(
            async move {
                rfd::AsyncFileDialog::new()
                    .add_filter(SESSION_FILTER.0, SESSION_FILTER.1)
                    .set_file_name(file_name)
                    .save_file()
                    .await
                    .map(|handle| handle.path().to_path_buf())
            },
            Message::SaveTargetPicked,
        )
    }

    fn take_pending(&mut self) -> Option<PendingAction> {
        match self.modal.take() {
            Some(ModalType::UnsavedChanges { action }) => Some(action),
            None => None,
        }
    }

    fn run_pending(&mut self, pending: Option<PendingAction>) -> Task<Message> {
        match pending {
            Some(PendingAction::NewSession) => {
                self.reset_session();
                Task::none()
            }
            Some(PendingAction::OpenSession) => pick_session_file(),
            None => Task::none(),
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let mut messages = column![].spacing(4);
        if let Some(error) = self.workflow.error() {
            messages = messages.push(text(error).size(12).color([0.8, 0.1, 0.1]));
        }
        if let Some(notice) = &self.notice {
            messages = messages.push(text(notice).size(12).color([0.2, 0.6, 0.2]));
        }

        let body = column![
            ui::toolbar::view_header_owned(self.title()),
            ui::toolbar::view_toolbar(self.busy),
            messages,
            row![
                ui::input_panel::view_input_panel(self, 0.42),
                ui::results_panel::view_results_panel(self, 0.42),
            ]
            .spacing(10)
            .height(Length::Fill),
            ui::status_bar::view_status_bar(
                &self.current_file,
                self.is_modified,
                &self.lock_holder,
                self.workflow.stage().label(),
                &self.status,
            ),
        ]
        .spacing(6)
        .padding(Padding::from([8, 12]));

        match &self.modal {
            Some(modal) => stack![body, ui::modal::view_backdrop(), ui::modal::view_modal(modal)].into(),
            None => body.into(),
        }
    }
}

fn pick_session_file() -> Task<Message> {
    Task::perform(
        async {
            rfd::AsyncFileDialog::new()
                .add_filter(SESSION_FILTER.0, SESSION_FILTER.1)
                .pick_file()
                .await
                .map(|handle| handle.path().to_path_buf())
        },
        Message::SessionPicked,
    )
}
