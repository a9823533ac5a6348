use iced::widget::text_input;
use iced::Task;

use crate::state::session::{FocusHost, FocusTarget, SessionMode};

/// Search box on the main page
pub const SEARCH_INPUT: &str = "search";
/// Draft inputs inside an editing session, in tab order
pub const DRAFT_TITLE: &str = "session-title";
pub const DRAFT_DESCRIPTION: &str = "session-description";
/// Add form inputs
pub const ADD_TITLE: &str = "add-title";
pub const ADD_DESCRIPTION: &str = "add-description";
pub const ADD_TAGS: &str = "add-tags";
pub const ADD_AUTHOR: &str = "add-author";

/// Stand-in target for the session surface when it has no inputs
const SESSION_SURFACE: &str = "session";

/// Focus bookkeeping for the iced front-end.
///
/// iced only exposes focus as fire-and-forget widget operations, so this
/// remembers the last element we focused (or the user typed into) and
/// queues the operations a command asked for. `take_tasks` turns the
/// queue into a `Task` after every command.
#[derive(Debug)]
pub struct UiFocus {
    focused: Option<FocusTarget>,
    page_scroll: bool,
    targets: Vec<FocusTarget>,
    requests: Vec<FocusTarget>,
    surface_requested: bool,
}

impl UiFocus {
    pub fn new() -> Self {
        Self {
            focused: None,
            page_scroll: true,
            targets: Vec::new(),
            requests: Vec::new(),
            surface_requested: false,
        }
    }

    /// The user typed into `target`, so it must hold focus
    pub fn note_input(&mut self, target: FocusTarget) {
        self.focused = Some(target);
    }

    /// Whether the page behind a session may scroll
    pub fn page_scroll(&self) -> bool {
        self.page_scroll
    }

    /// Refresh the session's focusable elements after a mode change and
    /// turn queued requests into widget operations
    pub fn take_tasks<Message: Send + 'static>(&mut self, mode: SessionMode) -> Task<Message> {
        self.targets = session_targets(mode);

        if std::mem::take(&mut self.surface_requested) {
            if let Some(first) = self.targets.first().cloned() {
                self.focus(&first);
            }
        }

        Task::batch(
            self.requests
                .drain(..)
                .map(|target| text_input::focus(text_input::Id::new(target.0))),
        )
    }
}

impl Default for UiFocus {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusHost for UiFocus {
    fn focused(&self) -> Option<FocusTarget> {
        self.focused.clone()
    }

    fn focus(&mut self, target: &FocusTarget) {
        self.focused = Some(target.clone());
        self.requests.push(target.clone());
    }

    fn focus_surface(&mut self) {
        self.focused = Some(FocusTarget::new(SESSION_SURFACE));
        self.surface_requested = true;
    }

    fn set_page_scroll(&mut self, enabled: bool) {
        self.page_scroll = enabled;
    }

    fn session_targets(&self) -> Vec<FocusTarget> {
        self.targets.clone()
    }
}

/// Focusable inputs a session shows in each mode.
///
/// Buttons are not focusable in iced, so a read-only session has nothing
/// to cycle through and Tab stays put.
pub fn session_targets(mode: SessionMode) -> Vec<FocusTarget> {
    match mode {
        SessionMode::Editing => vec![
            FocusTarget::new(DRAFT_TITLE),
            FocusTarget::new(DRAFT_DESCRIPTION),
        ],
        SessionMode::Viewing | SessionMode::Closed => Vec::new(),
    }
}
