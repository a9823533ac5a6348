/// Modal session: the view/edit focus on a single catalog entry
///
/// A session is either closed, viewing an entry read-only, or editing a
/// private copy of it. Edits only reach the library through `save`, which
/// replaces the stored entry by id. Entering a session moves focus into it
/// and suspends page scrolling; leaving restores both.
use std::fmt;

use super::data::ComposeEntry;
use super::library::Library;
use crate::error::SessionError;

/// Identifies one focusable element in the host UI
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FocusTarget(pub String);

impl FocusTarget {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for FocusTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The host environment's focus and scrolling, as seen by a session
pub trait FocusHost {
    /// Element that currently has focus, if any
    fn focused(&self) -> Option<FocusTarget>;

    /// Move focus to a specific element
    fn focus(&mut self, target: &FocusTarget);

    /// Move focus into the session's own surface
    fn focus_surface(&mut self);

    /// Suspend (`false`) or resume (`true`) scrolling of the page behind
    fn set_page_scroll(&mut self, enabled: bool);

    /// The session's focusable elements in tab order
    fn session_targets(&self) -> Vec<FocusTarget>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalDirection {
    Forward,
    Backward,
}

/// Containment policy for tab traversal inside a session.
///
/// Given the session's focusable elements in tab order and the current
/// position, computes the next position, wrapping at both ends so focus
/// never leaves the session.
#[derive(Debug, Clone, Copy, Default)]
pub struct FocusTrap;

impl FocusTrap {
    /// Next index in a cycle of `len` elements. `current` outside the cycle
    /// (or `None`) enters at the first element going forward and at the
    /// last going backward. Returns `None` only when there is nothing to
    /// focus.
    pub fn next(len: usize, current: Option<usize>, direction: TraversalDirection) -> Option<usize> {
        if len == 0 {
            return None;
        }

        let next = match (current.filter(|i| *i < len), direction) {
            (None, TraversalDirection::Forward) => 0,
            (None, TraversalDirection::Backward) => len - 1,
            (Some(i), TraversalDirection::Forward) => (i + 1) % len,
            (Some(0), TraversalDirection::Backward) => len - 1,
            (Some(i), TraversalDirection::Backward) => i - 1,
        };
        Some(next)
    }

    /// Same as `next`, working on the targets themselves
    pub fn next_target(
        targets: &[FocusTarget],
        current: Option<&FocusTarget>,
        direction: TraversalDirection,
    ) -> Option<FocusTarget> {
        let position = current.and_then(|c| targets.iter().position(|t| t == c));
        Self::next(targets.len(), position, direction).map(|i| targets[i].clone())
    }
}

/// How the session was asked to open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    View,
    Edit,
}

/// Observable state of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Closed,
    Viewing,
    Editing,
}

impl SessionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionMode::Closed => "closed",
            SessionMode::Viewing => "viewing",
            SessionMode::Editing => "editing",
        }
    }
}

/// A change to one field of the draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryEdit {
    Title(String),
    Description(String),
    DockerCompose(String),
}

impl EntryEdit {
    fn apply(self, draft: &mut ComposeEntry) {
        match self {
            EntryEdit::Title(title) => draft.title = title,
            EntryEdit::Description(description) => draft.description = description,
            EntryEdit::DockerCompose(compose) => draft.docker_compose = compose,
        }
    }
}

/// Where `cancel` goes from editing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CancelTo {
    Viewing,
    Closed,
}

#[derive(Debug, Clone)]
enum Stage {
    Viewing,
    Editing { draft: ComposeEntry, cancel_to: CancelTo },
}

#[derive(Debug, Clone)]
struct Active {
    target: ComposeEntry,
    stage: Stage,
    /// Focus to give back when the session closes
    restore_focus: Option<FocusTarget>,
}

/// The single modal session of the application
#[derive(Debug, Clone, Default)]
pub struct ModalSession {
    active: Option<Active>,
}

impl ModalSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> SessionMode {
        match &self.active {
            None => SessionMode::Closed,
            Some(Active { stage: Stage::Viewing, .. }) => SessionMode::Viewing,
            Some(Active { stage: Stage::Editing { .. }, .. }) => SessionMode::Editing,
        }
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    /// The entry as it was when the session opened
    pub fn target(&self) -> Option<&ComposeEntry> {
        self.active.as_ref().map(|active| &active.target)
    }

    /// The working copy, only while editing
    pub fn draft(&self) -> Option<&ComposeEntry> {
        match &self.active {
            Some(Active { stage: Stage::Editing { draft, .. }, .. }) => Some(draft),
            _ => None,
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut ComposeEntry> {
        match &mut self.active {
            Some(Active { stage: Stage::Editing { draft, .. }, .. }) => Some(draft),
            _ => None,
        }
    }

    /// Open a session on `entry`.
    ///
    /// If a session is already open its target is replaced; the focus to
    /// restore on close stays the one captured by the first open.
    pub fn open(&mut self, entry: ComposeEntry, mode: OpenMode, host: &mut impl FocusHost) {
        let stage = match mode {
            OpenMode::View => Stage::Viewing,
            OpenMode::Edit => Stage::Editing {
                draft: entry.clone(),
                cancel_to: CancelTo::Closed,
            },
        };

        let restore_focus = match self.active.take() {
            Some(previous) => {
                tracing::debug!(
                    from = %previous.target.id,
                    to = %entry.id,
                    "replacing session target"
                );
                previous.restore_focus
            }
            None => {
                host.set_page_scroll(false);
                host.focused()
            }
        };

        tracing::info!(id = %entry.id, ?mode, "opened session");
        self.active = Some(Active {
            target: entry,
            stage,
            restore_focus,
        });
        host.focus_surface();
    }

    /// Switch from viewing to editing a fresh copy of the target and move
    /// focus onto the editor, as opening straight into edit mode does
    pub fn start_edit(&mut self, host: &mut impl FocusHost) -> Result<(), SessionError> {
        if self.mode() != SessionMode::Viewing {
            return Err(self.invalid("start editing"));
        }

        if let Some(active) = &mut self.active {
            active.stage = Stage::Editing {
                draft: active.target.clone(),
                cancel_to: CancelTo::Viewing,
            };
            tracing::debug!(id = %active.target.id, "editing");
        }
        host.focus_surface();
        Ok(())
    }

    /// Change one field of the draft
    pub fn edit(&mut self, edit: EntryEdit) -> Result<(), SessionError> {
        if self.mode() != SessionMode::Editing {
            return Err(self.invalid("edit"));
        }

        if let Some(draft) = self.draft_mut() {
            edit.apply(draft);
        }
        Ok(())
    }

    /// Throw the draft away.
    ///
    /// Goes back to viewing when editing was started from the viewer,
    /// otherwise closes the session. The library is never touched.
    pub fn cancel(&mut self, host: &mut impl FocusHost) -> Result<(), SessionError> {
        let cancel_to = match &self.active {
            Some(Active { stage: Stage::Editing { cancel_to, .. }, .. }) => *cancel_to,
            _ => return Err(self.invalid("cancel")),
        };

        match cancel_to {
            CancelTo::Viewing => {
                if let Some(active) = &mut self.active {
                    active.stage = Stage::Viewing;
                    tracing::debug!(id = %active.target.id, "discarded draft");
                }
            }
            CancelTo::Closed => self.close(host),
        }
        Ok(())
    }

    /// Commit the draft to the library by id and close the session.
    ///
    /// Returns whether the library held an entry with the draft's id.
    pub fn save(&mut self, library: &mut Library, host: &mut impl FocusHost) -> Result<bool, SessionError> {
        let draft = match self.draft() {
            Some(draft) => draft.clone(),
            None => return Err(self.invalid("save")),
        };

        let replaced = library.replace(draft);
        self.close(host);
        Ok(replaced)
    }

    /// Close from any state, restoring focus and page scrolling.
    /// Closing an already closed session does nothing.
    pub fn close(&mut self, host: &mut impl FocusHost) {
        let Some(active) = self.active.take() else {
            return;
        };

        tracing::info!(id = %active.target.id, "closed session");
        host.set_page_scroll(true);
        if let Some(target) = &active.restore_focus {
            host.focus(target);
        }
    }

    /// The keyboard "dismiss" signal: cancels an edit, closes a viewer
    pub fn dismiss(&mut self, host: &mut impl FocusHost) {
        match self.mode() {
            SessionMode::Closed => {}
            SessionMode::Viewing => self.close(host),
            SessionMode::Editing => {
                // Editing always has a draft, so cancel cannot fail here
                let _ = self.cancel(host);
            }
        }
    }

    /// Where tab traversal should go next, kept inside the session
    pub fn traverse_focus(
        &self,
        targets: &[FocusTarget],
        current: Option<&FocusTarget>,
        direction: TraversalDirection,
    ) -> Option<FocusTarget> {
        if !self.is_open() {
            return None;
        }
        FocusTrap::next_target(targets, current, direction)
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            action,
            state: self.mode().as_str(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingHost;
    use super::*;
    use crate::state::data::EntryId;
    use pretty_assertions::assert_eq;

    fn redis(library: &Library) -> ComposeEntry {
        library.get(&EntryId::new("3")).unwrap().clone()
    }

    fn assert_restored(host: &RecordingHost) {
        assert_eq!(host.focused, Some(FocusTarget::new("card-3")));
        assert!(host.page_scroll);
    }

    #[test]
    fn test_focus_trap_wraps() {
        use TraversalDirection::*;
        assert_eq!(FocusTrap::next(3, Some(2), Forward), Some(0));
        assert_eq!(FocusTrap::next(3, Some(0), Backward), Some(2));
        assert_eq!(FocusTrap::next(3, Some(1), Forward), Some(2));
        assert_eq!(FocusTrap::next(3, Some(1), Backward), Some(0));
        assert_eq!(FocusTrap::next(3, None, Forward), Some(0));
        assert_eq!(FocusTrap::next(3, Some(9), Backward), Some(2));
        assert_eq!(FocusTrap::next(1, Some(0), Forward), Some(0));
        assert_eq!(FocusTrap::next(0, None, Forward), None);
    }

    #[test]
    fn test_traverse_focus_only_while_open() {
        let targets = vec![FocusTarget::new("title"), FocusTarget::new("description")];
        let mut host = RecordingHost::focused_on("card-3");
        let mut session = ModalSession::new();

        assert_eq!(
            session.traverse_focus(&targets, None, TraversalDirection::Forward),
            None
        );

        session.open(redis(&Library::with_samples()), OpenMode::Edit, &mut host);
        assert_eq!(
            session.traverse_focus(&targets, Some(&targets[1]), TraversalDirection::Forward),
            Some(FocusTarget::new("title"))
        );
    }

    #[test]
    fn test_open_view_then_close_restores_focus() {
        let library = Library::with_samples();
        let mut host = RecordingHost::focused_on("card-3");
        let mut session = ModalSession::new();

        session.open(redis(&library), OpenMode::View, &mut host);
        assert_eq!(session.mode(), SessionMode::Viewing);
        assert_eq!(host.focused, Some(FocusTarget::new("session")));
        assert!(!host.page_scroll);

        session.close(&mut host);
        assert_eq!(session.mode(), SessionMode::Closed);
        assert_restored(&host);
    }

    #[test]
    fn test_save_commits_in_place_and_closes() {
        let mut library = Library::with_samples();
        let position = library.all().position(|e| e.id.as_str() == "3").unwrap();
        let mut host = RecordingHost::focused_on("card-3");
        let mut session = ModalSession::new();

        session.open(redis(&library), OpenMode::Edit, &mut host);
        session.edit(EntryEdit::Title("Redis Cluster".to_string())).unwrap();

        assert_eq!(session.save(&mut library, &mut host), Ok(true));
        assert_eq!(session.mode(), SessionMode::Closed);
        assert_restored(&host);

        let stored = library.all().nth(position).unwrap();
        assert_eq!(stored.id, EntryId::new("3"));
        assert_eq!(stored.title, "Redis Cluster");
        assert_eq!(library.len(), 12);
    }

    #[test]
    fn test_cancel_after_start_edit_returns_to_viewing() {
        let library = Library::with_samples();
        let before = redis(&library);
        let mut host = RecordingHost::focused_on("card-3");
        let mut session = ModalSession::new();

        session.open(before.clone(), OpenMode::View, &mut host);
        session.start_edit(&mut host).unwrap();
        session.edit(EntryEdit::DockerCompose("services: {}".to_string())).unwrap();
        session.draft_mut().unwrap().tags.push("mutated".to_string());

        session.cancel(&mut host).unwrap();

        assert_eq!(session.mode(), SessionMode::Viewing);
        assert_eq!(session.target(), Some(&before));
        assert_eq!(library.get(&before.id), Some(&before));
        // Still open, so focus and scrolling stay with the session
        assert!(!host.page_scroll);
    }

    #[test]
    fn test_cancel_when_opened_for_edit_closes() {
        let library = Library::with_samples();
        let mut host = RecordingHost::focused_on("card-3");
        let mut session = ModalSession::new();

        session.open(redis(&library), OpenMode::Edit, &mut host);
        session.cancel(&mut host).unwrap();

        assert_eq!(session.mode(), SessionMode::Closed);
        assert_restored(&host);
    }

    #[test]
    fn test_start_edit_clones_fresh_draft() {
        let library = Library::with_samples();
        let mut host = RecordingHost::focused_on("card-3");
        let mut session = ModalSession::new();

        session.open(redis(&library), OpenMode::View, &mut host);
        session.start_edit(&mut host).unwrap();
        session.edit(EntryEdit::Title("Scratch".to_string())).unwrap();
        session.cancel(&mut host).unwrap();
        session.start_edit(&mut host).unwrap();

        assert_eq!(session.draft().unwrap().title, "Redis Cache");
    }

    #[test]
    fn test_start_edit_focuses_surface_like_edit_open() {
        let library = Library::with_samples();
        let mut host = RecordingHost::focused_on("card-3");
        let mut session = ModalSession::new();

        session.open(redis(&library), OpenMode::View, &mut host);
        host.focused = Some(FocusTarget::new("download"));
        session.start_edit(&mut host).unwrap();

        assert_eq!(host.surface_focus_count, 2);
        assert_eq!(host.focused, Some(FocusTarget::new("session")));

        // A refused switch leaves focus alone
        assert!(session.start_edit(&mut host).is_err());
        assert_eq!(host.surface_focus_count, 2);
    }

    #[test]
    fn test_dismiss_follows_mode() {
        let library = Library::with_samples();
        let mut host = RecordingHost::focused_on("card-3");
        let mut session = ModalSession::new();

        session.open(redis(&library), OpenMode::View, &mut host);
        session.start_edit(&mut host).unwrap();
        session.dismiss(&mut host);
        assert_eq!(session.mode(), SessionMode::Viewing);

        session.dismiss(&mut host);
        assert_eq!(session.mode(), SessionMode::Closed);
        assert_restored(&host);

        // Dismissing a closed session is harmless
        session.dismiss(&mut host);
        assert_restored(&host);
    }

    #[test]
    fn test_invalid_transitions_are_rejected() {
        let mut library = Library::with_samples();
        let mut host = RecordingHost::focused_on("card-3");
        let mut session = ModalSession::new();

        assert_eq!(
            session.start_edit(&mut host),
            Err(SessionError::InvalidTransition { action: "start editing", state: "closed" })
        );
        assert!(session.save(&mut library, &mut host).is_err());

        session.open(redis(&library), OpenMode::View, &mut host);
        assert_eq!(
            session.save(&mut library, &mut host),
            Err(SessionError::InvalidTransition { action: "save", state: "viewing" })
        );
        assert!(session.cancel(&mut host).is_err());
        assert!(session.edit(EntryEdit::Title("x".to_string())).is_err());
        assert_eq!(session.mode(), SessionMode::Viewing);

        session.start_edit(&mut host).unwrap();
        assert!(session.start_edit(&mut host).is_err());
    }

    #[test]
    fn test_reopen_replaces_target_and_keeps_original_focus() {
        let library = Library::with_samples();
        let mut host = RecordingHost::focused_on("card-3");
        let mut session = ModalSession::new();

        session.open(redis(&library), OpenMode::View, &mut host);
        let kafka = library.get(&EntryId::new("7")).unwrap().clone();
        session.open(kafka, OpenMode::Edit, &mut host);

        assert_eq!(session.mode(), SessionMode::Editing);
        assert_eq!(session.target().unwrap().title, "Apache Kafka Cluster");
        assert_eq!(host.surface_focus_count, 2);

        session.close(&mut host);
        assert_restored(&host);
    }

    #[test]
    fn test_save_of_vanished_entry_is_silent() {
        let mut library = Library::new();
        let mut host = RecordingHost::focused_on("card-3");
        let mut session = ModalSession::new();

        session.open(redis(&Library::with_samples()), OpenMode::Edit, &mut host);
        assert_eq!(session.save(&mut library, &mut host), Ok(false));
        assert!(library.is_empty());
        assert_eq!(session.mode(), SessionMode::Closed);
    }
}
