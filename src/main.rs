use iced::event::{self, Event};
use iced::keyboard::{self, key};
use iced::widget::{
    button, column, container, horizontal_space, pick_list, row, scrollable, text, text_editor,
    text_input, Column,
};
use iced::{Alignment, Element, Font, Length, Pixels, Subscription, Task, Theme};
use iced_aw::Wrap;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod files;
mod highlight;
mod state;
mod ui;

use config::AppConfig;
use error::ExportError;
use files::export::{self, ExportArtifact};
use files::thumbnail;
use state::controller::{CatalogState, Command};
use state::data::{CategoryId, Thumbnail};
use state::draft::FormField;
use state::session::{EntryEdit, FocusTarget, SessionMode, TraversalDirection};
use ui::focus::{self as focus_ids, UiFocus};
use ui::views::{self, cmd};

/// Main application state
struct ComposeLibrary {
    /// Catalog, filter, session and add form
    state: CatalogState,
    config: AppConfig,
    /// Focus and scroll bookkeeping driven by the session
    focus: UiFocus,
    /// Editor buffer for the session draft's compose text
    draft_editor: text_editor::Content,
    /// Editor buffer for the add form's compose text
    add_editor: text_editor::Content,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// A catalog command, applied as-is
    Command(Command),
    /// A command produced by typing into a text input
    Typed(FocusTarget, Command),
    DraftEditor(text_editor::Action),
    AddEditor(text_editor::Action),
    /// User clicked "Upload image"
    PickThumbnail,
    /// Background image read finished (None when the dialog was dismissed)
    ThumbnailPicked(Option<Result<Vec<u8>, String>>),
    /// User clicked "Copy HTML"
    CopyMarkup,
    /// User clicked "Download"
    Export,
    /// Background export finished
    Exported(Result<PathBuf, String>),
    /// Tab / Shift+Tab
    Traverse(TraversalDirection),
}

impl ComposeLibrary {
    fn new(config: AppConfig) -> (Self, Task<Message>) {
        let state = CatalogState::from_config(&config);
        let count = state.library().len();
        tracing::info!(entries = count, "compose library ready");

        (
            ComposeLibrary {
                state,
                config,
                focus: UiFocus::new(),
                draft_editor: text_editor::Content::new(),
                add_editor: text_editor::Content::new(),
                status: format!("Ready. {} compose files in library.", count),
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Command(command) => self.dispatch(command),
            Message::Typed(target, command) => {
                self.focus.note_input(target);
                self.dispatch(command)
            }
            Message::DraftEditor(action) => {
                let is_edit = action.is_edit();
                self.draft_editor.perform(action);
                if is_edit {
                    let text = self.draft_editor.text();
                    self.dispatch(Command::EditDraft(EntryEdit::DockerCompose(text)))
                } else {
                    Task::none()
                }
            }
            Message::AddEditor(action) => {
                let is_edit = action.is_edit();
                self.add_editor.perform(action);
                if is_edit {
                    let text = self.add_editor.text();
                    self.dispatch(Command::EditForm(FormField::DockerCompose, text))
                } else {
                    Task::none()
                }
            }
            Message::PickThumbnail => Task::perform(pick_thumbnail(), Message::ThumbnailPicked),
            Message::ThumbnailPicked(None) => Task::none(),
            Message::ThumbnailPicked(Some(Ok(bytes))) => {
                self.dispatch(Command::AttachThumbnail(bytes))
            }
            Message::ThumbnailPicked(Some(Err(reason))) => {
                self.dispatch(Command::ThumbnailFailed(reason))
            }
            Message::CopyMarkup => {
                let Some(target) = self.state.session().target() else {
                    return Task::none();
                };
                let markup = highlight::to_markup(&highlight::highlight(&target.docker_compose));
                self.status = format!("Copied {} as highlighted HTML", target.title);
                iced::clipboard::write(markup)
            }
            Message::Export => {
                let Some(artifact) = self.state.session_export() else {
                    return Task::none();
                };
                match self.config.export_dir.clone() {
                    Some(dir) => Task::perform(export_to_dir(artifact, dir), Message::Exported),
                    None => Task::perform(export_with_dialog(artifact), Message::Exported),
                }
            }
            Message::Exported(Ok(path)) => {
                self.status = format!("Saved {}", path.display());
                Task::none()
            }
            Message::Exported(Err(reason)) => {
                self.status = reason;
                Task::none()
            }
            Message::Traverse(direction) => {
                if self.state.session().is_open() {
                    self.dispatch(Command::TraverseFocus(direction))
                } else {
                    match direction {
                        TraversalDirection::Forward => iced::widget::focus_next(),
                        TraversalDirection::Backward => iced::widget::focus_previous(),
                    }
                }
            }
        }
    }

    /// Apply one command to the catalog and turn its focus requests into tasks
    fn dispatch(&mut self, command: Command) -> Task<Message> {
        let reloads_draft = matches!(
            command,
            Command::OpenSession { .. } | Command::StartEdit | Command::CancelEdit
        );
        let submits = matches!(command, Command::SubmitAddForm);

        if let Err(err) = self.state.apply(command, &mut self.focus) {
            tracing::warn!(error = %err, "command refused");
            self.status = err.to_string();
        } else if submits {
            self.add_editor = text_editor::Content::new();
            self.status = format!(
                "Added. {} compose files in library.",
                self.state.library().len()
            );
        }

        if reloads_draft {
            if let Some(draft) = self.state.session().draft() {
                self.draft_editor = text_editor::Content::with_text(&draft.docker_compose);
            }
        }

        self.focus.take_tasks(self.state.session().mode())
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let criteria = self.state.criteria();

        let header = row![
            text("Docker Compose Library").size(24),
            horizontal_space(),
            text_input("Search compose files...", &criteria.search_text)
                .id(text_input::Id::new(focus_ids::SEARCH_INPUT))
                .on_input(|value| {
                    Message::Typed(
                        FocusTarget::new(focus_ids::SEARCH_INPUT),
                        Command::Search(value),
                    )
                })
                .width(360),
            button(text("+ Add Compose"))
                .on_press(cmd(Command::OpenAddForm))
                .style(button::primary),
        ]
        .spacing(16)
        .padding(16)
        .align_y(Alignment::Center);

        let page = column![
            header,
            row![
                views::sidebar(self.state.categories(), criteria.category),
                self.results(),
            ]
            .height(Length::Fill),
            container(text(&self.status).size(13)).padding([4, 16]),
        ];

        // While a session holds the page, nothing behind it scrolls or clicks
        if !self.focus.page_scroll() {
            if let Some(session) = self.session_view() {
                return views::modal(page.into(), session, cmd(Command::CloseSession));
            }
        }
        if self.state.add_form().open {
            return views::modal(page.into(), self.add_form_view(), cmd(Command::CloseAddForm));
        }
        page.into()
    }

    fn results(&self) -> Element<Message> {
        let entries = self.state.visible_entries();

        let body: Element<Message> = if entries.is_empty() {
            column![
                text("No compose files found").size(18),
                text("Try adjusting your search terms or browse different categories").size(14),
            ]
            .spacing(8)
            .padding(48)
            .into()
        } else {
            Wrap::with_elements(entries.into_iter().map(views::card).collect())
                .spacing(Pixels(24.0))
                .line_spacing(Pixels(24.0))
                .into()
        };

        column![
            text(self.state.heading()).size(26),
            text(self.state.results_summary().to_string()).size(14),
            scrollable(body).height(Length::Fill),
        ]
        .spacing(8)
        .padding(24)
        .width(Length::Fill)
        .into()
    }

    /// View or edit dialog for the session target
    fn session_view(&self) -> Option<Element<Message>> {
        let session = self.state.session();
        let target = session.target()?;
        let editing = session.mode() == SessionMode::Editing;

        let mut actions = row![].spacing(8);
        if !editing {
            actions = actions.push(
                button(text("Edit"))
                    .on_press(cmd(Command::StartEdit))
                    .style(button::secondary),
            );
        }
        actions = actions
            .push(
                button(text("Copy HTML"))
                    .on_press(Message::CopyMarkup)
                    .style(button::secondary),
            )
            .push(
                button(text("Download"))
                    .on_press(Message::Export)
                    .style(button::secondary),
            )
            .push(
                button(text("✕"))
                    .on_press(cmd(Command::CloseSession))
                    .style(button::text),
            );

        let title = if editing { "Edit Compose" } else { target.title.as_str() };
        let header = row![
            text(title).size(22),
            text(target.category.display_name()).size(12),
            horizontal_space(),
            actions,
        ]
        .spacing(12)
        .align_y(Alignment::Center);

        let (body, footer): (Element<Message>, Element<Message>) = match session.draft() {
            Some(draft) => (
                column![
                    text("Title").size(14),
                    text_input("", &draft.title)
                        .id(text_input::Id::new(focus_ids::DRAFT_TITLE))
                        .on_input(|value| {
                            Message::Typed(
                                FocusTarget::new(focus_ids::DRAFT_TITLE),
                                Command::EditDraft(EntryEdit::Title(value)),
                            )
                        }),
                    text("Description").size(14),
                    text_input("", &draft.description)
                        .id(text_input::Id::new(focus_ids::DRAFT_DESCRIPTION))
                        .on_input(|value| {
                            Message::Typed(
                                FocusTarget::new(focus_ids::DRAFT_DESCRIPTION),
                                Command::EditDraft(EntryEdit::Description(value)),
                            )
                        }),
                    row![
                        text("Docker Compose").size(14),
                        horizontal_space(),
                        text(format!("{} lines", draft.line_count())).size(12),
                    ],
                    text_editor(&self.draft_editor)
                        .on_action(Message::DraftEditor)
                        .font(Font::MONOSPACE)
                        .height(360),
                    views::tag_line(&target.tags),
                ]
                .spacing(8)
                .into(),
                row![
                    horizontal_space(),
                    button(text("Cancel"))
                        .on_press(cmd(Command::CancelEdit))
                        .style(button::secondary),
                    button(text("Save Changes"))
                        .on_press(cmd(Command::SaveSession))
                        .style(button::primary),
                ]
                .spacing(8)
                .into(),
            ),
            None => (
                column![
                    text(&target.description).size(15),
                    text(format!("by {} • {}", target.author, target.created_at)).size(12),
                    views::tag_line(&target.tags),
                    container(scrollable(views::highlighted(&target.docker_compose)).height(380))
                        .padding(12)
                        .width(Length::Fill)
                        .style(container::rounded_box),
                ]
                .spacing(10)
                .into(),
                row![
                    horizontal_space(),
                    button(text("Close"))
                        .on_press(cmd(Command::CloseSession))
                        .style(button::secondary),
                ]
                .into(),
            ),
        };

        Some(
            container(column![header, body, footer].spacing(16))
                .padding(24)
                .width(760)
                .style(container::bordered_box)
                .into(),
        )
    }

    /// "Add Compose" dialog
    fn add_form_view(&self) -> Element<Message> {
        let form = self.state.add_form();
        let fields = &form.fields;

        let thumbnail: Element<Message> = match &form.thumbnail {
            Some(Thumbnail::Data { bytes, .. }) => row![
                iced::widget::Image::new(iced::widget::image::Handle::from_bytes(bytes.clone()))
                    .height(96),
                button(text("Remove"))
                    .on_press(cmd(Command::RemoveThumbnail))
                    .style(button::danger),
            ]
            .spacing(12)
            .align_y(Alignment::Center)
            .into(),
            _ => column![
                button(text("Upload image"))
                    .on_press(Message::PickThumbnail)
                    .style(button::secondary),
                text("PNG, JPG, GIF up to 10MB").size(12),
            ]
            .spacing(4)
            .into(),
        };

        let mut content: Column<Message> = column![
            text("Add New Docker Compose").size(22),
            text("Add a new Docker Compose configuration to the library").size(14),
            labeled("Title *", form_input("e.g., PostgreSQL with pgAdmin", &fields.title, focus_ids::ADD_TITLE, FormField::Title)),
            labeled("Description *", form_input("Describe what this setup provides", &fields.description, focus_ids::ADD_DESCRIPTION, FormField::Description)),
            labeled(
                "Category *",
                pick_list(CategoryId::ALL, fields.category.parse::<CategoryId>().ok(), |category| {
                    cmd(Command::EditForm(FormField::Category, category.as_str().to_string()))
                })
                .placeholder("Select a category")
                .into(),
            ),
            labeled("Tags", form_input("database, postgres, admin", &fields.tags, focus_ids::ADD_TAGS, FormField::Tags)),
            labeled("Author", form_input("Your name", &fields.author, focus_ids::ADD_AUTHOR, FormField::Author)),
            labeled("Thumbnail", thumbnail),
        ]
        .spacing(12);

        if let Some(err) = &form.thumbnail_error {
            content = content.push(views::error_text(err));
        }

        content = content.push(labeled(
            "Docker Compose *",
            text_editor(&self.add_editor)
                .placeholder("version: '3.8'\nservices:\n  ...")
                .on_action(Message::AddEditor)
                .font(Font::MONOSPACE)
                .height(260)
                .into(),
        ));

        if let Some(err) = &form.error {
            content = content.push(views::error_text(err));
        }

        content = content.push(
            row![
                horizontal_space(),
                button(text("Cancel"))
                    .on_press(cmd(Command::CloseAddForm))
                    .style(button::secondary),
                button(text("Add Compose"))
                    .on_press(cmd(Command::SubmitAddForm))
                    .style(button::primary),
            ]
            .spacing(8),
        );

        container(scrollable(content.padding(24)))
            .width(680)
            .max_height(Pixels(760.0))
            .style(container::bordered_box)
            .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        event::listen_with(|event, status, _window| match event {
            Event::Keyboard(keyboard::Event::KeyPressed { key, modifiers, .. }) => {
                key_message(&key, modifiers, status)
            }
            _ => None,
        })
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Map a key press to a message.
///
/// Escape dismisses even when a focused input already consumed it to drop
/// its own focus; Tab only moves focus when no widget handled it.
fn key_message(
    key: &keyboard::Key,
    modifiers: keyboard::Modifiers,
    status: event::Status,
) -> Option<Message> {
    match key.as_ref() {
        keyboard::Key::Named(key::Named::Escape) => Some(cmd(Command::Dismiss)),
        keyboard::Key::Named(key::Named::Tab) if status == event::Status::Ignored => {
            Some(Message::Traverse(if modifiers.shift() {
                TraversalDirection::Backward
            } else {
                TraversalDirection::Forward
            }))
        }
        _ => None,
    }
}

fn labeled<'a>(label: &'a str, widget: Element<'a, Message>) -> Element<'a, Message> {
    column![text(label).size(14), widget].spacing(4).into()
}

fn form_input<'a>(
    placeholder: &'a str,
    value: &'a str,
    id: &'static str,
    field: FormField,
) -> Element<'a, Message> {
    text_input(placeholder, value)
        .id(text_input::Id::new(id))
        .on_input(move |value| Message::Typed(FocusTarget::new(id), Command::EditForm(field, value)))
        .into()
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> iced::Result {
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(err) => (AppConfig::default(), Some(err)),
    };

    init_tracing(&config);
    if let Some(err) = config_error {
        tracing::warn!(error = %err, "using default configuration");
    }

    iced::application(
        "Docker Compose Library",
        ComposeLibrary::update,
        ComposeLibrary::view,
    )
    .subscription(ComposeLibrary::subscription)
    .theme(ComposeLibrary::theme)
    .centered()
    .run_with(move || ComposeLibrary::new(config))
}

/// Ask for an image and read it in the background
async fn pick_thumbnail() -> Option<Result<Vec<u8>, String>> {
    let handle = rfd::AsyncFileDialog::new()
        .set_title("Select Thumbnail Image")
        .add_filter("Images", &thumbnail::IMAGE_EXTENSIONS)
        .pick_file()
        .await?;

    Some(
        thumbnail::load(handle.path().to_path_buf())
            .await
            .map_err(|err| err.to_string()),
    )
}

/// Ask where to save, defaulting to the artifact's file name
async fn export_with_dialog(artifact: ExportArtifact) -> Result<PathBuf, String> {
    let handle = rfd::AsyncFileDialog::new()
        .set_title("Download Compose File")
        .set_file_name(artifact.disk_file_name())
        .add_filter("YAML", &["yaml", "yml"])
        .save_file()
        .await
        .ok_or(ExportError::Cancelled)
        .map_err(|err| err.to_string())?;

    export::write(artifact.content, handle.path().to_path_buf())
        .await
        .map_err(|err| err.to_string())
}

/// Write straight into the configured export directory
async fn export_to_dir(artifact: ExportArtifact, dir: PathBuf) -> Result<PathBuf, String> {
    export::write_to_dir(artifact, &dir)
        .await
        .map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escape() -> keyboard::Key {
        keyboard::Key::Named(key::Named::Escape)
    }

    fn tab() -> keyboard::Key {
        keyboard::Key::Named(key::Named::Tab)
    }

    #[test]
    fn test_escape_dismisses_even_when_an_input_captured_it() {
        for status in [event::Status::Ignored, event::Status::Captured] {
            let message = key_message(&escape(), keyboard::Modifiers::empty(), status);
            assert!(matches!(message, Some(Message::Command(Command::Dismiss))));
        }
    }

    #[test]
    fn test_tab_traverses_only_when_uncaptured() {
        assert!(matches!(
            key_message(&tab(), keyboard::Modifiers::empty(), event::Status::Ignored),
            Some(Message::Traverse(TraversalDirection::Forward))
        ));
        assert!(matches!(
            key_message(&tab(), keyboard::Modifiers::SHIFT, event::Status::Ignored),
            Some(Message::Traverse(TraversalDirection::Backward))
        ));
        assert!(key_message(&tab(), keyboard::Modifiers::empty(), event::Status::Captured).is_none());
    }

    #[test]
    fn test_other_keys_are_ignored() {
        let key = keyboard::Key::Character("a".into());
        assert!(key_message(&key, keyboard::Modifiers::empty(), event::Status::Ignored).is_none());
    }

    #[test]
    fn test_captured_escape_cancels_an_edit_session() {
        let (mut app, _) = ComposeLibrary::new(AppConfig::default());
        let _ = app.update(cmd(Command::OpenSession {
            id: state::data::EntryId::new("3"),
            mode: state::session::OpenMode::Edit,
        }));
        assert_eq!(app.state.session().mode(), SessionMode::Editing);

        let message = key_message(&escape(), keyboard::Modifiers::empty(), event::Status::Captured);
        let _ = app.update(message.expect("escape maps to a message"));

        assert_eq!(app.state.session().mode(), SessionMode::Closed);
        assert!(app.focus.page_scroll());
    }
}
