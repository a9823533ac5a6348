/// Catalog controller
///
/// Every user action arrives as a `Command` and is applied to
/// `CatalogState` one at a time, to completion, before the next one is
/// looked at. The state owns the library; everything else (filter results,
/// category counts, headings) is derived from it on demand.
use super::categories::{self, Category};
use super::data::{ComposeEntry, EntryId, Thumbnail};
use super::draft::{self, FormField, FormFields, IdMinter};
use super::library::Library;
use super::search::{self, FilterCriteria, ResultsSummary};
use super::session::{EntryEdit, FocusHost, ModalSession, OpenMode, TraversalDirection};
use crate::config::AppConfig;
use crate::error::{CommandError, InvalidEntry};
use crate::files::export::{self, ExportArtifact};
use crate::files::thumbnail;

/// A single user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    SelectCategory(String),
    OpenSession { id: EntryId, mode: OpenMode },
    StartEdit,
    EditDraft(EntryEdit),
    CancelEdit,
    SaveSession,
    CloseSession,
    /// Keyboard dismiss (Escape)
    Dismiss,
    TraverseFocus(TraversalDirection),
    OpenAddForm,
    CloseAddForm,
    EditForm(FormField, String),
    AttachThumbnail(Vec<u8>),
    /// The image could not be read at the boundary
    ThumbnailFailed(String),
    RemoveThumbnail,
    SubmitAddForm,
}

/// State of the "Add Compose" dialog
#[derive(Debug, Clone, Default)]
pub struct AddForm {
    pub open: bool,
    pub fields: FormFields,
    /// Accepted upload, kept as the bytes that go to the draft builder
    thumbnail_bytes: Option<Vec<u8>>,
    pub thumbnail: Option<Thumbnail>,
    /// Problem with the uploaded image only
    pub thumbnail_error: Option<String>,
    /// Why the last submit was refused
    pub error: Option<String>,
}

impl AddForm {
    fn reset(&mut self) {
        *self = AddForm::default();
    }
}

/// Everything the catalog screen knows
#[derive(Debug)]
pub struct CatalogState {
    library: Library,
    criteria: FilterCriteria,
    session: ModalSession,
    add_form: AddForm,
    minter: IdMinter,
    default_author: String,
}

impl CatalogState {
    pub fn new(library: Library, config: &AppConfig) -> Self {
        Self {
            library,
            criteria: FilterCriteria::default(),
            session: ModalSession::new(),
            add_form: AddForm::default(),
            minter: IdMinter::new(),
            default_author: config.default_author.clone(),
        }
    }

    /// Build the initial state described by the configuration
    pub fn from_config(config: &AppConfig) -> Self {
        let library = if config.seed_samples {
            Library::with_samples()
        } else {
            Library::new()
        };
        Self::new(library, config)
    }

    /// Apply one command.
    ///
    /// On error the catalog and session are unchanged; add-form errors are
    /// also recorded on the form so the dialog can show them.
    pub fn apply(&mut self, command: Command, host: &mut impl FocusHost) -> Result<(), CommandError> {
        match command {
            Command::Search(text) => {
                self.criteria.search_text = text;
            }
            Command::SelectCategory(id) => {
                self.criteria.category = id
                    .parse()
                    .map_err(|_| CommandError::UnknownCategory(id))?;
            }
            Command::OpenSession { id, mode } => {
                if self.add_form.open {
                    return Err(CommandError::Blocked("close the add form first"));
                }
                let entry = self
                    .library
                    .get(&id)
                    .cloned()
                    .ok_or(CommandError::UnknownEntry(id))?;
                self.session.open(entry, mode, host);
            }
            Command::StartEdit => self.session.start_edit(host)?,
            Command::EditDraft(edit) => self.session.edit(edit)?,
            Command::CancelEdit => self.session.cancel(host)?,
            Command::SaveSession => {
                self.session.save(&mut self.library, host)?;
            }
            Command::CloseSession => self.session.close(host),
            Command::Dismiss => {
                if self.session.is_open() {
                    self.session.dismiss(host);
                } else if self.add_form.open {
                    self.add_form.open = false;
                }
            }
            Command::TraverseFocus(direction) => {
                let targets = host.session_targets();
                let current = host.focused();
                if let Some(next) = self.session.traverse_focus(&targets, current.as_ref(), direction) {
                    host.focus(&next);
                }
            }
            Command::OpenAddForm => {
                if self.session.is_open() {
                    return Err(CommandError::Blocked("close the open compose file first"));
                }
                self.add_form.open = true;
            }
            Command::CloseAddForm => {
                self.add_form.open = false;
            }
            Command::EditForm(field, value) => {
                self.add_form.fields.set(field, value);
            }
            Command::AttachThumbnail(bytes) => match thumbnail::ingest(bytes.clone()) {
                Ok(thumb) => {
                    self.add_form.thumbnail = Some(thumb);
                    self.add_form.thumbnail_bytes = Some(bytes);
                    self.add_form.thumbnail_error = None;
                }
                Err(err) => {
                    self.add_form.thumbnail_error = Some(err.to_string());
                    return Err(err.into());
                }
            },
            Command::ThumbnailFailed(reason) => {
                tracing::warn!(%reason, "thumbnail upload failed");
                self.add_form.thumbnail_error = Some(reason);
            }
            Command::RemoveThumbnail => {
                self.add_form.thumbnail = None;
                self.add_form.thumbnail_bytes = None;
                self.add_form.thumbnail_error = None;
            }
            Command::SubmitAddForm => self.submit_add_form()?,
        }

        Ok(())
    }

    fn submit_add_form(&mut self) -> Result<(), InvalidEntry> {
        let result = draft::build_entry(
            &self.add_form.fields,
            self.add_form.thumbnail_bytes.clone(),
            &self.library,
            &mut self.minter,
            &self.default_author,
        )
        .and_then(|entry| self.library.insert_front(entry));

        match result {
            Ok(()) => {
                self.add_form.reset();
                Ok(())
            }
            Err(err) => {
                tracing::info!(error = %err, "add form refused");
                self.add_form.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    // ========== Derived views ==========

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn session(&self) -> &ModalSession {
        &self.session
    }

    pub fn add_form(&self) -> &AddForm {
        &self.add_form
    }

    /// Entries passing the current filter, in library order
    pub fn visible_entries(&self) -> Vec<&ComposeEntry> {
        search::filter(self.library.all(), &self.criteria)
    }

    /// Sidebar rows with live counts
    pub fn categories(&self) -> Vec<Category> {
        categories::derive_categories(self.library.all())
    }

    pub fn heading(&self) -> &'static str {
        categories::heading(self.criteria.category)
    }

    pub fn results_summary(&self) -> ResultsSummary {
        ResultsSummary {
            count: self.visible_entries().len(),
            query: self.criteria.search_text.clone(),
        }
    }

    /// Download for the entry the session is showing
    pub fn session_export(&self) -> Option<ExportArtifact> {
        self.session.target().map(export::artifact)
    }
}
