/// Entry draft builder
///
/// Validates what the user typed into the "Add Compose" form and turns it
/// into a catalog entry. This is the single place form input is checked.
use chrono::Utc;

use super::data::{CategoryId, ComposeEntry, EntryId, JUST_NOW};
use super::library::Library;
use crate::error::InvalidEntry;
use crate::files::thumbnail;

/// Raw values from the add form, as typed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub title: String,
    pub description: String,
    /// Category id as selected ("databases", "web-servers", ...)
    pub category: String,
    /// Comma separated tags
    pub tags: String,
    pub author: String,
    pub docker_compose: String,
}

/// Which form field an edit targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Category,
    Tags,
    Author,
    DockerCompose,
}

impl FormFields {
    pub fn set(&mut self, field: FormField, value: String) {
        let slot = match field {
            FormField::Title => &mut self.title,
            FormField::Description => &mut self.description,
            FormField::Category => &mut self.category,
            FormField::Tags => &mut self.tags,
            FormField::Author => &mut self.author,
            FormField::DockerCompose => &mut self.docker_compose,
        };
        *slot = value;
    }
}

/// Split a comma separated tag string, trimming pieces and dropping empty
/// ones. Order and duplicates are preserved.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Hands out entry ids.
///
/// Ids are based on the wall clock in milliseconds, bumped so they are
/// strictly increasing within a process and never collide with an id
/// already in the library.
#[derive(Debug, Default)]
pub struct IdMinter {
    last: i64,
}

impl IdMinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mint(&mut self, library: &Library) -> EntryId {
        let mut candidate = Utc::now().timestamp_millis().max(self.last + 1);
        while library.contains(&EntryId::new(candidate.to_string())) {
            candidate += 1;
        }
        self.last = candidate;
        EntryId::new(candidate.to_string())
    }
}

/// Validate form input and build a new entry.
///
/// `default_author` replaces a blank author. Thumbnail bytes, if any, must
/// sniff as an image. Nothing is inserted here; the caller hands the result
/// to `Library::insert_front`.
pub fn build_entry(
    fields: &FormFields,
    thumbnail_bytes: Option<Vec<u8>>,
    library: &Library,
    minter: &mut IdMinter,
    default_author: &str,
) -> Result<ComposeEntry, InvalidEntry> {
    let title = required(&fields.title, "title")?;
    let description = required(&fields.description, "description")?;
    let category: CategoryId = required(&fields.category, "category")?.parse()?;
    required(&fields.docker_compose, "docker compose")?;

    let thumbnail = thumbnail_bytes.map(thumbnail::ingest).transpose()?;

    let author = match fields.author.trim() {
        "" => default_author.to_string(),
        author => author.to_string(),
    };

    let entry = ComposeEntry {
        id: minter.mint(library),
        title: title.to_string(),
        description: description.to_string(),
        category,
        tags: parse_tags(&fields.tags),
        author,
        created_at: JUST_NOW.to_string(),
        thumbnail,
        // The document is kept verbatim; only the emptiness check trims
        docker_compose: fields.docker_compose.clone(),
    };

    tracing::debug!(id = %entry.id, category = entry.category.as_str(), "built entry from form");
    Ok(entry)
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, InvalidEntry> {
    match value.trim() {
        "" => Err(InvalidEntry::MissingField(field)),
        trimmed => Ok(trimmed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::{fixtures, Thumbnail, ANONYMOUS_AUTHOR};
    use pretty_assertions::assert_eq;

    fn valid_fields() -> FormFields {
        FormFields {
            title: "Traefik Edge Router".to_string(),
            description: "Traefik with automatic HTTPS".to_string(),
            category: "web-servers".to_string(),
            tags: "traefik, proxy".to_string(),
            author: String::new(),
            docker_compose: "services:\n  traefik:\n    image: traefik:v3\n".to_string(),
        }
    }

    fn build(fields: &FormFields, thumbnail: Option<Vec<u8>>) -> Result<ComposeEntry, InvalidEntry> {
        build_entry(fields, thumbnail, &Library::new(), &mut IdMinter::new(), ANONYMOUS_AUTHOR)
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags(" a, b ,, c"), vec!["a", "b", "c"]);
        assert_eq!(parse_tags("x, x"), vec!["x", "x"]);
        assert!(parse_tags(" , ,").is_empty());
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn test_build_valid_entry() {
        let entry = build(&valid_fields(), None).unwrap();

        assert_eq!(entry.title, "Traefik Edge Router");
        assert_eq!(entry.category, CategoryId::WebServers);
        assert_eq!(entry.tags, vec!["traefik", "proxy"]);
        assert_eq!(entry.author, "Anonymous");
        assert_eq!(entry.created_at, "Just now");
        assert_eq!(entry.thumbnail, None);
        assert_eq!(entry.docker_compose, valid_fields().docker_compose);
    }

    #[test]
    fn test_author_is_trimmed_and_kept() {
        let mut fields = valid_fields();
        fields.author = "  Dana  ".to_string();
        assert_eq!(build(&fields, None).unwrap().author, "Dana");
    }

    #[test]
    fn test_configured_default_author() {
        let entry = build_entry(
            &valid_fields(),
            None,
            &Library::new(),
            &mut IdMinter::new(),
            "Platform Team",
        )
        .unwrap();
        assert_eq!(entry.author, "Platform Team");
    }

    #[test]
    fn test_required_fields() {
        let cases = [
            (FormField::Title, "title"),
            (FormField::Description, "description"),
            (FormField::Category, "category"),
            (FormField::DockerCompose, "docker compose"),
        ];

        for (field, name) in cases {
            let mut fields = valid_fields();
            fields.set(field, "   ".to_string());
            assert_eq!(build(&fields, None), Err(InvalidEntry::MissingField(name)));
        }
    }

    #[test]
    fn test_unknown_category() {
        let mut fields = valid_fields();
        fields.category = "all".to_string();
        assert_eq!(
            build(&fields, None),
            Err(InvalidEntry::UnknownCategory("all".to_string()))
        );
    }

    #[test]
    fn test_non_image_thumbnail_is_rejected() {
        let result = build(&valid_fields(), Some(b"not an image".to_vec()));
        assert!(matches!(result, Err(InvalidEntry::Thumbnail(_))));
    }

    #[test]
    fn test_image_thumbnail_is_attached() {
        // GIF header followed by a minimal body is enough for format sniffing
        let gif = b"GIF89a\x01\x00\x01\x00\x00\x00\x00;".to_vec();
        let entry = build(&valid_fields(), Some(gif.clone())).unwrap();

        assert_eq!(
            entry.thumbnail,
            Some(Thumbnail::Data {
                media_type: "image/gif".to_string(),
                bytes: gif,
            })
        );
    }

    #[test]
    fn test_rejection_has_no_side_effect() {
        let mut library = Library::with_samples();
        let mut minter = IdMinter::new();
        let mut fields = valid_fields();
        fields.title.clear();

        assert!(build_entry(&fields, None, &library, &mut minter, ANONYMOUS_AUTHOR).is_err());
        assert_eq!(library.len(), 12);

        let entry = build_entry(&valid_fields(), None, &library, &mut minter, ANONYMOUS_AUTHOR).unwrap();
        library.insert_front(entry).unwrap();
        assert_eq!(library.len(), 13);
    }

    #[test]
    fn test_minted_ids_are_unique_and_skip_existing() {
        let now = Utc::now().timestamp_millis();
        let library = Library::from_entries(
            (0..5).map(|i| fixtures::entry(&(now + i).to_string(), "Taken", CategoryId::Storage)),
        );
        let mut minter = IdMinter::new();

        let mut minted: Vec<EntryId> = (0..20).map(|_| minter.mint(&library)).collect();
        assert!(minted.iter().all(|id| !library.contains(id)));

        minted.sort();
        minted.dedup();
        assert_eq!(minted.len(), 20);
    }
}
