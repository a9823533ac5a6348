use iced::widget::image::Handle;
use iced::widget::{
    button, center, column, container, horizontal_space, mouse_area, opaque, rich_text, row, span,
    stack, text, Column, Image,
};
use iced::{Alignment, Color, Element, Font, Length, Theme};

use crate::highlight::{self, TokenKind};
use crate::state::categories::Category;
use crate::state::controller::Command;
use crate::state::data::{CategoryFilter, ComposeEntry, Thumbnail};
use crate::state::session::OpenMode;
use crate::Message;

const CARD_WIDTH: f32 = 300.0;
const PREVIEW_HEIGHT: f32 = 140.0;

pub fn cmd(command: Command) -> Message {
    Message::Command(command)
}

/// Sidebar listing every category with its live count
pub fn sidebar<'a>(categories: Vec<Category>, selected: CategoryFilter) -> Element<'a, Message> {
    let mut list = Column::new()
        .spacing(4)
        .padding(16)
        .width(220)
        .push(text("Categories").size(18));

    for category in categories {
        let style: fn(&Theme, button::Status) -> button::Style = if category.id == selected {
            button::primary
        } else {
            button::text
        };

        let label = row![
            text(category.display_name),
            horizontal_space(),
            text(category.count.to_string()).size(13),
        ]
        .align_y(Alignment::Center);

        list = list.push(
            button(label)
                .width(Length::Fill)
                .style(style)
                .on_press(cmd(Command::SelectCategory(category.id.as_str().to_string()))),
        );
    }

    list.into()
}

/// One catalog card with its preview and the view/edit actions
pub fn card(entry: &ComposeEntry) -> Element<'_, Message> {
    let actions = row![
        button(text("View").size(14))
            .on_press(cmd(Command::OpenSession {
                id: entry.id.clone(),
                mode: OpenMode::View,
            }))
            .style(button::secondary),
        button(text("Edit").size(14))
            .on_press(cmd(Command::OpenSession {
                id: entry.id.clone(),
                mode: OpenMode::Edit,
            }))
            .style(button::text),
    ]
    .spacing(8);

    let content = column![
        preview(entry),
        row![
            text(&entry.title).size(18),
            horizontal_space(),
            text(entry.category.display_name()).size(12),
        ]
        .align_y(Alignment::Center),
        text(&entry.description).size(14),
        tag_line(&entry.tags),
        text(format!("by {} • {}", entry.author, entry.created_at)).size(12),
        actions,
    ]
    .spacing(8);

    container(content)
        .padding(16)
        .width(CARD_WIDTH)
        .style(container::bordered_box)
        .into()
}

/// Thumbnails are drawn from their bytes or local path; entries without
/// one get a placeholder badge
fn preview(entry: &ComposeEntry) -> Element<'_, Message> {
    let handle = match &entry.thumbnail {
        Some(Thumbnail::Data { bytes, .. }) => Handle::from_bytes(bytes.clone()),
        Some(Thumbnail::Url(path)) => Handle::from_path(path),
        None => return placeholder(entry),
    };

    Image::new(handle)
        .width(Length::Fill)
        .height(PREVIEW_HEIGHT)
        .into()
}

fn placeholder(entry: &ComposeEntry) -> Element<'_, Message> {
    center(
        column![
            text("DC").font(Font::MONOSPACE).size(24),
            text(entry.category.as_str()).size(12),
        ]
        .align_x(Alignment::Center),
    )
    .width(Length::Fill)
    .height(PREVIEW_HEIGHT)
    .style(container::rounded_box)
    .into()
}

pub fn tag_line(tags: &[String]) -> Element<'_, Message> {
    let line = tags
        .iter()
        .map(|tag| format!("#{}", tag))
        .collect::<Vec<_>>()
        .join("  ");
    text(line).size(12).into()
}

/// Compose file rendered with YAML colouring
pub fn highlighted<'a>(yaml: &str) -> Element<'a, Message> {
    let spans: Vec<text::Span<'a, Message>> = highlight::highlight(yaml)
        .into_iter()
        .map(|token| {
            let piece = span(token.text);
            match token_color(token.kind) {
                Some(color) => piece.color(color),
                None => piece,
            }
        })
        .collect();

    rich_text(spans).font(Font::MONOSPACE).size(13).into()
}

fn token_color(kind: TokenKind) -> Option<Color> {
    match kind {
        TokenKind::Key => Some(Color::from_rgb8(0x60, 0xa5, 0xfa)),
        TokenKind::String => Some(Color::from_rgb8(0x4a, 0xde, 0x80)),
        TokenKind::Literal => Some(Color::from_rgb8(0xc0, 0x84, 0xfc)),
        TokenKind::Comment => Some(Color::from_rgb8(0x6b, 0x72, 0x80)),
        TokenKind::Plain => None,
    }
}

pub fn error_text<'a>(message: &'a str) -> Element<'a, Message> {
    text(message)
        .size(13)
        .color(Color::from_rgb8(0xf8, 0x71, 0x71))
        .into()
}

/// Draw `content` over a dimmed, input-swallowing copy of `base`.
/// Clicking the backdrop sends `on_blur`.
pub fn modal<'a>(
    base: Element<'a, Message>,
    content: Element<'a, Message>,
    on_blur: Message,
) -> Element<'a, Message> {
    stack![
        base,
        opaque(
            mouse_area(center(opaque(content)).style(|_theme| container::Style {
                background: Some(
                    Color {
                        a: 0.7,
                        ..Color::BLACK
                    }
                    .into(),
                ),
                ..container::Style::default()
            }))
            .on_press(on_blur)
        )
    ]
    .into()
}
