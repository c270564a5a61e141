//! Building blocks for the picker screen.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, ListItem, Paragraph};

use super::theme::{StatusKind, ThemePalette, swatch};
use crate::model::types::Photo;
use crate::search::PickerView;

pub fn search_bar(query: &str, palette: ThemePalette, loading: bool) -> Paragraph<'static> {
    let title = if loading {
        Span::styled(" Search photos (loading) ", palette.title())
    } else {
        Span::styled(" Search photos ", palette.title())
    };
    let line = if query.is_empty() {
        Line::from(Span::styled(
            "type to search, empty lists the latest photos",
            palette.hint_style(),
        ))
    } else {
        Line::from(vec![
            Span::styled(query.to_string(), palette.text()),
            Span::styled("▏", palette.title()),
        ])
    };
    Paragraph::new(line).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(palette.border_focus_style()),
    )
}

/// One result row: color swatch, caption, author, pixel size.
pub fn photo_item(photo: &Photo, palette: ThemePalette, active: bool) -> ListItem<'static> {
    let chip = photo
        .color
        .as_deref()
        .and_then(swatch)
        .map_or_else(|| Span::raw("  "), |c| Span::styled("■ ", Style::default().fg(c)));
    let marker = if active { "▸ " } else { "  " };
    let caption = photo.caption().unwrap_or("(untitled)").to_string();
    let line = Line::from(vec![
        Span::styled(marker, palette.title()),
        chip,
        Span::styled(caption, palette.text()),
        Span::styled(format!("  by {}", photo.user.name), palette.hint_style()),
        Span::styled(
            format!("  {}×{}", photo.width, photo.height),
            palette.hint_style(),
        ),
    ]);
    let item = ListItem::new(line);
    if active {
        item.style(palette.active_style())
    } else {
        item
    }
}

/// Footer status text for the current view.
pub fn status_text(view: &PickerView<'_>) -> (String, StatusKind) {
    if let Some(err) = view.error {
        return (format!("Error: {err}"), StatusKind::Error);
    }
    if view.loading {
        return ("Loading…".into(), StatusKind::Busy);
    }
    if view.no_results {
        return ("No photos found".into(), StatusKind::Info);
    }
    if view.exhausted {
        return (
            format!("{} photos, end of results", view.photos.len()),
            StatusKind::Done,
        );
    }
    (format!("{} photos", view.photos.len()), StatusKind::Info)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view<'a>(photos: &'a [Photo]) -> PickerView<'a> {
        PickerView {
            query: "",
            photos,
            active: None,
            loading: false,
            no_results: photos.is_empty(),
            exhausted: false,
            error: None,
        }
    }

    #[test]
    fn status_prefers_error_then_loading() {
        let mut v = view(&[]);
        assert_eq!(status_text(&v).1, StatusKind::Info);
        assert_eq!(status_text(&v).0, "No photos found");

        v.loading = true;
        assert_eq!(status_text(&v).1, StatusKind::Busy);

        v.error = Some("boom");
        assert_eq!(status_text(&v).0, "Error: boom");
    }
}
