//! Plain-text rendering of the client view models.

use client_core::{
    view::{EMPTY_ADMIN_LIST_MESSAGE, EMPTY_GALLERY_MESSAGE, EMPTY_GALLERY_TITLE},
    AdminRow, GalleryCard, GalleryView, Pager,
};
use shared::protocol::GalleryCategory;

pub fn card_line(card: &GalleryCard) -> String {
    format!(
        "[#{}] {} | {} | {}",
        card.id, card.title, card.category_label, card.date
    )
}

/// `Sebelumnya 1 [2] 3 Selanjutnya`, with disabled ends in parentheses.
pub fn pager_line(pager: &Pager) -> String {
    let mut parts = Vec::with_capacity(pager.pages.len() + 2);
    parts.push(if pager.prev_enabled {
        "Sebelumnya".to_string()
    } else {
        "(Sebelumnya)".to_string()
    });
    for page in &pager.pages {
        if *page == pager.current {
            parts.push(format!("[{page}]"));
        } else {
            parts.push(page.to_string());
        }
    }
    parts.push(if pager.next_enabled {
        "Selanjutnya".to_string()
    } else {
        "(Selanjutnya)".to_string()
    });
    parts.join(" ")
}

pub fn gallery(view: &GalleryView, cards: &[GalleryCard], pager: Option<&Pager>) -> String {
    let mut lines = Vec::new();
    if let Some(error) = view.last_error() {
        lines.push(format!("! {error}"));
    }
    if view.shows_empty_state() {
        lines.push(EMPTY_GALLERY_TITLE.to_string());
        lines.push(EMPTY_GALLERY_MESSAGE.to_string());
        return lines.join("\n");
    }
    lines.extend(cards.iter().map(card_line));
    if let Some(pager) = pager {
        lines.push(String::new());
        lines.push(pager_line(pager));
    }
    lines.join("\n")
}

pub fn detail(card: &GalleryCard) -> String {
    let mut lines = vec![
        card.title.clone(),
        format!("Kategori: {}", card.category_label),
        format!("Tanggal: {}", card.date),
        format!("Gambar: {}", card.image_url.as_deref().unwrap_or("-")),
    ];
    if let Some(description) = &card.description {
        lines.push(String::new());
        lines.push(description.clone());
    }
    lines.join("\n")
}

pub fn admin_rows(rows: &[AdminRow]) -> String {
    if rows.is_empty() {
        return EMPTY_ADMIN_LIST_MESSAGE.to_string();
    }
    rows.iter()
        .map(|row| format!("{} | {}", card_line(&row.card), row.status_label))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn categories(categories: &[GalleryCategory]) -> String {
    if categories.is_empty() {
        return "Belum ada kategori galeri.".to_string();
    }
    categories
        .iter()
        .map(|category| {
            let id = category
                .id
                .map(|id| format!("#{id}"))
                .unwrap_or_else(|| "-".to_string());
            let mut line = format!(
                "{id} {} ({}) urutan {}",
                category.label, category.value, category.sort_order
            );
            if let Some(description) = &category.description {
                line.push_str(&format!(" - {description}"));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
