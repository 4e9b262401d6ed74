//! Viewer state for a single fetched document and its PDF.
//!
//! Page and zoom follow the same committed-value pattern: button
//! navigation clamps, direct entry is validated on commit and reverts the
//! displayed value to the last valid one when it does not parse or falls
//! out of range.

use std::sync::Arc;

use crate::api::DocumentApi;
use crate::error::ApiError;
use crate::models::Document;

pub const ZOOM_MIN: u32 = 50;
pub const ZOOM_MAX: u32 = 200;
pub const ZOOM_STEP: u32 = 10;
pub const ZOOM_DEFAULT: u32 = 100;

pub struct ViewerController {
    pub document: Document,
    total_pages: u32,
    page: u32,
    zoom: u32,
}

impl ViewerController {
    /// Fetch the document, pull its PDF through the ephemeral download
    /// URL and count its pages. A document without a download URL (or an
    /// unparseable PDF) still gets a viewer with a single page.
    pub async fn load(api: &Arc<dyn DocumentApi>, id: &str) -> Result<Self, ApiError> {
        let document = api.get(id).await?;
        let total_pages = match document.download_url {
            Some(ref url) => {
                let bytes = api.download(url).await?;
                pdf_page_count(&bytes)
            }
            None => 1,
        };
        Ok(Self {
            document,
            total_pages,
            page: 1,
            zoom: ZOOM_DEFAULT,
        })
    }

    #[cfg(test)]
    pub fn for_document(document: Document, total_pages: u32) -> Self {
        Self {
            document,
            total_pages,
            page: 1,
            zoom: ZOOM_DEFAULT,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn zoom(&self) -> u32 {
        self.zoom
    }

    pub fn next_page(&mut self) {
        if self.page < self.total_pages {
            self.page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
        }
    }

    /// Thumbnail click or a forwarded search hit. Out-of-range is a
    /// no-op.
    pub fn set_page(&mut self, page: u32) {
        if (1..=self.total_pages).contains(&page) {
            self.page = page;
        }
    }

    /// Direct page-number entry, committed on blur/Enter.
    pub fn enter_page(&mut self, input: &str) {
        if let Ok(page) = input.trim().parse::<u32>() {
            if (1..=self.total_pages).contains(&page) {
                self.page = page;
            }
        }
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + ZOOM_STEP).min(ZOOM_MAX);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = self.zoom.saturating_sub(ZOOM_STEP).max(ZOOM_MIN);
    }

    /// Direct zoom entry, committed on blur/Enter. Integers in
    /// [50, 200] only; anything else keeps the last valid value.
    pub fn enter_zoom(&mut self, input: &str) {
        if let Ok(zoom) = input.trim().parse::<u32>() {
            if (ZOOM_MIN..=ZOOM_MAX).contains(&zoom) {
                self.zoom = zoom;
            }
        }
    }

    /// The attribute tab's key/value rows, blank fields shown as "-".
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let dash = |value: &str| {
            if value.is_empty() {
                "-".to_string()
            } else {
                value.to_string()
            }
        };
        let created = self
            .document
            .created_at
            .as_deref()
            .map(format_timestamp)
            .unwrap_or_default();
        vec![
            ("文書種類", dash(&self.document.doc_type)),
            ("タイトル", dash(&self.document.title)),
            ("掲示開始日", dash(&self.document.date)),
            ("表示終了日", dash(&self.document.end_date)),
            ("作成日", dash(&created)),
            ("発番部署", dash(&self.document.division)),
            ("発番番号", dash(&self.document.number)),
            ("部署", dash(&self.document.department)),
            (
                "ステータス",
                dash(self.document.status.as_deref().unwrap_or_default()),
            ),
        ]
    }
}

/// Backend timestamps arrive with or without an offset; show them in the
/// list page's short form, or verbatim when they do not parse.
fn format_timestamp(raw: &str) -> String {
    if let Ok(instant) = raw.parse::<chrono::DateTime<chrono::Utc>>() {
        return instant.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(naive) = raw.parse::<chrono::NaiveDateTime>() {
        return naive.format("%Y-%m-%d %H:%M").to_string();
    }
    raw.to_string()
}

/// Count pages by parsing the PDF. Falls back to a single page when the
/// bytes do not parse; the viewer still works, navigation is just
/// disabled.
pub fn pdf_page_count(bytes: &[u8]) -> u32 {
    match lopdf::Document::load_mem(bytes) {
        Ok(document) => {
            let pages = document.get_pages().len() as u32;
            pages.max(1)
        }
        Err(err) => {
            tracing::warn!(%err, "failed to parse PDF, assuming one page");
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewer(total_pages: u32) -> ViewerController {
        ViewerController::for_document(Document::default(), total_pages)
    }

    #[test]
    fn page_navigation_clamps_at_both_ends() {
        let mut v = viewer(3);
        v.prev_page();
        assert_eq!(v.page(), 1);
        v.next_page();
        v.next_page();
        v.next_page();
        assert_eq!(v.page(), 3);
    }

    #[test]
    fn direct_page_entry_reverts_on_invalid_input() {
        let mut v = viewer(5);
        v.enter_page("4");
        assert_eq!(v.page(), 4);
        v.enter_page("9");
        assert_eq!(v.page(), 4);
        v.enter_page("abc");
        assert_eq!(v.page(), 4);
        v.enter_page("0");
        assert_eq!(v.page(), 4);
    }

    #[test]
    fn zoom_buttons_step_by_ten_within_bounds() {
        let mut v = viewer(1);
        assert_eq!(v.zoom(), 100);
        for _ in 0..20 {
            v.zoom_in();
        }
        assert_eq!(v.zoom(), ZOOM_MAX);
        for _ in 0..20 {
            v.zoom_out();
        }
        assert_eq!(v.zoom(), ZOOM_MIN);
    }

    #[test]
    fn zoom_entry_keeps_last_valid_value_on_bad_input() {
        let mut v = viewer(1);
        v.enter_zoom("150");
        assert_eq!(v.zoom(), 150);
        v.enter_zoom("49");
        assert_eq!(v.zoom(), 150);
        v.enter_zoom("201");
        assert_eq!(v.zoom(), 150);
        v.enter_zoom("大きく");
        assert_eq!(v.zoom(), 150);
        v.enter_zoom(" 60 ");
        assert_eq!(v.zoom(), 60);
    }

    #[test]
    fn attributes_render_blank_fields_as_dash() {
        let document = Document {
            doc_type: "技術情報".to_string(),
            title: "ルーター更新".to_string(),
            ..Default::default()
        };
        let v = ViewerController::for_document(document, 1);
        let attrs = v.attributes();
        assert_eq!(attrs[0], ("文書種類", "技術情報".to_string()));
        assert_eq!(attrs[1], ("タイトル", "ルーター更新".to_string()));
        assert_eq!(attrs[5], ("発番部署", "-".to_string()));
        assert_eq!(attrs[8], ("ステータス", "-".to_string()));
    }

    #[test]
    fn creation_timestamp_renders_in_short_form() {
        let document = Document {
            created_at: Some("2025-04-28T09:30:00".to_string()),
            ..Default::default()
        };
        let v = ViewerController::for_document(document, 1);
        assert_eq!(v.attributes()[4], ("作成日", "2025-04-28 09:30".to_string()));
    }

    #[test]
    fn unparseable_pdf_counts_as_one_page() {
        assert_eq!(pdf_page_count(b"not a pdf"), 1);
    }
}
