use crate::constants::{DETAIL_HIDE_CLASS, DETAIL_ID, INFO_ID};
use crate::dom;
use crate::ui::{self, TrackInfo};
use stage_core::PresentationSink;
use web_sys as web;

/// Info block and detail panel backed by DOM elements. Missing elements turn
/// the matching calls into no-ops.
pub struct DomPresentation {
    document: web::Document,
    info: Option<web::Element>,
    detail: Option<web::Element>,
    total: u32,
}

impl DomPresentation {
    pub fn new(document: web::Document, total: u32) -> Self {
        let info = document.get_element_by_id(INFO_ID);
        let detail = document.get_element_by_id(DETAIL_ID);
        if info.is_none() {
            log::warn!("[dom] missing #{}", INFO_ID);
        }
        if detail.is_none() {
            log::warn!("[dom] missing #{}", DETAIL_ID);
        }
        let mut p = Self {
            document,
            info,
            detail,
            total,
        };
        p.clear_info();
        if let Some(d) = &p.detail {
            _ = d.class_list().add_1(DETAIL_HIDE_CLASS);
        }
        p
    }

    fn render_info(&self, track: Option<TrackInfo<'_>>) {
        let Some(el) = &self.info else {
            return;
        };
        el.set_text_content(None);
        for line in ui::info_lines(track, self.total) {
            match self.document.create_element("div") {
                Ok(div) => {
                    div.set_text_content(Some(&line));
                    _ = el.append_child(&div);
                }
                Err(e) => log::warn!("[dom] create div: {:?}", e),
            }
        }
    }
}

impl PresentationSink for DomPresentation {
    fn show_info(&mut self, title: &str, ordinal: u32, category: &str) {
        self.render_info(Some(TrackInfo {
            title,
            ordinal,
            category,
        }));
    }

    fn clear_info(&mut self) {
        self.render_info(None);
    }

    fn open_detail(&mut self) {
        if let Some(el) = &self.detail {
            _ = el.class_list().remove_1(DETAIL_HIDE_CLASS);
        }
    }

    fn close_detail(&mut self) {
        if let Some(el) = &self.detail {
            _ = el.class_list().add_1(DETAIL_HIDE_CLASS);
        }
    }

    fn set_pointer_cursor(&mut self, active: bool) {
        dom::set_body_cursor(&self.document, if active { "pointer" } else { "auto" });
    }
}
