use crate::constants::{HIDDEN_CLASS, START_BUTTON_ID, START_OVERLAY_ID};
use crate::dom;
use web_sys as web;

#[inline]
pub fn show(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(START_OVERLAY_ID) {
        _ = el.class_list().remove_1(HIDDEN_CLASS);
        // fallback for environments without CSS class
        _ = el.set_attribute("style", "");
    }
}

#[inline]
pub fn hide(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(START_OVERLAY_ID) {
        _ = el.class_list().add_1(HIDDEN_CLASS);
        // fallback
        _ = el.set_attribute("style", "display:none");
    }
}

/// Browsers keep the AudioContext suspended until a user gesture; the start
/// button resumes it and dismisses the overlay.
pub fn wire_start(document: &web::Document, audio_ctx: &web::AudioContext) {
    show(document);
    let audio = audio_ctx.clone();
    let doc = document.clone();
    dom::add_click_listener(document, START_BUTTON_ID, move || {
        _ = audio.resume();
        hide(&doc);
        log::info!("[media] audio resumed");
    });
}
