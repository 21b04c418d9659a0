use crate::WebStage;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn is_close_key(key: &str) -> bool {
    key == "Escape"
}

pub fn handle_global_keydown(ev: &web::KeyboardEvent, stage: &Rc<RefCell<WebStage>>) {
    let key = ev.key();
    if is_close_key(&key) {
        stage.borrow_mut().close();
        ev.prevent_default();
    }
}

pub fn wire_global_keydown(stage: Rc<RefCell<WebStage>>) {
    if let Some(window) = web::window() {
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
                handle_global_keydown(&ev, &stage);
            }) as Box<dyn FnMut(_)>);
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
