use crate::input::{self, DragDetector};
use crate::WebStage;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

#[derive(Clone)]
pub struct InputWiring {
    pub canvas: web::HtmlCanvasElement,
    pub stage: Rc<RefCell<WebStage>>,
    pub gesture: Rc<RefCell<DragDetector>>,
}

pub fn wire_input_handlers(w: InputWiring) {
    wire_pointermove(&w);
    wire_pointerdown(&w);
    wire_pointerup(&w);
}

fn wire_pointermove(w: &InputWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();

    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let pos = input::pointer_canvas_px(&ev, &w.canvas);
        let mut gesture = w.gesture.borrow_mut();
        if gesture.is_pressed() {
            let delta = gesture.track(pos);
            drop(gesture);
            w.stage.borrow_mut().orbit(delta);
        } else {
            drop(gesture);
            w.stage.borrow_mut().pointer_move(pos.x, pos.y);
        }
    }) as Box<dyn FnMut(_)>);

    _ = canvas_for_listener
        .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointerdown(w: &InputWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();

    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        if ev.button() != 0 {
            return;
        }
        let pos = input::pointer_canvas_px(&ev, &w.canvas);
        w.gesture.borrow_mut().press(pos);
        _ = w.canvas.set_pointer_capture(ev.pointer_id());
        ev.prevent_default();
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener
        .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointerup(w: &InputWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();

    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        if ev.button() != 0 {
            return;
        }
        let pos = input::pointer_canvas_px(&ev, &w.canvas);
        let was_drag = w.gesture.borrow_mut().release(pos);
        _ = w.canvas.release_pointer_capture(ev.pointer_id());
        let mut stage = w.stage.borrow_mut();
        stage.click(pos.x, pos.y, was_drag);
        // an orbit drag moves the scene under a still pointer
        stage.pointer_move(pos.x, pos.y);
        ev.prevent_default();
    }) as Box<dyn FnMut(_)>);

    _ = canvas_for_listener
        .add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
    closure.forget();
}
