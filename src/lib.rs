#![cfg(target_arch = "wasm32")]
use instant::Instant;
use stage_core::{Stage, DRAG_THRESHOLD_PX};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod config;
mod constants;
mod dom;
mod events;
mod frame;
mod input;
mod media;
mod overlay;
mod playback;
mod presentation;
mod render;
mod scene;
mod ui;

use constants::{BACK_BUTTON_ID, CANVAS_ID, CATALOG_TOTAL, DETAIL_VIDEO_ID};
use media::WebMediaPlayer;
use presentation::DomPresentation;

pub(crate) type WebStage = Stage<DomPresentation, WebMediaPlayer>;

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

fn build_stage(
    document: &web::Document,
    canvas: &web::HtmlCanvasElement,
    audio_ctx: &web::AudioContext,
) -> anyhow::Result<WebStage> {
    let registry = scene::build_registry(&scene::CATALOG)?;
    let config = config::from_element(canvas);
    let video = document
        .get_element_by_id(DETAIL_VIDEO_ID)
        .and_then(|el| el.dyn_into::<web::HtmlVideoElement>().ok());
    let presentation = DomPresentation::new(document.clone(), CATALOG_TOTAL);
    let media = WebMediaPlayer::new(audio_ctx.clone(), video);
    let stage = Stage::new(registry, config, presentation, media)?;
    log::info!(
        "[stage] {} objects, {} pickable",
        stage.registry().len(),
        stage.registry().list_pickable().count()
    );
    Ok(stage)
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("stage-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas_el = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", CANVAS_ID))?;
    let canvas: web::HtmlCanvasElement = canvas_el
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    // Maintain canvas internal pixel size to match CSS size * devicePixelRatio
    wire_canvas_resize(&canvas);

    let audio_ctx = web::AudioContext::new().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    overlay::wire_start(&document, &audio_ctx);

    let stage = Rc::new(RefCell::new(build_stage(&document, &canvas, &audio_ctx)?));

    let stage_back = stage.clone();
    dom::add_click_listener(&document, BACK_BUTTON_ID, move || {
        stage_back.borrow_mut().close();
    });
    events::wire_global_keydown(stage.clone());
    events::wire_input_handlers(events::InputWiring {
        canvas: canvas.clone(),
        stage: stage.clone(),
        gesture: Rc::new(RefCell::new(input::DragDetector::new(DRAG_THRESHOLD_PX))),
    });

    let gpu: Option<render::GpuState> = frame::init_gpu(&canvas).await;

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        stage,
        canvas,
        gpu,
        last_instant: Instant::now(),
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}
