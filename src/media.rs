//! WebAudio/`<video>` implementation of the stage's media player.
//!
//! Audio assets are fetched, decoded and played through a gain node. Video
//! assets play in the detail panel's `<video>` element. Async loads and
//! `ended` notifications are matched against the tracker's generation.

use crate::constants::MEDIA_GAIN;
use crate::playback::PlaybackTracker;
use stage_core::{MediaError, MediaKind, MediaPlayer};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

struct Shared {
    tracker: PlaybackTracker,
    source: Option<web::AudioBufferSourceNode>,
}

pub struct WebMediaPlayer {
    audio_ctx: web::AudioContext,
    output: Option<web::GainNode>,
    video: Option<web::HtmlVideoElement>,
    shared: Rc<RefCell<Shared>>,
}

fn create_gain(audio_ctx: &web::AudioContext, value: f32) -> Option<web::GainNode> {
    match web::GainNode::new(audio_ctx) {
        Ok(g) => {
            g.gain().set_value(value);
            _ = g.connect_with_audio_node(&audio_ctx.destination());
            Some(g)
        }
        Err(e) => {
            log::error!("[media] GainNode error: {:?}", e);
            None
        }
    }
}

impl WebMediaPlayer {
    pub fn new(audio_ctx: web::AudioContext, video: Option<web::HtmlVideoElement>) -> Self {
        let output = create_gain(&audio_ctx, MEDIA_GAIN);
        Self {
            audio_ctx,
            output,
            video,
            shared: Rc::new(RefCell::new(Shared {
                tracker: PlaybackTracker::default(),
                source: None,
            })),
        }
    }

    fn play_audio(&mut self, asset: &str, generation: u64) -> Result<(), MediaError> {
        let output = self
            .output
            .clone()
            .ok_or_else(|| MediaError::Unsupported(asset.to_string()))?;
        let ctx = self.audio_ctx.clone();
        let shared = self.shared.clone();
        let asset = asset.to_string();
        spawn_local(async move {
            let result = load_and_start(&ctx, &output, &asset).await;
            let mut s = shared.borrow_mut();
            match result {
                Ok(source) if s.tracker.started(generation) => {
                    log::info!("[media] playing {}", asset);
                    let on_ended = ended_callback(&shared, generation);
                    source.set_onended(Some(on_ended.unchecked_ref()));
                    s.source = Some(source);
                }
                Ok(source) => {
                    // superseded while loading
                    _ = source.stop();
                    _ = source.disconnect();
                }
                Err(e) => {
                    log::warn!("[media] {}", e);
                    s.tracker.failed(generation);
                }
            }
        });
        Ok(())
    }

    fn play_video(&mut self, asset: &str, generation: u64) -> Result<(), MediaError> {
        let video = self
            .video
            .clone()
            .ok_or_else(|| MediaError::Unsupported(asset.to_string()))?;
        video.set_src(asset);
        let on_ended = ended_callback(&self.shared, generation);
        video.set_onended(Some(on_ended.unchecked_ref()));
        let promise = video.play().map_err(|e| MediaError::Load {
            asset: asset.to_string(),
            reason: format!("{:?}", e),
        })?;
        let shared = self.shared.clone();
        let asset = asset.to_string();
        spawn_local(async move {
            let result = JsFuture::from(promise).await;
            let mut s = shared.borrow_mut();
            match result {
                Ok(_) => {
                    if s.tracker.started(generation) {
                        log::info!("[media] playing {}", asset);
                    }
                }
                Err(e) => {
                    log::warn!("[media] video {} failed: {:?}", asset, e);
                    s.tracker.failed(generation);
                }
            }
        });
        Ok(())
    }
}

/// One-shot `ended` handler; ignored once the generation has moved on.
fn ended_callback(shared: &Rc<RefCell<Shared>>, generation: u64) -> JsValue {
    let shared = shared.clone();
    Closure::once_into_js(move || {
        let mut s = shared.borrow_mut();
        if s.tracker.ended(generation) {
            if let Some(source) = s.source.take() {
                _ = source.disconnect();
            }
            log::info!("[media] finished");
        }
    })
}

async fn load_and_start(
    ctx: &web::AudioContext,
    output: &web::GainNode,
    asset: &str,
) -> Result<web::AudioBufferSourceNode, MediaError> {
    let fail = |reason: JsValue| MediaError::Load {
        asset: asset.to_string(),
        reason: format!("{:?}", reason),
    };
    let window = web::window().ok_or_else(|| fail(JsValue::from_str("no window")))?;
    let resp: web::Response = JsFuture::from(window.fetch_with_str(asset))
        .await
        .map_err(fail)?
        .dyn_into()
        .map_err(fail)?;
    if !resp.ok() {
        return Err(MediaError::Load {
            asset: asset.to_string(),
            reason: format!("HTTP {}", resp.status()),
        });
    }
    let bytes: js_sys::ArrayBuffer = JsFuture::from(resp.array_buffer().map_err(fail)?)
        .await
        .map_err(fail)?
        .dyn_into()
        .map_err(fail)?;
    let buffer: web::AudioBuffer = JsFuture::from(ctx.decode_audio_data(&bytes).map_err(fail)?)
        .await
        .map_err(fail)?
        .dyn_into()
        .map_err(fail)?;
    let source = web::AudioBufferSourceNode::new(ctx).map_err(fail)?;
    source.set_buffer(Some(&buffer));
    source.connect_with_audio_node(output).map_err(fail)?;
    source.start().map_err(fail)?;
    Ok(source)
}

impl MediaPlayer for WebMediaPlayer {
    fn play(&mut self, asset: &str) -> Result<(), MediaError> {
        // a previous pause may have suspended the shared context
        _ = self.audio_ctx.resume();
        if self.shared.borrow().tracker.asset() == Some(asset) {
            let resumed = self.shared.borrow_mut().tracker.resume();
            if resumed && MediaKind::from_asset(asset) == Some(MediaKind::Video) {
                if let Some(v) = &self.video {
                    _ = v.play();
                }
            }
            return Ok(());
        }
        self.stop();
        let kind =
            MediaKind::from_asset(asset).ok_or_else(|| MediaError::Unsupported(asset.to_string()))?;
        let generation = self.shared.borrow_mut().tracker.begin(asset);
        log::info!("[media] load {} ({:?})", asset, kind);
        let result = match kind {
            MediaKind::Audio => self.play_audio(asset, generation),
            MediaKind::Video => self.play_video(asset, generation),
        };
        if result.is_err() {
            self.shared.borrow_mut().tracker.failed(generation);
        }
        result
    }

    fn pause(&mut self) {
        let mut s = self.shared.borrow_mut();
        let Some(kind) = s.tracker.asset().and_then(MediaKind::from_asset) else {
            return;
        };
        if !s.tracker.pause() {
            return;
        }
        match kind {
            MediaKind::Audio => {
                _ = self.audio_ctx.suspend();
            }
            MediaKind::Video => {
                if let Some(v) = &self.video {
                    _ = v.pause();
                }
            }
        }
    }

    fn stop(&mut self) {
        let mut s = self.shared.borrow_mut();
        let Some(asset) = s.tracker.stop() else {
            return;
        };
        if let Some(source) = s.source.take() {
            _ = source.stop();
            _ = source.disconnect();
        }
        if MediaKind::from_asset(&asset) == Some(MediaKind::Video) {
            if let Some(v) = &self.video {
                v.set_onended(None);
                _ = v.pause();
                _ = v.remove_attribute("src");
                v.load();
            }
        }
        log::info!("[media] stopped {}", asset);
    }

    fn is_playing(&self) -> bool {
        self.shared.borrow().tracker.is_playing()
    }
}
