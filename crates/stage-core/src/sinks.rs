//! Collaborator interfaces driven by the choreography.
//!
//! The web frontend implements these against the DOM and WebAudio; tests use
//! recording doubles.

use thiserror::Error;

/// Receives display commands. All calls are fire-and-forget.
pub trait PresentationSink {
    fn show_info(&mut self, title: &str, ordinal: u32, category: &str);
    fn clear_info(&mut self);
    fn open_detail(&mut self);
    fn close_detail(&mut self);
    /// Pointer cursor feedback while a marker is hovered.
    fn set_pointer_cursor(&mut self, _active: bool) {}
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MediaError {
    #[error("failed to load `{asset}`: {reason}")]
    Load { asset: String, reason: String },
    #[error("unsupported media `{0}`")]
    Unsupported(String),
}

/// Plays the asset attached to a marker.
///
/// `play` is idempotent for the asset that is already playing. `stop` with
/// nothing loaded must be a no-op. Loads may complete asynchronously; an
/// asynchronous failure simply leaves `is_playing` false.
pub trait MediaPlayer {
    fn play(&mut self, asset: &str) -> Result<(), MediaError>;
    fn pause(&mut self);
    fn stop(&mut self);
    fn is_playing(&self) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
}

impl MediaKind {
    /// Classify an asset reference by its file extension, ignoring any
    /// query string or fragment. Unknown extensions are treated as audio.
    pub fn from_asset(asset: &str) -> Option<MediaKind> {
        let path = asset.split(['?', '#']).next().unwrap_or(asset).trim();
        if path.is_empty() {
            return None;
        }
        let ext = path
            .rsplit_once('.')
            .map(|(_, e)| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "mp4" | "webm" | "ogv" | "mov" | "m4v" => Some(MediaKind::Video),
            _ => Some(MediaKind::Audio),
        }
    }
}
