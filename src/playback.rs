//! Playback bookkeeping for the media player.
//!
//! Every `begin`/`stop` bumps the generation. Async completions (load done,
//! load failed, media ended) carry the generation they were started under
//! and are dropped when it is stale.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Playing,
    Paused,
}

#[derive(Debug, Default)]
pub struct PlaybackTracker {
    generation: u64,
    asset: Option<String>,
    status: Status,
}

impl PlaybackTracker {
    pub fn status(&self) -> Status {
        self.status
    }

    pub fn asset(&self) -> Option<&str> {
        self.asset.as_deref()
    }

    pub fn is_playing(&self) -> bool {
        self.status == Status::Playing
    }

    /// Track a new asset; returns the generation its load must present.
    pub fn begin(&mut self, asset: &str) -> u64 {
        self.generation += 1;
        self.asset = Some(asset.to_string());
        self.status = Status::Loading;
        self.generation
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation == generation && self.asset.is_some()
    }

    /// Load finished. `false` means it was superseded and must be discarded.
    pub fn started(&mut self, generation: u64) -> bool {
        if !self.is_current(generation) || self.status != Status::Loading {
            return false;
        }
        self.status = Status::Playing;
        true
    }

    pub fn failed(&mut self, generation: u64) -> bool {
        self.finish(generation)
    }

    /// Media reached its natural end.
    pub fn ended(&mut self, generation: u64) -> bool {
        self.finish(generation)
    }

    pub fn pause(&mut self) -> bool {
        if self.status != Status::Playing {
            return false;
        }
        self.status = Status::Paused;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.status != Status::Paused {
            return false;
        }
        self.status = Status::Playing;
        true
    }

    /// Forget the tracked asset; pending completions become stale.
    pub fn stop(&mut self) -> Option<String> {
        self.generation += 1;
        self.status = Status::Idle;
        self.asset.take()
    }

    fn finish(&mut self, generation: u64) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.status = Status::Idle;
        self.asset = None;
        true
    }
}
