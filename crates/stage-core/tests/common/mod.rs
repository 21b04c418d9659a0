// Shared fixtures for the stage integration tests.
#![allow(dead_code)]

use glam::Vec3;
use stage_core::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

pub const FRAME: Duration = Duration::from_micros(16_667);

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    ShowInfo(String, u32, String),
    ClearInfo,
    OpenDetail,
    CloseDetail,
    Cursor(bool),
    Play(String),
    Pause,
    Stop,
}

/// Ordered log shared by the presentation and media doubles.
#[derive(Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<Call>>>);

impl Journal {
    pub fn push(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }
    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
    pub fn position(&self, call: &Call) -> Option<usize> {
        self.0.borrow().iter().position(|c| c == call)
    }
    pub fn count(&self, call: &Call) -> usize {
        self.0.borrow().iter().filter(|c| *c == call).count()
    }
}

pub struct RecordingPresentation {
    pub journal: Journal,
}

impl PresentationSink for RecordingPresentation {
    fn show_info(&mut self, title: &str, ordinal: u32, category: &str) {
        self.journal
            .push(Call::ShowInfo(title.into(), ordinal, category.into()));
    }
    fn clear_info(&mut self) {
        self.journal.push(Call::ClearInfo);
    }
    fn open_detail(&mut self) {
        self.journal.push(Call::OpenDetail);
    }
    fn close_detail(&mut self) {
        self.journal.push(Call::CloseDetail);
    }
    fn set_pointer_cursor(&mut self, active: bool) {
        self.journal.push(Call::Cursor(active));
    }
}

pub struct RecordingPlayer {
    pub journal: Journal,
    pub playing: Option<String>,
    pub fail_loads: bool,
}

impl MediaPlayer for RecordingPlayer {
    fn play(&mut self, asset: &str) -> Result<(), MediaError> {
        self.journal.push(Call::Play(asset.into()));
        if self.fail_loads {
            return Err(MediaError::Load {
                asset: asset.into(),
                reason: "404".into(),
            });
        }
        self.playing = Some(asset.into());
        Ok(())
    }
    fn pause(&mut self) {
        self.journal.push(Call::Pause);
        self.playing = None;
    }
    fn stop(&mut self) {
        self.journal.push(Call::Stop);
        self.playing = None;
    }
    fn is_playing(&self) -> bool {
        self.playing.is_some()
    }
}

pub type TestStage = Stage<RecordingPresentation, RecordingPlayer>;

pub fn meta(n: u32) -> MarkerMeta {
    MarkerMeta {
        title: format!("Track {n}"),
        ordinal: n,
        category: "Jazz/Blues".into(),
        media: format!("/data/track{n}.mp3"),
    }
}

/// Four markers at (±2, 1, ±2), a fifth in the middle, and the floor.
pub fn registry() -> SceneRegistry {
    let mut reg = SceneRegistry::new();
    let spots = [
        ("m1", Vec3::new(2.0, 1.0, -2.0)),
        ("m2", Vec3::new(-2.0, 1.0, -2.0)),
        ("m3", Vec3::new(2.0, 1.0, 2.0)),
        ("m4", Vec3::new(-2.0, 1.0, 2.0)),
        ("m5", Vec3::new(0.0, 1.0, 0.0)),
    ];
    for (n, (id, pos)) in spots.into_iter().enumerate() {
        reg.insert(PickableObject::marker(
            id,
            pos,
            Vec3::new(REST_TILT, 0.0, 0.0),
            meta(n as u32 + 1),
        ))
        .expect("unique ids");
    }
    reg.insert(PickableObject::scenery(
        "floor",
        Vec3::ZERO,
        Bounds::Plane { half_size: 50.0 },
    ))
    .expect("unique ids");
    reg
}

pub fn stage_with(config: StageConfig, fail_loads: bool) -> (TestStage, Journal) {
    let journal = Journal::default();
    let mut stage = Stage::new(
        registry(),
        config,
        RecordingPresentation {
            journal: journal.clone(),
        },
        RecordingPlayer {
            journal: journal.clone(),
            playing: None,
            fail_loads,
        },
    )
    .expect("valid config");
    stage.resize(Viewport::new(800.0, 600.0));
    (stage, journal)
}

pub fn stage() -> (TestStage, Journal) {
    stage_with(StageConfig::default(), false)
}

pub fn index(stage: &TestStage, id: &str) -> MarkerIndex {
    stage.registry().lookup(id).expect("known id")
}

/// Pixel position of an object's center under the current camera.
pub fn screen_of(stage: &TestStage, id: &str) -> (f32, f32) {
    let obj = stage.registry().get(index(stage, id)).expect("registered");
    let clip = stage.rig().camera.view_projection() * obj.transform.position.extend(1.0);
    let ndc = clip.truncate() / clip.w;
    let vp = stage.viewport();
    (
        (ndc.x + 1.0) * 0.5 * vp.width,
        (1.0 - ndc.y) * 0.5 * vp.height,
    )
}

pub fn hover(stage: &mut TestStage, id: &str) -> StageEvents {
    let (x, y) = screen_of(stage, id);
    stage.pointer_move(x, y)
}

pub fn click(stage: &mut TestStage, id: &str) -> StageEvents {
    let (x, y) = screen_of(stage, id);
    stage.click(x, y, false)
}

/// A pixel whose ray only meets the floor.
pub const EMPTY_SPOT: (f32, f32) = (2.0, 2.0);

/// Tick frames until `done` holds or `limit` elapses; returns every outcome.
pub fn run_until(
    stage: &mut TestStage,
    limit: Duration,
    mut done: impl FnMut(&TestStage) -> bool,
) -> Vec<TickOutcome> {
    let mut out = Vec::new();
    let start = stage.sequencer().now();
    while !done(stage) && stage.sequencer().now() - start < limit {
        out.push(stage.tick(FRAME));
    }
    out
}

pub fn approx_vec(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 1e-4
}
