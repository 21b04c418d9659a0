//! Pointer interaction state machine.
//!
//! [`Stage`] owns the registry, the camera/light rig, the sequencer and the
//! two collaborators. Every pointer event goes through it; it decides
//! whether hover or selection changes and starts the matching plan.
//!
//! Only `Idle` and `Hovering` accept pointer input. While a selection is in
//! flight, open, or closing, hover processing is suspended so exactly one
//! marker is ever active.

use crate::choreography::{
    Direction, Finished, IssuedStep, Plan, PlanKind, SequenceHandle, Sequencer, StageContext,
    TickReport,
};
use crate::config::{ConfigError, StageConfig};
use crate::orbit::OrbitControls;
use crate::picking::{self, RayHit, Viewport};
use crate::registry::{MarkerIndex, SceneRegistry};
use crate::sinks::{MediaPlayer, PresentationSink};
use crate::state::SceneRig;
use glam::Vec2;
use smallvec::SmallVec;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Hovering(MarkerIndex),
    /// Forward sequence in flight.
    Selecting(MarkerIndex),
    /// Forward sequence complete, detail open.
    Selected(MarkerIndex),
    /// Reverse sequence in flight.
    Closing(MarkerIndex),
}

impl Phase {
    /// Whether pointer hover and click are processed in this phase.
    pub fn accepts_pointer(&self) -> bool {
        matches!(self, Phase::Idle | Phase::Hovering(_))
    }

    pub fn is_rest(&self) -> bool {
        matches!(self, Phase::Idle | Phase::Selected(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Pointer moved between down and up.
    Drag,
    /// A selection is in flight, open, or closing.
    Busy(Phase),
    /// Click did not strike a pickable object.
    Miss,
    /// Close requested while nothing is open.
    NotSelected(Phase),
    /// Hover target unchanged.
    Unchanged,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageEvent {
    HoverOn(MarkerIndex),
    HoverOff(MarkerIndex),
    SelectionStarted(MarkerIndex),
    SelectionSettled(MarkerIndex),
    CloseStarted(MarkerIndex),
    Closed(MarkerIndex),
    Ignored(IgnoreReason),
}

pub type StageEvents = SmallVec<[StageEvent; 4]>;

/// Hover/selection bookkeeping. Indices only; the registry owns objects.
#[derive(Clone, Debug)]
pub struct InteractionState {
    pub phase: Phase,
    pub hovered: Option<MarkerIndex>,
    pub selected: Option<MarkerIndex>,
    pub sequence_in_flight: Option<SequenceHandle>,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            hovered: None,
            selected: None,
            sequence_in_flight: None,
        }
    }
}

/// Result of one frame tick.
#[derive(Debug, Default)]
pub struct TickOutcome {
    pub events: StageEvents,
    pub issued: SmallVec<[IssuedStep; 8]>,
}

pub struct Stage<P: PresentationSink, M: MediaPlayer> {
    registry: SceneRegistry,
    rig: SceneRig,
    config: StageConfig,
    sequencer: Sequencer,
    state: InteractionState,
    orbit: OrbitControls,
    viewport: Viewport,
    // steps issued and plans finished outside `tick`, reported by the next tick
    pending: TickReport,
    presentation: P,
    media: M,
}

impl<P: PresentationSink, M: MediaPlayer> Stage<P, M> {
    pub fn new(
        registry: SceneRegistry,
        config: StageConfig,
        presentation: P,
        media: M,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let rig = config.initial_rig();
        Ok(Self {
            registry,
            rig,
            config,
            sequencer: Sequencer::new(),
            state: InteractionState::default(),
            orbit: OrbitControls::default(),
            viewport: Viewport::new(1.0, 1.0),
            pending: TickReport::default(),
            presentation,
            media,
        })
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    pub fn rig(&self) -> &SceneRig {
        &self.rig
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Track the canvas size; keeps the camera aspect in step.
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport.is_degenerate() {
            return;
        }
        self.viewport = viewport;
        self.rig.camera.aspect = viewport.aspect();
    }

    /// Nearest pickable object under a canvas pixel.
    pub fn pick(&self, px: f32, py: f32) -> Option<RayHit> {
        picking::resolve(px, py, self.viewport, &self.rig.camera, &self.registry)
    }

    pub fn pointer_move(&mut self, px: f32, py: f32) -> StageEvents {
        let mut events = StageEvents::new();
        if !self.state.phase.accepts_pointer() {
            events.push(StageEvent::Ignored(IgnoreReason::Busy(self.state.phase)));
            return events;
        }
        let hit = self.pick(px, py).map(|h| h.object);
        match (self.state.hovered, hit) {
            (Some(prev), Some(obj)) if prev == obj => {
                events.push(StageEvent::Ignored(IgnoreReason::Unchanged));
            }
            (prev, Some(obj)) => {
                if let Some(prev) = prev {
                    self.start(Plan::hover(prev, false, &self.config.choreography));
                    events.push(StageEvent::HoverOff(prev));
                }
                self.start(Plan::hover(obj, true, &self.config.choreography));
                self.presentation.set_pointer_cursor(true);
                self.state.hovered = Some(obj);
                self.state.phase = Phase::Hovering(obj);
                events.push(StageEvent::HoverOn(obj));
            }
            (Some(prev), None) => {
                self.start(Plan::hover(prev, false, &self.config.choreography));
                self.presentation.set_pointer_cursor(false);
                self.state.hovered = None;
                self.state.phase = Phase::Idle;
                events.push(StageEvent::HoverOff(prev));
            }
            (None, None) => {}
        }
        log_events(&events);
        events
    }

    /// Handle a click at a canvas pixel. `was_drag` comes from the gesture
    /// detector and always wins.
    pub fn click(&mut self, px: f32, py: f32, was_drag: bool) -> StageEvents {
        let mut events = StageEvents::new();
        if was_drag {
            events.push(StageEvent::Ignored(IgnoreReason::Drag));
        } else if !self.state.phase.accepts_pointer() {
            events.push(StageEvent::Ignored(IgnoreReason::Busy(self.state.phase)));
        } else {
            match self.pick(px, py) {
                None => events.push(StageEvent::Ignored(IgnoreReason::Miss)),
                Some(hit) => self.select(hit.object, &mut events),
            }
        }
        log_events(&events);
        events
    }

    fn select(&mut self, obj: MarkerIndex, events: &mut StageEvents) {
        let Some(position) = self.registry.get(obj).map(|o| o.transform.position) else {
            events.push(StageEvent::Ignored(IgnoreReason::Miss));
            return;
        };
        if let Some(prev) = self.state.hovered.take() {
            self.start(Plan::hover(prev, false, &self.config.choreography));
            events.push(StageEvent::HoverOff(prev));
        }
        self.presentation.set_pointer_cursor(false);
        let handle = self.start(Plan::forward(obj, position, &self.config.choreography));
        self.state.selected = Some(obj);
        self.state.sequence_in_flight = Some(handle);
        self.state.phase = Phase::Selecting(obj);
        events.push(StageEvent::SelectionStarted(obj));
    }

    /// Close action from the detail panel's back control.
    pub fn close(&mut self) -> StageEvents {
        let mut events = StageEvents::new();
        match self.state.phase {
            Phase::Selected(obj) => {
                let plan = Plan::reverse(
                    obj,
                    self.config.home_eye,
                    self.config.home_target,
                    &self.config.choreography,
                );
                let handle = self.start(plan);
                self.state.sequence_in_flight = Some(handle);
                self.state.phase = Phase::Closing(obj);
                events.push(StageEvent::CloseStarted(obj));
            }
            other => events.push(StageEvent::Ignored(IgnoreReason::NotSelected(other))),
        }
        log_events(&events);
        events
    }

    /// Rotate the camera around its target by a pointer drag delta. Only
    /// honored while no sequence owns the camera.
    pub fn orbit(&mut self, delta_px: Vec2) -> bool {
        if !self.state.phase.accepts_pointer() {
            return false;
        }
        self.orbit.rotate(&mut self.rig.camera, delta_px);
        true
    }

    /// Advance the stage clock by one frame. The outcome also carries steps
    /// issued by pointer events since the previous tick.
    pub fn tick(&mut self, dt: Duration) -> TickOutcome {
        let mut report = std::mem::take(&mut self.pending);
        let mut ctx = StageContext {
            registry: &mut self.registry,
            rig: &mut self.rig,
            presentation: &mut self.presentation,
            media: &mut self.media,
        };
        let advanced = self.sequencer.advance(dt, &mut ctx);
        report.issued.extend(advanced.issued);
        report.finished.extend(advanced.finished);
        let mut outcome = TickOutcome {
            events: StageEvents::new(),
            issued: report.issued,
        };
        for step in &outcome.issued {
            log::debug!(
                "[stage] #{} {:?} @{:.2}s",
                step.handle.0,
                step.kind,
                step.at.as_secs_f32()
            );
        }
        for f in report.finished {
            self.on_finished(f, &mut outcome.events);
        }
        log_events(&outcome.events);
        outcome
    }

    fn on_finished(&mut self, finished: Finished, events: &mut StageEvents) {
        if self.state.sequence_in_flight != Some(finished.handle) {
            return;
        }
        match (finished.kind, self.state.phase) {
            (PlanKind::Sequence(Direction::Forward), Phase::Selecting(obj)) => {
                self.state.sequence_in_flight = None;
                self.state.phase = Phase::Selected(obj);
                events.push(StageEvent::SelectionSettled(obj));
            }
            (PlanKind::Sequence(Direction::Reverse), Phase::Closing(obj)) => {
                self.state.sequence_in_flight = None;
                self.state.selected = None;
                self.state.phase = Phase::Idle;
                events.push(StageEvent::Closed(obj));
            }
            (kind, phase) => {
                log::warn!("[stage] {:?} finished while {:?}", kind, phase);
            }
        }
    }

    fn start(&mut self, plan: Plan) -> SequenceHandle {
        let mut ctx = StageContext {
            registry: &mut self.registry,
            rig: &mut self.rig,
            presentation: &mut self.presentation,
            media: &mut self.media,
        };
        self.sequencer.run(plan, &mut ctx, &mut self.pending)
    }
}

fn log_events(events: &StageEvents) {
    for ev in events {
        match ev {
            StageEvent::Ignored(reason) => log::debug!("[stage] ignored: {:?}", reason),
            StageEvent::HoverOn(_) | StageEvent::HoverOff(_) => log::debug!("[stage] {:?}", ev),
            _ => log::info!("[stage] {:?}", ev),
        }
    }
}
