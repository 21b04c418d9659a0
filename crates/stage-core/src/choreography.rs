//! Time-ordered choreography of animation and side-effect steps.
//!
//! A [`Plan`] is a list of steps sorted by offset from the sequence start.
//! The [`Sequencer`] advances a monotonic clock once per frame and issues
//! every step whose offset has elapsed. Steps sharing an offset are issued in
//! plan order within the same tick, and all of them precede any later
//! offset. Tweens start at their scheduled offset rather than at the tick
//! that noticed them, so a long frame never stretches a sequence.
//!
//! Sequences cannot be cancelled. Callers prevent overlap instead.

use crate::config::ChoreographyConfig;
use crate::registry::{MarkerIndex, SceneRegistry};
use crate::sinks::{MediaPlayer, PresentationSink};
use crate::state::{AccentLight, SceneRig};
use crate::tween::{Animator, Channel, Easing, TweenValue};
use glam::Vec3;
use smallvec::SmallVec;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StepAction {
    /// Hover cue on the marker's tilt axis.
    TiltMarker { angle: f32 },
    RotateMarker { spin: f32 },
    ShowInfo,
    MoveCamera { to: Vec3 },
    MoveTarget { to: Vec3 },
    /// Reflect the light through the vertical axis from wherever it is.
    MoveLight,
    SnapMarker { spin: f32 },
    OpenPanel,
    StartMedia,
    StopMedia,
    ClosePanel,
    ClearInfo,
}

/// Data-free tag of a [`StepAction`], for logs and assertions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepKind {
    TiltMarker,
    RotateMarker,
    ShowInfo,
    MoveCamera,
    MoveTarget,
    MoveLight,
    SnapMarker,
    OpenPanel,
    StartMedia,
    StopMedia,
    ClosePanel,
    ClearInfo,
}

impl StepAction {
    pub fn kind(&self) -> StepKind {
        match self {
            StepAction::TiltMarker { .. } => StepKind::TiltMarker,
            StepAction::RotateMarker { .. } => StepKind::RotateMarker,
            StepAction::ShowInfo => StepKind::ShowInfo,
            StepAction::MoveCamera { .. } => StepKind::MoveCamera,
            StepAction::MoveTarget { .. } => StepKind::MoveTarget,
            StepAction::MoveLight => StepKind::MoveLight,
            StepAction::SnapMarker { .. } => StepKind::SnapMarker,
            StepAction::OpenPanel => StepKind::OpenPanel,
            StepAction::StartMedia => StepKind::StartMedia,
            StepAction::StopMedia => StepKind::StopMedia,
            StepAction::ClosePanel => StepKind::ClosePanel,
            StepAction::ClearInfo => StepKind::ClearInfo,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChoreographyStep {
    pub action: StepAction,
    pub offset: Duration,
    pub duration: Duration,
    pub easing: Easing,
}

impl ChoreographyStep {
    fn instant(action: StepAction, offset: Duration) -> Self {
        Self {
            action,
            offset,
            duration: Duration::ZERO,
            easing: Easing::Linear,
        }
    }

    fn tween(action: StepAction, offset: Duration, duration: Duration, easing: Easing) -> Self {
        Self {
            action,
            offset,
            duration,
            easing,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlanKind {
    HoverOn,
    HoverOff,
    Sequence(Direction),
}

#[derive(Clone, Debug)]
pub struct Plan {
    pub object: MarkerIndex,
    pub kind: PlanKind,
    steps: Vec<ChoreographyStep>,
}

impl Plan {
    fn new(object: MarkerIndex, kind: PlanKind, mut steps: Vec<ChoreographyStep>) -> Self {
        // stable: same-offset steps keep their listed order
        steps.sort_by_key(|s| s.offset);
        Self {
            object,
            kind,
            steps,
        }
    }

    /// One-step hover cue: tilt the marker and update the info block.
    pub fn hover(object: MarkerIndex, on: bool, cfg: &ChoreographyConfig) -> Self {
        let angle = if on { cfg.hover_tilt } else { cfg.rest_tilt };
        let info = if on {
            StepAction::ShowInfo
        } else {
            StepAction::ClearInfo
        };
        Self::new(
            object,
            if on {
                PlanKind::HoverOn
            } else {
                PlanKind::HoverOff
            },
            vec![
                ChoreographyStep::tween(
                    StepAction::TiltMarker { angle },
                    Duration::ZERO,
                    cfg.hover_cue(),
                    cfg.hover_easing,
                ),
                ChoreographyStep::instant(info, Duration::ZERO),
            ],
        )
    }

    /// Selection: raise the marker, fly camera/target/light over, then open
    /// the detail panel and start its media.
    pub fn forward(object: MarkerIndex, position: Vec3, cfg: &ChoreographyConfig) -> Self {
        let t1 = cfg.raise();
        let t2 = t1 + cfg.travel();
        Self::new(
            object,
            PlanKind::Sequence(Direction::Forward),
            vec![
                ChoreographyStep::tween(
                    StepAction::RotateMarker {
                        spin: cfg.raised_spin,
                    },
                    Duration::ZERO,
                    cfg.raise(),
                    cfg.marker_easing,
                ),
                ChoreographyStep::instant(StepAction::ShowInfo, Duration::ZERO),
                ChoreographyStep::tween(
                    StepAction::MoveCamera {
                        to: position + cfg.framing_offset,
                    },
                    t1,
                    cfg.travel(),
                    cfg.camera_easing,
                ),
                ChoreographyStep::tween(
                    StepAction::MoveTarget { to: position },
                    t1,
                    cfg.travel(),
                    cfg.camera_easing,
                ),
                ChoreographyStep::tween(StepAction::MoveLight, t1, cfg.travel(), cfg.light_easing),
                ChoreographyStep::instant(StepAction::SnapMarker { spin: cfg.rest_spin }, t2),
                ChoreographyStep::instant(StepAction::OpenPanel, t2),
                ChoreographyStep::instant(StepAction::StartMedia, t2),
            ],
        )
    }

    /// Close: stop media and hide the panel, return to the home framing,
    /// then clear the info block.
    pub fn reverse(
        object: MarkerIndex,
        home_eye: Vec3,
        home_target: Vec3,
        cfg: &ChoreographyConfig,
    ) -> Self {
        let t3 = cfg.return_();
        Self::new(
            object,
            PlanKind::Sequence(Direction::Reverse),
            vec![
                ChoreographyStep::instant(StepAction::StopMedia, Duration::ZERO),
                ChoreographyStep::instant(StepAction::ClosePanel, Duration::ZERO),
                ChoreographyStep::tween(
                    StepAction::MoveCamera { to: home_eye },
                    Duration::ZERO,
                    cfg.return_(),
                    cfg.camera_easing,
                ),
                ChoreographyStep::tween(
                    StepAction::MoveTarget { to: home_target },
                    Duration::ZERO,
                    cfg.return_(),
                    cfg.camera_easing,
                ),
                ChoreographyStep::tween(
                    StepAction::MoveLight,
                    Duration::ZERO,
                    cfg.return_(),
                    cfg.light_easing,
                ),
                ChoreographyStep::instant(StepAction::ClearInfo, t3),
            ],
        )
    }

    pub fn steps(&self) -> &[ChoreographyStep] {
        &self.steps
    }

    /// Time at which the last step has been issued and has settled.
    pub fn total(&self) -> Duration {
        self.steps
            .iter()
            .map(|s| s.offset + s.duration)
            .max()
            .unwrap_or_default()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SequenceHandle(pub u64);

/// Everything a step may touch while it is issued.
pub struct StageContext<'a> {
    pub registry: &'a mut SceneRegistry,
    pub rig: &'a mut SceneRig,
    pub presentation: &'a mut dyn PresentationSink,
    pub media: &'a mut dyn MediaPlayer,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IssuedStep {
    pub handle: SequenceHandle,
    pub kind: StepKind,
    /// Scheduled time on the sequencer clock.
    pub at: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Finished {
    pub handle: SequenceHandle,
    pub object: MarkerIndex,
    pub kind: PlanKind,
}

#[derive(Debug, Default)]
pub struct TickReport {
    pub issued: SmallVec<[IssuedStep; 8]>,
    pub finished: SmallVec<[Finished; 2]>,
}

struct Running {
    handle: SequenceHandle,
    plan: Plan,
    started: Duration,
    next: usize,
}

impl Running {
    fn done(&self, now: Duration) -> bool {
        self.next >= self.plan.steps.len() && now >= self.started + self.plan.total()
    }
}

#[derive(Default)]
pub struct Sequencer {
    clock: Duration,
    animator: Animator,
    running: Vec<Running>,
    next_handle: u64,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.clock
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn is_running(&self, handle: SequenceHandle) -> bool {
        self.running.iter().any(|r| r.handle == handle)
    }

    pub fn running_count(&self) -> usize {
        self.running.len()
    }

    /// Start `plan` now. Steps at offset zero are issued before returning.
    pub fn run(
        &mut self,
        plan: Plan,
        ctx: &mut StageContext<'_>,
        report: &mut TickReport,
    ) -> SequenceHandle {
        let handle = SequenceHandle(self.next_handle);
        self.next_handle += 1;
        log::debug!(
            "[seq] start #{} {:?} on {:?} ({:.2}s)",
            handle.0,
            plan.kind,
            plan.object,
            plan.total().as_secs_f32()
        );
        self.running.push(Running {
            handle,
            plan,
            started: self.clock,
            next: 0,
        });
        self.pump(ctx, report);
        handle
    }

    /// Advance the clock by one frame and issue whatever became due.
    pub fn advance(&mut self, dt: Duration, ctx: &mut StageContext<'_>) -> TickReport {
        self.clock += dt;
        let mut report = TickReport::default();
        self.pump(ctx, &mut report);
        report
    }

    fn pump(&mut self, ctx: &mut StageContext<'_>, report: &mut TickReport) {
        let now = self.clock;
        for run in &mut self.running {
            while let Some(step) = run.plan.steps.get(run.next).copied() {
                let at = run.started + step.offset;
                if at > now {
                    break;
                }
                run.next += 1;
                issue(&mut self.animator, run.plan.object, &step, at, ctx);
                report.issued.push(IssuedStep {
                    handle: run.handle,
                    kind: step.action.kind(),
                    at,
                });
            }
        }
        self.animator.apply(now, ctx.rig, ctx.registry);
        let mut i = 0;
        while i < self.running.len() {
            if self.running[i].done(now) {
                let run = self.running.remove(i);
                log::debug!("[seq] finish #{} {:?}", run.handle.0, run.plan.kind);
                report.finished.push(Finished {
                    handle: run.handle,
                    object: run.plan.object,
                    kind: run.plan.kind,
                });
            } else {
                i += 1;
            }
        }
    }
}

fn issue(
    animator: &mut Animator,
    object: MarkerIndex,
    step: &ChoreographyStep,
    at: Duration,
    ctx: &mut StageContext<'_>,
) {
    let target = match step.action {
        StepAction::TiltMarker { angle } => {
            Some((Channel::MarkerTilt(object), TweenValue::Scalar(angle)))
        }
        StepAction::RotateMarker { spin } => {
            Some((Channel::MarkerSpin(object), TweenValue::Scalar(spin)))
        }
        StepAction::MoveCamera { to } => Some((Channel::CameraEye, TweenValue::Vector(to))),
        StepAction::MoveTarget { to } => Some((Channel::CameraTarget, TweenValue::Vector(to))),
        StepAction::MoveLight => Some((
            Channel::LightPosition,
            TweenValue::Vector(AccentLight::mirrored(ctx.rig.light.position)),
        )),
        _ => None,
    };
    if let Some((channel, to)) = target {
        animator.start(
            channel,
            to,
            at,
            step.duration,
            step.easing,
            ctx.rig,
            ctx.registry,
        );
        return;
    }
    match step.action {
        StepAction::SnapMarker { spin } => animator.snap(
            Channel::MarkerSpin(object),
            TweenValue::Scalar(spin),
            ctx.rig,
            ctx.registry,
        ),
        StepAction::ShowInfo => match ctx.registry.get(object) {
            Some(o) => ctx.presentation.show_info(
                &o.metadata.title,
                o.metadata.ordinal,
                &o.metadata.category,
            ),
            None => log::warn!("[seq] show-info for unknown {:?}", object),
        },
        StepAction::ClearInfo => ctx.presentation.clear_info(),
        StepAction::OpenPanel => ctx.presentation.open_detail(),
        StepAction::ClosePanel => ctx.presentation.close_detail(),
        StepAction::StartMedia => {
            let asset = ctx
                .registry
                .get(object)
                .map(|o| o.metadata.media.clone())
                .unwrap_or_default();
            if asset.is_empty() {
                log::debug!("[media] {:?} has no asset", object);
            } else if ctx.media.is_playing() {
                log::debug!("[media] already playing, start skipped");
            } else if let Err(e) = ctx.media.play(&asset) {
                log::warn!("[media] {}", e);
            }
        }
        // stop() on an idle player is a no-op and also drops a pending load
        StepAction::StopMedia => ctx.media.stop(),
        StepAction::TiltMarker { .. }
        | StepAction::RotateMarker { .. }
        | StepAction::MoveCamera { .. }
        | StepAction::MoveTarget { .. }
        | StepAction::MoveLight => {}
    }
}
