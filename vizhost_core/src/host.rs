// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The visualization host.
//!
//! A [`VisualizationHost`] drives one demo from page insertion to teardown:
//!
//! ```text
//!   create() ──► Scheduled ──(visible)──► Constructing ──► Active
//!                                   on_create (maybe async)     │
//!                ┌──────────────────────────────────────────────┘
//!                ▼
//!   frame ──► FrameClock::accept ──► on_update ──► on_change ──► panel refresh
//! ```
//!
//! The compute surface `F` is opaque: the host only hands it to `on_change`.
//! The demo state `TD` is built by `on_create` and owned by the host.
//!
//! Visibility drives [`start`](VisualizationHost::start) and
//! [`stop`](VisualizationHost::stop). Stopping only sets the paused flag; with
//! [`IdlePolicy::KeepTicking`] the frame chain keeps running and skips the
//! work, with [`IdlePolicy::Suspend`] it is cancelled until the next start.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use core::cell::RefCell;
use core::fmt;
use core::future::Future;
use core::pin::Pin;

use crate::cadence::FrameClock;
use crate::error::{DemoError, HostError};
use crate::options::{HostOptions, IdlePolicy};
use crate::panel::{
    ControlSpec, PAUSE_KEY, PanelBinding, PanelBuilder, PanelEdit, ParamValue, ParameterPanel,
};
use crate::platform::{FrameLoop, Platform};
use crate::time::Duration;
use crate::timing::FrameTick;
use crate::trace::{
    FailureEvent, LifecycleEvent, LifecycleKind, NoopSink, PanelEditEvent, TickEvent, TraceSink,
    VisibilityEvent,
};
use crate::visibility::{GateAction, VisibilityGate, VisibilityObservation};

/// Result of a demo's `on_create` hook.
pub enum Creation<TD> {
    /// The state is ready.
    Ready(TD),
    /// The state needs asynchronous work first (fetching a bitmap, say). The
    /// frame loop starts once the future resolves.
    Pending(Pin<Box<dyn Future<Output = Result<TD, DemoError>>>>),
}

impl<TD> fmt::Debug for Creation<TD> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(_) => f.write_str("Ready(..)"),
            Self::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// Builds the demo: draws into the content area, registers panel fields
/// (when there is a panel) and returns the initial state.
pub type CreateHook<C, TD> =
    Box<dyn FnOnce(&C, Option<&mut PanelBuilder<TD>>) -> Result<Creation<TD>, DemoError>>;

/// Runs the compute surface for the current state and shows the result.
pub type ChangeHook<F, TD> = Box<dyn FnMut(&mut TD, &mut F) -> Result<(), DemoError>>;

/// Advances time-dependent state; receives the frame time in seconds.
pub type UpdateHook<TD> = Box<dyn FnMut(&mut TD, f64) -> Result<(), DemoError>>;

/// Where a host is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Constructed; `create` not called yet.
    Uncreated,
    /// Scaffold inserted, waiting to become visible.
    Scheduled,
    /// `on_create` is running (or its future is pending).
    Constructing,
    /// State exists; ticking or paused.
    Active,
    /// Creation failed; the host stays inert.
    Failed,
    /// Torn down.
    Disposed,
}

struct Inner<P: Platform, F, TD> {
    title: String,
    platform: P,
    compute: F,
    options: HostOptions,
    on_create: Option<CreateHook<P::Content, TD>>,
    on_change: ChangeHook<F, TD>,
    on_update: Option<UpdateHook<TD>>,
    trace: Box<dyn TraceSink>,
    phase: Phase,
    content: Option<P::Content>,
    state: Option<TD>,
    binding: Option<PanelBinding<TD, P::Panel>>,
    pause_toggle: bool,
    paused: bool,
    clock: FrameClock,
    gate: VisibilityGate,
    frames: Option<P::Frames>,
    watch: Option<P::Watch>,
}

impl<P: Platform, F, TD> Inner<P, F, TD> {
    fn lifecycle(&mut self, kind: LifecycleKind) {
        self.trace.on_lifecycle(&LifecycleEvent {
            title: &self.title,
            kind,
        });
    }

    fn failure(&mut self, error: &HostError) {
        self.trace.on_failure(&FailureEvent {
            title: &self.title,
            error,
        });
    }

    fn fail(&mut self, error: HostError) -> HostError {
        self.phase = Phase::Failed;
        self.failure(&error);
        error
    }

    /// Runs `on_change` once against the current state.
    fn change(&mut self) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if let Err(e) = (self.on_change)(state, &mut self.compute) {
            self.failure(&HostError::Change(e));
        }
    }

    fn refresh_panel(&mut self) {
        let Some(binding) = self.binding.as_mut() else {
            return;
        };
        if let Some(state) = self.state.as_ref() {
            binding.refresh(state);
        }
        if self.pause_toggle {
            binding
                .panel_mut()
                .set_value(PAUSE_KEY, &ParamValue::Toggle(self.paused));
        }
    }

    fn pause(&mut self) {
        if self.paused {
            self.refresh_panel();
            return;
        }
        self.paused = true;
        self.lifecycle(LifecycleKind::Paused);
        if self.options.idle_policy == IdlePolicy::Suspend {
            if let Some(frames) = self.frames.as_mut() {
                frames.stop();
                self.lifecycle(LifecycleKind::Suspended);
            }
        }
        self.refresh_panel();
    }

    fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // A static demo renders once more after every resume.
            self.clock.rearm();
            self.lifecycle(LifecycleKind::Resumed);
        }
        if let Some(frames) = self.frames.as_mut() {
            if !frames.is_running() {
                frames.start();
            }
        }
        self.refresh_panel();
    }

    fn tick(&mut self, tick: FrameTick) {
        if self.phase != Phase::Active {
            return;
        }
        let Some(cadence) = self.clock.accept(tick.now) else {
            return;
        };
        let worked = !self.paused && (cadence.first || !self.options.is_static);
        if worked {
            let secs = tick.now.as_secs_f64(self.platform.timebase());
            let updated = match (self.on_update.as_mut(), self.state.as_mut()) {
                (Some(update), Some(state)) => update(state, secs).map_err(HostError::Update),
                _ => Ok(()),
            };
            match updated {
                Ok(()) => self.change(),
                Err(e) => self.failure(&e),
            }
            self.refresh_panel();
        }
        self.trace.on_tick(&TickEvent {
            title: &self.title,
            frame_index: tick.frame_index,
            now: tick.now,
            first: cadence.first,
            worked,
        });
    }

    fn edit(&mut self, edit: &PanelEdit) {
        if self.phase != Phase::Active {
            return;
        }
        if self.pause_toggle && edit.key == PAUSE_KEY {
            match edit.value {
                ParamValue::Toggle(true) => self.pause(),
                ParamValue::Toggle(false) => self.resume(),
                _ => {
                    self.failure(&HostError::Panel("pause toggle expects a boolean".into()));
                    return;
                }
            }
        } else {
            let applied = match (self.binding.as_mut(), self.state.as_mut()) {
                (Some(binding), Some(state)) => binding.apply(state, edit),
                _ => return,
            };
            if let Err(e) = applied {
                self.failure(&e);
                return;
            }
        }
        self.trace.on_panel_edit(&PanelEditEvent {
            title: &self.title,
            key: edit.key,
        });
        self.change();
        self.refresh_panel();
    }

    fn teardown(&mut self) {
        if let Some(mut frames) = self.frames.take() {
            frames.stop();
        }
        self.watch = None;
        self.binding = None;
        self.state = None;
        self.content = None;
        self.on_create = None;
        self.platform.clear_scaffold();
        self.phase = Phase::Disposed;
        self.lifecycle(LifecycleKind::Disposed);
    }
}

/// Drives one interactive demo.
///
/// The handle is cheap to clone. Once [`create`](Self::create) has run, the
/// visibility watch keeps the host alive on its own, so callers may drop every
/// handle; [`dispose`](Self::dispose) ends that.
pub struct VisualizationHost<P: Platform, F, TD> {
    inner: Rc<RefCell<Inner<P, F, TD>>>,
}

impl<P: Platform, F, TD> Clone for VisualizationHost<P, F, TD> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<P: Platform, F, TD> fmt::Debug for VisualizationHost<P, F, TD> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("VisualizationHost");
        if let Ok(inner) = self.inner.try_borrow() {
            s.field("title", &inner.title)
                .field("phase", &inner.phase)
                .field("paused", &inner.paused);
        }
        s.finish_non_exhaustive()
    }
}

impl<P, F, TD> VisualizationHost<P, F, TD>
where
    P: Platform + 'static,
    F: 'static,
    TD: 'static,
{
    /// Creates a host. Nothing touches the page until [`create`](Self::create).
    pub fn new(
        title: impl Into<String>,
        platform: P,
        compute: F,
        on_create: impl FnOnce(&P::Content, Option<&mut PanelBuilder<TD>>) -> Result<Creation<TD>, DemoError>
        + 'static,
        on_change: impl FnMut(&mut TD, &mut F) -> Result<(), DemoError> + 'static,
    ) -> Self {
        let options = HostOptions::standard();
        let clock = FrameClock::new(Duration::from_millis(
            options.min_interval_ms,
            platform.timebase(),
        ));
        Self {
            inner: Rc::new(RefCell::new(Inner {
                title: title.into(),
                platform,
                compute,
                options,
                on_create: Some(Box::new(on_create)),
                on_change: Box::new(on_change),
                on_update: None,
                trace: Box::new(NoopSink),
                phase: Phase::Uncreated,
                content: None,
                state: None,
                binding: None,
                pause_toggle: false,
                paused: false,
                clock,
                gate: VisibilityGate::new(),
                frames: None,
                watch: None,
            })),
        }
    }

    /// Makes the demo animated: `on_update` runs before every `on_change`
    /// driven by the frame loop. Without it the demo renders once.
    #[must_use]
    pub fn with_update(self, on_update: impl FnMut(&mut TD, f64) -> Result<(), DemoError> + 'static) -> Self {
        self.inner.borrow_mut().on_update = Some(Box::new(on_update));
        self
    }

    /// Replaces the options.
    #[must_use]
    pub fn with_options(self, options: HostOptions) -> Self {
        {
            let mut inner = self.inner.borrow_mut();
            inner.clock = FrameClock::new(Duration::from_millis(
                options.min_interval_ms,
                inner.platform.timebase(),
            ));
            inner.options = options;
        }
        self
    }

    /// Sends diagnostics to `sink`.
    #[must_use]
    pub fn with_trace(self, sink: impl TraceSink + 'static) -> Self {
        self.inner.borrow_mut().trace = Box::new(sink);
        self
    }

    /// Inserts the scaffold and starts watching visibility.
    ///
    /// Idempotent: only the first call on an uncreated host does anything,
    /// and a container that already carries a scaffold is left alone.
    pub fn create(&self) -> Result<(), HostError> {
        let mut guard = self.inner.try_borrow_mut().map_err(|_| HostError::Busy)?;
        if guard.phase != Phase::Uncreated || guard.platform.is_scaffolded() {
            return Ok(());
        }
        Self::scaffold(&self.inner, &mut guard)
    }

    /// Activates the host.
    ///
    /// The first activation builds the panel, runs `on_create` and enters the
    /// frame loop; later ones only clear the paused flag.
    pub fn start(&self) -> Result<(), HostError> {
        let mut guard = self.inner.try_borrow_mut().map_err(|_| HostError::Busy)?;
        Self::start_locked(&self.inner, &mut guard)
    }

    /// Pauses the host. The state is kept; the panel shows the paused flag.
    pub fn stop(&self) -> Result<(), HostError> {
        let mut guard = self.inner.try_borrow_mut().map_err(|_| HostError::Busy)?;
        Self::stop_locked(&mut guard);
        Ok(())
    }

    /// Tears the host down: cancels the frame chain, ends the visibility
    /// watch, drops the state and removes the scaffold.
    pub fn dispose(&self) -> Result<(), HostError> {
        let mut guard = self.inner.try_borrow_mut().map_err(|_| HostError::Busy)?;
        if guard.phase != Phase::Disposed {
            guard.teardown();
        }
        Ok(())
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.inner.borrow().phase
    }

    /// Whether work is paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.inner.borrow().paused
    }

    /// The title.
    #[must_use]
    pub fn title(&self) -> String {
        self.inner.borrow().title.clone()
    }

    /// Runs `f` against the demo state, if it exists.
    pub fn with_state<R>(&self, f: impl FnOnce(&TD) -> R) -> Option<R> {
        let inner = self.inner.try_borrow().ok()?;
        inner.state.as_ref().map(f)
    }

    fn scaffold(rc: &Rc<RefCell<Inner<P, F, TD>>>, inner: &mut Inner<P, F, TD>) -> Result<(), HostError> {
        let content = match inner.platform.insert_scaffold(&inner.title) {
            Ok(content) => content,
            Err(e) => return Err(inner.fail(e)),
        };
        inner.content = Some(content);

        let owner = rc.clone();
        let watch = inner.platform.watch_visibility(
            inner.options.visibility_margin_px,
            Box::new(move |obs| Self::observe(&owner, obs)),
        );
        match watch {
            Ok(watch) => inner.watch = Some(watch),
            Err(e) => return Err(inner.fail(e)),
        }
        inner.phase = Phase::Scheduled;
        inner.lifecycle(LifecycleKind::Scaffolded);
        Ok(())
    }

    fn observe(rc: &Rc<RefCell<Inner<P, F, TD>>>, obs: VisibilityObservation) {
        let Ok(mut guard) = rc.try_borrow_mut() else {
            return;
        };
        let Some(action) = guard.gate.observe(obs) else {
            return;
        };
        let inner = &mut *guard;
        inner.trace.on_visibility(&VisibilityEvent {
            title: &inner.title,
            visible: action == GateAction::Start,
            ratio: obs.ratio,
        });
        match action {
            GateAction::Start => {
                // Failures are already traced and leave the host in `Failed`.
                _ = Self::start_locked(rc, inner);
            }
            GateAction::Stop => Self::stop_locked(inner),
        }
    }

    fn start_locked(rc: &Rc<RefCell<Inner<P, F, TD>>>, inner: &mut Inner<P, F, TD>) -> Result<(), HostError> {
        match inner.phase {
            Phase::Uncreated => {
                Self::scaffold(rc, inner)?;
                Self::construct(rc, inner)
            }
            Phase::Scheduled => Self::construct(rc, inner),
            Phase::Constructing => {
                inner.paused = false;
                Ok(())
            }
            Phase::Active => {
                inner.resume();
                Ok(())
            }
            Phase::Failed | Phase::Disposed => Ok(()),
        }
    }

    fn stop_locked(inner: &mut Inner<P, F, TD>) {
        match inner.phase {
            Phase::Constructing => inner.paused = true,
            Phase::Active => inner.pause(),
            _ => {}
        }
    }

    fn construct(rc: &Rc<RefCell<Inner<P, F, TD>>>, inner: &mut Inner<P, F, TD>) -> Result<(), HostError> {
        inner.phase = Phase::Constructing;
        inner.paused = false;

        let panel = if inner.options.disable_pane {
            None
        } else {
            match inner.platform.build_panel(&inner.title) {
                Ok(panel) => Some(panel),
                Err(e) => {
                    // The demo still runs, just without controls.
                    inner.failure(&e);
                    None
                }
            }
        };

        let (Some(on_create), Some(content)) = (inner.on_create.take(), inner.content.as_ref())
        else {
            return Err(inner.fail(HostError::Create(DemoError::new("demo already created"))));
        };
        let mut builder = PanelBuilder::new();
        let creation = on_create(content, panel.is_some().then_some(&mut builder));

        match creation {
            Err(e) => Err(inner.fail(HostError::Create(e))),
            Ok(Creation::Ready(state)) => {
                Self::activate(rc, inner, state, panel, builder);
                Ok(())
            }
            Ok(Creation::Pending(future)) => {
                let weak = Rc::downgrade(rc);
                inner.platform.spawn_local(Box::pin(async move {
                    let result = future.await;
                    let Some(rc) = weak.upgrade() else {
                        return;
                    };
                    let Ok(mut guard) = rc.try_borrow_mut() else {
                        return;
                    };
                    if guard.phase != Phase::Constructing {
                        return;
                    }
                    match result {
                        Ok(state) => Self::activate(&rc, &mut guard, state, panel, builder),
                        Err(e) => {
                            guard.fail(HostError::Create(e));
                        }
                    }
                }));
                Ok(())
            }
        }
    }

    fn activate(
        rc: &Rc<RefCell<Inner<P, F, TD>>>,
        inner: &mut Inner<P, F, TD>,
        state: TD,
        panel: Option<P::Panel>,
        builder: PanelBuilder<TD>,
    ) {
        let mut binding = panel.and_then(|panel| match PanelBinding::attach(panel, builder, &state) {
            Ok(binding) => Some(binding),
            Err(e) => {
                inner.failure(&e);
                None
            }
        });

        if let Some(binding) = binding.as_mut() {
            if inner.on_update.is_some() && !inner.options.is_static {
                let added = binding.panel_mut().add_control(
                    PAUSE_KEY,
                    PAUSE_KEY,
                    &ControlSpec::Toggle,
                    &ParamValue::Toggle(inner.paused),
                );
                match added {
                    Ok(()) => inner.pause_toggle = true,
                    Err(e) => inner.failure(&e),
                }
            }
            let weak = Rc::downgrade(rc);
            binding.panel_mut().set_listener(Box::new(move |edit| {
                if let Some(rc) = weak.upgrade() {
                    if let Ok(mut inner) = rc.try_borrow_mut() {
                        inner.edit(&edit);
                    }
                }
            }));
        }

        inner.state = Some(state);
        inner.binding = binding;
        inner.phase = Phase::Active;
        inner.lifecycle(LifecycleKind::Constructed);

        if inner.on_update.is_none() {
            // One-shot demo: a single render, no frame loop.
            inner.change();
            return;
        }

        let weak = Rc::downgrade(rc);
        let mut frames = inner.platform.frame_loop(Box::new(move |tick| {
            if let Some(rc) = weak.upgrade() {
                if let Ok(mut inner) = rc.try_borrow_mut() {
                    inner.tick(tick);
                }
            }
        }));
        if inner.paused {
            inner.lifecycle(LifecycleKind::Paused);
        }
        if !(inner.paused && inner.options.idle_policy == IdlePolicy::Suspend) {
            frames.start();
        }
        inner.frames = Some(frames);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::Field;
    use crate::testing::FakePlatform;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::{Cell, RefCell};
    use core::task::Poll;

    #[derive(Debug, Default)]
    struct Demo {
        t: f64,
        r: f64,
    }

    #[derive(Debug, Default)]
    struct Counts {
        creates: Cell<u32>,
        updates: Cell<u32>,
        changes: Cell<u32>,
    }

    type Host = VisualizationHost<FakePlatform, u32, Demo>;

    fn host(platform: &FakePlatform, counts: &Rc<Counts>) -> Host {
        let c = counts.clone();
        let ch = counts.clone();
        VisualizationHost::new(
            "Plasma",
            platform.clone(),
            0_u32,
            move |_content: &(), panel: Option<&mut PanelBuilder<Demo>>| {
                c.creates.set(c.creates.get() + 1);
                if let Some(panel) = panel {
                    panel
                        .add_control(
                            Field::number("r", |d: &Demo| d.r, |d, v| d.r = v),
                            ControlSpec::range(1.0, 50.0),
                        )
                        .add_monitor(Field::number_readout("t", |d: &Demo| d.t));
                }
                Ok(Creation::Ready(Demo { t: 0.0, r: 5.0 }))
            },
            move |_d: &mut Demo, calls: &mut u32| {
                *calls += 1;
                ch.changes.set(ch.changes.get() + 1);
                Ok(())
            },
        )
    }

    fn animated(platform: &FakePlatform, counts: &Rc<Counts>) -> Host {
        let c = counts.clone();
        host(platform, counts).with_update(move |d, t| {
            c.updates.set(c.updates.get() + 1);
            d.t = t;
            Ok(())
        })
    }

    #[derive(Default)]
    struct Log(Vec<LifecycleKind>, u32);

    impl TraceSink for Log {
        fn on_lifecycle(&mut self, e: &LifecycleEvent<'_>) {
            self.0.push(e.kind);
        }

        fn on_failure(&mut self, _e: &FailureEvent<'_>) {
            self.1 += 1;
        }
    }

    #[test]
    fn create_is_idempotent_and_waits_for_visibility() {
        let platform = FakePlatform::new();
        let counts = Rc::new(Counts::default());
        let host = animated(&platform, &counts);
        host.create().unwrap();
        host.create().unwrap();
        assert_eq!(platform.shared.borrow().scaffold_inserts, 1);
        assert_eq!(host.phase(), Phase::Scheduled);
        assert_eq!(counts.creates.get(), 0, "nothing is built before visibility");

        // A second host on the same container leaves it alone.
        let other = animated(&platform, &counts);
        other.create().unwrap();
        assert_eq!(other.phase(), Phase::Uncreated);
        assert_eq!(platform.shared.borrow().scaffold_inserts, 1);
    }

    #[test]
    fn ticks_are_capped_by_the_cadence_gate() {
        let platform = FakePlatform::new();
        let counts = Rc::new(Counts::default());
        let host = animated(&platform, &counts);
        host.create().unwrap();
        platform.set_ratio(0.4);
        assert_eq!(host.phase(), Phase::Active);
        assert_eq!(platform.running_loops(), 1);

        // The first timestamp is below the interval and is skipped.
        platform.frame(16);
        assert_eq!(counts.updates.get(), 0);
        for ms in [40, 56, 72, 80, 96, 112, 120] {
            platform.frame(ms);
        }
        // Accepted at 40, 80 and 120.
        assert_eq!(counts.updates.get(), 3);
        assert_eq!(counts.changes.get(), 3);
        assert_eq!(host.with_state(|d| d.t), Some(0.12));
        assert_eq!(platform.last_shown("t"), Some(ParamValue::Number(0.12)));
    }

    #[test]
    fn static_demo_renders_once_per_resume() {
        let platform = FakePlatform::new();
        let counts = Rc::new(Counts::default());
        let host =
            animated(&platform, &counts).with_options(HostOptions::standard().with_static(true));
        host.create().unwrap();
        platform.set_ratio(1.0);
        for ms in [40, 80, 120, 160] {
            platform.frame(ms);
        }
        assert_eq!(counts.changes.get(), 1);
        assert!(
            !platform.shared.borrow().controls.iter().any(|(k, _)| *k == PAUSE_KEY),
            "static demos have no pause toggle"
        );

        platform.set_ratio(0.0);
        platform.set_ratio(0.5);
        platform.frame(200);
        platform.frame(240);
        assert_eq!(counts.changes.get(), 2, "resume re-arms exactly one render");
    }

    #[test]
    fn paused_host_keeps_its_frame_chain() {
        let platform = FakePlatform::new();
        let counts = Rc::new(Counts::default());
        let host = animated(&platform, &counts);
        host.create().unwrap();
        platform.set_ratio(1.0);
        platform.frame(40);
        assert_eq!(counts.changes.get(), 1);

        host.stop().unwrap();
        assert!(host.is_paused());
        assert_eq!(platform.last_shown(PAUSE_KEY), Some(ParamValue::Toggle(true)));
        platform.frame(80);
        platform.frame(120);
        assert_eq!(counts.changes.get(), 1, "paused host skips work");
        assert_eq!(platform.running_loops(), 1, "chain stays alive");

        host.start().unwrap();
        assert!(!host.is_paused());
        platform.frame(160);
        assert_eq!(counts.changes.get(), 2);
    }

    #[test]
    fn visibility_flips_toggle_pause_and_build_once() {
        let platform = FakePlatform::new();
        let counts = Rc::new(Counts::default());
        let host = animated(&platform, &counts);
        host.create().unwrap();
        platform.set_ratio(0.0);
        assert_eq!(host.phase(), Phase::Scheduled, "hidden at first: nothing to stop");
        platform.set_ratio(0.2);
        platform.set_ratio(0.7);
        platform.set_ratio(0.0);
        assert!(host.is_paused());
        platform.set_ratio(1.0);
        assert!(!host.is_paused());
        assert_eq!(counts.creates.get(), 1);
        assert_eq!(platform.loops_created(), 1, "at most one frame chain");
        assert_eq!(platform.shared.borrow().panels_built, 1);
    }

    #[test]
    fn each_panel_edit_changes_exactly_once() {
        let platform = FakePlatform::new();
        let counts = Rc::new(Counts::default());
        let host = animated(&platform, &counts);
        host.create().unwrap();
        platform.set_ratio(1.0);

        platform.edit("r", ParamValue::Number(80.0));
        assert_eq!(counts.changes.get(), 1);
        assert_eq!(host.with_state(|d| d.r), Some(50.0));
        assert_eq!(platform.last_shown("r"), Some(ParamValue::Number(50.0)));

        // Monitors are not editable; rejected edits do not render.
        platform.edit("t", ParamValue::Number(1.0));
        assert_eq!(counts.changes.get(), 1);
    }

    #[test]
    fn pause_toggle_edits_pause_and_resume() {
        let platform = FakePlatform::new();
        let counts = Rc::new(Counts::default());
        let host = animated(&platform, &counts);
        host.create().unwrap();
        platform.set_ratio(1.0);
        assert!(
            platform
                .shared
                .borrow()
                .controls
                .contains(&(PAUSE_KEY, ParamValue::Toggle(false)))
        );

        platform.edit(PAUSE_KEY, ParamValue::Toggle(true));
        assert!(host.is_paused());
        assert_eq!(counts.changes.get(), 1, "the toggle counts as an edit");
        platform.frame(40);
        assert_eq!(counts.updates.get(), 0);

        platform.edit(PAUSE_KEY, ParamValue::Toggle(false));
        platform.frame(80);
        assert_eq!(counts.updates.get(), 1);
    }

    #[test]
    fn one_shot_demo_renders_once_without_a_loop() {
        let platform = FakePlatform::new();
        let counts = Rc::new(Counts::default());
        let host = host(&platform, &counts);
        host.create().unwrap();
        platform.set_ratio(1.0);
        assert_eq!(counts.changes.get(), 1);
        assert_eq!(platform.loops_created(), 0);
        assert!(
            !platform.shared.borrow().controls.iter().any(|(k, _)| *k == PAUSE_KEY),
            "one-shot demos have no pause toggle"
        );
        platform.edit("r", ParamValue::Number(3.0));
        assert_eq!(counts.changes.get(), 2);
    }

    #[test]
    fn create_failure_is_contained() {
        let platform = FakePlatform::new();
        let log = Rc::new(RefCell::new(Log::default()));
        let host: Host = VisualizationHost::new(
            "broken",
            platform.clone(),
            0,
            |_: &(), _: Option<&mut PanelBuilder<Demo>>| Err(DemoError::new("no canvas")),
            |_: &mut Demo, _: &mut u32| Ok(()),
        )
        .with_update(|_, _| Ok(()))
        .with_trace(log.clone());
        host.create().unwrap();
        platform.set_ratio(1.0);
        assert_eq!(host.phase(), Phase::Failed);
        assert_eq!(log.borrow().1, 1);
        assert_eq!(platform.loops_created(), 0);

        assert!(matches!(host.start(), Ok(())));
        assert_eq!(host.phase(), Phase::Failed);
    }

    #[test]
    fn failing_hooks_do_not_break_the_chain() {
        let platform = FakePlatform::new();
        let log = Rc::new(RefCell::new(Log::default()));
        let changes = Rc::new(Cell::new(0_u32));
        let seen = changes.clone();
        let host: Host = VisualizationHost::new(
            "fire",
            platform.clone(),
            0,
            |_: &(), _: Option<&mut PanelBuilder<Demo>>| Ok(Creation::Ready(Demo::default())),
            move |_: &mut Demo, _: &mut u32| {
                seen.set(seen.get() + 1);
                Err(DemoError::new("kernel trap"))
            },
        )
        .with_update(|d, t| {
            d.t = t;
            if t > 0.1 {
                Err(DemoError::new("clock ran out"))
            } else {
                Ok(())
            }
        })
        .with_trace(log.clone());
        host.create().unwrap();
        platform.set_ratio(1.0);

        platform.frame(40);
        platform.frame(80);
        assert_eq!(changes.get(), 2, "change errors keep ticking");
        platform.frame(120);
        assert_eq!(changes.get(), 2, "an update error skips that tick's change");
        platform.frame(160);
        assert_eq!(log.borrow().1, 4);
        assert_eq!(platform.running_loops(), 1);
    }

    #[test]
    fn suspend_policy_cancels_the_chain_while_paused() {
        let platform = FakePlatform::new();
        let counts = Rc::new(Counts::default());
        let log = Rc::new(RefCell::new(Log::default()));
        let host = animated(&platform, &counts)
            .with_options(HostOptions::standard().with_idle_policy(IdlePolicy::Suspend))
            .with_trace(log.clone());
        host.create().unwrap();
        platform.set_ratio(1.0);
        platform.set_ratio(0.0);
        assert_eq!(platform.running_loops(), 0);
        assert!(log.borrow().0.contains(&LifecycleKind::Suspended));
        platform.set_ratio(1.0);
        assert_eq!(platform.running_loops(), 1);
        assert_eq!(platform.loops_created(), 1);
    }

    #[test]
    fn dispose_releases_everything() {
        let platform = FakePlatform::new();
        let counts = Rc::new(Counts::default());
        let host = animated(&platform, &counts);
        host.create().unwrap();
        platform.set_ratio(1.0);
        host.dispose().unwrap();
        assert_eq!(host.phase(), Phase::Disposed);
        assert!(host.with_state(|_| ()).is_none());
        {
            let shared = platform.shared.borrow();
            assert!(!shared.watch_alive);
            assert_eq!(shared.scaffold_clears, 1);
        }
        assert_eq!(platform.running_loops(), 0);
        platform.set_ratio(0.0);
        platform.frame(40);
        assert_eq!(counts.changes.get(), 0);
        assert_eq!(Rc::strong_count(&host.inner), 1, "watch no longer owns the host");
        host.dispose().unwrap();
    }

    #[test]
    fn pending_creation_starts_after_resolution() {
        let platform = FakePlatform::new();
        let slot: Rc<RefCell<Option<Result<Demo, DemoError>>>> = Rc::new(RefCell::new(None));
        let pending = slot.clone();
        let changes = Rc::new(Cell::new(0_u32));
        let seen = changes.clone();
        let host: Host = VisualizationHost::new(
            "roads",
            platform.clone(),
            0,
            move |_: &(), _: Option<&mut PanelBuilder<Demo>>| {
                Ok(Creation::Pending(Box::pin(core::future::poll_fn(
                    move |_| match pending.borrow_mut().take() {
                        Some(result) => Poll::Ready(result),
                        None => Poll::Pending,
                    },
                ))))
            },
            move |_: &mut Demo, _: &mut u32| {
                seen.set(seen.get() + 1);
                Ok(())
            },
        )
        .with_update(|_, _| Ok(()));
        host.create().unwrap();
        platform.set_ratio(1.0);
        platform.run_tasks();
        assert_eq!(host.phase(), Phase::Constructing);
        assert_eq!(platform.loops_created(), 0);

        // Scrolled away before the bitmap arrived.
        platform.set_ratio(0.0);
        *slot.borrow_mut() = Some(Ok(Demo::default()));
        platform.run_tasks();
        assert_eq!(host.phase(), Phase::Active);
        assert!(host.is_paused(), "becomes active already paused");
        platform.frame(40);
        assert_eq!(changes.get(), 0);

        platform.set_ratio(1.0);
        platform.frame(80);
        assert_eq!(changes.get(), 1);
    }

    #[test]
    fn disabled_pane_still_runs() {
        let platform = FakePlatform::new();
        let counts = Rc::new(Counts::default());
        let host = animated(&platform, &counts)
            .with_options(HostOptions::standard().with_disable_pane(true));
        host.create().unwrap();
        platform.set_ratio(1.0);
        platform.frame(40);
        assert_eq!(counts.changes.get(), 1);
        let shared = platform.shared.borrow();
        assert_eq!(shared.panels_built, 0);
        assert!(shared.controls.is_empty());
        drop(shared);
        assert!(!platform.has_listener());
    }

    #[test]
    fn panel_failure_degrades_to_no_panel() {
        let platform = FakePlatform::new();
        platform.shared.borrow_mut().fail_panel = true;
        let counts = Rc::new(Counts::default());
        let host = animated(&platform, &counts);
        host.start().unwrap();
        assert_eq!(host.phase(), Phase::Active, "start before create builds everything");
        platform.frame(40);
        assert_eq!(counts.changes.get(), 1);
    }
}
