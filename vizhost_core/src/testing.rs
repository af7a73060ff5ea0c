// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory platform for host tests.
//!
//! Frames, visibility changes and panel edits are pumped by hand; spawned
//! futures are polled by [`FakePlatform::run_tasks`].

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::task::{Context, Poll, Waker};

use crate::error::HostError;
use crate::panel::{ControlSpec, PanelEdit, ParamValue, ParameterPanel};
use crate::platform::{FrameCallback, FrameLoop, LocalTask, Platform, VisibilityCallback};
use crate::time::{HostTime, Timebase};
use crate::timing::FrameTick;
use crate::visibility::VisibilityObservation;

#[derive(Default)]
pub(crate) struct Shared {
    pub(crate) scaffolded: bool,
    pub(crate) scaffold_inserts: u32,
    pub(crate) scaffold_clears: u32,
    pub(crate) panels_built: u32,
    pub(crate) fail_panel: bool,
    pub(crate) controls: Vec<(&'static str, ParamValue)>,
    pub(crate) monitors: Vec<&'static str>,
    pub(crate) shown: Vec<(&'static str, ParamValue)>,
    listener: Option<Box<dyn FnMut(PanelEdit)>>,
    loops: Vec<LoopSlot>,
    frame_index: u64,
    visibility: Option<VisibilityCallback>,
    pub(crate) watch_margin: Option<u32>,
    pub(crate) watch_alive: bool,
    tasks: Vec<LocalTask>,
}

struct LoopSlot {
    callback: Option<FrameCallback>,
    running: bool,
    alive: bool,
}

#[derive(Clone, Default)]
pub(crate) struct FakePlatform {
    pub(crate) shared: Rc<RefCell<Shared>>,
}

impl FakePlatform {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Delivers one animation frame at `ms` to every running loop.
    pub(crate) fn frame(&self, ms: u64) {
        let count = self.shared.borrow().loops.len();
        for id in 0..count {
            let taken = {
                let mut s = self.shared.borrow_mut();
                let index = s.frame_index;
                let slot = &mut s.loops[id];
                if slot.running && slot.alive {
                    slot.callback.take().map(|cb| (cb, index))
                } else {
                    None
                }
            };
            let Some((mut cb, index)) = taken else {
                continue;
            };
            self.shared.borrow_mut().frame_index += 1;
            cb(FrameTick::synthetic(HostTime(ms * 1000), index));
            let mut s = self.shared.borrow_mut();
            if s.loops[id].alive {
                s.loops[id].callback = Some(cb);
            }
        }
    }

    /// Reports an intersection ratio for the container.
    pub(crate) fn set_ratio(&self, ratio: f64) {
        let taken = self.shared.borrow_mut().visibility.take();
        let Some(mut cb) = taken else {
            return;
        };
        cb(VisibilityObservation::new(ratio));
        let mut s = self.shared.borrow_mut();
        if s.watch_alive {
            s.visibility = Some(cb);
        }
    }

    /// Simulates the user editing a panel control.
    pub(crate) fn edit(&self, key: &'static str, value: ParamValue) {
        let taken = self.shared.borrow_mut().listener.take();
        let Some(mut listener) = taken else {
            return;
        };
        listener(PanelEdit { key, value });
        let mut s = self.shared.borrow_mut();
        if s.listener.is_none() {
            s.listener = Some(listener);
        }
    }

    /// Polls every spawned task once.
    pub(crate) fn run_tasks(&self) {
        let mut tasks = core::mem::take(&mut self.shared.borrow_mut().tasks);
        let mut cx = Context::from_waker(Waker::noop());
        tasks.retain_mut(|task| task.as_mut().poll(&mut cx) == Poll::Pending);
        self.shared.borrow_mut().tasks.extend(tasks);
    }

    pub(crate) fn loops_created(&self) -> usize {
        self.shared.borrow().loops.len()
    }

    pub(crate) fn running_loops(&self) -> usize {
        self.shared
            .borrow()
            .loops
            .iter()
            .filter(|l| l.running && l.alive)
            .count()
    }

    pub(crate) fn has_listener(&self) -> bool {
        self.shared.borrow().listener.is_some()
    }

    pub(crate) fn last_shown(&self, key: &str) -> Option<ParamValue> {
        self.shared
            .borrow()
            .shown
            .iter()
            .rev()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.clone())
    }
}

pub(crate) struct FakeFrames {
    shared: Rc<RefCell<Shared>>,
    id: usize,
}

impl FrameLoop for FakeFrames {
    fn start(&mut self) {
        self.shared.borrow_mut().loops[self.id].running = true;
    }

    fn stop(&mut self) {
        self.shared.borrow_mut().loops[self.id].running = false;
    }

    fn is_running(&self) -> bool {
        self.shared.borrow().loops[self.id].running
    }
}

impl Drop for FakeFrames {
    fn drop(&mut self) {
        let cb = {
            let mut s = self.shared.borrow_mut();
            let slot = &mut s.loops[self.id];
            slot.alive = false;
            slot.running = false;
            slot.callback.take()
        };
        drop(cb);
    }
}

pub(crate) struct FakeWatch {
    shared: Rc<RefCell<Shared>>,
}

impl Drop for FakeWatch {
    fn drop(&mut self) {
        let cb = {
            let mut s = self.shared.borrow_mut();
            s.watch_alive = false;
            s.visibility.take()
        };
        drop(cb);
    }
}

pub(crate) struct FakePanel {
    shared: Rc<RefCell<Shared>>,
}

impl ParameterPanel for FakePanel {
    fn add_control(
        &mut self,
        key: &'static str,
        _label: &str,
        _spec: &ControlSpec,
        initial: &ParamValue,
    ) -> Result<(), HostError> {
        self.shared
            .borrow_mut()
            .controls
            .push((key, initial.clone()));
        Ok(())
    }

    fn add_monitor(
        &mut self,
        key: &'static str,
        _label: &str,
        _initial: &ParamValue,
    ) -> Result<(), HostError> {
        self.shared.borrow_mut().monitors.push(key);
        Ok(())
    }

    fn set_value(&mut self, key: &'static str, value: &ParamValue) {
        self.shared.borrow_mut().shown.push((key, value.clone()));
    }

    fn set_listener(&mut self, listener: Box<dyn FnMut(PanelEdit)>) {
        self.shared.borrow_mut().listener = Some(listener);
    }
}

impl Platform for FakePlatform {
    type Content = ();
    type Panel = FakePanel;
    type Frames = FakeFrames;
    type Watch = FakeWatch;

    fn is_scaffolded(&self) -> bool {
        self.shared.borrow().scaffolded
    }

    fn insert_scaffold(&mut self, _title: &str) -> Result<(), HostError> {
        let mut s = self.shared.borrow_mut();
        s.scaffolded = true;
        s.scaffold_inserts += 1;
        Ok(())
    }

    fn build_panel(&mut self, _title: &str) -> Result<FakePanel, HostError> {
        let mut s = self.shared.borrow_mut();
        if s.fail_panel {
            return Err(HostError::Panel("no pane container".into()));
        }
        s.panels_built += 1;
        Ok(FakePanel {
            shared: self.shared.clone(),
        })
    }

    fn clear_scaffold(&mut self) {
        let mut s = self.shared.borrow_mut();
        s.scaffolded = false;
        s.scaffold_clears += 1;
    }

    fn timebase(&self) -> Timebase {
        Timebase::MICROS
    }

    fn frame_loop(&mut self, callback: FrameCallback) -> FakeFrames {
        let mut s = self.shared.borrow_mut();
        s.loops.push(LoopSlot {
            callback: Some(callback),
            running: false,
            alive: true,
        });
        FakeFrames {
            shared: self.shared.clone(),
            id: s.loops.len() - 1,
        }
    }

    fn watch_visibility(
        &mut self,
        margin_px: u32,
        callback: VisibilityCallback,
    ) -> Result<FakeWatch, HostError> {
        let mut s = self.shared.borrow_mut();
        s.visibility = Some(callback);
        s.watch_margin = Some(margin_px);
        s.watch_alive = true;
        Ok(FakeWatch {
            shared: self.shared.clone(),
        })
    }

    fn spawn_local(&self, task: LocalTask) {
        self.shared.borrow_mut().tasks.push(task);
    }
}
