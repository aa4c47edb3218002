//! Headless collaborators for running a session without a renderer.
//!
//! Used by the simulation harness and by tests. `HeadlessStage` keeps
//! enough bookkeeping to check that every visual is released exactly once.

use std::collections::HashMap;

use log::{debug, warn};

use crate::components::Vec2;
use crate::engine::Prompt;
use crate::stage::{Fade, Stage, Visual, VisualHandle};
use crate::systems::{ClockReading, DialogPage};
use crate::traits::{DialogView, Hud};

/// Stage that only records what it was asked to do
#[derive(Debug, Default)]
pub struct HeadlessStage {
    next_handle: u64,
    live: HashMap<VisualHandle, Visual>,
    pub bounds: (f32, f32),
    pub fades: Vec<(Fade, f32)>,
    pub spawned_total: usize,
    pub despawned_total: usize,
    /// Despawns of handles that were not live
    pub stale_despawns: usize,
}

impl HeadlessStage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn visual(&self, handle: VisualHandle) -> Option<&Visual> {
        self.live.get(&handle)
    }
}

impl Stage for HeadlessStage {
    fn set_world_bounds(&mut self, width: f32, height: f32) {
        self.bounds = (width, height);
    }

    fn spawn_visual(&mut self, visual: Visual) -> VisualHandle {
        self.next_handle += 1;
        let handle = VisualHandle(self.next_handle);
        self.live.insert(handle, visual);
        self.spawned_total += 1;
        handle
    }

    fn move_visual(&mut self, handle: VisualHandle, at: Vec2) {
        match self.live.get_mut(&handle) {
            Some(Visual::Sprite { at: pos, .. }) | Some(Visual::Label { at: pos, .. }) => *pos = at,
            Some(_) => {}
            None => warn!("move of unknown visual {:?}", handle),
        }
    }

    fn despawn_visual(&mut self, handle: VisualHandle) {
        if self.live.remove(&handle).is_some() {
            self.despawned_total += 1;
        } else {
            warn!("despawn of unknown visual {:?}", handle);
            self.stale_despawns += 1;
        }
    }

    fn start_fade(&mut self, fade: Fade, duration_ms: f32) {
        debug!("fade {:?} over {}ms", fade, duration_ms);
        self.fades.push((fade, duration_ms));
    }
}

/// HUD that remembers the latest values
#[derive(Debug, Default)]
pub struct HeadlessHud {
    pub clock: Option<String>,
    pub needs: (f32, f32),
    pub prompt: Option<String>,
    pub notifications: Vec<String>,
}

impl Hud for HeadlessHud {
    fn update_clock(&mut self, reading: &ClockReading) {
        self.clock = Some(reading.display());
    }

    fn update_needs(&mut self, hunger: f32, energy: f32) {
        self.needs = (hunger, energy);
    }

    fn show_prompt(&mut self, prompt: Option<&Prompt>) {
        self.prompt = prompt.map(Prompt::text);
    }

    fn notify(&mut self, message: &str) {
        self.notifications.push(message.to_string());
    }
}

/// Dialog surface that keeps a transcript of shown pages
#[derive(Debug, Default)]
pub struct HeadlessDialogView {
    pub transcript: Vec<DialogPage>,
    pub visible: bool,
}

impl DialogView for HeadlessDialogView {
    fn show_page(&mut self, page: &DialogPage) {
        self.visible = true;
        self.transcript.push(page.clone());
    }

    fn hide(&mut self) {
        self.visible = false;
    }
}
