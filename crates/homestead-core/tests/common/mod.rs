//! Shared fixtures for the integration tests.
//!
//! The engine owns its collaborators as boxed trait objects, so the
//! recording HUD and dialog surface here keep their state behind an `Rc`
//! that the test holds a second handle to.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use homestead_core::headless::{HeadlessDialogView, HeadlessHud, HeadlessStage};
use homestead_core::persistence::MemoryStorage;
use homestead_core::prelude::*;
use homestead_core::systems::{ClockReading, DialogPage};

pub const FRAME_MS: f32 = 16.0;

/// Input driven by the test: a held direction plus one-shot key edges
#[derive(Debug, Default)]
pub struct ScriptedInput {
    pub movement: Vec2,
    pub interact: bool,
    pub advance: bool,
    pub cancel: bool,
}

impl ScriptedInput {
    pub fn hold(&mut self, direction: Vec2) {
        self.movement = direction;
    }

    pub fn release(&mut self) {
        self.movement = Vec2::ZERO;
    }
}

impl InputSource for ScriptedInput {
    fn movement(&mut self) -> Vec2 {
        self.movement
    }
    fn interact_pressed(&mut self) -> bool {
        std::mem::take(&mut self.interact)
    }
    fn advance_pressed(&mut self) -> bool {
        std::mem::take(&mut self.advance)
    }
    fn cancel_pressed(&mut self) -> bool {
        std::mem::take(&mut self.cancel)
    }
}

#[derive(Clone, Default)]
pub struct SharedHud(pub Rc<RefCell<HeadlessHud>>);

impl Hud for SharedHud {
    fn update_clock(&mut self, reading: &ClockReading) {
        self.0.borrow_mut().update_clock(reading);
    }
    fn update_needs(&mut self, hunger: f32, energy: f32) {
        self.0.borrow_mut().update_needs(hunger, energy);
    }
    fn show_prompt(&mut self, prompt: Option<&Prompt>) {
        self.0.borrow_mut().show_prompt(prompt);
    }
    fn notify(&mut self, message: &str) {
        self.0.borrow_mut().notify(message);
    }
}

#[derive(Clone, Default)]
pub struct SharedDialogView(pub Rc<RefCell<HeadlessDialogView>>);

impl DialogView for SharedDialogView {
    fn show_page(&mut self, page: &DialogPage) {
        self.0.borrow_mut().show_page(page);
    }
    fn hide(&mut self) {
        self.0.borrow_mut().hide();
    }
}

/// An engine plus test-side handles to what it reports
pub struct Harness {
    pub engine: GameEngine,
    pub input: ScriptedInput,
    pub hud: SharedHud,
    pub view: SharedDialogView,
    pub storage: MemoryStorage,
}

impl Harness {
    pub fn new(catalog: Catalog) -> Self {
        Self::with_storage(catalog, MemoryStorage::new())
    }

    /// `storage` is shared: the engine writes through one clone and the
    /// test reads through the other
    pub fn with_storage(catalog: Catalog, storage: MemoryStorage) -> Self {
        let hud = SharedHud::default();
        let view = SharedDialogView::default();
        let engine = GameEngine::new(
            GameConfig::default(),
            catalog,
            Collaborators {
                stage: Box::new(HeadlessStage::new()),
                dialog_view: Box::new(view.clone()),
                hud: Box::new(hud.clone()),
                storage: Box::new(storage.clone()),
            },
            42,
        );
        Self {
            engine,
            input: ScriptedInput::default(),
            hud,
            view,
            storage,
        }
    }

    pub fn town() -> Self {
        Self::new(Catalog::town())
    }

    pub fn step(&mut self) {
        self.engine.update(FRAME_MS, &mut self.input);
    }

    pub fn steps(&mut self, frames: usize) {
        for _ in 0..frames {
            self.step();
        }
    }

    /// Step until `done` holds, failing the test after `max_frames`
    pub fn step_until(&mut self, max_frames: usize, mut done: impl FnMut(&GameEngine) -> bool) {
        for _ in 0..max_frames {
            if done(&self.engine) {
                return;
            }
            self.step();
        }
        assert!(done(&self.engine), "condition not reached in {max_frames} frames");
    }

    pub fn press_interact(&mut self) {
        self.input.interact = true;
        self.step();
    }

    pub fn press_advance(&mut self) {
        self.input.advance = true;
        self.step();
    }

    pub fn prompt_text(&self) -> Option<String> {
        self.hud.0.borrow().prompt.clone()
    }

    pub fn notifications(&self) -> Vec<String> {
        self.hud.0.borrow().notifications.clone()
    }
}
