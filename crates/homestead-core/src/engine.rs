//! Game engine - one play session and the per-frame driver

use hecs::Entity;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::catalog::Catalog;
use crate::components::*;
use crate::config::GameConfig;
use crate::headless::{HeadlessDialogView, HeadlessHud, HeadlessStage};
use crate::persistence::{MemoryStorage, PlayerSave, SaveData, SaveManager, SaveStorage};
use crate::stage::Stage;
use crate::systems::*;
use crate::traits::{DialogView, Hud, InputSource, Movable};

/// Message shown when a save does not go through
pub const SAVE_FAILED: &str = "Save Failed!";

/// The interaction currently on offer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    Talk { npc_name: String },
    Transition { label: String, key: String },
}

impl Prompt {
    pub fn text(&self) -> String {
        match self {
            Prompt::Talk { npc_name } => format!("Press E to talk to {}", npc_name),
            Prompt::Transition { label, key } => format!("[{}] {}", key, label),
        }
    }
}

/// Everything outside the core the engine talks to
pub struct Collaborators {
    pub stage: Box<dyn Stage>,
    pub dialog_view: Box<dyn DialogView>,
    pub hud: Box<dyn Hud>,
    pub storage: Box<dyn SaveStorage>,
}

impl Collaborators {
    /// Recording stage, HUD and dialog surface with an in-memory save slot
    pub fn headless() -> Self {
        Self {
            stage: Box::new(HeadlessStage::new()),
            dialog_view: Box::new(HeadlessDialogView::default()),
            hud: Box::new(HeadlessHud::default()),
            storage: Box::new(MemoryStorage::new()),
        }
    }
}

/// A game session
pub struct GameEngine {
    pub player: Player,
    pub needs: NeedsModel,
    pub clock: ClockModel,
    /// Loaded location, proximity and transitions
    pub location: LocationCore,
    pub dialog: DialogController,

    stage: Box<dyn Stage>,
    dialog_view: Box<dyn DialogView>,
    hud: Box<dyn Hud>,
    saves: SaveManager,

    config: GameConfig,
    rng: StdRng,
    /// NPC locked in the open conversation
    talking_to: Option<Entity>,
    prompt: Option<Prompt>,
    autosave_elapsed_ms: f32,
}

impl GameEngine {
    /// Create a session. Nothing is loaded until `new_game`,
    /// `continue_game` or `load_game`.
    pub fn new(
        config: GameConfig,
        catalog: Catalog,
        collaborators: Collaborators,
        seed: u64,
    ) -> Self {
        let Collaborators {
            stage,
            dialog_view,
            hud,
            storage,
        } = collaborators;

        Self {
            player: Player::new(Vec2::ZERO, config.world.player_speed, Appearance::default()),
            needs: NeedsModel::new(config.needs),
            clock: ClockModel::new(config.clock),
            location: LocationCore::new(catalog, &config.world),
            dialog: DialogController::new(),
            stage,
            dialog_view,
            hud,
            saves: SaveManager::new(storage),
            config,
            rng: StdRng::seed_from_u64(seed),
            talking_to: None,
            prompt: None,
            autosave_elapsed_ms: 0.0,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    /// Id of the NPC in the open conversation
    pub fn talking_to(&self) -> Option<String> {
        let entity = self.talking_to?;
        self.location.npc(entity).map(|npc| npc.id.clone())
    }

    // ------------------------------------------------------------------
    // Session lifecycle
    // ------------------------------------------------------------------

    /// Fresh needs and clock, player at the start location's spawn point
    pub fn new_game(&mut self) -> bool {
        if self.location.is_transitioning() {
            warn!("Cannot start a new game during a transition");
            return false;
        }
        let start = self.config.world.start_location.clone();
        let Some(spawn) = self.location.load_location(&start, None, self.stage.as_mut()) else {
            return false;
        };

        self.reset_session();
        self.needs = NeedsModel::new(self.config.needs);
        self.clock = ClockModel::new(self.config.clock);
        self.place_player(spawn);
        info!("New game at '{}'", start);
        true
    }

    /// Resume from storage, or start a new game when there is no usable save
    pub fn continue_game(&mut self) -> bool {
        if let Some(data) = self.saves.load() {
            if self.load_game(data) {
                return true;
            }
            warn!("Saved game could not be restored, starting a new one");
        }
        self.new_game()
    }

    /// Restore a session from save data. Out-of-range values are clamped.
    ///
    /// Returns false without touching the session if the saved location is
    /// unknown or a transition is running.
    pub fn load_game(&mut self, data: SaveData) -> bool {
        if self.location.is_transitioning() {
            warn!("Cannot load a game during a transition");
            return false;
        }
        let saved_at = Vec2::new(data.player.x, data.player.y);
        let Some(spawn) = self.location.load_location(
            &data.current_location_id,
            Some(saved_at),
            self.stage.as_mut(),
        ) else {
            return false;
        };

        self.reset_session();
        self.player.appearance = data.player.appearance.masked();

        self.needs = NeedsModel::new(self.config.needs);
        if let Some(snapshot) = data.needs {
            self.needs.restore(snapshot, &mut self.player);
        }
        self.clock = ClockModel::new(self.config.clock);
        if let Some(snapshot) = data.time {
            self.clock.restore(snapshot);
        }

        self.place_player(spawn);
        info!(
            "Loaded game at '{}' ({:.0}, {:.0})",
            data.current_location_id, self.player.position.x, self.player.position.y
        );
        true
    }

    pub fn save_data(&self) -> SaveData {
        SaveData {
            player: PlayerSave {
                x: self.player.position.x,
                y: self.player.position.y,
                appearance: self.player.appearance,
            },
            current_location_id: self
                .location
                .current_location_id()
                .unwrap_or(&self.config.world.start_location)
                .to_string(),
            needs: Some(self.needs.snapshot()),
            time: Some(self.clock.snapshot()),
        }
    }

    /// Save now. On failure the HUD shows "Save Failed!".
    pub fn save_game(&mut self) -> bool {
        let data = self.save_data();
        let saved = self.saves.save(&data);
        if !saved {
            self.hud.notify(SAVE_FAILED);
        }
        saved
    }

    /// Start a transition without a zone, e.g. from a map or debug command.
    /// Ignored while a dialog is open.
    pub fn request_transition(&mut self, location_id: &str, spawn: Option<Vec2>) -> TransitionRequest {
        if self.dialog.is_active() {
            debug!("Transition to '{}' ignored, dialog open", location_id);
            return TransitionRequest::Blocked;
        }
        let request = self
            .location
            .transition_to_location(location_id, spawn, self.stage.as_mut());
        if request == TransitionRequest::Started {
            self.player.stop();
            self.set_prompt(None);
        }
        request
    }

    fn reset_session(&mut self) {
        self.dialog.close(self.dialog_view.as_mut());
        self.talking_to = None;
        self.set_prompt(None);
        self.autosave_elapsed_ms = 0.0;
    }

    fn place_player(&mut self, at: Vec2) {
        let at = clamp_to_bounds(at, self.player.half_extents, &self.location.bounds());
        self.player.set_position(at);
        self.player.stop();
        self.location.create_obstacle_colliders(Some(&self.player));
        self.needs.apply_consequences(&mut self.player);
        self.refresh_hud();
    }

    // ------------------------------------------------------------------
    // Need events
    // ------------------------------------------------------------------

    pub fn eat(&mut self, amount: f32) {
        self.needs.add_hunger(amount);
        self.needs.apply_consequences(&mut self.player);
        self.refresh_hud();
    }

    /// Full energy, then wake on the next day at the day-start hour
    pub fn sleep(&mut self) {
        self.needs.add_energy(NEED_MAX);
        self.needs.apply_consequences(&mut self.player);
        let next_day = i64::from(self.clock.day()) + 1;
        self.clock
            .set_time(next_day, i64::from(self.config.clock.day_start_hour), 0);
        info!("Slept until {}", self.clock.reading().display());
        self.refresh_hud();
    }

    // ------------------------------------------------------------------
    // Frame
    // ------------------------------------------------------------------

    /// Advance the session by `delta_ms` of real time
    pub fn update(&mut self, delta_ms: f32, input: &mut dyn InputSource) {
        let delta_ms = if delta_ms.is_finite() {
            delta_ms.max(0.0)
        } else {
            0.0
        };

        self.needs.update(delta_ms);
        self.needs.apply_consequences(&mut self.player);
        self.clock.update(delta_ms);
        self.refresh_hud();

        match self
            .location
            .update(delta_ms, self.stage.as_mut(), &mut self.player)
        {
            Some(TransitionEvent::Arrived { location_id, .. }) => {
                let name = self
                    .location
                    .current_location()
                    .map_or(location_id.as_str(), |l| l.name.as_str());
                debug!("Arrived at {}, saving", name);
                self.save_game();
                self.autosave_elapsed_ms = 0.0;
            }
            Some(TransitionEvent::Completed) | None => {}
        }

        self.tick_autosave(delta_ms);

        // Dialog owns input while open; the closing frame is consumed too
        if let Some(DialogOutcome::Closed) = self.dialog.update(input, self.dialog_view.as_mut()) {
            self.end_conversation();
            return;
        }
        if self.dialog.is_active() {
            self.player.stop();
            return;
        }

        if self.location.is_transitioning() {
            self.player.stop();
            self.set_prompt(None);
            return;
        }

        self.move_player(delta_ms, input);
        self.location
            .update_npcs(delta_ms, &mut self.rng, self.stage.as_mut());
        self.update_interaction(input);
    }

    fn tick_autosave(&mut self, delta_ms: f32) {
        if self.location.is_transitioning() || self.location.current_location_id().is_none() {
            return;
        }
        self.autosave_elapsed_ms += delta_ms;
        if self.autosave_elapsed_ms >= self.config.world.autosave_interval_ms {
            self.autosave_elapsed_ms = 0.0;
            if !self.save_game() {
                warn!("Autosave failed");
            }
        }
    }

    fn move_player(&mut self, delta_ms: f32, input: &mut dyn InputSource) {
        let mut direction = input.movement().clamp_unit();
        if direction.length() > 1.0 {
            direction = direction.normalize();
        }

        self.player.velocity = direction * self.player.speed();
        if self.player.velocity.is_zero() {
            return;
        }
        let step = self.player.velocity * (delta_ms / 1000.0);
        self.player.position =
            self.location
                .resolve_player_move(self.player.position, step, self.player.half_extents);
    }

    /// NPCs first: a nearby NPC hides any transition prompt for the frame
    fn update_interaction(&mut self, input: &mut dyn InputSource) {
        let position = self.player.position;
        let radius = self.location.proximity_radius();

        if let Some(nearby) = self.location.check_npc_proximity(position, radius) {
            self.location.clear_active_zone();
            self.set_prompt(Some(Prompt::Talk {
                npc_name: nearby.name.clone(),
            }));
            if input.interact_pressed() {
                self.start_conversation(nearby.entity);
            }
            return;
        }

        let Some(zone) = self.location.update_active_zone(position).cloned() else {
            self.set_prompt(None);
            return;
        };
        self.set_prompt(Some(Prompt::Transition {
            label: zone.label.clone(),
            key: zone.key.clone(),
        }));
        if input.interact_pressed() {
            self.request_transition(&zone.to, Some(zone.spawn));
        }
    }

    fn start_conversation(&mut self, entity: Entity) {
        let Some((name, pages)) = self
            .location
            .npc(entity)
            .map(|npc| (npc.name.clone(), npc.dialog().to_vec()))
        else {
            return;
        };

        if self
            .dialog
            .show(&name, &pages, &mut self.player, self.dialog_view.as_mut())
        {
            if let Some(mut npc) = self.location.npc_mut(entity) {
                npc.start_interaction();
            }
            self.talking_to = Some(entity);
            self.set_prompt(None);
        }
    }

    fn end_conversation(&mut self) {
        if let Some(entity) = self.talking_to.take() {
            if let Some(mut npc) = self.location.npc_mut(entity) {
                npc.end_interaction();
            }
        }
    }

    fn set_prompt(&mut self, prompt: Option<Prompt>) {
        if self.prompt != prompt {
            self.hud.show_prompt(prompt.as_ref());
            self.prompt = prompt;
        }
    }

    fn refresh_hud(&mut self) {
        self.hud.update_clock(&self.clock.reading());
        self.hud.update_needs(self.needs.hunger(), self.needs.energy());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Pad {
        movement: Vec2,
        interact: bool,
        advance: bool,
    }

    impl InputSource for Pad {
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
            false
        }
    }

    fn engine() -> GameEngine {
        GameEngine::new(
            GameConfig::default(),
            Catalog::town(),
            Collaborators::headless(),
            7,
        )
    }

    #[test]
    fn test_new_game_loads_start_location() {
        let mut engine = engine();
        assert!(engine.new_game());
        assert_eq!(engine.location.current_location_id(), Some("home"));
        assert_eq!(engine.player.position, Vec2::new(400.0, 300.0));
        assert_eq!(engine.location.wired_collider_count(), 3);
    }

    #[test]
    fn test_continue_without_save_starts_new_game() {
        let mut engine = engine();
        assert!(engine.continue_game());
        assert_eq!(engine.location.current_location_id(), Some("home"));
    }

    #[test]
    fn test_prompt_text() {
        let talk = Prompt::Talk {
            npc_name: "Mia".into(),
        };
        assert_eq!(talk.text(), "Press E to talk to Mia");
        let go = Prompt::Transition {
            label: "Go outside".into(),
            key: "E".into(),
        };
        assert_eq!(go.text(), "[E] Go outside");
    }

    #[test]
    fn test_movement_uses_speed_and_delta() {
        let mut engine = engine();
        engine.new_game();
        let mut pad = Pad {
            movement: Vec2::new(0.0, 1.0),
            ..Pad::default()
        };
        engine.update(500.0, &mut pad);
        assert!((engine.player.position.y - 380.0).abs() < 0.01);
        assert_eq!(engine.player.position.x, 400.0);
    }

    #[test]
    fn test_diagonal_input_is_normalized() {
        let mut engine = engine();
        engine.new_game();
        let mut pad = Pad {
            movement: Vec2::new(1.0, 1.0),
            ..Pad::default()
        };
        engine.update(100.0, &mut pad);
        let moved = engine.player.position.distance(&Vec2::new(400.0, 300.0));
        assert!((moved - 16.0).abs() < 0.01);
    }

    #[test]
    fn test_hunger_slows_player() {
        let mut engine = engine();
        engine.new_game();
        engine.needs.remove_hunger(90.0);
        let mut pad = Pad::default();
        engine.update(16.0, &mut pad);
        assert!((engine.player.speed() - 160.0 * 0.7).abs() < 0.01);

        engine.eat(50.0);
        assert!((engine.player.speed() - 160.0).abs() < 0.01);
    }

    #[test]
    fn test_sleep_restores_energy_and_advances_day() {
        let mut engine = engine();
        engine.new_game();
        engine.needs.remove_energy(80.0);
        engine.sleep();
        assert_eq!(engine.needs.energy(), NEED_MAX);
        assert_eq!(engine.clock.day(), 2);
        assert_eq!((engine.clock.hour(), engine.clock.minute()), (6, 0));
    }

    #[test]
    fn test_save_failure_is_not_fatal() {
        let mut engine = GameEngine::new(
            GameConfig::default(),
            Catalog::town(),
            Collaborators {
                storage: Box::new(MemoryStorage::failing()),
                ..Collaborators::headless()
            },
            7,
        );
        engine.new_game();
        assert!(!engine.save_game());
        let mut pad = Pad::default();
        engine.update(16.0, &mut pad);
        assert_eq!(engine.location.current_location_id(), Some("home"));
    }

    #[test]
    fn test_load_rejects_unknown_location() {
        let mut engine = engine();
        engine.new_game();
        let mut data = engine.save_data();
        data.current_location_id = "moon".into();
        assert!(!engine.load_game(data));
        assert_eq!(engine.location.current_location_id(), Some("home"));
    }

    #[test]
    fn test_zone_prompt_and_transition() {
        let mut engine = engine();
        engine.new_game();
        engine.player.position = Vec2::new(720.0, 300.0);
        let mut pad = Pad::default();
        engine.update(16.0, &mut pad);
        assert_eq!(
            engine.prompt(),
            Some(&Prompt::Transition {
                label: "Go outside".into(),
                key: "E".into(),
            })
        );

        pad.interact = true;
        engine.update(16.0, &mut pad);
        assert!(engine.location.is_transitioning());
        assert_eq!(engine.prompt(), None);

        for _ in 0..60 {
            engine.update(16.0, &mut pad);
        }
        assert!(!engine.location.is_transitioning());
        assert_eq!(engine.location.current_location_id(), Some("street"));
        assert_eq!(engine.player.position, Vec2::new(150.0, 400.0));
    }
}
