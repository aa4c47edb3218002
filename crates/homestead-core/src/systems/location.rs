//! Location core - owns the loaded location, answers proximity queries and
//! runs the fade-out / reload / fade-in transition sequence.
//!
//! The live world is a `hecs::World` holding one entity per obstacle,
//! transition zone, NPC and background. Every one of them is tagged with
//! `LocationMember`; loading a location always despawns all members (and
//! releases their stage visuals) before building the new set, including
//! when the same location is loaded again.
//!
//! Transition phases:
//!
//! ```text
//! Idle -> FadingOut -> Loading -> FadingIn -> Idle
//! ```
//!
//! `FadingOut` and `FadingIn` last `fade_ms` each. `Loading` is the frame
//! after the fade-out finishes; the reload happens then, in one step.

use hecs::{Entity, EntityBuilder, World};
use log::{debug, error, info};
use rand::Rng;

use super::movement::slide_move;
use super::npc::NpcAgent;
use crate::catalog::{Catalog, Location, ObstacleKind};
use crate::components::{
    Background, Collider, LocationMember, Obstacle, Rect, TransitionZone, Vec2, Visuals,
};
use crate::config::WorldConfig;
use crate::stage::{depth, Fade, Stage, Visual};
use crate::traits::{Movable, ProximityQueryable};

/// Default interaction distance for NPCs and transition zones
pub const PROXIMITY_RADIUS: f32 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPhase {
    Idle,
    FadingOut,
    Loading,
    FadingIn,
}

/// Answer to a transition request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionRequest {
    Started,
    /// A transition is already running; the request was dropped
    AlreadyTransitioning,
    /// Target id is not in the catalog; nothing started
    UnknownLocation,
    /// Input is held by an open dialog; nothing started
    Blocked,
}

/// Emitted by `LocationCore::update`
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionEvent {
    /// The new location is loaded and the player placed at `spawn`
    Arrived { location_id: String, spawn: Vec2 },
    /// Fade-in finished; input may resume
    Completed,
}

#[derive(Debug, Clone)]
enum TransitionState {
    Idle,
    FadingOut {
        remaining_ms: f32,
        target: String,
        spawn: Option<Vec2>,
    },
    Loading {
        target: String,
        spawn: Option<Vec2>,
    },
    FadingIn {
        remaining_ms: f32,
    },
}

/// An NPC within interaction distance
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyNpc {
    pub entity: Entity,
    pub id: String,
    pub name: String,
    pub distance: f32,
}

pub struct LocationCore {
    world: World,
    catalog: Catalog,
    current: Option<String>,
    bounds: Rect,
    active_zone: Option<TransitionZone>,
    state: TransitionState,
    proximity_radius: f32,
    fade_ms: f32,
}

impl LocationCore {
    pub fn new(catalog: Catalog, config: &WorldConfig) -> Self {
        Self {
            world: World::new(),
            catalog,
            current: None,
            bounds: Rect::default(),
            active_zone: None,
            state: TransitionState::Idle,
            proximity_radius: config.proximity_radius,
            fade_ms: config.fade_ms,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn current_location_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn current_location(&self) -> Option<&Location> {
        self.current
            .as_deref()
            .and_then(|id| self.catalog.location(id))
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn proximity_radius(&self) -> f32 {
        self.proximity_radius
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Tear down the current location and build `location_id`.
    ///
    /// Returns the spawn point (`spawn_override` or the location default),
    /// or `None` after logging if the id is unknown. Colliders come up
    /// unwired; call `create_obstacle_colliders` once the player exists.
    pub fn load_location(
        &mut self,
        location_id: &str,
        spawn_override: Option<Vec2>,
        stage: &mut dyn Stage,
    ) -> Option<Vec2> {
        let Some(location) = self.catalog.location(location_id).cloned() else {
            error!("Cannot load unknown location '{}'", location_id);
            return None;
        };

        self.unload(stage);

        stage.set_world_bounds(location.width, location.height);
        self.bounds = Rect::new(0.0, 0.0, location.width, location.height);

        let background = stage.spawn_visual(Visual::Background {
            width: location.width,
            height: location.height,
            color: location.background,
        });
        self.world
            .spawn((LocationMember, Background, Visuals(vec![background])));

        for def in &location.obstacles {
            let rect = def.rect();
            let mut visuals = vec![stage.spawn_visual(Visual::Rect {
                rect,
                color: def.color,
                depth: depth::OBSTACLE,
            })];
            if let Some(name) = &def.name {
                visuals.push(stage.spawn_visual(Visual::Label {
                    text: name.clone(),
                    at: rect.center(),
                    depth: depth::LABEL,
                }));
            }

            let mut builder = EntityBuilder::new();
            builder.add(LocationMember).add(Obstacle {
                rect,
                color: def.color,
                name: def.name.clone(),
            });
            if def.kind == ObstacleKind::Solid {
                builder.add(Collider { rect, wired: false });
            }
            builder.add(Visuals(visuals));
            self.world.spawn(builder.build());
        }

        for def in &location.transitions {
            let zone = TransitionZone {
                rect: def.rect(),
                to: def.to.clone(),
                spawn: def.spawn,
                label: def.label.clone(),
                key: def.key.clone(),
            };
            let visuals = vec![
                stage.spawn_visual(Visual::Rect {
                    rect: zone.rect,
                    color: 0xFFD700,
                    depth: depth::ZONE,
                }),
                stage.spawn_visual(Visual::Label {
                    text: zone.label.clone(),
                    at: Vec2::new(zone.rect.center().x, zone.rect.min_y() - 12.0),
                    depth: depth::LABEL,
                }),
            ];
            self.world.spawn((LocationMember, zone, Visuals(visuals)));
        }

        for placement in self.catalog.npcs_in(location_id) {
            let agent = NpcAgent::from_placement(placement);
            let sprite = stage.spawn_visual(Visual::Sprite {
                appearance: agent.appearance,
                at: agent.position,
                depth: depth::ACTOR,
            });
            self.world.spawn((LocationMember, agent, Visuals(vec![sprite])));
        }

        self.current = Some(location.id.clone());
        self.active_zone = None;

        info!(
            "Loaded location '{}' ({} obstacles, {} zones, {} NPCs)",
            location.id,
            self.obstacle_count(),
            self.zone_count(),
            self.npc_count()
        );

        Some(spawn_override.unwrap_or(location.spawn))
    }

    /// Despawn every member entity and release its visuals
    fn unload(&mut self, stage: &mut dyn Stage) {
        let members: Vec<Entity> = self
            .world
            .query::<&LocationMember>()
            .iter()
            .map(|(entity, _)| entity)
            .collect();

        for entity in members {
            if let Ok(Visuals(handles)) = self.world.remove_one::<Visuals>(entity) {
                for handle in handles {
                    stage.despawn_visual(handle);
                }
            }
            let _ = self.world.despawn(entity);
        }

        if let Some(id) = self.current.take() {
            debug!("Unloaded location '{}'", id);
        }
        self.active_zone = None;
    }

    /// Make solid obstacles block the player. Call after the player body
    /// exists; without one this logs and does nothing.
    pub fn create_obstacle_colliders(&mut self, player: Option<&dyn Movable>) -> usize {
        let Some(player) = player else {
            error!("Cannot wire obstacle colliders without a player");
            return 0;
        };

        let mut wired = 0;
        for (_, collider) in self.world.query_mut::<&mut Collider>() {
            collider.wired = true;
            wired += 1;
        }
        let at = player.position();
        debug!(
            "Wired {} colliders against player at ({:.0}, {:.0})",
            wired, at.x, at.y
        );
        wired
    }

    /// Where a player box of `half` extents ends up after trying to move
    /// by `delta` from `from`
    pub fn resolve_player_move(&self, from: Vec2, delta: Vec2, half: Vec2) -> Vec2 {
        let colliders: Vec<Rect> = self
            .world
            .query::<&Collider>()
            .iter()
            .filter(|(_, c)| c.wired)
            .map(|(_, c)| c.rect)
            .collect();
        slide_move(from, delta, half, &self.bounds, &colliders)
    }

    // ------------------------------------------------------------------
    // Proximity
    // ------------------------------------------------------------------

    /// Nearest transition zone whose center is within the proximity radius.
    /// Overlapping candidates resolve to the closest center.
    pub fn check_transition_proximity(&self, position: Vec2) -> Option<TransitionZone> {
        let radius = self.proximity_radius;
        self.world
            .query::<&TransitionZone>()
            .iter()
            .filter(|(_, zone)| zone.is_near_position(position, radius))
            .map(|(_, zone)| (zone.position().distance(&position), zone))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, zone)| zone.clone())
    }

    /// Closest spawned NPC within `radius`
    pub fn check_npc_proximity(&self, position: Vec2, radius: f32) -> Option<NearbyNpc> {
        self.world
            .query::<&NpcAgent>()
            .iter()
            .filter(|(_, npc)| npc.is_near_position(position, radius))
            .map(|(entity, npc)| NearbyNpc {
                entity,
                id: npc.id.clone(),
                name: npc.name.clone(),
                distance: npc.position.distance(&position),
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Re-evaluate the zone the player could use from `position`
    pub fn update_active_zone(&mut self, position: Vec2) -> Option<&TransitionZone> {
        self.active_zone = self.check_transition_proximity(position);
        self.active_zone.as_ref()
    }

    pub fn clear_active_zone(&mut self) {
        self.active_zone = None;
    }

    pub fn active_zone(&self) -> Option<&TransitionZone> {
        self.active_zone.as_ref()
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    pub fn is_transitioning(&self) -> bool {
        !matches!(self.state, TransitionState::Idle)
    }

    pub fn phase(&self) -> TransitionPhase {
        match self.state {
            TransitionState::Idle => TransitionPhase::Idle,
            TransitionState::FadingOut { .. } => TransitionPhase::FadingOut,
            TransitionState::Loading { .. } => TransitionPhase::Loading,
            TransitionState::FadingIn { .. } => TransitionPhase::FadingIn,
        }
    }

    /// Start fading out toward `location_id`.
    ///
    /// Dropped while another transition runs. Unknown ids are rejected
    /// here, before any fade starts.
    pub fn transition_to_location(
        &mut self,
        location_id: &str,
        spawn: Option<Vec2>,
        stage: &mut dyn Stage,
    ) -> TransitionRequest {
        if self.is_transitioning() {
            debug!("Transition to '{}' ignored, already transitioning", location_id);
            return TransitionRequest::AlreadyTransitioning;
        }
        if !self.catalog.contains(location_id) {
            error!("Refusing transition to unknown location '{}'", location_id);
            return TransitionRequest::UnknownLocation;
        }

        info!(
            "Transition {} -> {}",
            self.current.as_deref().unwrap_or("<none>"),
            location_id
        );
        self.active_zone = None;
        self.state = TransitionState::FadingOut {
            remaining_ms: self.fade_ms,
            target: location_id.to_string(),
            spawn,
        };
        stage.start_fade(Fade::Out, self.fade_ms);
        TransitionRequest::Started
    }

    /// Advance the transition timers by `delta_ms`
    pub fn update(
        &mut self,
        delta_ms: f32,
        stage: &mut dyn Stage,
        player: &mut dyn Movable,
    ) -> Option<TransitionEvent> {
        let (next, event) = match std::mem::replace(&mut self.state, TransitionState::Idle) {
            TransitionState::Idle => (TransitionState::Idle, None),
            TransitionState::FadingOut {
                remaining_ms,
                target,
                spawn,
            } => {
                let remaining_ms = remaining_ms - delta_ms;
                if remaining_ms <= 0.0 {
                    (TransitionState::Loading { target, spawn }, None)
                } else {
                    let state = TransitionState::FadingOut {
                        remaining_ms,
                        target,
                        spawn,
                    };
                    (state, None)
                }
            }
            TransitionState::Loading { target, spawn } => {
                let event = self.arrive(&target, spawn, stage, player);
                stage.start_fade(Fade::In, self.fade_ms);
                let state = TransitionState::FadingIn {
                    remaining_ms: self.fade_ms,
                };
                (state, event)
            }
            TransitionState::FadingIn { remaining_ms } => {
                let remaining_ms = remaining_ms - delta_ms;
                if remaining_ms <= 0.0 {
                    debug!("Transition complete");
                    (TransitionState::Idle, Some(TransitionEvent::Completed))
                } else {
                    (TransitionState::FadingIn { remaining_ms }, None)
                }
            }
        };
        self.state = next;
        event
    }

    fn arrive(
        &mut self,
        target: &str,
        spawn: Option<Vec2>,
        stage: &mut dyn Stage,
        player: &mut dyn Movable,
    ) -> Option<TransitionEvent> {
        let spawn = self.load_location(target, spawn, stage)?;
        player.set_position(spawn);
        player.stop();
        self.create_obstacle_colliders(Some(&*player));
        Some(TransitionEvent::Arrived {
            location_id: target.to_string(),
            spawn,
        })
    }

    // ------------------------------------------------------------------
    // NPCs
    // ------------------------------------------------------------------

    /// Run every NPC's behavior, keep it inside the location, and move its
    /// sprite
    pub fn update_npcs(&mut self, delta_ms: f32, rng: &mut impl Rng, stage: &mut dyn Stage) {
        let bounds = self.bounds;
        for (_, (npc, visuals)) in self.world.query_mut::<(&mut NpcAgent, &Visuals)>() {
            npc.update(delta_ms, rng);
            npc.position = Vec2::new(
                npc.position.x.clamp(bounds.min_x(), bounds.max_x()),
                npc.position.y.clamp(bounds.min_y(), bounds.max_y()),
            );
            if let Some(&sprite) = visuals.0.first() {
                stage.move_visual(sprite, npc.position);
            }
        }
    }

    pub fn npc(&self, entity: Entity) -> Option<hecs::Ref<'_, NpcAgent>> {
        self.world.get::<&NpcAgent>(entity).ok()
    }

    pub fn npc_mut(&mut self, entity: Entity) -> Option<hecs::RefMut<'_, NpcAgent>> {
        self.world.get::<&mut NpcAgent>(entity).ok()
    }

    /// Id and position of every spawned NPC
    pub fn npc_positions(&self) -> Vec<(String, Vec2)> {
        self.world
            .query::<&NpcAgent>()
            .iter()
            .map(|(_, npc)| (npc.id.clone(), npc.position))
            .collect()
    }

    // ------------------------------------------------------------------
    // Counts
    // ------------------------------------------------------------------

    pub fn member_count(&self) -> usize {
        self.world.query::<&LocationMember>().iter().count()
    }

    pub fn obstacle_count(&self) -> usize {
        self.world.query::<&Obstacle>().iter().count()
    }

    pub fn collider_count(&self) -> usize {
        self.world.query::<&Collider>().iter().count()
    }

    pub fn wired_collider_count(&self) -> usize {
        self.world
            .query::<&Collider>()
            .iter()
            .filter(|(_, c)| c.wired)
            .count()
    }

    pub fn zone_count(&self) -> usize {
        self.world.query::<&TransitionZone>().iter().count()
    }

    pub fn npc_count(&self) -> usize {
        self.world.query::<&NpcAgent>().iter().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BehaviorDef, NpcPlacement, ObstacleDef, TransitionDef};
    use crate::components::{Appearance, Player};
    use crate::headless::HeadlessStage;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn core() -> LocationCore {
        LocationCore::new(Catalog::town(), &WorldConfig::default())
    }

    fn player_at(x: f32, y: f32) -> Player {
        Player::new(Vec2::new(x, y), 160.0, Appearance::default())
    }

    /// Run the transition until it settles, returning every event
    fn settle(
        core: &mut LocationCore,
        stage: &mut HeadlessStage,
        player: &mut Player,
    ) -> Vec<TransitionEvent> {
        let mut events = Vec::new();
        for _ in 0..200 {
            if let Some(e) = core.update(16.0, stage, player) {
                events.push(e);
            }
            if !core.is_transitioning() {
                break;
            }
        }
        events
    }

    #[test]
    fn test_load_unknown_location_is_none() {
        let mut core = core();
        let mut stage = HeadlessStage::new();
        assert_eq!(core.load_location("moon", None, &mut stage), None);
        assert_eq!(core.current_location_id(), None);
        assert_eq!(stage.live_count(), 0);
    }

    #[test]
    fn test_load_builds_location() {
        let mut core = core();
        let mut stage = HeadlessStage::new();
        let spawn = core.load_location("park", None, &mut stage).unwrap();
        assert_eq!(spawn, Vec2::new(600.0, 650.0));
        assert_eq!(core.current_location_id(), Some("park"));
        assert_eq!(stage.bounds, (1200.0, 800.0));
        assert_eq!(core.obstacle_count(), 5);
        assert_eq!(core.collider_count(), 4, "label obstacles have no body");
        assert_eq!(core.zone_count(), 1);
        assert_eq!(core.npc_count(), 2);
        assert_eq!(core.wired_collider_count(), 0);
    }

    #[test]
    fn test_spawn_override_wins() {
        let mut core = core();
        let mut stage = HeadlessStage::new();
        let spawn = core.load_location("home", Some(Vec2::new(10.0, 20.0)), &mut stage);
        assert_eq!(spawn, Some(Vec2::new(10.0, 20.0)));
    }

    #[test]
    fn test_reload_same_location_does_not_duplicate() {
        let mut fresh = core();
        let mut fresh_stage = HeadlessStage::new();
        fresh.load_location("street", None, &mut fresh_stage);

        let mut core = core();
        let mut stage = HeadlessStage::new();
        core.load_location("street", None, &mut stage);
        core.load_location("street", None, &mut stage);
        assert_eq!(core.current_location().map(|l| l.name.as_str()), Some("Main Street"));

        assert_eq!(core.member_count(), fresh.member_count());
        assert_eq!(core.obstacle_count(), fresh.obstacle_count());
        assert_eq!(core.npc_count(), fresh.npc_count());
        assert_eq!(stage.live_count(), fresh_stage.live_count());
        assert_eq!(stage.stale_despawns, 0);
    }

    #[test]
    fn test_switching_location_releases_every_visual() {
        let mut core = core();
        let mut stage = HeadlessStage::new();
        core.load_location("park", None, &mut stage);
        let park_visuals = stage.live_count();
        core.load_location("cafe", None, &mut stage);

        assert_eq!(stage.despawned_total, park_visuals);
        assert_eq!(stage.spawned_total, park_visuals + stage.live_count());
        assert_eq!(core.npc_count(), 1);
    }

    #[test]
    fn test_colliders_need_a_player() {
        let mut core = core();
        let mut stage = HeadlessStage::new();
        core.load_location("home", None, &mut stage);
        assert_eq!(core.create_obstacle_colliders(None), 0);
        assert_eq!(core.wired_collider_count(), 0);

        let player = player_at(400.0, 300.0);
        assert_eq!(core.create_obstacle_colliders(Some(&player)), 3);
        assert_eq!(core.wired_collider_count(), 3);
    }

    #[test]
    fn test_unwired_obstacles_do_not_block() {
        let mut core = core();
        let mut stage = HeadlessStage::new();
        core.load_location("home", None, &mut stage);
        let half = Vec2::new(12.0, 16.0);
        // Walk up into the table (300..400, 120..180)
        let from = Vec2::new(350.0, 200.0);
        let free = core.resolve_player_move(from, Vec2::new(0.0, -20.0), half);
        assert_eq!(free, Vec2::new(350.0, 180.0));

        core.create_obstacle_colliders(Some(&player_at(350.0, 200.0)));
        let blocked = core.resolve_player_move(from, Vec2::new(0.0, -20.0), half);
        assert_eq!(blocked, from);
    }

    #[test]
    fn test_transition_proximity_radius() {
        let mut core = core();
        let mut stage = HeadlessStage::new();
        core.load_location("home", None, &mut stage);
        let center = Vec2::new(750.0, 300.0);

        let inside = core.check_transition_proximity(Vec2::new(center.x - 59.9, center.y));
        assert_eq!(inside.map(|z| z.to), Some("street".to_string()));
        assert!(core
            .check_transition_proximity(Vec2::new(center.x - 60.1, center.y))
            .is_none());
        assert!(core
            .check_transition_proximity(Vec2::new(center.x, center.y + 59.9))
            .is_some());
    }

    #[test]
    fn test_overlapping_zones_pick_nearest() {
        let mut home = Catalog::town().location("home").unwrap().clone();
        home.transitions = vec![
            TransitionDef {
                x: 100.0,
                y: 100.0,
                width: 20.0,
                height: 20.0,
                to: "park".into(),
                spawn: Vec2::ZERO,
                label: "Park".into(),
                key: "E".into(),
            },
            TransitionDef {
                x: 160.0,
                y: 100.0,
                width: 20.0,
                height: 20.0,
                to: "cafe".into(),
                spawn: Vec2::ZERO,
                label: "Cafe".into(),
                key: "E".into(),
            },
        ];
        let others: Vec<Location> = Catalog::town()
            .locations()
            .iter()
            .filter(|l| l.id != "home")
            .cloned()
            .collect();
        let mut locations = vec![home];
        locations.extend(others);
        let catalog = Catalog::new(locations, Vec::new()).unwrap();

        let mut core = LocationCore::new(catalog, &WorldConfig::default());
        let mut stage = HeadlessStage::new();
        core.load_location("home", None, &mut stage);

        let near_cafe = core.check_transition_proximity(Vec2::new(155.0, 110.0));
        assert_eq!(near_cafe.map(|z| z.to), Some("cafe".to_string()));
        let near_park = core.check_transition_proximity(Vec2::new(125.0, 110.0));
        assert_eq!(near_park.map(|z| z.to), Some("park".to_string()));
    }

    #[test]
    fn test_npc_proximity_picks_closest() {
        let npc = |id: &str, x: f32| NpcPlacement {
            id: id.into(),
            name: id.to_uppercase(),
            appearance: Appearance::default(),
            location: "home".into(),
            position: Vec2::new(x, 300.0),
            behavior: BehaviorDef::Idle,
            dialog: vec!["hi".into()],
        };
        let catalog = Catalog::new(
            Catalog::town().locations().to_vec(),
            vec![npc("far", 340.0), npc("near", 420.0), npc("out", 600.0)],
        )
        .unwrap();
        let mut core = LocationCore::new(catalog, &WorldConfig::default());
        let mut stage = HeadlessStage::new();
        core.load_location("home", None, &mut stage);

        let hit = core.check_npc_proximity(Vec2::new(400.0, 300.0), 60.0).unwrap();
        assert_eq!(hit.id, "near");
        assert!((hit.distance - 20.0).abs() < 0.001);
        assert!(core.check_npc_proximity(Vec2::new(100.0, 500.0), 60.0).is_none());
    }

    #[test]
    fn test_transition_runs_through_phases() {
        let mut core = core();
        let mut stage = HeadlessStage::new();
        let mut player = player_at(720.0, 300.0);
        core.load_location("home", None, &mut stage);

        assert_eq!(
            core.transition_to_location("street", Some(Vec2::new(150.0, 400.0)), &mut stage),
            TransitionRequest::Started
        );
        assert_eq!(core.phase(), TransitionPhase::FadingOut);
        assert!(core.is_transitioning());

        assert_eq!(core.update(200.0, &mut stage, &mut player), None);
        assert_eq!(core.phase(), TransitionPhase::FadingOut);
        assert_eq!(core.update(100.0, &mut stage, &mut player), None);
        assert_eq!(core.phase(), TransitionPhase::Loading);
        assert_eq!(core.current_location_id(), Some("home"));

        let arrived = core.update(16.0, &mut stage, &mut player);
        assert_eq!(
            arrived,
            Some(TransitionEvent::Arrived {
                location_id: "street".into(),
                spawn: Vec2::new(150.0, 400.0),
            })
        );
        assert_eq!(core.phase(), TransitionPhase::FadingIn);
        assert_eq!(core.current_location_id(), Some("street"));
        assert_eq!(player.position, Vec2::new(150.0, 400.0));
        assert_eq!(core.wired_collider_count(), core.collider_count());

        assert_eq!(core.update(299.0, &mut stage, &mut player), None);
        assert_eq!(
            core.update(1.0, &mut stage, &mut player),
            Some(TransitionEvent::Completed)
        );
        assert!(!core.is_transitioning());
        assert_eq!(stage.fades, vec![(Fade::Out, 300.0), (Fade::In, 300.0)]);
    }

    #[test]
    fn test_second_request_while_transitioning_is_dropped() {
        let mut core = core();
        let mut stage = HeadlessStage::new();
        let mut player = player_at(400.0, 300.0);
        core.load_location("home", None, &mut stage);

        core.transition_to_location("street", None, &mut stage);
        assert_eq!(
            core.transition_to_location("park", None, &mut stage),
            TransitionRequest::AlreadyTransitioning
        );
        settle(&mut core, &mut stage, &mut player);
        assert_eq!(core.current_location_id(), Some("street"));
        assert_eq!(stage.fades.len(), 2);
    }

    #[test]
    fn test_unknown_target_never_starts_fading() {
        let mut core = core();
        let mut stage = HeadlessStage::new();
        core.load_location("home", None, &mut stage);
        assert_eq!(
            core.transition_to_location("moon", None, &mut stage),
            TransitionRequest::UnknownLocation
        );
        assert!(!core.is_transitioning());
        assert!(stage.fades.is_empty());
    }

    #[test]
    fn test_self_transition_rebuilds_cleanly() {
        let mut core = core();
        let mut stage = HeadlessStage::new();
        let mut player = player_at(400.0, 300.0);
        core.load_location("park", None, &mut stage);
        let members = core.member_count();
        let live = stage.live_count();

        core.transition_to_location("park", None, &mut stage);
        let events = settle(&mut core, &mut stage, &mut player);

        assert_eq!(events.len(), 2);
        assert_eq!(core.member_count(), members);
        assert_eq!(stage.live_count(), live);
        assert_eq!(player.position, Vec2::new(600.0, 650.0));
    }

    #[test]
    fn test_npcs_stay_inside_location() {
        let mut core = core();
        let mut stage = HeadlessStage::new();
        let mut rng = StdRng::seed_from_u64(11);
        core.load_location("street", None, &mut stage);
        for _ in 0..5_000 {
            core.update_npcs(50.0, &mut rng, &mut stage);
        }
        let bounds = core.bounds();
        for (id, pos) in core.npc_positions() {
            assert!(bounds.contains(pos), "{id} escaped to {pos:?}");
        }
    }

    #[test]
    fn test_label_obstacle_only_location() {
        let location = Location {
            id: "field".into(),
            name: "Field".into(),
            width: 300.0,
            height: 300.0,
            spawn: Vec2::new(150.0, 150.0),
            background: 0,
            obstacles: vec![ObstacleDef {
                x: 10.0,
                y: 10.0,
                width: 50.0,
                height: 20.0,
                color: 0,
                name: Some("Sign".into()),
                kind: ObstacleKind::Label,
            }],
            transitions: Vec::new(),
        };
        let catalog = Catalog::new(vec![location], Vec::new()).unwrap();
        let mut core = LocationCore::new(catalog, &WorldConfig::default());
        let mut stage = HeadlessStage::new();
        core.load_location("field", None, &mut stage);
        assert_eq!(core.obstacle_count(), 1);
        assert_eq!(
            core.create_obstacle_colliders(Some(&player_at(150.0, 150.0))),
            0
        );
    }
}
