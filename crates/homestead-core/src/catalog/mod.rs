//! World catalog - static registry of locations and NPC placements.
//!
//! A catalog is validated once when it is built; after that every lookup is
//! a plain query by id. The built-in town lives in [`town`].

mod town;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::{Appearance, Rect, Vec2};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate location id: {0}")]
    DuplicateLocation(String),

    #[error("duplicate npc id: {0}")]
    DuplicateNpc(String),

    #[error("transition in '{from}' targets unknown location '{to}'")]
    UnknownTransitionTarget { from: String, to: String },

    #[error("npc '{npc}' placed in unknown location '{location}'")]
    UnknownNpcLocation { npc: String, location: String },

    #[error("npc '{0}' wanders with a non-positive direction interval")]
    InvalidWanderInterval(String),

    #[error("invalid catalog json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Whether an obstacle blocks movement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleKind {
    #[default]
    Solid,
    /// Decoration with a name tag and no collision body
    Label,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleDef {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub kind: ObstacleKind,
}

impl ObstacleDef {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionDef {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Target location id
    pub to: String,
    /// Where the player appears in the target location
    pub spawn: Vec2,
    pub label: String,
    pub key: String,
}

impl TransitionDef {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub width: f32,
    pub height: f32,
    pub spawn: Vec2,
    #[serde(default)]
    pub background: u32,
    #[serde(default)]
    pub obstacles: Vec<ObstacleDef>,
    #[serde(default)]
    pub transitions: Vec<TransitionDef>,
}

/// How a placed NPC moves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BehaviorDef {
    Idle,
    Wander {
        speed: f32,
        interval_ms: f32,
        #[serde(default)]
        bounds: Option<Rect>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcPlacement {
    pub id: String,
    pub name: String,
    pub appearance: Appearance,
    pub location: String,
    pub position: Vec2,
    pub behavior: BehaviorDef,
    #[serde(default)]
    pub dialog: Vec<String>,
}

#[derive(Deserialize)]
struct CatalogFile {
    locations: Vec<Location>,
    #[serde(default)]
    npcs: Vec<NpcPlacement>,
}

/// Validated, immutable set of locations and NPC placements
#[derive(Debug, Clone)]
pub struct Catalog {
    locations: Vec<Location>,
    npcs: Vec<NpcPlacement>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build and validate a catalog
    pub fn new(locations: Vec<Location>, npcs: Vec<NpcPlacement>) -> Result<Self, CatalogError> {
        let mut index = HashMap::new();
        for (i, location) in locations.iter().enumerate() {
            if index.insert(location.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateLocation(location.id.clone()));
            }
        }

        for location in &locations {
            for transition in &location.transitions {
                if !index.contains_key(&transition.to) {
                    return Err(CatalogError::UnknownTransitionTarget {
                        from: location.id.clone(),
                        to: transition.to.clone(),
                    });
                }
            }
        }

        let mut npc_ids = HashSet::new();
        for npc in &npcs {
            if !npc_ids.insert(npc.id.as_str()) {
                return Err(CatalogError::DuplicateNpc(npc.id.clone()));
            }
            if !index.contains_key(&npc.location) {
                return Err(CatalogError::UnknownNpcLocation {
                    npc: npc.id.clone(),
                    location: npc.location.clone(),
                });
            }
            if let BehaviorDef::Wander { interval_ms, .. } = npc.behavior {
                if !(interval_ms > 0.0) {
                    return Err(CatalogError::InvalidWanderInterval(npc.id.clone()));
                }
            }
        }

        Ok(Self {
            locations,
            npcs,
            index,
        })
    }

    /// Parse `{ "locations": [...], "npcs": [...] }` and validate it
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.locations, file.npcs)
    }

    /// The built-in town: home, street, park and cafe
    pub fn town() -> Self {
        Self::new(town::locations(), town::npcs()).expect("built-in town catalog is valid")
    }

    pub fn location(&self, id: &str) -> Option<&Location> {
        self.index.get(id).map(|&i| &self.locations[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn npcs(&self) -> &[NpcPlacement] {
        &self.npcs
    }

    /// NPC placements belonging to a location, in catalog order
    pub fn npcs_in<'a>(&'a self, location_id: &'a str) -> impl Iterator<Item = &'a NpcPlacement> {
        self.npcs.iter().filter(move |n| n.location == location_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(id: &str, exits: &[&str]) -> Location {
        Location {
            id: id.to_string(),
            name: id.to_string(),
            width: 400.0,
            height: 300.0,
            spawn: Vec2::new(200.0, 150.0),
            background: 0,
            obstacles: Vec::new(),
            transitions: exits
                .iter()
                .map(|to| TransitionDef {
                    x: 0.0,
                    y: 0.0,
                    width: 20.0,
                    height: 20.0,
                    to: to.to_string(),
                    spawn: Vec2::new(50.0, 50.0),
                    label: format!("To {}", to),
                    key: "E".into(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_town_is_valid() {
        let town = Catalog::town();
        for id in ["home", "street", "park", "cafe"] {
            assert!(town.contains(id), "missing {id}");
        }
        assert!(town.npcs_in("park").count() >= 2);
    }

    #[test]
    fn test_every_town_transition_targets_existing_location() {
        let town = Catalog::town();
        for location in town.locations() {
            for t in &location.transitions {
                assert!(town.contains(&t.to), "{} -> {}", location.id, t.to);
            }
        }
    }

    #[test]
    fn test_town_spawns_are_outside_exit_radius() {
        // Arriving next to an exit would immediately offer to walk back out
        let town = Catalog::town();
        for location in town.locations() {
            for t in &location.transitions {
                let target = town.location(&t.to).unwrap();
                for exit in &target.transitions {
                    assert!(
                        exit.rect().center().distance(&t.spawn) >= 60.0,
                        "{} spawn {:?} sits on exit to {}",
                        target.id,
                        t.spawn,
                        exit.to
                    );
                }
            }
        }
    }

    #[test]
    fn test_rejects_unknown_transition_target() {
        let err = Catalog::new(vec![room("a", &["nowhere"])], Vec::new());
        assert!(matches!(
            err,
            Err(CatalogError::UnknownTransitionTarget { ref to, .. }) if to == "nowhere"
        ));
    }

    #[test]
    fn test_rejects_duplicate_location() {
        let err = Catalog::new(vec![room("a", &[]), room("a", &[])], Vec::new());
        assert!(matches!(err, Err(CatalogError::DuplicateLocation(_))));
    }

    #[test]
    fn test_rejects_npc_in_unknown_location() {
        let npc = NpcPlacement {
            id: "bob".into(),
            name: "Bob".into(),
            appearance: Appearance::default(),
            location: "attic".into(),
            position: Vec2::ZERO,
            behavior: BehaviorDef::Idle,
            dialog: vec!["Hi".into()],
        };
        let err = Catalog::new(vec![room("a", &[])], vec![npc]);
        assert!(matches!(err, Err(CatalogError::UnknownNpcLocation { .. })));
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "locations": [
                { "id": "a", "name": "A", "width": 100, "height": 100,
                  "spawn": { "x": 50, "y": 50 },
                  "obstacles": [ { "x": 0, "y": 0, "width": 10, "height": 10,
                                   "color": 255, "name": "Sign", "kind": "label" } ],
                  "transitions": [ { "x": 90, "y": 40, "width": 10, "height": 20,
                                     "to": "a", "spawn": { "x": 10, "y": 50 },
                                     "label": "Loop", "key": "E" } ] }
            ],
            "npcs": [
                { "id": "w", "name": "W", "location": "a",
                  "appearance": { "skinTone": 1, "hairColor": 2, "shirtColor": 3, "pantsColor": 4 },
                  "position": { "x": 20, "y": 20 },
                  "behavior": { "type": "wander", "speed": 30, "interval_ms": 1500 },
                  "dialog": ["Hello"] }
            ]
        }"#;
        let catalog = Catalog::from_json_str(json).unwrap();
        let a = catalog.location("a").unwrap();
        assert_eq!(a.obstacles[0].kind, ObstacleKind::Label);
        assert!(matches!(
            catalog.npcs()[0].behavior,
            BehaviorDef::Wander { bounds: None, .. }
        ));
    }
}
