//! Built-in town data.

use super::{BehaviorDef, Location, NpcPlacement, ObstacleDef, ObstacleKind, TransitionDef};
use crate::components::{Appearance, Rect, Vec2};

fn solid(x: f32, y: f32, width: f32, height: f32, color: u32, name: &str) -> ObstacleDef {
    ObstacleDef {
        x,
        y,
        width,
        height,
        color,
        name: Some(name.to_string()),
        kind: ObstacleKind::Solid,
    }
}

fn label(x: f32, y: f32, width: f32, height: f32, color: u32, name: &str) -> ObstacleDef {
    ObstacleDef {
        kind: ObstacleKind::Label,
        ..solid(x, y, width, height, color, name)
    }
}

fn exit(rect: Rect, to: &str, spawn: Vec2, label: &str) -> TransitionDef {
    TransitionDef {
        x: rect.x,
        y: rect.y,
        width: rect.width,
        height: rect.height,
        to: to.to_string(),
        spawn,
        label: label.to_string(),
        key: "E".to_string(),
    }
}

pub(super) fn locations() -> Vec<Location> {
    vec![
        Location {
            id: "home".into(),
            name: "Home".into(),
            width: 800.0,
            height: 600.0,
            spawn: Vec2::new(400.0, 300.0),
            background: 0xD9C7A7,
            obstacles: vec![
                solid(40.0, 40.0, 120.0, 80.0, 0x8B4513, "Bed"),
                solid(300.0, 120.0, 100.0, 60.0, 0xA0522D, "Table"),
                solid(560.0, 40.0, 200.0, 50.0, 0x9E9E9E, "Kitchen"),
                label(340.0, 380.0, 120.0, 70.0, 0xB03A2E, "Rug"),
            ],
            transitions: vec![exit(
                Rect::new(730.0, 260.0, 40.0, 80.0),
                "street",
                Vec2::new(150.0, 400.0),
                "Go outside",
            )],
        },
        Location {
            id: "street".into(),
            name: "Main Street".into(),
            width: 1600.0,
            height: 800.0,
            spawn: Vec2::new(150.0, 400.0),
            background: 0x7F8C8D,
            obstacles: vec![
                solid(20.0, 60.0, 240.0, 280.0, 0xC0392B, "Your House"),
                solid(700.0, 40.0, 280.0, 140.0, 0x6E2C00, "Cafe"),
                solid(1100.0, 300.0, 120.0, 120.0, 0x5DADE2, "Fountain"),
                label(700.0, 600.0, 200.0, 40.0, 0xF4D03F, "Main St."),
            ],
            transitions: vec![
                exit(
                    Rect::new(40.0, 360.0, 40.0, 80.0),
                    "home",
                    Vec2::new(670.0, 300.0),
                    "Go home",
                ),
                exit(
                    Rect::new(1520.0, 360.0, 40.0, 80.0),
                    "park",
                    Vec2::new(140.0, 400.0),
                    "Walk to the park",
                ),
                exit(
                    Rect::new(800.0, 180.0, 80.0, 40.0),
                    "cafe",
                    Vec2::new(300.0, 460.0),
                    "Enter the cafe",
                ),
            ],
        },
        Location {
            id: "park".into(),
            name: "Willow Park".into(),
            width: 1200.0,
            height: 800.0,
            spawn: Vec2::new(600.0, 650.0),
            background: 0x58D68D,
            obstacles: vec![
                solid(500.0, 300.0, 200.0, 150.0, 0x2E86C1, "Pond"),
                solid(200.0, 120.0, 60.0, 60.0, 0x1E8449, "Oak"),
                solid(950.0, 150.0, 60.0, 60.0, 0x1E8449, "Oak"),
                solid(850.0, 550.0, 100.0, 30.0, 0x784212, "Bench"),
                label(300.0, 600.0, 140.0, 50.0, 0xE74C3C, "Flower bed"),
            ],
            transitions: vec![exit(
                Rect::new(20.0, 360.0, 40.0, 80.0),
                "street",
                Vec2::new(1460.0, 400.0),
                "Back to the street",
            )],
        },
        Location {
            id: "cafe".into(),
            name: "Corner Cafe".into(),
            width: 600.0,
            height: 600.0,
            spawn: Vec2::new(300.0, 460.0),
            background: 0xF5E6CA,
            obstacles: vec![
                solid(150.0, 120.0, 300.0, 50.0, 0x6E2C00, "Counter"),
                solid(80.0, 280.0, 60.0, 60.0, 0xA04000, "Table"),
                solid(460.0, 280.0, 60.0, 60.0, 0xA04000, "Table"),
                label(250.0, 40.0, 100.0, 30.0, 0x212F3C, "Menu"),
            ],
            transitions: vec![exit(
                Rect::new(260.0, 540.0, 80.0, 40.0),
                "street",
                Vec2::new(840.0, 280.0),
                "Leave the cafe",
            )],
        },
    ]
}

pub(super) fn npcs() -> Vec<NpcPlacement> {
    vec![
        NpcPlacement {
            id: "mr_hale".into(),
            name: "Mr. Hale".into(),
            appearance: Appearance::new(0xE0AC69, 0xBDC3C7, 0x1F618D, 0x17202A),
            location: "street".into(),
            position: Vec2::new(500.0, 480.0),
            behavior: BehaviorDef::Idle,
            dialog: vec![
                "Morning! Lovely day for a walk.".into(),
                "The park is just east of here, past the fountain.".into(),
                "Mind the pond. The ducks are territorial.".into(),
            ],
        },
        NpcPlacement {
            id: "pip".into(),
            name: "Pip".into(),
            appearance: Appearance::new(0xFFDBAC, 0xF4D03F, 0xE67E22, 0x2874A6),
            location: "street".into(),
            position: Vec2::new(1000.0, 560.0),
            behavior: BehaviorDef::Wander {
                speed: 40.0,
                interval_ms: 2000.0,
                bounds: Some(Rect::new(900.0, 480.0, 300.0, 220.0)),
            },
            dialog: vec![
                "Tag! You're it!".into(),
                "...you're not very fast, are you?".into(),
            ],
        },
        NpcPlacement {
            id: "rosa".into(),
            name: "Rosa".into(),
            appearance: Appearance::new(0xC68642, 0x3B2314, 0x8E44AD, 0x1C2833),
            location: "park".into(),
            position: Vec2::new(400.0, 520.0),
            behavior: BehaviorDef::Wander {
                speed: 35.0,
                interval_ms: 2500.0,
                bounds: Some(Rect::new(300.0, 450.0, 300.0, 250.0)),
            },
            dialog: vec![
                "I come here every day to feed the ducks.".into(),
                "If you're hungry, the cafe on Main Street does a good sandwich.".into(),
            ],
        },
        NpcPlacement {
            id: "old_tom".into(),
            name: "Old Tom".into(),
            appearance: Appearance::new(0xF1C27D, 0xFFFFFF, 0x7B241C, 0x4D5656),
            location: "park".into(),
            position: Vec2::new(900.0, 520.0),
            behavior: BehaviorDef::Idle,
            dialog: vec![
                "Sit a while. The bench doesn't mind.".into(),
                "Forty years I've watched this pond.".into(),
                "Go on, then. Days don't wait.".into(),
            ],
        },
        NpcPlacement {
            id: "mia".into(),
            name: "Mia".into(),
            appearance: Appearance::new(0x8D5524, 0x000000, 0xFFFFFF, 0x5D4037),
            location: "cafe".into(),
            position: Vec2::new(300.0, 200.0),
            behavior: BehaviorDef::Idle,
            dialog: vec![
                "Welcome to the Corner Cafe!".into(),
                "Coffee's fresh. Sandwiches are on the board.".into(),
            ],
        },
    ]
}
