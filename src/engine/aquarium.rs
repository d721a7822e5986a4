// The simulation context: owns every entity, the clock and the tuning config.
// Lifecycle is explicit: `Aquarium::new` populates the tank, `update` advances
// one frame, `render` walks it, and dropping it tears everything down.

use std::f32::consts::PI;

use bevy_ecs::prelude::*;
use glam::Vec3;
use rand::Rng;

use super::components::*;
use super::config::AquariumConfig;
use super::input::{InputEvent, MovementIntent};
use super::scene::{render_scene, DrawSink, FrameMatrices};
use super::systems::{clamp_delta, player_system, school_fish_system};

/// Where each school fish starts, and which mesh it uses.
const SCHOOL_SPAWNS: [(Vec3, MeshKind); 3] = [
    (Vec3::new(0.0, 15.0, 0.0), MeshKind::FishA),
    (Vec3::new(7.0, 3.0, 0.0), MeshKind::FishB),
    (Vec3::new(-3.0, 7.0, -7.0), MeshKind::FishC),
];

/// Seaweed roots on the tank floor.
const SEAWEED_ROOTS: [Vec3; 3] = [
    Vec3::new(7.0, 0.0, 0.0),
    Vec3::new(-7.0, 0.0, -10.0),
    Vec3::new(-7.0, 0.0, 5.0),
];

/// What the outer loop must do after this frame's events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameSignals {
    pub close_requested: bool,
    pub toggle_overlay: bool,
}

pub struct Aquarium {
    world: World,
    config: AquariumConfig,
}

impl Aquarium {
    pub fn new(config: AquariumConfig) -> Self {
        Self::with_rng(config, &mut rand::thread_rng())
    }

    /// Populate the tank using `rng` for fish colors, swim directions and
    /// seaweed phase offsets.
    pub fn with_rng(config: AquariumConfig, rng: &mut impl Rng) -> Self {
        let mut world = World::new();
        world.insert_resource(SimClock::default());
        world.insert_resource(PlayerFish {
            speed: config.player_speed,
            rotation_speed: config.player_rotation_speed,
            mouth_duration: config.mouth_duration,
            ..Default::default()
        });

        for (position, kind) in SCHOOL_SPAWNS {
            world.spawn(SchoolFish::new(
                position,
                rng.gen_bool(0.5),
                kind,
                config.school_speed,
                config.school_scale,
                Color::random(rng),
            ));
        }

        for root in SEAWEED_ROOTS {
            world.spawn(Seaweed::new(root, rng.gen_range(0.0..3.0 * PI)));
        }

        log::info!(
            "Aquarium populated: {} school fish, {} seaweed plants",
            SCHOOL_SPAWNS.len(),
            SEAWEED_ROOTS.len()
        );

        Self { world, config }
    }

    pub fn config(&self) -> &AquariumConfig {
        &self.config
    }

    pub fn player(&self) -> &PlayerFish {
        self.world.resource::<PlayerFish>()
    }

    pub fn clock(&self) -> SimClock {
        *self.world.resource::<SimClock>()
    }

    pub fn school_fish(&mut self) -> Vec<SchoolFish> {
        self.world.query::<&SchoolFish>().iter(&self.world).copied().collect()
    }

    pub fn seaweed_count(&mut self) -> usize {
        self.world.query::<&Seaweed>().iter(&self.world).count()
    }

    pub fn entity_count(&self) -> usize {
        self.world.entities().len() as usize
    }

    /// Apply discrete input events. Mouth toggles take effect immediately;
    /// window-level requests are passed back to the caller.
    pub fn handle_events(&mut self, events: &[InputEvent]) -> FrameSignals {
        let mut signals = FrameSignals::default();
        for event in events {
            match event {
                InputEvent::CloseRequested => signals.close_requested = true,
                InputEvent::ToggleOverlay => signals.toggle_overlay = !signals.toggle_overlay,
                InputEvent::ToggleMouth => {
                    let mut player = self.world.resource_mut::<PlayerFish>();
                    player.toggle_mouth();
                    log::info!("Mouth {}", if player.mouth_open { "opened" } else { "closed" });
                }
            }
        }
        signals
    }

    /// Advance the simulation by one frame.
    pub fn update(&mut self, raw_dt: f32, intent: &MovementIntent) {
        let dt = clamp_delta(raw_dt, self.config.max_frame_dt);
        if dt < raw_dt {
            log::debug!("Frame delta {:.3}s clamped to {:.3}s", raw_dt, dt);
        }

        self.world.resource_mut::<SimClock>().advance(dt);
        player_system(&mut self.world, intent, &self.config, dt);
        school_fish_system(&mut self.world, &self.config, dt);
    }

    /// Issue this frame's draws into `sink`. Returns the draw count.
    pub fn render<S: DrawSink>(&mut self, frame: &FrameMatrices, sink: &mut S) -> usize {
        render_scene(&mut self.world, &self.config, frame, sink)
    }
}
