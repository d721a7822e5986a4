// ECS components and resources for the aquarium scene.
// School fish and seaweed plants are entities; the player fish and the clock
// are singletons stored as resources.

use bevy_ecs::prelude::*;
use glam::Vec3;
use rand::Rng;

/// Number of segments in every seaweed plant.
pub const SEAWEED_SEGMENTS: usize = 7;

/// Mesh resource selected for a draw. Resolved to GPU buffers once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshKind {
    Cube,
    FishA,
    FishB,
    FishC,
}

impl MeshKind {
    pub const ALL: [MeshKind; 4] = [MeshKind::Cube, MeshKind::FishA, MeshKind::FishB, MeshKind::FishC];

    /// Dense index for per-kind tables.
    pub fn index(self) -> usize {
        match self {
            MeshKind::Cube => 0,
            MeshKind::FishA => 1,
            MeshKind::FishB => 2,
            MeshKind::FishC => 3,
        }
    }
}

/// RGB color for rendering
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Each channel uniform in [0, 1].
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            r: rng.gen_range(0.0..=1.0),
            g: rng.gen_range(0.0..=1.0),
            b: rng.gen_range(0.0..=1.0),
        }
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r, self.g, self.b)
    }
}

// ============================================================================
// SCHOOL FISH
// ============================================================================

/// An autonomous fish that swims back and forth along X.
#[derive(Component, Debug, Clone, Copy)]
pub struct SchoolFish {
    pub position: Vec3,
    /// Swim direction; X component is always ±1.
    pub direction: Vec3,
    /// Yaw in radians: 0 when swimming +X, PI when swimming -X.
    pub heading: f32,
    /// World units per second.
    pub speed: f32,
    pub kind: MeshKind,
    pub scale: f32,
    pub color: Color,
}

impl SchoolFish {
    pub fn new(position: Vec3, swim_positive_x: bool, kind: MeshKind, speed: f32, scale: f32, color: Color) -> Self {
        let direction = Vec3::new(if swim_positive_x { 1.0 } else { -1.0 }, 0.0, 0.0);
        Self {
            position,
            direction,
            heading: super::animation::school_heading(direction.x),
            speed,
            kind,
            scale,
            color,
        }
    }
}

// ============================================================================
// SEAWEED
// ============================================================================

/// One link of a seaweed chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeaweedSegment {
    pub local_offset: Vec3,
    pub color: Color,
    /// Added to the sway phase; decreasing up the chain so the wave travels upward.
    pub phase: f32,
    pub scale: Vec3,
}

impl SeaweedSegment {
    /// Segment `i` counted from the root: thinner, darker and phase-shifted towards the tip.
    pub fn for_index(i: usize) -> Self {
        let f = i as f32;
        Self {
            local_offset: Vec3::ZERO,
            color: Color::new(0.0, 0.6 - f * 0.05, 0.1),
            phase: -f * 0.35,
            scale: Vec3::new(0.5 - f * 0.02, 1.0, 0.5 - f * 0.02),
        }
    }
}

/// A plant rooted on the tank floor. Owns its segments in root-to-tip order.
#[derive(Component, Debug, Clone)]
pub struct Seaweed {
    pub base_position: Vec3,
    segments: Vec<SeaweedSegment>,
    pub sway_offset: f32,
}

impl Seaweed {
    pub fn new(base_position: Vec3, sway_offset: f32) -> Self {
        Self {
            base_position,
            segments: (0..SEAWEED_SEGMENTS).map(SeaweedSegment::for_index).collect(),
            sway_offset,
        }
    }

    /// Segments from root to tip. The chain is fixed after creation.
    pub fn segments(&self) -> &[SeaweedSegment] {
        &self.segments
    }
}

// ============================================================================
// PLAYER FISH
// ============================================================================

/// Rest and fully-extended positions of one tooth, in jaw space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tooth {
    pub rest: Vec3,
    pub extended: Vec3,
}

impl Tooth {
    pub fn new(rest: Vec3, extended: Vec3) -> Self {
        Self { rest, extended }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Teeth {
    pub upper_left: Tooth,
    pub upper_right: Tooth,
    pub lower_left: Tooth,
    pub lower_right: Tooth,
}

impl Default for Teeth {
    fn default() -> Self {
        Self {
            upper_left:  Tooth::new(Vec3::new(0.0,  0.5, -0.4), Vec3::new(0.5,  0.5, -0.4)),
            upper_right: Tooth::new(Vec3::new(0.0,  0.5,  0.4), Vec3::new(0.5,  0.5,  0.4)),
            lower_left:  Tooth::new(Vec3::new(0.0, -0.5, -0.4), Vec3::new(0.5, -0.5, -0.4)),
            lower_right: Tooth::new(Vec3::new(0.0, -0.5,  0.4), Vec3::new(0.5, -0.5,  0.4)),
        }
    }
}

/// The user-controlled fish.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct PlayerFish {
    pub position: Vec3,
    /// Yaw in radians.
    pub heading: f32,
    pub speed: f32,
    pub rotation_speed: f32,
    pub mouth_open: bool,
    /// Accumulated tail phase (radians of the tail sine wave).
    pub tail_phase: f32,
    /// Seconds since the mouth last opened. Only advances while open.
    pub mouth_elapsed: f32,
    /// Seconds for the teeth to slide fully out.
    pub mouth_duration: f32,
    pub teeth: Teeth,
}

impl Default for PlayerFish {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 5.0, 0.0),
            heading: 0.0,
            speed: 2.0,
            rotation_speed: 2.0,
            mouth_open: false,
            tail_phase: 0.0,
            mouth_elapsed: 0.0,
            mouth_duration: 1.0,
            teeth: Teeth::default(),
        }
    }
}

impl PlayerFish {
    /// Flip the mouth. The tooth timer restarts only when the mouth opens.
    pub fn toggle_mouth(&mut self) {
        self.mouth_open = !self.mouth_open;
        if self.mouth_open {
            self.mouth_elapsed = 0.0;
        }
    }
}

// ============================================================================
// CLOCK
// ============================================================================

/// Simulation time, sampled once per frame.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct SimClock {
    /// Seconds since the aquarium started. Never decreases.
    pub elapsed: f32,
    /// Clamped delta of the current frame.
    pub delta: f32,
    pub frame: u64,
}

impl SimClock {
    pub fn advance(&mut self, dt: f32) {
        self.delta = dt;
        self.elapsed += dt;
        self.frame += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seaweed_chain_is_fixed_length() {
        let weed = Seaweed::new(Vec3::ZERO, 0.0);
        assert_eq!(weed.segments().len(), SEAWEED_SEGMENTS);
        assert_eq!(weed.segments()[0].phase, 0.0);
        assert!((weed.segments()[6].phase - -2.1).abs() < 1e-5);
        assert!((weed.segments()[6].scale.x - 0.38).abs() < 1e-5);
        assert!((weed.segments()[6].color.g - 0.3).abs() < 1e-5);
    }

    #[test]
    fn test_mouth_toggle_resets_only_on_open() {
        let mut player = PlayerFish::default();
        player.toggle_mouth();
        assert!(player.mouth_open);
        player.mouth_elapsed = 0.7;

        player.toggle_mouth();
        assert!(!player.mouth_open);
        assert_eq!(player.mouth_elapsed, 0.7);

        player.toggle_mouth();
        assert!(player.mouth_open);
        assert_eq!(player.mouth_elapsed, 0.0);
    }

    #[test]
    fn test_school_fish_heading_follows_direction() {
        let fish = SchoolFish::new(Vec3::ZERO, false, MeshKind::FishB, 3.0, 2.0, Color::WHITE);
        assert_eq!(fish.direction, Vec3::NEG_X);
        assert_eq!(fish.heading, std::f32::consts::PI);
    }

    #[test]
    fn test_mesh_kind_indices_are_dense() {
        for (i, kind) in MeshKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }
}
