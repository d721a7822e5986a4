// Per-frame simulation update.
// Each step is a plain function over one entity so it can be tested alone;
// the `*_system` wrappers run it over the ECS world.

use bevy_ecs::prelude::*;

use super::animation::{facing_heading, school_heading};
use super::components::*;
use super::config::AquariumConfig;
use super::input::MovementIntent;

/// Clamp a raw frame delta into `[0, max_dt]`.
/// A stalled frame (debugger, window drag) would otherwise teleport fish
/// and jump every animation phase.
pub fn clamp_delta(raw_dt: f32, max_dt: f32) -> f32 {
    if raw_dt.is_finite() { raw_dt.clamp(0.0, max_dt) } else { 0.0 }
}

// ============================================================================
// SCHOOL FISH
// ============================================================================

/// Integrate one school fish. Returns true if it turned around this frame.
///
/// The turn only fires while the fish is past an edge *and still heading
/// outward*, so a fish that overshoots flips exactly once and then swims
/// back in instead of jittering on the boundary.
pub fn step_school_fish(fish: &mut SchoolFish, config: &AquariumConfig, dt: f32) -> bool {
    fish.position += fish.direction * fish.speed * dt;

    let edge_x = config.school_edge_x();
    let past_right = fish.position.x > edge_x && fish.direction.x > 0.0;
    let past_left = fish.position.x < -edge_x && fish.direction.x < 0.0;
    let turned = past_right || past_left;
    if turned {
        fish.direction.x = -fish.direction.x;
        fish.heading = school_heading(fish.direction.x);
    }

    let edge_z = config.school_edge_z();
    fish.position.z = fish.position.z.clamp(-edge_z, edge_z);
    fish.position.y = fish.position.y.max(config.school_floor_y);

    turned
}

pub fn school_fish_system(world: &mut World, config: &AquariumConfig, dt: f32) {
    let mut query = world.query::<&mut SchoolFish>();
    for mut fish in query.iter_mut(world) {
        if step_school_fish(&mut fish, config, dt) {
            log::trace!("{:?} turned at x={:.2}", fish.kind, fish.position.x);
        }
    }
}

// ============================================================================
// PLAYER FISH
// ============================================================================

/// Move, turn and clamp the player fish, then advance its animation clocks.
pub fn step_player(player: &mut PlayerFish, intent: &MovementIntent, config: &AquariumConfig, dt: f32) {
    if let Some(dir) = intent.movement {
        player.position += dir * player.speed * dt;
    }
    if let Some(heading) = intent.facing.and_then(facing_heading) {
        player.heading = heading;
    }

    let edge_x = config.player_edge_x();
    player.position.x = player.position.x.clamp(-edge_x, edge_x);
    player.position.y = player.position.y.clamp(config.player_min_y, config.player_max_y);
    player.position.z = player.position.z.clamp(-config.bound_z, config.bound_z);

    player.tail_phase += dt * config.tail_animation_speed;
    if player.mouth_open {
        player.mouth_elapsed += dt;
    }
}

pub fn player_system(world: &mut World, intent: &MovementIntent, config: &AquariumConfig, dt: f32) {
    let mut player = world.resource_mut::<PlayerFish>();
    step_player(&mut player, intent, config, dt);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::animation::tooth_progress;
    use glam::{Vec2, Vec3};
    use std::f32::consts::PI;

    fn fish_at(x: f32, positive: bool) -> SchoolFish {
        SchoolFish::new(Vec3::new(x, 5.0, 0.0), positive, MeshKind::FishA, 3.0, 2.0, Color::WHITE)
    }

    fn intent(movement: Vec3, facing: Vec2) -> MovementIntent {
        MovementIntent {
            movement: movement.try_normalize(),
            facing: facing.try_normalize(),
        }
    }

    #[test]
    fn test_clamp_delta() {
        assert_eq!(clamp_delta(0.016, 0.1), 0.016);
        assert_eq!(clamp_delta(2.5, 0.1), 0.1);
        assert_eq!(clamp_delta(-1.0, 0.1), 0.0);
        assert_eq!(clamp_delta(f32::NAN, 0.1), 0.0);
    }

    #[test]
    fn test_school_fish_turns_at_edge() {
        let config = AquariumConfig::default();
        let mut fish = fish_at(14.5, true);
        assert_eq!(fish.heading, 0.0);

        assert!(step_school_fish(&mut fish, &config, 0.2));
        assert!((fish.position.x - 15.1).abs() < 1e-4);
        assert_eq!(fish.direction.x, -1.0);
        assert_eq!(fish.heading, PI);
    }

    #[test]
    fn test_school_fish_turns_once_per_crossing() {
        let config = AquariumConfig::default();
        let mut fish = fish_at(14.9, true);
        let mut turns = 0;
        for _ in 0..20 {
            if step_school_fish(&mut fish, &config, 0.05) {
                turns += 1;
            }
        }
        assert_eq!(turns, 1);
        assert_eq!(fish.direction.x, -1.0);
        assert!(fish.position.x < 15.0);

        // A zero-length frame while past the edge must not flip it back.
        let mut stuck = fish_at(15.5, false);
        assert!(!step_school_fish(&mut stuck, &config, 0.0));
        assert_eq!(stuck.direction.x, -1.0);
    }

    #[test]
    fn test_school_fish_left_edge() {
        let config = AquariumConfig::default();
        let mut fish = fish_at(-14.9, false);
        assert!(step_school_fish(&mut fish, &config, 0.1));
        assert_eq!(fish.direction.x, 1.0);
        assert_eq!(fish.heading, 0.0);
    }

    #[test]
    fn test_school_fish_clamps_z_and_floor() {
        let config = AquariumConfig::default();
        let mut fish = fish_at(0.0, true);
        fish.position.z = 30.0;
        fish.position.y = -4.0;
        step_school_fish(&mut fish, &config, 0.1);
        assert_eq!(fish.position.z, 12.0);
        assert_eq!(fish.position.y, 1.0);

        // No ceiling.
        fish.position.y = 50.0;
        step_school_fish(&mut fish, &config, 0.1);
        assert_eq!(fish.position.y, 50.0);
    }

    #[test]
    fn test_player_stays_in_bounds() {
        let config = AquariumConfig::default();
        let mut player = PlayerFish::default();
        let pushes = [
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, 0.0),
        ];
        for push in pushes {
            for _ in 0..500 {
                step_player(&mut player, &intent(push, Vec2::ZERO), &config, 0.1);
                let p = player.position;
                assert!((-15.0..=15.0).contains(&p.x), "{p:?}");
                assert!((1.5..=18.0).contains(&p.y), "{p:?}");
                assert!((-20.0..=20.0).contains(&p.z), "{p:?}");
            }
        }
    }

    #[test]
    fn test_diagonal_is_not_faster() {
        let config = AquariumConfig::default();
        let dt = 0.1;

        let mut axis = PlayerFish::default();
        step_player(&mut axis, &intent(Vec3::X, Vec2::ZERO), &config, dt);
        let axis_dist = (axis.position - PlayerFish::default().position).length();

        let mut diag = PlayerFish::default();
        step_player(&mut diag, &intent(Vec3::new(1.0, 1.0, -1.0), Vec2::ZERO), &config, dt);
        let diag_dist = (diag.position - PlayerFish::default().position).length();

        assert!((axis_dist - diag_dist).abs() < 1e-5);
        assert!((axis_dist - 2.0 * dt).abs() < 1e-5);
    }

    #[test]
    fn test_player_heading_only_changes_with_facing() {
        let config = AquariumConfig::default();
        let mut player = PlayerFish::default();
        step_player(&mut player, &intent(Vec3::ZERO, Vec2::new(-1.0, 0.0)), &config, 0.1);
        assert!((player.heading - PI).abs() < 1e-6);

        step_player(&mut player, &intent(Vec3::Y, Vec2::ZERO), &config, 0.1);
        assert!((player.heading - PI).abs() < 1e-6);
    }

    #[test]
    fn test_tooth_progress_monotone_while_open() {
        let config = AquariumConfig::default();
        let mut player = PlayerFish::default();
        player.toggle_mouth();

        let mut last = 0.0;
        for _ in 0..40 {
            step_player(&mut player, &MovementIntent::default(), &config, 0.05);
            let t = tooth_progress(player.mouth_elapsed, player.mouth_duration);
            assert!(t >= last);
            assert!(t <= 0.85);
            last = t;
        }
        assert_eq!(last, 0.85);

        // Closing does not reset, reopening does.
        player.toggle_mouth();
        assert!(player.mouth_elapsed > 0.0);
        step_player(&mut player, &MovementIntent::default(), &config, 0.05);
        player.toggle_mouth();
        assert_eq!(tooth_progress(player.mouth_elapsed, player.mouth_duration), 0.0);
    }

    #[test]
    fn test_tail_phase_advances_with_time() {
        let config = AquariumConfig::default();
        let mut player = PlayerFish::default();
        step_player(&mut player, &MovementIntent::default(), &config, 0.1);
        assert!((player.tail_phase - 0.5).abs() < 1e-6);
        assert_eq!(player.mouth_elapsed, 0.0);
    }
}
