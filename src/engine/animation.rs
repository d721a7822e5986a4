// Procedural animation: time + per-entity phase + input state → pose parameters.
//
// Everything here is a pure function. The scene module turns these parameters
// into matrices; the systems module owns the state that feeds them.

use std::f32::consts::PI;

use glam::{Vec2, Vec3};

use super::components::{Seaweed, Tooth};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Peak rotation of each seaweed joint (radians).
pub const SEAWEED_SWAY_AMPLITUDE: f32 = 0.2;
/// Peak sideways drift of a segment's anchor before mixing.
pub const SEAWEED_DRIFT_AMPLITUDE: f32 = 0.1;
/// Mix factor between the rest anchor and the drifted anchor.
/// Negative on purpose: the segment overshoots to the opposite side.
pub const SEAWEED_DRIFT_MIX: f32 = -0.8;

pub const TAIL_SEGMENTS: usize = 4;
/// Length along -X of each tail segment, from the body outwards.
pub const TAIL_SEGMENT_LENGTHS: [f32; TAIL_SEGMENTS] = [2.0, 2.5, 3.0, 3.5];
/// Peak rotation of each tail joint (radians).
pub const TAIL_SWAY_AMPLITUDE: f32 = 0.3;
/// Phase lag between neighbouring tail joints.
pub const TAIL_PHASE_STEP: f32 = 0.5;
/// Fraction of a segment's length the tail frame advances after drawing it.
/// Less than 1 so neighbouring segments overlap at the joints.
pub const TAIL_SEGMENT_ADVANCE: f32 = 0.8;

pub const JAW_OPEN_DEGREES: f32 = -20.0;
pub const JAW_CLOSED_DEGREES: f32 = 10.0;
/// Teeth stop short of full extension while the mouth stays open.
pub const TOOTH_MAX_PROGRESS: f32 = 0.85;

// ============================================================================
// VECTOR GUARDS
// ============================================================================

/// Normalize `v`, or `None` when it has no length.
pub fn try_normalize3(v: Vec3) -> Option<Vec3> {
    let len = v.length();
    if len > 0.0 { Some(v / len) } else { None }
}

/// Normalize `v`, or `None` when it has no length.
pub fn try_normalize2(v: Vec2) -> Option<Vec2> {
    let len = v.length();
    if len > 0.0 { Some(v / len) } else { None }
}

// ============================================================================
// SEAWEED
// ============================================================================

/// Joint rotation (about Z) for one seaweed segment.
pub fn seaweed_sway_angle(time: f32, wave_frequency: f32, segment_phase: f32, sway_offset: f32) -> f32 {
    SEAWEED_SWAY_AMPLITUDE * (time * wave_frequency + segment_phase + sway_offset).sin()
}

/// Where a segment's centre sits in its joint frame.
///
/// The rest anchor is halfway up the segment. The drifted anchor adds a small
/// sideways wobble; the two are blended with [`SEAWEED_DRIFT_MIX`].
pub fn seaweed_segment_anchor(time: f32, segment_phase: f32, height: f32) -> Vec3 {
    let rest = Vec3::new(0.0, height / 2.0, 0.0);
    let drifted = Vec3::new(SEAWEED_DRIFT_AMPLITUDE * (time + segment_phase).sin(), height / 2.0, 0.0);
    rest.lerp(drifted, SEAWEED_DRIFT_MIX)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeaweedSegmentPose {
    /// Rotation about Z applied at this joint, on top of all ancestors.
    pub angle: f32,
    /// Segment centre in the rotated joint frame.
    pub anchor: Vec3,
    /// How far up the chain the next joint sits.
    pub advance: f32,
}

/// Pose of every segment of a plant, root to tip.
pub fn seaweed_pose(plant: &Seaweed, time: f32, wave_frequency: f32) -> Vec<SeaweedSegmentPose> {
    plant
        .segments()
        .iter()
        .map(|seg| SeaweedSegmentPose {
            angle: seaweed_sway_angle(time, wave_frequency, seg.phase, plant.sway_offset),
            anchor: seg.local_offset + seaweed_segment_anchor(time, seg.phase, seg.scale.y),
            advance: seg.scale.y,
        })
        .collect()
}

// ============================================================================
// PLAYER TAIL
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TailShape {
    /// Tapering box with the given scale.
    Body { scale: Vec3 },
    /// The fan at the end of the tail.
    Lobe,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TailSegmentPose {
    /// Rotation about Y at this joint, compounding onto the previous joints.
    pub angle: f32,
    pub length: f32,
    pub shape: TailShape,
}

pub fn tail_sway_angle(tail_phase: f32, segment: usize) -> f32 {
    TAIL_SWAY_AMPLITUDE * (tail_phase + segment as f32 * TAIL_PHASE_STEP).sin()
}

pub fn tail_pose(tail_phase: f32) -> [TailSegmentPose; TAIL_SEGMENTS] {
    std::array::from_fn(|i| {
        let length = TAIL_SEGMENT_LENGTHS[i];
        let shape = if i == TAIL_SEGMENTS - 1 {
            TailShape::Lobe
        } else {
            let f = i as f32;
            TailShape::Body { scale: Vec3::new(length, 1.5 - f * 0.25, 2.2 - f * 0.3) }
        };
        TailSegmentPose {
            angle: tail_sway_angle(tail_phase, i),
            length,
            shape,
        }
    })
}

// ============================================================================
// JAW & TEETH
// ============================================================================

/// Lower-jaw rotation about Z. Two discrete positions, no blending.
pub fn jaw_angle(mouth_open: bool) -> f32 {
    if mouth_open {
        JAW_OPEN_DEGREES.to_radians()
    } else {
        JAW_CLOSED_DEGREES.to_radians()
    }
}

/// Normalized tooth slide in [0, TOOTH_MAX_PROGRESS].
pub fn tooth_progress(elapsed: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        return TOOTH_MAX_PROGRESS;
    }
    (elapsed / duration).clamp(0.0, TOOTH_MAX_PROGRESS)
}

pub fn tooth_position(tooth: &Tooth, progress: f32) -> Vec3 {
    tooth.rest.lerp(tooth.extended, progress)
}

// ============================================================================
// HEADINGS
// ============================================================================

/// School fish only ever face straight along ±X.
pub fn school_heading(direction_x: f32) -> f32 {
    if direction_x > 0.0 { 0.0 } else { PI }
}

/// Yaw that points the fish's nose along `facing` (XZ plane).
/// `None` when there is no facing input.
pub fn facing_heading(facing: Vec2) -> Option<f32> {
    try_normalize2(facing).map(|dir| dir.y.atan2(dir.x))
}
