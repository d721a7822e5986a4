// Scene walk: turns the current simulation state into draw calls.
//
// Every primitive is a mesh (almost always the unit cube) plus a model matrix
// and a flat color. Each draw carries the full uniform set (projection, view,
// model, color) so the backend never relies on state left by a previous draw.

use bevy_ecs::prelude::*;
use glam::{Mat4, Vec3};

use super::animation::{
    jaw_angle, seaweed_pose, tail_pose, tooth_position, tooth_progress, TailShape,
    TAIL_SEGMENT_ADVANCE,
};
use super::components::*;
use super::config::AquariumConfig;
use super::transform::{compose, ModelMatrix, TransformOp};

// ============================================================================
// UNIFORMS
// ============================================================================

/// Per-draw uniform block. Layout matches `ObjectUniforms` in shader.wgsl.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniforms {
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    /// RGB in xyz, w unused.
    pub object_color: [f32; 4],
}

impl ObjectUniforms {
    pub fn new(frame: &FrameMatrices, model: Mat4, color: Color) -> Self {
        Self {
            projection: frame.projection.to_cols_array_2d(),
            view: frame.view.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            object_color: [color.r, color.g, color.b, 1.0],
        }
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model)
    }
}

/// Camera matrices shared by every draw in a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameMatrices {
    pub projection: Mat4,
    pub view: Mat4,
}

// ============================================================================
// DRAW SINK
// ============================================================================

/// Receiver of draw calls: sets the uniforms, then submits the mesh.
pub trait DrawSink {
    fn draw(&mut self, mesh: MeshKind, uniforms: &ObjectUniforms);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub mesh: MeshKind,
    pub uniforms: ObjectUniforms,
}

/// Records draws in submission order. The GPU backend replays it; tests inspect it.
#[derive(Debug, Default)]
pub struct DrawList {
    pub calls: Vec<DrawCall>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

impl DrawSink for DrawList {
    fn draw(&mut self, mesh: MeshKind, uniforms: &ObjectUniforms) {
        self.calls.push(DrawCall { mesh, uniforms: *uniforms });
    }
}

/// Wraps a sink with the frame's camera matrices.
struct Painter<'a, S: DrawSink> {
    sink: &'a mut S,
    frame: &'a FrameMatrices,
    count: usize,
}

impl<S: DrawSink> Painter<'_, S> {
    fn draw(&mut self, mesh: MeshKind, model: impl Into<Mat4>, color: Color) {
        self.sink.draw(mesh, &ObjectUniforms::new(self.frame, model.into(), color));
        self.count += 1;
    }

    fn cube(&mut self, model: impl Into<Mat4>, color: Color) {
        self.draw(MeshKind::Cube, model, color);
    }
}

// ============================================================================
// PALETTE
// ============================================================================

const SAND: Color = Color::new(0.9, 0.8, 0.6);
const PLAYER_BODY: Color = Color::new(0.4, 0.4, 0.6);
const PLAYER_FIN: Color = Color::new(0.35, 0.35, 0.55);

// ============================================================================
// SCENE WALK
// ============================================================================

/// Draw the whole aquarium. Returns the number of draws issued.
pub fn render_scene<S: DrawSink>(
    world: &mut World,
    config: &AquariumConfig,
    frame: &FrameMatrices,
    sink: &mut S,
) -> usize {
    let mut painter = Painter { sink, frame, count: 0 };
    let time = world.resource::<SimClock>().elapsed;

    draw_tank(&mut painter, config);

    let mut plants = world.query::<&Seaweed>();
    for plant in plants.iter(world) {
        draw_seaweed(&mut painter, plant, time, config.wave_frequency);
    }

    let mut school = world.query::<&SchoolFish>();
    for fish in school.iter(world) {
        draw_school_fish(&mut painter, fish);
    }

    draw_player_fish(&mut painter, world.resource::<PlayerFish>());

    painter.count
}

fn draw_tank<S: DrawSink>(painter: &mut Painter<'_, S>, config: &AquariumConfig) {
    let floor = compose(Mat4::IDENTITY, &[
        TransformOp::Translate(Vec3::ZERO),
        TransformOp::Scale(Vec3::new(config.bound_x * 2.0, 1.0, config.bound_z * 2.0)),
    ]);
    painter.cube(floor, SAND);
}

/// Each joint rotates on top of every joint below it, so the tip sways furthest.
fn draw_seaweed<S: DrawSink>(painter: &mut Painter<'_, S>, plant: &Seaweed, time: f32, wave_frequency: f32) {
    let mut joint = ModelMatrix::identity().translate(plant.base_position);
    for (segment, pose) in plant.segments().iter().zip(seaweed_pose(plant, time, wave_frequency)) {
        joint = joint.rotate(pose.angle, Vec3::Z);
        painter.cube(joint.translate(pose.anchor).scale(segment.scale), segment.color);
        joint = joint.translate(Vec3::new(0.0, pose.advance, 0.0));
    }
}

fn draw_school_fish<S: DrawSink>(painter: &mut Painter<'_, S>, fish: &SchoolFish) {
    let model = compose(Mat4::IDENTITY, &[
        TransformOp::Translate(fish.position),
        TransformOp::rotate_y(fish.heading),
        TransformOp::Scale(Vec3::splat(fish.scale)),
    ]);
    painter.draw(fish.kind, model, fish.color);
}

// Player fish anatomy, in fish space (nose along +X).
const BODY_SCALE: Vec3 = Vec3::new(5.0, 3.0, 2.5);
const UPPER_JAW_ANCHOR: Vec3 = Vec3::new(3.0, 0.3, 0.0);
const LOWER_JAW_ANCHOR: Vec3 = Vec3::new(2.3, -1.0, 0.0);
const HEAD_TILT_DEGREES: f32 = -20.0;
const HEAD_SCALE: Vec3 = Vec3::new(2.7, 1.5, 2.0);
const JAW_SCALE: Vec3 = Vec3::new(2.5, 0.6, 1.8);
const UPPER_TOOTH_SCALE: Vec3 = Vec3::new(0.15, 0.3, 0.1);
const LOWER_TOOTH_SCALE: Vec3 = Vec3::new(0.2, 0.4, 0.2);
const TAIL_ROOT: Vec3 = Vec3::new(-2.0, 0.0, 0.0);
const TAIL_LOBE_OFFSET: Vec3 = Vec3::new(0.8, 0.0, 0.0);
const TAIL_LOBE_SCALE: Vec3 = Vec3::new(1.5, 6.0, 0.5);

fn draw_player_fish<S: DrawSink>(painter: &mut Painter<'_, S>, player: &PlayerFish) {
    let fish = ModelMatrix::identity()
        .translate(player.position)
        .rotate(player.heading, Vec3::Y);
    let head_tilt = HEAD_TILT_DEGREES.to_radians();

    painter.cube(fish.scale(BODY_SCALE), PLAYER_BODY);

    let head = fish
        .translate(UPPER_JAW_ANCHOR)
        .rotate(head_tilt, Vec3::Z)
        .scale(HEAD_SCALE);
    painter.cube(head, PLAYER_BODY);

    if player.mouth_open {
        let t = tooth_progress(player.mouth_elapsed, player.mouth_duration);
        let teeth = &player.teeth;

        // Upper teeth hang off the scaled head frame.
        let upper = head
            .translate(Vec3::new(0.7, -1.9, 0.0))
            .rotate(head_tilt, Vec3::Z)
            .translate(Vec3::new(-1.25, 0.7, 0.0));
        for tooth in [&teeth.upper_right, &teeth.upper_left] {
            painter.cube(upper.translate(tooth_position(tooth, t)).scale(UPPER_TOOTH_SCALE), Color::WHITE);
        }

        let lower = fish
            .translate(LOWER_JAW_ANCHOR)
            .rotate((-10.0_f32).to_radians(), Vec3::Z)
            .translate(Vec3::new(0.5, 0.75, 0.0));
        for tooth in [&teeth.lower_right, &teeth.lower_left] {
            painter.cube(lower.translate(tooth_position(tooth, t)).scale(LOWER_TOOTH_SCALE), Color::WHITE);
        }
    }

    let jaw = fish
        .translate(LOWER_JAW_ANCHOR)
        .rotate(jaw_angle(player.mouth_open), Vec3::Z);
    painter.cube(jaw.scale(JAW_SCALE), Color::WHITE);

    let eye_base = fish.translate(UPPER_JAW_ANCHOR).rotate(head_tilt, Vec3::Z);
    for side in [-1.0, 1.0] {
        painter.cube(eye_base.translate(Vec3::new(0.3, 0.2, side)).scale(Vec3::new(0.4, 0.4, 0.2)), Color::WHITE);
    }
    for side in [-1.1, 1.1] {
        painter.cube(eye_base.translate(Vec3::new(0.3, 0.2, side)).scale(Vec3::splat(0.2)), Color::BLACK);
    }

    let fin_axis = Vec3::new(1.0, 1.0, 0.0);
    for side in [-1.0_f32, 1.0] {
        let fin = fish
            .translate(Vec3::new(0.8, -1.0, 1.5 * side))
            .rotate((30.0 * side).to_radians(), fin_axis)
            .scale(Vec3::new(3.0, 0.5, 1.0));
        painter.cube(fin, PLAYER_FIN);
    }

    let dorsal = fish
        .translate(Vec3::new(1.0, 1.5, 0.0))
        .rotate(60.0_f32.to_radians(), Vec3::Z)
        .scale(Vec3::new(1.0, 1.5, 1.0));
    painter.cube(dorsal, PLAYER_FIN);

    let mut joint = fish.translate(TAIL_ROOT);
    for segment in tail_pose(player.tail_phase) {
        joint = joint.rotate(segment.angle, Vec3::Y);
        let centre = joint.translate(Vec3::new(-segment.length / 2.0, 0.0, 0.0));
        let model = match segment.shape {
            TailShape::Lobe => centre.translate(TAIL_LOBE_OFFSET).scale(TAIL_LOBE_SCALE),
            TailShape::Body { scale } => centre.scale(scale),
        };
        painter.cube(model, PLAYER_BODY);
        joint = joint.translate(Vec3::new(-segment.length * TAIL_SEGMENT_ADVANCE, 0.0, 0.0));
    }
}
