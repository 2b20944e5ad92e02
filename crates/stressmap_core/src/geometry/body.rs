//! Parametric body schematic generator.
//!
//! # Responsibility
//! - Generate the named region set for a `(ProportionPreset, Side)` pair.
//!
//! # Invariants
//! - Output is a pure function of the inputs: no randomness, no caching.
//! - Paired limbs are mirrored about the vertical board center line, with
//!   rotation signs mirrored too.
//! - Emission order is z-order; later regions sit on top for hit testing.
//! - Rotations never exceed `MAX_ROTATION_DEGREES`.

use crate::geometry::coords::BOARD_WIDTH;
use crate::model::region::{
    CircleGeometry, ProportionPreset, Proportions, RectGeometry, Region, RegionId, RegionShape,
    Side,
};

/// Upper bound for limb tilt.
pub const MAX_ROTATION_DEGREES: f64 = 10.0;

const CENTER_X: f64 = BOARD_WIDTH / 2.0;

const HEAD_CENTER_Y: f64 = 52.0;
const HEAD_RADIUS: f64 = 32.0;

const NECK_WIDTH: f64 = 28.0;
const NECK_TOP: f64 = 82.0;
const NECK_HEIGHT: f64 = 22.0;

const CHEST_TOP: f64 = 104.0;
const CHEST_HEIGHT: f64 = 96.0;
const WAIST_TOP: f64 = 200.0;
const WAIST_HEIGHT: f64 = 90.0;

const SHOULDER_CENTER_Y: f64 = 116.0;
const SHOULDER_RADIUS: f64 = 18.0;

const ARM_WIDTH: f64 = 26.0;
const ARM_TOP: f64 = 128.0;
const ARM_HEIGHT: f64 = 100.0;
const ARM_TILT: f64 = 8.0;

const FOREARM_WIDTH: f64 = 22.0;
const FOREARM_TOP: f64 = 232.0;
const FOREARM_HEIGHT: f64 = 90.0;
const FOREARM_SPREAD: f64 = 8.0;
const FOREARM_TILT: f64 = 6.0;

const HAND_CENTER_Y: f64 = 338.0;
const HAND_RADIUS: f64 = 15.0;
const HAND_SPREAD: f64 = 14.0;

const THIGH_TOP: f64 = 290.0;
const THIGH_HEIGHT: f64 = 130.0;
const THIGH_GAP: f64 = 6.0;
const THIGH_TILT: f64 = 2.0;

const CALF_TOP: f64 = 424.0;
const CALF_HEIGHT: f64 = 120.0;
const CALF_NARROWING: f64 = 6.0;
const CALF_INSET: f64 = 2.0;

const FOOT_TOP: f64 = 548.0;
const FOOT_WIDTH: f64 = 30.0;
const FOOT_HEIGHT: f64 = 30.0;
const FOOT_SPREAD: f64 = 2.0;
const FOOT_TILT: f64 = 6.0;

/// Generates the region set for one preset and view side.
pub fn generate(preset: ProportionPreset, side: Side) -> Vec<Region> {
    let p = preset.proportions();
    let mut regions = Vec::with_capacity(18);

    let (upper_torso, lower_torso) = match side {
        Side::Front => (RegionId::Chest, RegionId::Abdomen),
        Side::Back => (RegionId::UpperBack, RegionId::LowerBack),
    };
    regions.push(Region::new(
        upper_torso,
        single_label(upper_torso),
        centered_rect(CENTER_X, CHEST_TOP, p.chest_width, CHEST_HEIGHT, 14.0, None),
    ));
    regions.push(Region::new(
        lower_torso,
        single_label(lower_torso),
        centered_rect(CENTER_X, WAIST_TOP, p.waist_width, WAIST_HEIGHT, 12.0, None),
    ));

    regions.push(Region::new(
        RegionId::Head,
        "Head",
        circle(CENTER_X, HEAD_CENTER_Y, HEAD_RADIUS),
    ));
    regions.push(Region::new(
        RegionId::Neck,
        "Neck",
        centered_rect(CENTER_X, NECK_TOP, NECK_WIDTH, NECK_HEIGHT, 6.0, None),
    ));

    // Arms hinge at the shoulder so the tilt swings the elbow outward and the
    // upper inner corner stays clear of the chest.
    push_mirrored(&mut regions, side, RegionId::Arms, |sign| {
        hinged_rect(
            CENTER_X + sign * p.arm_offset,
            ARM_TOP,
            ARM_WIDTH,
            ARM_HEIGHT,
            12.0,
            -sign * ARM_TILT,
        )
    });
    push_mirrored(&mut regions, side, RegionId::Forearms, |sign| {
        centered_rect(
            CENTER_X + sign * (p.arm_offset + FOREARM_SPREAD),
            FOREARM_TOP,
            FOREARM_WIDTH,
            FOREARM_HEIGHT,
            10.0,
            Some(-sign * FOREARM_TILT),
        )
    });
    push_mirrored(&mut regions, side, RegionId::Hands, |sign| {
        circle(
            CENTER_X + sign * (p.arm_offset + HAND_SPREAD),
            HAND_CENTER_Y,
            HAND_RADIUS,
        )
    });
    push_mirrored(&mut regions, side, RegionId::Shoulders, |sign| {
        circle(
            CENTER_X + sign * p.shoulder_width / 2.0,
            SHOULDER_CENTER_Y,
            SHOULDER_RADIUS,
        )
    });

    let thigh_width = thigh_width(&p);
    push_mirrored(&mut regions, side, RegionId::Thighs, |sign| {
        centered_rect(
            CENTER_X + sign * leg_axis_offset(&p),
            THIGH_TOP,
            thigh_width,
            THIGH_HEIGHT,
            14.0,
            Some(sign * THIGH_TILT),
        )
    });
    push_mirrored(&mut regions, side, RegionId::Calves, |sign| {
        centered_rect(
            CENTER_X + sign * (leg_axis_offset(&p) - CALF_INSET),
            CALF_TOP,
            thigh_width - CALF_NARROWING,
            CALF_HEIGHT,
            12.0,
            None,
        )
    });
    push_mirrored(&mut regions, side, RegionId::Feet, |sign| {
        centered_rect(
            CENTER_X + sign * (leg_axis_offset(&p) + FOOT_SPREAD),
            FOOT_TOP,
            FOOT_WIDTH,
            FOOT_HEIGHT,
            10.0,
            Some(-sign * FOOT_TILT),
        )
    });

    regions
}

/// Distance from the center line to each leg axis; legs span the hip width.
fn leg_axis_offset(p: &Proportions) -> f64 {
    p.hip_width / 4.0
}

fn thigh_width(p: &Proportions) -> f64 {
    p.hip_width / 2.0 - THIGH_GAP
}

/// Emits the viewer-left instance (`sign = -1`) then the viewer-right one.
fn push_mirrored(
    regions: &mut Vec<Region>,
    side: Side,
    id: RegionId,
    shape_for: impl Fn(f64) -> RegionShape,
) {
    for sign in [-1.0, 1.0] {
        let label = format!("{} {}", anatomical_side(side, sign), pair_noun(id));
        regions.push(Region::new(id, label, shape_for(sign)));
    }
}

/// Body-relative side of a viewer-relative instance.
///
/// Facing the viewer (front), the body's right appears on the viewer's left.
fn anatomical_side(side: Side, sign: f64) -> &'static str {
    let viewer_left = sign < 0.0;
    match (side, viewer_left) {
        (Side::Front, true) | (Side::Back, false) => "Right",
        (Side::Front, false) | (Side::Back, true) => "Left",
    }
}

fn pair_noun(id: RegionId) -> &'static str {
    match id {
        RegionId::Shoulders => "Shoulder",
        RegionId::Arms => "Arm",
        RegionId::Forearms => "Forearm",
        RegionId::Hands => "Hand",
        RegionId::Thighs => "Thigh",
        RegionId::Calves => "Calf",
        RegionId::Feet => "Foot",
        other => single_label(other),
    }
}

fn single_label(id: RegionId) -> &'static str {
    match id {
        RegionId::Head => "Head",
        RegionId::Neck => "Neck",
        RegionId::Chest => "Chest",
        RegionId::Abdomen => "Abdomen",
        RegionId::UpperBack => "Upper Back",
        RegionId::LowerBack => "Lower Back",
        RegionId::Shoulders => "Shoulders",
        RegionId::Arms => "Arms",
        RegionId::Forearms => "Forearms",
        RegionId::Hands => "Hands",
        RegionId::Thighs => "Thighs",
        RegionId::Calves => "Calves",
        RegionId::Feet => "Feet",
    }
}

fn circle(center_x: f64, center_y: f64, radius: f64) -> RegionShape {
    RegionShape::Circle(CircleGeometry {
        center_x,
        center_y,
        radius,
    })
}

fn centered_rect(
    axis_x: f64,
    top: f64,
    width: f64,
    height: f64,
    corner_radius: f64,
    rotation_degrees: Option<f64>,
) -> RegionShape {
    RegionShape::Rect(RectGeometry {
        origin_x: axis_x - width / 2.0,
        origin_y: top,
        width,
        height,
        corner_radius,
        rotation_degrees,
    })
}

/// Rect hanging from the midpoint of its top edge, tilted about that point.
///
/// Stored rotation is about the rect center, so the center is moved to where
/// the hinge rotation carries it.
fn hinged_rect(
    hinge_x: f64,
    hinge_y: f64,
    width: f64,
    height: f64,
    corner_radius: f64,
    rotation_degrees: f64,
) -> RegionShape {
    let (sin, cos) = rotation_degrees.to_radians().sin_cos();
    let center_x = hinge_x - height / 2.0 * sin;
    let center_y = hinge_y + height / 2.0 * cos;
    RegionShape::Rect(RectGeometry {
        origin_x: center_x - width / 2.0,
        origin_y: center_y - height / 2.0,
        width,
        height,
        corner_radius,
        rotation_degrees: Some(rotation_degrees),
    })
}
