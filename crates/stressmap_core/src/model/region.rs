//! Body region domain model.
//!
//! # Responsibility
//! - Define the named geometric areas of the body schematic.
//! - Define view side and proportion preset selectors.
//!
//! # Invariants
//! - `RegionId` is shared by mirrored left/right instances.
//! - `chest`/`abdomen` exist only on the front view, `upperBack`/`lowerBack`
//!   only on the back view, every other region exists on both.
//! - All geometry is expressed in canonical board space.

use serde::{Deserialize, Serialize};

/// Which face of the body schematic is being viewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Front,
    Back,
}

impl Side {
    /// Stable wire string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
        }
    }

    /// Parses a wire string; surrounding whitespace and case are ignored.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "front" => Some(Self::Front),
            "back" => Some(Self::Back),
            _ => None,
        }
    }
}

/// Body proportion presets.
///
/// Each preset is a fixed set of width constants; see
/// [`ProportionPreset::proportions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProportionPreset {
    /// Wide shoulders, narrow hips.
    Broad,
    /// Narrow shoulders, wide hips.
    Rounded,
}

/// Width constants (board units) that parameterize body generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proportions {
    pub shoulder_width: f64,
    pub hip_width: f64,
    pub chest_width: f64,
    pub waist_width: f64,
    /// Horizontal distance from the center line to the upper arm axis.
    pub arm_offset: f64,
}

const BROAD_PROPORTIONS: Proportions = Proportions {
    shoulder_width: 120.0,
    hip_width: 75.0,
    chest_width: 100.0,
    waist_width: 80.0,
    arm_offset: 68.0,
};

const ROUNDED_PROPORTIONS: Proportions = Proportions {
    shoulder_width: 90.0,
    hip_width: 100.0,
    chest_width: 84.0,
    waist_width: 76.0,
    arm_offset: 58.0,
};

impl ProportionPreset {
    /// Returns the fixed width constants of this preset.
    pub fn proportions(self) -> Proportions {
        match self {
            Self::Broad => BROAD_PROPORTIONS,
            Self::Rounded => ROUNDED_PROPORTIONS,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Broad => "broad",
            Self::Rounded => "rounded",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "broad" => Some(Self::Broad),
            "rounded" => Some(Self::Rounded),
            _ => None,
        }
    }
}

/// Canonical region identifier, shared by mirrored instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RegionId {
    Head,
    Neck,
    Shoulders,
    Chest,
    Abdomen,
    UpperBack,
    LowerBack,
    Arms,
    Forearms,
    Hands,
    Thighs,
    Calves,
    Feet,
}

impl RegionId {
    /// Stable wire string (`upperBack`, `chest`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Neck => "neck",
            Self::Shoulders => "shoulders",
            Self::Chest => "chest",
            Self::Abdomen => "abdomen",
            Self::UpperBack => "upperBack",
            Self::LowerBack => "lowerBack",
            Self::Arms => "arms",
            Self::Forearms => "forearms",
            Self::Hands => "hands",
            Self::Thighs => "thighs",
            Self::Calves => "calves",
            Self::Feet => "feet",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "head" => Some(Self::Head),
            "neck" => Some(Self::Neck),
            "shoulders" => Some(Self::Shoulders),
            "chest" => Some(Self::Chest),
            "abdomen" => Some(Self::Abdomen),
            "upperBack" => Some(Self::UpperBack),
            "lowerBack" => Some(Self::LowerBack),
            "arms" => Some(Self::Arms),
            "forearms" => Some(Self::Forearms),
            "hands" => Some(Self::Hands),
            "thighs" => Some(Self::Thighs),
            "calves" => Some(Self::Calves),
            "feet" => Some(Self::Feet),
            _ => None,
        }
    }

    /// Which view(s) this region is generated on.
    pub fn affinity(self) -> SideAffinity {
        match self {
            Self::Chest | Self::Abdomen => SideAffinity::Front,
            Self::UpperBack | Self::LowerBack => SideAffinity::Back,
            _ => SideAffinity::Both,
        }
    }

    /// Returns whether a marker on `side` may reference this region.
    pub fn is_valid_for(self, side: Side) -> bool {
        self.affinity().includes(side)
    }
}

/// View availability of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SideAffinity {
    Front,
    Back,
    Both,
}

impl SideAffinity {
    pub fn includes(self, side: Side) -> bool {
        match self {
            Self::Both => true,
            Self::Front => side == Side::Front,
            Self::Back => side == Side::Back,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
            Self::Both => "both",
        }
    }
}

/// Circle geometry in board units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleGeometry {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
}

/// Rounded rectangle geometry in board units.
///
/// `corner_radius` is visual only; containment uses the plain bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectGeometry {
    pub origin_x: f64,
    pub origin_y: f64,
    pub width: f64,
    pub height: f64,
    pub corner_radius: f64,
    /// Rotation about the rectangle center, in degrees.
    pub rotation_degrees: Option<f64>,
}

impl RectGeometry {
    pub fn center(&self) -> (f64, f64) {
        (
            self.origin_x + self.width / 2.0,
            self.origin_y + self.height / 2.0,
        )
    }
}

/// Region outline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegionShape {
    Circle(CircleGeometry),
    Rect(RectGeometry),
}

impl RegionShape {
    pub fn kind_str(&self) -> &'static str {
        match self {
            Self::Circle(_) => "circle",
            Self::Rect(_) => "rect",
        }
    }
}

/// One generated region instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    /// Display label of this instance ("Left Arm", "Chest").
    pub instance_label: String,
    pub shape: RegionShape,
    pub side_affinity: SideAffinity,
}

impl Region {
    pub fn new(id: RegionId, instance_label: impl Into<String>, shape: RegionShape) -> Self {
        Self {
            id,
            instance_label: instance_label.into(),
            shape,
            side_affinity: id.affinity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ProportionPreset, RegionId, Side};

    #[test]
    fn region_id_wire_strings_roundtrip() {
        for id in [
            RegionId::Head,
            RegionId::UpperBack,
            RegionId::LowerBack,
            RegionId::Feet,
        ] {
            assert_eq!(RegionId::parse(id.as_str()), Some(id));
        }
        assert_eq!(
            serde_json::to_value(RegionId::UpperBack).unwrap(),
            "upperBack"
        );
    }

    #[test]
    fn torso_regions_are_side_specific() {
        assert!(RegionId::Chest.is_valid_for(Side::Front));
        assert!(!RegionId::Chest.is_valid_for(Side::Back));
        assert!(RegionId::LowerBack.is_valid_for(Side::Back));
        assert!(!RegionId::LowerBack.is_valid_for(Side::Front));
        assert!(RegionId::Arms.is_valid_for(Side::Back));
    }

    #[test]
    fn parse_accepts_case_insensitive_side_and_preset() {
        assert_eq!(Side::parse(" FRONT "), Some(Side::Front));
        assert_eq!(ProportionPreset::parse("Rounded"), Some(ProportionPreset::Rounded));
        assert_eq!(ProportionPreset::parse("tall"), None);
    }
}
