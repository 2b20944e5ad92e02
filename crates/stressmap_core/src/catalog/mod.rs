//! Region to remediation protocol lookup.
//!
//! # Responsibility
//! - Map canonical region ids to ordered remediation suggestions.
//! - Ship a built-in table while allowing callers to inject their own.
//!
//! # Invariants
//! - Catalog content is immutable after construction.
//! - A missing key and an empty entry both look up as an empty slice.

use crate::model::region::RegionId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One named remediation action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub name: String,
    pub description: String,
}

impl Suggestion {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Read-only region id → suggestions table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtocolCatalog {
    entries: BTreeMap<RegionId, Vec<Suggestion>>,
}

impl ProtocolCatalog {
    /// Builds a catalog from explicit entries; later duplicates replace earlier ones.
    pub fn from_entries(entries: impl IntoIterator<Item = (RegionId, Vec<Suggestion>)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Built-in protocol table.
    pub fn builtin() -> Self {
        Self::from_entries(BUILTIN_PROTOCOLS.iter().map(|(id, items)| {
            (
                *id,
                items
                    .iter()
                    .map(|(name, description)| Suggestion::new(*name, *description))
                    .collect(),
            )
        }))
    }

    /// Returns suggestions for `region_id` in catalog order.
    pub fn lookup(&self, region_id: RegionId) -> &[Suggestion] {
        self.entries
            .get(&region_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// First suggestion for `region_id`, if any.
    pub fn primary(&self, region_id: RegionId) -> Option<&Suggestion> {
        self.lookup(region_id).first()
    }
}

type ProtocolRow = (RegionId, &'static [(&'static str, &'static str)]);

const BUILTIN_PROTOCOLS: &[ProtocolRow] = &[
    (
        RegionId::Head,
        &[
            ("Temple Release", "Slow circular pressure on both temples for 60 seconds."),
            ("Screen Break", "Look at a distant point for 20 seconds every 20 minutes."),
        ],
    ),
    (
        RegionId::Neck,
        &[
            ("Chin Tucks", "Draw the chin straight back, hold 5 seconds, repeat 10 times."),
            ("Side Neck Stretch", "Tilt ear toward shoulder and hold 30 seconds per side."),
        ],
    ),
    (
        RegionId::Shoulders,
        &[
            ("Shoulder Rolls", "Roll shoulders backward slowly for 10 repetitions."),
            ("Doorway Stretch", "Forearms on a door frame, lean through for 30 seconds."),
        ],
    ),
    (
        RegionId::Chest,
        &[
            ("Pec Opener", "Clasp hands behind the back and lift gently for 30 seconds."),
            ("Box Breathing", "Inhale 4, hold 4, exhale 4, hold 4; repeat 5 cycles."),
        ],
    ),
    (
        RegionId::Abdomen,
        &[
            ("Diaphragm Breathing", "Lie supine, breathe into the belly for 2 minutes."),
            ("Cobra Stretch", "Prone, press up through the hands and hold 20 seconds."),
        ],
    ),
    (
        RegionId::UpperBack,
        &[
            ("Thoracic Extension", "Arch over a chair back, hold 20 seconds, repeat 5 times."),
            ("Cat-Cow", "Alternate spinal flexion and extension on all fours for 1 minute."),
        ],
    ),
    (
        RegionId::LowerBack,
        &[
            ("Knee to Chest", "Lie supine and hug one knee in for 30 seconds per side."),
            ("Child's Pose", "Sit back on the heels with arms extended for 1 minute."),
        ],
    ),
    (
        RegionId::Arms,
        &[(
            "Triceps Stretch",
            "Reach one hand down the upper back, press the elbow for 30 seconds.",
        )],
    ),
    (
        RegionId::Forearms,
        &[
            ("Wrist Flexor Stretch", "Extend the arm, pull fingers back gently for 20 seconds."),
            ("Wrist Extensor Stretch", "Extend the arm, fold the wrist down for 20 seconds."),
        ],
    ),
    (
        RegionId::Hands,
        &[("Tendon Glides", "Cycle fist, hook and flat-hand positions 10 times.")],
    ),
    (
        RegionId::Thighs,
        &[
            ("Hip Flexor Lunge", "Half-kneeling lunge, shift forward for 30 seconds per side."),
            ("Hamstring Fold", "Hinge at the hips with soft knees for 30 seconds."),
        ],
    ),
    (
        RegionId::Calves,
        &[("Wall Calf Stretch", "Back heel down against a wall lean, 30 seconds per side.")],
    ),
    (
        RegionId::Feet,
        &[("Plantar Roll", "Roll the sole over a ball for 1 minute per foot.")],
    ),
];

#[cfg(test)]
mod tests {
    use super::{ProtocolCatalog, Suggestion};
    use crate::model::region::RegionId;

    #[test]
    fn builtin_covers_every_region() {
        let catalog = ProtocolCatalog::builtin();
        for id in [
            RegionId::Head,
            RegionId::Neck,
            RegionId::Shoulders,
            RegionId::Chest,
            RegionId::Abdomen,
            RegionId::UpperBack,
            RegionId::LowerBack,
            RegionId::Arms,
            RegionId::Forearms,
            RegionId::Hands,
            RegionId::Thighs,
            RegionId::Calves,
            RegionId::Feet,
        ] {
            assert!(catalog.primary(id).is_some(), "missing protocol for {id:?}");
        }
    }

    #[test]
    fn missing_and_empty_entries_look_the_same() {
        let catalog = ProtocolCatalog::from_entries([
            (RegionId::Neck, Vec::new()),
            (RegionId::Head, vec![Suggestion::new("Rest", "Close eyes")]),
        ]);
        assert!(catalog.lookup(RegionId::Neck).is_empty());
        assert!(catalog.lookup(RegionId::Feet).is_empty());
        assert_eq!(catalog.primary(RegionId::Neck), catalog.primary(RegionId::Feet));
        assert_eq!(catalog.primary(RegionId::Head).unwrap().name, "Rest");
    }
}
