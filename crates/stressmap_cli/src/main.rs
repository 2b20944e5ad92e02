//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `stressmap_core` linkage.
//! - Print region counts per preset/side as a geometry sanity check.

use stressmap_core::geometry::body::generate;
use stressmap_core::{ProportionPreset, Side};

fn main() {
    println!("stressmap_core ping={}", stressmap_core::ping());
    println!("stressmap_core version={}", stressmap_core::core_version());

    for preset in [ProportionPreset::Broad, ProportionPreset::Rounded] {
        for side in [Side::Front, Side::Back] {
            println!(
                "stressmap_core regions preset={} side={} count={}",
                preset.as_str(),
                side.as_str(),
                generate(preset, side).len()
            );
        }
    }
}
