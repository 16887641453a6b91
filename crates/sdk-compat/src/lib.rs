//! Compile-only compatibility crate.
//!
//! This crate exists to ensure the public SDK surface remains usable by third-party
//! consumers. It is not shipped or run; it must only build.

use remap_effects::{BankDef, BankSet, EffectPreset, PresetDef};
use remap_graph::{build_sample_map_fanout, Graph, NodeKind};

#[allow(dead_code)]
pub fn _compile_witness() {
    // Graph builds and compiles using only public APIs.
    let mut g = Graph::new();

    // Minimal chain: scene position -> sample map -> output (kinds exist in graph).
    let scene = g.add_node(NodeKind::ScenePosition);
    let map = g.add_node(NodeKind::SampleMap);
    let out = g.add_node(NodeKind::PixelsOut);

    // Ports are string-addressed in the graph; this is intentionally minimal.
    // The compat crate only verifies that compile-time wiring APIs exist.
    let _ = (scene, map, out);

    // The fan-out builder must remain callable with a bare quality value.
    let _topo = build_sample_map_fanout(2);

    // Effect data models must remain constructible using stable, backend-agnostic APIs.
    // Avoid `Default` here: the SDK surface may prefer explicit constructors.
    let _banks = BankSet::builtin_effect_banks();
    let _entry = PresetDef {
        name: "ripple".to_string(),
        preset: EffectPreset::Ripple,
    };
    let _bank = BankDef {
        name: "Distortion".to_string(),
        presets: vec![_entry],
    };
    let _ = (_banks, _bank);
}
