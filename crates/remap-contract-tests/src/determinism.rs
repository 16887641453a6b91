#![forbid(unsafe_code)]

#[cfg(test)]
mod tests {
    use glam::Vec4;
    use remap_effects::rgss::rgss_offsets;
    use remap_effects::{EffectParams, WaveyParams};
    use remap_graph::build_sample_map_fanout;
    use remap_renderer::{CancelToken, ImageBuffer, RenderToken, SampleMapRenderer, SoftwareDevice};

    /// Determinism contract:
    /// building the same fan-out twice yields the same Plan node ordering.
    #[test]
    fn fanout_compile_is_deterministic_for_same_quality() {
        let t1 = build_sample_map_fanout(3).expect("fanout 1");
        let t2 = build_sample_map_fanout(3).expect("fanout 2");

        let p1 = t1.graph.compile().expect("compile 1");
        let p2 = t2.graph.compile().expect("compile 2");

        assert_eq!(p1.nodes, p2.nodes, "plan nodes order must be stable");
        assert_eq!(p1.edges.len(), p2.edges.len(), "edge count must be stable");
    }

    /// Determinism contract:
    /// the offset distribution is a pure function of quality.
    #[test]
    fn offsets_are_reproducible_across_calls() {
        for q in 1..=8 {
            assert_eq!(rgss_offsets(q), rgss_offsets(q), "quality {q}");
        }
    }

    /// Determinism contract:
    /// two independently built frontends render bit-identical images.
    #[test]
    fn render_is_reproducible_across_frontends() {
        let token = RenderToken {
            params: EffectParams::Wavey(WaveyParams { scale: 60.0 }),
            quality: 2,
            width: 12,
            height: 12,
        };

        let mut source = ImageBuffer::new(12, 12);
        for y in 0..12 {
            for x in 0..12 {
                source.set_pixel(x, y, Vec4::new(x as f32 / 12.0, y as f32 / 12.0, 0.5, 1.0));
            }
        }

        let cancel = CancelToken::new();
        let render = |dev: &mut SoftwareDevice| {
            let mut fe = SampleMapRenderer::new();
            fe.build_output(dev, token, &cancel).expect("build");
            let out = fe.render(&source, &cancel).expect("render");
            fe.dispose(dev);
            out
        };

        let mut dev_a = SoftwareDevice::new();
        let mut dev_b = SoftwareDevice::new();
        assert_eq!(render(&mut dev_a), render(&mut dev_b));
    }
}
