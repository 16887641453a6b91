#![forbid(unsafe_code)]

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use glam::Vec2;
    use remap_effects::rgss::rgss_offsets;
    use remap_effects::{BankSet, EffectParams, RippleParams};
    use remap_renderer::{
        CancelToken, RenderToken, SampleMapRenderer, SoftwareDevice, StageDevice, TokenAction,
    };

    // ---- Golden fixtures (JSON contracts) ----
    const BANKS_BUILTIN_JSON: &str = include_str!("../fixtures/banks_builtin.json");
    const BANKS_BAD_PRESET_JSON: &str = include_str!("../fixtures/banks_bad_preset.json");
    const BANKS_EMPTY_JSON: &str = include_str!("../fixtures/banks_empty.json");
    const BANKS_MISSING_KEY_JSON: &str = include_str!("../fixtures/banks_missing_key.json");

    fn write_temp_fixture(name: &str, contents: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis();
        p.push(format!("remap_contract_tests_{name}_{ts}.json"));
        fs::write(&p, contents).expect("write fixture");
        p
    }

    #[test]
    fn golden_banks_builtin_json_deserializes() {
        let path = write_temp_fixture("banks_builtin", BANKS_BUILTIN_JSON);

        let banks = BankSet::from_json_path(&path).expect("banks_builtin.json should parse");
        assert!(!banks.banks.is_empty(), "builtin banks should not be empty");

        // Keep stable but not overly strict: ensure at least one bank has at least one preset.
        let any_preset = banks.banks.iter().any(|b| !b.presets.is_empty());
        assert!(any_preset, "expected at least one preset in builtin banks");

        let _ = fs::remove_file(path);
    }

    #[test]
    fn golden_banks_empty_is_rejected() {
        let path = write_temp_fixture("banks_empty", BANKS_EMPTY_JSON);

        let err = BankSet::from_json_path(&path).expect_err("banks_empty.json must fail (empty banks)");

        // Keep this stable but not overly strict.
        assert!(
            err.to_lowercase().contains("banks") || err.to_lowercase().contains("empty"),
            "expected error to mention banks/empty, got: {err}"
        );

        let _ = fs::remove_file(path);
    }

    #[test]
    fn golden_banks_missing_key_is_rejected() {
        let path = write_temp_fixture("banks_missing_key", BANKS_MISSING_KEY_JSON);

        let err = BankSet::from_json_path(&path)
            .expect_err("banks_missing_key.json must fail (missing key)");

        // Keep this stable but not overly strict.
        assert!(
            err.to_lowercase().contains("missing") || err.to_lowercase().contains("key"),
            "expected error to mention missing/key, got: {err}"
        );

        let _ = fs::remove_file(path);
    }

    #[test]
    fn golden_banks_unknown_preset_is_rejected() {
        let path = write_temp_fixture("banks_bad_preset", BANKS_BAD_PRESET_JSON);

        let err = BankSet::from_json_path(&path)
            .expect_err("banks_bad_preset.json must fail (unknown preset)");

        // Keep this stable but not overly strict.
        assert!(
            err.to_lowercase().contains("unknown preset"),
            "expected error to mention 'unknown preset', got: {err}"
        );

        let _ = fs::remove_file(path);
    }

    // ---- Offset-distribution contracts (backend-agnostic) ----

    #[test]
    fn offsets_quality_two_golden_values() {
        // The documented distribution: y = (i+1)/(N+1), x = frac(y*q),
        // offset = (x-0.5, y-0.5). These exact values are a contract; a
        // different (even "better") distribution breaks reproducibility for
        // hosts that cache renders.
        let expected = [
            Vec2::new(-0.1, -0.3),
            Vec2::new(0.3, -0.1),
            Vec2::new(-0.3, 0.1),
            Vec2::new(0.1, 0.3),
        ];
        let got = rgss_offsets(2);
        assert_eq!(got.len(), 4);
        for (g, e) in got.iter().zip(expected.iter()) {
            assert!((*g - *e).abs().max_element() < 1e-6, "got {g:?}, expected {e:?}");
        }
    }

    #[test]
    fn offsets_quality_one_is_centered() {
        assert_eq!(rgss_offsets(1), vec![Vec2::ZERO]);
    }

    // ---- Rebuild-vs-update contracts (host-observable) ----

    fn token(quality: u32, amplitude: f32) -> RenderToken {
        RenderToken {
            params: EffectParams::Ripple(RippleParams {
                amplitude,
                ..RippleParams::default()
            }),
            quality,
            width: 8,
            height: 8,
        }
    }

    #[test]
    fn non_structural_edit_keeps_stage_resources() {
        let mut dev = SoftwareDevice::new();
        let mut fe = SampleMapRenderer::new();
        let cancel = CancelToken::new();

        fe.build_output(&mut dev, token(2, 10.0), &cancel).expect("build");
        let ids = fe.stage_ids();

        let action = fe.apply_token(&mut dev, token(2, 20.0), &cancel).expect("update");
        assert_eq!(action, TokenAction::UpdateOnly);
        assert_eq!(fe.stage_ids(), ids);
    }

    #[test]
    fn structural_edit_changes_stage_count() {
        let mut dev = SoftwareDevice::new();
        let mut fe = SampleMapRenderer::new();
        let cancel = CancelToken::new();

        fe.build_output(&mut dev, token(2, 10.0), &cancel).expect("build");
        assert_eq!(fe.sample_count(), 4);

        let action = fe.apply_token(&mut dev, token(3, 10.0), &cancel).expect("rebuild");
        assert_eq!(action, TokenAction::Rebuild);
        assert_eq!(fe.sample_count(), 9);
        assert_eq!(dev.live_stages(), 9);
    }
}

#[cfg(test)]
mod determinism;
