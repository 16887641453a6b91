//! Renders the wavey transform twice: once with the default scale, then again
//! after a constant-only update (no topology rebuild). Writes `wavey_a.png`
//! and `wavey_b.png`.

use anyhow::Context;
use glam::Vec4;

use remap_core::RenderConfig;
use remap_effects::{EffectParams, WaveyParams};
use remap_renderer::{
    CancelToken, ImageBuffer, RenderToken, SampleMapRenderer, SoftwareDevice, TokenAction,
};

fn main() {
    if let Err(e) = run() {
        eprintln!("[remap demo] error: {e:#}");
        std::process::exit(1);
    }
}

fn stripes(width: u32, height: u32) -> ImageBuffer {
    let mut img = ImageBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let on = ((x / 8) % 2) as f32;
            img.set_pixel(x, y, Vec4::new(on, on, 1.0 - on, 1.0));
        }
    }
    img
}

fn save(img: &ImageBuffer, name: &str) -> anyhow::Result<()> {
    let png = image::RgbaImage::from_raw(img.width(), img.height(), img.to_rgba8())
        .context("assemble output image")?;
    png.save(name).with_context(|| format!("write {name}"))?;
    tracing::info!("wrote {name}");
    Ok(())
}

fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = RenderConfig {
        quality: 2,
        width: 256,
        height: 256,
    };
    let source = stripes(config.width, config.height);

    let token = |scale: f32| RenderToken {
        params: EffectParams::Wavey(WaveyParams { scale }),
        quality: config.quality,
        width: config.width,
        height: config.height,
    };

    let mut device = SoftwareDevice::new();
    let mut frontend = SampleMapRenderer::new();
    let cancel = CancelToken::new();

    frontend.build_output(&mut device, token(100.0), &cancel)?;
    tracing::info!(samples = frontend.sample_count(), "topology built");
    save(&frontend.render(&source, &cancel)?, "wavey_a.png")?;

    // A scale edit is non-structural: constants are refreshed in place.
    let action = frontend.apply_token(&mut device, token(40.0), &cancel)?;
    assert_eq!(action, TokenAction::UpdateOnly);
    tracing::info!(?action, "applied scale edit");
    save(&frontend.render(&source, &cancel)?, "wavey_b.png")?;

    frontend.dispose(&mut device);
    Ok(())
}
