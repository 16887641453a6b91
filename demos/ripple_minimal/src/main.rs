//! Renders the built-in ripple preset over a generated test card and writes
//! `ripple.png`. Pass a JSON path to override the render config, e.g.
//! `{ "quality": 4, "width": 512, "height": 512 }`.

use anyhow::Context;
use glam::Vec4;

use remap_core::{load_render_config_from, RenderConfig};
use remap_effects::EffectPreset;
use remap_renderer::{CancelToken, ImageBuffer, RenderToken, SampleMapRenderer, SoftwareDevice};

fn main() {
    if let Err(e) = run() {
        eprintln!("[remap demo] error: {e:#}");
        std::process::exit(1);
    }
}

fn test_card(width: u32, height: u32) -> ImageBuffer {
    let mut img = ImageBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            // Diagonal gradient with a checker overlay; distortion is easy to
            // see against it.
            let checker = ((x / 16 + y / 16) % 2) as f32;
            img.set_pixel(
                x,
                y,
                Vec4::new(
                    x as f32 / width as f32,
                    y as f32 / height as f32,
                    0.25 + 0.5 * checker,
                    1.0,
                ),
            );
        }
    }
    img
}

fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => load_render_config_from(&path).context("load render config")?,
        None => RenderConfig {
            quality: 3,
            width: 256,
            height: 256,
        },
    };
    tracing::info!(?config, "rendering ripple preset");

    let source = test_card(config.width, config.height);
    let token = RenderToken {
        params: EffectPreset::Ripple.params(),
        quality: config.quality,
        width: config.width,
        height: config.height,
    };

    let mut device = SoftwareDevice::new();
    let mut frontend = SampleMapRenderer::new();
    let cancel = CancelToken::new();

    frontend.build_output(&mut device, token, &cancel)?;
    tracing::info!(samples = frontend.sample_count(), "topology built");

    let output = frontend.render(&source, &cancel)?;
    frontend.dispose(&mut device);

    let png = image::RgbaImage::from_raw(config.width, config.height, output.to_rgba8())
        .context("assemble output image")?;
    png.save("ripple.png").context("write ripple.png")?;
    tracing::info!("wrote ripple.png");

    Ok(())
}
