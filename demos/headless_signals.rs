//! # Headless Signals
//!
//! Drives a straight line and a curve for a few simulated seconds without a
//! window. Signals with random speeds run in both directions while a
//! camera-facing label follows the orbiting camera.
//!
//! Run with `RUST_LOG=debug cargo run --example headless_signals`.

use haggis_signals::prelude::*;
use rand::Rng;

const FRAME_TIME: f32 = 1.0 / 60.0;
const SECONDS: u32 = 4;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let camera = OrbitCamera::new(120.0, 0.4, 0.0, Point3::new(50.0, 0.0, 0.0));
    let mut scene = Scene::with_camera(camera);
    let mut driver = LineDriver::new();

    let mut street = SignalLine::new(
        SignalLineOptions::default()
            .with_path(vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(40.0, 0.0, 0.0),
                Point3::new(40.0, 0.0, 40.0),
                Point3::new(100.0, 0.0, 40.0),
            ])
            .with_material(LineMaterial::default().with_color(Color::from_hex(0x44aa88)))
            .with_debug(true),
        &mut scene,
    )?;
    street.add_label(
        LabelOptions::default()
            .with_text("street")
            .with_anchor(AnchorMode::Start),
        &mut scene,
    )?;
    street.add_label(
        LabelOptions::default().with_text("camera").facing_camera(),
        &mut scene,
    )?;

    let arc = SignalLine::new(
        SignalLineOptions::curve(
            Point3::new(0.0, 0.0, -20.0),
            Point3::new(50.0, 30.0, -20.0),
            Point3::new(100.0, 0.0, -20.0),
        ),
        &mut scene,
    )?;

    log::info!(
        "street is {:.1} units long, arc is {:.1}",
        street.line_length(),
        arc.line_length()
    );

    driver.add_line("street", street, &mut scene);
    driver.add_line("arc", arc, &mut scene);

    let mut rng = rand::rng();
    let frames = SECONDS * 60;

    for frame in 0..frames {
        // A new signal on each line every half second
        if frame % 30 == 0 {
            for name in ["street", "arc"] {
                let speed = rng.random_range(40.0..120.0);
                let mut options = SignalOptions::default().with_speed(speed).with_size(4.0);
                if rng.random_bool(0.5) {
                    options = options.backward();
                }

                if let Some(line) = driver.line_mut(name) {
                    let id = line.send(options, &mut scene)?;
                    log::debug!("sent {} on {} at {:.1} u/s", id, name, speed);
                }
            }
        }

        if let Some(camera) = scene.camera.as_mut() {
            camera.add_yaw(0.01);
        }

        driver.update(FRAME_TIME, &mut scene)?;

        if frame % 60 == 59 {
            let stats = scene.get_statistics();
            log::info!(
                "t={}s: {} markers live, {} drawables released",
                (frame + 1) / 60,
                stats.marker_count,
                stats.released_count
            );
        }
    }

    driver.dispose_all(&mut scene);
    let stats = scene.get_statistics();
    println!(
        "done: {} drawables left, {} released",
        stats.object_count, stats.released_count
    );

    Ok(())
}
