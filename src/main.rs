//! Bean Drop entry point
//!
//! Runs a headless session against the rapier physics backend and writes
//! the final frame as an SVG document.
//!
//! Usage: `bean-drop [settings.json|-] [out.svg]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use bean_drop::consts::SIM_DT_MS;
    use bean_drop::physics::{PhysicsWorld, RapierWorld};
    use bean_drop::platform::HeadlessHost;
    use bean_drop::renderer::{BeanArt, SvgSurface};
    use bean_drop::sim::{Stage, StageEvent, Viewport};
    use bean_drop::{BeanError, Settings};
    use glam::Vec2;

    const STAGE_WIDTH: f32 = 1280.0;
    const STAGE_HEIGHT: f32 = 800.0;
    /// Frames to let the pile settle after the last burst (~5s)
    const SETTLE_FRAMES: usize = 300;

    pub fn run() -> Result<(), BeanError> {
        let mut args = std::env::args().skip(1);
        let settings = match args.next() {
            Some(path) if path != "-" => Settings::load(path)?,
            _ => Settings::default(),
        };
        let out = args.next().unwrap_or_else(|| "beans.svg".to_string());

        let host = HeadlessHost::new(STAGE_WIDTH, STAGE_HEIGHT);
        let mut stage = Stage::new(
            &host,
            RapierWorld::new(),
            SvgSurface::new(Viewport::new(STAGE_WIDTH, STAGE_HEIGHT)),
            settings,
            BeanArt::default(),
        )?;

        stage.start();
        let mut frames = 0;
        while stage.spawner().is_active() {
            stage.frame(SIM_DT_MS);
            frames += 1;
        }
        log::info!("{} beans spawned after {} frames", stage.bean_count(), frames);
        settle(&mut stage, SETTLE_FRAMES);

        // Pick up the first bean, lift it and toss it
        let first = stage.scene().beans.bodies().first().copied();
        if let Some(pose) = first.and_then(|body| stage.scene().world.pose(body)) {
            stage.push_event(StageEvent::PointerDown(pose.position));
            for i in 1..=30 {
                let lift = Vec2::new(0.0, -10.0 * i as f32);
                stage.push_event(StageEvent::PointerMove(pose.position + lift));
                stage.frame(SIM_DT_MS);
            }
            stage.push_event(StageEvent::PointerUp);
            settle(&mut stage, 120);
        }

        // Shrink the window; only the last size is applied
        stage.push_event(StageEvent::Resize {
            width: STAGE_WIDTH * 0.9,
            height: STAGE_HEIGHT,
        });
        stage.push_event(StageEvent::Resize {
            width: STAGE_WIDTH * 0.75,
            height: STAGE_HEIGHT * 0.9,
        });
        settle(&mut stage, SETTLE_FRAMES);

        let svg = stage.scene().surface.to_svg();
        std::fs::write(&out, svg)?;
        log::info!(
            "Wrote {} beans ({} bodies) to {}",
            stage.bean_count(),
            stage.scene().world.body_count(),
            out
        );
        Ok(())
    }

    fn settle(stage: &mut Stage<RapierWorld, SvgSurface>, frames: usize) {
        for _ in 0..frames {
            stage.frame(SIM_DT_MS);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Bean Drop (native) starting...");

    if let Err(e) = native::run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser front end; the library is driven by the host
}
