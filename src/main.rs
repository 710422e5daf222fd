//! Sketchkit - headless demo driver
//!
//! Runs the bouncing-ball scene and the logo reassemble animation against a
//! recording canvas and logs what a renderer would receive.
//!
//! Usage: `sketchkit [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::cell::Cell;
    use std::f64::consts::TAU;
    use std::rc::Rc;

    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use sketchkit::events::{Event, EventKind};
    use sketchkit::logo::{Grid, MakeabilityLabLogo};
    use sketchkit::renderer::{CommandBuffer, tessellate, vertex};
    use sketchkit::serial::{LoopbackTransport, SerialLink, SerialOptions, ShapeFrame};
    use sketchkit::sim::{BounceScene, TickInput, tick};
    use sketchkit::{LineSegment, SketchSettings, Vector2};

    const DEMO_FRAMES: u64 = 600;
    const REASSEMBLE_STEP: f64 = 0.08;
    const REASSEMBLE_MAX_FRAMES: usize = 1000;

    type DemoResult = Result<(), Box<dyn std::error::Error>>;

    pub fn run() -> DemoResult {
        let settings = match std::env::args().nth(1) {
            Some(path) => SketchSettings::load_or_default(path),
            None => SketchSettings::default(),
        };

        run_bounce_scene(&settings)?;
        run_logo(&settings)?;
        run_serial(&settings)?;
        Ok(())
    }

    fn run_bounce_scene(settings: &SketchSettings) -> DemoResult {
        let mut scene = BounceScene::new(settings.clone())?;
        let (w, h) = (settings.canvas_width, settings.canvas_height);
        scene.add_segment(LineSegment::from_coords(w * 0.15, h * 0.7, w * 0.6, h * 0.85));
        let tracked = scene.add_segment(LineSegment::from_coords(w * 0.5, h * 0.5, w * 0.8, h * 0.3));
        scene.track_mouse_with(tracked);

        let collisions = Rc::new(Cell::new(0usize));
        let counter = Rc::clone(&collisions);
        let subscription = scene.events.subscribe(EventKind::Collision, move |event| {
            if let Event::Collision { .. } = event {
                counter.set(counter.get() + 1);
            }
        });

        let center = Vector2::new(w / 2.0, h / 2.0);
        let mut canvas = CommandBuffer::new();
        let mut vertex_count = 0;
        for frame in 0..DEMO_FRAMES {
            // Sweep the mouse around the canvas center
            let angle = TAU * frame as f64 / DEMO_FRAMES as f64;
            let input = TickInput {
                mouse: Some(center + Vector2::from_angle(angle) * h * 0.3),
                ..Default::default()
            };
            tick(&mut scene, &input);

            canvas.clear();
            scene.draw(&mut canvas);
            vertex_count = tessellate(&canvas.commands).len();
        }
        scene.events.unsubscribe(subscription);

        log::info!(
            "Bounce scene: {} frames, {} collisions, last frame {} commands / {} vertices",
            scene.frame,
            collisions.get(),
            canvas.len(),
            vertex_count
        );
        Ok(())
    }

    fn run_logo(settings: &SketchSettings) -> DemoResult {
        let size = settings.triangle_size;
        let (w, h) = (settings.canvas_width, settings.canvas_height);

        let grid = Grid::new(w, h, size)?;
        let mut logo = MakeabilityLabLogo::new(0.0, 0.0, size)?;
        logo.set_position((w - logo.width()) / 2.0, (h - logo.height()) / 2.0);
        logo.m_outline_visible = true;

        let mut rng = Pcg32::seed_from_u64(settings.seed);
        logo.scatter(&mut rng, w, h);

        let mut frames = 0;
        while !logo.is_home(0.5) && frames < REASSEMBLE_MAX_FRAMES {
            logo.step_toward_home(REASSEMBLE_STEP);
            frames += 1;
        }
        log::info!("Logo reassembled in {} frames", frames);

        let mut canvas = CommandBuffer::new();
        grid.draw(&mut canvas);
        logo.draw(&mut canvas);
        let vertices = tessellate(&canvas.commands);
        log::info!(
            "Logo over {}x{} grid: {} commands, {} vertices ({} bytes)",
            grid.rows,
            grid.cols,
            canvas.len(),
            vertices.len(),
            vertex::as_bytes(&vertices).len()
        );
        Ok(())
    }

    fn run_serial(settings: &SketchSettings) -> DemoResult {
        let mut scene_events = sketchkit::events::EventBus::new();
        let mut link = SerialLink::new(LoopbackTransport::default());
        link.connect(&SerialOptions::from(settings), &mut scene_events)?;

        for line in link.on_data_received("0, 0.25, 0\r\n2, 0.8", &mut scene_events) {
            match line.parse::<ShapeFrame>() {
                Ok(frame) => {
                    log::info!("Received frame {:?}", frame);
                    link.send_frame(&frame)?;
                }
                Err(e) => log::warn!("Ignoring serial line {:?}: {}", line, e),
            }
        }
        log::info!("Echoed {} serial frames", link.transport().written.len());
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::init();
    log::info!("Sketchkit (native) starting...");

    match native::run() {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Demo failed: {}", e);
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host page on the web
}
