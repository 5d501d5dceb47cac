//! Headless framebus demo.
//!
//! Wires the reference scene end to end without a windowing host: mounts a
//! display and a pointer, spawns the cursor-follow consumer, draws a
//! checkerboard and the eight rotated sprite variants, then ticks the
//! refresh loop while synthetic pointer input sweeps the cursor across the
//! screen.
//!
//! ```bash
//! RUST_LOG=debug cargo run --bin framebus-demo
//! ```

use std::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::EnvFilter;

use framebus::runtime::run_consumer;
use framebus::{Config, Display, EventPayload, MemorySurface, Pointer, Runtime};

/// The rotated-sprite glyph from the reference scene.
const SPRITE: &str = concat!(
    "00000000", "07000000", "07700000", "07770000", "07798000", "07988800", "09888880",
    "00000000"
);

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::default();
    let (width, height) = (config.display.width, config.display.height);
    let mut runtime = Runtime::new(&config)?;

    let surface = Arc::new(Mutex::new(MemorySurface::new(width, height)));
    let overlay = Arc::new(Mutex::new(MemorySurface::new(width, height)));
    let display = Display::new(
        Box::new(surface.clone()),
        Box::new(overlay.clone()),
        runtime.palette().clone(),
    );
    let handle = display.handle();

    // The scene: light-grey wash, checkerboard, sprite in all 8 variants.
    handle.clear(6)?;
    for i in 0..8 {
        for j in 0..12 {
            if (i + j) % 2 == 1 {
                handle.rectangle(j * 16, i * 16, 16, 16, true, Some(5))?;
            }
        }
    }
    let sprite = display.image(8, 8, SPRITE);
    for step in 0..8u8 {
        display.blit_flipped(&sprite, step, u32::from(step) * 8, 8);
    }

    let pointer = Pointer::new(width, height);
    let injector = pointer.injector();
    injector.set_scale(config.display.scale);
    runtime.registry_mut().mount(Box::new(display));
    runtime.registry_mut().mount(Box::new(pointer));

    // Cursor-follow consumer: pull events, redraw the cursor on each move.
    let stop = Arc::new(AtomicBool::new(false));
    let cursor = runtime
        .registry()
        .get("display")
        .and_then(|capability| capability.as_display().cloned())
        .expect("display was just mounted");
    let consumer = {
        let bus = runtime.bus();
        let stop = stop.clone();
        thread::spawn(move || {
            run_consumer(&bus, &stop, |event| {
                if let EventPayload::PointerMove { x, y } = event.payload {
                    cursor.cursor_draw(x, y);
                }
            });
        })
    };

    // Host loop: sweep the pointer while ticking refresh at ~60 fps.
    for frame in 0..60u32 {
        injector.inject(frame * 3 % width, frame * 2 % height);
        handle.refresh();
        thread::sleep(Duration::from_millis(16));
    }

    stop.store(true, Ordering::Release);
    runtime.shutdown();
    consumer.join().expect("consumer thread panicked");

    let lit = surface
        .lock()
        .unwrap()
        .pixels()
        .iter()
        .filter(|px| px.a != 0)
        .count();
    info!(width, height, lit, "demo finished");
    Ok(())
}
