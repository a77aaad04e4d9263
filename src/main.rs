// What you SEE:
// • "Tracking": the mirrored live camera with a button row on top and your drawing on it.
// • "Mask": the marker mask the tracker works from (white = marker color).
// • Move the marker over CLEAR ALL to wipe the canvas, over a color button to switch ink.
// • Hide the marker to lift the pen. C clears, Q / ESC quits.

mod args;
mod assets;
mod camera;
mod compositor;
mod config;
mod draw;
mod error;
mod hsv;
mod ledger;
mod pointer;
mod session;
mod toolbar;
mod types;
mod vision;

#[cfg(test)]
mod test_utils;

use args::Args;
use camera::CameraCapture;
use clap::Parser;
use config::{AppConfig, OverlayConfig};
use draw::Drawer;
use error::Error;
use log::{debug, error, info};
use session::Session;
use std::time::{Duration, Instant};
use types::FrameBuffer;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Args::parse()) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Error> {
    /* --- Configuration ---
       Fails before any window opens if the layout or thresholds are unusable. */
    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(index) = args.camera {
        config.camera.index = index;
    }
    if let Some(logo) = args.logo {
        config.overlay = Some(OverlayConfig::default_slot(logo));
    }
    config.validate()?;

    if args.print_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }
    match &args.config {
        Some(path) => info!("config loaded from {}", path.display()),
        None => info!("using built-in config"),
    }

    /* --- Camera + windows ---
       Visual: the tracking window (and the mask window) open with the live feed. */
    let mut cam = CameraCapture::open(&config.camera)?;
    let (w, h) = cam.resolution();
    config.check_overlay_fits(w, h)?;
    let overlay = config.overlay.as_ref().map(assets::load_overlay).transpose()?;

    let mut session = Session::new(&config, overlay)?;
    info!("toolbar band: y <= {}", session.toolbar().band_bottom());
    for b in session.toolbar().buttons() {
        info!("button {:?} at x {}..={} -> {:?}", b.label, b.rect.x0, b.rect.x1, b.action);
    }

    let mut tracking_window = Drawer::new("Tracking", w as usize, h as usize)?;
    let mut mask_window = if args.no_mask_window {
        None
    } else {
        Some(Drawer::new("Mask", w as usize, h as usize)?)
    };

    /* --- FPS ---
       Logged once per second at debug level. */
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut last_action = None;

    /* ------------------------------ Main loop ------------------------------ */
    while !tracking_window.quit_requested()
        && !mask_window.as_ref().is_some_and(|m| m.quit_requested())
    {
        let now = Instant::now();

        // 1) Grab a fresh live frame (mirrored already).
        let live = cam.next_frame()?;

        // 2) Keyboard shortcut for the CLEAR ALL button.
        if tracking_window.c_pressed_once() {
            session.apply_action(toolbar::ToolbarAction::Clear);
        }

        // 3) Mask -> pointer -> toolbar / ledger -> composited frame.
        let out = session.step(&live);

        if out.action != last_action {
            if let Some(action) = out.action {
                debug!("toolbar hit: {action:?}");
            }
            last_action = out.action;
        }

        // 4) Present both windows.
        tracking_window.present(&out.frame)?;
        if let Some(mask_window) = mask_window.as_mut() {
            mask_window.present(&FrameBuffer::from_mask(&out.mask))?;
        }

        // 5) FPS counter
        frames_this_second += 1;
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let strokes: usize = session.ledger().tracks().iter().map(|t| t.stroke_count()).sum();
            debug!(
                "FPS: {:.1} | {} strokes, {} points | pointer {:?}",
                frames_this_second as f32 / secs,
                strokes,
                session.ledger().total_points(),
                out.reading.position()
            );
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    info!("bye");
    Ok(())
}
