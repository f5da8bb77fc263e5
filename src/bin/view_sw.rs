use anyhow::{Context, anyhow};
use clap::Parser;
use log::{LevelFilter, info};
use minifb::{Key, Window, WindowOptions};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use yadoom_bsp::{
    config::Settings,
    engine::Engine,
    renderer::{Compositor, Renderer, Software},
    wad::{Wad, load_level},
    world::{Player, TextureBank},
};

/// Map units per frame.
const MOVE_SPEED: f64 = 4.0;
/// Degrees per frame.
const TURN_SPEED: f64 = 2.5;

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Path to an IWAD or PWAD
    #[arg(value_name = "WAD")]
    wad: PathBuf,

    /// Index of the map inside the WAD (0 = first map marker)
    #[arg(long, default_value_t = 0)]
    map: usize,

    /// Integer up-scale of the 320×200 view
    #[arg(long, default_value_t = Settings::default().scale)]
    scale: usize,

    /// Horizontal field of view in degrees
    #[arg(long, default_value_t = Settings::default().fov)]
    fov: f64,

    /// Target frame rate
    #[arg(long, default_value_t = Settings::default().target_fps)]
    fps: usize,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();

    let level_filter = match opts.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    TermLogger::init(
        level_filter,
        ConfigBuilder::default()
            .set_time_level(LevelFilter::Trace)
            .build(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let settings = Settings {
        scale: opts.scale,
        fov: opts.fov,
        target_fps: opts.fps,
        ..Settings::default()
    };
    settings.validate()?;

    let wad = Wad::from_file(&opts.wad)
        .with_context(|| format!("opening {}", opts.wad.display()))?;
    let marker = *wad
        .level_indices()
        .get(opts.map)
        .ok_or_else(|| anyhow!("WAD has no map #{}", opts.map))?;

    let mut bank = TextureBank::new();
    let level = load_level(&wad, marker, &mut bank)?;
    let mut player =
        Player::spawn(&level).ok_or_else(|| anyhow!("{} has no player start", level.name))?;

    let (w, h) = (settings.width(), settings.height());
    let mut engine = Engine::new(&settings);
    let mut compositor = Compositor::new(w);
    let mut renderer = Software::default();

    let mut win = Window::new(
        &format!("{} - BSP view", level.name),
        w,
        h,
        WindowOptions::default(),
    )?;
    win.set_target_fps(settings.target_fps);
    info!(
        "{}: {}×{} @ {} fps, FOV {}°",
        level.name, w, h, settings.target_fps, settings.fov
    );

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        /* movement --------------------------------------------------------- */
        let down = |keys: &[Key]| keys.iter().any(|&k| win.is_key_down(k));
        if down(&[Key::Left]) {
            player.turn(TURN_SPEED);
        }
        if down(&[Key::Right]) {
            player.turn(-TURN_SPEED);
        }
        let mut forward = 0.0;
        let mut side = 0.0;
        if down(&[Key::Up, Key::W]) {
            forward += MOVE_SPEED;
        }
        if down(&[Key::Down, Key::S]) {
            forward -= MOVE_SPEED;
        }
        if down(&[Key::A]) {
            side -= MOVE_SPEED;
        }
        if down(&[Key::D]) {
            side += MOVE_SPEED;
        }
        player.step(forward, side);

        /* draw ------------------------------------------------------------- */
        let t0 = Instant::now();
        engine.render_frame(&level, &player, &mut compositor);
        renderer.begin_frame(w, h);
        compositor.flush(&mut renderer);
        acc_time += t0.elapsed();
        acc_frames += 1;

        let mut shown = Ok(());
        renderer.end_frame(|fb, w, h| shown = win.update_with_buffer(fb, w, h));
        shown?;

        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames as f64;
            info!(
                "avg render: {:.2} ms  ({} open columns at ({:.0}, {:.0}) {:.0}°)",
                avg_ms,
                engine.open_columns(),
                player.pos.x,
                player.pos.y,
                player.angle
            );
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}
