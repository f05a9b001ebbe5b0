// Copyright (c) 2026 rezky_nightky

mod cell;
mod color;
mod config;
mod drop;
mod edges;
mod fps;
mod frame;
mod pool;
mod rain;
mod runtime;
mod sampler;
mod terminal;
mod vec2;

use std::env;
use std::time::{Duration, Instant};

#[cfg(unix)]
use std::thread;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::config::{
    color_enabled_stdout, default_params_usage_for_help, print_help_detail, print_list_keys, Args,
    Settings,
};
use crate::frame::Frame;
use crate::rain::Rain;
use crate::runtime::ColorMode;
use crate::sampler::Photo;
use crate::terminal::{restore_terminal_best_effort, Terminal};

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

fn build_info() -> &'static str {
    env!("PHOTORAIN_BUILD")
}

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

fn require_f64_range(name: &str, v: f64, min: f64, max: f64) -> f64 {
    if !v.is_finite() {
        eprintln!("failed to apply {} {} (must be a finite number)", name, v);
        std::process::exit(1);
    }
    if v < min || v > max {
        eprintln!("failed to apply {} {} (min {} max {})", name, v, min, max);
        std::process::exit(1);
    }
    v
}

fn require_f32_range(name: &str, v: f32, min: f32, max: f32) -> f32 {
    if !v.is_finite() {
        eprintln!("failed to apply {} {} (must be a finite number)", name, v);
        std::process::exit(1);
    }
    if v < min || v > max {
        eprintln!("failed to apply {} {} (min {} max {})", name, v, min, max);
        std::process::exit(1);
    }
    v
}

fn require_u16_range(name: &str, v: u16, min: u16, max: u16) -> u16 {
    if v < min || v > max {
        eprintln!("failed to apply {} {} (min {} max {})", name, v, min, max);
        std::process::exit(1);
    }
    v
}

fn require_u32_range(name: &str, v: u32, min: u32, max: u32) -> u32 {
    if v < min || v > max {
        eprintln!("failed to apply {} {} (min {} max {})", name, v, min, max);
        std::process::exit(1);
    }
    v
}

fn require_usize_range(name: &str, v: usize, min: usize, max: usize) -> usize {
    if v < min || v > max {
        eprintln!("failed to apply {} {} (min {} max {})", name, v, min, max);
        std::process::exit(1);
    }
    v
}

fn detect_color_mode_auto() -> ColorMode {
    let colorterm = env::var("COLORTERM")
        .unwrap_or_default()
        .to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorMode::TrueColor;
    }

    let term = env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term == "dumb" {
        return ColorMode::Mono;
    }
    if term.contains("256color") {
        return ColorMode::Color256;
    }

    ColorMode::Color256
}

fn detect_color_mode(args: &Args) -> ColorMode {
    if let Some(m) = args.colormode {
        return match m {
            0 => ColorMode::Mono,
            16 => ColorMode::Color16,
            8 | 256 => ColorMode::Color256,
            24 | 32 => ColorMode::TrueColor,
            _ => {
                eprintln!("invalid --colormode: {} (allowed: 0,16,8/256,24/32)", m);
                std::process::exit(1);
            }
        };
    }

    detect_color_mode_auto()
}

fn color_mode_label(m: ColorMode) -> &'static str {
    match m {
        ColorMode::TrueColor => "24-bit truecolor",
        ColorMode::Color256 => "8-bit (256-color)",
        ColorMode::Mono => "mono",
        ColorMode::Color16 => "16-color",
    }
}

fn main() -> std::io::Result<()> {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(130);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }

    let mut cmd = Args::command();
    cmd = cmd.styles(clap_styles());
    cmd = cmd.before_help(default_params_usage_for_help());
    let help_template = if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    };
    cmd = cmd.help_template(help_template);
    cmd.build();

    if cmd.get_arguments().any(|a| a.get_id().as_str() == "help") {
        cmd = cmd.mut_arg("help", |a| a.help_heading("HELP"));
    }
    cmd.build();

    let matches = cmd.get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if args.list_keys {
        print_list_keys();
        return Ok(());
    }

    if args.help_detail {
        print_help_detail();
        return Ok(());
    }

    if args.check_bitcolor {
        let colorterm = env::var("COLORTERM").unwrap_or_default();
        let term = env::var("TERM").unwrap_or_default();
        let auto = detect_color_mode_auto();
        let effective = detect_color_mode(&args);

        println!("BITCOLOR CHECK:");
        println!(
            "  COLORTERM: {}",
            if colorterm.is_empty() {
                "(unset)"
            } else {
                &colorterm
            }
        );
        println!(
            "  TERM: {}",
            if term.is_empty() { "(unset)" } else { &term }
        );
        println!("  auto_detected: {}", color_mode_label(auto));
        if args.colormode.is_some() {
            println!("  forced: {}", color_mode_label(effective));
        }
        println!("  effective: {}", color_mode_label(effective));
        return Ok(());
    }

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.info {
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        println!("Build: {}", build_info());
        println!("Copyright: (c) 2026 {}", env!("CARGO_PKG_AUTHORS"));
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        return Ok(());
    }

    let color_mode = detect_color_mode(&args);

    let target_fps = require_f64_range("--fps", args.fps, 1.0, 240.0);
    let duration_s = args.duration.map(|s| {
        if !s.is_finite() {
            eprintln!("failed to apply --duration {} (must be a finite number)", s);
            std::process::exit(1);
        }
        if s > 0.0 {
            return require_f64_range("--duration", s, 0.1, 86400.0);
        }
        s
    });

    require_usize_range("--count", args.count, 0, 100_000);
    require_f64_range("--gravity", args.gravity, 0.0, 10.0);
    require_f64_range("--length low", args.length.low, 1.0, 500.0);
    require_f64_range("--length high", args.length.high, 1.0, 500.0);
    require_f64_range("--speed low", args.speed.low, 0.0, 100.0);
    require_f64_range("--speed high", args.speed.high, 0.0, 100.0);
    require_u16_range("--stroke", args.stroke, 1, 5);
    require_f64_range("--margin", args.margin, 0.0, 100.0);
    require_u32_range("--precision", args.precision, 1, 20);
    require_f32_range("--fade", args.fade, 0.01, 1.0);

    let settings = Settings::from_args(&args);

    // Decode before raw mode so a failure message stays visible. A missing
    // or broken image leaves sampling in the plain rain color permanently.
    let mut photo = None;
    if let Some(path) = &args.image {
        match Photo::load(path) {
            Ok(p) => photo = Some(p),
            Err(e) => eprintln!(
                "failed to load image {}: {} (continuing without photo colors)",
                path.display(),
                e
            ),
        }
    }

    let mut term = Terminal::new(color_mode)?;
    let (w, h) = term.size()?;

    let mut rain = Rain::new(settings, (w, h), args.seed);
    if let Some(p) = photo {
        rain.load_photo(p);
    }

    let mut frame = Frame::new(w, h, color::BACKGROUND);

    let start_time = Instant::now();
    let end_time = args.duration.and_then(|s| {
        if !s.is_finite() || s <= 0.0 {
            return None;
        }
        let s = duration_s.unwrap_or(s);
        Some(start_time + Duration::from_secs_f64(s))
    });

    let target_period = Duration::from_secs_f64(1.0 / target_fps);
    let mut next_frame = Instant::now();
    let mut running = true;

    let mut perf_frames: u64 = 0;
    let mut perf_drawn_frames: u64 = 0;
    let mut perf_work_sum_s: f64 = 0.0;
    let mut perf_work_max_s: f64 = 0.0;

    while running {
        if end_time.is_some_and(|end| Instant::now() >= end) {
            break;
        }
        let mut pending_resize: Option<(u16, u16)> = None;

        loop {
            while Terminal::poll_event(Duration::from_millis(0))? {
                let ev = Terminal::read_event()?;
                match ev {
                    Event::Resize(nw, nh) => {
                        pending_resize = Some((nw, nh));
                    }
                    Event::Key(k) if k.kind == KeyEventKind::Press => {
                        if args.screensaver {
                            running = false;
                            break;
                        }

                        match (k.code, k.modifiers) {
                            (KeyCode::Esc, _) => running = false,
                            (KeyCode::Char('q'), _) => running = false,
                            (KeyCode::Char(' '), _) => {
                                rain.repopulate();
                                frame.clear();
                            }
                            (KeyCode::Char('p'), _) => {
                                rain.toggle_pause();
                            }
                            (KeyCode::Char('f'), _) => {
                                rain.toggle_fps();
                            }
                            (KeyCode::Up, _) => {
                                let g = (rain.settings.gravity + 0.01).min(10.0);
                                rain.set_gravity(g);
                            }
                            (KeyCode::Down, _) => {
                                let g = (rain.settings.gravity - 0.01).max(0.0);
                                rain.set_gravity(g);
                            }
                            (KeyCode::Char('+'), _) | (KeyCode::Char('='), KeyModifiers::SHIFT) => {
                                let n = (rain.settings.count + 100).min(100_000);
                                rain.set_count(n);
                            }
                            (KeyCode::Char('-'), _) => {
                                let n = rain.settings.count.saturating_sub(100);
                                rain.set_count(n);
                            }
                            (KeyCode::Char('['), _) => {
                                let p = rain.settings.precision.saturating_sub(1).max(1);
                                rain.set_precision(p);
                            }
                            (KeyCode::Char(']'), _) => {
                                let p = (rain.settings.precision + 1).min(20);
                                rain.set_precision(p);
                            }
                            (KeyCode::Left, _) => {
                                let sw = rain.settings.stroke_width.saturating_sub(1).max(1);
                                rain.set_stroke_width(sw);
                            }
                            (KeyCode::Right, _) => {
                                let sw = (rain.settings.stroke_width + 1).min(5);
                                rain.set_stroke_width(sw);
                            }
                            _ => {}
                        }
                    }
                    _ => {}
                }
            }

            if !running || pending_resize.is_some() {
                break;
            }

            let now = Instant::now();
            if now >= next_frame {
                break;
            }

            let mut timeout = next_frame - now;
            if let Some(end) = end_time {
                if now >= end {
                    break;
                }
                timeout = timeout.min(end - now);
            }
            let _ = Terminal::poll_event(timeout)?;
        }

        if !running {
            break;
        }

        if let Some((nw, nh)) = pending_resize {
            rain.handle_resize(nw, nh);
            frame = Frame::new(nw, nh, color::BACKGROUND);
        }

        let work_start = Instant::now();
        rain.tick(&mut frame);
        let did_draw = frame.is_dirty_all() || !frame.dirty_indices().is_empty();
        if did_draw {
            term.draw(&mut frame)?;
        }
        let work_s = work_start.elapsed().as_secs_f64();

        if args.perf_stats {
            perf_frames = perf_frames.saturating_add(1);
            if did_draw {
                perf_drawn_frames = perf_drawn_frames.saturating_add(1);
            }
            perf_work_sum_s += work_s;
            perf_work_max_s = perf_work_max_s.max(work_s);
        }

        next_frame += target_period;
        let now = Instant::now();
        if now > next_frame {
            next_frame = now;
        }
    }

    if args.perf_stats {
        drop(term);
        let elapsed = start_time.elapsed();
        let elapsed_s = elapsed.as_secs_f64().max(0.000_001);

        let frames = perf_frames.max(1);
        let avg_work_ms = (perf_work_sum_s / frames as f64) * 1000.0;
        let avg_fps = (perf_frames as f64) / elapsed_s;
        let drawn_ratio = (perf_drawn_frames as f64) / (perf_frames as f64).max(1.0);

        println!("PERF STATS:");
        println!("  elapsed_s: {:.3}", elapsed_s);
        println!("  target_fps: {:.3}", target_fps);
        println!("  avg_fps: {:.3}", avg_fps);
        println!("  frames: {}", perf_frames);
        println!(
            "  drawn_frames: {} ({:.1}%)",
            perf_drawn_frames,
            drawn_ratio * 100.0
        );
        println!("  avg_work_ms: {:.3}", avg_work_ms);
        println!("  max_work_ms: {:.3}", perf_work_max_s * 1000.0);
    }

    Ok(())
}
