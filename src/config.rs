// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;

pub const DEFAULT_PARAMS_USAGE: &str = "DEFAULT PARAMS USAGE:\n  photorain --image ./image.jpeg --fps 60 --count 1200 --gravity 0.05 --length 7,12 --speed 1,4 --stroke 1 --margin 0 --precision 1 --fade 0.1";

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

fn colorize_help_detail(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 64);
    for chunk in text.split_inclusive('\n') {
        let (line, nl) = chunk
            .strip_suffix('\n')
            .map(|l| (l, "\n"))
            .unwrap_or((chunk, ""));

        let is_heading =
            !line.starts_with(' ') && line.ends_with(':') && line == line.to_ascii_uppercase();

        if is_heading {
            out.push_str("\x1b[1;36m");
            out.push_str(line);
            out.push_str("\x1b[0m");
            out.push_str(nl);
            continue;
        }

        if let Some(rest) = line.strip_prefix("      Example:") {
            out.push_str("      \x1b[32mExample:\x1b[0m");
            out.push_str(rest);
            out.push_str(nl);
            continue;
        }

        if let Some(rest) = line.strip_prefix("  photorain") {
            out.push_str("  \x1b[1;34mphotorain\x1b[0m");
            out.push_str(rest);
            out.push_str(nl);
            continue;
        }

        if let Some(rest) = line.strip_prefix("  -") {
            out.push_str("  \x1b[33m-");
            out.push_str(rest);
            out.push_str("\x1b[0m");
            out.push_str(nl);
            continue;
        }

        out.push_str(line);
        out.push_str(nl);
    }
    out
}

pub fn default_params_usage_for_help() -> String {
    if color_enabled_stdout() {
        colorize_help_detail(DEFAULT_PARAMS_USAGE)
    } else {
        DEFAULT_PARAMS_USAGE.to_string()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct F64Range {
    pub low: f64,
    pub high: f64,
}

impl FromStr for F64Range {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = s
            .split_once(',')
            .ok_or_else(|| "expected: NUM1,NUM2".to_string())?;
        let low: f64 = a
            .trim()
            .parse()
            .map_err(|_| "invalid low value".to_string())?;
        let high: f64 = b
            .trim()
            .parse()
            .map_err(|_| "invalid high value".to_string())?;
        if !low.is_finite() || !high.is_finite() {
            return Err("range values must be finite".to_string());
        }
        if low < 0.0 || low > high {
            return Err("range must be >=0 and low <= high".to_string());
        }
        Ok(Self { low, high })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "photorain", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        short = 'I',
        long = "image",
        help_heading = "IMAGE",
        help = "Background photo to sample drop colors from (jpeg/png/webp)"
    )]
    pub image: Option<PathBuf>,

    #[arg(
        short = 'p',
        long = "precision",
        default_value_t = 1,
        help_heading = "IMAGE",
        help = "Pixel sampling stride (min 1 max 20); >1 trades detail for speed"
    )]
    pub precision: u32,

    #[arg(
        short = 'n',
        long = "count",
        default_value_t = 1200,
        help_heading = "RAIN",
        help = "Number of drops (min 0 max 100000)"
    )]
    pub count: usize,

    #[arg(
        short = 'g',
        long = "gravity",
        default_value_t = 0.05,
        help_heading = "RAIN",
        help = "Downward acceleration per frame (min 0 max 10)"
    )]
    pub gravity: f64,

    #[arg(
        short = 'l',
        long = "length",
        default_value = "7,12",
        help_heading = "RAIN",
        help = "Drop length range: LOW,HIGH (min 1 max 500)"
    )]
    pub length: F64Range,

    #[arg(
        short = 'S',
        long = "speed",
        default_value = "1,4",
        help_heading = "RAIN",
        help = "Initial fall speed range: LOW,HIGH (min 0 max 100)"
    )]
    pub speed: F64Range,

    #[arg(
        short = 'w',
        long = "stroke",
        default_value_t = 1,
        help_heading = "RAIN",
        help = "Stroke width in cells (min 1 max 5)"
    )]
    pub stroke: u16,

    #[arg(
        short = 'm',
        long = "margin",
        default_value_t = 0.0,
        help_heading = "RAIN",
        help = "Screen edge margin in cells (min 0 max 100)"
    )]
    pub margin: f64,

    #[arg(
        long = "fade",
        default_value_t = 0.1,
        help_heading = "APPEARANCE",
        help = "Trail fade strength per frame (min 0.01 max 1)"
    )]
    pub fade: f32,

    #[arg(
        short = 'f',
        long = "fps",
        default_value_t = 60.0,
        help_heading = "PERFORMANCE",
        help = "Target FPS (min 1 max 240)"
    )]
    pub fps: f64,

    #[arg(
        long = "show-fps",
        help_heading = "GENERAL",
        help = "Start with the FPS overlay enabled"
    )]
    pub show_fps: bool,

    #[arg(
        long = "duration",
        help_heading = "GENERAL",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        short = 's',
        long = "screensaver",
        help_heading = "GENERAL",
        help = "Screensaver mode (exit on keypress)"
    )]
    pub screensaver: bool,

    #[arg(
        long = "seed",
        help_heading = "GENERAL",
        help = "Seed the RNG for a reproducible run"
    )]
    pub seed: Option<u64>,

    #[arg(
        long = "perf-stats",
        help_heading = "PERFORMANCE",
        help = "Print performance statistics summary on exit"
    )]
    pub perf_stats: bool,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0,16,8/256,24/32). Default: 24-bit if supported (COLORTERM), else 8-bit (TERM=...256color)"
    )]
    pub colormode: Option<u16>,

    #[arg(
        long = "check-bitcolor",
        help_heading = "HELP",
        help = "Print detected terminal color capability and exit"
    )]
    pub check_bitcolor: bool,

    #[arg(
        long = "help-detail",
        help_heading = "HELP",
        help = "Show detailed help for all parameters and exit"
    )]
    pub help_detail: bool,

    #[arg(
        long = "list-keys",
        help_heading = "HELP",
        help = "List runtime key bindings and exit"
    )]
    pub list_keys: bool,

    #[arg(
        long = "info",
        short = 'i',
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

// Runtime knobs, read each tick. Mutations come from the key bindings and
// take effect on the next frame or spawn; the CLI validates once at startup.
#[derive(Clone, Copy, Debug)]
pub struct Settings {
    pub count: usize,
    pub gravity: f64,
    pub min_length: f64,
    pub max_length: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    pub stroke_width: u16,
    pub margin: f64,
    pub precision: u32,
    pub fade: f32,
    pub show_fps: bool,
}

impl Settings {
    pub fn from_args(args: &Args) -> Self {
        Self {
            count: args.count,
            gravity: args.gravity,
            min_length: args.length.low,
            max_length: args.length.high,
            min_speed: args.speed.low,
            max_speed: args.speed.high,
            stroke_width: args.stroke,
            margin: args.margin,
            precision: args.precision,
            fade: args.fade,
            show_fps: args.show_fps,
        }
    }
}

pub fn print_list_keys() {
    if color_enabled_stdout() {
        println!("\x1b[1;36mRUNTIME KEY BINDINGS:\x1b[0m");
    } else {
        println!("RUNTIME KEY BINDINGS:");
    }
    println!();
    println!("KEY          ACTION");
    println!("q, Esc       Quit (any key in --screensaver mode)");
    println!("space        Regenerate all drops");
    println!("p            Pause / resume");
    println!("f            Toggle the FPS overlay");
    println!("Up, Down     Gravity +/- 0.01");
    println!("+, -         Drop count +/- 100");
    println!("[, ]         Sampling precision -/+ 1");
    println!("Left, Right  Stroke width -/+ 1");
}

pub fn print_help_detail() {
    let block = format!(
        "{}\n\nUSAGE:\n  photorain [OPTIONS]\n\nIMAGE:\n  -I, --image <path>\n      Background photo; drop colors are sampled from it. Without an\n      image (or if the load fails) drops fall in the plain rain color.\n      Example: photorain --image ./image.jpeg\n\n  -p, --precision <number>\n      Pixel sampling stride (min 1 max 20). 1 samples every cell;\n      higher values sample coarser blocks.\n      Example: photorain -p 4\n\nRAIN:\n  -n, --count <number>\n      Number of drops (min 0 max 100000).\n      Example: photorain -n 800\n\n  -g, --gravity <number>\n      Downward acceleration per frame (min 0 max 10).\n      Example: photorain -g 0.02\n\n  -l, --length <low,high>\n      Drop length range in cells (min 1 max 500).\n      Example: photorain --length 4,9\n\n  -S, --speed <low,high>\n      Initial fall speed range in cells per frame (min 0 max 100).\n      Example: photorain --speed 0.5,2\n\n  -w, --stroke <number>\n      Stroke width in cells (min 1 max 5).\n      Example: photorain -w 2\n\n  -m, --margin <number>\n      Screen edge margin in cells (min 0 max 100).\n      Example: photorain -m 4\n\nAPPEARANCE:\n  --fade <number>\n      Trail fade strength per frame (min 0.01 max 1). Lower values\n      leave longer trails.\n      Example: photorain --fade 0.05\n\n  --colormode <0|16|8|24>\n      Force color mode; otherwise auto-detected from COLORTERM/TERM.\n      Example: photorain --colormode 24\n\nGENERAL:\n  -s, --screensaver\n      Screensaver mode (exit on keypress).\n      Example: photorain -s\n\n  --duration <seconds>\n      Stop after N seconds (min 0.1 max 86400).\n      Example: photorain --duration 10\n\n  --seed <number>\n      Seed the RNG for a reproducible run.\n      Example: photorain --seed 7\n\n  --show-fps\n      Start with the FPS overlay enabled.\n\nPERFORMANCE:\n  -f, --fps <number>\n      Target FPS (min 1 max 240).\n      Example: photorain --fps 30\n\n  --perf-stats\n      Print performance statistics summary on exit.\n      Example: photorain --duration 10 --perf-stats\n\nHELP:\n  --check-bitcolor\n      Print detected terminal color capability and exit.\n\n  --help\n      Show short help.\n\n  --help-detail\n      Show this detailed help.\n\n  --list-keys\n      List runtime key bindings and exit.\n\n  -v, --version\n      Print version and exit.\n\n  -i, --info\n      Print version info and exit.\n",
        DEFAULT_PARAMS_USAGE
    );

    if color_enabled_stdout() {
        print!("{}", colorize_help_detail(&block));
    } else {
        print!("{}", block);
    }

    let tail = "\nLIMITS / VALID RANGES:\n";
    if color_enabled_stdout() {
        print!("{}", colorize_help_detail(tail));
    } else {
        print!("{}", tail);
    }
    println!("  --fps <number>           min 1 max 240");
    println!("  --count <number>         min 0 max 100000");
    println!("  --gravity <number>       min 0 max 10");
    println!("  --length <low,high>      min 1 max 500 (each)");
    println!("  --speed <low,high>       min 0 max 100 (each)");
    println!("  --stroke <number>        min 1 max 5");
    println!("  --margin <number>        min 0 max 100");
    println!("  --precision <number>     min 1 max 20");
    println!("  --fade <number>          min 0.01 max 1");
    println!("  --duration <seconds>     min 0.1 max 86400 (<=0 disables)");
    println!("  --colormode <0|16|8|24>  allowed values only (8==256, 24==32)");
    println!();
    print_list_keys();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f64_range_parses_and_validates() {
        let r: F64Range = "7,12".parse().unwrap();
        assert_eq!(r.low, 7.0);
        assert_eq!(r.high, 12.0);

        let r: F64Range = " 0.5 , 2 ".parse().unwrap();
        assert_eq!(r.low, 0.5);
        assert_eq!(r.high, 2.0);

        assert!("12,7".parse::<F64Range>().is_err());
        assert!("-1,2".parse::<F64Range>().is_err());
        assert!("7".parse::<F64Range>().is_err());
        assert!("a,b".parse::<F64Range>().is_err());
        assert!("inf,2".parse::<F64Range>().is_err());
    }
}
