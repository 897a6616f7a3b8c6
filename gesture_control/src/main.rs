//! gesture_control — interactive entry point.

use gesture_control::app::{run, AppConfig};

const USAGE: &str = "\
Usage: gesture_control [--detector [CMD ARGS...]]

  --detector    read landmarks from an external detector process instead of
                the keyboard simulator. With no command given, runs
                `python3 detector/hand_detect.py`.";

fn main() {
    env_logger::init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║        Gesture Control — Hand-Gesture System Actions         ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "system")]
    println!("  Actuators: system (ALSA mixer + sysfs backlight)");
    #[cfg(not(feature = "system"))]
    println!("  Actuators: soft in-memory levels  (use --features system for real control)");

    let cfg = parse_args();

    match &cfg.detector_command {
        Some(cmd) => println!("  Frames:    external detector ({})", cmd.join(" ")),
        None => println!("  Frames:    keyboard simulation"),
    }
    println!();
    println!("  Opening overlay window…");
    println!();

    if let Err(e) = run(cfg) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn parse_args() -> AppConfig {
    let mut cfg = AppConfig::default();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--detector" => {
                let rest: Vec<String> = args.by_ref().collect();
                cfg.detector_command = Some(if rest.is_empty() {
                    vec!["python3".to_string(), "detector/hand_detect.py".to_string()]
                } else {
                    rest
                });
            }
            "--help" | "-h" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other => {
                eprintln!("unknown argument '{other}'\n\n{USAGE}");
                std::process::exit(2);
            }
        }
    }

    cfg
}
