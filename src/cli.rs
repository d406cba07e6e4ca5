use anyhow::{Result, anyhow};
use pico_args::Arguments;
use std::env;
use std::path::PathBuf;

use crate::config::ConfigState;
use crate::runner;

pub fn run() -> Result<()> {
    let mut pargs = Arguments::from_env();

    // No args -> general help
    if env::args().len() == 1 {
        print_help();
        return Ok(());
    }

    if pargs.contains("-h") || pargs.contains("--help") {
        print_help();
        return Ok(());
    }

    let profile_override: Option<String> = pargs.opt_value_from_str("--profile")?;

    // First free arg is the subcommand
    let subcmd: Option<String> = pargs.free_from_str().ok();

    match subcmd.as_deref() {
        Some("help") => {
            let topic: Option<String> = pargs.free_from_str().ok();
            if let Some(t) = topic {
                print_subcmd_help(&t);
            } else {
                print_help();
            }
            Ok(())
        }

        Some("run") => {
            let profile = resolve_profile(profile_override)?;
            runner::run_stream(&profile)
        }

        Some("simulate") => {
            let path: PathBuf = pargs
                .free_from_str()
                .map_err(|_| anyhow!("usage: handpaint simulate <frames.jsonl>"))?;
            let profile = resolve_profile(profile_override)?;
            runner::simulate(&path, &profile)
        }

        Some("use") => {
            let name: String = pargs
                .free_from_str()
                .map_err(|_| anyhow!("usage: handpaint use <profile_name>"))?;
            let mut cfg = ConfigState::load_or_install_default()?;
            cfg.set_active(&name)?;
            println!("active profile: {}", cfg.active_name);
            Ok(())
        }

        Some("list") => {
            let cfg = ConfigState::load_or_install_default()?;
            for name in cfg.list_profiles() {
                if name == cfg.active_name {
                    println!("* {name}");
                } else {
                    println!("  {name}");
                }
            }
            Ok(())
        }

        Some(other) => {
            eprintln!("unknown subcommand: {other}\n");
            print_help();
            Ok(())
        }

        None => {
            print_help();
            Ok(())
        }
    }
}

fn resolve_profile(name: Option<String>) -> Result<crate::config::Profile> {
    let cfg = ConfigState::load_or_install_default()?;
    match name {
        Some(n) => ConfigState::load_named(&n),
        None => Ok(cfg.profile),
    }
}

fn print_help() {
    println!(
        r#"handpaint — hand-gesture drawing pipeline

Reads detector landmark frames as JSON lines on stdin and writes render
events as JSON lines on stdout. Logs go to stderr.

USAGE:
  handpaint help [command]              Show general or command-specific help
  handpaint run [--profile <name>]      Run the live pipeline on stdin/stdout
  handpaint simulate <frames.jsonl>     Replay a recorded frame file offline
  handpaint use <name>                  Switch active profile
  handpaint list                        List profiles

GESTURES:
  point  draw with the index fingertip
  peace  reserved (selection; draws nothing)
  open   move the cursor without drawing
  fist   stop drawing

TIPS:
  - Profiles: ~/.config/handpaint/profiles
  - Active profile pointer: ~/.config/handpaint/active
"#
    );
}

fn print_subcmd_help(cmd: &str) {
    match cmd {
        "run" => println!(
            "usage: handpaint run [--profile <name>]\nRuns the pipeline until stdin closes or SIGINT/SIGTERM."
        ),
        "simulate" => println!(
            "usage: handpaint simulate <frames.jsonl> [--profile <name>]\nReplays a frame file using the frame timestamps as the clock."
        ),
        "use" => {
            println!("usage: handpaint use <name>\nSwitches the active profile to <name>.")
        }
        "list" => {
            println!("usage: handpaint list\nLists available profiles; marks active with '*'.")
        }
        _ => {
            eprintln!("unknown command: {cmd}\n");
            print_help();
        }
    }
}
