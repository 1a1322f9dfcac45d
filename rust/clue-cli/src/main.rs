//! clue: CLI binary for the Clue deduction engine.
//!
//! Subcommands:
//! - replay
//! - show
//! - hand-sizes
//! - catalog

use std::env;
use std::path::Path;
use std::process;

use clue_core::{Category, ClueGame, HandSizes, VariantConfig};
use clue_logging::{
    IngestEventV1, NdjsonWriter, RejectedEventV1, SessionHeaderV1, SummaryEventV1,
};
use serde::{Deserialize, Serialize};

/// A scripted session: seating, the local hand and the events in play order.
#[derive(Debug, Deserialize)]
struct Script {
    players: Vec<String>,
    #[serde(default)]
    my_hand: Vec<String>,
    #[serde(default)]
    events: Vec<clue_core::Event>,
}

/// Exit code for a rejected event under `--strict`.
const EXIT_REJECTED: i32 = 2;

fn take_value(args: &[String], i: usize, flag: &str) -> String {
    if i + 1 >= args.len() {
        eprintln!("Missing value for {flag}");
        process::exit(1);
    }
    args[i + 1].clone()
}

/// Load the variant and a hash of its source bytes.
fn load_config(path: Option<&str>) -> (VariantConfig, String) {
    match path {
        Some(p) => {
            let text = std::fs::read_to_string(p).unwrap_or_else(|e| {
                eprintln!("Failed to read config {p}: {e}");
                process::exit(1);
            });
            let cfg = VariantConfig::from_yaml(&text).unwrap_or_else(|e| {
                eprintln!("Invalid config {p}: {e}");
                process::exit(1);
            });
            (cfg, clue_logging::hash_config_bytes(text.as_bytes()))
        }
        None => {
            let cfg = VariantConfig::default();
            let text = cfg.to_yaml().unwrap_or_default();
            (cfg, clue_logging::hash_config_bytes(text.as_bytes()))
        }
    }
}

fn log_line<T: Serialize>(log: &mut Option<NdjsonWriter>, line: &T) {
    if let Some(w) = log.as_mut() {
        if let Err(e) = w.write_event(line) {
            eprintln!("Failed to write log: {e}");
            process::exit(1);
        }
    }
}

fn print_summary(game: &ClueGame) {
    println!("{}", game.render_grid());

    let pending: Vec<String> = game
        .pending_disjunctions()
        .map(|d| {
            let cards: Vec<&str> = d.candidates.iter().map(|&c| game.catalog().name(c)).collect();
            format!("{} has one of [{}]", game.holders().name(d.holder), cards.join(", "))
        })
        .collect();
    if !pending.is_empty() {
        println!("Pending:");
        for line in &pending {
            println!("  - {line}");
        }
    }

    let parts: Vec<String> = Category::ALL
        .into_iter()
        .map(|category| match game.solution_card(category) {
            Some(card) => game.catalog().name(card).to_string(),
            None => format!("{category}: ?"),
        })
        .collect();
    if game.is_solved() {
        println!("Solution: {}", parts.join(", "));
    } else {
        println!("Solution: unknown ({})", parts.join(", "));
    }
}

fn cmd_replay(args: &[String]) {
    let mut script_path: Option<String> = None;
    let mut config_path: Option<String> = None;
    let mut log_path: Option<String> = None;
    let mut snapshot_path: Option<String> = None;
    let mut strict = false;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"clue replay

USAGE:
    clue replay --script FILE [--config FILE] [--log FILE] [--snapshot FILE] [--strict]

OPTIONS:
    --script FILE     YAML session: players, my_hand, events
    --config FILE     Variant config YAML (default: standard deck)
    --log FILE        Append an NDJSON session log
    --snapshot FILE   Write the final knowledge snapshot (JSON)
    --strict          Stop with exit code 2 at the first rejected event
"#
                );
                return;
            }
            "--script" => {
                script_path = Some(take_value(args, i, "--script"));
                i += 2;
            }
            "--config" => {
                config_path = Some(take_value(args, i, "--config"));
                i += 2;
            }
            "--log" => {
                log_path = Some(take_value(args, i, "--log"));
                i += 2;
            }
            "--snapshot" => {
                snapshot_path = Some(take_value(args, i, "--snapshot"));
                i += 2;
            }
            "--strict" => {
                strict = true;
                i += 1;
            }
            other => {
                eprintln!("Unknown option for `clue replay`: {}", other);
                eprintln!("Run `clue replay --help` for usage.");
                process::exit(1);
            }
        }
    }

    let Some(script_path) = script_path else {
        eprintln!("Missing --script");
        process::exit(1);
    };
    let (cfg, config_hash) = load_config(config_path.as_deref());
    let text = std::fs::read_to_string(&script_path).unwrap_or_else(|e| {
        eprintln!("Failed to read script {script_path}: {e}");
        process::exit(1);
    });
    let script: Script = serde_yaml::from_str(&text).unwrap_or_else(|e| {
        eprintln!("Failed to parse script {script_path}: {e}");
        process::exit(1);
    });

    let mut game = ClueGame::new(&cfg, &script.players[..], &script.my_hand[..]).unwrap_or_else(|e| {
        eprintln!("Cannot start game: {e}");
        process::exit(1);
    });

    let mut log = log_path.as_deref().map(|p| {
        NdjsonWriter::open_append(p).unwrap_or_else(|e| {
            eprintln!("Failed to open log {p}: {e}");
            process::exit(1);
        })
    });
    log_line(
        &mut log,
        &SessionHeaderV1::new(&game, &cfg.name, Some(config_hash)),
    );

    let mut applied = 0u64;
    let mut rejected = 0u64;
    for (seq, event) in script.events.iter().enumerate() {
        let seq = seq as u64;
        match game.apply(event) {
            Ok(report) => {
                applied += 1;
                println!(
                    "[{seq}] applied: {} cells ({} inferred)",
                    report.derivations.len(),
                    report.inferred().count()
                );
                log_line(&mut log, &IngestEventV1::new(&game, seq, event, &report));
            }
            Err(err) => {
                rejected += 1;
                println!("[{seq}] rejected: {}", game.describe(&err));
                log_line(&mut log, &RejectedEventV1::new(&game, seq, event, &err));
                if strict {
                    if let Some(w) = log.as_mut() {
                        let _ = w.flush();
                    }
                    process::exit(EXIT_REJECTED);
                }
            }
        }
    }
    log_line(&mut log, &SummaryEventV1::new(&game, applied, rejected));
    if let Some(w) = log.as_mut() {
        if let Err(e) = w.flush() {
            eprintln!("Failed to flush log: {e}");
            process::exit(1);
        }
    }

    println!();
    println!("Events: applied={applied} rejected={rejected}");
    print_summary(&game);

    if let Some(p) = snapshot_path {
        clue_logging::write_snapshot_atomic(&p, &game.snapshot()).unwrap_or_else(|e| {
            eprintln!("Failed to write snapshot {p}: {e}");
            process::exit(1);
        });
        println!("Snapshot written to {p}");
    }
}

fn cmd_show(args: &[String]) {
    let mut snapshot_path: Option<String> = None;
    let mut config_path: Option<String> = None;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"clue show

USAGE:
    clue show --snapshot FILE [--config FILE]

OPTIONS:
    --snapshot FILE   Snapshot written by `clue replay --snapshot`
    --config FILE     Variant config YAML the snapshot was taken under
"#
                );
                return;
            }
            "--snapshot" => {
                snapshot_path = Some(take_value(args, i, "--snapshot"));
                i += 2;
            }
            "--config" => {
                config_path = Some(take_value(args, i, "--config"));
                i += 2;
            }
            other => {
                eprintln!("Unknown option for `clue show`: {}", other);
                eprintln!("Run `clue show --help` for usage.");
                process::exit(1);
            }
        }
    }

    let Some(snapshot_path) = snapshot_path else {
        eprintln!("Missing --snapshot");
        process::exit(1);
    };
    let (cfg, _) = load_config(config_path.as_deref());
    let snapshot = clue_logging::read_snapshot(Path::new(&snapshot_path)).unwrap_or_else(|e| {
        eprintln!("Failed to read snapshot {snapshot_path}: {e}");
        process::exit(1);
    });
    let game = ClueGame::from_snapshot(&cfg, &snapshot).unwrap_or_else(|e| {
        eprintln!("Cannot restore snapshot: {e}");
        process::exit(1);
    });
    print_summary(&game);
}

fn cmd_hand_sizes(args: &[String]) {
    let mut players: Option<usize> = None;
    let mut seat: Option<usize> = None;
    let mut config_path: Option<String> = None;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"clue hand-sizes

USAGE:
    clue hand-sizes --players N [--seat S] [--config FILE]

OPTIONS:
    --players N     Number of players
    --seat S        Seat receiving the first leftover card (default: from config)
    --config FILE   Variant config YAML (default: standard deck)
"#
                );
                return;
            }
            "--players" => {
                let v = take_value(args, i, "--players");
                players = Some(v.parse().unwrap_or_else(|_| {
                    eprintln!("Invalid --players value: {v}");
                    process::exit(1);
                }));
                i += 2;
            }
            "--seat" => {
                let v = take_value(args, i, "--seat");
                seat = Some(v.parse().unwrap_or_else(|_| {
                    eprintln!("Invalid --seat value: {v}");
                    process::exit(1);
                }));
                i += 2;
            }
            "--config" => {
                config_path = Some(take_value(args, i, "--config"));
                i += 2;
            }
            other => {
                eprintln!("Unknown option for `clue hand-sizes`: {}", other);
                eprintln!("Run `clue hand-sizes --help` for usage.");
                process::exit(1);
            }
        }
    }

    let Some(players) = players else {
        eprintln!("Missing --players");
        process::exit(1);
    };
    let (cfg, _) = load_config(config_path.as_deref());
    let seat = seat.unwrap_or(cfg.extra_cards_from_seat);
    let catalog = cfg.catalog().unwrap_or_else(|e| {
        eprintln!("Invalid config: {e}");
        process::exit(1);
    });
    let sizes = HandSizes::compute(players, &catalog, seat).unwrap_or_else(|e| {
        eprintln!("Cannot deal: {e}");
        process::exit(1);
    });
    let s = sizes.as_slice();
    for (p, n) in s[..s.len() - 1].iter().enumerate() {
        println!("seat {p}: {n}");
    }
    println!("solution: {}", s[s.len() - 1]);
}

fn cmd_catalog(args: &[String]) {
    let mut config_path: Option<String> = None;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"clue catalog

USAGE:
    clue catalog [--config FILE]

OPTIONS:
    --config FILE   Variant config YAML (default: standard deck)
"#
                );
                return;
            }
            "--config" => {
                config_path = Some(take_value(args, i, "--config"));
                i += 2;
            }
            other => {
                eprintln!("Unknown option for `clue catalog`: {}", other);
                eprintln!("Run `clue catalog --help` for usage.");
                process::exit(1);
            }
        }
    }

    let (cfg, hash) = load_config(config_path.as_deref());
    let catalog = cfg.catalog().unwrap_or_else(|e| {
        eprintln!("Invalid config: {e}");
        process::exit(1);
    });
    println!("Variant: {} ({} cards, config {})", cfg.name, catalog.len(), &hash[..12]);
    for category in Category::ALL {
        let names: Vec<&str> = catalog
            .cards_in(category)
            .iter()
            .map(|&c| catalog.name(c))
            .collect();
        println!("{category}: {}", names.join(", "));
    }
}

fn print_help() {
    eprintln!(
        r#"clue - Clue deduction engine CLI

USAGE:
    clue <COMMAND> [OPTIONS]

COMMANDS:
    replay          Replay a scripted session and print the deduced grid
    show            Print the grid stored in a snapshot
    hand-sizes      Print hand sizes for a player count
    catalog         Print the variant's cards

OPTIONS:
    -h, --help      Print this help message
    -V, --version   Print version

Run `clue <COMMAND> --help` for command options.
"#
    );
}

fn print_version() {
    println!("clue {}", env!("CARGO_PKG_VERSION"));
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_help();
        process::exit(0);
    }

    match args[1].as_str() {
        "-h" | "--help" | "help" => {
            print_help();
        }
        "-V" | "--version" => {
            print_version();
        }
        "replay" => {
            cmd_replay(&args[2..]);
        }
        "show" => {
            cmd_show(&args[2..]);
        }
        "hand-sizes" => {
            cmd_hand_sizes(&args[2..]);
        }
        "catalog" => {
            cmd_catalog(&args[2..]);
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            eprintln!("Run `clue --help` for usage.");
            process::exit(1);
        }
    }
}
