//! Interactive menu session for swapping games into donor title slots.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use donorswap_registry::{ConfigStore, PathConfig};
use donorswap_relocate::SlotOutcome;
use donorswap_swap::{SwapController, SwapError};
use donorswap_types::RomfsStyle;

mod menu;

#[derive(Parser, Debug)]
#[command(name = "donorswap")]
#[command(about = "Swap game bundles between storage and donor title slots")]
struct Args {
    /// Root directory for game storage
    #[arg(long, default_value = "/switch/games")]
    games_root: PathBuf,

    /// Root directory the loader scans for donor titles
    #[arg(long, default_value = "/atmosphere/titles")]
    donor_root: PathBuf,

    /// Config file location
    #[arg(long, default_value = "/switch/games/config.ini")]
    config: PathBuf,

    /// RomFs layout: 0/dir, 1/bin (RomFs.bin), 2/romfs (RomFs.romfs)
    #[arg(long, default_value = "0")]
    romfs_style: RomfsStyle,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive menu session (the default)
    Run,
    /// Print the per-slot assignment state
    Status {
        /// Emit JSON instead of text rows
        #[arg(long)]
        json: bool,
    },
    /// Move every donor-resident game back to storage
    RestoreAll,
    /// Rewrite the stock config, discarding all assignment state
    Reset,
}

const MAIN_OPTIONS: &[&str] = &[
    "Select Donor Title",
    "Select Game Folder",
    "Put Game In Donor",
    "Put Game In Donor [Edit NPDM]",
    "Put Donor Game Back",
    "Put All Games Back",
    "Show Config",
    "Reset Config",
    "Exit",
];

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), SwapError> {
    let store = ConfigStore::new(&args.config);
    let defaults = PathConfig {
        games_root: args.games_root,
        donor_root: args.donor_root,
        romfs_style: args.romfs_style,
    };
    // A corrupt config aborts here: fabricating state over unparseable
    // data would desynchronize the filesystem from the registry.
    let registry = store.load(defaults)?;
    let mut controller = SwapController::new(store, registry);

    match args.command.unwrap_or(Command::Run) {
        Command::Run => {
            interactive(&mut controller);
            Ok(())
        }
        Command::Status { json } => {
            print_status(&controller, json);
            Ok(())
        }
        Command::RestoreAll => {
            report_outcomes(&controller.restore_all());
            Ok(())
        }
        Command::Reset => {
            controller.reset_config()?;
            println!("config reset, all slots vacant");
            Ok(())
        }
    }
}

fn interactive(controller: &mut SwapController) {
    loop {
        let selection = controller.selection();
        println!(
            "\nselected donor: {}   selected game: {}",
            selection
                .donor
                .as_ref()
                .map(|d| d.as_str())
                .unwrap_or("None"),
            selection.game.as_deref().unwrap_or("None"),
        );

        let options: Vec<String> = MAIN_OPTIONS.iter().map(|s| s.to_string()).collect();
        let Some(choice) = menu::choose("donorswap", &options) else {
            break;
        };

        let result = match choice {
            0 => donor_menu(controller),
            1 => game_menu(controller),
            2 => swap_in(controller, false),
            3 => swap_in(controller, true),
            4 => swap_out(controller),
            5 => {
                report_outcomes(&controller.restore_all());
                Ok(())
            }
            6 => {
                print_status(controller, false);
                Ok(())
            }
            7 => controller.reset_config().map(|()| {
                println!("config reset, all slots vacant");
            }),
            _ => break,
        };

        // Failures never reset the selection; report and keep going.
        if let Err(e) = result {
            eprintln!("error: {e}");
        }
    }
}

fn donor_menu(controller: &mut SwapController) -> Result<(), SwapError> {
    let rows = controller.status();
    let mut options: Vec<String> = rows
        .iter()
        .map(|row| {
            format!(
                "{} ({}) - {}",
                row.display_name,
                row.title_id,
                row.assigned_game.as_deref().unwrap_or("free"),
            )
        })
        .collect();
    options.push("<clear selection>".to_string());

    let Some(choice) = menu::choose("Select Donor Title", &options) else {
        return Ok(());
    };
    if choice == rows.len() {
        return controller.select_donor(None);
    }
    controller.select_donor(Some(&rows[choice].title_id))
}

fn game_menu(controller: &mut SwapController) -> Result<(), SwapError> {
    let mut options = controller.list_games()?;
    options.push("<clear selection>".to_string());

    let Some(choice) = menu::choose("Select Game Folder", &options) else {
        return Ok(());
    };
    if choice == options.len() - 1 {
        return controller.select_game(None);
    }
    let name = options[choice].clone();
    controller.select_game(Some(&name))
}

fn swap_in(controller: &mut SwapController, patch_npdm: bool) -> Result<(), SwapError> {
    let outcome = controller.swap_in(patch_npdm)?;
    if let Some(evicted) = &outcome.evicted {
        println!("put '{evicted}' back to storage");
    }
    println!("'{}' now lives in donor {}", outcome.game, outcome.donor);
    Ok(())
}

fn swap_out(controller: &mut SwapController) -> Result<(), SwapError> {
    let game = controller.swap_out()?;
    println!("'{game}' is back in storage");
    Ok(())
}

fn print_status(controller: &SwapController, json: bool) {
    let status = controller.status();
    if json {
        match serde_json::to_string_pretty(&status) {
            Ok(text) => println!("{text}"),
            Err(e) => eprintln!("error: {e}"),
        }
        return;
    }
    for row in status {
        println!(
            "{} ({}) is currently being used by {}",
            row.display_name,
            row.title_id,
            row.assigned_game.as_deref().unwrap_or("None"),
        );
    }
}

fn report_outcomes(outcomes: &[SlotOutcome]) {
    if outcomes.is_empty() {
        println!("no donor slot is occupied");
        return;
    }
    for outcome in outcomes {
        match &outcome.result {
            Ok(()) => println!("restored '{}' from {}", outcome.game, outcome.title_id),
            Err(e) => println!(
                "FAILED to restore '{}' from {}: {e}",
                outcome.game, outcome.title_id
            ),
        }
    }
}
