//! rent-split - share an apartment's rent fairly

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use itertools::Itertools;
use rent_split::config::ApartmentFile;
use rent_split::prompt::{self, Prompter};
use rent_split::{ApartmentInput, RentAllocator};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// rent-split - divide rent by room size and by who uses which room
#[derive(Parser, Debug)]
#[command(name = "rent-split")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read the apartment from a TOML file
    File {
        /// Path to the apartment file
        path: PathBuf,
    },

    /// Enter the apartment at the terminal
    #[command(alias = "new")]
    Interactive,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(io::stderr))
        .init();

    let input = match cli.command {
        Commands::File { path } => ApartmentFile::from_file(&path)
            .with_context(|| format!("loading {}", path.display()))?
            .into_input(),
        Commands::Interactive => {
            let stdin = io::stdin();
            let mut prompter = Prompter::new(stdin.lock(), io::stdout());
            prompt::collect_apartment(&mut prompter).context("reading apartment")?
        }
    };

    report(input)
}

fn report(input: ApartmentInput) -> Result<()> {
    let mut allocator = RentAllocator::new();
    allocator.load(input).context("invalid apartment")?;
    let apartment = allocator.apartment()?;
    info!(rooms = apartment.num_rooms(), people = apartment.num_people(), "allocating rent");

    let rule = "-".repeat(10);
    println!("{rule} Room Pay {rule}");
    for room in apartment.rooms() {
        let note = if room.sharing {
            "shared by everyone".to_string()
        } else {
            format!("split {} way(s)", room.num_share)
        };
        println!("{:<20} {:>10.2}  ({:.1} sq ft, {note})", room.name, room.total, room.size);
    }
    println!("{:<20} {:>10.2}", "total", allocator.room_pay()?.values().sum::<f64>());

    let people = allocator.person_pay().context("cannot split rent among people")?;
    println!("{rule} Person Pay {rule}");
    for (occupant, pay) in &people {
        let own = apartment.assignments()[occupant].iter().join(", ");
        println!("{occupant:<20} {pay:>10.2}  [{own}]");
    }
    println!("{:<20} {:>10.2}", "total", people.values().sum::<f64>());
    Ok(())
}
