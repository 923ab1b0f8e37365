mod commands;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use placeroute_cli::output::{print_footer, print_logo, OutputFormat};
use placeroute_lib::{RouteAlgorithm, DEFAULT_VEHICLE_ID};

use commands::route::{handle_route_command, RouteCommandArgs};
use commands::trip::{handle_trip_command, TripCommandArgs};
use commands::DataSources;

#[derive(Parser, Debug)]
#[command(author, version, about = "Shortest routes between named places")]
struct Cli {
    /// Place dataset (.json or .csv). Falls back to PLACEROUTE_PLACES, then bundled data.
    #[arg(long, global = true)]
    places: Option<PathBuf>,

    /// Vehicle catalog CSV. Falls back to PLACEROUTE_VEHICLES, then bundled presets.
    #[arg(long, global = true)]
    vehicles: Option<PathBuf>,

    /// Fare catalog CSV. Falls back to PLACEROUTE_FARES, then bundled fares.
    #[arg(long, global = true)]
    fares: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Suppress the logo banner and timing footer.
    #[arg(long, global = true)]
    no_logo: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List places in the dataset.
    Places {
        /// Only show names similar to this query.
        #[arg(long)]
        search: Option<String>,
    },
    /// List vehicle profiles.
    Vehicles,
    /// Compute the shortest route between two places.
    Route(RouteArgs),
    /// Visit several stops from one start, optimising the order.
    Trip(TripArgs),
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Vehicle profile id.
    #[arg(long, default_value = DEFAULT_VEHICLE_ID)]
    vehicle: String,
    /// Search algorithm (a-star or dijkstra).
    #[arg(long, default_value = "a-star")]
    algorithm: RouteAlgorithm,
    /// Give up after this many node expansions.
    #[arg(long)]
    max_expansions: Option<usize>,
    /// Give up after this many milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,
}

#[derive(Args, Debug)]
struct RouteArgs {
    /// Starting place id or name.
    #[arg(long = "from")]
    from: String,
    /// Destination place id or name.
    #[arg(long = "to")]
    to: String,
    #[command(flatten)]
    search: SearchArgs,
}

#[derive(Args, Debug)]
struct TripArgs {
    /// Starting place id or name.
    #[arg(long = "from")]
    from: String,
    /// Stop to visit; repeat for each stop.
    #[arg(long = "stop", required = true)]
    stops: Vec<String>,
    /// Visit stops in the order given.
    #[arg(long)]
    keep_order: bool,
    /// Quote bus tickets at the student price.
    #[arg(long)]
    student: bool,
    #[command(flatten)]
    search: SearchArgs,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let started = Instant::now();
    let decorated = cli.format.is_decorated() && !cli.no_logo;

    if decorated {
        print_logo();
    }

    let sources = DataSources {
        places: cli.places,
        vehicles: cli.vehicles,
        fares: cli.fares,
    };

    match cli.command {
        Command::Places { search } => {
            commands::places::handle_places_command(&sources, search.as_deref(), cli.format)?
        }
        Command::Vehicles => commands::vehicles::handle_vehicles_command(&sources, cli.format)?,
        Command::Route(args) => {
            let args = RouteCommandArgs {
                from: args.from,
                to: args.to,
                vehicle: args.search.vehicle,
                algorithm: args.search.algorithm,
                max_expansions: args.search.max_expansions,
                timeout_ms: args.search.timeout_ms,
            };
            handle_route_command(&sources, &args, cli.format)?
        }
        Command::Trip(args) => {
            let args = TripCommandArgs {
                from: args.from,
                stops: args.stops,
                vehicle: args.search.vehicle,
                algorithm: args.search.algorithm,
                keep_order: args.keep_order,
                student: args.student,
                max_expansions: args.search.max_expansions,
                timeout_ms: args.search.timeout_ms,
            };
            handle_trip_command(&sources, &args, cli.format)?
        }
    }

    if decorated {
        print_footer(started.elapsed());
    }
    Ok(())
}

/// Log to stderr so JSON on stdout stays parseable; `RUST_LOG` overrides the
/// default `warn` level.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
