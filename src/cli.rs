use std::path::PathBuf;

mod add;
mod expired;
mod find;
mod init;
mod list;
mod menu;
mod remove;
mod render;
mod search;
mod terminal;

use clap::ArgAction;
use impound::{Config, CorruptPolicy, Store, storage::Loaded};

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global=true)]
    verbose: u8,

    /// The directory holding the configuration and vehicle store
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    /// Use this vehicle store file instead of the configured one
    #[arg(short, long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let location = Location {
            root: self.root,
            store: self.store,
        };
        self.command.unwrap_or_default().run(&location)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, Default, clap::Parser)]
pub enum Command {
    /// Run the interactive menu (default)
    #[default]
    Menu,

    /// Write a default configuration file
    Init(init::Command),

    /// List every impounded vehicle
    List,

    /// Impound a vehicle
    Add(add::Command),

    /// Release the first vehicle with a plate number
    Remove(remove::Command),

    /// Show the first vehicle with a plate number
    Find(find::Command),

    /// List vehicles impounded for a reason (case-insensitive)
    Search(search::Command),

    /// List vehicles whose impound has expired
    Expired,
}

impl Command {
    fn run(self, location: &Location) -> anyhow::Result<()> {
        match self {
            Self::Init(command) => command.run(&location.root)?,
            Self::Menu => menu::run(&mut location.open()?)?,
            Self::List => list::run(&location.open()?)?,
            Self::Add(command) => command.run(&mut location.open()?)?,
            Self::Remove(command) => command.run(&mut location.open()?)?,
            Self::Find(command) => command.run(&location.open()?)?,
            Self::Search(command) => command.run(&location.open()?)?,
            Self::Expired => expired::run(&location.open()?)?,
        }
        Ok(())
    }
}

/// Where the configuration and vehicle store live.
#[derive(Debug)]
struct Location {
    root: PathBuf,
    store: Option<PathBuf>,
}

impl Location {
    /// Loads the vehicle store, applying the configured policy for a corrupt
    /// snapshot.
    fn open(&self) -> anyhow::Result<Store<Loaded>> {
        let config = Config::load_or_default(&self.root);
        let path = self.store_path(&config);
        tracing::debug!("Opening vehicle store at {}", path.display());

        let store = Store::new(path);
        let store = match config.on_corrupt {
            CorruptPolicy::Fail => store.load()?,
            CorruptPolicy::Empty => store.load_or_empty()?,
        };
        Ok(store)
    }

    fn store_path(&self, config: &Config) -> PathBuf {
        self.store
            .clone()
            .unwrap_or_else(|| config.store_path(&self.root))
    }
}
