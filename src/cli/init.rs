use std::path::{Path, PathBuf};

use impound::{Config, CorruptPolicy, domain::CONFIG_FILE};
use tracing::instrument;

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// Path of the vehicle store, relative to the root
    #[arg(long, value_name = "PATH")]
    store_file: Option<PathBuf>,

    /// Start with an empty store instead of failing when the store is corrupt
    #[arg(long)]
    recover_corrupt: bool,
}

impl Command {
    #[instrument]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let config_path = root.join(CONFIG_FILE);
        if config_path.exists() {
            anyhow::bail!(
                "Already initialized (found existing {})",
                config_path.display()
            );
        }

        std::fs::create_dir_all(root)
            .map_err(|e| anyhow::anyhow!("Failed to create {}: {e}", root.display()))?;

        let mut config = Config::default();
        if let Some(store_file) = self.store_file {
            config.set_store_file(store_file);
        }
        if self.recover_corrupt {
            config.on_corrupt = CorruptPolicy::Empty;
        }

        config
            .save(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to create {CONFIG_FILE}: {e}"))?;

        println!("Initialized impound store in {}", root.display());
        println!("  Created: {CONFIG_FILE}");
        println!("  Vehicles: {}", config.store_file().display());
        println!();
        println!("Next steps:");
        println!("  impound add --type car --plate ABC123 --reason \"unpaid fine\" --duration \"3 days\"");

        Ok(())
    }
}
