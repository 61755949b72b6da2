use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "fdc")]
#[command(about = "Food delivery cart tooling", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> env -> local...)
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Print the canonical configuration key for an item + selections
    Key {
        /// Menu item id
        #[arg(long)]
        item: u64,

        /// Option group selection as <group_id>:<extra_id>,<extra_id> (repeatable)
        #[arg(long = "group")]
        groups: Vec<String>,
    },

    /// Replay a recorded cart session against a fresh cart
    Replay {
        /// Session script (.json, or .yaml/.yml)
        #[arg(long)]
        script: String,

        /// Layered config paths in merge order
        #[arg(long = "config")]
        config_paths: Vec<String>,

        /// Unused config keys: warn | fail
        #[arg(long = "unused-keys", default_value = "warn")]
        unused_keys: String,

        /// Print the full report as JSON instead of key=value lines
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    // Silent if the file does not exist.
    let _ = dotenvy::from_filename(".env.local");

    let cli = Cli::parse();

    match cli.cmd {
        Commands::ConfigHash { paths } => {
            init_tracing("info");
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = fdc_config::load_layered_yaml(&path_refs)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }

        Commands::Key { item, groups } => {
            init_tracing("info");
            commands::key::print_key(item, &groups)?;
        }

        Commands::Replay {
            script,
            config_paths,
            unused_keys,
            json,
        } => {
            let policy = commands::parse_unused_key_policy(&unused_keys)?;
            let cfg = commands::replay::load_config(&config_paths, policy)?;
            // Config supplies the fallback filter, so logging starts after it loads.
            init_tracing(&cfg.settings.log_filter);
            commands::replay::run(&script, &cfg, json)?;
        }
    }

    Ok(())
}

/// Logs go to stderr; stdout stays machine-readable.
fn init_tracing(fallback_filter: &str) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback_filter.into()),
        )
        .init();
}
