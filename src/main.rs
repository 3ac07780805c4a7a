use crate::{
    app::App,
    config::{Config, ConfigOverrides},
    render::Color,
};
use anyhow::Context;
use clap::Parser;
use log::{debug, info};
use std::{fs::File, io, path::PathBuf};

mod animation;
mod app;
mod config;
mod render;
mod simulate;

/// Grow and shrink a colored bar through a palette, one tap at a time.
///
/// Click, or press space or enter, to play the next leg. Press q or escape to quit.
#[derive(Clone, Parser)]
#[command(author, version, about)]
struct Cli {
    /// The path to the configuration file.
    #[clap(short, long, env = "BARCYCLE_CONFIG")]
    config: Option<PathBuf>,

    /// How much the bar's scale moves per tick.
    #[clap(long)]
    step: Option<f64>,

    /// Milliseconds between ticks.
    #[clap(long)]
    tick_period_ms: Option<u64>,

    /// Comma separated bar colors, e.g. "#3F51B5,#4CAF50".
    #[clap(long, value_delimiter = ',')]
    palette: Option<Vec<Color>>,

    /// Play this many taps without a terminal and print each leg.
    #[clap(long)]
    simulate: Option<usize>,

    /// Write logs to this file instead of stderr.
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// Print the effective configuration as YAML and exit.
    #[clap(long)]
    print_config: bool,

    /// Print the configuration file's JSON schema and exit.
    #[cfg(feature = "json-schema")]
    #[clap(long)]
    generate_config_schema: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides { step: self.step, tick_period_ms: self.tick_period_ms, palette: self.palette.clone() }
    }
}

fn init_logging(log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(path) = log_file {
        let file = File::create(path).with_context(|| format!("creating log file {path:?}"))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let config = match &cli.config {
        Some(path) => {
            info!("loading config from {path:?}");
            Config::load(path)?
        }
        None => match Config::default_path() {
            Some(path) if path.exists() => {
                info!("loading config from {path:?}");
                Config::load(&path)?
            }
            _ => {
                debug!("no config file found, using defaults");
                Config::default()
            }
        },
    };
    let config = config.apply(cli.overrides());
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    init_logging(cli.log_file.as_ref())?;

    #[cfg(feature = "json-schema")]
    if cli.generate_config_schema {
        let schema = schemars::schema_for!(Config);
        let schema = serde_json::to_string_pretty(&schema).context("serializing schema")?;
        println!("{schema}");
        return Ok(());
    }

    let config = load_config(&cli)?;
    if cli.print_config {
        let yaml = serde_yaml::to_string(&config).context("serializing config")?;
        print!("{yaml}");
        return Ok(());
    }
    if let Some(taps) = cli.simulate {
        let legs = simulate::simulate(&config, taps)?;
        simulate::write_legs(&legs, io::stdout().lock())?;
        return Ok(());
    }
    App::new(config).run()?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
