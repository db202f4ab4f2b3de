mod demo;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use demo::{GameSettingsPage, GameSettingsProducer, RemoteBalancePage, RemoteBalanceProducer};
use pageflow_config::Config;
use pageflow_page::PageRef;
use pageflow_parser::{DependencyAwareParser, ParseProgress, ParserConfig, spawn_parse};

/// Pageflow - dependency-aware configuration pages
#[derive(Parser)]
#[command(name = "pageflow")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the data directory (default: ~/.pageflow)
  #[arg(long, global = true)]
  data_dir: Option<PathBuf>,

  /// Path to a JSON parser configuration
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Parse the demo pages and print them
  Run {
    /// Call shape used to parse
    #[arg(long, value_enum, default_value_t = Mode::Async)]
    mode: Mode,

    /// Path to the settings file (default: <data-dir>/settings.json)
    #[arg(long)]
    settings: Option<PathBuf>,
  },

  /// Print the order the demo producers run in
  Order,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
  Blocking,
  Async,
  Progress,
  Callback,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  let data_dir = match cli.data_dir {
    Some(data_dir) => data_dir,
    None => dirs::home_dir()
      .context("could not determine home directory")?
      .join(".pageflow"),
  };
  let parser_config = load_parser_config(cli.config.as_deref())?;

  match cli.command {
    Some(Commands::Run { mode, settings }) => {
      let settings = settings.unwrap_or_else(|| data_dir.join("settings.json"));
      let parser = build_parser(settings, parser_config)?;
      run(parser, mode)?;
    }
    Some(Commands::Order) => {
      let parser = build_parser(data_dir.join("settings.json"), parser_config)?;
      print_order(&parser)?;
    }
    None => {
      println!("pageflow - use --help to see available commands");
    }
  }

  Ok(())
}

fn load_parser_config(path: Option<&Path>) -> Result<ParserConfig> {
  let Some(path) = path else {
    return Ok(ParserConfig::default());
  };

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("failed to read parser config: {}", path.display()))?;
  serde_json::from_str(&content)
    .with_context(|| format!("failed to parse parser config: {}", path.display()))
}

fn build_parser(settings: PathBuf, config: ParserConfig) -> Result<DependencyAwareParser> {
  DependencyAwareParser::builder()
    .producer(RemoteBalanceProducer::new())
    .producer(GameSettingsProducer::new(settings))
    .config(config)
    .build()
    .context("failed to build parser")
}

fn print_order(parser: &DependencyAwareParser) -> Result<()> {
  let order = parser.resolve().context("failed to resolve producers")?;

  for (index, producer) in order.iter().enumerate() {
    let dependencies: Vec<String> = producer
      .dependencies()
      .iter()
      .map(|kind| kind.to_string())
      .collect();

    if dependencies.is_empty() {
      println!("{}. {}", index + 1, producer.kind());
    } else {
      println!(
        "{}. {} <- {}",
        index + 1,
        producer.kind(),
        dependencies.join(", ")
      );
    }
  }

  Ok(())
}

fn run(parser: DependencyAwareParser, mode: Mode) -> Result<()> {
  if let Mode::Blocking = mode {
    let mut config = Config::new(Arc::new(parser));
    config.initialize().context("failed to parse pages")?;
    return print_config(&config);
  }

  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async { run_async(parser, mode).await })
}

async fn run_async(parser: DependencyAwareParser, mode: Mode) -> Result<()> {
  let cancel = CancellationToken::new();
  {
    let cancel = cancel.clone();
    tokio::spawn(async move {
      if tokio::signal::ctrl_c().await.is_ok() {
        cancel.cancel();
      }
    });
  }

  match mode {
    Mode::Callback => {
      let (done_tx, done_rx) = tokio::sync::oneshot::channel();
      spawn_parse(
        Arc::new(parser),
        report_progress,
        move |result| {
          let _ = done_tx.send(result);
        },
        cancel,
      );

      let pages = done_rx
        .await
        .context("parse task ended without a result")?
        .context("failed to parse pages")?;
      print_pages(&pages)
    }
    Mode::Progress => {
      let mut config = Config::new(Arc::new(parser));
      config
        .initialize_with_progress(&report_progress, &cancel)
        .await
        .context("failed to parse pages")?;
      print_config(&config)
    }
    Mode::Async | Mode::Blocking => {
      let mut config = Config::new(Arc::new(parser));
      config
        .initialize_async(&cancel)
        .await
        .context("failed to parse pages")?;
      print_config(&config)
    }
  }
}

fn report_progress(progress: ParseProgress) {
  eprintln!("[{:>3.0}%] {}", progress.progress * 100.0, progress.message);
}

fn print_config(config: &Config) -> Result<()> {
  let settings = config.page::<GameSettingsPage>()?;
  let balance = config.page::<RemoteBalancePage>()?;
  print_report(settings, balance)
}

fn print_pages(pages: &[PageRef]) -> Result<()> {
  let settings = pages
    .iter()
    .find_map(|page| page.downcast_ref::<GameSettingsPage>())
    .ok_or_else(|| anyhow!("no GameSettings page was produced"))?;
  let balance = pages
    .iter()
    .find_map(|page| page.downcast_ref::<RemoteBalancePage>())
    .ok_or_else(|| anyhow!("no RemoteBalance page was produced"))?;
  print_report(settings, balance)
}

fn print_report(settings: &GameSettingsPage, balance: &RemoteBalancePage) -> Result<()> {
  let output = serde_json::json!({
    "GameSettings": settings,
    "RemoteBalance": balance,
  });
  println!("{}", serde_json::to_string_pretty(&output)?);
  eprintln!("Enemy HP multiplier: {:.2}", balance.enemy_hp_multiplier);

  Ok(())
}
