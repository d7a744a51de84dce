//! carcass-viewer - terminal client for carcass-server
//!
//! Lists, searches and inspects legacy vs predicted grading records.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use carcass_common::config::{load_toml_config, ViewerConfig, ViewerOverrides};
use carcass_common::Field;
use carcass_viewer::detail_view::load_detail;
use carcass_viewer::list_view::{load_list, ListView, SortDirection, SortState};
use carcass_viewer::refresh::{spawn_health_monitor, spawn_list_refresh};
use carcass_viewer::render::{render_banner, render_detail, render_list, render_state};
use carcass_viewer::{ApiClient, ViewState};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "carcass-viewer")]
#[command(about = "Browse carcass grading records: legacy vs predicted")]
#[command(version)]
struct Args {
    /// TOML config file
    #[arg(short, long, env = "CARCASS_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Base URL of the API (e.g. http://127.0.0.1:5000/api)
    #[arg(long, env = "CARCASS_API_URL", global = true)]
    api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "CARCASS_TIMEOUT_SECS", global = true)]
    timeout: Option<u64>,

    /// Log level when RUST_LOG is not set
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the record table
    List(ListArgs),
    /// Show one record with its images
    Show {
        /// Carcass identifier
        id: String,
    },
    /// Keep the table refreshed until Ctrl+C
    Watch {
        #[command(flatten)]
        list: ListArgs,

        /// Refresh interval in seconds
        #[arg(long, env = "CARCASS_REFRESH_SECS")]
        interval: Option<u64>,
    },
    /// Check server health
    Health,
}

#[derive(ClapArgs, Debug)]
struct ListArgs {
    /// Column to sort by (e.g. weight_legacy)
    #[arg(long, value_parser = parse_field, default_value = "carcass_id")]
    sort: Field,

    /// Sort descending
    #[arg(long)]
    desc: bool,

    /// Free-text filter over every field
    #[arg(long, default_value = "")]
    search: String,
}

impl ListArgs {
    fn view(&self) -> ListView {
        let mut view = ListView::default();
        view.set_sort(SortState {
            field: self.sort,
            direction: if self.desc {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            },
        });
        view.set_search(self.search.clone());
        view
    }
}

fn parse_field(s: &str) -> std::result::Result<Field, String> {
    s.parse::<Field>().map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let file = load_toml_config(args.config.as_deref());
    let interval_override = match &args.command {
        Command::Watch { interval, .. } => *interval,
        _ => None,
    };
    let config = ViewerConfig::resolve(
        ViewerOverrides {
            api_url: args.api_url,
            timeout_secs: args.timeout,
            refresh_interval_secs: interval_override,
            log_level: args.log_level,
        },
        &file,
    );

    // Logs go to stderr; stdout carries the rendered views
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    debug!("Viewer config: {:?}", config);
    let client = ApiClient::new(&config.api_url, config.timeout).context("Invalid viewer configuration")?;

    match args.command {
        Command::List(list) => {
            let mut view = list.view();
            let state = load_list(&client).await;
            if let Some(records) = state.ready() {
                view.set_records(records.clone());
            }
            println!("{}", render_state(&state, |_| render_list(&view)));
        }
        Command::Show { id } => {
            let state = load_detail(&client, &id).await;
            println!("{}", render_state(&state, render_detail));
        }
        Command::Watch { list, .. } => watch(client, list.view(), config.refresh_interval).await,
        Command::Health => {
            let status = client.health().await.context("Server is unreachable")?;
            if status.status != "ok" {
                bail!("Server reported status {}", status.status);
            }
            println!("Server OK at {}", status.timestamp);
        }
    }

    Ok(())
}

/// Re-render the table on every refresh; health only toggles the banner
async fn watch(client: ApiClient, mut view: ListView, interval: Duration) {
    info!("Refreshing every {} s from {}", interval.as_secs(), client.api_url());

    let (list_task, mut list_rx) = spawn_list_refresh(client.clone(), interval);
    let (health_task, mut health_rx) = spawn_health_monitor(client, interval);
    let mut loaded = false;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, stopping refresh");
                break;
            }
            changed = list_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = list_rx.borrow_and_update().clone();
                match &snapshot.value {
                    ViewState::Ready(records) => {
                        view.set_records(records.clone());
                        loaded = true;
                        println!("{}\n", render_list(&view));
                    }
                    ViewState::Empty => {
                        view.set_records(Vec::new());
                        loaded = true;
                        println!("{}\n", render_state(&snapshot.value, |_| String::new()));
                    }
                    // Keep the last good table on screen; report the failure beside it
                    other if loaded => eprintln!("{}", render_state(other, |_| String::new())),
                    other => println!("{}\n", render_state(other, |_| String::new())),
                }
            }
            changed = health_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let banner = health_rx.borrow_and_update().value.clone();
                if let Some(text) = render_banner(&banner) {
                    eprintln!("{}", text);
                }
            }
        }
    }

    list_task.shutdown().await;
    health_task.shutdown().await;
}
