use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use studio_core::{ConnectionSession, Msg, QueryKey};
use studio_engine::{add_socket_connected_listeners, ActionObserver, ReqwestApi, Store};
use studio_logging::{studio_debug, studio_info, studio_trace, studio_warn, Namespace};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::commands::{Command, HELP};
use super::config::{read_config, ClientConfig, CONFIG_FILENAME};
use super::logging;

struct ActionTrace;

impl ActionObserver for ActionTrace {
    fn observe(&self, msg: &Msg) {
        studio_trace!(Namespace::Store, "action {:?}", msg);
    }
}

pub fn run_app() -> anyhow::Result<()> {
    let config_dir = std::env::current_dir().context("resolve working directory")?;
    let loaded = read_config(&config_dir);
    let config = match &loaded {
        Ok(Some(config)) => config.clone(),
        Ok(None) | Err(_) => ClientConfig::default(),
    };

    logging::initialize(&config.log);
    match loaded {
        Ok(Some(_)) => studio_info!(
            Namespace::Config,
            "Loaded {:?}",
            config_dir.join(CONFIG_FILENAME)
        ),
        Ok(None) => studio_debug!(Namespace::Config, "No {} found, using defaults", CONFIG_FILENAME),
        Err(err) => studio_warn!(
            Namespace::Config,
            "Ignoring {:?}: {}",
            config_dir.join(CONFIG_FILENAME),
            err
        ),
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;

    runtime.block_on(run_console(&config_dir, config))
}

async fn run_console(config_dir: &Path, config: ClientConfig) -> anyhow::Result<()> {
    let api = ReqwestApi::new(config.api_settings()).context("build http client")?;
    studio_info!(
        Namespace::Api,
        "Backend: {}",
        api.settings().remote_base_url().unwrap_or(&api.settings().origin)
    );

    let store = Store::new(Arc::new(api), tokio::runtime::Handle::current());
    store.add_observer(Arc::new(ActionTrace));
    let session = Arc::new(ConnectionSession::new());
    add_socket_connected_listeners(store.listeners(), session, config.recovery_settings());
    store.dispatch(Msg::ConfigChanged {
        disabled_tabs: config.config_state().disabled_tabs,
    });

    studio_debug!(Namespace::Config, "Working directory {:?}", config_dir);
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("read stdin")? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => println!("{HELP}"),
            Command::Status => print_status(&store).await,
            other => {
                if let Some(msg) = other.action() {
                    store.dispatch(msg);
                }
            }
        }
    }

    store.shutdown().await;
    Ok(())
}

async fn print_status(store: &Store) {
    let state = store.get_state();
    println!(
        "connected: {}  node templates: {} ({:?})",
        state.system.is_connected,
        state.node_templates.templates.len(),
        state.node_templates.status
    );

    let mut request = store.initiate(QueryKey::QueueStatus, Default::default());
    match request.result().await {
        Ok(data) => match data.as_queue_status() {
            Some(status) => println!(
                "queue {}: pending {} in progress {} completed {} failed {} canceled {}",
                status.queue.queue_id,
                status.queue.pending,
                status.queue.in_progress,
                status.queue.completed,
                status.queue.failed,
                status.queue.canceled
            ),
            None => println!("queue status unavailable"),
        },
        Err(err) => println!("queue status unavailable: {err}"),
    }
    request.unsubscribe();
}
