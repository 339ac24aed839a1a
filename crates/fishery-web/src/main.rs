#![forbid(unsafe_code)]

use std::sync::Arc;

use fishery::photos::LocalPhotoStore;
use fishery_web::{config::Config, routes, AppState};
use log::info;
use miette::{Diagnostic, Result, WrapErr};
use signal_hook::consts::signal::{SIGINT, SIGQUIT, SIGTERM};
use signal_hook_tokio::Signals;
use tokio::{sync::Notify, task::JoinHandle};
use tokio_stream::StreamExt;

#[derive(Debug, thiserror::Error, Diagnostic)]
enum Error {
    #[error("could not register signals")]
    #[diagnostic(code(fishery_web::register_signals))]
    RegisterSignals(#[source] std::io::Error),

    #[error("could not read configuration")]
    #[diagnostic(code(fishery_web::config))]
    Config(#[from] fishery_web::config::Error),

    #[error("could not prepare database")]
    #[diagnostic(code(fishery_web::database))]
    Database(#[from] database::Error),

    #[error("could not bind web server")]
    #[diagnostic(code(fishery_web::bind))]
    Bind(#[source] warp::Error),

    #[error("failed to run signals task")]
    #[diagnostic(code(fishery_web::signals_task))]
    SignalsTask(#[source] tokio::task::JoinError),
}

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init_timed();
    dotenvy::dotenv().ok();

    run().await.wrap_err("failed to run web server")
}

async fn run() -> Result<(), Error> {
    let (quit, quit_handle, quit_task) = register_signals()?;
    let config = Config::from_env()?;

    info!("Connecting to database");
    let db = database::connection().await?;
    database::migrate(&db).await?;

    info!("Storing photos in {}", config.photo_dir.display());
    let photos = Arc::new(LocalPhotoStore::new(&config.photo_dir));
    let state = AppState::new(db, photos, config.utc_offset);

    let (address, server) = warp::serve(routes(state))
        .try_bind_with_graceful_shutdown(config.bind_address, async move {
            quit.notified().await;
            info!("Shutting down web server");
        })
        .map_err(Error::Bind)?;

    info!("Listening on {address}");
    server.await;

    // Terminate the signal stream.
    quit_handle.close();
    quit_task.await.map_err(Error::SignalsTask)?;

    Ok(())
}

fn register_signals() -> Result<(Arc<Notify>, signal_hook_tokio::Handle, JoinHandle<()>), Error> {
    info!("Registering signals");

    let signals = Signals::new([SIGINT, SIGTERM, SIGQUIT]).map_err(Error::RegisterSignals)?;
    let notify = Arc::new(Notify::new());

    let handle = signals.handle();
    let task = tokio::spawn(handle_signals(signals, notify.clone()));

    Ok((notify, handle, task))
}

async fn handle_signals(mut signals: Signals, quit_signal: Arc<Notify>) {
    info!("Starting signal handler");
    while let Some(signal) = signals.next().await {
        match signal {
            SIGTERM | SIGINT | SIGQUIT => {
                // wake the server even if it is not waiting yet
                quit_signal.notify_one();
                break;
            }
            _ => unreachable!(),
        }
    }
}
