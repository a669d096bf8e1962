use std::env;

use colored::Colorize;
use log::{error, info};
use parlor_client::{
    ApiConfig, ConfigError, FileBrowse, GatewayError, Parlor, PrimaryKey, StoreError,
};
use thiserror::Error;
use tokio::runtime;

mod logging;

/// Overrides which room the tour opens. Defaults to the first room of the account.
const ROOM_VAR: &str = "PARLOR_ROOM";

#[derive(Debug, Error)]
enum TermError {
    #[error("Could not read configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Could not load the session: {0}")]
    Session(#[from] GatewayError),

    #[error("Could not load room data: {0}")]
    Store(#[from] StoreError),
}

impl TermError {
    fn hint(&self) -> String {
        match self {
            TermError::Config(_) => format!(
                "Set {} and {} in the environment, then try again.",
                parlor_client::API_URL_VAR,
                parlor_client::API_TOKEN_VAR
            ),
            TermError::Session(_) => {
                "Make sure the api is reachable and the token has not expired.".to_string()
            }
            TermError::Store(_) => {
                "A room fetch failed. Check the api logs for the failing request.".to_string()
            }
        }
    }
}

fn main() {
    logging::init_logger();

    let runtime = runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("parlor-async")
        .build()
        .expect("runtime is built");

    match runtime.block_on(run()) {
        Ok(()) => info!("Finished the tour."),
        Err(error) => {
            error!(
                "{} Read the error below to troubleshoot the issue.",
                "The tour fell apart!".bold().red()
            );
            error!("{}", error);
            error!("{}", format!("Hint: {}", error.hint()).dimmed().italic());
        }
    }
}

/// Signs in, opens a room, and walks every tab once, logging what came back.
async fn run() -> Result<(), TermError> {
    let config = ApiConfig::from_env()?;
    let parlor = Parlor::connect(config);

    info!("Loading the session...");
    parlor.session.load().await?;

    let user = parlor.session.user().expect("session is loaded");
    let rooms = parlor.session.rooms();

    info!("Signed in as {} with {} rooms.", user.name.bold(), rooms.len());

    for room in &rooms {
        info!("- {} (room {})", room.name, room.id);
    }

    let room_id = env::var(ROOM_VAR)
        .ok()
        .and_then(|value| value.parse::<PrimaryKey>().ok())
        .or_else(|| rooms.first().map(|room| room.id));

    let room_id = match room_id {
        Some(room_id) => room_id,
        None => {
            info!("This account has no rooms to tour.");
            return Ok(());
        }
    };

    parlor.open_room(room_id);

    let room = match parlor.store.selected_room() {
        Some(room) => room,
        None => {
            info!("Not a member of room {}, so it was only requested as a preview.", room_id);
            return Ok(());
        }
    };

    info!("Touring {}...", room.name.bold());

    parlor.store.feed_page(true).await?;
    parlor.store.feed_page(false).await?;
    info!("Feed: {} items.", parlor.store.feed().len());

    parlor.store.chat_page(None, true).await?;
    info!("Chat: {} messages.", parlor.store.messages().len());

    parlor.store.files_page(&FileBrowse::root(), true).await?;
    info!("Files: {} entries.", parlor.store.files().len());

    parlor.store.refresh_meetings().await?;
    info!("Meetings: {} scheduled.", parlor.store.meetings().len());

    parlor.store.payments_page(true).await?;

    let payments = parlor.store.payments();
    let unpaid = payments.iter().filter(|split| split.paid_at.is_none()).count();
    info!("Payments: {} splits, {} unpaid.", payments.len(), unpaid);

    parlor.store.members_page(true).await?;
    info!("Members: {} in the room.", parlor.store.members().len());

    let mut events = 0;
    while parlor.poll_event().is_some() {
        events += 1;
    }

    info!("{} events were emitted along the way.", events);

    Ok(())
}
