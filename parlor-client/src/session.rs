use log::info;
use parking_lot::Mutex;

use crate::{ClientContext, ClientEvent, Gateway, PrimaryKey, Result, Room, User};

/// The signed-in account and its room list, loaded at startup.
pub struct Session<G> {
    context: ClientContext<G>,
    state: Mutex<SessionState>,
}

#[derive(Debug)]
struct SessionState {
    user: Option<User>,
    rooms: Vec<Room>,
    /// True until the first load finishes, and during reloads
    loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            user: None,
            rooms: Vec::new(),
            loading: true,
        }
    }
}

impl<G> Session<G>
where
    G: Gateway,
{
    pub fn new(context: &ClientContext<G>) -> Self {
        Self {
            context: context.clone(),
            state: Default::default(),
        }
    }

    /// Fetches the account and its room list in one go.
    pub async fn load(&self) -> Result<()> {
        self.state.lock().loading = true;

        let result = futures_util::try_join!(
            self.context.gateway.current_user(),
            self.context.gateway.user_rooms(),
        );

        let (user, rooms) = match result {
            Ok(loaded) => loaded,
            Err(e) => {
                self.state.lock().loading = false;
                return Err(e);
            }
        };

        info!("Session loaded for {} with {} rooms", user.name, rooms.len());

        let user_id = user.id;
        let room_count = rooms.len();
        {
            let mut state = self.state.lock();
            state.user = Some(user);
            state.rooms = rooms;
            state.loading = false;
        }

        self.context.emit(ClientEvent::SessionLoaded {
            user_id,
            rooms: room_count,
        });

        Ok(())
    }

    /// Refreshes the room list without touching the account.
    pub async fn reload_rooms(&self) -> Result<()> {
        self.state.lock().loading = true;

        let result = self.context.gateway.user_rooms().await;

        let rooms = match result {
            Ok(rooms) => rooms,
            Err(e) => {
                self.state.lock().loading = false;
                return Err(e);
            }
        };

        let mut state = self.state.lock();
        state.rooms = rooms;
        state.loading = false;

        Ok(())
    }

    pub fn user(&self) -> Option<User> {
        self.state.lock().user.clone()
    }

    pub fn rooms(&self) -> Vec<Room> {
        self.state.lock().rooms.clone()
    }

    pub fn room_by_id(&self, room_id: PrimaryKey) -> Option<Room> {
        self.state
            .lock()
            .rooms
            .iter()
            .find(|room| room.id == room_id)
            .cloned()
    }

    /// True while the session is still being fetched.
    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }
}
