mod config;
mod events;
mod gateway;
mod records;
mod session;
mod store;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use crossbeam::channel::unbounded;

pub use config::*;
pub use events::*;
pub use gateway::*;
pub use records::*;
pub use session::*;
pub use store::*;

/// The parlor client, facilitating account bootstrap, room selection, and the
/// selected room's tab data.
pub struct Parlor<G> {
    gateway: Arc<G>,
    event_receiver: EventReceiver,

    pub session: Session<G>,
    pub store: RoomStore<G>,
}

/// A type passed to the components of the client, to reach the backend and
/// emit events.
pub struct ClientContext<G> {
    pub gateway: Arc<G>,
    event_sender: EventSender,
}

impl<G> Parlor<G>
where
    G: Gateway,
{
    pub fn new(gateway: G) -> Self {
        let gateway = Arc::new(gateway);
        let (event_sender, event_receiver) = unbounded();

        let context = ClientContext {
            gateway: gateway.clone(),
            event_sender,
        };

        let session = Session::new(&context);
        let store = RoomStore::new(&context);

        Self {
            gateway,
            event_receiver,
            session,
            store,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Makes a room the selected one. A room the account is not a member of
    /// deselects instead, and is recorded as a preview request once the
    /// session has finished loading.
    pub fn open_room(&self, room_id: PrimaryKey) {
        let room = self.session.room_by_id(room_id);
        let known = room.is_some();

        self.store.select_room(room);

        if !known && !self.session.is_loading() {
            self.store.show_preview(room_id);
        }
    }

    /// Blocks until an event is emitted, then returns it.
    pub fn wait_for_event(&self) -> ClientEvent {
        self.event_receiver
            .recv()
            .expect("event is received without error")
    }

    /// Returns the next pending event, if any.
    pub fn poll_event(&self) -> Option<ClientEvent> {
        self.event_receiver.try_recv().ok()
    }
}

impl Parlor<HttpGateway> {
    /// Creates a client that talks to a real backend.
    pub fn connect(config: ApiConfig) -> Self {
        Self::new(HttpGateway::new(config))
    }
}

impl<G> ClientContext<G> {
    pub fn emit(&self, event: ClientEvent) {
        self.event_sender.send(event).expect("event is sent");
    }
}

impl<G> Clone for ClientContext<G>
where
    G: Gateway,
{
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            event_sender: self.event_sender.clone(),
        }
    }
}
