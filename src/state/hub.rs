use std::collections::HashSet;

use axum::extract::ws::Message;
use dashmap::DashMap;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::dto::events::ServerEvent;

#[derive(Clone)]
/// Handle used to push frames to a connected real-time client.
pub struct ClientConnection {
    /// Identifier assigned when the client connected.
    pub id: Uuid,
    /// Outbound queue drained by the socket writer task.
    pub tx: mpsc::UnboundedSender<Message>,
}

/// Fan-out point for real-time events.
///
/// Global events go through a broadcast channel every socket and SSE stream
/// subscribes to. Room events are pushed directly to the members' outbound
/// queues.
pub struct EventHub {
    sender: broadcast::Sender<ServerEvent>,
    clients: DashMap<Uuid, ClientConnection>,
    rooms: DashMap<String, HashSet<Uuid>>,
}

impl EventHub {
    /// Construct a hub whose broadcast channel buffers `capacity` events.
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self {
            sender,
            clients: DashMap::new(),
            rooms: DashMap::new(),
        }
    }

    /// Register a new subscriber that will receive subsequent global events.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.sender.subscribe()
    }

    /// Send an event to every subscriber, ignoring the absence of listeners.
    pub fn broadcast(&self, event: ServerEvent) {
        let _ = self.sender.send(event);
    }

    /// Track a newly connected client.
    pub fn register(&self, id: Uuid, tx: mpsc::UnboundedSender<Message>) {
        self.clients.insert(id, ClientConnection { id, tx });
    }

    /// Number of connected real-time clients.
    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    /// Push `event` to a single client. Returns `false` when it is gone.
    pub fn send_to(&self, client_id: Uuid, event: &ServerEvent) -> bool {
        let Some(tx) = self.clients.get(&client_id).map(|conn| conn.tx.clone()) else {
            return false;
        };
        if send_event(&tx, event) {
            true
        } else {
            warn!(%client_id, "outbound queue closed, dropping client");
            self.disconnect(client_id);
            false
        }
    }

    /// Add `client_id` to `room`. Joining twice is harmless.
    pub fn join(&self, room: &str, client_id: Uuid) {
        self.rooms
            .entry(room.to_string())
            .or_default()
            .insert(client_id);
        debug!(%client_id, room, "joined room");
    }

    /// Remove `client_id` from `room`, dropping the room once empty.
    pub fn leave(&self, room: &str, client_id: Uuid) {
        let now_empty = match self.rooms.get_mut(room) {
            Some(mut members) => {
                members.remove(&client_id);
                members.is_empty()
            }
            None => return,
        };
        if now_empty {
            self.rooms.remove_if(room, |_, members| members.is_empty());
        }
        debug!(%client_id, room, "left room");
    }

    /// Forget a client and remove it from every room. Returns the rooms it left.
    pub fn disconnect(&self, client_id: Uuid) -> Vec<String> {
        self.clients.remove(&client_id);
        let rooms: Vec<String> = self
            .rooms
            .iter()
            .filter(|entry| entry.value().contains(&client_id))
            .map(|entry| entry.key().clone())
            .collect();
        for room in &rooms {
            self.leave(room, client_id);
        }
        rooms
    }

    /// Current members of `room`.
    pub fn room_members(&self, room: &str) -> Vec<Uuid> {
        self.rooms
            .get(room)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Push `event` to every member of `room`.
    pub fn emit_to_room(&self, room: &str, event: &ServerEvent) {
        for member in self.room_members(room) {
            self.send_to(member, event);
        }
    }
}

/// Serialise `event` and queue it on `tx`. Returns `false` if the writer is gone.
///
/// A serialisation failure is logged and reported as delivered since retrying
/// cannot fix it.
pub fn send_event(tx: &mpsc::UnboundedSender<Message>, event: &ServerEvent) -> bool {
    let payload = match event.to_text() {
        Ok(payload) => payload,
        Err(err) => {
            warn!(event = %event.event, error = %err, "failed to serialize event");
            return true;
        }
    };
    tx.send(Message::Text(payload.into())).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(name: &str) -> ServerEvent {
        ServerEvent::json(name, &serde_json::json!({})).unwrap()
    }

    fn client(hub: &EventHub) -> (Uuid, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();
        hub.register(id, tx);
        (id, rx)
    }

    fn received(rx: &mut mpsc::UnboundedReceiver<Message>) -> Vec<String> {
        let mut names = Vec::new();
        while let Ok(Message::Text(text)) = rx.try_recv() {
            let value: serde_json::Value = serde_json::from_str(text.as_str()).unwrap();
            names.push(value["event"].as_str().unwrap().to_string());
        }
        names
    }

    #[test]
    fn room_events_reach_only_members() {
        let hub = EventHub::new(8);
        let (a, mut rx_a) = client(&hub);
        let (_b, mut rx_b) = client(&hub);

        hub.join("table-1", a);
        hub.join("table-1", a);
        hub.emit_to_room("table-1", &event("room_joined"));

        assert_eq!(received(&mut rx_a), vec!["room_joined"]);
        assert!(received(&mut rx_b).is_empty());
        assert_eq!(hub.room_members("table-1"), vec![a]);
    }

    #[test]
    fn disconnect_leaves_every_room() {
        let hub = EventHub::new(8);
        let (a, _rx) = client(&hub);
        hub.join("one", a);
        hub.join("two", a);

        let mut left = hub.disconnect(a);
        left.sort();
        assert_eq!(left, vec!["one", "two"]);
        assert!(hub.room_members("one").is_empty());
        assert_eq!(hub.client_count(), 0);
    }

    #[test]
    fn closed_client_is_dropped_on_send() {
        let hub = EventHub::new(8);
        let (a, rx) = client(&hub);
        hub.join("room", a);
        drop(rx);

        assert!(!hub.send_to(a, &event("ping")));
        assert_eq!(hub.client_count(), 0);
        assert!(hub.room_members("room").is_empty());
    }

    #[tokio::test]
    async fn broadcast_reaches_subscribers() {
        let hub = EventHub::new(8);
        let mut receiver = hub.subscribe();
        hub.broadcast(event("new_track"));
        assert_eq!(receiver.recv().await.unwrap().event, "new_track");
    }
}
