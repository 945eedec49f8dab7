//! Client registry
//!
//! Every client ever registered, keyed by id. Entries are tombstoned on
//! disconnect instead of removed, so ids never get renumbered and
//! `len()` counts every registration.

use std::collections::BTreeMap;

use crate::client::Client;
use crate::types::ClientId;

#[derive(Debug)]
struct Entry {
    client: Client,
    alive: bool,
}

/// Id-keyed registry with liveness flags
///
/// Owned by the router; nothing else holds a reference to it.
#[derive(Debug, Default)]
pub struct Registry {
    entries: BTreeMap<ClientId, Entry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a live client
    ///
    /// Returns false (and leaves the registry untouched) if the id is taken.
    pub fn insert(&mut self, client: Client) -> bool {
        if self.entries.contains_key(&client.id) {
            return false;
        }
        self.entries.insert(client.id, Entry { client, alive: true });
        true
    }

    /// Look up a live client
    pub fn get_live(&self, id: ClientId) -> Option<&Client> {
        self.entries
            .get(&id)
            .filter(|entry| entry.alive)
            .map(|entry| &entry.client)
    }

    /// Mark a client dead and hand it back, if it was alive
    pub fn tombstone(&mut self, id: ClientId) -> Option<&Client> {
        let entry = self.entries.get_mut(&id)?;
        if !entry.alive {
            return None;
        }
        entry.alive = false;
        Some(&entry.client)
    }

    /// Live clients in arrival order
    pub fn live(&self) -> impl Iterator<Item = &Client> {
        self.entries
            .values()
            .filter(|entry| entry.alive)
            .map(|entry| &entry.client)
    }

    /// Ids of live clients in arrival order
    pub fn live_ids(&self) -> Vec<ClientId> {
        self.live().map(|client| client.id).collect()
    }

    /// Number of clients ever registered, dead ones included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn live_count(&self) -> usize {
        self.live().count()
    }

    /// Id the next registration should receive: `len() + 1`
    pub fn next_id(&self) -> ClientId {
        ClientId(self.entries.len() as u64 + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OverflowPolicy;

    fn client(id: u64) -> Client {
        Client::new(ClientId(id), 4, OverflowPolicy::Disconnect)
    }

    #[test]
    fn test_registry_insert_and_next_id() {
        let mut registry = Registry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.next_id(), ClientId(1));

        assert!(registry.insert(client(1)));
        assert!(registry.insert(client(2)));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.next_id(), ClientId(3));
    }

    #[test]
    fn test_registry_rejects_duplicate_id() {
        let mut registry = Registry::new();
        assert!(registry.insert(client(1)));
        assert!(!registry.insert(client(1)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_tombstone() {
        let mut registry = Registry::new();
        registry.insert(client(1));
        registry.insert(client(2));
        registry.insert(client(3));

        assert!(registry.tombstone(ClientId(2)).is_some());
        // Second tombstone is a no-op
        assert!(registry.tombstone(ClientId(2)).is_none());
        assert!(registry.tombstone(ClientId(9)).is_none());

        assert!(registry.get_live(ClientId(2)).is_none());
        assert_eq!(registry.live_ids(), vec![ClientId(1), ClientId(3)]);
        assert_eq!(registry.live_count(), 2);

        // Dead entries still count towards the next id
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.next_id(), ClientId(4));
    }

    #[test]
    fn test_registry_live_order_is_arrival_order() {
        let mut registry = Registry::new();
        for id in 1..=12 {
            registry.insert(client(id));
        }
        let ids: Vec<u64> = registry.live_ids().into_iter().map(|id| id.0).collect();
        assert_eq!(ids, (1..=12).collect::<Vec<_>>());
    }
}
