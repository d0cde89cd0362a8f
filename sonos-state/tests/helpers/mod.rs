//! Fakes shared by the engine integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use jishi_api::{ApiError, ZoneGroup, ZonePlayer, ZoneSource};
use sonos_state::{EngineConfig, NodeAddress, NodeRegistry, SyncEngine};

/// One scripted answer to `fetch_zones`
#[derive(Debug, Clone)]
pub enum Scripted {
    Zones(Vec<ZoneGroup>),
    Fail(String),
}

/// Zone source answering from a script, in call order
///
/// Once the script runs out every call returns the fallback zones.
#[derive(Default)]
pub struct FakeZoneSource {
    script: Mutex<VecDeque<(Duration, Scripted)>>,
    fallback: Vec<ZoneGroup>,
    calls: AtomicUsize,
}

impl FakeZoneSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fallback(mut self, zones: Vec<ZoneGroup>) -> Self {
        self.fallback = zones;
        self
    }

    pub fn then(self, response: Scripted) -> Self {
        self.then_after(Duration::ZERO, response)
    }

    pub fn then_after(self, delay: Duration, response: Scripted) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back((delay, response));
        }
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ZoneSource for FakeZoneSource {
    async fn fetch_zones(&self) -> jishi_api::Result<Vec<ZoneGroup>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();

        match next {
            Some((delay, response)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                match response {
                    Scripted::Zones(zones) => Ok(zones),
                    Scripted::Fail(message) => Err(ApiError::Network(message)),
                }
            }
            None => Ok(self.fallback.clone()),
        }
    }
}

/// Platform identifier whose node address is `slice` lowercased
pub fn rincon(slice: &str) -> String {
    assert_eq!(slice.len(), 7);
    format!("RINCON_000E5{}01400", slice)
}

pub fn address(slice: &str) -> NodeAddress {
    NodeAddress::new(slice)
}

fn player(slice: &str, room: &str) -> ZonePlayer {
    ZonePlayer {
        uuid: rincon(slice),
        room_name: room.to_string(),
    }
}

/// Zone coordinated by the first `(slice, room)` pair
pub fn zone(players: &[(&str, &str)]) -> ZoneGroup {
    let members: Vec<ZonePlayer> = players
        .iter()
        .map(|(slice, room)| player(slice, room))
        .collect();
    ZoneGroup {
        uuid: members[0].uuid.clone(),
        coordinator: members[0].clone(),
        members,
    }
}

/// Registry holding the given `(slice, room)` nodes
pub fn registry_with(nodes: &[(&str, &str)]) -> NodeRegistry {
    let registry = NodeRegistry::new();
    for (slice, room) in nodes {
        registry.add_node(address(slice), *room);
    }
    registry
}

/// Engine that only fetches zones on topology events
pub fn quiet_engine(registry: &NodeRegistry, source: Arc<FakeZoneSource>) -> SyncEngine {
    SyncEngine::new(Arc::new(registry.clone()), source).with_config(EngineConfig {
        refresh_on_start: false,
    })
}
