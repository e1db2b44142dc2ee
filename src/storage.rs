//! Roster and inventory collaborators.

use crate::errors::StorageError;
use crate::pokemon::PokemonInst;
use log::debug;
use schema::Item;
use std::collections::HashMap;

/// Persists the player's roster. Saves replace the whole roster.
pub trait RosterStore: Send {
    fn load_roster(&self) -> Result<Vec<PokemonInst>, StorageError>;
    fn save_roster(&mut self, roster: &[PokemonInst]) -> Result<(), StorageError>;
    /// Every caught Pokemon lands here, whether or not it joins the roster.
    fn store_caught(&mut self, pokemon: PokemonInst) -> Result<(), StorageError>;
}

pub trait Inventory: Send {
    fn count(&self, item: Item) -> u32;
    fn consume(&mut self, item: Item) -> Result<(), StorageError>;
}

/// Keeps the roster as a postcard-encoded snapshot, the same bytes a
/// file-backed store would write.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    roster_bytes: Vec<u8>,
    caught: Vec<PokemonInst>,
    saves: usize,
}

impl InMemoryStore {
    pub fn new(roster: &[PokemonInst]) -> Result<Self, StorageError> {
        let mut store = Self::default();
        store.roster_bytes = encode_roster(roster)?;
        Ok(store)
    }

    pub fn caught(&self) -> &[PokemonInst] {
        &self.caught
    }

    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl RosterStore for InMemoryStore {
    fn load_roster(&self) -> Result<Vec<PokemonInst>, StorageError> {
        if self.roster_bytes.is_empty() {
            return Ok(Vec::new());
        }
        decode_roster(&self.roster_bytes)
    }

    fn save_roster(&mut self, roster: &[PokemonInst]) -> Result<(), StorageError> {
        self.roster_bytes = encode_roster(roster)?;
        self.saves += 1;
        debug!("Saved roster of {} ({} bytes)", roster.len(), self.roster_bytes.len());
        Ok(())
    }

    fn store_caught(&mut self, pokemon: PokemonInst) -> Result<(), StorageError> {
        self.caught.push(pokemon);
        Ok(())
    }
}

pub fn encode_roster(roster: &[PokemonInst]) -> Result<Vec<u8>, StorageError> {
    postcard::to_allocvec(roster).map_err(|e| StorageError::Encode(e.to_string()))
}

pub fn decode_roster(bytes: &[u8]) -> Result<Vec<PokemonInst>, StorageError> {
    postcard::from_bytes(bytes).map_err(|e| StorageError::Decode(e.to_string()))
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryInventory {
    items: HashMap<Item, u32>,
}

impl InMemoryInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, item: Item, count: u32) -> Self {
        *self.items.entry(item).or_insert(0) += count;
        self
    }
}

impl Inventory for InMemoryInventory {
    fn count(&self, item: Item) -> u32 {
        self.items.get(&item).copied().unwrap_or(0)
    }

    fn consume(&mut self, item: Item) -> Result<(), StorageError> {
        match self.items.get_mut(&item) {
            Some(count) if *count > 0 => {
                *count -= 1;
                Ok(())
            }
            _ => Err(StorageError::OutOfItem(item)),
        }
    }
}
