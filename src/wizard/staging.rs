//! Scratch storage that carries customer picks from the Customers stage to
//! the Schedule stage.

use std::collections::HashMap;

use super::draft::CustomerSelection;

/// Slot holding the JSON array of staged customers.
pub const CUSTOMERS_KEY: &str = "routeCustomers";

/// A string key-value scratch space, owned by one wizard.
pub trait StagingStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStaging {
    slots: HashMap<String, String>,
}

impl StagingStore for MemoryStaging {
    fn get(&self, key: &str) -> Option<String> {
        self.slots.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.slots.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.slots.remove(key);
    }
}

/// Typed access to the staged customer list.
#[derive(Debug)]
pub struct Staging<S> {
    store: S,
}

impl<S: StagingStore> Staging<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Staged customers. A missing or malformed slot reads as empty.
    pub fn customers(&self) -> Vec<CustomerSelection> {
        let Some(raw) = self.store.get(CUSTOMERS_KEY) else {
            return Vec::new();
        };

        match serde_json::from_str::<Vec<CustomerSelection>>(&raw) {
            Ok(customers) => customers,
            Err(e) => {
                tracing::warn!(error = %e, "Staged customers are unreadable, treating as empty");
                Vec::new()
            }
        }
    }

    /// Append to the staged list (read, extend, write back).
    pub fn append_customers(&mut self, new: &[CustomerSelection]) -> Result<usize, serde_json::Error> {
        let mut customers = self.customers();
        customers.extend_from_slice(new);
        let encoded = serde_json::to_string(&customers)?;
        self.store.set(CUSTOMERS_KEY, encoded);
        Ok(customers.len())
    }

    pub fn clear(&mut self) {
        self.store.remove(CUSTOMERS_KEY);
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}
