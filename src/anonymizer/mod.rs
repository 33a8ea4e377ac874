//! Deterministic substitute data for demo sessions.
//!
//! A demo login must be able to walk every dashboard screen without seeing
//! real venue or player details. Each display field is replaced by a value
//! picked from a fixed table using a hash of the entity's own identifier, so
//! the same store or user always shows the same substitute. Identifier fields
//! (`_id`, `storeId`, `hubId`, `machineId`, `userId`) are never rewritten,
//! which keeps every follow-up API call pointed at the real record.
//!
//! With demo mode off every transform returns its input unchanged.

pub mod hashing;
pub mod tables;

pub use hashing::stable_index;
pub use tables::{LookupTable, Venue, DEMO_ZIP_CODE, FIRST_NAMES, LAST_NAMES, VENUES};

use crate::data_classifier::classifier::classify_sensitive;
use crate::data_classifier::SensitiveDataType;
use crate::models::{Hub, HubEvent, Machine, Store, Transaction, User};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Returned for an email with no `@domain` part
pub const MASKED_EMAIL: &str = "hidden@demo.example";

const EMAIL_BUCKETS: usize = 100;
const PHONE_BUCKETS: usize = 9000;
const WALLET_BUCKETS: usize = 9999;
const HUB_BUCKETS: usize = 10;
const MACHINE_BUCKETS: usize = 50;

/// Whether the current session shows substitute data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DemoMode {
    #[default]
    Off,
    Active,
}

impl DemoMode {
    pub fn is_active(self) -> bool {
        self == DemoMode::Active
    }
}

impl From<bool> for DemoMode {
    fn from(is_demo: bool) -> Self {
        if is_demo {
            DemoMode::Active
        } else {
            DemoMode::Off
        }
    }
}

#[derive(Clone, Copy)]
pub struct Anonymizer<'t> {
    mode: DemoMode,
    venues: &'t dyn LookupTable<Venue>,
    first_names: &'t dyn LookupTable<&'static str>,
    last_names: &'t dyn LookupTable<&'static str>,
}

impl Anonymizer<'static> {
    /// Anonymizer backed by the built-in tables
    pub fn new(mode: DemoMode) -> Self {
        Anonymizer {
            mode,
            venues: &VENUES,
            first_names: &FIRST_NAMES,
            last_names: &LAST_NAMES,
        }
    }
}

impl<'t> Anonymizer<'t> {
    pub fn with_tables(
        mode: DemoMode,
        venues: &'t dyn LookupTable<Venue>,
        first_names: &'t dyn LookupTable<&'static str>,
        last_names: &'t dyn LookupTable<&'static str>,
    ) -> Self {
        Anonymizer { mode, venues, first_names, last_names }
    }

    pub fn mode(&self) -> DemoMode {
        self.mode
    }

    #[inline]
    fn masks(&self, identifier: &str) -> bool {
        self.mode.is_active() && !identifier.is_empty()
    }

    pub fn anonymize_email(&self, email: &str) -> String {
        if !self.masks(email) {
            return email.to_string();
        }
        match email.split_once('@') {
            Some((_, domain)) if !domain.is_empty() => {
                format!("user{}@demo.example", stable_index(email, EMAIL_BUCKETS))
            }
            _ => MASKED_EMAIL.to_string(),
        }
    }

    pub fn anonymize_phone(&self, phone: &str) -> String {
        if !self.masks(phone) {
            return phone.to_string();
        }
        format!("(555) 555-{}", stable_index(phone, PHONE_BUCKETS) + 1000)
    }

    pub fn anonymize_wallet_address(&self, address: &str) -> String {
        if !self.masks(address) {
            return address.to_string();
        }
        format!("0x{:04x}...demo", stable_index(address, WALLET_BUCKETS))
    }

    /// Display name for a hub; `name` is what the backend calls it
    pub fn anonymize_hub_name(&self, hub_id: &str, name: &str) -> String {
        if !self.masks(hub_id) {
            return name.to_string();
        }
        format!("Demo Hub {}", stable_index(hub_id, HUB_BUCKETS) + 1)
    }

    pub fn anonymize_machine_name(&self, machine_id: &str, name: &str) -> String {
        if !self.masks(machine_id) {
            return name.to_string();
        }
        format!("Machine-{:02}", stable_index(machine_id, MACHINE_BUCKETS) + 1)
    }

    /// Label shown where a raw machine id would be printed.
    ///
    /// Independent of `anonymize_machine_name`; the two are not expected to
    /// agree on the number.
    pub fn anonymize_machine_id(&self, machine_id: &str) -> String {
        if !self.masks(machine_id) {
            return machine_id.to_string();
        }
        format!("MCH-{:03}", stable_index(machine_id, MACHINE_BUCKETS) + 1)
    }

    /// Substitute for a free-form contact value, dispatched on `kind`.
    /// Without a kind the value is classified first.
    pub fn anonymize_value(&self, value: &str, kind: Option<SensitiveDataType>) -> String {
        match kind.or_else(|| classify_sensitive(value)) {
            Some(SensitiveDataType::Email) => self.anonymize_email(value),
            Some(SensitiveDataType::Phone) => self.anonymize_phone(value),
            Some(SensitiveDataType::WalletAddress) => self.anonymize_wallet_address(value),
            _ => value.to_string(),
        }
    }

    fn person_name(&self, key: &str) -> (Option<String>, Option<String>) {
        let first = self.first_names.pick(&format!("{}first", key));
        let last = self.last_names.pick(&format!("{}last", key));
        (first.map(|s| s.to_string()), last.map(|s| s.to_string()))
    }

    fn venue(&self, store_id: &str) -> Option<&'t Venue> {
        if !self.masks(store_id) {
            return None;
        }
        let venues = self.venues;
        venues.pick(store_id)
    }

    pub fn anonymize_store(&self, mut store: Store) -> Store {
        let Some(venue) = self.venue(&store.store_id) else {
            return store;
        };
        store.store_name = Some(venue.name.to_string());
        store.address = Some(venue.address.to_string());
        store.city = Some(venue.city.to_string());
        store.state = Some(venue.state.to_string());
        store.zip_code = Some(DEMO_ZIP_CODE.to_string());
        store
    }

    pub fn anonymize_user(&self, mut user: User) -> User {
        if !self.masks(&user.id) {
            return user;
        }
        let (first, last) = self.person_name(&user.id);
        user.first_name = first.or(user.first_name);
        user.last_name = last.or(user.last_name);
        user.email = user.email.map(|e| self.anonymize_email(&e));
        user.phone = user.phone.map(|p| self.anonymize_phone(&p));
        user.wallet_address = user.wallet_address.map(|w| self.anonymize_wallet_address(&w));
        user
    }

    /// Masks the counterparty on a transaction. The name comes from the
    /// user id so it matches what the user's own page shows.
    pub fn anonymize_transaction(&self, mut tx: Transaction) -> Transaction {
        let key = tx.counterparty_key().to_string();
        if !self.masks(&key) {
            return tx;
        }
        let (first, last) = self.person_name(&key);
        tx.first_name = first.or(tx.first_name);
        tx.last_name = last.or(tx.last_name);
        tx.wallet_address = tx.wallet_address.map(|w| self.anonymize_wallet_address(&w));
        tx
    }

    pub fn anonymize_hub(&self, mut hub: Hub) -> Hub {
        if !self.masks(&hub.hub_id) {
            return hub;
        }
        let name = hub.name.take().unwrap_or_default();
        hub.name = Some(self.anonymize_hub_name(&hub.hub_id, &name));
        if hub.store_name.is_some() {
            if let Some(venue) = hub.store_id.as_deref().and_then(|id| self.venue(id)) {
                hub.store_name = Some(venue.name.to_string());
            }
        }
        hub
    }

    pub fn anonymize_machine(&self, mut machine: Machine) -> Machine {
        if !self.masks(&machine.machine_id) {
            return machine;
        }
        let name = machine.name.take().unwrap_or_default();
        machine.name = Some(self.anonymize_machine_name(&machine.machine_id, &name));
        machine
    }

    pub fn anonymize_hub_event(&self, mut event: HubEvent) -> HubEvent {
        if !self.mode.is_active() {
            return event;
        }
        if let Some(machine_id) = event.machine_id.as_deref().filter(|id| !id.is_empty()) {
            event.machine_label = Some(self.anonymize_machine_id(machine_id));
        }
        event
    }

    pub fn anonymize_stores(&self, stores: Vec<Store>) -> Vec<Store> {
        stores.into_iter().map(|s| self.anonymize_store(s)).collect()
    }

    pub fn anonymize_users(&self, users: Vec<User>) -> Vec<User> {
        users.into_iter().map(|u| self.anonymize_user(u)).collect()
    }

    pub fn anonymize_transactions(&self, transactions: Vec<Transaction>) -> Vec<Transaction> {
        transactions.into_iter().map(|t| self.anonymize_transaction(t)).collect()
    }

    pub fn anonymize_hubs(&self, hubs: Vec<Hub>) -> Vec<Hub> {
        hubs.into_iter().map(|h| self.anonymize_hub(h)).collect()
    }

    pub fn anonymize_machines(&self, machines: Vec<Machine>) -> Vec<Machine> {
        machines.into_iter().map(|m| self.anonymize_machine(m)).collect()
    }

    pub fn anonymize_hub_events(&self, events: Vec<HubEvent>) -> Vec<HubEvent> {
        events.into_iter().map(|e| self.anonymize_hub_event(e)).collect()
    }

    /// Masks the entity objects nested in an otherwise opaque backend payload
    /// (`machine`, `store`, `hub`, `user` and their plurals). Other keys and
    /// anything that does not parse as the named entity pass through as is.
    pub fn anonymize_payload(&self, payload: Value) -> Value {
        if !self.mode.is_active() {
            return payload;
        }
        let Value::Object(mut map) = payload else {
            return payload;
        };
        for (key, value) in map.iter_mut() {
            let masked = match key.as_str() {
                "machine" => remap(value, |m| self.anonymize_machine(m)),
                "machines" => remap(value, |m| self.anonymize_machines(m)),
                "store" => remap(value, |s| self.anonymize_store(s)),
                "stores" => remap(value, |s| self.anonymize_stores(s)),
                "hub" => remap(value, |h| self.anonymize_hub(h)),
                "hubs" => remap(value, |h| self.anonymize_hubs(h)),
                "user" => remap(value, |u| self.anonymize_user(u)),
                "users" => remap(value, |u| self.anonymize_users(u)),
                _ => None,
            };
            if let Some(masked) = masked {
                *value = masked;
            }
        }
        Value::Object(map)
    }
}

/// Runs `transform` over `value` read as a `T`. `None` when it does not parse
/// or nothing changed, so untouched objects keep their exact shape.
fn remap<T, F>(value: &Value, transform: F) -> Option<Value>
where
    T: DeserializeOwned + Serialize + Clone + PartialEq,
    F: FnOnce(T) -> T,
{
    let entity: T = serde_json::from_value(value.clone()).ok()?;
    let masked = transform(entity.clone());
    if masked == entity {
        return None;
    }
    serde_json::to_value(masked).ok()
}
