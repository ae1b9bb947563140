//! Customer records and the insertion-ordered store holding them.

use crate::core::{format_float, CustomerId};
use crate::{ProcessError, ProcessResult};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize};

/// A customer, along with the running totals of the transactions credited to them.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Customer {
    pub name: String,
    pub email: String,
    pub join_date: String,
    pub total_spent: f64,
    pub transaction_count: u64,
}

impl Customer {
    /// Names of the fields exposed by a record, in their serialization order.
    pub const FIELDS: [&'static str; 5] = [
        "name",
        "email",
        "join_date",
        "total_spent",
        "transaction_count",
    ];

    /// A fresh customer, with no spending recorded yet.
    pub fn new(name: String, email: String, join_date: String) -> Self {
        Self {
            name,
            email,
            join_date,
            total_spent: 0.0,
            transaction_count: 0,
        }
    }

    /// Credit a transaction of the given amount to this customer.
    pub fn record(&mut self, amount: f64) {
        self.total_spent += amount;
        self.transaction_count += 1;
    }

    /// The textual representation of a field, if this record has one by that name.
    pub fn field(&self, name: &str) -> Option<String> {
        let value = match name {
            "name" => self.name.clone(),
            "email" => self.email.clone(),
            "join_date" => self.join_date.clone(),
            "total_spent" => format_float(self.total_spent),
            "transaction_count" => self.transaction_count.to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// All field values, in the same order as [Customer::FIELDS].
    pub fn field_values(&self) -> [String; 5] {
        [
            self.name.clone(),
            self.email.clone(),
            self.join_date.clone(),
            format_float(self.total_spent),
            self.transaction_count.to_string(),
        ]
    }
}

/// A value held by the [CustomerStore]. Loading only ever produces structured records, but a
/// store may be populated by other means, in which case a value might not expose any fields.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CustomerEntry {
    Record(Customer),
    Opaque(serde_json::Value),
}

impl CustomerEntry {
    /// The structured record, if this entry is one.
    pub fn as_record(&self) -> Option<&Customer> {
        match self {
            CustomerEntry::Record(customer) => Some(customer),
            CustomerEntry::Opaque(_) => None,
        }
    }

    pub fn as_record_mut(&mut self) -> Option<&mut Customer> {
        match self {
            CustomerEntry::Record(customer) => Some(customer),
            CustomerEntry::Opaque(_) => None,
        }
    }
}

impl From<Customer> for CustomerEntry {
    fn from(customer: Customer) -> Self {
        CustomerEntry::Record(customer)
    }
}

/// Customers keyed by their id. Iteration follows insertion order, overwriting an existing id
/// keeps its original position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CustomerStore {
    entries: Vec<(CustomerId, CustomerEntry)>,
    index: std::collections::HashMap<CustomerId, usize>,
}

impl CustomerStore {
    pub fn new() -> Self {
        Default::default()
    }

    /// Insert an entry, returning the value previously stored under that id if any.
    pub fn insert(&mut self, id: CustomerId, entry: impl Into<CustomerEntry>) -> Option<CustomerEntry> {
        let entry = entry.into();
        match self.index.get(&id) {
            Some(&position) => Some(std::mem::replace(&mut self.entries[position].1, entry)),
            None => {
                self.index.insert(id.clone(), self.entries.len());
                self.entries.push((id, entry));
                None
            }
        }
    }

    pub fn get(&self, id: &CustomerId) -> Option<&CustomerEntry> {
        self.index.get(id).map(|&position| &self.entries[position].1)
    }

    pub fn get_mut(&mut self, id: &CustomerId) -> Option<&mut CustomerEntry> {
        match self.index.get(id) {
            Some(&position) => Some(&mut self.entries[position].1),
            None => None,
        }
    }

    pub fn contains(&self, id: &CustomerId) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The first entry in iteration order.
    pub fn first(&self) -> Option<(&CustomerId, &CustomerEntry)> {
        self.entries.first().map(|(id, entry)| (id, entry))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CustomerId, &CustomerEntry)> {
        self.entries.iter().map(|(id, entry)| (id, entry))
    }

    pub fn values(&self) -> impl Iterator<Item = &CustomerEntry> {
        self.entries.iter().map(|(_, entry)| entry)
    }

    /// Only the structured records, skipping any opaque value.
    pub fn records(&self) -> impl Iterator<Item = (&CustomerId, &Customer)> {
        self.iter()
            .filter_map(|(id, entry)| entry.as_record().map(|customer| (id, customer)))
    }

    /// Serialize a [CustomerStore] to CSV, one row per structured record.
    ///
    /// The columns are taken from the first entry, which must be a structured record. An empty
    /// store produces no output at all, not even a header.
    pub fn dump_csv<W: std::io::Write>(&self, writer: &mut csv::Writer<W>) -> ProcessResult<()> {
        let first = match self.first() {
            Some((_, first)) => first,
            None => return Ok(()),
        };
        if first.as_record().is_none() {
            return Err(ProcessError::Serialization(
                "Customer records must be dicts to export to CSV".to_owned(),
            ));
        }

        writer.write_field("customer_id")?;
        writer.write_record(Customer::FIELDS)?;
        for (id, customer) in self.records() {
            writer.write_field(&id.0)?;
            writer.write_record(customer.field_values())?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl<I: Into<CustomerEntry>> FromIterator<(CustomerId, I)> for CustomerStore {
    fn from_iter<T: IntoIterator<Item = (CustomerId, I)>>(iter: T) -> Self {
        let mut store = CustomerStore::new();
        for (id, entry) in iter {
            store.insert(id, entry);
        }
        store
    }
}

/// Serialized as a JSON object of id to record, keys in store order.
impl Serialize for CustomerStore {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (id, entry) in self.iter() {
            map.serialize_entry(id, entry)?;
        }
        map.end()
    }
}
