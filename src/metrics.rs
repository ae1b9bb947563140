//! Summary statistics derived from the customer store and transaction log.

use crate::customer::{Customer, CustomerStore};
use crate::core::CustomerId;
use crate::transaction::TransactionLog;
use serde::ser::SerializeMap;
use serde::Serialize;

/// How many customers are listed in [Metrics::top_customers].
pub const TOP_CUSTOMERS: usize = 10;

/// A snapshot of the spending statistics, computed on demand.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Metrics {
    pub total_customers: usize,
    pub total_transactions: usize,
    /// Sum of the amounts credited to known customers, which excludes any transaction that
    /// referenced an unknown customer.
    pub total_revenue: f64,
    pub average_transaction_value: f64,
    /// Highest spenders first, customers spending the same amount keep their store order.
    pub top_customers: Vec<(CustomerId, Customer)>,
    pub category_breakdown: CategoryBreakdown,
}

/// Number of transactions per category, in order of first appearance in the log.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryBreakdown {
    counts: Vec<(String, usize)>,
    index: std::collections::HashMap<String, usize>,
}

impl CategoryBreakdown {
    pub fn count(&mut self, category: &str) {
        match self.index.get(category) {
            Some(&position) => self.counts[position].1 += 1,
            None => {
                self.index.insert(category.to_owned(), self.counts.len());
                self.counts.push((category.to_owned(), 1));
            }
        }
    }

    pub fn get(&self, category: &str) -> Option<usize> {
        self.index
            .get(category)
            .map(|&position| self.counts[position].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(name, count)| (name.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl Serialize for CategoryBreakdown {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (category, count) in self.iter() {
            map.serialize_entry(category, &count)?;
        }
        map.end()
    }
}

/// Compute the [Metrics] for the given state, or `None` when there are no customers at all.
///
/// Entries of the store which are not structured records count towards the number of customers,
/// but are otherwise ignored.
pub fn calculate(customers: &CustomerStore, transactions: &TransactionLog) -> Option<Metrics> {
    if customers.is_empty() {
        return None;
    }

    let total_transactions = transactions.len();
    let total_revenue: f64 = customers.records().map(|(_, c)| c.total_spent).sum();
    let average_transaction_value = if total_transactions > 0 {
        total_revenue / total_transactions as f64
    } else {
        0.0
    };

    let mut ranked: Vec<_> = customers.records().collect();
    // `sort_by` is stable, ties keep their store order
    ranked.sort_by(|(_, lhs), (_, rhs)| {
        rhs.total_spent
            .partial_cmp(&lhs.total_spent)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let top_customers = ranked
        .into_iter()
        .take(TOP_CUSTOMERS)
        .map(|(id, customer)| (id.clone(), customer.clone()))
        .collect();

    let mut category_breakdown = CategoryBreakdown::default();
    for tx in transactions.iter() {
        category_breakdown.count(&tx.category);
    }

    Some(Metrics {
        total_customers: customers.len(),
        total_transactions,
        total_revenue,
        average_transaction_value,
        top_customers,
        category_breakdown,
    })
}
