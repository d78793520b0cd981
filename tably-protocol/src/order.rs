use serde::{Deserialize, Serialize};

/// One line of a cart, captured at the moment the order was submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

/// An order as it travels on the wire and sits in the hub registry.
///
/// The submitting client fills in everything: a process-unique `id`,
/// the cart snapshot, the creation `timestamp` (epoch millis) and the
/// `total_price`. The total is stored rather than recomputed so that later
/// menu price edits never alter an open order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub items: Vec<OrderItem>,
    pub total_price: f64,
    pub timestamp: i64,
    pub table: String,
}

impl Order {
    pub fn new(
        id: impl Into<String>,
        items: Vec<OrderItem>,
        table: impl Into<String>,
        timestamp: i64,
    ) -> Order {
        let total_price = items.iter().map(|i| i.price * i.quantity as f64).sum();
        Order {
            id: id.into(),
            items,
            total_price,
            timestamp,
            table: table.into(),
        }
    }
}
