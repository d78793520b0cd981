pub mod initial_orders;
pub mod new_order_received;

pub use initial_orders::InitialOrders;
pub use new_order_received::NewOrderReceived;
