pub mod complete_order;
pub mod place_order;

pub use complete_order::CompleteOrder;
pub use place_order::PlaceOrder;
