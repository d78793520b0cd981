pub mod errors;
pub mod event;
pub mod frame;
pub mod order;
mod push;
mod request;

// Public re-exports for easy access
pub use errors::ProtocolError;
pub use event::{EventCode, EventPayload};
pub use frame::{Frame, FrameType, PROTOCOL_VERSION};
pub use order::{Order, OrderItem};

pub use push::{InitialOrders, NewOrderReceived};
pub use request::{CompleteOrder, PlaceOrder};
