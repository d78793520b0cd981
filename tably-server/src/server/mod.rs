pub(crate) mod params;

mod listener;

pub use listener::{serve, start};
pub use params::Params;
