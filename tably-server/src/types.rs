use crate::core::hub::OrderHub;
use std::sync::Arc;
use tokio::sync::Mutex;

pub type SharedHub = Arc<Mutex<OrderHub>>;
