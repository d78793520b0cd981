use std::collections::HashMap;

use bytes::{Bytes, BytesMut};
use tably_protocol::{EventCode, EventPayload, Frame, InitialOrders, NewOrderReceived, Order};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

pub type ConnectionId = u64;

/// Single source of truth for active orders, plus the fan-out set of live
/// connections. Shared as `SharedHub`; every mutation runs under that lock,
/// so no two read-modify-broadcast sequences can interleave.
///
/// Connections never touch the registry directly. They submit place/complete
/// intents through the session layer and receive pushed snapshots through
/// their outbound channel. The registry starts empty on every process start;
/// there is no persistence.
pub struct OrderHub {
    orders: Vec<Order>,
    connections: HashMap<ConnectionId, UnboundedSender<Bytes>>,
    next_connection_id: ConnectionId,
}

impl OrderHub {
    pub fn new() -> OrderHub {
        OrderHub {
            orders: Vec::new(),
            connections: HashMap::new(),
            next_connection_id: 0,
        }
    }

    /// Adds a connection to the fan-out set and immediately sends it the
    /// current order list, to this connection only. Because registration
    /// holds the hub lock, the snapshot is either fully pre- or fully
    /// post-mutation relative to any concurrent place/complete.
    pub fn register(&mut self, sender: UnboundedSender<Bytes>) -> ConnectionId {
        let id = self.next_connection_id;
        self.next_connection_id += 1;

        let body = InitialOrders {
            orders: self.orders.clone(),
        }
        .serialize();
        match body {
            Ok(data) => {
                let frame = snapshot_frame(EventCode::InitialOrders, data);
                if sender.send(frame).is_err() {
                    // Writer already gone; the next broadcast prunes it.
                    warn!(connection = id, "initial snapshot undeliverable");
                }
            }
            Err(e) => warn!(connection = id, "could not encode initial snapshot: {e}"),
        }

        self.connections.insert(id, sender);
        debug!(connection = id, "connection registered");
        id
    }

    /// Removes a connection from the fan-out set. The order registry is not
    /// affected.
    pub fn unregister(&mut self, id: ConnectionId) {
        if self.connections.remove(&id).is_some() {
            debug!(connection = id, "connection unregistered");
        }
    }

    /// Appends the order to the registry and broadcasts the full updated
    /// list to every registered connection, submitter included. An order
    /// with an empty item list is accepted structurally; validation is the
    /// caller's responsibility.
    pub fn place_order(&mut self, order: Order) {
        debug!(order = %order.id, table = %order.table, "order placed");
        self.orders.push(order);
        self.broadcast();
    }

    /// Removes the matching order, then broadcasts. An unknown id is a
    /// no-op, not an error: a waiter double-clicking, or two waiters racing
    /// to complete the same order, must both come out clean.
    pub fn complete_order(&mut self, order_id: &str) {
        let before = self.orders.len();
        self.orders.retain(|o| o.id != order_id);
        if self.orders.len() < before {
            debug!(order = %order_id, "order completed");
        } else {
            debug!(order = %order_id, "complete for unknown order, ignoring");
        }
        self.broadcast();
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Encodes the snapshot once, then pushes it to every connection in the
    /// current fan-out set. Channel sends never block, so a slow socket
    /// cannot stall registry mutations; the actual write happens in that
    /// connection's writer task. A failed send means the writer is gone and
    /// the connection is pruned, without disturbing delivery to the rest.
    fn broadcast(&mut self) {
        let body = NewOrderReceived {
            orders: self.orders.clone(),
        }
        .serialize();
        let frame = match body {
            Ok(data) => snapshot_frame(EventCode::NewOrderReceived, data),
            Err(e) => {
                warn!("could not encode broadcast snapshot: {e}");
                return;
            }
        };

        let mut dead = Vec::new();
        for (&id, sender) in &self.connections {
            if sender.send(frame.clone()).is_err() {
                dead.push(id);
            }
        }

        for id in dead {
            warn!(connection = id, "dropping dead connection during broadcast");
            self.connections.remove(&id);
        }
    }
}

impl Default for OrderHub {
    fn default() -> Self {
        Self::new()
    }
}

fn snapshot_frame(code: EventCode, data: Bytes) -> Bytes {
    let payload = EventPayload { code, data };
    let frame = Frame::event(payload.serialize().to_vec());
    let mut buf = BytesMut::new();
    frame.encode(&mut buf);
    buf.freeze()
}
