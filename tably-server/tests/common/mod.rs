use bytes::{Bytes, BytesMut};
use tably_protocol::{
    EventCode, EventPayload, Frame, InitialOrders, NewOrderReceived, Order, OrderItem,
};
use tokio::sync::mpsc::UnboundedReceiver;

pub fn wings_item() -> OrderItem {
    OrderItem {
        id: "i1".into(),
        name: "Wings".into(),
        price: 9.5,
        quantity: 2,
    }
}

pub fn order(id: &str, table: &str) -> Order {
    Order::new(id, vec![wings_item()], table, 1_700_000_000_000)
}

/// Decodes one pushed frame into its event code and order list.
pub fn decode_push(raw: Bytes) -> (EventCode, Vec<Order>) {
    let mut buf = BytesMut::from(&raw[..]);
    let frame = Frame::decode(&mut buf)
        .expect("frame decode failed")
        .expect("frame was incomplete");
    assert!(buf.is_empty(), "one push should be exactly one frame");

    let payload = EventPayload::deserialize(Bytes::from(frame.payload)).expect("bad payload");
    let orders = match payload.code {
        EventCode::InitialOrders => {
            InitialOrders::deserialize(payload.data)
                .expect("bad initial_orders body")
                .orders
        }
        EventCode::NewOrderReceived => {
            NewOrderReceived::deserialize(payload.data)
                .expect("bad new_order_received body")
                .orders
        }
        other => panic!("unexpected event code {:?}", other),
    };
    (payload.code, orders)
}

/// Returns the next frame queued for a test connection.
pub fn next_push(rx: &mut UnboundedReceiver<Bytes>) -> (EventCode, Vec<Order>) {
    let raw = rx.try_recv().expect("expected a pushed frame");
    decode_push(raw)
}

/// Drains everything queued for a connection and returns the last snapshot.
pub fn last_push(rx: &mut UnboundedReceiver<Bytes>) -> (EventCode, Vec<Order>) {
    let mut latest = None;
    while let Ok(raw) = rx.try_recv() {
        latest = Some(decode_push(raw));
    }
    latest.expect("expected at least one pushed frame")
}
