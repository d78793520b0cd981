use bytes::{Bytes, BytesMut};
use std::sync::Arc;
use tably_client::TablyClient;
use tably_protocol::{
    EventCode, EventPayload, Frame, NewOrderReceived, Order, OrderItem, PlaceOrder,
};
use tably_server::core::hub::OrderHub;
use tably_server::server::serve;
use tably_server::types::SharedHub;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

async fn spawn_server() -> anyhow::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?.to_string();
    let hub: SharedHub = Arc::new(Mutex::new(OrderHub::new()));
    tokio::spawn(async move {
        let _ = serve(listener, hub).await;
    });
    Ok(addr)
}

fn wings() -> Vec<OrderItem> {
    vec![OrderItem {
        id: "i1".into(),
        name: "Wings".into(),
        price: 9.5,
        quantity: 2,
    }]
}

async fn write_event_frame(stream: &mut TcpStream, payload: Vec<u8>) {
    let mut out = BytesMut::new();
    Frame::event(payload).encode(&mut out);
    stream.write_all(&out).await.unwrap();
    stream.flush().await.unwrap();
}

async fn read_event(stream: &mut TcpStream, buf: &mut BytesMut) -> EventPayload {
    loop {
        if let Some(frame) = Frame::decode(buf).unwrap() {
            return EventPayload::deserialize(Bytes::from(frame.payload)).unwrap();
        }
        buf.reserve(1024);
        let n = stream.read_buf(buf).await.unwrap();
        assert!(n > 0, "server closed the connection");
    }
}

#[tokio::test]
async fn place_and_complete_flow_over_tcp() {
    let addr = spawn_server().await.unwrap();

    // Scenario: the hub starts empty.
    let (mut customer, initial) = TablyClient::connect(&addr).await.unwrap();
    assert!(initial.is_empty());

    let placed = customer.place_order(wings(), "Table 4").await.unwrap();
    let snapshot = customer.next_snapshot().await.unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].id, placed.id);
    assert_eq!(snapshot[0].total_price, 19.0);
    assert_eq!(snapshot[0].table, "Table 4");

    // A waiter connecting afterwards sees the active order immediately.
    let (mut waiter, seen) = TablyClient::connect(&addr).await.unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].id, placed.id);

    // Completion empties the list for everyone.
    waiter.complete_order(&placed.id).await.unwrap();
    assert!(waiter.next_snapshot().await.unwrap().is_empty());
    assert!(customer.next_snapshot().await.unwrap().is_empty());
}

#[tokio::test]
async fn double_complete_is_harmless_over_tcp() {
    let addr = spawn_server().await.unwrap();

    let (mut customer, _) = TablyClient::connect(&addr).await.unwrap();
    let placed = customer.place_order(wings(), "Table 4").await.unwrap();
    assert_eq!(customer.next_snapshot().await.unwrap().len(), 1);

    let (mut waiter, _) = TablyClient::connect(&addr).await.unwrap();

    // Double-click on "complete": both broadcasts arrive, both empty,
    // no error surfaces on either connection.
    waiter.complete_order(&placed.id).await.unwrap();
    waiter.complete_order(&placed.id).await.unwrap();

    assert!(waiter.next_snapshot().await.unwrap().is_empty());
    assert!(waiter.next_snapshot().await.unwrap().is_empty());
    assert!(customer.next_snapshot().await.unwrap().is_empty());
    assert!(customer.next_snapshot().await.unwrap().is_empty());
}

#[tokio::test]
async fn broadcasts_arrive_in_mutation_order() {
    let addr = spawn_server().await.unwrap();

    let (mut customer, _) = TablyClient::connect(&addr).await.unwrap();
    let (mut waiter, _) = TablyClient::connect(&addr).await.unwrap();

    let first = customer.place_order(wings(), "Table 4").await.unwrap();
    let second = customer.place_order(wings(), "Table 7").await.unwrap();

    // Every connection observes [o1] then [o1, o2], never reordered.
    for client in [&mut customer, &mut waiter] {
        let snap1 = client.next_snapshot().await.unwrap();
        assert_eq!(snap1.len(), 1);
        assert_eq!(snap1[0].id, first.id);

        let snap2 = client.next_snapshot().await.unwrap();
        let ids: Vec<&str> = snap2.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, [first.id.as_str(), second.id.as_str()]);
    }
}

#[tokio::test]
async fn malformed_body_is_skipped_and_session_survives() {
    let addr = spawn_server().await.unwrap();

    let mut stream = TcpStream::connect(&addr).await.unwrap();
    let mut buf = BytesMut::with_capacity(4096);

    let payload = read_event(&mut stream, &mut buf).await;
    assert_eq!(payload.code, EventCode::InitialOrders);

    // A place_order whose body is not JSON: the server logs and skips it
    // without tearing down the session.
    let mut garbage = vec![EventCode::PlaceOrder as u8];
    garbage.extend_from_slice(b"{not json at all");
    write_event_frame(&mut stream, garbage).await;

    // A valid order on the same connection still goes through.
    let order = Order::new("o1", wings(), "Table 4", 1_700_000_000_000);
    let body = PlaceOrder { order }.serialize().unwrap();
    let mut valid = vec![EventCode::PlaceOrder as u8];
    valid.extend_from_slice(&body);
    write_event_frame(&mut stream, valid).await;

    let payload = read_event(&mut stream, &mut buf).await;
    assert_eq!(payload.code, EventCode::NewOrderReceived);
    let orders = NewOrderReceived::deserialize(payload.data).unwrap().orders;
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, "o1");
}

#[tokio::test]
async fn disconnect_leaves_orders_active() {
    let addr = spawn_server().await.unwrap();

    let (mut customer, _) = TablyClient::connect(&addr).await.unwrap();
    let placed = customer.place_order(wings(), "Table 4").await.unwrap();
    assert_eq!(customer.next_snapshot().await.unwrap().len(), 1);

    // Customer walks away; their order stays on the board.
    drop(customer);

    let (_waiter, seen) = TablyClient::connect(&addr).await.unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].id, placed.id);
}
