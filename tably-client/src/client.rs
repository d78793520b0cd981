use anyhow::{bail, Context, Result};
use bytes::{Bytes, BytesMut};
use std::sync::atomic::{AtomicU64, Ordering};
use tably_protocol::{
    CompleteOrder, EventCode, EventPayload, Frame, FrameType, InitialOrders, NewOrderReceived,
    Order, OrderItem, PlaceOrder,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Disambiguates ids for orders created within the same millisecond.
static ORDER_SEQ: AtomicU64 = AtomicU64::new(0);

pub struct TablyClient {
    stream: TcpStream,
    buf: BytesMut,
}

impl TablyClient {
    /// Connects and consumes the `initial_orders` snapshot the hub sends to
    /// every new connection before anything else.
    pub async fn connect(addr: &str) -> Result<(Self, Vec<Order>)> {
        let stream = TcpStream::connect(addr)
            .await
            .context("Failed to connect to Tably server")?;

        let mut client = TablyClient {
            stream,
            buf: BytesMut::with_capacity(4096),
        };

        let payload = client.read_event().await?;
        if payload.code != EventCode::InitialOrders {
            bail!("expected initial_orders on connect, got {:?}", payload.code);
        }
        let initial = InitialOrders::deserialize(payload.data)?;

        Ok((client, initial.orders))
    }

    /// Builds a fully-formed order from the cart and submits it. There is no
    /// acknowledgement message; the next snapshot reflects the order.
    pub async fn place_order(&mut self, items: Vec<OrderItem>, table: &str) -> Result<Order> {
        let now = chrono::Utc::now().timestamp_millis();
        let seq = ORDER_SEQ.fetch_add(1, Ordering::Relaxed);
        let order = Order::new(format!("{now}-{seq}"), items, table, now);

        let body = PlaceOrder {
            order: order.clone(),
        }
        .serialize()?;
        self.send_event(EventCode::PlaceOrder, body).await?;

        Ok(order)
    }

    /// Marks an order done. Completing an id that is already gone is
    /// harmless; the server treats it as a no-op and still broadcasts.
    pub async fn complete_order(&mut self, order_id: &str) -> Result<()> {
        let body = CompleteOrder {
            order_id: order_id.to_string(),
        }
        .serialize()?;
        self.send_event(EventCode::CompleteOrder, body).await
    }

    /// Waits for the next full order-list push from the server.
    pub async fn next_snapshot(&mut self) -> Result<Vec<Order>> {
        let payload = self.read_event().await?;
        match payload.code {
            EventCode::NewOrderReceived => Ok(NewOrderReceived::deserialize(payload.data)?.orders),
            EventCode::InitialOrders => Ok(InitialOrders::deserialize(payload.data)?.orders),
            code => bail!("unexpected server event: {:?}", code),
        }
    }

    async fn send_event(&mut self, code: EventCode, data: Bytes) -> Result<()> {
        let payload = EventPayload { code, data };
        let frame = Frame::event(payload.serialize().to_vec());

        let mut out = BytesMut::new();
        frame.encode(&mut out);
        self.stream.write_all(&out).await?;
        self.stream.flush().await?;
        Ok(())
    }

    async fn read_event(&mut self) -> Result<EventPayload> {
        loop {
            if let Some(frame) = Frame::decode(&mut self.buf)? {
                if frame.frame_type != FrameType::Event {
                    continue; // skip heartbeats
                }
                return Ok(EventPayload::deserialize(Bytes::from(frame.payload))?);
            }

            self.buf.reserve(1024);
            let n = self.stream.read_buf(&mut self.buf).await?;
            if n == 0 {
                bail!("server closed the connection");
            }
        }
    }
}
