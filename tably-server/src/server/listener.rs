use crate::core::hub::ConnectionId;
use crate::server::params::Params;
use crate::types::SharedHub;
use anyhow::{Context, Result};
use bytes::{Bytes, BytesMut};
use tably_protocol::{CompleteOrder, EventCode, EventPayload, Frame, FrameType, PlaceOrder};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub async fn start(params: Params, hub: SharedHub) -> Result<()> {
    let addr = format!("{}:{}", params.bind, params.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener on {addr}"))?;
    info!(%addr, "order hub listening");
    serve(listener, hub).await
}

/// Accept loop, split from `start` so tests can bind an ephemeral port first.
pub async fn serve(listener: TcpListener, hub: SharedHub) -> Result<()> {
    loop {
        let (socket, peer) = listener.accept().await?;
        let hub = hub.clone();
        debug!(%peer, "new incoming connection");
        tokio::spawn(async move {
            if let Err(e) = handle_connection(socket, hub).await {
                warn!(%peer, "connection error: {e:?}");
            }
        });
    }
}

/// One task per connection: register with the hub (which pushes the initial
/// snapshot), hand the write half to a writer task, then read events until
/// EOF or a framing error. Either exit path unregisters the connection; the
/// registry itself is untouched by disconnects.
async fn handle_connection(stream: TcpStream, hub: SharedHub) -> Result<()> {
    let (mut reader, writer) = stream.into_split();

    let (tx, rx) = mpsc::unbounded_channel::<Bytes>();
    let connection_id = hub.lock().await.register(tx);
    tokio::spawn(run_writer(connection_id, writer, rx, hub.clone()));

    let result = read_loop(&mut reader, &hub).await;

    hub.lock().await.unregister(connection_id);
    result
}

async fn read_loop(reader: &mut OwnedReadHalf, hub: &SharedHub) -> Result<()> {
    let mut buf = BytesMut::with_capacity(4096);

    loop {
        buf.reserve(1024);
        let n = reader.read_buf(&mut buf).await?;
        if n == 0 {
            return Ok(()); // EOF
        }

        while let Some(frame) = Frame::decode(&mut buf)? {
            if frame.frame_type != FrameType::Event {
                // Heartbeats and anything newer than us: nothing to do
                continue;
            }
            dispatch_event(frame, hub).await;
        }
    }
}

/// A payload that does not decode is logged and skipped rather than tearing
/// down the session: constructing valid orders is the client's job, and one
/// bad message must not take the shared process with it.
async fn dispatch_event(frame: Frame, hub: &SharedHub) {
    let payload = match EventPayload::deserialize(Bytes::from(frame.payload)) {
        Ok(payload) => payload,
        Err(e) => {
            warn!("skipping undecodable event: {e}");
            return;
        }
    };

    match payload.code {
        EventCode::PlaceOrder => match PlaceOrder::deserialize(payload.data) {
            Ok(req) => hub.lock().await.place_order(req.order),
            Err(e) => warn!("skipping malformed place_order body: {e}"),
        },
        EventCode::CompleteOrder => match CompleteOrder::deserialize(payload.data) {
            Ok(req) => hub.lock().await.complete_order(&req.order_id),
            Err(e) => warn!("skipping malformed complete_order body: {e}"),
        },
        code => {
            debug!(?code, "ignoring server-to-client event on the inbound path");
        }
    }
}

/// Drains the connection's outbound channel into the socket. A failed write
/// means the peer is gone: stop and unregister, so the hub prunes this
/// connection instead of queueing snapshots for nobody.
async fn run_writer(
    connection_id: ConnectionId,
    mut writer: OwnedWriteHalf,
    mut rx: mpsc::UnboundedReceiver<Bytes>,
    hub: SharedHub,
) {
    while let Some(frame) = rx.recv().await {
        if let Err(e) = writer.write_all(&frame).await {
            warn!(connection = connection_id, "send failed, treating connection as disconnected: {e}");
            break;
        }
        if let Err(e) = writer.flush().await {
            warn!(connection = connection_id, "flush failed, treating connection as disconnected: {e}");
            break;
        }
    }
    hub.lock().await.unregister(connection_id);
}
