//! Per-connection glue: leg I/O tasks around one session worker.
//!
//! Each leg's reader decodes frames and enqueues session events; writers
//! drain the session's sinks. The session worker is the only task that
//! touches session state, so translator work is fully serialized.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use conduit_mappings::MappingRegistry;
use conduit_proto::codec;
use conduit_proto::bedrock::ClientPacket;
use conduit_proto::java::{self, FrameConfig, JavaPacket, LoginSuccess, SetCompression};
use conduit_session::{
    run_session, BackendSink, ClientSink, CoreConfig, EmptyWorldLookup, Session, SessionEvent,
    SessionRegistry, TranslatorRegistry,
};

/// Border replication cadence.
const TICK_INTERVAL: Duration = Duration::from_millis(500);

/// Backend leg decode state.
enum BackendState {
    Login,
    Play,
}

/// Bridge one accepted client to a fresh backend connection.
pub async fn handle_connection(
    client_stream: TcpStream,
    mappings: Arc<MappingRegistry>,
    config: Arc<CoreConfig>,
    translators: Arc<TranslatorRegistry>,
    sessions: SessionRegistry,
) {
    let _guard = sessions.guard();

    let backend_addr = (config.backend_address.as_str(), config.backend_port);
    let backend_stream = match TcpStream::connect(backend_addr).await {
        Ok(stream) => stream,
        Err(error) => {
            warn!(%error, "backend unreachable; dropping client");
            return;
        }
    };

    let (client_read, client_write) = client_stream.into_split();
    let (backend_read, backend_write) = backend_stream.into_split();

    let (client_sink, client_out) = ClientSink::channel();
    let (backend_sink, backend_out) = BackendSink::channel();
    let (events_tx, events_rx) = mpsc::unbounded_channel();

    let session = Session::new(
        mappings,
        config,
        Arc::new(EmptyWorldLookup),
        client_sink,
        backend_sink,
    );

    // Compression is negotiated on the backend leg mid-login; reader and
    // writer share the framing state.
    let frame_config = Arc::new(Mutex::new(FrameConfig::default()));

    let mut io_tasks = Vec::new();
    io_tasks.push(tokio::spawn(client_reader(client_read, events_tx.clone())));
    io_tasks.push(tokio::spawn(client_writer(client_write, client_out)));
    io_tasks.push(tokio::spawn(backend_reader(
        backend_read,
        events_tx.clone(),
        frame_config.clone(),
    )));
    io_tasks.push(tokio::spawn(backend_writer(
        backend_write,
        backend_out,
        frame_config,
    )));
    io_tasks.push(tokio::spawn(ticker(events_tx)));

    // The worker owns the session until either leg dies or a fatal error
    // closes it; tearing down one leg tears down the other.
    let session = run_session(session, events_rx, translators).await;
    for task in io_tasks {
        task.abort();
    }
    info!(session = %session.username, "connection closed");
}

async fn ticker(events: mpsc::UnboundedSender<SessionEvent>) {
    let mut interval = tokio::time::interval(TICK_INTERVAL);
    loop {
        interval.tick().await;
        if events.send(SessionEvent::Tick).is_err() {
            return;
        }
    }
}

async fn client_reader(mut stream: OwnedReadHalf, events: mpsc::UnboundedSender<SessionEvent>) {
    let mut buf = BytesMut::with_capacity(4096);
    loop {
        loop {
            match codec::read_frame(&mut buf) {
                Ok(Some(payload)) => {
                    let mut payload = payload;
                    match ClientPacket::decode(&mut payload) {
                        Ok(Some(packet)) => {
                            if events.send(SessionEvent::Client(packet)).is_err() {
                                return;
                            }
                        }
                        Ok(None) => debug!("untranslated client packet dropped"),
                        Err(error) => debug!(%error, "bad client packet dropped"),
                    }
                }
                Ok(None) => break,
                Err(error) => {
                    warn!(%error, "client framing error");
                    let _ = events.send(SessionEvent::Shutdown);
                    return;
                }
            }
        }
        match stream.read_buf(&mut buf).await {
            Ok(0) | Err(_) => {
                let _ = events.send(SessionEvent::Shutdown);
                return;
            }
            Ok(_) => {}
        }
    }
}

async fn client_writer(
    mut stream: OwnedWriteHalf,
    mut packets: mpsc::UnboundedReceiver<conduit_proto::bedrock::BedrockPacket>,
) {
    while let Some(packet) = packets.recv().await {
        let body = packet.encode();
        let mut out = BytesMut::with_capacity(body.len() + 5);
        codec::write_frame(&mut out, &body);
        if stream.write_all(&out).await.is_err() {
            return;
        }
    }
}

async fn backend_reader(
    mut stream: OwnedReadHalf,
    events: mpsc::UnboundedSender<SessionEvent>,
    frame_config: Arc<Mutex<FrameConfig>>,
) {
    let mut buf = BytesMut::with_capacity(8192);
    let mut state = BackendState::Login;
    loop {
        loop {
            let config = *frame_config.lock().expect("frame config lock");
            match java::read_frame(&mut buf, &config) {
                Ok(Some(payload)) => {
                    let mut payload = payload;
                    let packet_id = match java::codec::read_varint(&mut payload) {
                        Ok(id) => id,
                        Err(error) => {
                            debug!(%error, "unreadable backend packet dropped");
                            continue;
                        }
                    };
                    match state {
                        BackendState::Login => match packet_id {
                            SetCompression::ID => match SetCompression::decode(&mut payload) {
                                Ok(pkt) if pkt.threshold >= 0 => {
                                    frame_config
                                        .lock()
                                        .expect("frame config lock")
                                        .compression_threshold = Some(pkt.threshold as usize);
                                    debug!(threshold = pkt.threshold, "backend compression on");
                                }
                                Ok(_) => {}
                                Err(error) => debug!(%error, "bad compression packet"),
                            },
                            LoginSuccess::ID => match LoginSuccess::decode(&mut payload) {
                                Ok(pkt) => {
                                    debug!(username = %pkt.username, "backend login complete");
                                    state = BackendState::Play;
                                }
                                Err(error) => debug!(%error, "bad login success packet"),
                            },
                            other => {
                                // Encryption requests mean the backend wants
                                // online-mode auth, which the proxy does not
                                // provide.
                                warn!(packet_id = other, "unexpected login packet; closing");
                                let _ = events.send(SessionEvent::Shutdown);
                                return;
                            }
                        },
                        BackendState::Play => {
                            match JavaPacket::decode(packet_id, &mut payload) {
                                Ok(Some(packet)) => {
                                    if events.send(SessionEvent::Backend(packet)).is_err() {
                                        return;
                                    }
                                }
                                Ok(None) => {}
                                Err(error) => {
                                    debug!(packet_id, %error, "bad backend packet dropped")
                                }
                            }
                        }
                    }
                }
                Ok(None) => break,
                Err(error) => {
                    warn!(%error, "backend framing error");
                    let _ = events.send(SessionEvent::Shutdown);
                    return;
                }
            }
        }
        match stream.read_buf(&mut buf).await {
            Ok(0) | Err(_) => {
                let _ = events.send(SessionEvent::Shutdown);
                return;
            }
            Ok(_) => {}
        }
    }
}

async fn backend_writer(
    mut stream: OwnedWriteHalf,
    mut payloads: mpsc::UnboundedReceiver<bytes::Bytes>,
    frame_config: Arc<Mutex<FrameConfig>>,
) {
    while let Some(payload) = payloads.recv().await {
        let config = *frame_config.lock().expect("frame config lock");
        let mut out = BytesMut::with_capacity(payload.len() + 8);
        if let Err(error) = java::write_frame(&mut out, &payload, &config) {
            warn!(%error, "backend frame encode failed");
            continue;
        }
        if stream.write_all(&out).await.is_err() {
            return;
        }
    }
}
