//! `DicepitServer` builder and server loop.
//!
//! This is the entry point for running a Dicepit server. It ties together
//! all the layers: transport → protocol → session → match.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use dicepit_match::MatchConfig;
use dicepit_protocol::{Codec, JsonCodec, TextCodec};
use dicepit_rules::RandomDice;
use dicepit_session::{SessionRegistry, run_lobby};
use dicepit_transport::{Connection, TcpLineTransport, Transport, TransportError};
#[cfg(feature = "websocket")]
use dicepit_transport::WebSocketLineTransport;
use tokio::sync::Mutex;

use crate::DicepitError;
use crate::config::{CodecKind, ServerConfig, TransportKind};
use crate::handler::handle_connection;

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState {
    pub(crate) registry: Arc<Mutex<SessionRegistry>>,
    pub(crate) codec: Box<dyn Codec>,
}

/// Builder for configuring and starting a Dicepit server.
///
/// # Example
///
/// ```rust,no_run
/// use dicepit::prelude::*;
///
/// # async fn run() -> Result<(), DicepitError> {
/// let server = DicepitServer::builder()
///     .bind("0.0.0.0:12345")
///     .seed(42)
///     .build_tcp()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct DicepitServerBuilder {
    bind_addr: String,
    codec: CodecKind,
    match_config: MatchConfig,
    seed: Option<u64>,
}

impl DicepitServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::from_config(&ServerConfig::default())
    }

    /// Takes every setting from a loaded config.
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            bind_addr: config.bind.clone(),
            codec: config.codec,
            match_config: config.match_config.clone(),
            seed: config.seed,
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    pub fn codec(mut self, codec: CodecKind) -> Self {
        self.codec = codec;
        self
    }

    /// Sets the seat count and per-match rules.
    pub fn match_config(mut self, config: MatchConfig) -> Self {
        self.match_config = config;
        self
    }

    /// Makes dice reproducible across runs.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Binds a newline-delimited TCP listener.
    pub async fn build_tcp(self) -> Result<DicepitServer<TcpLineTransport>, DicepitError> {
        let transport = TcpLineTransport::bind(&self.bind_addr).await?;
        Ok(self.with_transport(transport))
    }

    /// Binds a WebSocket listener.
    #[cfg(feature = "websocket")]
    pub async fn build_websocket(
        self,
    ) -> Result<DicepitServer<WebSocketLineTransport>, DicepitError> {
        let transport = WebSocketLineTransport::bind(&self.bind_addr).await?;
        Ok(self.with_transport(transport))
    }

    /// Uses an already-bound transport.
    pub fn with_transport<T: Transport>(self, transport: T) -> DicepitServer<T> {
        let codec: Box<dyn Codec> = match self.codec {
            CodecKind::Text => Box::new(TextCodec),
            CodecKind::Json => Box::new(JsonCodec),
        };
        let state = Arc::new(ServerState {
            registry: Arc::new(Mutex::new(SessionRegistry::new(self.match_config.players))),
            codec,
        });
        DicepitServer {
            transport,
            state,
            match_config: self.match_config,
            seed: self.seed,
        }
    }
}

impl Default for DicepitServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A Dicepit server bound to a transport.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct DicepitServer<T: Transport> {
    transport: T,
    state: Arc<ServerState>,
    match_config: MatchConfig,
    seed: Option<u64>,
}

impl DicepitServer<TcpLineTransport> {
    /// Creates a new builder.
    pub fn builder() -> DicepitServerBuilder {
        DicepitServerBuilder::new()
    }
}

impl<T> DicepitServer<T>
where
    T: Transport<Error = TransportError>,
    T::Connection: Connection<Error = TransportError>,
{
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, DicepitError> {
        Ok(self.transport.local_addr()?)
    }

    /// Runs the server until the process is terminated.
    pub async fn run(self) -> Result<(), DicepitError> {
        self.run_until(std::future::pending()).await
    }

    /// Runs the server until `shutdown` completes.
    ///
    /// Starts the lobby task, then accepts connections and spawns a
    /// handler task for each. Accept errors are logged and the loop
    /// continues.
    pub async fn run_until(
        mut self,
        shutdown: impl Future<Output = ()> + Send,
    ) -> Result<(), DicepitError> {
        let addr = self.transport.local_addr()?;
        tracing::info!(
            %addr,
            players = self.match_config.players,
            seeded = self.seed.is_some(),
            "Dicepit server running"
        );

        let lobby = tokio::spawn(run_lobby(
            Arc::clone(&self.state.registry),
            self.match_config.clone(),
            dice_factory(self.seed),
        ));

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                () = &mut shutdown => break,
                accepted = self.transport.accept() => match accepted {
                    Ok(conn) => {
                        let state = Arc::clone(&self.state);
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(conn, state).await {
                                tracing::debug!(error = %e, "connection ended with error");
                            }
                        });
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "accept failed");
                    }
                },
            }
        }

        tracing::info!("Dicepit server shutting down");
        lobby.abort();
        let live_match = self.state.registry.lock().await.match_handle().cloned();
        if let Some(handle) = live_match {
            let _ = handle.shutdown().await;
        }
        self.transport.shutdown().await?;
        Ok(())
    }
}

/// Builds one dice source per match. With a seed, match `n` rolls from
/// `seed + n`, so a whole session replays identically.
fn dice_factory(seed: Option<u64>) -> impl FnMut() -> RandomDice + Send + 'static {
    let mut matches: u64 = 0;
    move || {
        let dice = match seed {
            Some(seed) => RandomDice::seeded(seed.wrapping_add(matches)),
            None => RandomDice::new(),
        };
        matches += 1;
        dice
    }
}

/// Binds the transport named in `config` and runs until Ctrl-C.
pub async fn serve(config: ServerConfig) -> Result<(), DicepitError> {
    let builder = DicepitServerBuilder::from_config(&config);
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    match config.transport {
        TransportKind::Tcp => builder.build_tcp().await?.run_until(ctrl_c).await,
        #[cfg(feature = "websocket")]
        TransportKind::WebSocket => builder.build_websocket().await?.run_until(ctrl_c).await,
        #[cfg(not(feature = "websocket"))]
        TransportKind::WebSocket => {
            tracing::error!("built without the websocket feature, falling back to TCP");
            builder.build_tcp().await?.run_until(ctrl_c).await
        }
    }
}
