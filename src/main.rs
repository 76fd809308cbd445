use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};

mod config;
mod content;
mod error;
mod handler;
mod logger;
mod response;

use error::ServeError;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            logger::log_fatal(&err);
            ExitCode::FAILURE
        }
    }
}

/// Load configuration and content, then hand off to the serving loop.
///
/// Content loading happens strictly before the runtime and listener exist, so
/// the process can never accept a connection without both documents in
/// memory, and a load failure exits before any port is touched.
fn run() -> Result<(), ServeError> {
    let cfg = config::Config::load()?;
    let content = content::SiteContent::load(&cfg.content)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        println!("[CONFIG] Using {workers} worker threads");
    } else {
        println!("[CONFIG] Using default worker threads (CPU cores)");
    }

    let runtime = runtime_builder.build().map_err(ServeError::Runtime)?;
    runtime.block_on(serve(cfg, content))
}

/// Bind the listener and accept connections until the process is killed.
async fn serve(cfg: config::Config, content: content::SiteContent) -> Result<(), ServeError> {
    let addr = cfg.socket_addr()?;
    let listener = create_listener(addr).map_err(|source| ServeError::Bind { addr, source })?;

    // Announce the address the kernel actually gave us, so an ephemeral-port
    // bind (PORT=0) logs the real port.
    let bound_addr = listener.local_addr().unwrap_or(addr);

    let state = Arc::new(config::AppState::new(cfg, content));
    logger::log_server_start(&bound_addr, &state.config);

    loop {
        match listener.accept().await {
            Ok((stream, peer_addr)) => {
                if state.config.logging.access_log {
                    logger::log_connection_accepted(&peer_addr);
                }
                handle_connection(stream, peer_addr, Arc::clone(&state));
            }
            Err(err) => {
                logger::log_error(&format!("Failed to accept connection: {err}"));
            }
        }
    }
}

/// Serve one accepted connection on its own task.
fn handle_connection(stream: TcpStream, peer_addr: SocketAddr, state: Arc<config::AppState>) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let conn = http1::Builder::new().serve_connection(
            io,
            service_fn(move |req| {
                let state = Arc::clone(&state);
                async move { handler::handle_request(req, peer_addr, state).await }
            }),
        );

        if let Err(err) = conn.await {
            logger::log_connection_error(&err);
        }
    });
}

/// Create the listening socket with `SO_REUSEADDR` enabled.
fn create_listener(addr: SocketAddr) -> std::io::Result<TcpListener> {
    // Create socket with appropriate domain (IPv4 or IPv6)
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    // SO_REUSEADDR: allows binding to a port in TIME_WAIT state
    socket.set_reuse_address(true)?;

    // Set non-blocking mode for async compatibility
    socket.set_nonblocking(true)?;

    socket.bind(&addr.into())?;

    // Start listening with a backlog queue size of 128
    socket.listen(128)?;

    // Convert socket2::Socket to std::net::TcpListener, then to tokio::net::TcpListener
    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}
