use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use fieldlink_framing::FramingError;
use fieldlink_node::{
    JsonSettingsStore, LinkPump, NodeError, NodeInterface, StatusDisplay, StubDiag,
};
use fieldlink_transport::LinkSocket;
use tracing::info;

use crate::cmd::ServeArgs;
use crate::exit::{framing_error, transport_error, CliError, CliResult, INTERNAL, SUCCESS};

/// Display shim that writes draw calls to the log instead of a panel.
struct LogDisplay;

impl StatusDisplay for LogDisplay {
    fn available(&self) -> bool {
        true
    }

    fn draw_boot(&mut self, msg: &str) {
        info!(%msg, "display boot");
    }

    fn draw_id(&mut self, id: &str) {
        info!(%id, "display id");
    }

    fn draw_two_lines(&mut self, line1: &str, line2: &str) {
        info!(%line1, %line2, "display");
    }
}

pub fn run(args: ServeArgs) -> CliResult<i32> {
    let socket =
        LinkSocket::bind(&args.path).map_err(|err| transport_error("bind failed", err))?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let tick = Duration::from_millis(args.tick_ms.max(1));

    while running.load(Ordering::SeqCst) {
        let stream = match socket.accept() {
            Ok(stream) => stream,
            Err(err) => return Err(transport_error("accept failed", err)),
        };
        stream
            .set_nonblocking(true)
            .map_err(|err| transport_error("set nonblocking failed", err))?;
        let read_half = stream
            .try_clone()
            .map_err(|err| transport_error("clone stream failed", err))?;

        let mut node = NodeInterface::new(
            Box::new(JsonSettingsStore::new(&args.settings)),
            Box::new(LogDisplay),
            Box::new(StubDiag),
        );
        node.begin();

        let mut pump = LinkPump::new(read_half, stream, node);
        pump.send_hello()
            .map_err(|err| node_error("hello failed", err))?;
        info!(id = %pump.node().id(), "serving peer");

        while running.load(Ordering::SeqCst) {
            match pump.update() {
                Ok(()) => std::thread::sleep(tick),
                Err(NodeError::Framing(FramingError::ConnectionClosed)) => {
                    info!("peer disconnected");
                    break;
                }
                Err(err) => return Err(node_error("link error", err)),
            }
        }
    }

    Ok(SUCCESS)
}

fn node_error(context: &str, err: NodeError) -> CliError {
    match err {
        NodeError::Framing(err) => framing_error(context, err),
        NodeError::Proto(err) => CliError::new(INTERNAL, format!("{context}: {err}")),
    }
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
