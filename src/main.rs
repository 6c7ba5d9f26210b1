//! ffs-chat binary: chat with a USB host over a FunctionFS gadget mount.
//!
//! Usage: `ffs-chat <functionfs-mount>`, e.g. `ffs-chat /dev/ffs-chat`.
//!
//! Chat traffic goes to stdout; diagnostics go to stderr via `tracing`
//! (filterable with `RUST_LOG`).

use std::env;
use std::path::Path;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use ffs_chat::{ChatSession, EndpointSet, StdConsole};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("usage: ffs-chat <functionfs-mount>");
        return ExitCode::FAILURE;
    }
    let mount = Path::new(&args[1]);

    let mut endpoints = match EndpointSet::open(mount) {
        Ok(endpoints) => endpoints,
        Err(e) => {
            tracing::error!(error = %e, "unable to prepare gadget");
            return ExitCode::FAILURE;
        }
    };

    let mut session = ChatSession::new(StdConsole::new());
    let (ep0, bulk_in, bulk_out) = endpoints.split();
    // The session loop only returns on a fatal error.
    if let Err(e) = session.run(ep0, bulk_in, bulk_out) {
        tracing::error!(error = %e, "chat session ended");
    }

    endpoints.close();
    ExitCode::FAILURE
}
