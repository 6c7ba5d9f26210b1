//! Endpoint manager for the FunctionFS mount.
//!
//! Opens the control and bulk endpoint files and performs the one-time
//! configuration handshake on ep0. The handles live for the whole process;
//! the session and framer only ever borrow them.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};

use super::config;

/// The three endpoint handles of the gadget function.
#[derive(Debug)]
pub struct EndpointSet {
    control: File,
    bulk_in: File,
    bulk_out: File,
}

impl EndpointSet {
    /// Open all endpoints under `mount` and write the configuration.
    ///
    /// ep0 is opened first and receives the descriptor blob, then the
    /// string blob, each as one whole-buffer write. The gadget cannot
    /// function without both, so any failure here is fatal. The bulk
    /// endpoint files only appear once the kernel has accepted the
    /// configuration, which is why they are opened last.
    pub fn open(mount: &Path) -> Result<Self> {
        let mut control = open_endpoint(mount, "ep0")?;

        control
            .write_all(&config::descriptors())
            .map_err(|e| Error::ConfigRejected {
                what: "descriptors",
                source: e,
            })?;
        control
            .write_all(&config::strings())
            .map_err(|e| Error::ConfigRejected {
                what: "strings",
                source: e,
            })?;

        let bulk_in = open_endpoint(mount, "ep1")?;
        let bulk_out = open_endpoint(mount, "ep2")?;

        tracing::info!(mount = %mount.display(), "gadget endpoints ready");
        Ok(Self {
            control,
            bulk_in,
            bulk_out,
        })
    }

    /// Borrow all three handles at once: `(control, bulk_in, bulk_out)`.
    pub fn split(&mut self) -> (&mut File, &mut File, &mut File) {
        (&mut self.control, &mut self.bulk_in, &mut self.bulk_out)
    }

    /// Release all handles unconditionally.
    ///
    /// Best-effort: problems while closing are logged, never propagated.
    /// Used on both normal and error shutdown paths.
    pub fn close(self) {
        for (name, handle) in [
            ("ep0", self.control),
            ("ep1", self.bulk_in),
            ("ep2", self.bulk_out),
        ] {
            if let Err(e) = handle.sync_all() {
                tracing::debug!(endpoint = name, error = %e, "flush on close failed");
            }
            drop(handle);
        }
        tracing::debug!("gadget endpoints closed");
    }
}

fn open_endpoint(mount: &Path, name: &str) -> Result<File> {
    let path = mount.join(name);
    OpenOptions::new()
        .read(true)
        .write(true)
        .open(&path)
        .map_err(|source| Error::OpenFailed { path, source })
}
