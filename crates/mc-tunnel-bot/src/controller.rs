//! The owner a tunnel reports to when it dies.

use std::fs;
use std::io;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};

use tracing::{info, warn};

/// First and last host octet handed out from 127.0.0.x.
const FIRST_LOCAL_OCTET: u8 = 2;
const LAST_LOCAL_OCTET: u8 = 254;

/// Receives lifecycle notifications from tunnels.
pub trait Controller: Send + Sync {
    /// The named tunnel has died and should be forgotten.
    fn remove(&self, name: &str);

    /// Take ownership of a per-player file for deferred cleanup.
    fn trash(&self, file: &Path);

    /// Source address for the next outbound connection, if the controller
    /// spreads tunnels across local addresses.
    fn next_local_address(&self) -> Option<IpAddr> {
        None
    }
}

/// Controller used by the standalone binary.
///
/// Trashed files are moved into `trash_dir`. With the address pool enabled,
/// connections cycle through 127.0.0.2 to 127.0.0.254.
pub struct StandaloneController {
    trash_dir: PathBuf,
    address_pool: bool,
    next_octet: AtomicU8,
}

impl StandaloneController {
    pub fn new(trash_dir: impl Into<PathBuf>, address_pool: bool) -> Self {
        Self {
            trash_dir: trash_dir.into(),
            address_pool,
            next_octet: AtomicU8::new(FIRST_LOCAL_OCTET),
        }
    }

    fn move_to_trash(&self, file: &Path) -> io::Result<()> {
        let Some(file_name) = file.file_name() else {
            return Ok(());
        };
        fs::create_dir_all(&self.trash_dir)?;
        fs::rename(file, self.trash_dir.join(file_name))
    }
}

impl Controller for StandaloneController {
    fn remove(&self, name: &str) {
        info!("Bot {name} removed");
    }

    fn trash(&self, file: &Path) {
        match self.move_to_trash(file) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to trash {}: {e}", file.display()),
        }
    }

    fn next_local_address(&self) -> Option<IpAddr> {
        if !self.address_pool {
            return None;
        }
        let octet = self
            .next_octet
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |o| {
                Some(if o >= LAST_LOCAL_OCTET {
                    FIRST_LOCAL_OCTET
                } else {
                    o + 1
                })
            })
            .unwrap_or(FIRST_LOCAL_OCTET);
        Some(IpAddr::V4(Ipv4Addr::new(127, 0, 0, octet)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_pool_no_address() {
        let controller = StandaloneController::new("trash", false);
        assert_eq!(controller.next_local_address(), None);
    }

    #[test]
    fn pool_wraps_around() {
        let controller = StandaloneController::new("trash", true);
        let first = controller.next_local_address();
        assert_eq!(first, Some(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 2))));
        for _ in 0..252 {
            controller.next_local_address();
        }
        // 253 addresses handed out: 2..=254
        assert_eq!(
            controller.next_local_address(),
            Some(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 2)))
        );
    }

    #[test]
    fn trash_moves_file() {
        let dir = tempfile::tempdir().unwrap();
        let dat = dir.path().join("Bot.dat");
        fs::write(&dat, b"player").unwrap();

        let controller = StandaloneController::new(dir.path().join("trash"), false);
        controller.trash(&dat);

        assert!(!dat.exists());
        assert_eq!(
            fs::read(dir.path().join("trash").join("Bot.dat")).unwrap(),
            b"player"
        );
    }

    #[test]
    fn trash_missing_file_is_quiet() {
        let dir = tempfile::tempdir().unwrap();
        let controller = StandaloneController::new(dir.path().join("trash"), false);
        controller.trash(&dir.path().join("nobody.dat"));
    }
}
