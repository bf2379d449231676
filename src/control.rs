//! Viewer commands and remote control via Unix socket
//!
//! Keyboard, mouse, socket and MQTT input all reduce to [`Command`].
//! The socket accepts one text command per line, for example:
//!
//! ```text
//! zoom 400 300
//! variant burning ship
//! save /tmp/ship.png
//! ```

use std::fs;
use std::io::{self, BufRead, BufReader};
use std::os::unix::fs::FileTypeExt;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::{debug, info, warn};

use crate::error::ControlError;
use crate::fractal::FractalVariant;

/// Socket used when the config enables remote control without naming a path
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/fractal-explorer.sock";

/// Everything the viewer can be asked to do
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Back to the active variant's initial range
    Reset,
    /// Zoom in around the plane point under pixel (px, py)
    ZoomIn { px: u32, py: u32 },
    /// Zoom out around the plane point under pixel (px, py)
    ZoomOut { px: u32, py: u32 },
    Select(FractalVariant),
    NextVariant,
    /// Save the current frame; `None` uses the configured path
    Export(Option<PathBuf>),
    Quit,
}

impl Command {
    /// Parse one line of the text protocol (case-insensitive)
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_lowercase().as_str() {
            "reset" | "r" | "home" => Some(Self::Reset),
            "zoom" | "in" => parse_pixel(rest).map(|(px, py)| Self::ZoomIn { px, py }),
            "zoomout" | "out" => parse_pixel(rest).map(|(px, py)| Self::ZoomOut { px, py }),
            "variant" | "fractal" => rest.parse().ok().map(Self::Select),
            "next" | "tab" => Some(Self::NextVariant),
            "save" | "s" | "export" => Some(Self::Export(if rest.is_empty() {
                None
            } else {
                Some(PathBuf::from(rest))
            })),
            "q" | "quit" | "exit" => Some(Self::Quit),
            // Bare variant names select directly
            _ => line.parse().ok().map(Self::Select),
        }
    }
}

fn parse_pixel(args: &str) -> Option<(u32, u32)> {
    let mut parts = args.split_whitespace();
    let px = parts.next()?.parse().ok()?;
    let py = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((px, py))
}

/// Controller that listens for commands on a Unix socket
pub struct Controller {
    receiver: Receiver<Command>,
    path: PathBuf,
    stop: Arc<AtomicBool>,
    listener_thread: Option<thread::JoinHandle<()>>,
}

/// Remove a stale socket at `path`. Anything that is not a socket is left
/// alone and reported.
fn remove_stale_socket(path: &Path) -> Result<(), ControlError> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(source) => {
            return Err(ControlError::Bind {
                path: path.to_path_buf(),
                source,
            })
        },
    };
    if !metadata.file_type().is_socket() {
        return Err(ControlError::NotSocket(path.to_path_buf()));
    }
    fs::remove_file(path).map_err(|source| ControlError::Bind {
        path: path.to_path_buf(),
        source,
    })
}

fn is_socket(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_socket())
}

impl Controller {
    /// Create a new controller listening on the Unix socket at `path`
    pub fn new(path: impl AsRef<Path>) -> Result<Self, ControlError> {
        let path = path.as_ref().to_path_buf();

        // A previous run may have left its socket behind
        remove_stale_socket(&path)?;

        let listener = UnixListener::bind(&path).map_err(|source| ControlError::Bind {
            path: path.clone(),
            source,
        })?;

        // Set non-blocking so we can check for new connections
        listener
            .set_nonblocking(true)
            .map_err(ControlError::NonBlocking)?;

        let (sender, receiver) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));

        let listener_stop = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            Self::listener_loop(&listener, &sender, &listener_stop);
        });

        info!("Remote control listening on {}", path.display());

        Ok(Self {
            receiver,
            path,
            stop,
            listener_thread: Some(handle),
        })
    }

    fn listener_loop(listener: &UnixListener, sender: &Sender<Command>, stop: &AtomicBool) {
        while !stop.load(Ordering::Relaxed) {
            match listener.accept() {
                Ok((stream, _)) => {
                    let sender = sender.clone();
                    thread::spawn(move || {
                        Self::handle_client(stream, &sender);
                    });
                },
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    // No connection ready, sleep briefly
                    thread::sleep(Duration::from_millis(50));
                },
                Err(e) => {
                    warn!("Control socket closed: {}", e);
                    break;
                },
            }
        }
    }

    fn handle_client(stream: UnixStream, sender: &Sender<Command>) {
        // Accepted sockets inherit non-blocking mode on some platforms
        let _ = stream.set_nonblocking(false);
        let reader = BufReader::new(stream);
        for line in reader.lines().map_while(Result::ok) {
            match Command::parse(&line) {
                Some(cmd) => {
                    debug!("Socket command: {:?}", cmd);
                    if sender.send(cmd).is_err() {
                        break;
                    }
                },
                None if line.trim().is_empty() => {},
                None => warn!("Unknown socket command: {}", line.trim()),
            }
        }
    }

    /// Get any pending commands (non-blocking)
    pub fn poll(&self) -> Vec<Command> {
        self.receiver.try_iter().collect()
    }

    pub fn socket_path(&self) -> &Path {
        &self.path
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.listener_thread.take() {
            let _ = handle.join();
        }
        // Only our own socket; the path may have been replaced since bind
        if is_socket(&self.path) {
            let _ = fs::remove_file(&self.path);
        }
    }
}
