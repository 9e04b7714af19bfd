//! Output capture
//!
//! The group chat prints every turn to an [`OutputChannel`]. An
//! [`OutputCapture`] temporarily redirects that channel into an in-memory
//! buffer so the dialogue can be segmented once the conversation ends.
//!
//! A channel carries at most one active capture. Starting a second one, or
//! starting the same one twice, fails with [`WayfarerError::CaptureActive`].

use std::future::Future;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::core::{Result, WayfarerError};

type SharedBuffer = Arc<Mutex<Vec<u8>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct ChannelState {
    /// Where text goes when nothing is capturing
    target: Box<dyn Write + Send>,
    /// Buffer installed by the active capture, if any
    redirect: Option<SharedBuffer>,
}

/// Text output channel shared between the conversation engine and its caller
#[derive(Clone)]
pub struct OutputChannel {
    state: Arc<Mutex<ChannelState>>,
}

impl OutputChannel {
    /// Channel writing to the process's standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Channel writing to an arbitrary target
    pub fn new(target: impl Write + Send + 'static) -> Self {
        Self {
            state: Arc::new(Mutex::new(ChannelState {
                target: Box::new(target),
                redirect: None,
            })),
        }
    }

    /// Channel that discards everything not captured
    pub fn sink() -> Self {
        Self::new(io::sink())
    }

    /// Whether a capture currently owns this channel
    pub fn is_redirected(&self) -> bool {
        lock(&self.state).redirect.is_some()
    }

    /// Write text verbatim to the current destination
    pub fn write_str(&self, text: &str) -> io::Result<()> {
        let mut guard = lock(&self.state);
        let state = &mut *guard;
        match state.redirect {
            Some(ref buffer) => {
                lock(buffer).extend_from_slice(text.as_bytes());
                Ok(())
            }
            None => {
                state.target.write_all(text.as_bytes())?;
                state.target.flush()
            }
        }
    }

    fn redirect(&self, buffer: &SharedBuffer) -> Result<()> {
        let mut state = lock(&self.state);
        if state.redirect.is_some() {
            return Err(WayfarerError::CaptureActive);
        }
        state.redirect = Some(Arc::clone(buffer));
        Ok(())
    }

    /// Remove the redirect, but only if `buffer` is the one installed
    fn restore(&self, buffer: &SharedBuffer) {
        let mut state = lock(&self.state);
        if state
            .redirect
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, buffer))
        {
            state.redirect = None;
        }
    }
}

impl Write for OutputChannel {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = lock(&self.state);
        let state = &mut *guard;
        match state.redirect {
            Some(ref buffer) => {
                lock(buffer).extend_from_slice(buf);
                Ok(buf.len())
            }
            None => state.target.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut guard = lock(&self.state);
        let state = &mut *guard;
        match state.redirect {
            Some(_) => Ok(()),
            None => state.target.flush(),
        }
    }
}

impl std::fmt::Debug for OutputChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputChannel")
            .field("redirected", &self.is_redirected())
            .finish()
    }
}

/// Scoped capture of an [`OutputChannel`]
///
/// Lifecycle is `idle -> capturing -> idle`. Dropping a capturing instance
/// restores the channel.
pub struct OutputCapture {
    channel: OutputChannel,
    buffer: SharedBuffer,
    active: bool,
}

impl OutputCapture {
    /// Create an idle capture for `channel`
    pub fn new(channel: &OutputChannel) -> Self {
        Self {
            channel: channel.clone(),
            buffer: Arc::new(Mutex::new(Vec::new())),
            active: false,
        }
    }

    /// Start redirecting the channel into the buffer
    pub fn start_capture(&mut self) -> Result<()> {
        if self.active {
            return Err(WayfarerError::CaptureActive);
        }
        self.channel.redirect(&self.buffer)?;
        self.active = true;
        debug!("output capture started");
        Ok(())
    }

    /// Restore the channel's original destination. No-op when idle.
    pub fn end_capture(&mut self) {
        if !self.active {
            return;
        }
        self.channel.restore(&self.buffer);
        self.active = false;
        debug!(bytes = lock(&self.buffer).len(), "output capture ended");
    }

    /// Whether this capture currently owns the channel
    pub fn is_capturing(&self) -> bool {
        self.active
    }

    /// Everything captured so far
    pub fn captured_text(&self) -> String {
        String::from_utf8_lossy(&lock(&self.buffer)).into_owned()
    }

    /// Empty the buffer without touching the redirect
    pub fn clear(&mut self) {
        lock(&self.buffer).clear();
    }

    /// Run `fut` with the channel captured.
    ///
    /// The channel is restored whether `fut` succeeds, fails, panics or is
    /// dropped before completion.
    pub async fn capture<F, T>(&mut self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.start_capture()?;
        let release = Release(self);
        let result = fut.await;
        drop(release);
        result
    }
}

impl Drop for OutputCapture {
    fn drop(&mut self) {
        self.end_capture();
    }
}

struct Release<'a>(&'a mut OutputCapture);

impl Drop for Release<'_> {
    fn drop(&mut self) {
        self.0.end_capture();
    }
}
