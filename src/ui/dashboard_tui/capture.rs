//! Redirect the process's stdout/stderr into the dashboard panes.

use std::io;

use super::pane::PaneWriter;

#[cfg(unix)]
mod imp {
    use std::fs::File;
    use std::io::{self, Write};
    use std::os::unix::io::{FromRawFd, RawFd};
    use std::thread::{self, JoinHandle};
    use std::time::{Duration, Instant};

    use super::PaneWriter;

    /// How long `restore` waits for the readers to drain their pipes.
    const DRAIN_GRACE: Duration = Duration::from_millis(250);

    struct Redirect {
        fd: RawFd,
        saved: RawFd,
    }

    /// Active redirection of fds 1 and 2. Restored on drop.
    pub struct StdioCapture {
        redirects: Vec<Redirect>,
        readers: Vec<JoinHandle<()>>,
    }

    impl StdioCapture {
        pub fn start(stdout: PaneWriter, stderr: PaneWriter) -> io::Result<Self> {
            let mut capture = Self {
                redirects: Vec::new(),
                readers: Vec::new(),
            };

            // An error part way through drops `capture`, undoing what was done
            for (fd, writer) in [(libc::STDOUT_FILENO, stdout), (libc::STDERR_FILENO, stderr)] {
                let reader = capture.redirect(fd)?;
                let handle = spawn_reader(reader, writer)?;
                capture.readers.push(handle);
            }

            Ok(capture)
        }

        fn redirect(&mut self, fd: RawFd) -> io::Result<File> {
            let _ = io::stdout().flush();
            let _ = io::stderr().flush();

            let mut fds: [RawFd; 2] = [0; 2];
            // SAFETY: `fds` is a valid two-element buffer for pipe(2)
            if unsafe { libc::pipe(fds.as_mut_ptr()) } != 0 {
                return Err(io::Error::last_os_error());
            }
            let (read_fd, write_fd) = (fds[0], fds[1]);

            // SAFETY: plain fd syscalls on descriptors owned here; every
            // failure path closes what was opened
            unsafe {
                let saved = libc::dup(fd);
                if saved < 0 {
                    let err = io::Error::last_os_error();
                    libc::close(read_fd);
                    libc::close(write_fd);
                    return Err(err);
                }

                if libc::dup2(write_fd, fd) < 0 {
                    let err = io::Error::last_os_error();
                    libc::close(read_fd);
                    libc::close(write_fd);
                    libc::close(saved);
                    return Err(err);
                }
                libc::close(write_fd);

                self.redirects.push(Redirect { fd, saved });
                Ok(File::from_raw_fd(read_fd))
            }
        }

        /// Point fds 1 and 2 back where they were, then give the readers a
        /// moment to forward what is still buffered in the pipes.
        ///
        /// A reader only sees end-of-file once every copy of the write end
        /// is gone; one inherited by a child process keeps it alive, and that
        /// reader is left detached.
        pub fn restore(&mut self) {
            let _ = io::stdout().flush();
            let _ = io::stderr().flush();

            for redirect in self.redirects.drain(..).rev() {
                // SAFETY: `saved` was produced by dup(2) and is owned here
                unsafe {
                    libc::dup2(redirect.saved, redirect.fd);
                    libc::close(redirect.saved);
                }
            }

            let deadline = Instant::now() + DRAIN_GRACE;
            for reader in self.readers.drain(..) {
                while !reader.is_finished() && Instant::now() < deadline {
                    thread::sleep(Duration::from_millis(5));
                }
                if reader.is_finished() {
                    let _ = reader.join();
                }
            }
        }
    }

    impl Drop for StdioCapture {
        fn drop(&mut self) {
            self.restore();
        }
    }

    fn spawn_reader(mut reader: File, mut writer: PaneWriter) -> io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("dashtui-capture".to_string())
            .spawn(move || {
                let _ = io::copy(&mut reader, &mut writer);
            })
    }
}

#[cfg(unix)]
pub use imp::StdioCapture;

/// Stdio capture needs unix fd redirection.
#[cfg(not(unix))]
pub struct StdioCapture;

#[cfg(not(unix))]
impl StdioCapture {
    pub fn start(_stdout: PaneWriter, _stderr: PaneWriter) -> io::Result<Self> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "stdio capture is only available on unix",
        ))
    }

    pub fn restore(&mut self) {}
}

/// Start capturing, reporting which resource failed.
pub fn capture_stdio(stdout: PaneWriter, stderr: PaneWriter) -> crate::error::Result<StdioCapture> {
    StdioCapture::start(stdout, stderr)
        .map_err(|e: io::Error| crate::error::DashError::io_context("Failed to capture stdio", e))
}
