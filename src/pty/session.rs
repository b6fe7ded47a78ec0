use std::ffi::CStr;
use std::fs::OpenOptions;
use std::io;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::process::{Child, Command};

use scopeguard::ScopeGuard;

use crate::config::TerminalConfig;
use crate::error::{PtyStep, StreamError};
use crate::resource::{HandleKind, ResourceHandle};

const PTS_NAME_MAX: usize = 256;

/// A pseudo-terminal whose slave side is open in this process and whose
/// master side belongs to a terminal emulator.
pub struct PtySession {
    device: PathBuf,
    handle: ResourceHandle,
}

impl PtySession {
    /// Allocate a PTY, attach the configured emulator to it and reopen the
    /// slave device for read/write.
    ///
    /// The master descriptor is inherited by the emulator (it is told the
    /// descriptor number) and closed here before the slave is reopened, so
    /// the parent never holds both ends.
    pub fn spawn(config: &TerminalConfig) -> Result<Self, StreamError> {
        let master = open_master()?;
        let device = slave_name(master.as_raw_fd())?;
        tracing::info!(device = %device.display(), "Opened PTY");

        let child = spawn_emulator(config, &device, master.as_raw_fd())?;
        tracing::info!(pid = child.id(), program = %config.emulator, "Created terminal emulator");

        let child = scopeguard::guard(child, |mut child| {
            let _ = child.kill();
            let _ = child.wait();
        });

        drop(master);

        let reopen_error = |source| StreamError::Pty {
            step: PtyStep::Reopen,
            source,
        };
        let slave = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NOCTTY)
            .open(&device)
            .map_err(reopen_error)?;
        let handle = ResourceHandle::new(HandleKind::Terminal, device.display().to_string(), slave)
            .map_err(reopen_error)?;

        Ok(Self {
            handle: handle.with_child(ScopeGuard::into_inner(child)),
            device,
        })
    }

    /// Slave device path; stable for the life of the session.
    pub fn device(&self) -> &Path {
        &self.device
    }

    pub fn handle(&self) -> &ResourceHandle {
        &self.handle
    }

    pub fn handle_mut(&mut self) -> &mut ResourceHandle {
        &mut self.handle
    }
}

fn os_error(step: PtyStep) -> StreamError {
    StreamError::Pty {
        step,
        source: io::Error::last_os_error(),
    }
}

fn open_master() -> Result<OwnedFd, StreamError> {
    // SAFETY: posix_openpt has no memory-safety preconditions.
    let fd = unsafe { libc::posix_openpt(libc::O_RDWR | libc::O_NOCTTY) };
    if fd < 0 {
        return Err(os_error(PtyStep::Allocate));
    }
    // SAFETY: fd was just returned by posix_openpt and is owned by nobody else.
    let master = unsafe { OwnedFd::from_raw_fd(fd) };

    // SAFETY: master is a live PTY master descriptor owned by this function.
    if unsafe { libc::grantpt(master.as_raw_fd()) } != 0 {
        return Err(os_error(PtyStep::Allocate));
    }
    // SAFETY: same descriptor, still open.
    if unsafe { libc::unlockpt(master.as_raw_fd()) } != 0 {
        return Err(os_error(PtyStep::Unlock));
    }
    Ok(master)
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn slave_name(master: RawFd) -> Result<PathBuf, StreamError> {
    let mut buf = [0 as libc::c_char; PTS_NAME_MAX];
    // SAFETY: buf is valid for PTS_NAME_MAX bytes.
    let rc = unsafe { libc::ptsname_r(master, buf.as_mut_ptr(), buf.len()) };
    if rc != 0 {
        return Err(StreamError::Pty {
            step: PtyStep::ResolveName,
            source: io::Error::from_raw_os_error(rc),
        });
    }
    // SAFETY: ptsname_r NUL-terminates on success.
    let name = unsafe { CStr::from_ptr(buf.as_ptr()) };
    Ok(PathBuf::from(name.to_string_lossy().into_owned()))
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn slave_name(master: RawFd) -> Result<PathBuf, StreamError> {
    // SAFETY: master is an open PTY master. ptsname returns a static buffer,
    // read below before any other PTY is opened.
    let ptr = unsafe { libc::ptsname(master) };
    if ptr.is_null() {
        return Err(os_error(PtyStep::ResolveName));
    }
    // SAFETY: non-null result is a NUL-terminated string.
    let name = unsafe { CStr::from_ptr(ptr) };
    let name = name.to_string_lossy().into_owned();
    debug_assert!(name.len() < PTS_NAME_MAX);
    Ok(PathBuf::from(name))
}

/// Build the emulator argument list: configured extras, then
/// `<slave_flag><device>/<master fd>`.
pub fn emulator_args(config: &TerminalConfig, device: &Path, master: RawFd) -> Vec<String> {
    let mut args = config.args.clone();
    args.push(format!("{}{}/{}", config.slave_flag, device.display(), master));
    args
}

fn spawn_emulator(config: &TerminalConfig, device: &Path, master: RawFd) -> Result<Child, StreamError> {
    Command::new(&config.emulator)
        .args(emulator_args(config, device, master))
        .spawn()
        .map_err(|source| StreamError::Spawn {
            program: PathBuf::from(&config.emulator),
            source,
        })
}
