use std::io;
use std::process::Stdio;

use tokio::io::AsyncRead;
use tokio::process::{Child, Command};

pub(crate) type OutputReader = Box<dyn AsyncRead + Send + Unpin>;

/// Where the child's combined output is read from.
pub(crate) enum OutputSource {
    /// stdout and stderr share one pipe, so lines arrive in write order.
    #[cfg(unix)]
    Shared(tokio::net::unix::pipe::Receiver),
    /// Separate stdout and stderr pipes taken from the spawned child.
    #[cfg(not(unix))]
    Separate,
}

/// Points the child's stdout and stderr at one pipe.
///
/// The command keeps the write ends until it is dropped; drop it right after
/// spawning or the reader never sees EOF.
#[cfg(unix)]
pub(crate) fn attach_output(command: &mut Command) -> io::Result<OutputSource> {
    use nix::fcntl::{fcntl, FcntlArg, FdFlag};
    use tokio::net::unix::pipe::Receiver;

    let (read, write) = nix::unistd::pipe()?;
    for fd in [&read, &write] {
        fcntl(fd, FcntlArg::F_SETFD(FdFlag::FD_CLOEXEC))?;
    }
    let write_err = write.try_clone()?;
    command
        .stdout(Stdio::from(write))
        .stderr(Stdio::from(write_err));
    Ok(OutputSource::Shared(Receiver::from_owned_fd(read)?))
}

#[cfg(not(unix))]
pub(crate) fn attach_output(command: &mut Command) -> io::Result<OutputSource> {
    command.stdout(Stdio::piped()).stderr(Stdio::piped());
    Ok(OutputSource::Separate)
}

impl OutputSource {
    /// Readers to drain, paired with a label for logging.
    #[cfg_attr(unix, allow(unused_variables))]
    pub(crate) fn into_readers(self, child: &mut Child) -> Vec<(OutputReader, &'static str)> {
        match self {
            #[cfg(unix)]
            OutputSource::Shared(reader) => vec![(Box::new(reader) as OutputReader, "output")],
            #[cfg(not(unix))]
            OutputSource::Separate => {
                let mut readers: Vec<(OutputReader, &'static str)> = Vec::with_capacity(2);
                if let Some(stdout) = child.stdout.take() {
                    readers.push((Box::new(stdout), "stdout"));
                }
                if let Some(stderr) = child.stderr.take() {
                    readers.push((Box::new(stderr), "stderr"));
                }
                readers
            }
        }
    }
}
