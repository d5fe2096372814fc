use std::ops::Deref;
use std::os::fd::RawFd;

use crate::addr::Family;
use crate::error::{SocketError, errno};
use crate::socket::stream::TcpStream;
use crate::socket::tcp::TcpSocket;

/// A TCP socket in the listening role.
///
/// Lifecycle: create, `bind`, `listen`, then `accept` repeatedly. Each
/// accept yields an independently owned [`TcpStream`]; the listener itself
/// never becomes connected and never changes role.
pub struct TcpListener<F: Family> {
	sock: TcpSocket<F>,
}

impl<F: Family> TcpListener<F> {
	/// Creates an unbound listening-role socket.
	pub fn new() -> Result<Self, SocketError> {
		Ok(Self { sock: TcpSocket::create()? })
	}

	/// Marks the bound socket as willing to queue up to `backlog` pending
	/// connections.
	///
	/// Fails with `Listen` if called before bind or if the OS rejects the
	/// backlog.
	pub fn listen(&self, backlog: i32) -> Result<(), SocketError> {
		let result = unsafe { libc::listen(self.as_raw_fd(), backlog) };
		if result == -1 {
			return Err(SocketError::Listen { errno: errno(), backlog });
		}
		Ok(())
	}

	/// Blocks until a pending connection exists, then returns a new
	/// [`TcpStream`] owning the freshly accepted descriptor.
	///
	/// The listener is unchanged and can keep accepting. A listener closed
	/// from another thread while this call blocks surfaces as whatever OS
	/// error results, like any other `Accept` failure.
	pub fn accept(&self) -> Result<TcpStream<F>, SocketError> {
		let fd = unsafe {
			libc::accept4(
				self.as_raw_fd(),
				std::ptr::null_mut(),
				std::ptr::null_mut(),
				libc::SOCK_CLOEXEC,
			)
		};
		if fd == -1 {
			return Err(SocketError::Accept { errno: errno() });
		}
		TcpStream::from_raw_descriptor(fd)
	}

	/// Closes the descriptor, reporting failure. Drop closes best-effort.
	pub fn close(self) -> Result<(), SocketError> {
		self.sock.close_inner()
	}
}

impl<F: Family> Deref for TcpListener<F> {
	type Target = TcpSocket<F>;

	fn deref(&self) -> &Self::Target {
		&self.sock
	}
}

impl<F: Family> std::os::fd::AsRawFd for TcpListener<F> {
	fn as_raw_fd(&self) -> RawFd {
		self.sock.as_raw_fd()
	}
}

impl<F: Family> std::os::fd::IntoRawFd for TcpListener<F> {
	fn into_raw_fd(self) -> RawFd {
		std::os::fd::IntoRawFd::into_raw_fd(self.sock)
	}
}
