use std::ops::Deref;
use std::os::fd::RawFd;

use crate::addr::{Family, ToSockAddr, WithPort};
use crate::error::{SocketError, errno};
use crate::resolve::resolve_first;
use crate::socket::tcp::TcpSocket;

/// How to shut down one or both directions of a connection.
pub enum Shutdown {
	Read,
	Write,
	ReadWrite,
}

/// A TCP socket in the connected (or connecting) role.
///
/// Reached either by `new` + `connect`, or directly in the connected state
/// via [`TcpListener::accept`](crate::TcpListener::accept). Streams are only
/// ever produced by those two paths — there is no way to wrap an arbitrary
/// descriptor from outside the crate.
pub struct TcpStream<F: Family> {
	sock: TcpSocket<F>,
}

impl<F: Family> TcpStream<F> {
	/// Creates an unconnected connected-role socket.
	pub fn new() -> Result<Self, SocketError> {
		Ok(Self { sock: TcpSocket::create()? })
	}

	/// Wraps a descriptor freshly produced by `accept4()`.
	pub(crate) fn from_raw_descriptor(fd: RawFd) -> Result<Self, SocketError> {
		Ok(Self { sock: TcpSocket::from_raw_descriptor(fd)? })
	}

	/// Resolves `host` and connects to the first candidate with `port`
	/// stamped on.
	///
	/// Resolution is restricted to this socket's family and to TCP. A
	/// single connect attempt is made; later resolver candidates are never
	/// tried. Fails with `Resolve` if nothing resolves, `Connect` if the
	/// OS call fails.
	pub fn connect(&self, host: &str, port: u16) -> Result<(), SocketError> {
		let addr = resolve_first::<F>(host, None, libc::SOCK_STREAM, libc::IPPROTO_TCP)?
			.with_port(port);
		self.connect_addr(&addr)
	}

	/// Resolves `host` and `service` (a name from the services database or
	/// a numeric port string) and connects to the first candidate.
	pub fn connect_service(&self, host: &str, service: &str) -> Result<(), SocketError> {
		let addr = resolve_first::<F>(host, Some(service), libc::SOCK_STREAM, libc::IPPROTO_TCP)?;
		self.connect_addr(&addr)
	}

	/// Connects to an already-constructed endpoint.
	pub fn connect_addr(&self, addr: &F::Addr) -> Result<(), SocketError> {
		let result = addr.with_raw(|ptr, len| unsafe {
			libc::connect(self.as_raw_fd(), ptr, len)
		});
		if result == -1 {
			return Err(SocketError::Connect { errno: errno(), addr: addr.to_string() });
		}
		Ok(())
	}

	/// Blocking send.
	///
	/// Returns the byte count the OS accepted, which may be less than
	/// `buf.len()` — callers loop if full delivery matters.
	pub fn send(&self, buf: &[u8]) -> Result<usize, SocketError> {
		self.send_with_flags(buf, 0)
	}

	pub fn send_with_flags(&self, buf: &[u8], flags: i32) -> Result<usize, SocketError> {
		let n = unsafe {
			libc::send(
				self.as_raw_fd(),
				buf.as_ptr() as *const libc::c_void,
				buf.len(),
				flags,
			)
		};
		if n == -1 {
			return Err(SocketError::Send { errno: errno() });
		}
		Ok(n as usize)
	}

	/// Blocking receive. Returns 0 on orderly peer shutdown.
	pub fn recv(&self, buf: &mut [u8]) -> Result<usize, SocketError> {
		self.recv_with_flags(buf, 0)
	}

	pub fn recv_with_flags(&self, buf: &mut [u8], flags: i32) -> Result<usize, SocketError> {
		let n = unsafe {
			libc::recv(
				self.as_raw_fd(),
				buf.as_mut_ptr() as *mut libc::c_void,
				buf.len(),
				flags,
			)
		};
		if n == -1 {
			return Err(SocketError::Receive { errno: errno() });
		}
		Ok(n as usize)
	}

	/// Shuts down one or both directions of the connection.
	pub fn shutdown(&self, how: Shutdown) -> Result<(), SocketError> {
		let how = match how {
			Shutdown::Read => libc::SHUT_RD,
			Shutdown::Write => libc::SHUT_WR,
			Shutdown::ReadWrite => libc::SHUT_RDWR,
		};
		let result = unsafe { libc::shutdown(self.as_raw_fd(), how) };
		if result == -1 {
			return Err(SocketError::SetOption { errno: errno(), option: "shutdown" });
		}
		Ok(())
	}

	/// Closes the descriptor, reporting failure. Drop closes best-effort.
	pub fn close(self) -> Result<(), SocketError> {
		self.sock.close_inner()
	}
}

impl<F: Family> Deref for TcpStream<F> {
	type Target = TcpSocket<F>;

	fn deref(&self) -> &Self::Target {
		&self.sock
	}
}

impl<F: Family> std::os::fd::AsRawFd for TcpStream<F> {
	fn as_raw_fd(&self) -> RawFd {
		self.sock.as_raw_fd()
	}
}

impl<F: Family> std::os::fd::IntoRawFd for TcpStream<F> {
	fn into_raw_fd(self) -> RawFd {
		std::os::fd::IntoRawFd::into_raw_fd(self.sock)
	}
}

impl<F: Family> std::io::Read for TcpStream<F> {
	fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
		self.recv(buf).map_err(Into::into)
	}
}

impl<F: Family> std::io::Write for TcpStream<F> {
	fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
		self.send(buf).map_err(Into::into)
	}

	fn flush(&mut self) -> std::io::Result<()> {
		// No userspace buffering at this level.
		Ok(())
	}
}
