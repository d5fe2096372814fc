use std::ops::Deref;
use std::os::fd::RawFd;

use crate::addr::{Family, FromSockAddr, FromText, ToSockAddr, WithPort};
use crate::error::{SocketError, errno};
use crate::resolve::resolve_first;
use crate::socket::{BaseSocket, Datagram};

/// A UDP socket.
///
/// One role for its whole life. `connect` does not establish a stream — it
/// only installs a default peer, after which `send`/`recv` target and
/// accept that peer alone. `send_to`/`recv_from` name the peer per call.
pub struct UdpSocket<F: Family> {
	base: BaseSocket<F, Datagram>,
}

impl<F: Family> UdpSocket<F> {
	/// Creates an unbound UDP socket.
	pub fn new() -> Result<Self, SocketError> {
		Ok(Self { base: BaseSocket::create()? })
	}

	/// Binds to a local endpoint given in presentation text.
	///
	/// Same contract as the stream bind; datagram sockets have no
	/// listen/accept phase after it.
	pub fn bind(&self, local: &str, port: u16) -> Result<(), SocketError> {
		self.bind_addr(&F::Addr::from_text(local, port)?)
	}

	/// Binds to an already-constructed endpoint.
	pub fn bind_addr(&self, addr: &F::Addr) -> Result<(), SocketError> {
		let result = addr.with_raw(|ptr, len| unsafe {
			libc::bind(self.as_raw_fd(), ptr, len)
		});
		if result == -1 {
			return Err(SocketError::Bind { errno: errno(), addr: addr.to_string() });
		}
		Ok(())
	}

	/// Sets SO_BROADCAST — whether sends to broadcast addresses are allowed.
	pub fn set_broadcast(&self, enable: bool) -> Result<(), SocketError> {
		self.base
			.set_int(libc::SOL_SOCKET, libc::SO_BROADCAST, enable as libc::c_int, "SO_BROADCAST")
	}

	/// Reads SO_BROADCAST.
	pub fn broadcast(&self) -> Result<bool, SocketError> {
		Ok(self.base.get_int(libc::SOL_SOCKET, libc::SO_BROADCAST, "SO_BROADCAST")? != 0)
	}

	/// Resolves `host` and installs the first candidate (with `port`
	/// stamped on) as the default peer.
	///
	/// Same first-candidate-only policy as the stream connect.
	pub fn connect(&self, host: &str, port: u16) -> Result<(), SocketError> {
		let addr = resolve_first::<F>(host, None, libc::SOCK_DGRAM, libc::IPPROTO_UDP)?
			.with_port(port);
		self.connect_addr(&addr)
	}

	/// Resolves `host` and `service` and installs the first candidate as
	/// the default peer.
	pub fn connect_service(&self, host: &str, service: &str) -> Result<(), SocketError> {
		let addr = resolve_first::<F>(host, Some(service), libc::SOCK_DGRAM, libc::IPPROTO_UDP)?;
		self.connect_addr(&addr)
	}

	/// Installs an already-constructed endpoint as the default peer.
	pub fn connect_addr(&self, addr: &F::Addr) -> Result<(), SocketError> {
		let result = addr.with_raw(|ptr, len| unsafe {
			libc::connect(self.as_raw_fd(), ptr, len)
		});
		if result == -1 {
			return Err(SocketError::Connect { errno: errno(), addr: addr.to_string() });
		}
		Ok(())
	}

	/// Sends one datagram to the default peer. Requires a prior `connect`.
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

	/// Receives one datagram; with a default peer installed, only that
	/// peer's datagrams are delivered.
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

	/// Sends one datagram to an explicit endpoint.
	pub fn send_to(&self, buf: &[u8], addr: &F::Addr) -> Result<usize, SocketError> {
		self.send_to_with_flags(buf, addr, 0)
	}

	pub fn send_to_with_flags(
		&self,
		buf: &[u8],
		addr: &F::Addr,
		flags: i32,
	) -> Result<usize, SocketError> {
		let n = addr.with_raw(|ptr, len| unsafe {
			libc::sendto(
				self.as_raw_fd(),
				buf.as_ptr() as *const libc::c_void,
				buf.len(),
				flags,
				ptr,
				len,
			)
		});
		if n == -1 {
			return Err(SocketError::Send { errno: errno() });
		}
		Ok(n as usize)
	}

	/// Resolves `host` (first candidate, `port` stamped on) and sends one
	/// datagram to it.
	pub fn send_to_host(&self, buf: &[u8], host: &str, port: u16) -> Result<usize, SocketError> {
		self.send_to_host_with_flags(buf, host, port, 0)
	}

	pub fn send_to_host_with_flags(
		&self,
		buf: &[u8],
		host: &str,
		port: u16,
		flags: i32,
	) -> Result<usize, SocketError> {
		let addr = resolve_first::<F>(host, None, libc::SOCK_DGRAM, libc::IPPROTO_UDP)?
			.with_port(port);
		self.send_to_with_flags(buf, &addr, flags)
	}

	/// Receives one datagram, reporting its length and the sender's
	/// address.
	pub fn recv_from(&self, buf: &mut [u8]) -> Result<(usize, F::Addr), SocketError> {
		self.recv_from_with_flags(buf, 0)
	}

	pub fn recv_from_with_flags(
		&self,
		buf: &mut [u8],
		flags: i32,
	) -> Result<(usize, F::Addr), SocketError> {
		let mut storage: libc::sockaddr_storage = unsafe { std::mem::zeroed() };
		let mut len = std::mem::size_of::<libc::sockaddr_storage>() as libc::socklen_t;

		let n = unsafe {
			libc::recvfrom(
				self.as_raw_fd(),
				buf.as_mut_ptr() as *mut libc::c_void,
				buf.len(),
				flags,
				&mut storage as *mut _ as *mut libc::sockaddr,
				&mut len,
			)
		};
		if n == -1 {
			return Err(SocketError::Receive { errno: errno() });
		}

		let addr = unsafe {
			F::Addr::from_sockaddr(&storage as *const _ as *const libc::sockaddr, len)
				.ok_or(SocketError::InvalidAddress { reason: "invalid sender address" })?
		};
		Ok((n as usize, addr))
	}

	/// Closes the descriptor, reporting failure. Drop closes best-effort.
	pub fn close(self) -> Result<(), SocketError> {
		self.base.close()
	}
}

impl<F: Family> Deref for UdpSocket<F> {
	type Target = BaseSocket<F, Datagram>;

	fn deref(&self) -> &Self::Target {
		&self.base
	}
}

impl<F: Family> std::os::fd::AsRawFd for UdpSocket<F> {
	fn as_raw_fd(&self) -> RawFd {
		self.base.as_raw_fd()
	}
}

impl<F: Family> std::os::fd::IntoRawFd for UdpSocket<F> {
	fn into_raw_fd(self) -> RawFd {
		std::os::fd::IntoRawFd::into_raw_fd(self.base)
	}
}
