use std::marker::PhantomData;
use std::os::fd::RawFd;

use crate::addr::{Family, FromSockAddr};
use crate::error::{SocketError, errno};
use crate::handle::Handle;
use crate::socket::SockType;

/// The descriptor-owning core shared by every socket role.
///
/// Family and type are compile-time choices; there is no runtime switching
/// between them. The role types (`TcpListener`, `TcpStream`, `UdpSocket`)
/// layer their operations over this via `Deref` — they add capabilities,
/// never change what is owned.
pub struct BaseSocket<F: Family, T: SockType> {
	handle: Handle,
	_marker: PhantomData<(F, T)>,
}

impl<F: Family, T: SockType> BaseSocket<F, T> {
	/// Requests a fresh descriptor from the OS.
	///
	/// The socket is created with `SOCK_CLOEXEC`.
	pub(crate) fn create() -> Result<Self, SocketError> {
		let fd = unsafe { libc::socket(F::raw(), T::raw() | libc::SOCK_CLOEXEC, T::protocol()) };
		if fd == -1 {
			return Err(SocketError::Create { errno: errno() });
		}
		Ok(Self {
			handle: Handle::from_raw(fd)?,
			_marker: PhantomData,
		})
	}

	/// Wraps an already-open descriptor, e.g. one returned by `accept4()`.
	///
	/// Fails with `InvalidHandle` on the invalid sentinel. Crate-internal:
	/// callers never hand sockets arbitrary descriptors.
	pub(crate) fn from_raw_descriptor(fd: RawFd) -> Result<Self, SocketError> {
		Ok(Self {
			handle: Handle::from_raw(fd)?,
			_marker: PhantomData,
		})
	}

	/// Returns the raw file descriptor without transferring ownership.
	#[inline]
	pub fn as_raw_fd(&self) -> libc::c_int {
		self.handle.raw()
	}

	/// Reads SO_TYPE — the socket type the OS recorded at creation.
	pub fn socket_type(&self) -> Result<libc::c_int, SocketError> {
		self.get_int(libc::SOL_SOCKET, libc::SO_TYPE, "SO_TYPE")
	}

	/// Reads and clears SO_ERROR — the pending asynchronous error, if any.
	///
	/// Returns 0 when no error is pending.
	pub fn last_error(&self) -> Result<i32, SocketError> {
		self.get_int(libc::SOL_SOCKET, libc::SO_ERROR, "SO_ERROR")
	}

	/// Sets SO_REUSEADDR.
	pub fn set_reuse_addr(&self, enable: bool) -> Result<(), SocketError> {
		self.set_int(libc::SOL_SOCKET, libc::SO_REUSEADDR, enable as libc::c_int, "SO_REUSEADDR")
	}

	/// Reads SO_REUSEADDR.
	pub fn reuse_addr(&self) -> Result<bool, SocketError> {
		Ok(self.get_int(libc::SOL_SOCKET, libc::SO_REUSEADDR, "SO_REUSEADDR")? != 0)
	}

	/// Raw setsockopt escape hatch.
	///
	/// `value` is passed to the OS verbatim; the caller is responsible for
	/// providing a buffer of the right layout for `level`/`name`.
	pub fn set_option_raw(
		&self,
		level: libc::c_int,
		name: libc::c_int,
		value: &[u8],
	) -> Result<(), SocketError> {
		let result = unsafe {
			libc::setsockopt(
				self.as_raw_fd(),
				level,
				name,
				value.as_ptr() as *const libc::c_void,
				value.len() as libc::socklen_t,
			)
		};
		if result == -1 {
			return Err(SocketError::SetOption { errno: errno(), option: "raw option" });
		}
		Ok(())
	}

	/// Raw getsockopt escape hatch.
	///
	/// Fills `value` and returns the length the OS reported.
	pub fn option_raw(
		&self,
		level: libc::c_int,
		name: libc::c_int,
		value: &mut [u8],
	) -> Result<usize, SocketError> {
		let mut len = value.len() as libc::socklen_t;
		let result = unsafe {
			libc::getsockopt(
				self.as_raw_fd(),
				level,
				name,
				value.as_mut_ptr() as *mut libc::c_void,
				&mut len,
			)
		};
		if result == -1 {
			return Err(SocketError::GetOption { errno: errno(), option: "raw option" });
		}
		Ok(len as usize)
	}

	/// Returns the locally-bound address (getsockname).
	pub fn local_addr(&self) -> Result<F::Addr, SocketError> {
		self.name_of(libc::getsockname, "getsockname")
	}

	/// Returns the remote peer's address (getpeername).
	///
	/// Surfaces the OS error (ENOTCONN) if the socket has no peer yet.
	pub fn peer_addr(&self) -> Result<F::Addr, SocketError> {
		self.name_of(libc::getpeername, "getpeername")
	}

	/// Closes the descriptor, reporting failure.
	///
	/// Dropping the socket also closes it, best-effort; this is the path for
	/// callers who need to observe a failing close.
	pub fn close(self) -> Result<(), SocketError> {
		self.handle.close()
	}

	pub(crate) fn get_int(
		&self,
		level: libc::c_int,
		name: libc::c_int,
		option: &'static str,
	) -> Result<libc::c_int, SocketError> {
		let mut value: libc::c_int = 0;
		let mut len = std::mem::size_of::<libc::c_int>() as libc::socklen_t;
		let result = unsafe {
			libc::getsockopt(
				self.as_raw_fd(),
				level,
				name,
				&mut value as *mut _ as *mut libc::c_void,
				&mut len,
			)
		};
		if result == -1 {
			return Err(SocketError::GetOption { errno: errno(), option });
		}
		Ok(value)
	}

	pub(crate) fn set_int(
		&self,
		level: libc::c_int,
		name: libc::c_int,
		value: libc::c_int,
		option: &'static str,
	) -> Result<(), SocketError> {
		let result = unsafe {
			libc::setsockopt(
				self.as_raw_fd(),
				level,
				name,
				&value as *const _ as *const libc::c_void,
				std::mem::size_of::<libc::c_int>() as libc::socklen_t,
			)
		};
		if result == -1 {
			return Err(SocketError::SetOption { errno: errno(), option });
		}
		Ok(())
	}

	fn name_of(
		&self,
		syscall: unsafe extern "C" fn(
			libc::c_int,
			*mut libc::sockaddr,
			*mut libc::socklen_t,
		) -> libc::c_int,
		option: &'static str,
	) -> Result<F::Addr, SocketError> {
		let mut storage: libc::sockaddr_storage = unsafe { std::mem::zeroed() };
		let mut len = std::mem::size_of::<libc::sockaddr_storage>() as libc::socklen_t;

		let result = unsafe {
			syscall(
				self.as_raw_fd(),
				&mut storage as *mut _ as *mut libc::sockaddr,
				&mut len,
			)
		};
		if result == -1 {
			return Err(SocketError::GetOption { errno: errno(), option });
		}

		unsafe { F::Addr::from_sockaddr(&storage as *const _ as *const libc::sockaddr, len) }
			.ok_or(SocketError::InvalidAddress { reason: "address family mismatch" })
	}
}

impl<F: Family, T: SockType> std::os::fd::AsRawFd for BaseSocket<F, T> {
	fn as_raw_fd(&self) -> RawFd {
		self.handle.raw()
	}
}

impl<F: Family, T: SockType> std::os::fd::IntoRawFd for BaseSocket<F, T> {
	fn into_raw_fd(self) -> RawFd {
		self.handle.into_raw()
	}
}
