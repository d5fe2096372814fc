use std::ops::Deref;
use std::os::fd::RawFd;

use crate::addr::{Family, FromText, ToSockAddr};
use crate::error::{SocketError, errno};
use crate::socket::{BaseSocket, Stream};

/// Behavior shared by both TCP roles.
///
/// Not constructible on its own — `TcpListener` and `TcpStream` each wrap
/// one of these and deref to it. A socket is one role for its whole life;
/// there is no conversion between them.
pub struct TcpSocket<F: Family> {
	base: BaseSocket<F, Stream>,
}

impl<F: Family> TcpSocket<F> {
	pub(crate) fn create() -> Result<Self, SocketError> {
		Ok(Self { base: BaseSocket::create()? })
	}

	pub(crate) fn from_raw_descriptor(fd: RawFd) -> Result<Self, SocketError> {
		Ok(Self { base: BaseSocket::from_raw_descriptor(fd)? })
	}

	/// Binds to a local endpoint given in presentation text.
	///
	/// Fails with `InvalidAddress` if `local` does not parse for this
	/// family, `Bind` if the OS refuses (in use, permission, already
	/// bound). Port 0 requests an ephemeral port; read it back with
	/// `local_addr()`.
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

	/// Sets SO_KEEPALIVE — periodic probes on idle connections.
	pub fn set_keepalive(&self, enable: bool) -> Result<(), SocketError> {
		self.base
			.set_int(libc::SOL_SOCKET, libc::SO_KEEPALIVE, enable as libc::c_int, "SO_KEEPALIVE")
	}

	/// Reads SO_KEEPALIVE.
	pub fn keepalive(&self) -> Result<bool, SocketError> {
		Ok(self.base.get_int(libc::SOL_SOCKET, libc::SO_KEEPALIVE, "SO_KEEPALIVE")? != 0)
	}

	/// Sets SO_LINGER.
	///
	/// - `None` — default close: return immediately, kernel flushes in the
	///   background
	/// - `Some(0)` — abortive close: discard unsent data and reset (RST)
	/// - `Some(n)` — close blocks up to n seconds to flush
	pub fn set_linger(&self, linger: Option<u16>) -> Result<(), SocketError> {
		let value = match linger {
			None => libc::linger { l_onoff: 0, l_linger: 0 },
			Some(seconds) => libc::linger {
				l_onoff: 1,
				l_linger: seconds as libc::c_int,
			},
		};
		let result = unsafe {
			libc::setsockopt(
				self.as_raw_fd(),
				libc::SOL_SOCKET,
				libc::SO_LINGER,
				&value as *const _ as *const libc::c_void,
				std::mem::size_of::<libc::linger>() as libc::socklen_t,
			)
		};
		if result == -1 {
			return Err(SocketError::SetOption { errno: errno(), option: "SO_LINGER" });
		}
		Ok(())
	}

	/// Reads SO_LINGER. `None` means linger is off.
	pub fn linger(&self) -> Result<Option<u16>, SocketError> {
		let mut value = libc::linger { l_onoff: 0, l_linger: 0 };
		let mut len = std::mem::size_of::<libc::linger>() as libc::socklen_t;
		let result = unsafe {
			libc::getsockopt(
				self.as_raw_fd(),
				libc::SOL_SOCKET,
				libc::SO_LINGER,
				&mut value as *mut _ as *mut libc::c_void,
				&mut len,
			)
		};
		if result == -1 {
			return Err(SocketError::GetOption { errno: errno(), option: "SO_LINGER" });
		}
		if value.l_onoff == 0 {
			Ok(None)
		} else {
			Ok(Some(value.l_linger as u16))
		}
	}

	pub(crate) fn close_inner(self) -> Result<(), SocketError> {
		self.base.close()
	}
}

impl<F: Family> Deref for TcpSocket<F> {
	type Target = BaseSocket<F, Stream>;

	fn deref(&self) -> &Self::Target {
		&self.base
	}
}

impl<F: Family> std::os::fd::AsRawFd for TcpSocket<F> {
	fn as_raw_fd(&self) -> RawFd {
		self.base.as_raw_fd()
	}
}

impl<F: Family> std::os::fd::IntoRawFd for TcpSocket<F> {
	fn into_raw_fd(self) -> RawFd {
		std::os::fd::IntoRawFd::into_raw_fd(self.base)
	}
}
