use std::ffi::CString;

use crate::addr::{Family, FromSockAddr, FromText, ToSockAddr, WithPort};
use crate::error::SocketError;

// The mirrored libc crate omits this binding; declare the glibc symbol directly.
unsafe extern "C" {
	fn inet_pton(af: libc::c_int, src: *const libc::c_char, dst: *mut libc::c_void) -> libc::c_int;
}

/// IPv4 address family marker.
pub struct Ipv4;

impl Family for Ipv4 {
	type Addr = SocketAddrV4;

	#[inline]
	fn raw() -> libc::c_int {
		libc::AF_INET
	}
}

/// IPv4 socket address (IP + port).
///
/// Immutable value type; freely copied and compared, never mutated after
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocketAddrV4 {
	ip: [u8; 4],
	port: u16,
}

impl SocketAddrV4 {
	/// Creates a new IPv4 address from octets and a port.
	pub fn new(ip: [u8; 4], port: u16) -> Self {
		Self { ip, port }
	}

	/// Returns the IP octets.
	pub fn ip(&self) -> [u8; 4] {
		self.ip
	}

	/// Returns the port.
	pub fn port(&self) -> u16 {
		self.port
	}

	/// Creates from raw sockaddr_in.
	pub(crate) fn from_raw(raw: &libc::sockaddr_in) -> Self {
		Self {
			ip: raw.sin_addr.s_addr.to_ne_bytes(),
			port: u16::from_be(raw.sin_port),
		}
	}

	/// Converts to the raw sockaddr_in for syscalls.
	pub(crate) fn to_raw(&self) -> libc::sockaddr_in {
		libc::sockaddr_in {
			sin_family: libc::AF_INET as libc::sa_family_t,
			sin_port: self.port.to_be(),
			sin_addr: libc::in_addr {
				s_addr: u32::from_ne_bytes(self.ip),
			},
			sin_zero: [0; 8],
		}
	}
}

impl FromText for SocketAddrV4 {
	fn from_text(text: &str, port: u16) -> Result<Self, SocketError> {
		let c_text = CString::new(text)
			.map_err(|_| SocketError::InvalidAddress { reason: "embedded nul in address" })?;
		let mut raw = libc::in_addr { s_addr: 0 };
		let status = unsafe {
			inet_pton(
				libc::AF_INET,
				c_text.as_ptr(),
				&mut raw as *mut _ as *mut libc::c_void,
			)
		};
		if status != 1 {
			return Err(SocketError::InvalidAddress {
				reason: "not a dotted-decimal IPv4 address",
			});
		}
		Ok(Self {
			ip: raw.s_addr.to_ne_bytes(),
			port,
		})
	}
}

impl WithPort for SocketAddrV4 {
	fn with_port(self, port: u16) -> Self {
		Self { port, ..self }
	}
}

impl ToSockAddr for SocketAddrV4 {
	fn with_raw<F, R>(&self, f: F) -> R
	where
		F: FnOnce(*const libc::sockaddr, libc::socklen_t) -> R,
	{
		// sockaddr_in lives on this stack frame for the duration of f.
		let raw = self.to_raw();
		let ptr = &raw as *const _ as *const libc::sockaddr;
		let len = std::mem::size_of::<libc::sockaddr_in>() as libc::socklen_t;
		f(ptr, len)
	}
}

impl FromSockAddr for SocketAddrV4 {
	unsafe fn from_sockaddr(addr: *const libc::sockaddr, len: libc::socklen_t) -> Option<Self> {
		if len < std::mem::size_of::<libc::sockaddr_in>() as libc::socklen_t {
			return None;
		}
		let raw = unsafe { &*(addr as *const libc::sockaddr_in) };
		if raw.sin_family != libc::AF_INET as libc::sa_family_t {
			return None;
		}
		Some(Self::from_raw(raw))
	}
}

impl std::fmt::Display for SocketAddrV4 {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"{}.{}.{}.{}:{}",
			self.ip[0], self.ip[1], self.ip[2], self.ip[3], self.port
		)
	}
}
