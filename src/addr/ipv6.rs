use std::ffi::CString;

use crate::addr::{Family, FromSockAddr, FromText, ToSockAddr, WithPort};
use crate::error::SocketError;

// The mirrored libc crate omits these bindings; declare the glibc symbols and
// constant directly.
unsafe extern "C" {
	fn inet_pton(af: libc::c_int, src: *const libc::c_char, dst: *mut libc::c_void) -> libc::c_int;
	fn inet_ntop(
		af: libc::c_int,
		src: *const libc::c_void,
		dst: *mut libc::c_char,
		size: libc::socklen_t,
	) -> *const libc::c_char;
}

const INET6_ADDRSTRLEN: libc::c_int = 46;

/// IPv6 address family marker.
pub struct Ipv6;

impl Family for Ipv6 {
	type Addr = SocketAddrV6;

	#[inline]
	fn raw() -> libc::c_int {
		libc::AF_INET6
	}
}

/// IPv6 socket address (IP + port + scope).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocketAddrV6 {
	ip: [u8; 16],
	port: u16,
	/// Scope ID for link-local addresses (identifies network interface).
	/// Zero unless the address is link-local (fe80::/10).
	scope_id: u32,
}

impl SocketAddrV6 {
	/// Creates a new IPv6 address.
	pub fn new(ip: [u8; 16], port: u16) -> Self {
		Self { ip, port, scope_id: 0 }
	}

	/// Creates with explicit scope ID, for link-local addresses.
	pub fn with_scope(ip: [u8; 16], port: u16, scope_id: u32) -> Self {
		Self { ip, port, scope_id }
	}

	/// Returns the IP bytes.
	pub fn ip(&self) -> [u8; 16] {
		self.ip
	}

	/// Returns the port.
	pub fn port(&self) -> u16 {
		self.port
	}

	/// Returns the scope ID.
	pub fn scope_id(&self) -> u32 {
		self.scope_id
	}

	/// Creates from raw sockaddr_in6.
	pub(crate) fn from_raw(raw: &libc::sockaddr_in6) -> Self {
		Self {
			ip: raw.sin6_addr.s6_addr,
			port: u16::from_be(raw.sin6_port),
			scope_id: raw.sin6_scope_id,
		}
	}

	/// Converts to the raw sockaddr_in6 for syscalls.
	pub(crate) fn to_raw(&self) -> libc::sockaddr_in6 {
		libc::sockaddr_in6 {
			sin6_family: libc::AF_INET6 as libc::sa_family_t,
			sin6_port: self.port.to_be(),
			sin6_flowinfo: 0,
			sin6_addr: libc::in6_addr { s6_addr: self.ip },
			sin6_scope_id: self.scope_id,
		}
	}
}

impl FromText for SocketAddrV6 {
	fn from_text(text: &str, port: u16) -> Result<Self, SocketError> {
		let c_text = CString::new(text)
			.map_err(|_| SocketError::InvalidAddress { reason: "embedded nul in address" })?;
		let mut raw = libc::in6_addr { s6_addr: [0; 16] };
		let status = unsafe {
			inet_pton(
				libc::AF_INET6,
				c_text.as_ptr(),
				&mut raw as *mut _ as *mut libc::c_void,
			)
		};
		if status != 1 {
			return Err(SocketError::InvalidAddress {
				reason: "not a colon-hex IPv6 address",
			});
		}
		Ok(Self {
			ip: raw.s6_addr,
			port,
			scope_id: 0,
		})
	}
}

impl WithPort for SocketAddrV6 {
	fn with_port(self, port: u16) -> Self {
		Self { port, ..self }
	}
}

impl ToSockAddr for SocketAddrV6 {
	fn with_raw<F, R>(&self, f: F) -> R
	where
		F: FnOnce(*const libc::sockaddr, libc::socklen_t) -> R,
	{
		let raw = self.to_raw();
		let ptr = &raw as *const _ as *const libc::sockaddr;
		let len = std::mem::size_of::<libc::sockaddr_in6>() as libc::socklen_t;
		f(ptr, len)
	}
}

impl FromSockAddr for SocketAddrV6 {
	unsafe fn from_sockaddr(addr: *const libc::sockaddr, len: libc::socklen_t) -> Option<Self> {
		if len < std::mem::size_of::<libc::sockaddr_in6>() as libc::socklen_t {
			return None;
		}
		let raw = unsafe { &*(addr as *const libc::sockaddr_in6) };
		if raw.sin6_family != libc::AF_INET6 as libc::sa_family_t {
			return None;
		}
		Some(Self::from_raw(raw))
	}
}

impl std::fmt::Display for SocketAddrV6 {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut buf = [0 as libc::c_char; INET6_ADDRSTRLEN as usize];
		let raw = libc::in6_addr { s6_addr: self.ip };
		let text = unsafe {
			let ptr = inet_ntop(
				libc::AF_INET6,
				&raw as *const _ as *const libc::c_void,
				buf.as_mut_ptr(),
				buf.len() as libc::socklen_t,
			);
			if ptr.is_null() {
				return write!(f, "[?]:{}", self.port);
			}
			std::ffi::CStr::from_ptr(ptr).to_string_lossy()
		};
		write!(f, "[{}]:{}", text, self.port)
	}
}
