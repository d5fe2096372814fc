//! Address families and endpoint value types.
//!
//! Two families are supported, selected at compile time:
//! - `Ipv4` — dotted-decimal presentation, 4-byte addresses
//! - `Ipv6` — colon-hex presentation, 16-byte addresses

mod ipv4;
mod ipv6;
pub use self::ipv4::{Ipv4, SocketAddrV4};
pub use self::ipv6::{Ipv6, SocketAddrV6};

use crate::error::SocketError;

/// Trait for address family markers.
///
/// Each implementor selects the addressing layout for a whole socket:
/// the `socket()` domain constant plus the endpoint value type.
pub trait Family {
	/// Endpoint type carried by sockets of this family.
	type Addr: ToSockAddr
		+ FromSockAddr
		+ FromText
		+ WithPort
		+ Copy
		+ std::fmt::Display
		+ std::fmt::Debug;

	/// Returns the libc address-family constant.
	fn raw() -> libc::c_int;
}

/// Trait for address types that can be converted to raw sockaddr for syscalls.
pub trait ToSockAddr {
	/// Calls the provided closure with a pointer to the raw sockaddr and its
	/// size. The raw struct lives only for the duration of the call.
	fn with_raw<F, R>(&self, f: F) -> R
	where
		F: FnOnce(*const libc::sockaddr, libc::socklen_t) -> R;
}

/// Trait for address types that can be created from raw sockaddr storage.
pub trait FromSockAddr: Sized {
	/// Creates an address from raw sockaddr storage.
	///
	/// # Safety
	/// `addr` must point to initialized storage of at least `len` bytes.
	unsafe fn from_sockaddr(addr: *const libc::sockaddr, len: libc::socklen_t) -> Option<Self>;
}

/// Trait for address types constructible from numeric presentation text.
///
/// Only literal addresses are accepted here — hostname resolution happens in
/// the connect/send-to paths, never in address construction.
pub trait FromText: Sized {
	/// Parses `text` in this family's presentation format.
	///
	/// Fails with `InvalidAddress` if the text does not parse for the
	/// family; no partial value is produced.
	fn from_text(text: &str, port: u16) -> Result<Self, SocketError>;
}

/// Trait for producing a copy of an address with a different port.
///
/// Addresses are immutable values; this returns a new one. Used by the
/// resolution path to stamp a caller-supplied numeric port onto the first
/// resolver candidate.
pub trait WithPort {
	fn with_port(self, port: u16) -> Self;
}
