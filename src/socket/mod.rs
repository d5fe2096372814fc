mod base;
mod datagram;
mod listener;
mod stream;
mod tcp;

pub use self::base::BaseSocket;
pub use self::datagram::UdpSocket;
pub use self::listener::TcpListener;
pub use self::stream::{Shutdown, TcpStream};
pub use self::tcp::TcpSocket;

/// Trait for socket type markers.
///
/// Each implementor selects one (type, protocol) pair for the `socket()`
/// syscall:
/// - `Stream` — reliable, ordered byte stream (TCP)
/// - `Datagram` — unreliable, unordered packets (UDP)
pub trait SockType {
	/// Returns the libc socket-type constant.
	fn raw() -> libc::c_int;

	/// Returns the libc protocol constant.
	fn protocol() -> libc::c_int;
}

/// Stream socket marker (TCP).
pub struct Stream;

/// Datagram socket marker (UDP).
pub struct Datagram;

impl SockType for Stream {
	#[inline]
	fn raw() -> libc::c_int {
		libc::SOCK_STREAM
	}

	#[inline]
	fn protocol() -> libc::c_int {
		libc::IPPROTO_TCP
	}
}

impl SockType for Datagram {
	#[inline]
	fn raw() -> libc::c_int {
		libc::SOCK_DGRAM
	}

	#[inline]
	fn protocol() -> libc::c_int {
		libc::IPPROTO_UDP
	}
}
