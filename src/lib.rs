//! Typed, blocking sockets over the OS socket API.
//!
//! TCP and UDP socket objects parameterized by address family, with
//! exclusive ownership of the descriptor and close-on-drop. Everything
//! blocks; everything either returns its declared value or fails with one
//! [`SocketError`] carrying the OS code. The process-wide network stack is
//! assumed to be live for the crate's entire lifetime.

pub mod socket;
mod addr;
mod error;
mod handle;
mod resolve;

pub use self::addr::{
	Family, FromSockAddr, FromText, Ipv4, Ipv6, SocketAddrV4, SocketAddrV6, ToSockAddr, WithPort,
};
pub use self::error::{SocketError, errno};
pub use self::handle::Handle;
pub use self::socket::{
	BaseSocket, Datagram, Shutdown, SockType, Stream, TcpListener, TcpSocket, TcpStream, UdpSocket,
};
