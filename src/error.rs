/// Errors reported by socket operations.
///
/// Every operation either returns its declared success value or fails with
/// exactly one of these variants carrying the raw OS error code. This layer
/// never retries and never interprets codes beyond the message table below —
/// failure handling belongs to the caller.
#[derive(Debug, thiserror::Error)]
pub enum SocketError {
	#[error("invalid address: {reason}")]
	InvalidAddress { reason: &'static str },

	#[error("socket() failed: {}", errno_to_str(*.errno))]
	Create { errno: i32 },

	#[error("received the invalid descriptor sentinel")]
	InvalidHandle,

	#[error("bind({addr}) failed: {}", errno_to_str(*.errno))]
	Bind { errno: i32, addr: String },

	#[error("listen(backlog={backlog}) failed: {}", errno_to_str(*.errno))]
	Listen { errno: i32, backlog: i32 },

	#[error("accept() failed: {}", errno_to_str(*.errno))]
	Accept { errno: i32 },

	#[error("connect({addr}) failed: {}", errno_to_str(*.errno))]
	Connect { errno: i32, addr: String },

	#[error("send() failed: {}", errno_to_str(*.errno))]
	Send { errno: i32 },

	#[error("recv() failed: {}", errno_to_str(*.errno))]
	Receive { errno: i32 },

	#[error("name resolution for {host:?} failed: {}", gai_to_str(*.code))]
	Resolve { code: i32, host: String },

	#[error("getsockopt({option}) failed: {}", errno_to_str(*.errno))]
	GetOption { errno: i32, option: &'static str },

	#[error("setsockopt({option}) failed: {}", errno_to_str(*.errno))]
	SetOption { errno: i32, option: &'static str },

	#[error("close() failed: {}", errno_to_str(*.errno))]
	Close { errno: i32 },
}

/// Returns current errno value.
#[inline]
pub fn errno() -> i32 {
	unsafe { *libc::__errno_location() }
}

/// Converts errno to human-readable string.
fn errno_to_str(errno: i32) -> String {
	match errno {
		libc::EACCES => "permission denied".into(),
		libc::EADDRINUSE => "address already in use".into(),
		libc::EADDRNOTAVAIL => "address not available".into(),
		libc::EAFNOSUPPORT => "address family not supported".into(),
		libc::EAGAIN => "resource temporarily unavailable".into(),
		libc::EBADF => "bad file descriptor".into(),
		libc::ECONNREFUSED => "connection refused".into(),
		libc::ECONNRESET => "connection reset by peer".into(),
		libc::EINTR => "interrupted by signal".into(),
		libc::EINVAL => "invalid argument".into(),
		libc::EISCONN => "already connected".into(),
		libc::EMFILE => "too many open files".into(),
		libc::ENETUNREACH => "network unreachable".into(),
		libc::ENOBUFS => "no buffer space available".into(),
		libc::ENOTCONN => "not connected".into(),
		libc::EPIPE => "broken pipe".into(),
		libc::ETIMEDOUT => "connection timed out".into(),
		_ => format!("errno {}", errno),
	}
}

/// Converts a getaddrinfo return code to its resolver message.
fn gai_to_str(code: i32) -> String {
	let msg = unsafe { libc::gai_strerror(code) };
	if msg.is_null() {
		return format!("resolver error {}", code);
	}
	unsafe { std::ffi::CStr::from_ptr(msg) }
		.to_string_lossy()
		.into_owned()
}

/// Maps errno to std::io::ErrorKind.
fn errno_to_kind(errno: i32) -> std::io::ErrorKind {
	match errno {
		libc::EACCES | libc::EPERM => std::io::ErrorKind::PermissionDenied,
		libc::EADDRINUSE => std::io::ErrorKind::AddrInUse,
		libc::EADDRNOTAVAIL => std::io::ErrorKind::AddrNotAvailable,
		libc::EAGAIN => std::io::ErrorKind::WouldBlock,
		libc::ECONNREFUSED => std::io::ErrorKind::ConnectionRefused,
		libc::ECONNRESET => std::io::ErrorKind::ConnectionReset,
		libc::EINTR => std::io::ErrorKind::Interrupted,
		libc::EINVAL => std::io::ErrorKind::InvalidInput,
		libc::ENOTCONN => std::io::ErrorKind::NotConnected,
		libc::EPIPE => std::io::ErrorKind::BrokenPipe,
		libc::ETIMEDOUT => std::io::ErrorKind::TimedOut,
		_ => std::io::ErrorKind::Other,
	}
}

impl From<SocketError> for std::io::Error {
	fn from(err: SocketError) -> Self {
		let errno = match &err {
			SocketError::Create { errno } => *errno,
			SocketError::Bind { errno, .. } => *errno,
			SocketError::Listen { errno, .. } => *errno,
			SocketError::Accept { errno } => *errno,
			SocketError::Connect { errno, .. } => *errno,
			SocketError::Send { errno } => *errno,
			SocketError::Receive { errno } => *errno,
			SocketError::GetOption { errno, .. } => *errno,
			SocketError::SetOption { errno, .. } => *errno,
			SocketError::Close { errno } => *errno,
			SocketError::InvalidAddress { .. }
			| SocketError::InvalidHandle
			| SocketError::Resolve { .. } => libc::EINVAL,
		};
		std::io::Error::new(errno_to_kind(errno), err)
	}
}
