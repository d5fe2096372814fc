use std::os::fd::RawFd;

use crate::error::{SocketError, errno};

const INVALID: RawFd = -1;

/// An exclusively-owned socket descriptor.
///
/// Exactly one `Handle` refers to a live descriptor at any time: the type is
/// move-only, so transferring ownership can never leave two owners behind.
/// Dropping a live handle closes it exactly once; a handle consumed by
/// [`Handle::close`] or [`Handle::into_raw`] is inert at drop.
#[derive(Debug)]
pub struct Handle {
	fd: RawFd,
}

impl Handle {
	/// Wraps an already-open descriptor, e.g. the result of `accept4()`.
	///
	/// Fails with `InvalidHandle` if `fd` is the invalid sentinel.
	pub(crate) fn from_raw(fd: RawFd) -> Result<Self, SocketError> {
		if fd < 0 {
			return Err(SocketError::InvalidHandle);
		}
		Ok(Self { fd })
	}

	/// Returns the raw descriptor without transferring ownership.
	#[inline]
	pub fn raw(&self) -> RawFd {
		self.fd
	}

	/// Closes the descriptor, reporting failure.
	///
	/// This is the only path on which a failed `close()` is observable;
	/// scope-exit release is best-effort (see `Drop`).
	pub fn close(mut self) -> Result<(), SocketError> {
		let fd = self.fd;
		self.fd = INVALID;
		if unsafe { libc::close(fd) } == -1 {
			return Err(SocketError::Close { errno: errno() });
		}
		Ok(())
	}

	/// Releases ownership of the descriptor without closing it.
	pub(crate) fn into_raw(mut self) -> RawFd {
		let fd = self.fd;
		self.fd = INVALID;
		fd
	}
}

impl Drop for Handle {
	fn drop(&mut self) {
		if self.fd == INVALID {
			return;
		}
		// A destructor has no clean error path, so a failing close is
		// logged and swallowed. Callers who must observe the failure use
		// the explicit close().
		if unsafe { libc::close(self.fd) } == -1 {
			log::warn!("close({}) failed at drop: errno {}", self.fd, errno());
		}
	}
}

impl std::os::fd::AsRawFd for Handle {
	fn as_raw_fd(&self) -> RawFd {
		self.fd
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn test_fd() -> RawFd {
		let fd = unsafe { libc::socket(libc::AF_INET, libc::SOCK_DGRAM, 0) };
		assert!(fd >= 0);
		fd
	}

	fn fd_is_open(fd: RawFd) -> bool {
		unsafe { libc::fcntl(fd, libc::F_GETFD) != -1 }
	}

	#[test]
	fn from_raw_rejects_sentinel() {
		assert!(matches!(
			Handle::from_raw(-1),
			Err(SocketError::InvalidHandle)
		));
	}

	#[test]
	fn drop_closes_once() {
		let fd = test_fd();
		{
			let handle = Handle::from_raw(fd).unwrap();
			assert_eq!(handle.raw(), fd);
			assert!(fd_is_open(fd));
		}
		assert!(!fd_is_open(fd));
	}

	#[test]
	fn moves_transfer_ownership_without_closing() {
		let fd = test_fd();
		let a = Handle::from_raw(fd).unwrap();
		let b = a;
		let mut v = vec![b];
		let c = v.pop().unwrap();
		assert!(fd_is_open(fd));
		drop(c);
		assert!(!fd_is_open(fd));
	}

	#[test]
	fn explicit_close_reports_and_disarms_drop() {
		let fd = test_fd();
		let handle = Handle::from_raw(fd).unwrap();
		handle.close().unwrap();
		assert!(!fd_is_open(fd));
	}

	#[test]
	fn into_raw_releases_without_closing() {
		let fd = test_fd();
		let handle = Handle::from_raw(fd).unwrap();
		let released = handle.into_raw();
		assert_eq!(released, fd);
		assert!(fd_is_open(fd));
		unsafe { libc::close(fd) };
	}
}
