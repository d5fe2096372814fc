use std::ffi::CString;

use crate::addr::{Family, FromSockAddr};
use crate::error::SocketError;

/// Resolves `host` (and optionally `service`) to an address of family `F`.
///
/// Candidates are restricted to the caller's socket type and protocol. The
/// FIRST candidate is taken and the rest discarded — there is no fallback to
/// later candidates if the subsequent connect or send fails. This mirrors a
/// deliberate policy: resolution picks one endpoint, the caller's syscall
/// decides its fate.
///
/// Fails with `Resolve` if the resolver returns an error or zero usable
/// candidates.
pub(crate) fn resolve_first<F: Family>(
	host: &str,
	service: Option<&str>,
	socktype: libc::c_int,
	protocol: libc::c_int,
) -> Result<F::Addr, SocketError> {
	let c_host = CString::new(host)
		.map_err(|_| SocketError::InvalidAddress { reason: "embedded nul in host name" })?;
	let c_service = match service {
		Some(s) => Some(CString::new(s).map_err(|_| SocketError::InvalidAddress {
			reason: "embedded nul in service name",
		})?),
		None => None,
	};

	let mut hints: libc::addrinfo = unsafe { std::mem::zeroed() };
	hints.ai_family = F::raw();
	hints.ai_socktype = socktype;
	hints.ai_protocol = protocol;

	let mut result: *mut libc::addrinfo = std::ptr::null_mut();
	let status = unsafe {
		libc::getaddrinfo(
			c_host.as_ptr(),
			c_service.as_ref().map_or(std::ptr::null(), |s| s.as_ptr()),
			&hints,
			&mut result,
		)
	};
	if status != 0 {
		return Err(SocketError::Resolve { code: status, host: host.into() });
	}

	// Walk the list only far enough to find one entry this family can read.
	let mut entry = result;
	let mut addr = None;
	while !entry.is_null() {
		let info = unsafe { &*entry };
		if !info.ai_addr.is_null() {
			addr = unsafe { F::Addr::from_sockaddr(info.ai_addr, info.ai_addrlen) };
			if addr.is_some() {
				break;
			}
		}
		entry = info.ai_next;
	}
	unsafe { libc::freeaddrinfo(result) };

	addr.ok_or(SocketError::Resolve {
		code: libc::EAI_NONAME,
		host: host.into(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::addr::{Ipv4, Ipv6, WithPort};

	#[test]
	fn numeric_host_resolves_to_itself() {
		let addr = resolve_first::<Ipv4>("127.0.0.1", None, libc::SOCK_STREAM, libc::IPPROTO_TCP)
			.unwrap()
			.with_port(4242);
		assert_eq!(addr.ip(), [127, 0, 0, 1]);
		assert_eq!(addr.port(), 4242);
	}

	#[test]
	fn numeric_service_sets_port() {
		let addr =
			resolve_first::<Ipv4>("127.0.0.1", Some("2525"), libc::SOCK_DGRAM, libc::IPPROTO_UDP)
				.unwrap();
		assert_eq!(addr.port(), 2525);
	}

	#[test]
	fn loopback_v6() {
		let addr = resolve_first::<Ipv6>("::1", None, libc::SOCK_STREAM, libc::IPPROTO_TCP).unwrap();
		let mut expected = [0u8; 16];
		expected[15] = 1;
		assert_eq!(addr.ip(), expected);
	}

	#[test]
	fn wrong_family_literal_fails() {
		let err = resolve_first::<Ipv6>("10.0.0.1", None, libc::SOCK_STREAM, libc::IPPROTO_TCP);
		assert!(matches!(err, Err(SocketError::Resolve { .. })));
	}
}
