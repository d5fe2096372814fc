use sockline::{FromText, SocketAddrV4, SocketAddrV6, SocketError, WithPort};

#[test]
fn v4_text_round_trip() {
	let addr = SocketAddrV4::from_text("192.168.1.1", 8080).unwrap();
	assert_eq!(addr.ip(), [192, 168, 1, 1]);
	assert_eq!(addr.port(), 8080);
}

#[test]
fn v4_loopback_and_wildcard() {
	assert_eq!(
		SocketAddrV4::from_text("127.0.0.1", 0).unwrap().ip(),
		[127, 0, 0, 1]
	);
	assert_eq!(
		SocketAddrV4::from_text("0.0.0.0", 53).unwrap().ip(),
		[0, 0, 0, 0]
	);
}

#[test]
fn v6_text_round_trip() {
	let addr = SocketAddrV6::from_text("::1", 443).unwrap();
	let mut expected = [0u8; 16];
	expected[15] = 1;
	assert_eq!(addr.ip(), expected);
	assert_eq!(addr.port(), 443);
	assert_eq!(addr.scope_id(), 0);
}

#[test]
fn v6_full_form() {
	let addr = SocketAddrV6::from_text("2001:db8::7", 80).unwrap();
	assert_eq!(addr.ip()[0], 0x20);
	assert_eq!(addr.ip()[1], 0x01);
	assert_eq!(addr.ip()[15], 0x07);
}

#[test]
fn invalid_v4_texts_are_rejected() {
	for text in ["", "256.0.0.1", "1.2.3", "1.2.3.4.5", "::1", "host.example", "1.2.3.4 "] {
		let result = SocketAddrV4::from_text(text, 80);
		assert!(
			matches!(result, Err(SocketError::InvalidAddress { .. })),
			"expected InvalidAddress for {:?}",
			text
		);
	}
}

#[test]
fn invalid_v6_texts_are_rejected() {
	for text in ["", "1.2.3.4", ":::", "2001:db8::g", "fe80::1%eth0"] {
		let result = SocketAddrV6::from_text(text, 80);
		assert!(
			matches!(result, Err(SocketError::InvalidAddress { .. })),
			"expected InvalidAddress for {:?}",
			text
		);
	}
}

#[test]
fn with_port_returns_new_value() {
	let addr = SocketAddrV4::new([10, 0, 0, 1], 80);
	let moved = addr.with_port(8080);
	assert_eq!(moved.port(), 8080);
	assert_eq!(moved.ip(), addr.ip());
	// addr is Copy; the original is unchanged.
	assert_eq!(addr.port(), 80);
}

#[test]
fn display_formats() {
	let v4 = SocketAddrV4::new([127, 0, 0, 1], 80);
	assert_eq!(v4.to_string(), "127.0.0.1:80");

	let v6 = SocketAddrV6::from_text("::1", 443).unwrap();
	assert_eq!(v6.to_string(), "[::1]:443");
}

#[test]
fn value_semantics() {
	let a = SocketAddrV4::new([1, 2, 3, 4], 5);
	let b = a;
	assert_eq!(a, b);
	assert_ne!(a, a.with_port(6));
	assert_ne!(a, SocketAddrV4::new([1, 2, 3, 5], 5));
}
