use sockline::{Ipv4, Ipv6, SocketError, UdpSocket};

fn bound() -> (UdpSocket<Ipv4>, u16) {
	let sock = UdpSocket::<Ipv4>::new().unwrap();
	sock.bind("127.0.0.1", 0).unwrap();
	let port = sock.local_addr().unwrap().port();
	assert_ne!(port, 0);
	(sock, port)
}

#[test]
fn send_to_and_recv_from_report_the_sender() {
	let (receiver, _) = bound();
	let (sender, _) = bound();
	let dest = receiver.local_addr().unwrap();

	assert_eq!(sender.send_to(b"ping", &dest).unwrap(), 4);

	let mut buf = [0u8; 64];
	let (len, from) = receiver.recv_from(&mut buf).unwrap();
	assert_eq!(len, 4);
	assert_eq!(&buf[..len], b"ping");
	assert_eq!(from, sender.local_addr().unwrap());
}

#[test]
fn send_to_host_resolves_then_sends() {
	let (receiver, port) = bound();
	let (sender, _) = bound();

	assert_eq!(sender.send_to_host(b"named", "127.0.0.1", port).unwrap(), 5);

	let mut buf = [0u8; 64];
	let (len, _) = receiver.recv_from(&mut buf).unwrap();
	assert_eq!(&buf[..len], b"named");
}

#[test]
fn connected_datagrams_use_the_default_peer() {
	let (a, a_port) = bound();
	let (b, _) = bound();

	b.connect("127.0.0.1", a_port).unwrap();
	assert_eq!(b.peer_addr().unwrap(), a.local_addr().unwrap());

	assert_eq!(b.send(b"to-a").unwrap(), 4);
	let mut buf = [0u8; 64];
	let (len, from) = a.recv_from(&mut buf).unwrap();
	assert_eq!(&buf[..len], b"to-a");
	assert_eq!(from, b.local_addr().unwrap());

	// Reply lands on the connected socket's plain recv.
	a.send_to(b"to-b", &from).unwrap();
	let len = b.recv(&mut buf).unwrap();
	assert_eq!(&buf[..len], b"to-b");
}

#[test]
fn connect_by_service_name() {
	let (a, a_port) = bound();
	let (b, _) = bound();

	b.connect_service("127.0.0.1", &a_port.to_string()).unwrap();
	b.send(b"svc").unwrap();

	let mut buf = [0u8; 8];
	let (len, _) = a.recv_from(&mut buf).unwrap();
	assert_eq!(&buf[..len], b"svc");
}

#[test]
fn send_without_peer_needs_a_destination() {
	let sock = UdpSocket::<Ipv4>::new().unwrap();
	match sock.send(b"nowhere") {
		Err(SocketError::Send { errno }) => assert_eq!(errno, libc::EDESTADDRREQ),
		other => panic!("expected Send(EDESTADDRREQ), got {:?}", other),
	}
}

#[test]
fn broadcast_round_trip() {
	let sock = UdpSocket::<Ipv4>::new().unwrap();
	assert!(!sock.broadcast().unwrap());
	sock.set_broadcast(true).unwrap();
	assert!(sock.broadcast().unwrap());
	sock.set_broadcast(false).unwrap();
	assert!(!sock.broadcast().unwrap());
}

#[test]
fn introspection_reports_datagram_type() {
	let sock = UdpSocket::<Ipv4>::new().unwrap();
	assert_eq!(sock.socket_type().unwrap(), libc::SOCK_DGRAM);
	assert_eq!(sock.last_error().unwrap(), 0);
}

#[test]
fn bind_rejects_wrong_family_text() {
	let sock = UdpSocket::<Ipv4>::new().unwrap();
	assert!(matches!(
		sock.bind("::1", 0),
		Err(SocketError::InvalidAddress { .. })
	));
}

#[test]
fn v6_datagram_round_trip() {
	let a = UdpSocket::<Ipv6>::new().unwrap();
	a.bind("::1", 0).unwrap();
	let b = UdpSocket::<Ipv6>::new().unwrap();
	b.bind("::1", 0).unwrap();

	let dest = a.local_addr().unwrap();
	b.send_to(b"six", &dest).unwrap();

	let mut buf = [0u8; 8];
	let (len, from) = a.recv_from(&mut buf).unwrap();
	assert_eq!(&buf[..len], b"six");
	assert_eq!(from, b.local_addr().unwrap());
}

#[test]
fn explicit_close_is_observable() {
	let (sock, _) = bound();
	sock.close().unwrap();
}
