use bytes::Bytes;
use cryptnox_apdu_core::{CardPresence, CardTransport, FirmwareVersion, TransportError};
use cryptnox_wallet::{
    CardOutcome, CryptnoxWallet, Error, HandshakeConfig, HandshakeState, HandshakeStep,
    KeyGenError, PairingSlot, RandomSource,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// In-memory reader replaying a fixed script of card answers
#[derive(Debug, Default)]
struct ScriptedTransport {
    presence: Option<CardPresence>,
    script: Vec<Result<Bytes, TransportError>>,
    sent: Vec<Bytes>,
    firmware: Option<u32>,
}

impl ScriptedTransport {
    fn iso_dep(script: Vec<Result<Bytes, TransportError>>) -> Self {
        Self {
            presence: Some(CardPresence::IsoDepCapable),
            script,
            ..Default::default()
        }
    }
}

impl CardTransport for ScriptedTransport {
    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        self.sent.push(Bytes::copy_from_slice(command));
        if self.script.is_empty() {
            return Err(TransportError::NoCard);
        }
        self.script.remove(0)
    }

    fn detect_card(&mut self) -> CardPresence {
        self.presence.clone().unwrap_or(CardPresence::None)
    }

    fn firmware_version(&mut self) -> Result<FirmwareVersion, TransportError> {
        self.firmware
            .map(FirmwareVersion::from_u32)
            .ok_or(TransportError::Unsupported("firmware version query"))
    }
}

/// Entropy source stuck at zero; every sampled scalar is invalid
struct ZeroSource;

impl RandomSource for ZeroSource {
    fn fill(&mut self, buffer: &mut [u8]) {
        buffer.fill(0);
    }
}

fn ok(payload: &[u8]) -> Result<Bytes, TransportError> {
    let mut raw = payload.to_vec();
    raw.extend_from_slice(&[0x90, 0x00]);
    Ok(raw.into())
}

fn sw(sw1: u8, sw2: u8) -> Result<Bytes, TransportError> {
    Ok(Bytes::copy_from_slice(&[sw1, sw2]))
}

fn happy_script() -> Vec<Result<Bytes, TransportError>> {
    vec![ok(&[]), ok(&[0xC0, 0xFF, 0xEE]), ok(&[0x55; 32])]
}

#[test]
fn test_full_handshake_reaches_channel_open() {
    let mut transport = ScriptedTransport::iso_dep(happy_script());
    let mut rng = StdRng::seed_from_u64(42);

    let mut wallet = CryptnoxWallet::with_rng(&mut transport, &mut rng);
    let mut channel = wallet.secure_channel();
    let handshake = channel.establish().unwrap();

    assert_eq!(channel.state(), HandshakeState::ChannelOpen);
    assert!(channel.session().selected());
    assert!(channel.session().certificate_challenge_sent());
    assert!(channel.session().channel_open());
    assert!(!channel.session().holds_secrets());
    assert!(channel.session().ephemeral_wiped());
    drop(channel);
    drop(wallet);

    assert_eq!(transport.sent.len(), 3);
    assert_eq!(
        transport.sent[0].as_ref(),
        hex::decode("00A4040007A0000010000112").unwrap()
    );

    let certificate = &transport.sent[1];
    assert_eq!(&certificate[..5], &[0x80, 0xF8, 0x00, 0x00, 0x08]);
    assert_eq!(&certificate[5..], &handshake.certificate.nonce);
    assert_eq!(handshake.certificate.data.as_ref(), &[0xC0, 0xFF, 0xEE]);

    let open = &transport.sent[2];
    assert_eq!(&open[..6], &[0x80, 0x10, 0xFF, 0x00, 0x41, 0x04]);
    assert_eq!(open.len(), 70);
    assert_eq!(&open[5..], &handshake.channel.host_public_key);
    assert_eq!(handshake.channel.card_response.as_ref(), &[0x55; 32]);
    assert_eq!(handshake.channel.pairing_slot, PairingSlot::PukFallback);
}

#[test]
fn test_select_not_found_makes_one_call() {
    let mut transport = ScriptedTransport::iso_dep(vec![sw(0x6A, 0x82)]);
    let mut rng = StdRng::seed_from_u64(1);

    let mut wallet = CryptnoxWallet::with_rng(&mut transport, &mut rng);
    let mut channel = wallet.secure_channel();
    let err = channel.establish().unwrap_err();

    assert_eq!(channel.state(), HandshakeState::Failed);
    assert_eq!(channel.session().failed_step(), Some(HandshakeStep::Select));
    assert!(matches!(
        err,
        Error::Handshake {
            step: HandshakeStep::Select,
            ..
        }
    ));
    assert_eq!(err.status_word().map(|sw| sw.to_u16()), Some(0x6A82));
    drop(channel);
    drop(wallet);

    assert_eq!(transport.sent.len(), 1);
}

#[test]
fn test_card_removed_during_open_clears_secrets() {
    let mut transport = ScriptedTransport::iso_dep(vec![
        ok(&[]),
        ok(&[0x01]),
        Err(TransportError::CardRemoved),
    ]);
    let mut rng = StdRng::seed_from_u64(7);

    let mut wallet = CryptnoxWallet::with_rng(&mut transport, &mut rng);
    let mut channel = wallet.secure_channel();
    channel.select().unwrap();
    channel.request_certificate().unwrap();
    let err = channel.open().unwrap_err();

    assert!(err.is_card_lost());
    assert_eq!(channel.state(), HandshakeState::Failed);
    assert_eq!(
        channel.session().failed_step(),
        Some(HandshakeStep::OpenSecureChannel)
    );
    assert!(!channel.session().holds_secrets());
    assert!(channel.session().ephemeral_wiped());
    assert!(channel.open().is_err());
    drop(channel);
    drop(wallet);

    assert_eq!(transport.sent.len(), 3);
}

#[test]
fn test_dead_entropy_fails_open_without_sending() {
    let mut transport = ScriptedTransport::iso_dep(vec![ok(&[]), ok(&[0x01])]);
    let mut wallet = CryptnoxWallet::with_rng(&mut transport, ZeroSource);
    let mut channel = wallet.secure_channel();
    channel.select().unwrap();
    channel.request_certificate().unwrap();
    let err = channel.open().unwrap_err();

    assert!(matches!(err, Error::KeyGen(KeyGenError::EntropyFailure)));
    assert_eq!(channel.state(), HandshakeState::Failed);
    assert_eq!(
        channel.session().failed_step(),
        Some(HandshakeStep::OpenSecureChannel)
    );
    assert!(!channel.session().holds_secrets());
    drop(channel);
    drop(wallet);

    assert_eq!(transport.sent.len(), 2);
}

#[test]
fn test_certificate_rejection_stops_handshake() {
    let mut transport = ScriptedTransport::iso_dep(vec![ok(&[]), sw(0x69, 0x82)]);
    let mut rng = StdRng::seed_from_u64(3);

    let mut wallet = CryptnoxWallet::with_rng(&mut transport, &mut rng);
    let err = wallet.open_secure_channel().unwrap_err();
    assert!(matches!(
        err,
        Error::Handshake {
            step: HandshakeStep::RequestCertificate,
            ..
        }
    ));
    drop(wallet);

    assert_eq!(transport.sent.len(), 2);
}

#[test]
fn test_truncated_response_is_decode_error() {
    let mut transport = ScriptedTransport::iso_dep(vec![Ok(Bytes::from_static(&[0x90]))]);
    let mut rng = StdRng::seed_from_u64(5);

    let mut wallet = CryptnoxWallet::with_rng(&mut transport, &mut rng);
    let mut channel = wallet.secure_channel();
    let err = channel.select().unwrap_err();

    assert!(matches!(err, Error::Decode(_)));
    assert_eq!(channel.state(), HandshakeState::Failed);
}

#[test]
fn test_out_of_order_step_does_not_touch_transport() {
    let mut transport = ScriptedTransport::iso_dep(happy_script());
    let mut rng = StdRng::seed_from_u64(11);

    let mut wallet = CryptnoxWallet::with_rng(&mut transport, &mut rng);
    let mut channel = wallet.secure_channel();

    let err = channel.open().unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidState {
            step: HandshakeStep::OpenSecureChannel,
            state: HandshakeState::Idle
        }
    ));
    let err = channel.request_certificate().unwrap_err();
    assert!(matches!(err, Error::InvalidState { .. }));
    assert_eq!(channel.state(), HandshakeState::Idle);
    drop(channel);
    drop(wallet);

    assert!(transport.sent.is_empty());
}

#[test]
fn test_retry_uses_fresh_nonce_and_key() {
    let mut script = happy_script();
    script.extend(happy_script());
    let mut transport = ScriptedTransport::iso_dep(script);
    let mut rng = StdRng::seed_from_u64(13);

    let mut wallet = CryptnoxWallet::with_rng(&mut transport, &mut rng);
    let first = wallet.open_secure_channel().unwrap();
    let second = wallet.open_secure_channel().unwrap();

    assert_ne!(first.certificate.nonce, second.certificate.nonce);
    assert_ne!(
        first.channel.host_public_key,
        second.channel.host_public_key
    );
}

#[test]
fn test_paired_slot_from_config() {
    let mut transport = ScriptedTransport::iso_dep(happy_script());
    let mut rng = StdRng::seed_from_u64(17);

    let config = HandshakeConfig::default().with_pairing_slot(PairingSlot::paired(4).unwrap());
    let mut wallet = CryptnoxWallet::with_rng(&mut transport, &mut rng).with_config(config);
    let handshake = wallet.open_secure_channel().unwrap();
    assert_eq!(handshake.channel.pairing_slot, PairingSlot::Paired(4));
    drop(wallet);

    assert_eq!(transport.sent[2][2], 0x04);
}

#[test]
fn test_simple_tag_reports_uid_without_apdus() {
    let uid = Bytes::from_static(&[0x04, 0xA2, 0x3B, 0x11]);
    let mut transport = ScriptedTransport {
        presence: Some(CardPresence::SimpleTag(uid.clone())),
        ..Default::default()
    };

    let mut wallet = CryptnoxWallet::with_rng(&mut transport, StdRng::seed_from_u64(0));
    let outcome = wallet.process_card().unwrap();
    assert_eq!(outcome, CardOutcome::SimpleTag { uid });
    drop(wallet);

    assert!(transport.sent.is_empty());
}

#[test]
fn test_empty_field_is_no_card() {
    let mut wallet =
        CryptnoxWallet::with_rng(ScriptedTransport::default(), StdRng::seed_from_u64(0));
    assert_eq!(wallet.process_card().unwrap(), CardOutcome::NoCard);
    assert!(wallet.transport().sent.is_empty());
}

#[test]
fn test_iso_dep_card_runs_handshake() {
    let mut wallet = CryptnoxWallet::with_rng(
        ScriptedTransport::iso_dep(happy_script()),
        StdRng::seed_from_u64(21),
    );
    let outcome = wallet.process_card().unwrap();
    assert!(matches!(outcome, CardOutcome::SecureChannel(_)));
    assert_eq!(wallet.into_transport().sent.len(), 3);
}

#[test]
fn test_firmware_passthrough() {
    let mut transport = ScriptedTransport {
        firmware: Some(0x3201_0607),
        ..Default::default()
    };
    let mut wallet = CryptnoxWallet::with_rng(&mut transport, StdRng::seed_from_u64(0));
    let firmware = wallet.firmware_version().unwrap();
    assert!(firmware.is_pn532());
    assert_eq!((firmware.major, firmware.minor), (0x01, 0x06));

    let mut wallet =
        CryptnoxWallet::with_rng(ScriptedTransport::default(), StdRng::seed_from_u64(0));
    assert!(matches!(
        wallet.firmware_version(),
        Err(Error::Transport(TransportError::Unsupported(_)))
    ));
}
