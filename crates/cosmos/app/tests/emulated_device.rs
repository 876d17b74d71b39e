//! End-to-end scenarios against the software device

use ledger_cosmos::emulator::{Emulator, EmulatorConfig};
use ledger_cosmos::{CosmosApp, Error, ExchangeConfig, FramedExecutor, InstructionSet, Version, verify};
use sha2::{Digest, Sha256};

fn app() -> CosmosApp<FramedExecutor<Emulator>> {
    CosmosApp::emulated(EmulatorConfig::default()).unwrap()
}

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 100) as u8).collect()
}

#[test]
fn test_get_version() {
    let mut app = app();
    let version = app.get_version().unwrap();

    assert_eq!(version, Version::new(0x55, 0, 0, 4));
    assert_eq!(version.to_string(), "0.0.4");
}

#[test]
fn test_echo_single_byte() {
    let mut app = app();
    assert_eq!(app.echo(&[0x56]).unwrap().as_ref(), &[0x56]);
}

#[test]
fn test_echo_is_capped_at_64_bytes() {
    let mut app = app();
    let message = pattern(500);

    let echoed = app.echo(&message).unwrap();
    assert_eq!(echoed.as_ref(), &message[..64]);

    for len in [63, 64, 65] {
        let message = pattern(len);
        let echoed = app.echo(&message).unwrap();
        assert_eq!(echoed.as_ref(), &message[..len.min(64)], "length {len}");
    }
}

#[test]
fn test_hash() {
    let mut app = app();

    let message = [0x56, 0x57, 0x58];
    assert_eq!(app.hash(&message).unwrap().as_slice(), Sha256::digest(message).as_slice());

    for len in [250, 251, 600, 5000] {
        let message = pattern(len);
        assert_eq!(
            app.hash(&message).unwrap().as_slice(),
            Sha256::digest(&message).as_slice(),
            "length {len}"
        );
    }
}

#[test]
fn test_public_key() {
    let mut app = app();
    let key = app.get_public_key().unwrap();

    assert_eq!(key.as_bytes().len(), 65);
    assert_eq!(key[0], 0x04);
    assert!(key.to_verifying_key().is_ok());
    assert_eq!(key, app.executor().transport().public_key());
}

#[test]
fn test_sign_and_verify() {
    let mut app = app();
    let public_key = app.get_public_key().unwrap();

    for len in [1, 10, 205, 510] {
        let message = pattern(len);
        let signature = app.sign_quick(&message).unwrap();

        assert!(
            verify(&message, signature.as_der(), public_key.as_bytes()),
            "length {len}"
        );
        assert!(public_key.verify(&message, &signature));
        assert!(!public_key.verify(&pattern(len + 1), &signature));
    }
}

#[test]
fn test_signature_verifies_with_k256() {
    use k256::ecdsa::signature::hazmat::PrehashVerifier;

    let mut app = app();
    let message = b"k256 reference";
    let key = app.get_public_key().unwrap().to_verifying_key().unwrap();
    let signature = app.sign_quick(message).unwrap().to_ecdsa().unwrap();

    assert!(key.verify_prehash(&Sha256::digest(message), &signature).is_ok());
}

#[test]
fn test_user_rejection() {
    let mut app = CosmosApp::emulated(EmulatorConfig::default().with_reject_signing(true)).unwrap();

    let err = app.sign_quick(&pattern(300)).unwrap_err();
    assert!(err.is_user_rejected());
    assert_eq!(err.status_word().map(u16::from), Some(0x6985));
}

#[test]
fn test_transport_loss_during_sign() {
    let emulator = Emulator::baseline().unwrap().disconnect_after(6);
    let mut app = CosmosApp::from_transport(emulator);

    let err = app.sign_quick(&pattern(510)).unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}

#[test]
fn test_wrong_application() {
    // Emulated device runs an app with another class byte
    let config = EmulatorConfig::default().with_instructions(InstructionSet::default().with_cla(0xE0));
    let emulator = Emulator::new(config).unwrap();
    let mut app = CosmosApp::from_transport(emulator);

    let err = app.get_version().unwrap_err();
    assert!(err.status_word().unwrap().is_class_not_supported());
}

#[test]
fn test_custom_instruction_table() {
    let instructions = InstructionSet {
        echo: 0x70,
        ..InstructionSet::default()
    };
    let config = EmulatorConfig::default().with_instructions(instructions);
    let mut app = CosmosApp::emulated(config).unwrap();
    assert_eq!(app.instructions().echo, 0x70);

    assert_eq!(app.echo(&[0x01, 0x02]).unwrap().as_ref(), &[0x01, 0x02]);
}

#[test]
fn test_timeout_when_device_is_silent() {
    use std::time::Duration;

    // A channel the device does not answer on
    let config = ExchangeConfig::default()
        .with_timeout(Duration::from_millis(20))
        .with_channel(0x0202);
    let mut app = CosmosApp::from_transport_with_config(Emulator::baseline().unwrap(), config);

    let err = app.get_version().unwrap_err();
    assert!(err.is_timeout());
}

#[test]
fn test_unbounded_timeout() {
    use std::time::Duration;

    let config = ExchangeConfig::default().with_timeout(Duration::MAX);
    let mut app = CosmosApp::from_transport_with_config(Emulator::baseline().unwrap(), config);

    assert_eq!(app.get_version().unwrap(), Version::new(0x55, 0, 0, 4));
}

#[test]
fn test_reuse_after_failed_sequence() {
    let mut app = app();

    let too_large = vec![0u8; ledger_cosmos::MAX_MESSAGE_LEN + 1];
    assert!(matches!(app.hash(&too_large), Err(Error::MessageTooLarge { .. })));

    // A later sequence starts from a clean state
    assert_eq!(app.echo(&[0x56]).unwrap().as_ref(), &[0x56]);
}
