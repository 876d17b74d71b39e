//! End-to-end checks against a live or emulated device

use std::error::Error;

use ledger_apdu_core::Executor;
use ledger_cosmos::CosmosApp;
use sha2::{Digest, Sha256};

use crate::utils::display;

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 100) as u8).collect()
}

/// Outcome of one check
type Check = Result<(), String>;

fn expect(condition: bool, message: impl FnOnce() -> String) -> Check {
    if condition { Ok(()) } else { Err(message()) }
}

fn check_echo<E: Executor>(app: &mut CosmosApp<E>) -> Check {
    let echoed = app.echo(&[0x56]).map_err(|e| e.to_string())?;
    expect(echoed.as_ref() == [0x56], || {
        format!("echo of one byte returned {}", hex::encode(&echoed))
    })?;

    let message = pattern(500);
    let echoed = app.echo(&message).map_err(|e| e.to_string())?;
    expect(echoed.as_ref() == &message[..64], || {
        format!("echo of 500 bytes returned {} bytes", echoed.len())
    })
}

fn check_hash<E: Executor>(app: &mut CosmosApp<E>) -> Check {
    for message in [vec![0x56, 0x57, 0x58], pattern(600)] {
        let digest = app.hash(&message).map_err(|e| e.to_string())?;
        expect(digest.as_slice() == Sha256::digest(&message).as_slice(), || {
            format!("hash of {} bytes does not match SHA-256", message.len())
        })?;
    }
    Ok(())
}

fn check_version<E: Executor>(app: &mut CosmosApp<E>) -> Check {
    let version = app.get_version().map_err(|e| e.to_string())?;
    println!("  version {version} (app id {:#04x})", version.app_id);
    Ok(())
}

fn check_sign<E: Executor>(app: &mut CosmosApp<E>) -> Check {
    let key = app.get_public_key().map_err(|e| e.to_string())?;

    for len in [1, 10, 205, 510] {
        let message = pattern(len);
        let signature = app.sign_quick(&message).map_err(|e| e.to_string())?;
        expect(key.verify(&message, &signature), || {
            format!("signature over {len} bytes does not verify")
        })?;
    }
    Ok(())
}

/// Run every check and report each outcome
pub(crate) fn self_test_command<E: Executor>(
    app: &mut CosmosApp<E>,
) -> Result<(), Box<dyn Error>> {
    let checks: [(&str, fn(&mut CosmosApp<E>) -> Check); 4] = [
        ("version", check_version),
        ("echo", check_echo),
        ("hash", check_hash),
        ("sign and verify", check_sign),
    ];

    println!("{}", display::section_title("Self test"));

    let mut failed = 0;
    for (name, check) in checks {
        match check(app) {
            Ok(()) => println!("{}", display::success(name)),
            Err(reason) => {
                failed += 1;
                println!("{}: {reason}", display::check_failed(name));
            }
        }
    }

    if failed > 0 {
        return Err(format!("{failed} of {} checks failed", checks.len()).into());
    }
    Ok(())
}
