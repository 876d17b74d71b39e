//! Commands talking to a single device

use std::error::Error;

use ledger_apdu_core::Executor;
use ledger_cosmos::{CosmosApp, HidDeviceManager};
use tracing::debug;

use crate::utils::{display, parse_hex};

/// List attached devices
pub(crate) fn list_command() -> Result<(), Box<dyn Error>> {
    let manager = HidDeviceManager::new()?;
    let devices = manager.list_devices();

    if devices.is_empty() {
        println!("No Ledger devices found!");
        return Ok(());
    }

    println!("Available devices:");
    for (i, device) in devices.iter().enumerate() {
        println!("{}. {}", i + 1, device);
    }

    Ok(())
}

/// Show the application version
pub(crate) fn version_command<E: Executor>(app: &mut CosmosApp<E>) -> Result<(), Box<dyn Error>> {
    let version = app.get_version()?;

    println!(
        "{}",
        display::key_value_box(
            "Cosmos application",
            vec![
                ("App id", format!("{:#04x}", version.app_id)),
                ("Version", version.to_string()),
            ],
        )
    );
    Ok(())
}

/// Echo data through the device
pub(crate) fn echo_command<E: Executor>(
    app: &mut CosmosApp<E>,
    data: &str,
) -> Result<(), Box<dyn Error>> {
    let message = parse_hex(data)?;
    let echoed = app.echo(&message)?;

    if echoed.len() < message.len() {
        debug!(sent = message.len(), echoed = echoed.len(), "Echo truncated by device");
    }
    println!("{}", hex::encode(&echoed));
    Ok(())
}

/// Hash data on the device
pub(crate) fn hash_command<E: Executor>(
    app: &mut CosmosApp<E>,
    data: &str,
) -> Result<(), Box<dyn Error>> {
    let message = parse_hex(data)?;
    let digest = app.hash(&message)?;

    println!("{}", hex::encode(digest));
    Ok(())
}

/// Show the public key
pub(crate) fn public_key_command<E: Executor>(
    app: &mut CosmosApp<E>,
) -> Result<(), Box<dyn Error>> {
    let key = app.get_public_key()?;

    println!("{}", hex::encode(key.as_bytes()));
    Ok(())
}

/// Sign data and check the signature against the device key
pub(crate) fn sign_command<E: Executor>(
    app: &mut CosmosApp<E>,
    data: &str,
) -> Result<(), Box<dyn Error>> {
    let message = parse_hex(data)?;

    println!("Confirm the signature on the device...");
    let signature = app.sign_quick(&message)?;
    let key = app.get_public_key()?;
    let valid = key.verify(&message, &signature);

    println!(
        "{}",
        display::key_value_box(
            "Signature",
            vec![
                ("DER", hex::encode(signature.as_der())),
                ("Public key", hex::encode(key.as_bytes())),
                ("Verified", valid.to_string()),
            ],
        )
    );

    if !valid {
        return Err("signature does not verify against the device public key".into());
    }
    Ok(())
}
