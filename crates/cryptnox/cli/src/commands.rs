//! Subcommand handlers

use std::io::{self, BufRead, Write};

use cryptnox_wallet::PairingKey;
use zeroize::Zeroizing;

use crate::display;

/// Print the pairing key derived from `puk`, prompting on stdin when absent
pub(crate) fn derive_pairing_key_command(puk: Option<String>) -> anyhow::Result<()> {
    let puk = match puk {
        Some(puk) => Zeroizing::new(puk),
        None => read_puk(io::stdin().lock())?,
    };
    let key = PairingKey::from_puk(puk.trim().as_bytes());
    let encoded = Zeroizing::new(hex::encode(key.as_bytes()));

    println!(
        "{}",
        display::key_value_box("Pairing key", vec![("Key", encoded.to_string())])
    );
    println!("{}", display::warning("Keep this key secret"));
    Ok(())
}

fn read_puk(mut input: impl BufRead) -> anyhow::Result<Zeroizing<String>> {
    eprint!("PUK: ");
    io::stderr().flush()?;

    let mut line = Zeroizing::new(String::new());
    input.read_line(&mut line)?;
    if line.trim().is_empty() {
        anyhow::bail!("no PUK given");
    }
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_puk_from_input() {
        let puk = read_puk(&b"123456789012\n"[..]).unwrap();
        assert_eq!(puk.trim(), "123456789012");
        assert!(read_puk(&b"\n"[..]).is_err());
    }
}

#[cfg(feature = "pcsc")]
pub(crate) use with_reader::*;

#[cfg(feature = "pcsc")]
mod with_reader {
    use cryptnox_wallet::{CardOutcome, CryptnoxWallet, HandshakeConfig};
    use tracing::info;

    use crate::display;
    use crate::smartcard::{PcscTransport, list_readers};

    /// List available readers
    pub(crate) fn list_command() -> anyhow::Result<()> {
        let readers = list_readers()?;
        if readers.is_empty() {
            println!("{}", display::warning("No readers found!"));
            return Ok(());
        }

        println!("Available readers:");
        for (i, (name, has_card)) in readers.iter().enumerate() {
            let status = if *has_card { "card present" } else { "no card" };
            println!("{}. {} ({})", i + 1, name, status);
        }
        Ok(())
    }

    /// Process the card in the field
    pub(crate) fn process_card_command(
        transport: PcscTransport,
        config: HandshakeConfig,
    ) -> anyhow::Result<()> {
        info!(reader = %transport.reader_name().to_string_lossy(), "Processing card");
        let mut wallet = CryptnoxWallet::new(transport).with_config(config);

        match wallet.process_card()? {
            CardOutcome::NoCard => println!("{}", display::warning("No card in field")),
            CardOutcome::SimpleTag { uid } => println!(
                "{}",
                display::key_value_box(
                    "Simple tag",
                    vec![
                        ("UID", hex::encode_upper(&uid)),
                        ("UID length", uid.len().to_string()),
                    ]
                )
            ),
            CardOutcome::SecureChannel(handshake) => {
                println!("{}", display::success("Secure channel opened"));
                println!(
                    "{}",
                    display::key_value_box(
                        "Handshake",
                        vec![
                            ("Pairing slot", handshake.channel.pairing_slot.to_string()),
                            ("Nonce", hex::encode_upper(handshake.certificate.nonce)),
                            (
                                "Certificate",
                                format!("{} bytes", handshake.certificate.data.len())
                            ),
                            (
                                "Host public key",
                                hex::encode_upper(handshake.channel.host_public_key)
                            ),
                            (
                                "Card response",
                                hex::encode_upper(&handshake.channel.card_response)
                            ),
                        ]
                    )
                );
            }
        }
        Ok(())
    }

    /// Show the reader chip firmware
    pub(crate) fn firmware_command(transport: PcscTransport) -> anyhow::Result<()> {
        let mut wallet = CryptnoxWallet::new(transport);
        let firmware = wallet.firmware_version()?;
        if !firmware.is_pn532() {
            println!("{}", display::warning("Reader chip is not a PN532"));
        }
        println!("{}", firmware);
        Ok(())
    }
}
