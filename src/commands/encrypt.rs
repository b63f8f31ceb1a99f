//! `rollout encrypt`

use std::io::Read;

use anyhow::{bail, Context, Result};
use rollout::presentation::factory::create_cipher;

use super::GlobalFlags;
use crate::ui::json;

pub fn cmd_encrypt(flags: GlobalFlags) -> Result<()> {
    let secret = read_secret(&mut std::io::stdin().lock())?;
    if secret.is_empty() {
        bail!("nothing to encrypt: pipe the password on stdin");
    }

    let ciphertext = create_cipher().encrypt(&secret)?;
    if flags.json {
        json::emit(serde_json::json!({
            "event": "encrypted",
            "command": "encrypt",
            "ciphertext": ciphertext,
        }));
    } else {
        println!("{}", ciphertext);
    }
    Ok(())
}

/// First line of the input without its line ending
pub(crate) fn read_secret(input: &mut impl Read) -> Result<String> {
    let mut raw = String::new();
    input
        .read_to_string(&mut raw)
        .context("could not read the secret from stdin")?;
    Ok(raw.lines().next().unwrap_or_default().to_string())
}
