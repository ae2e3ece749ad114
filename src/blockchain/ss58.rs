//! SS58 address encoding.
//!
//! ```text
//! base58( prefix(1 or 2 bytes) ++ account(32) ++ blake2b_512("SS58PRE" ++ prefix ++ account)[..2] )
//! ```

use blake2::{Blake2b512, Digest};

use crate::blockchain::types::{CoreError, CoreResult};

/// Generic Substrate address format.
pub const SUBSTRATE_FORMAT: u16 = 42;

const CHECKSUM_PREFIX: &[u8] = b"SS58PRE";
const CHECKSUM_LEN: usize = 2;
const ACCOUNT_LEN: usize = 32;

fn checksum(data: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut hasher = Blake2b512::new();
    hasher.update(CHECKSUM_PREFIX);
    hasher.update(data);
    let hash = hasher.finalize();
    [hash[0], hash[1]]
}

fn prefix_bytes(format: u16) -> CoreResult<Vec<u8>> {
    match format {
        0..=63 => Ok(vec![format as u8]),
        64..=16_383 => {
            let first = ((format & 0b0000_0000_1111_1100) as u8) >> 2;
            let second = ((format >> 8) as u8) | (((format & 0b0000_0000_0000_0011) as u8) << 6);
            Ok(vec![first | 0b0100_0000, second])
        }
        _ => Err(CoreError::Address(format!("unsupported address format {}", format))),
    }
}

/// Encode a 32-byte account identity as an SS58 string.
pub fn encode(account: &[u8; ACCOUNT_LEN], format: u16) -> CoreResult<String> {
    let mut data = prefix_bytes(format)?;
    data.extend_from_slice(account);
    let check = checksum(&data);
    data.extend_from_slice(&check);
    Ok(bs58::encode(data).into_string())
}

/// Decode an SS58 string into its account identity and address format.
pub fn decode(address: &str) -> CoreResult<([u8; ACCOUNT_LEN], u16)> {
    let data = bs58::decode(address)
        .into_vec()
        .map_err(|e| CoreError::Address(format!("'{}' is not base58: {}", address, e)))?;

    let (prefix_len, format) = match data.first() {
        Some(&b) if b < 64 => (1, b as u16),
        Some(&b) if b < 128 => {
            let second = *data
                .get(1)
                .ok_or_else(|| CoreError::Address(format!("'{}' is truncated", address)))?;
            let lower = ((b << 2) | (second >> 6)) as u16;
            let upper = (second & 0b0011_1111) as u16;
            (2, lower | (upper << 8))
        }
        _ => return Err(CoreError::Address(format!("'{}' has an invalid prefix", address))),
    };

    if data.len() != prefix_len + ACCOUNT_LEN + CHECKSUM_LEN {
        return Err(CoreError::Address(format!(
            "'{}' has length {}, expected {}",
            address,
            data.len(),
            prefix_len + ACCOUNT_LEN + CHECKSUM_LEN
        )));
    }

    let body_len = prefix_len + ACCOUNT_LEN;
    if checksum(&data[..body_len]) != data[body_len..] {
        return Err(CoreError::Address(format!("'{}' has a bad checksum", address)));
    }

    let mut account = [0u8; ACCOUNT_LEN];
    account.copy_from_slice(&data[prefix_len..body_len]);
    Ok((account, format))
}
