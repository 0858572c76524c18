use sha2::{Digest, Sha256};

/// Header fields that feed the block digest, in canonical order.
#[derive(Debug, Clone, Copy)]
pub struct HeaderFields<'a> {
    pub index: u64,
    pub previous_hash: &'a str,
    pub timestamp: i64,
    pub data: &'a str,
    pub miner: &'a str,
    pub difficulty: u32,
    pub nonce: u64,
}

/// SHA-256 over the concatenated header fields, hex encoded (lowercase).
pub fn digest(header: &HeaderFields<'_>) -> String {
    let preimage = format!(
        "{}{}{}{}{}{}{}",
        header.index,
        header.previous_hash,
        header.timestamp,
        header.data,
        header.miner,
        header.difficulty,
        header.nonce
    );
    let mut hasher = Sha256::new();
    hasher.update(preimage.as_bytes());
    hex::encode(hasher.finalize())
}

/// True when the first `difficulty` hex characters of `hash` are all '0'.
/// A hash shorter than `difficulty` never qualifies.
pub fn meets_difficulty(hash: &str, difficulty: u32) -> bool {
    let difficulty = difficulty as usize;
    hash.len() >= difficulty && hash.bytes().take(difficulty).all(|c| c == b'0')
}
