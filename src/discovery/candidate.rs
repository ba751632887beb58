//! Random candidate identifiers and the paste URLs built from them
//!
//! Identifiers are drawn uniformly from an alphabet. Each 63-bit draw from
//! the random source is split into several fixed-width indexes, so a five
//! character identifier over `[a-z0-9]` usually costs a single draw.

use crate::config::{validate_alphabet, ID_PLACEHOLDER};
use crate::ConfigError;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::fmt;
use std::sync::Mutex;

/// Number of index bits needed to address an alphabet of `len` characters
fn index_bits(len: usize) -> u32 {
    if len <= 1 {
        1
    } else {
        usize::BITS - (len - 1).leading_zeros()
    }
}

/// Generates a string of exactly `length` characters drawn from `alphabet`
///
/// Indexes that fall outside the alphabet are discarded rather than
/// wrapped, which keeps the distribution uniform for alphabet sizes that
/// are not powers of two. An empty alphabet yields an empty string.
///
/// # Example
///
/// ```
/// use paste_trawler::discovery::generate_id;
/// use rand::SeedableRng;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(1);
/// let id = generate_id(&mut rng, 5, b"abcdefghijklmnopqrstuvwxyz0123456789");
/// assert_eq!(id.len(), 5);
/// ```
pub fn generate_id<R: RngCore + ?Sized>(rng: &mut R, length: usize, alphabet: &[u8]) -> String {
    if alphabet.is_empty() {
        return String::new();
    }

    let bits = index_bits(alphabet.len());
    let mask = (1u64 << bits) - 1;
    let per_draw = 63 / bits;

    let mut out = String::with_capacity(length);
    let mut cache = rng.next_u64() >> 1;
    let mut remain = per_draw;

    while out.len() < length {
        if remain == 0 {
            cache = rng.next_u64() >> 1;
            remain = per_draw;
        }
        let idx = (cache & mask) as usize;
        if idx < alphabet.len() {
            out.push(char::from(alphabet[idx]));
        }
        cache >>= bits;
        remain -= 1;
    }

    out
}

/// Thread-safe identifier source shared by every probe task
pub struct CandidateGenerator {
    alphabet: Vec<u8>,
    rng: Mutex<StdRng>,
}

impl CandidateGenerator {
    /// Creates a generator seeded from OS entropy
    pub fn new(alphabet: &str) -> Result<Self, ConfigError> {
        validate_alphabet(alphabet)?;
        Ok(Self {
            alphabet: alphabet.as_bytes().to_vec(),
            rng: Mutex::new(StdRng::from_entropy()),
        })
    }

    /// Creates a generator with a fixed seed (reproducible sequences)
    pub fn with_seed(alphabet: &str, seed: u64) -> Result<Self, ConfigError> {
        validate_alphabet(alphabet)?;
        Ok(Self {
            alphabet: alphabet.as_bytes().to_vec(),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        })
    }

    /// Generates one identifier of `length` characters
    pub fn generate(&self, length: usize) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        generate_id(&mut *rng, length, &self.alphabet)
    }

    pub fn alphabet(&self) -> &str {
        // Validated ASCII at construction
        std::str::from_utf8(&self.alphabet).unwrap_or_default()
    }
}

/// A probe target: a generated identifier embedded in the paste URL template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateUrl {
    id: String,
    url: String,
}

impl CandidateUrl {
    /// Substitutes `id` for the `{id}` placeholder in `template`
    pub fn from_template(template: &str, id: String) -> Self {
        let url = template.replace(ID_PLACEHOLDER, &id);
        Self { id, url }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for CandidateUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}
