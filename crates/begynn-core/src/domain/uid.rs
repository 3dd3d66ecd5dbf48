//! Installation identifier generation.
//!
//! Identifiers use the UUID version 4 text layout:
//!
//! ```text
//! xxxxxxxx-xxxx-4xxx-yxxx-xxxxxxxxxxxx      y ∈ {8, 9, a, b}
//! ```
//!
//! The 16 random bytes come from the operating system's secure random source
//! when it is available.  If that source fails (sandboxed or early-boot
//! environments), the bytes come from a fast non-cryptographic generator
//! instead.  The identifier only names an installation for analytics, so the
//! weaker fallback is accepted; the layout is identical either way.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::{OsRng, SmallRng};
use rand::{RngCore, SeedableRng};
use tracing::warn;
use uuid::Builder;

/// Mixed into the fallback seed so two fallbacks in the same nanosecond differ.
static FALLBACK_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generates a new installation identifier from the OS random source.
pub fn generate_uid() -> String {
    generate_uid_from(&mut OsRng)
}

/// Generates an identifier from `secure`, falling back to a non-cryptographic
/// generator if `secure` reports a failure.
pub fn generate_uid_from<R: RngCore + ?Sized>(secure: &mut R) -> String {
    let mut bytes = [0u8; 16];

    if let Err(e) = secure.try_fill_bytes(&mut bytes) {
        warn!("secure random source unavailable ({e}); using non-cryptographic fallback");
        SmallRng::seed_from_u64(fallback_seed()).fill_bytes(&mut bytes);
    }

    // `from_random_bytes` stamps the version nibble (4) and the RFC 4122
    // variant bits (10xx), which yields the `4xxx-yxxx` groups.
    Builder::from_random_bytes(bytes)
        .into_uuid()
        .hyphenated()
        .to_string()
}

fn fallback_seed() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    let pid = u64::from(std::process::id());
    let count = FALLBACK_COUNTER.fetch_add(1, Ordering::Relaxed);

    nanos ^ pid.rotate_left(32) ^ count.wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
