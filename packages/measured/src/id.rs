use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::RngCore;

/// Entropy behind every generated identifier: 256 bits.
const ID_ENTROPY_BYTES: usize = 32;

/// Generates a fresh correlation identifier.
///
/// The identifier is 32 bytes from a cryptographically secure generator, encoded as standard
/// padded base64. Collisions between identifiers that are live at the same time are negligibly
/// likely, even across threads.
///
/// # Example
///
/// ```
/// let a = measured::generate_id();
/// let b = measured::generate_id();
///
/// assert_eq!(a.len(), 44);
/// assert_ne!(a, b);
/// ```
#[must_use]
pub fn generate_id() -> String {
    let mut bytes = [0_u8; ID_ENTROPY_BYTES];
    rand::rng().fill_bytes(&mut bytes);

    STANDARD.encode(bytes)
}
