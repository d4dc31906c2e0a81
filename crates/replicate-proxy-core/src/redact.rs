//! Credential masking for logs.
//!
//! Pattern: the raw credential goes to the backend and nowhere else; logs get
//! a masked form that is enough to tell two keys apart.

const VISIBLE_EDGE: usize = 4;

/// Mask a credential, keeping at most four characters at each end.
///
/// Anything too short to keep a hidden middle of at least four characters is
/// masked entirely.
pub fn mask_credential(credential: &str) -> String {
    let chars: Vec<char> = credential.chars().collect();
    if chars.len() < VISIBLE_EDGE * 3 {
        return "*".repeat(chars.len().max(VISIBLE_EDGE));
    }
    let head: String = chars[..VISIBLE_EDGE].iter().collect();
    let tail: String = chars[chars.len() - VISIBLE_EDGE..].iter().collect();
    format!("{}...{}", head, tail)
}
