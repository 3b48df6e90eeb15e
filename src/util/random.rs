use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

use crate::core::types::{AntiForgeryState, AttemptId};

pub trait FromRandom {
    fn from_random() -> Self;
}

impl FromRandom for AntiForgeryState {
    fn from_random() -> Self {
        AntiForgeryState(random_string(32))
    }
}

impl FromRandom for AttemptId {
    fn from_random() -> Self {
        AttemptId(random_string(32))
    }
}

/// `size` bytes from the thread-local CSPRNG, URL-safe base64 encoded.
fn random_string(size: usize) -> String {
    use rand::RngCore;

    let mut bytes = vec![0u8; size];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
