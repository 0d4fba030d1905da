//! Single-use session keys.
//!
//! Binding a session stores `"<port>:<secret>"` under its checksum. The
//! client presents the secret on the session port; a matching entry is
//! removed as it is accepted, so every key authenticates exactly once.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::ops::RangeInclusive;

use rand::Rng;
use rand::distr::Alphanumeric;
use tokio::sync::Mutex;
use tracing::debug;

/// Allowed secret lengths.
pub const SECRET_LEN: RangeInclusive<usize> = 24..=48;

/// Additive checksum: the sum of the character codes plus the length.
///
/// Cheap and deterministic, but collisions are easy to find, so stored
/// entries are always compared in full as well.
///
/// # Examples
///
/// ```
/// use transit_server::server::checksum;
///
/// assert_eq!(checksum("ab"), 97 + 98 + 2);
/// assert_eq!(checksum(""), 0);
/// ```
pub fn checksum(input: &str) -> u64 {
    let (sum, len) = input
        .chars()
        .fold((0u64, 0u64), |(sum, len), c| (sum + u64::from(c), len + 1));
    sum + len
}

/// Table of outstanding session keys, shared by the rendezvous listener and
/// every session.
#[derive(Debug, Default)]
pub struct SessionKeys {
    keys: Mutex<HashMap<u64, String>>,
}

impl SessionKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate and store a secret for `port`, returning the secret.
    pub async fn issue(&self, port: u16) -> String {
        let mut keys = self.keys.lock().await;
        insert_fresh(&mut keys, port, &mut rand::rng())
    }

    /// As [`SessionKeys::issue`], drawing secrets from `rng`.
    pub async fn issue_with<R: Rng>(&self, port: u16, rng: &mut R) -> String {
        let mut keys = self.keys.lock().await;
        insert_fresh(&mut keys, port, rng)
    }

    /// Check `secret` against the key issued for `port`, consuming it on a
    /// match.
    pub async fn redeem(&self, port: u16, secret: &str) -> bool {
        let entry = format!("{port}:{secret}");
        let key = checksum(&entry);

        let mut keys = self.keys.lock().await;
        if keys.get(&key).is_some_and(|stored| *stored == entry) {
            keys.remove(&key);
            true
        } else {
            false
        }
    }

    /// Number of keys issued but not yet redeemed.
    pub async fn len(&self) -> usize {
        self.keys.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.keys.lock().await.is_empty()
    }
}

/// Store a new secret for `port`, regenerating it until its checksum is
/// unused.
fn insert_fresh<R: Rng>(keys: &mut HashMap<u64, String>, port: u16, rng: &mut R) -> String {
    loop {
        let secret = generate_secret(rng);
        let entry = format!("{port}:{secret}");
        match keys.entry(checksum(&entry)) {
            Entry::Vacant(slot) => {
                slot.insert(entry);
                return secret;
            }
            Entry::Occupied(_) => debug!(port, "Session key checksum collided, regenerating"),
        }
    }
}

fn generate_secret<R: Rng>(rng: &mut R) -> String {
    let len = rng.random_range(SECRET_LEN);
    (0..len).map(|_| char::from(rng.sample(Alphanumeric))).collect()
}
