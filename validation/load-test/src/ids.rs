//! Random game/user id generation.

use rand::prelude::*;
use session_common::RegisterRequest;
use std::sync::Mutex;

/// Ids are drawn from `0..DEFAULT_ID_RANGE` unless configured otherwise.
pub const DEFAULT_ID_RANGE: u32 = 100;

/// Draw an id uniformly from `0..max_exclusive`.
///
/// Panics if `max_exclusive` is zero.
pub fn random_id<R: Rng + ?Sized>(rng: &mut R, max_exclusive: u32) -> u32 {
    rng.gen_range(0..max_exclusive)
}

/// Shared id source for all hooks.
///
/// A pair is drawn under a single lock, so concurrent callers each get
/// their own `(game_id, user_id)` and never half of someone else's.
pub struct IdGenerator {
    rng: Mutex<StdRng>,
    max_exclusive: u32,
}

impl IdGenerator {
    /// Create a generator. `max_exclusive` of zero is treated as one.
    pub fn new(seed: Option<u64>, max_exclusive: u32) -> Self {
        // Use seed if provided for reproducible tests, otherwise use entropy
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            rng: Mutex::new(rng),
            max_exclusive: max_exclusive.max(1),
        }
    }

    pub fn max_exclusive(&self) -> u32 {
        self.max_exclusive
    }

    /// Draw a single id.
    pub fn next_id(&self) -> u32 {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        random_id(&mut *rng, self.max_exclusive)
    }

    /// Draw an independent `(game_id, user_id)` pair.
    pub fn next_pair(&self) -> (u32, u32) {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        let game_id = random_id(&mut *rng, self.max_exclusive);
        let user_id = random_id(&mut *rng, self.max_exclusive);
        (game_id, user_id)
    }

    /// Build a fresh registration request.
    pub fn next_request(&self) -> RegisterRequest {
        let (game_id, user_id) = self.next_pair();
        RegisterRequest::new(game_id, user_id)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(None, DEFAULT_ID_RANGE)
    }
}
