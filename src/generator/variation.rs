//! Weighted room-variation selection.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::settings::MazeSettings;

/// Pick an index into `weights` with probability proportional to the weight.
///
/// Uses a cumulative-weight table and a single uniform draw, so the outcome
/// sequence is fully determined by the RNG stream.
pub fn pick_weighted(weights: &[u32], rng: &mut ChaCha8Rng) -> usize {
    let mut cumulative = Vec::with_capacity(weights.len());
    // Widened so that any accepted u32 weight table sums without overflow.
    let mut total: u64 = 0;
    for &w in weights {
        total += u64::from(w);
        cumulative.push(total);
    }
    if total == 0 {
        return 0;
    }

    let draw = rng.gen_range(0..total);
    cumulative
        .iter()
        .position(|&c| c > draw)
        .unwrap_or(weights.len() - 1)
}

/// The room variant the next cell should be built from.
///
/// The example room is used when configured, or as the fallback when no
/// variations are supplied; a single variation skips the weighted draw.
pub fn select_room_variant<'a>(settings: &'a MazeSettings, rng: &mut ChaCha8Rng) -> &'a str {
    if settings.use_example_room || settings.room_variations.is_empty() {
        return &settings.example_room;
    }
    if settings.room_variations.len() == 1 {
        return &settings.room_variations[0];
    }
    let index = pick_weighted(&settings.variation_weights, rng);
    &settings.room_variations[index]
}
