//! Asteroid field
//!
//! Owns the live asteroids: placement of new ones, vertical movement, and
//! retirement. Placement avoids stacking asteroids on top of each other and
//! simply gives up for this cycle when the field is too crowded.

use glam::Vec2;
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use serde::{Deserialize, Serialize};

use super::config::EngineConfig;
use super::state::Asteroid;

/// Outcome of moving the field down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceResult {
    pub fell_off_screen: bool,
    /// First asteroid (in field order) past the bottom edge
    pub offender: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsteroidField {
    asteroids: Vec<Asteroid>,
    capacity: usize,
    next_id: u32,
}

impl AsteroidField {
    pub fn new(capacity: usize) -> Self {
        Self {
            asteroids: Vec::with_capacity(capacity),
            capacity,
            next_id: 1,
        }
    }

    pub fn asteroids(&self) -> &[Asteroid] {
        &self.asteroids
    }

    pub fn len(&self) -> usize {
        self.asteroids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.asteroids.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.asteroids.len() >= self.capacity
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Asteroid> {
        self.asteroids.get_mut(index)
    }

    /// Retire the asteroid at `index`
    pub fn remove(&mut self, index: usize) -> Asteroid {
        self.asteroids.remove(index)
    }

    /// Place a new asteroid carrying `word`.
    ///
    /// Returns `None` for an empty word, a full field, or when no safe spot
    /// turned up within the configured attempts.
    pub fn spawn<R: Rng>(
        &mut self,
        word: &str,
        config: &EngineConfig,
        rng: &mut R,
    ) -> Option<&Asteroid> {
        if word.is_empty() || self.is_full() {
            return None;
        }
        let Some(x) = find_spawn_x(config.playfield_width, &self.asteroids, config, rng) else {
            log::debug!("No safe spawn position for {:?}, skipping", word);
            return None;
        };

        let id = self.next_id;
        self.next_id += 1;
        self.asteroids
            .push(Asteroid::new(id, word, Vec2::new(x, config.spawn_y)));
        self.asteroids.last()
    }

    /// Move every asteroid down by `delta` and report the first one past
    /// `height`.
    pub fn advance(&mut self, delta: f32, height: f32) -> AdvanceResult {
        for asteroid in &mut self.asteroids {
            asteroid.pos.y += delta;
        }
        let offender = self
            .asteroids
            .iter()
            .find(|a| a.pos.y > height)
            .map(|a| a.id);
        AdvanceResult {
            fell_off_screen: offender.is_some(),
            offender,
        }
    }

    pub fn clear(&mut self) {
        self.asteroids.clear();
    }
}

/// Pick an X for a new asteroid that keeps clear of `existing`
pub fn find_spawn_x<R: Rng>(
    width: f32,
    existing: &[Asteroid],
    config: &EngineConfig,
    rng: &mut R,
) -> Option<f32> {
    for _ in 0..config.spawn_attempts {
        let x = candidate_x(width, existing, config, rng);
        let spawn = Vec2::new(x, config.spawn_y);
        if existing
            .iter()
            .all(|a| a.pos.distance(spawn) > config.min_spawn_distance)
        {
            return Some(x);
        }
    }
    None
}

/// Evenly spaced slot away from live asteroids, or a random X
fn candidate_x<R: Rng>(width: f32, existing: &[Asteroid], config: &EngineConfig, rng: &mut R) -> f32 {
    let slots = (width / config.slot_width).floor().max(0.0) as usize;
    let spacing = width / (slots + 1) as f32;
    let mut xs: Vec<f32> = (1..=slots).map(|i| i as f32 * spacing).collect();
    xs.shuffle(rng);
    xs.retain(|&x| {
        existing
            .iter()
            .all(|a| (x - a.pos.x).abs() > config.min_slot_gap)
    });

    match xs.first() {
        Some(&x) => x,
        None => {
            let (lo, hi) = (config.edge_margin, width - config.edge_margin);
            if hi > lo {
                rng.random_range(lo..=hi)
            } else {
                width / 2.0
            }
        }
    }
}

/// Choose a word for the next asteroid.
///
/// Prefers words that start with a letter no live asteroid is waiting on and
/// that are not already on screen, then any word not on screen, then anything.
pub fn choose_word_for_spawn<'a, S, R>(pool: &'a [S], live: &[Asteroid], rng: &mut R) -> Option<&'a str>
where
    S: AsRef<str>,
    R: Rng,
{
    let on_screen = |word: &str| live.iter().any(|a| a.original_word == word);
    let waiting_letters: Vec<char> = live.iter().filter_map(Asteroid::next_char).collect();

    let distinct: Vec<&str> = pool
        .iter()
        .map(|w| w.as_ref())
        .filter(|&w| {
            !on_screen(w)
                && w.chars()
                    .next()
                    .is_some_and(|c| !waiting_letters.contains(&c))
        })
        .collect();
    if let Some(&word) = distinct.choose(rng) {
        return Some(word);
    }

    let unused: Vec<&str> = pool
        .iter()
        .map(|w| w.as_ref())
        .filter(|&w| !on_screen(w))
        .collect();
    if let Some(&word) = unused.choose(rng) {
        return Some(word);
    }

    pool.choose(rng).map(|w| w.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn test_spawn_sets_word_and_position() {
        let config = EngineConfig::default();
        let mut field = AsteroidField::new(config.max_asteroids);
        let asteroid = field.spawn("comet", &config, &mut rng()).unwrap();
        assert_eq!(asteroid.original_word, "comet");
        assert_eq!(asteroid.remaining, "comet");
        assert_eq!(asteroid.pos.y, config.spawn_y);
        assert!(asteroid.pos.x > 0.0 && asteroid.pos.x < config.playfield_width);
    }

    #[test]
    fn test_spawn_rejects_empty_word() {
        let config = EngineConfig::default();
        let mut field = AsteroidField::new(config.max_asteroids);
        assert!(field.spawn("", &config, &mut rng()).is_none());
        assert!(field.is_empty());
    }

    #[test]
    fn test_spawns_keep_apart() {
        let config = EngineConfig::default();
        let mut field = AsteroidField::new(config.max_asteroids);
        let mut rng = rng();
        for word in ["sun", "ray", "sky", "fly", "zap"] {
            field.spawn(word, &config, &mut rng);
        }
        let live = field.asteroids();
        for (i, a) in live.iter().enumerate() {
            for b in &live[i + 1..] {
                assert!(a.pos.distance(b.pos) > config.min_spawn_distance);
            }
        }
    }

    #[test]
    fn test_spawn_respects_capacity() {
        let config = EngineConfig::default();
        let mut field = AsteroidField::new(2);
        let mut rng = rng();
        assert!(field.spawn("sun", &config, &mut rng).is_some());
        assert!(field.spawn("ray", &config, &mut rng).is_some());
        assert!(field.spawn("sky", &config, &mut rng).is_none());
        assert_eq!(field.len(), 2);
    }

    #[test]
    fn test_crowded_field_skips_spawn() {
        // A 100px playfield has room for a single asteroid
        let config = EngineConfig::with_playfield(100.0, 600.0);
        let mut field = AsteroidField::new(5);
        let mut rng = rng();
        assert!(field.spawn("sun", &config, &mut rng).is_some());
        assert!(field.spawn("ray", &config, &mut rng).is_none());
    }

    #[test]
    fn test_advance_reports_first_offender() {
        let config = EngineConfig::default();
        let mut field = AsteroidField::new(5);
        let mut rng = rng();
        field.spawn("sun", &config, &mut rng);
        field.spawn("ray", &config, &mut rng);
        field.get_mut(0).unwrap().pos.y = 599.0;
        field.get_mut(1).unwrap().pos.y = 598.0;

        let result = field.advance(5.0, 600.0);
        assert!(result.fell_off_screen);
        assert_eq!(result.offender, Some(field.asteroids()[0].id));
        assert_eq!(field.asteroids()[1].pos.y, 603.0);
    }

    #[test]
    fn test_advance_zero_is_noop() {
        let config = EngineConfig::default();
        let mut field = AsteroidField::new(5);
        field.spawn("sun", &config, &mut rng());
        let before = field.asteroids()[0].pos;
        for _ in 0..100 {
            assert!(!field.advance(0.0, 600.0).fell_off_screen);
        }
        assert_eq!(field.asteroids()[0].pos, before);
    }

    #[test]
    fn test_word_choice_avoids_waiting_letters() {
        let live = vec![Asteroid::new(1, "comet", Vec2::ZERO)];
        let pool = ["cargo", "comet", "orbit"];
        let mut rng = rng();
        for _ in 0..20 {
            assert_eq!(choose_word_for_spawn(&pool, &live, &mut rng), Some("orbit"));
        }
    }

    #[test]
    fn test_word_choice_relaxes() {
        let live = vec![Asteroid::new(1, "comet", Vec2::ZERO)];
        let mut rng = rng();
        // Only shared first letters left: avoid the word already on screen
        assert_eq!(
            choose_word_for_spawn(&["comet", "cargo"], &live, &mut rng),
            Some("cargo")
        );
        // Nothing unused: anything goes
        assert_eq!(choose_word_for_spawn(&["comet"], &live, &mut rng), Some("comet"));
        let empty: [&str; 0] = [];
        assert_eq!(choose_word_for_spawn(&empty, &live, &mut rng), None);
    }
}
