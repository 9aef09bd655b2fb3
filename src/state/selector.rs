use rand::Rng;

use crate::state::game::Track;

/// Strategy picking which unplayed track is drawn next.
pub trait TrackSelector: Send + Sync {
    /// Return the index of the chosen track, or `None` when nothing fits.
    fn select(&self, pool: &[Track]) -> Option<usize>;
}

/// Uniform random pick over the whole pool.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomTrack;

impl TrackSelector for RandomTrack {
    fn select(&self, pool: &[Track]) -> Option<usize> {
        if pool.is_empty() {
            return None;
        }
        Some(rand::rng().random_range(0..pool.len()))
    }
}

/// Pick a specific track by its identifier.
#[derive(Debug, Clone)]
pub struct TrackById(pub String);

impl TrackSelector for TrackById {
    fn select(&self, pool: &[Track]) -> Option<usize> {
        pool.iter().position(|track| track.id == self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::game::tests::tracks;

    #[test]
    fn random_stays_in_bounds() {
        let pool = tracks(3);
        for _ in 0..100 {
            let index = RandomTrack.select(&pool).unwrap();
            assert!(index < 3);
        }
    }

    #[test]
    fn random_on_empty_pool_selects_nothing() {
        assert_eq!(RandomTrack.select(&[]), None);
    }

    #[test]
    fn by_id_finds_exact_track() {
        let pool = tracks(5);
        assert_eq!(TrackById("track003".into()).select(&pool), Some(3));
        assert_eq!(TrackById("missing".into()).select(&pool), None);
    }
}
