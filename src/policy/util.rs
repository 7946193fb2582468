use crate::winsys::geometry::Region;

use std::hash::BuildHasher;
use std::hash::Hasher;

use simplelog::LevelFilter;
use simplelog::SimpleLogger;

/// Hasher for window handles, which are already well distributed.
#[derive(Default)]
pub struct IdHasher {
    state: u64,
}

impl Hasher for IdHasher {
    #[inline]
    fn write(
        &mut self,
        bytes: &[u8],
    ) {
        for &byte in bytes {
            self.state = self.state.rotate_left(8) + u64::from(byte);
        }
    }

    #[inline]
    fn write_u32(
        &mut self,
        value: u32,
    ) {
        self.state = u64::from(value);
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.state
    }
}

#[derive(Default, Clone)]
pub struct BuildIdHasher;

impl BuildHasher for BuildIdHasher {
    type Hasher = IdHasher;

    #[inline]
    fn build_hasher(&self) -> Self::Hasher {
        Self::Hasher {
            state: 0,
        }
    }
}

pub struct Util;

impl Util {
    /// Install a terminal logger at `level`. Installing twice is harmless,
    /// which lets every test call this.
    pub fn init_logging(level: LevelFilter) {
        if SimpleLogger::init(level, simplelog::Config::default()).is_err() {
            trace!("logger already installed");
        }
    }

    /// Index of the region sharing the largest area with `region`, falling
    /// back to the first one.
    pub fn best_overlap(
        regions: &[Region],
        region: Region,
    ) -> Option<usize> {
        regions
            .iter()
            .enumerate()
            .map(|(i, candidate)| {
                let area = candidate
                    .intersection(region)
                    .map_or(0, |overlap| overlap.dim.w as i64 * overlap.dim.h as i64);

                (i, area)
            })
            .fold(None, |best: Option<(usize, i64)>, (i, area)| match best {
                Some((_, best_area)) if best_area >= area => best,
                _ => Some((i, area)),
            })
            .map(|(i, _)| i)
    }

    #[inline]
    pub fn decrement_counter(
        counter: &std::cell::Cell<u32>,
        what: &str,
    ) -> u32 {
        let value = counter.get();

        if value == 0 {
            error!("{} reference count would drop below zero", what);
            debug_assert!(value > 0, "{} reference count underflow", what);
            return 0;
        }

        counter.set(value - 1);
        value - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::HashMap;

    #[test]
    fn id_hasher_keys_windows() {
        let mut map: HashMap<u32, &str, BuildIdHasher> = HashMap::with_hasher(BuildIdHasher);
        map.insert(0x0040_0001, "first");
        map.insert(0x0040_0002, "second");

        assert_eq!(map.get(&0x0040_0001), Some(&"first"));
        assert_eq!(map.get(&0x0040_0002), Some(&"second"));
    }

    #[test]
    fn best_overlap_prefers_largest_area() {
        let outputs = [Region::new(0, 0, 1920, 1080), Region::new(1920, 0, 1280, 1024)];

        assert_eq!(
            Util::best_overlap(&outputs, Region::new(1800, 100, 400, 400)),
            Some(1)
        );
        assert_eq!(
            Util::best_overlap(&outputs, Region::new(5000, 5000, 10, 10)),
            Some(0)
        );
        assert_eq!(Util::best_overlap(&[], Region::new(0, 0, 10, 10)), None);
    }

    #[test]
    fn counters_decrement_to_zero() {
        let counter = Cell::new(2);

        assert_eq!(Util::decrement_counter(&counter, "test"), 1);
        assert_eq!(Util::decrement_counter(&counter, "test"), 0);
    }
}
