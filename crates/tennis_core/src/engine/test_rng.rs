//! Generators with fixed output for forcing draws in tests.

use rand::{Error, RngCore, SeedableRng};

/// Every draw is just below 1.0, so Q takes every point with `probP < 1`.
pub struct HighDraws;

/// Every draw is 0.0, so P takes every point with `probP > 0`.
pub struct ZeroDraws;

macro_rules! constant_rng {
    ($name:ident, $word:expr) => {
        impl RngCore for $name {
            fn next_u32(&mut self) -> u32 {
                $word as u32
            }

            fn next_u64(&mut self) -> u64 {
                $word
            }

            fn fill_bytes(&mut self, dest: &mut [u8]) {
                dest.fill($word as u8);
            }

            fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
                self.fill_bytes(dest);
                Ok(())
            }
        }

        impl SeedableRng for $name {
            type Seed = [u8; 8];

            fn from_seed(_seed: Self::Seed) -> Self {
                $name
            }
        }
    };
}

constant_rng!(HighDraws, u64::MAX);
constant_rng!(ZeroDraws, 0u64);

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_draw_bounds() {
        let high: f64 = HighDraws::seed_from_u64(1).gen();
        let zero: f64 = ZeroDraws::seed_from_u64(1).gen();
        assert!(high > 0.999 && high < 1.0);
        assert_eq!(zero, 0.0);
    }
}
