// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

/// Stable per-address value that drives every synthetic estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AddressSeed(u32);

impl AddressSeed {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// `(seed * factor) % modulus`, computed without overflow.
    pub const fn scaled_index(self, factor: u64, modulus: usize) -> usize {
        ((self.0 as u64 * factor) % modulus as u64) as usize
    }
}

impl From<u32> for AddressSeed {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Polynomial hash over UTF-16 code units (`hash * 31 + unit`) with 32-bit
/// two's-complement wraparound, then the absolute value. `i32::MIN` maps to
/// 2^31, which is why the seed is unsigned.
pub fn address_seed(address: &str) -> AddressSeed {
    let hash = address.encode_utf16().fold(0_i32, |hash, unit| {
        hash.wrapping_mul(31).wrapping_add(i32::from(unit))
    });
    AddressSeed(hash.unsigned_abs())
}
