//! Tick Math
//!
//! Conversions between tick indices and Q64.64 square-root prices.
//! price(tick) = 1.0001^tick, sqrt_price_x64 = sqrt(price) * 2^64.

use crate::constants::ticks::{MAX_SQRT_PRICE_X64, MAX_TICK, MIN_SQRT_PRICE_X64, MIN_TICK};

/// 2^64 / sqrt(1.0001)^(2^i) for bit i of |tick|, as the on-chain program
/// rounds them
const BIT_MULTIPLIERS: [u128; 19] = [
    0xfffcb933bd6fb800,
    0xfff97272373d4000,
    0xfff2e50f5f657000,
    0xffe5caca7e10f000,
    0xffcb9843d60f7000,
    0xff973b41fa98e800,
    0xff2ea16466c9b000,
    0xfe5dee046a9a3800,
    0xfcbe86c7900bb000,
    0xf987a7253ac65800,
    0xf3392b0822bb6000,
    0xe7159475a2caf000,
    0xd097f3bdfd2f2000,
    0xa9f746462d9f8000,
    0x70d869a156f31c00,
    0x31be135f97ed3200,
    0x9aa508b5b85a500,
    0x5d6af8dedc582c,
    0x2216e584f5fa,
];

/// Q64.64 square-root price at `tick`, or `None` outside the tick range
pub fn get_sqrt_price_at_tick(tick: i32) -> Option<u128> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return None;
    }
    let abs_tick = tick.unsigned_abs();

    let mut ratio: u128 = if abs_tick & 1 != 0 {
        BIT_MULTIPLIERS[0]
    } else {
        1u128 << 64
    };
    for (bit, multiplier) in BIT_MULTIPLIERS.iter().enumerate().skip(1) {
        if abs_tick & (1 << bit) != 0 {
            // both factors are at most 2^64
            ratio = (ratio * multiplier) >> 64;
        }
    }

    if tick > 0 {
        ratio = u128::MAX / ratio;
    }
    Some(ratio)
}

/// Greatest tick whose square-root price does not exceed `sqrt_price_x64`
pub fn get_tick_at_sqrt_price(sqrt_price_x64: u128) -> Option<i32> {
    if !(MIN_SQRT_PRICE_X64..MAX_SQRT_PRICE_X64).contains(&sqrt_price_x64) {
        return None;
    }
    let (mut low, mut high) = (MIN_TICK, MAX_TICK);
    while low < high {
        let mid = low + (high - low + 1) / 2;
        match get_sqrt_price_at_tick(mid) {
            Some(price) if price <= sqrt_price_x64 => low = mid,
            _ => high = mid - 1,
        }
    }
    Some(low)
}
