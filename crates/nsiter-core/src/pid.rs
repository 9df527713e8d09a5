//! PID/TID representation constraint
//!
//! The kernel's `pid_t` is an `int`, so the kernel hands out 32 bit PID and
//! TID numbers even on 64 bit architectures (`/proc/sys/kernel/pid_max` caps
//! them at 2^22). Any integer type of at least 32 bits, signed or unsigned,
//! can thus hold them.
//!
//! Value space:
//! - positive: a real PID/TID
//! - zero: no PID (or the idle task, depending on context)
//! - negative: an error marker
//!
//! Conversions are bit-pattern casts through a 64 bit intermediate, never
//! range checked. A `-1` widened into a `u64` becomes `0xffff_ffff_ffff_ffff`
//! and turns back into `-1` once narrowed to a 32 bit signed type again.
//! [`RawPid`] is only involved at the kernel boundary.

use core::fmt::Debug;
use core::hash::Hash;

/// PID/TID as written by the kernel side.
pub type RawPid = libc::pid_t;

/// Integer types able to represent Linux PIDs and TIDs.
pub trait Pid: Copy + Eq + Hash + Debug {
    /// Reinterpret a kernel PID number as `Self`.
    fn from_raw(raw: RawPid) -> Self;

    /// Reinterpret `self` as a kernel PID number.
    fn to_raw(self) -> RawPid;

    /// Bit pattern of `self`, sign-extended for signed types.
    fn to_bits(self) -> u64;

    /// Reinterpret (truncating) a bit pattern as `Self`.
    fn from_bits(bits: u64) -> Self;

    /// True for real PIDs/TIDs, false for the zero and negative sentinels.
    #[inline]
    fn is_valid(self) -> bool {
        self.to_raw() > 0
    }

    /// Convert into another PID representation.
    #[inline]
    fn convert<Q: Pid>(self) -> Q {
        Q::from_bits(self.to_bits())
    }
}

/// Implement [`Pid`] for primitive integers, or with a leading `newtype`
/// for tuple structs wrapping one, using plain `as` casts.
#[macro_export]
macro_rules! impl_pid {
    (newtype $($t:ident($inner:ty)),* $(,)?) => {
        $(
            impl $crate::pid::Pid for $t {
                #[inline]
                fn from_raw(raw: $crate::pid::RawPid) -> Self {
                    $t(raw as $inner)
                }

                #[inline]
                fn to_raw(self) -> $crate::pid::RawPid {
                    self.0 as $crate::pid::RawPid
                }

                #[inline]
                fn to_bits(self) -> u64 {
                    self.0 as u64
                }

                #[inline]
                fn from_bits(bits: u64) -> Self {
                    $t(bits as $inner)
                }
            }
        )*
    };
    ($($t:ty),* $(,)?) => {
        $(
            impl $crate::pid::Pid for $t {
                #[inline]
                fn from_raw(raw: $crate::pid::RawPid) -> Self {
                    raw as $t
                }

                #[inline]
                fn to_raw(self) -> $crate::pid::RawPid {
                    self as $crate::pid::RawPid
                }

                #[inline]
                fn to_bits(self) -> u64 {
                    self as u64
                }

                #[inline]
                fn from_bits(bits: u64) -> Self {
                    bits as $t
                }
            }
        )*
    };
}

impl_pid!(i32, i64, u32, u64);

#[cfg(any(target_pointer_width = "32", target_pointer_width = "64"))]
impl_pid!(isize, usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    struct TaskNr(u32);

    impl_pid!(newtype TaskNr(u32));

    #[test]
    fn test_forth_and_back() {
        let p = TaskNr(0x420001);
        assert_eq!(p.to_raw(), 0x420001);
        assert_eq!(i64::from_raw(p.to_raw()), 0x420001);
        assert_eq!(u64::from_raw(-1).to_raw(), -1);
    }

    #[test]
    fn test_round_trip_through_any_width() {
        for raw in [0, -1, 1, 42, RawPid::MAX, RawPid::MIN] {
            assert_eq!(raw.convert::<u64>().convert::<i32>(), raw);
            assert_eq!(raw.convert::<u32>().convert::<i64>().convert::<i32>(), raw);
            assert_eq!(raw.convert::<usize>().convert::<isize>().convert::<i32>(), raw);
        }
        let unsigned: u32 = 0xffff_ffff;
        assert_eq!(unsigned.convert::<i64>().convert::<u32>(), unsigned);
        assert_eq!(unsigned.convert::<u64>().convert::<u32>(), unsigned);
    }

    #[test]
    fn test_wide_round_trip_keeps_bits() {
        let marker: u64 = 0xffff_ffff;
        assert_eq!(marker.convert::<i64>(), 0xffff_ffff);
        assert_eq!(marker.convert::<i64>().convert::<u64>(), marker);
        assert_eq!(u64::MAX.convert::<u64>(), u64::MAX);
        assert_eq!(marker.convert::<u64>(), marker);

        let big: i64 = 0x1_0000_0007;
        assert_eq!(big.convert::<u64>().convert::<i64>(), big);
        assert_eq!((-5i64).convert::<usize>().convert::<i64>(), -5);
        assert_eq!(i64::MIN.convert::<i64>(), i64::MIN);
        assert_eq!(TaskNr(u32::MAX).convert::<TaskNr>(), TaskNr(u32::MAX));
    }

    #[test]
    fn test_narrowing_truncates_like_as() {
        assert_eq!(0x1_0000_0007u64.convert::<u32>(), 7);
        assert_eq!((-1i64).convert::<i32>(), -1);
        assert_eq!(u64::MAX.convert::<u32>(), u32::MAX);
    }

    #[test]
    fn test_negative_marker_widens_as_bit_pattern() {
        assert_eq!(u64::from_raw(-1), u64::MAX);
        assert_eq!(u32::from_raw(-1), u32::MAX);
        assert_eq!(i64::from_raw(-1), -1);
    }

    #[test]
    fn test_validity() {
        assert!(1u32.is_valid());
        assert!(TaskNr(7).is_valid());
        assert!(!0i64.is_valid());
        assert!(!(-1i32).is_valid());
        assert!(!u64::from_raw(-1).is_valid());
    }
}
