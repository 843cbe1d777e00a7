//! Extensions for numbers that are not present in the stable standard library.

pub(crate) trait NumExt {
    /// Division with rounding towards positive infinity. Call it as `NumExt::div_ceil(a, b)`, the
    /// inherent method on signed integers is unstable.
    fn div_ceil(self, other: Self) -> Self;

    /// Convert to an `i32`, saturating at its bounds.
    fn saturating_to_i32(self) -> i32;
}

impl NumExt for i64 {
    fn div_ceil(self, other: Self) -> Self {
        let d = self / other;
        let r = self % other;
        if (r > 0 && other > 0) || (r < 0 && other < 0) {
            d + 1
        } else {
            d
        }
    }

    fn saturating_to_i32(self) -> i32 {
        i32::try_from(self).unwrap_or(if self < 0 { i32::MIN } else { i32::MAX })
    }
}
