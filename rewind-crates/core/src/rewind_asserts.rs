//! Leveled assertions. Contract violations (popping the root world, consuming a delta monitor out
//! of sequence, ...) are checked at the simple level, which is always on. The `debug-checks`
//! feature raises the level to extreme, which enables exhaustive consistency checks that re-derive
//! cached state from scratch.

#[cfg(not(feature = "debug-checks"))]
pub(crate) const REWIND_ASSERT_LEVEL_DEFINITION: u8 = REWIND_ASSERT_SIMPLE;
#[cfg(feature = "debug-checks")]
pub(crate) const REWIND_ASSERT_LEVEL_DEFINITION: u8 = REWIND_ASSERT_EXTREME;

pub(crate) const REWIND_ASSERT_SIMPLE: u8 = 1;
pub(crate) const REWIND_ASSERT_MODERATE: u8 = 2;
pub(crate) const REWIND_ASSERT_ADVANCED: u8 = 3;
pub(crate) const REWIND_ASSERT_EXTREME: u8 = 4;

macro_rules! print_rewind_assert_warning_message {
    () => {
        if $crate::rewind_asserts::REWIND_ASSERT_LEVEL_DEFINITION >= $crate::rewind_asserts::REWIND_ASSERT_MODERATE {
            log::warn!("Potential performance degradation: the rewind assert level is set to {}, meaning many debug asserts are active which may result in performance degradation.", $crate::rewind_asserts::REWIND_ASSERT_LEVEL_DEFINITION);
        };
    };
}

macro_rules! rewind_assert_simple {
    ($($arg:tt)*) => {
        if $crate::rewind_asserts::REWIND_ASSERT_LEVEL_DEFINITION >= $crate::rewind_asserts::REWIND_ASSERT_SIMPLE {
            assert!($($arg)*);
        }
    };
}

macro_rules! rewind_assert_eq_simple {
    ($($arg:tt)*) => {
        if $crate::rewind_asserts::REWIND_ASSERT_LEVEL_DEFINITION >= $crate::rewind_asserts::REWIND_ASSERT_SIMPLE {
            assert_eq!($($arg)*);
        }
    };
}

macro_rules! rewind_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::rewind_asserts::REWIND_ASSERT_LEVEL_DEFINITION >= $crate::rewind_asserts::REWIND_ASSERT_MODERATE {
            assert!($($arg)*);
        }
    };
}

macro_rules! rewind_assert_advanced {
    ($($arg:tt)*) => {
        if $crate::rewind_asserts::REWIND_ASSERT_LEVEL_DEFINITION >= $crate::rewind_asserts::REWIND_ASSERT_ADVANCED {
            assert!($($arg)*);
        }
    };
}

macro_rules! rewind_assert_extreme {
    ($($arg:tt)*) => {
        if $crate::rewind_asserts::REWIND_ASSERT_LEVEL_DEFINITION >= $crate::rewind_asserts::REWIND_ASSERT_EXTREME {
            assert!($($arg)*);
        }
    };
}

pub(crate) use print_rewind_assert_warning_message;
pub(crate) use rewind_assert_advanced;
pub(crate) use rewind_assert_eq_simple;
pub(crate) use rewind_assert_extreme;
pub(crate) use rewind_assert_moderate;
pub(crate) use rewind_assert_simple;
