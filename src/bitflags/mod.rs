/// Declares a `u8` newtype with one constant per flag, assigned bits in
/// declaration order starting at bit 0.
#[macro_export]
macro_rules! bitflags {
    ($(#[$meta:meta])* $vis:vis $name:ident [$($Flag:ident),*]) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
        $vis struct $name(u8);

        impl $name {
            $crate::bitflags!(@step 0usize, $($Flag,)*);

            pub const COUNT: usize = [$(stringify!($Flag)),*].len();
            pub const EMPTY: $name = $name(0);
            pub const ALL: $name = $name(((1u16 << Self::COUNT) - 1) as u8);

            /// Keeps only the bits that name a declared flag.
            pub const fn from_bits_truncate(bits: u8) -> Self {
                Self(bits & Self::ALL.0)
            }

            pub const fn bits(self) -> u8 {
                self.0
            }

            pub const fn is_empty(self) -> bool {
                self.0 == 0
            }

            pub const fn contains(self, other: Self) -> bool {
                (self.0 & other.0) == other.0
            }

            pub const fn union(self, other: Self) -> Self {
                Self(self.0 | other.0)
            }

            pub fn insert(&mut self, other: Self) {
                self.0 |= other.0;
            }

            pub fn remove(&mut self, other: Self) {
                self.0 &= !other.0;
            }

            pub fn toggle(&mut self, other: Self) {
                self.0 ^= other.0;
            }
        }

        impl ::std::ops::BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                self.union(rhs)
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}({:#07b})", stringify!($name), self.0)
            }
        }
    };
    (@step $idx:expr, $head:ident, $($tail:ident,)*) => {
        pub const $head: Self = Self(0x1 << $idx);

        $crate::bitflags!(@step $idx + 1usize, $($tail,)*);
    };
    (@step $_idx:expr,) => {};
    () => {};
}
