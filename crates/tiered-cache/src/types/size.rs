//! Payload size estimation.

use std::mem::size_of;
use std::sync::Arc;

/// Estimated heap + inline footprint of a cached value, in bytes.
///
/// Estimates only; used for memory accounting and the `TtlCache` byte budget.
pub trait MemorySize {
    fn memory_size(&self) -> usize;
}

impl MemorySize for String {
    fn memory_size(&self) -> usize {
        size_of::<String>() + self.capacity()
    }
}

impl MemorySize for str {
    fn memory_size(&self) -> usize {
        self.len()
    }
}

impl<T> MemorySize for Vec<T> {
    fn memory_size(&self) -> usize {
        size_of::<Vec<T>>() + self.capacity() * size_of::<T>()
    }
}

impl<T> MemorySize for [T] {
    fn memory_size(&self) -> usize {
        std::mem::size_of_val(self)
    }
}

impl<T: MemorySize + ?Sized> MemorySize for Box<T> {
    fn memory_size(&self) -> usize {
        size_of::<Box<T>>() + (**self).memory_size()
    }
}

/// Shared payloads are charged in full to every cache holding them.
impl<T: MemorySize + ?Sized> MemorySize for Arc<T> {
    fn memory_size(&self) -> usize {
        size_of::<Arc<T>>() + (**self).memory_size()
    }
}

impl<T: MemorySize> MemorySize for Option<T> {
    fn memory_size(&self) -> usize {
        match self {
            Some(value) => value.memory_size(),
            None => size_of::<Option<T>>(),
        }
    }
}

macro_rules! inline_memory_size {
    ($($ty:ty),* $(,)?) => {
        $(
            impl MemorySize for $ty {
                fn memory_size(&self) -> usize {
                    size_of::<$ty>()
                }
            }
        )*
    };
}

inline_memory_size!(bool, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, char, ());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_counts_capacity() {
        let v: Vec<f32> = Vec::with_capacity(256);
        assert_eq!(v.memory_size(), size_of::<Vec<f32>>() + 256 * 4);
    }

    #[test]
    fn test_string_and_arc() {
        let s = String::from("hello");
        assert!(s.memory_size() >= size_of::<String>() + 5);

        let shared: Arc<str> = Arc::from("hello");
        assert_eq!(shared.memory_size(), size_of::<Arc<str>>() + 5);
    }

    #[test]
    fn test_primitives_are_inline() {
        assert_eq!(7u64.memory_size(), 8);
        assert_eq!(1.0f32.memory_size(), 4);
        assert_eq!(().memory_size(), 0);
    }
}
