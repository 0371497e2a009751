// SPDX-License-Identifier: Apache-2.0

/// A fixed-capacity stack of bits, used to remember whether each open
/// container is an object (`true`) or an array (`false`).
pub trait BitStack {
    /// Number of bits the stack can hold before pushes start losing data.
    const CAPACITY: u8;

    fn default() -> Self;
    /// Pushes a bit (true for 1, false for 0) onto the stack.
    fn push(&mut self, bit: bool);
    /// Pops the top bit off the stack.
    fn pop(&mut self) -> bool;
    /// Returns the top bit without removing it.
    fn top(&self) -> bool;
}

macro_rules! impl_bitstack {
    ($($int_ty:ty),*) => {
        $(
            impl BitStack for $int_ty {
                const CAPACITY: u8 = <$int_ty>::BITS as u8;

                fn default() -> Self {
                    0
                }
                fn push(&mut self, bit: bool) {
                    *self = (*self << 1) | bit as $int_ty;
                }
                fn pop(&mut self) -> bool {
                    let bit = *self & 1 != 0;
                    *self >>= 1;
                    bit
                }
                fn top(&self) -> bool {
                    *self & 1 != 0
                }
            }
        )*
    };
}

impl_bitstack!(u8, u16, u32, u64, u128);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitstack_lifo() {
        let mut stack: u32 = BitStack::default();
        stack.push(true);
        stack.push(false);
        stack.push(true);
        assert!(stack.top());
        assert!(stack.top(), "top() must not modify the stack");
        assert!(stack.pop());
        assert!(!stack.pop());
        assert!(stack.pop());
    }

    #[test]
    fn test_bitstack_capacity() {
        assert_eq!(<u8 as BitStack>::CAPACITY, 8);
        assert_eq!(<u32 as BitStack>::CAPACITY, 32);
        assert_eq!(<u128 as BitStack>::CAPACITY, 128);
    }

    #[test]
    fn test_bitstack_fills_whole_word() {
        let mut stack: u8 = BitStack::default();
        for i in 0..8 {
            stack.push(i % 3 == 0);
        }
        for i in (0..8).rev() {
            assert_eq!(stack.pop(), i % 3 == 0);
        }
    }
}
