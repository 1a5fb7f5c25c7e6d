mod set;

use quickcheck::{Arbitrary, Gen};

/// An enum for the various kinds of "things" to do to
/// an ordered set in a quicktest.
#[derive(Copy, Clone, Debug)]
pub enum Op<T> {
    /// Add the value to the set
    Add(T),
    /// Remove the value from the set
    Remove(T),
    /// Walk the set with a cursor, removing every element the value divides
    Sweep(u8),
}

impl<T> Arbitrary for Op<T>
where
    T: Arbitrary,
{
    /// Tells quickcheck how to randomly choose an operation
    fn arbitrary(g: &mut Gen) -> Self {
        match g.choose(&[0, 1, 2]).unwrap() {
            0 => Op::Add(T::arbitrary(g)),
            1 => Op::Remove(T::arbitrary(g)),
            2 => Op::Sweep(u8::arbitrary(g)),
            _ => unreachable!(),
        }
    }
}
