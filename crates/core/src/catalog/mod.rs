//! Static reference tables used by the generators.
//!
//! Everything here is fixed data: weighted distributions, vocabularies and
//! age-bucketed physiologic ranges. Age-dependent tables are ordered lists of
//! [`AgeBand`]s resolved by [`band_for`].

pub mod demographics;
pub mod departments;
pub mod diagnoses;
pub mod imaging;
pub mod labs;
pub mod medications;
pub mod vitals;

pub use departments::Department;
pub use imaging::StudyType;
pub use labs::LabTest;

/// A contiguous, inclusive age range mapped to a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgeBand<T> {
    pub min_age: u32,
    pub max_age: u32,
    pub value: T,
}

impl<T> AgeBand<T> {
    pub const fn new(min_age: u32, max_age: u32, value: T) -> Self {
        Self {
            min_age,
            max_age,
            value,
        }
    }

    pub fn contains(&self, age: u32) -> bool {
        self.min_age <= age && age <= self.max_age
    }
}

/// First band containing `age`, if any.
pub fn band_for<T>(bands: &[AgeBand<T>], age: u32) -> Option<&T> {
    bands.iter().find(|b| b.contains(age)).map(|b| &b.value)
}
