#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// Checked allocation failures.
pub mod error;

/// Integer hash functions used to pick probe start slots.
///
/// This module provides the reference `hash_int` mixer, the `IntHasher`
/// trait the table is generic over, and the hashers implementing it.
pub mod hash;

/// The open-addressing `i32 -> i32` table.
///
/// This module provides `IntTable`, its default capacity constants, and the
/// optional probe statistics behind the `stats` feature.
pub mod int_table;

pub use error::AllocError;
pub use hash::IntHasher;
pub use int_table::IntTable;
