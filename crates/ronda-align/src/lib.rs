//! Alignment engine for mixed-frequency tables.
//!
//! Tables in a snapshot are sampled at different frequencies and cover
//! different symbols. Before two of them can be compared or combined they are
//! put on a shared grid:
//! - **time**: the sorted union of both indices, each input read as of its
//!   most recent observation at or before the row (never a later one)
//! - **symbols**: the intersection, in the left operand's column order
//!
//! An empty intersection is not an error; it produces a zero-column result
//! that simply yields no candidates.
//!
//! # Example
//!
//! ```rust
//! use ronda_align::{CompareOp, compare};
//! use ronda_traits::{Date, Frequency, Table};
//!
//! let d = |day| Date::from_ymd_opt(2024, 1, day).unwrap();
//! let close = Table::from_columns(
//!     Frequency::Daily,
//!     "TWD",
//!     vec![d(2), d(3)],
//!     vec![("X".to_string(), vec![100.0, 110.0])],
//! )
//! .unwrap();
//! let level = close.map("TWD", |_| 105.0);
//!
//! let above = compare(&close, CompareOp::Gt, &level).unwrap();
//! assert_eq!(above.candidates_as_of(d(3)), vec!["X"]);
//! ```

mod align;
mod engine;
mod ops;

pub use align::{Alignment, as_of_rows, union_index};
pub use engine::{all, and, any, arith, compare, not, or};
pub use ops::{ArithOp, CompareOp};
