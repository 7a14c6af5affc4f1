//! Domain model for submitted name/age records.
//!
//! # Responsibility
//! - Define the persisted `Record` shape shared by every adapter.
//! - Turn raw adapter input into a validated `NewRecord`.
//!
//! # Invariants
//! - `(name, age)` identifies a record; the store enforces uniqueness.
//! - Records are created once and never mutated by this system.

pub mod record;
