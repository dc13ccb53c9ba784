//! Reflection-loss compensation of S21 sweeps exported by network analyzers.
//!
//! The [`data`] module holds the whole pipeline; the desktop viewer and the
//! headless `s21-compensate` binary are thin adapters around it.

pub mod data;
