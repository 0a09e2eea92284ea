//! Shared types for the fcsim module host.
//!
//! Everything in here describes the contract with the sandboxed module and is
//! independent of the runtime that executes it:
//!
//! - [`abi`] - names of the functions the module exports and imports
//! - [`input`] - the engine input code space
//! - [`layout`] - binary layout of records staged in module memory
//! - [`constants`] - platform limits

pub mod abi;
pub mod constants;
pub mod input;
pub mod layout;

pub use constants::{DEFAULT_RAM_LIMIT, WASM_PAGE_SIZE};
pub use layout::{ArenaDef, BlockDef, BlockKind, LayoutError, Rect};
