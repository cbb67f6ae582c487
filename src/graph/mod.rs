//! In-memory joins for the nested resource views.
//!
//! A view is loaded as flat row sets ([`load_rows`]), indexed by id and by
//! foreign key, then walked root-first by [`GraphAssembler`].

pub mod assembler;
pub mod index;
pub mod junction;
pub mod policy;
pub mod rows;
pub mod views;

pub use assembler::GraphAssembler;
pub use policy::{ViewKind, ViewPolicy};
pub use rows::{load_patch_rows, load_rows, RowSets};
pub use views::*;
