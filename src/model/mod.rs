//src/model/mod.rs
pub mod elements;
pub mod records;
pub mod structure;

// Re-exports for cleaner imports
pub use elements::{covalent_radius, element_colors, ElementColors};
pub use records::{AtomRecord, CellValue, Column, RecordSet};
pub use structure::{Atom, ModelAtom, ModelBond, MolecularModel, Molecule};
