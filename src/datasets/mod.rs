//! Dataset dispatch and data stores.
//!
//! Every dataset version is served by one [`DatasetHandler`], bound to a
//! genome build and frequency schema. Handlers are collected into a
//! [`DatasetRegistry`] built once at startup and shared by reference.
//!
//! ## Data Files
//!
//! The bundled handler reads variant records from a JSON file (optionally
//! gzip-compressed):
//!
//! ```json
//! {
//!   "version": "1.0.0",
//!   "datasets": [
//!     { "id": "gnomad_r2_1", "variants": [ { "variant_id": "1-100-A-T", "chrom": "1", ... } ] }
//!   ]
//! }
//! ```
//!
//! Precomputed results use a similar file keyed by unordered variant pair;
//! see [`precomputed`].
//!
//! [`DatasetHandler`]: registry::DatasetHandler
//! [`DatasetRegistry`]: registry::DatasetRegistry

pub mod precomputed;
pub mod registry;
pub mod store;
