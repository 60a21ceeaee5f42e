//! HTTP API for co-occurrence queries.
//!
//! ## Starting the Server
//!
//! ```text
//! # Start on default port 8080
//! variant-cooccurrence serve --data variants.json
//!
//! # Custom port
//! variant-cooccurrence serve --data variants.json --port 3000
//!
//! # Bind to all interfaces
//! variant-cooccurrence serve --data variants.json --address 0.0.0.0
//! ```
//!
//! ## API Endpoints
//!
//! - `GET /api/cooccurrence?variants=A,B&dataset=ID` - Compute co-occurrence
//! - `POST /api/cooccurrence` - Same, with a JSON body `{variant_ids, dataset}`
//! - `GET /api/datasets` - List loaded datasets
//! - `GET /api/health` - Liveness check

pub mod server;
