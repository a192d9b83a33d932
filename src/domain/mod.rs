// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Pure Rust structs and traits that define the core concepts
// of the system.
//
// Rules for this layer:
//   - NO file I/O
//   - NO concrete estimators
//   - Only plain data types and the traits other layers implement
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Labeled tabular data and estimator input
pub mod table;

// Per-dataset summary numbers
pub mod stats;

// Core abstractions (traits) that other layers implement
pub mod traits;
