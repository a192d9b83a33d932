// ============================================================
// Layer 2 - Application / Use Cases
// ============================================================
// This layer orchestrates the other layers to accomplish one
// goal per use case.
//
// Rules for this layer:
//   - No printing here (that's Layer 1)
//   - No CSV parsing or model math (Layers 4 and 5)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Baseline preprocessing (optionally writing processed CSVs)
pub mod preprocess_use_case;

// Summary statistics over the processed datasets
pub mod stats_use_case;
