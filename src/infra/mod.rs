// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// Cross-cutting concerns that don't belong in any business layer:
//
//   model_store.rs - per-user model persistence
//                    Maps (username, model_name) to a JSON bundle
//                    under an explicitly configured root.
//
//   config.rs      - where data and models live
//                    Defaults, optional JSON file, env overrides.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Per-user model bundle persistence
pub mod model_store;

/// Data and model directory configuration
pub mod config;
