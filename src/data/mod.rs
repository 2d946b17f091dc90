//! Data layer: FlexVolt file parsing and column extraction.
//!
//! Architecture:
//! ```text
//!   flexvolt-recorded-data--*.txt
//!        │
//!        ▼
//!   ┌──────────┐   line 1   ┌──────────┐
//!   │  loader   │ ─────────▶ │ literal  │  metadata literal → Metadata
//!   └──────────┘            └──────────┘
//!        │ line 2: column header, lines 3+: Array2<f64>
//!        ▼
//!   ┌──────────┐
//!   │  group    │  time / raw / process substring match → column indices
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ Recording │  squeezed GroupData per group + metadata
//!   └──────────┘
//! ```

pub mod error;
pub mod group;
pub mod literal;
pub mod loader;
pub mod model;
