/// Data layer: sweep extraction, measurement sets, compensation and export.
///
/// Architecture:
/// ```text
///  one or more instrument .csv exports
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  bytes → rows of cells (csv), label per file
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  extract  │  BEGIN/END or skip/max window, header → Sweep
///   └──────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ MeasurementSet │  labelled sweeps in load order + frequency axis
///   └────────────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ compensate │  reference label → compensated S21 per label
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  CSV writer, plot series (GHz axis)
///   └──────────┘
/// ```

pub mod compensate;
pub mod error;
pub mod export;
pub mod extract;
pub mod loader;
pub mod model;
