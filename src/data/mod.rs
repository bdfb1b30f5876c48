//! Data module - CSV loading, selection and reshaping
//!
//! ```text
//!  sanci_health_data.csv
//!        │
//!        ▼
//!   loader    normalize headers, skip ragged rows, keep TOTAL rows
//!        │
//!        ▼
//!   HealthTable + ColumnLayout   (cached for the session)
//!        │
//!        ▼
//!   selector  (indicator, parameter) → SelectedRecord
//!        │
//!        ├──► reshaper  → Vec<TidyRow>  (chart)
//!        ├──► kpi       → KpiTriple     (cards)
//!        └──► export    → Field,Value CSV (download)
//! ```

mod columns;
mod export;
mod kpi;
mod loader;
mod reshaper;
mod selector;
mod table;

pub use columns::{Band, Month};
pub use export::{download_filename, export_rows, write_export};
pub use kpi::{kpis, KpiTriple};
pub use loader::TableCache;
pub use reshaper::{reshape, TidyRow};
pub use selector::{Catalog, SelectionState};
pub use table::{HealthTable, SelectedRecord};
