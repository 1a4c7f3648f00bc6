//! Cost Estimation Domain
//!
//! Maps cloud resources to billable cost components, fills quantities from
//! usage estimates and prices them against a catalog.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Estimator  │  ← Build, price, total and sort a project
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Pricing   │  ← Price catalog (trait + in-memory implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │    Azure    │  ← Resource mappings, tiered usage, sub-resources
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Schema    │  ← Cost components, resources, usage data
//! └─────────────┘
//! ```

pub mod azure;
pub mod error;
pub mod estimator;
pub mod pricing;
pub mod schema;

// Re-export commonly used types
pub use error::{EstimationError, EstimationResult};
pub use estimator::Estimator;
pub use pricing::{InMemoryPriceCatalog, Price, PriceCatalog, apply_prices};
pub use schema::{
    CoreResource, CostComponent, PartialResource, Project, Resource, UsageData, UsageMap,
};
