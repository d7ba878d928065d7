pub mod enrichment;
pub mod report;

pub use enrichment::EnrichmentResult;
pub use report::{Entity as Report, Model as ReportModel, NewReport};
