pub mod enrichment;
pub mod memory_store;
pub mod pipeline;
pub mod report;
pub mod store;
pub mod text_analysis;
