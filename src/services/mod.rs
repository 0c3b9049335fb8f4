pub mod archive;
pub mod compare;
pub mod nvcf;

// Re-export commonly used services
pub use compare::CompareService;
pub use nvcf::NvcfClient;
