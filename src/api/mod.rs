pub mod client;
pub mod deserializers;
pub mod egov;
pub mod http_client;
pub mod types;

pub use client::{ClientConfig, LawSource, DEFAULT_BASE_URL};
pub use egov::EgovClient;
pub use types::{LawDetail, LawList, LawSummary, LookupKey};
