pub mod crawler;
pub mod error;
pub mod links;
pub mod probe;
pub mod report;
pub mod robots;
pub mod target;
pub mod transport;

pub use crawler::Crawler;
pub use error::ScanError;
pub use report::{CrawlReport, ProbeResult};
pub use target::Target;
pub use transport::{TorTransport, Transport};
