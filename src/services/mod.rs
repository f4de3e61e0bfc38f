pub mod url_service;

pub use url_service::{AnalyticsReport, TimeFrame, UrlService};
