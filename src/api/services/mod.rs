pub mod analytics;
pub mod health;
pub mod redirect;
pub mod shorten;

pub use analytics::AnalyticsService;
pub use health::HealthService;
pub use redirect::RedirectService;
pub use shorten::ShortenService;
