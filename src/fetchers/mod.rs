pub mod fetcher;
pub mod http;
pub mod session;
pub mod web;

pub use fetcher::Fetch;
pub use http::StaticFetcher;
pub use session::{Launch, PageSession, WebDriverLauncher};
pub use web::RenderedFetcher;
