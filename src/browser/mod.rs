mod session;

pub use session::BrowserSession;
