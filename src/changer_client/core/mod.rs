mod http;
mod poller;

pub use http::HttpClient;
pub use poller::{PollStep, StatusPoller};
