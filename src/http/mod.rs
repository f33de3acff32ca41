pub mod client;
pub mod method;
#[cfg(test)]
pub mod mock;
pub mod request;
pub mod response;

pub use client::{ReqwestTransport, Transport};
pub use method::HttpMethod;
pub use request::HttpRequest;
pub use response::HttpResponse;
