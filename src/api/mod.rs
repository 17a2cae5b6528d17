pub mod client;
pub mod envelope;
pub mod transport;

pub use client::ApiClient;
pub use envelope::{normalize_list, unwrap_record, Page, PageMeta};
pub use transport::{ApiRequest, ApiResponse, FormPart, Method, RequestBody, ReqwestTransport, Transport};
