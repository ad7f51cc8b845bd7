//! Types shared between the list endpoints and their clients.

mod api_client;
pub mod requests;
pub mod responses;
pub mod scouting;

pub use api_client::{
    APIClient, ClientError, ok_empty, ok_json, server_error_message,
};
pub use requests::{DEFAULT_PAGE_LIMIT, FilterValue, Filters, PageRequest};
pub use responses::{DecodeError, PageResponse, decode_page};

pub use reqwest::StatusCode;
