//! Remote API access.
//!
//! - [`endpoint`]: the closed catalog of remote operations
//! - [`transport`]: the request/response seam and its reqwest implementation
//! - [`client`]: [`ApiClient`], which attaches the session token and maps
//!   HTTP outcomes onto [`CinelistError`](crate::domain::CinelistError)

pub mod client;
pub mod endpoint;
pub mod transport;

pub use client::{ApiClient, AuthResponse};
pub use endpoint::{Endpoint, HttpMethod};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
