pub mod api;
pub mod client;
pub mod error;
pub mod media;
pub mod session;
pub mod sync;

pub use api::{MediaHost, UploadedMedia, VariantApi};
pub use client::StorefrontClient;
pub use error::ClientError;
pub use media::MediaClient;
pub use session::SessionStore;
pub use sync::{sync_product_variants, SyncFailure, SyncOperation, SyncReport};
