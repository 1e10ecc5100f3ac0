pub mod app_config;
pub mod authoring;
pub mod cart;
pub mod config;
pub mod coupon;
pub mod models;
pub mod reconcile;
pub mod selection;
pub mod store;

pub use app_config::{AppConfig, Environment};
pub use authoring::{
    AuthoringError, DraftKey, DuplicateWarning, ImageInput, VariantBuilder, VariantDraft,
    VariantField, VariantSummary,
};
pub use cart::{cart_subtotal, AddToCart, CartItem, CartLine, ComparisonItem, WishlistItem};
pub use config::{load_app_config, load_app_config_from_env};
pub use coupon::{Coupon, CouponError};
pub use models::{Product, Variant};
pub use reconcile::{
    changed_fields, format_rejections, plan_variant_sync, SyncPlan, UpdateReason,
    VariantFieldName, VariantRejection, VariantUpdate,
};
pub use selection::{
    effective_offer_price, effective_price, effective_stock, resolve_variant, CartSelection,
    SelectionError, StockNotice, LOW_STOCK_THRESHOLD, MAX_QUANTITY,
};
pub use store::{Action, AppState, AuthState, PersistedSession, Role, Theme};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
