//! Domain models for storefront.
//!
//! Rows come out of Postgres via `sqlx::FromRow`; the `*View` types are what
//! the JSON API serializes (they never expose raw deal columns once a deal
//! has expired).

pub mod cart;
pub mod order;
pub mod product;
pub mod session;
pub mod support;
pub mod user;

pub use cart::{CartItem, CartLine, CartLineView, CartView};
pub use order::{NewOrder, NewOrderItem, Order, OrderItem, OrderWithItems, ShippingAddress};
pub use product::{Product, ProductView};
pub use session::{CurrentUser, session_keys};
pub use support::{Appointment, ContactInquiry, ProductQuestion, ProductReview, SupportTicket};
pub use user::User;
