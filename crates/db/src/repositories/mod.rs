//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Every query on business tables is filtered by the caller's organization.

pub mod auth_user;
pub mod category;
pub mod credit_card;
pub mod error;
pub mod organization;
pub mod profile;
pub mod purchase;
pub mod recurring;
pub mod transaction;

pub use auth_user::{AuthUserRepository, EmailStatus};
pub use category::{CategoryInput, CategoryRepository};
pub use credit_card::{CreditCardInput, CreditCardRepository};
pub use error::RepositoryError;
pub use organization::{DEFAULT_USER_NAME, OrganizationRepository, Provisioned};
pub use profile::ProfileRepository;
pub use purchase::{PurchaseFilter, PurchaseInput, PurchaseRepository};
pub use recurring::{RecurringInput, RecurringRepository};
pub use transaction::{TransactionFilter, TransactionInput, TransactionRepository};
