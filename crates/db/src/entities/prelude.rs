//! Entity re-exports.

pub use super::categories::Entity as Categories;
pub use super::credit_card_purchases::Entity as CreditCardPurchases;
pub use super::credit_cards::Entity as CreditCards;
pub use super::organizations::Entity as Organizations;
pub use super::profiles::Entity as Profiles;
pub use super::recurring_transactions::Entity as RecurringTransactions;
pub use super::transactions::Entity as Transactions;
