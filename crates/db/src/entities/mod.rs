//! `SeaORM` entity definitions.

pub mod prelude;

pub mod categories;
pub mod credit_card_purchases;
pub mod credit_cards;
pub mod organizations;
pub mod profiles;
pub mod recurring_transactions;
pub mod sea_orm_active_enums;
pub mod transactions;
