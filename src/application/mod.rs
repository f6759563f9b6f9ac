pub mod cart_store;
pub mod checkout;
pub mod order_builder;
pub mod order_submission;
