//! Point-of-sale rules: variant resolution, cart bookkeeping, stock gates,
//! pricing and checkout. Everything here is synchronous and works on
//! catalogue snapshots handed in by the services layer.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod pricing;
pub mod stock;

#[cfg(test)]
pub(crate) mod testing;
