//! Access to the upstream chain a fork is taken from

pub mod provider;

pub use provider::ForkProvider;
