mod client;
mod error;
mod types;

pub use client::CrmStore;
