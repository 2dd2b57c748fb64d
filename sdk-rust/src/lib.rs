#![doc = include_str!("../README.md")]

mod articles_api;
mod client;
mod client_utils;
mod errors;
pub mod inkpilots_test;
mod opentelemetry;
mod types;

pub use articles_api::ArticlesApi;
pub use client::{
    InkPilotsClient, InkPilotsClientOptions, API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS,
};
pub use errors::*;
pub use types::*;
