//! HTTP surface of the service

pub mod endpoints;
