//! # Integration Tests
//!
//! The full write and read paths over real HTTP: `DocumentRegistryService`
//! driving `HttpChainClient` against an in-process simulated node.


#[cfg(test)]
mod concurrency;
#[cfg(test)]
mod flows;
