//! Integration tests: real HTTP client and WebSocket connector against an
//! in-process mock backend.

mod helpers;
mod store_test;
