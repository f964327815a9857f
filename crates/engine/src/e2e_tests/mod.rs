//! End-to-end tests over in-memory SQLite.

mod harness;

mod dispatch_flow_tests;
