//! Unit test harness.

mod requirement_test;
