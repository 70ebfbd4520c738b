//! Integration test harness.

mod locale_switch_test;
mod navigation_cancel_test;
