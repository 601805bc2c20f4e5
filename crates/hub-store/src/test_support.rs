//! Shared test utilities for hub-store tests.
