//! Property-based testing utilities for tidyflow-core.
//!
//! This module provides strategies for core types to enable property-based
//! testing with proptest.
