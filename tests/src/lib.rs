//! End-to-end enumeration scenarios against a simulated NDIS stack.

#![cfg(test)]

mod support;
