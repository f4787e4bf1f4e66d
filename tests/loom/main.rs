#![cfg(loom)]

mod lifecycle;
