//! # Database module: PostgreSQL connection pool and migrations
//!
//! Used only when `DATABASE_URL` is configured. [`connect`] opens a pool with up to
//! 5 connections and applies the embedded migrations from `packages/api/migrations`
//! before handing the pool back. The pool is owned by whoever called `connect` and
//! passed on explicitly; there is no process-wide singleton.

mod pool;

pub use pool::connect;
