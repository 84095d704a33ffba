//! Common library for the AdminHub client
//!
//! This crate provides shared infrastructure used by the dashboard
//! application: durable key-value storage (the client-side state that
//! survives restarts) and the error types that go with it.

pub mod error;
pub mod storage;

#[cfg(test)]
mod tests {
    #[test]
    fn it_works() {
        let result = 2 + 2;
        assert_eq!(result, 4);
    }
}
