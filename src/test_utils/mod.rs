#![allow(missing_docs)]

pub(crate) mod http;
pub(crate) mod store;

pub(crate) use http::{assert_error_body, get_test_server};
pub(crate) use store::{StoreCall, StubStore, march_transactions};
