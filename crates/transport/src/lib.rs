//! Transport layer for the Secret Network harness.
//!
//! Talks to a node through its LCD (REST gateway) endpoint. Transactions are
//! assembled from the prost message types in [`proto`] and broadcast as
//! base64 `tx_bytes`.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`lcd`] | [`LcdTransport`] -- accounts, balances, code hashes, queries, broadcast |
//! | [`proto`] | Cosmos tx and Secret compute protobuf messages |

pub mod lcd;
pub mod proto;

pub use lcd::{
    AccountInfo, LcdAttribute, LcdConfig, LcdError, LcdEvent, LcdLog, LcdTransport, LcdTxResponse,
};
