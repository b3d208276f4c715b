//! Infrastructure layer of the client.

pub mod udp_sender;
