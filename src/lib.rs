//! Conformance probes for DLNA/UPnP media servers: SSDP discovery and NOTIFY
//! monitoring, root description diffing, and SOAP ContentDirectory checks.

pub mod cli;
pub mod config;
pub mod http;
pub mod ssdp;
pub mod verdict;
pub mod workdir;
pub mod xml;
