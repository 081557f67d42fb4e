use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "dlnaprobe",
    about = "Conformance probes for a DLNA/UPnP media server — one probe per run, PASS or FAIL",
    long_about = None,
    version = env!("PROBE_VERSION"),
)]
pub struct Args {
    /// Path to TOML config file (overrides default search: ./dlnaprobe.toml, ~/.config/dlnaprobe/config.toml)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Address of the device under test [default: 192.168.1.11]
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// HTTP port of the device under test [default: 8200]
    #[arg(short, long, global = true)]
    pub port: Option<u16>,

    #[command(subcommand)]
    pub probe: Probe,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    /// Send an M-SEARCH and wait for a DLNA root device response
    Msearch,
    /// Listen on the SSDP group for an ssdp:alive NOTIFY
    Alive,
    /// Listen on the SSDP group for both ssdp:byebye and ssdp:alive (restart the DUT)
    Notify,
    /// Discover the root description, download it and diff it against the reference
    RootDesc,
    /// Send a ContentDirectory Browse and diff the response against the reference
    Browse {
        /// Container to browse
        #[arg(long, default_value = "64")]
        object_id: String,
        /// BrowseDirectChildren or BrowseMetadata
        #[arg(long, default_value = "BrowseDirectChildren")]
        browse_flag: String,
        #[arg(long, default_value_t = 0)]
        starting_index: u32,
        #[arg(long, default_value_t = 24)]
        requested_count: u32,
        /// Reference document under the reference directory
        #[arg(long, default_value = crate::http::browse::BROWSE_REFERENCE_FILE)]
        reference: String,
    },
    /// Send a malformed SOAP request and expect a UPnPError fault
    SoapInvalid,
    /// Send an ssdp:byebye NOTIFY for a device UUID and print any reply
    Announce {
        #[arg(long, default_value = crate::ssdp::announce::DEFAULT_BYEBYE_UUID)]
        uuid: uuid::Uuid,
    },
    /// Print all SSDP multicast traffic
    Monitor {
        /// Seconds to listen; 0 listens until Ctrl+C
        #[arg(long, default_value_t = 0)]
        duration: u64,
    },
}
