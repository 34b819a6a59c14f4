//! Built-in entropy sources.
//!
//! Each source reads some cheap piece of process, system or network state.
//! None of them is a cryptographic source on its own.

use super::source::{EntropyError, EntropySource};
use crate::conditioning::{Conditioner, HashAlgorithm};
use crate::context::Context;
use rand_core::{OsRng, RngCore};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

/// Default number of random bytes sampled by [`RandomBytesSource`].
pub const DEFAULT_RANDOM_BYTES: usize = 16;

const SYS_CLASS_NET: &str = "/sys/class/net";

/// Returns the default entropy set used by generators.
pub fn default_sources() -> Vec<Arc<dyn EntropySource>> {
    vec![
        Arc::new(TimestampSource),
        Arc::new(UuidSource),
        Arc::new(RandomBytesSource::default()),
        Arc::new(SystemStatsSource),
        Arc::new(AggregateHashSource::default()),
    ]
}

/// Looks up a built-in source by its [`EntropySource::name`].
pub fn source_by_name(name: &str) -> Option<Arc<dyn EntropySource>> {
    let source: Arc<dyn EntropySource> = match name {
        "timestamp" => Arc::new(TimestampSource),
        "uuid" => Arc::new(UuidSource),
        "random_bytes" => Arc::new(RandomBytesSource::default()),
        "system_stats" => Arc::new(SystemStatsSource),
        "network_mac" => Arc::new(NetworkMacSource::default()),
        "aggregate_hash" => Arc::new(AggregateHashSource::default()),
        _ => return None,
    };
    Some(source)
}

fn unix_nanos() -> i64 {
    let now = chrono::Utc::now();
    now.timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros())
}

/// Resident set size in pages, or 0 where `/proc` is unavailable.
fn resident_pages() -> u64 {
    fs::read_to_string("/proc/self/statm")
        .ok()
        .and_then(|statm| statm.split_whitespace().nth(1)?.parse().ok())
        .unwrap_or(0)
}

fn cpu_count() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}

/// Wall-clock time in nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampSource;

impl EntropySource for TimestampSource {
    fn name(&self) -> &'static str {
        "timestamp"
    }

    fn produce(&self, _ctx: &Context) -> Result<String, EntropyError> {
        Ok(unix_nanos().to_string())
    }
}

/// A fresh version 4 UUID in hyphenated form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidSource;

impl EntropySource for UuidSource {
    fn name(&self) -> &'static str {
        "uuid"
    }

    fn produce(&self, _ctx: &Context) -> Result<String, EntropyError> {
        Ok(uuid::Uuid::new_v4().to_string())
    }
}

/// OS random bytes rendered as lowercase hex.
#[derive(Debug, Clone, Copy)]
pub struct RandomBytesSource {
    length: usize,
}

impl RandomBytesSource {
    /// Creates a source sampling `length` bytes; zero falls back to the default.
    pub fn new(length: usize) -> Self {
        let length = if length == 0 {
            DEFAULT_RANDOM_BYTES
        } else {
            length
        };
        Self { length }
    }

    /// Returns the number of bytes sampled per call.
    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for RandomBytesSource {
    fn default() -> Self {
        Self::new(DEFAULT_RANDOM_BYTES)
    }
}

impl EntropySource for RandomBytesSource {
    fn name(&self) -> &'static str {
        "random_bytes"
    }

    fn produce(&self, _ctx: &Context) -> Result<String, EntropyError> {
        let mut buf = vec![0u8; self.length];
        OsRng
            .try_fill_bytes(&mut buf)
            .map_err(|e| EntropyError::Random {
                name: self.name(),
                message: e.to_string(),
            })?;
        Ok(buf.iter().map(|b| format!("{:02x}", b)).collect())
    }
}

/// Process memory, CPU count, process id and time, joined with underscores.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemStatsSource;

impl EntropySource for SystemStatsSource {
    fn name(&self) -> &'static str {
        "system_stats"
    }

    fn produce(&self, _ctx: &Context) -> Result<String, EntropyError> {
        Ok(format!(
            "{}_{}_{}_{}",
            resident_pages(),
            cpu_count(),
            std::process::id(),
            unix_nanos()
        ))
    }
}

/// Hardware addresses of network interfaces that are up, comma separated.
///
/// Loopback and all-zero addresses are skipped. Hosts without any such
/// interface (or without `/sys/class/net`) yield an empty sample.
#[derive(Debug, Clone)]
pub struct NetworkMacSource {
    root: PathBuf,
}

impl NetworkMacSource {
    /// Reads interfaces from a sysfs-style directory other than `/sys/class/net`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for NetworkMacSource {
    fn default() -> Self {
        Self::with_root(SYS_CLASS_NET)
    }
}

impl EntropySource for NetworkMacSource {
    fn name(&self) -> &'static str {
        "network_mac"
    }

    fn produce(&self, ctx: &Context) -> Result<String, EntropyError> {
        let io_err = |error: io::Error| EntropyError::Io {
            name: self.name(),
            error,
        };

        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(String::new()),
            Err(e) => return Err(io_err(e)),
        };

        let mut addresses = Vec::new();
        for entry in entries {
            ctx.check()?;
            let entry = entry.map_err(io_err)?;
            if entry.file_name() == "lo" {
                continue;
            }

            let path = entry.path();
            let state = fs::read_to_string(path.join("operstate")).unwrap_or_default();
            if state.trim() != "up" {
                continue;
            }

            let address = match fs::read_to_string(path.join("address")) {
                Ok(address) => address.trim().to_string(),
                Err(_) => continue,
            };
            if address.is_empty() || address == "00:00:00:00:00:00" {
                continue;
            }
            addresses.push(address);
        }

        addresses.sort();
        Ok(addresses.join(","))
    }
}

/// Hash of timestamp, UUID, memory and CPU state, chained with the previous
/// output of the same instance.
pub struct AggregateHashSource {
    conditioner: Conditioner,
    last: Mutex<Option<[u8; 32]>>,
}

impl AggregateHashSource {
    /// Creates a source hashing with the given algorithm.
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self {
            conditioner: Conditioner::new(algorithm),
            last: Mutex::new(None),
        }
    }
}

impl Default for AggregateHashSource {
    fn default() -> Self {
        Self::new(HashAlgorithm::default())
    }
}

impl std::fmt::Debug for AggregateHashSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AggregateHashSource")
            .field("algorithm", &self.conditioner.algorithm())
            .finish_non_exhaustive()
    }
}

impl EntropySource for AggregateHashSource {
    fn name(&self) -> &'static str {
        "aggregate_hash"
    }

    fn produce(&self, _ctx: &Context) -> Result<String, EntropyError> {
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);

        let mut parts: Vec<Vec<u8>> = vec![
            unix_nanos().to_be_bytes().to_vec(),
            uuid::Uuid::new_v4().to_string().into_bytes(),
            resident_pages().to_be_bytes().to_vec(),
            cpu_count().to_string().into_bytes(),
        ];
        if let Some(previous) = *last {
            parts.push(previous.to_vec());
        }

        let digest = self.conditioner.condition(&parts);
        *last = Some(*digest.as_bytes());
        Ok(digest.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn fake_interface(root: &Path, name: &str, state: &str, address: &str) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("operstate"), format!("{state}\n")).unwrap();
        fs::write(dir.join("address"), format!("{address}\n")).unwrap();
    }

    #[test]
    fn test_timestamp_is_numeric() {
        let sample = TimestampSource.produce(&Context::background()).unwrap();
        assert!(sample.parse::<i64>().is_ok());
    }

    #[test]
    fn test_uuid_changes_every_call() {
        let ctx = Context::background();
        let a = UuidSource.produce(&ctx).unwrap();
        let b = UuidSource.produce(&ctx).unwrap();
        assert_eq!(a.len(), 36);
        assert_ne!(a, b);
    }

    #[test]
    fn test_random_bytes_length() {
        let ctx = Context::background();
        assert_eq!(RandomBytesSource::default().produce(&ctx).unwrap().len(), 32);
        assert_eq!(RandomBytesSource::new(4).produce(&ctx).unwrap().len(), 8);
        assert_eq!(RandomBytesSource::new(0).length(), DEFAULT_RANDOM_BYTES);
    }

    #[test]
    fn test_system_stats_has_four_fields() {
        let sample = SystemStatsSource.produce(&Context::background()).unwrap();
        assert_eq!(sample.split('_').count(), 4);
    }

    #[test]
    fn test_aggregate_hash_chains() {
        let source = AggregateHashSource::default();
        let ctx = Context::background();

        let first = source.produce(&ctx).unwrap();
        let second = source.produce(&ctx).unwrap();

        assert_eq!(first.len(), 64);
        assert_ne!(first, second);
    }

    #[test]
    fn test_network_mac_filters_interfaces() {
        let root = tempfile::tempdir().unwrap();
        fake_interface(root.path(), "lo", "unknown", "00:00:00:00:00:00");
        fake_interface(root.path(), "eth1", "up", "02:42:ac:11:00:03");
        fake_interface(root.path(), "eth0", "up", "02:42:ac:11:00:02");
        fake_interface(root.path(), "wlan0", "down", "aa:bb:cc:dd:ee:ff");
        fake_interface(root.path(), "dummy0", "up", "00:00:00:00:00:00");

        let sample = NetworkMacSource::with_root(root.path())
            .produce(&Context::background())
            .unwrap();

        assert_eq!(sample, "02:42:ac:11:00:02,02:42:ac:11:00:03");
    }

    #[test]
    fn test_network_mac_missing_root_is_empty() {
        let root = tempfile::tempdir().unwrap();
        let source = NetworkMacSource::with_root(root.path().join("absent"));

        assert_eq!(source.produce(&Context::background()).unwrap(), "");
    }

    #[test]
    fn test_network_mac_observes_cancellation() {
        let root = tempfile::tempdir().unwrap();
        fake_interface(root.path(), "eth0", "up", "02:42:ac:11:00:02");
        let ctx = Context::background();
        ctx.cancel();

        let result = NetworkMacSource::with_root(root.path()).produce(&ctx);
        assert!(matches!(result, Err(EntropyError::Interrupted(_))));
    }

    #[test]
    fn test_lookup_by_name() {
        for source in default_sources() {
            let found = source_by_name(source.name()).unwrap();
            assert_eq!(found.name(), source.name());
        }
        assert!(source_by_name("network_mac").is_some());
        assert!(source_by_name("moon_phase").is_none());
    }
}
