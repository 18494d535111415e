///! On-disk formats: the `.fmi` text loader, the binary CSR snapshot, the
///! landmark-set JSON file, and the CRC-64 checksum helper they share.

pub mod crc;
pub mod fmi;
pub mod landmarks;
pub mod snapshot;
