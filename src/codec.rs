//! Shared binary encoding helpers
//!
//! Both on-disk formats are big-endian: the store's 8-byte frame length
//! prefix and the index's fixed-width `[record (4)][position (8)]` entries.
//! Callers pass exact-width subslices; widths are the constants below.

/// Store frame length prefix width in bytes
pub(crate) const LEN_WIDTH: u64 = 8;

/// Index entry record-number field width in bytes
pub(crate) const REC_WIDTH: u64 = 4;

/// Index entry byte-position field width in bytes
pub(crate) const POS_WIDTH: u64 = 8;

/// Total width of one index entry in bytes
pub(crate) const ENTRY_WIDTH: u64 = REC_WIDTH + POS_WIDTH;

pub(crate) fn put_u32(buf: &mut [u8], value: u32) {
    buf[..4].copy_from_slice(&value.to_be_bytes());
}

pub(crate) fn get_u32(buf: &[u8]) -> u32 {
    u32::from_be_bytes(buf[..4].try_into().unwrap())
}

pub(crate) fn put_u64(buf: &mut [u8], value: u64) {
    buf[..8].copy_from_slice(&value.to_be_bytes());
}

pub(crate) fn get_u64(buf: &[u8]) -> u64 {
    u64::from_be_bytes(buf[..8].try_into().unwrap())
}
