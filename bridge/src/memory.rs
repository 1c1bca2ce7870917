//! Safe guest linear memory read/write helpers with bounds checking.
//!
//! All functions validate pointer and length arguments against the
//! guest's linear memory size before accessing. Out-of-bounds access
//! returns [`BridgeError::Marshal`], which renders as the
//! `cannot read memory` cause and aborts the current evaluation.

use crate::error::BridgeError;

/// Read `len` bytes from guest memory at `ptr`.
///
/// Returns `Err(Marshal)` if the range `[ptr, ptr+len)` is out of bounds.
pub fn read_bytes(mem: &[u8], ptr: i32, len: i32) -> Result<Vec<u8>, BridgeError> {
    if ptr < 0 || len < 0 {
        return Err(BridgeError::Marshal);
    }
    let start = ptr as usize;
    let end = start
        .checked_add(len as usize)
        .ok_or(BridgeError::Marshal)?;
    if end > mem.len() {
        return Err(BridgeError::Marshal);
    }
    Ok(mem[start..end].to_vec())
}

/// Write `data` bytes to guest memory at `ptr`.
///
/// Returns `Err(Marshal)` if the range `[ptr, ptr+data.len())` is out of bounds.
pub fn write_bytes(mem: &mut [u8], ptr: i32, data: &[u8]) -> Result<(), BridgeError> {
    if ptr < 0 {
        return Err(BridgeError::Marshal);
    }
    let start = ptr as usize;
    let end = start
        .checked_add(data.len())
        .ok_or(BridgeError::Marshal)?;
    if end > mem.len() {
        return Err(BridgeError::Marshal);
    }
    mem[start..end].copy_from_slice(data);
    Ok(())
}

/// Read an i32 value (little-endian) from guest memory at `ptr`.
pub fn read_i32(mem: &[u8], ptr: i32) -> Result<i32, BridgeError> {
    let bytes = read_bytes(mem, ptr, 4)?;
    Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_bytes_basic() {
        let mem = vec![10, 20, 30, 40, 50];
        let result = read_bytes(&mem, 1, 3).unwrap();
        assert_eq!(result, vec![20, 30, 40]);
    }

    #[test]
    fn test_read_bytes_out_of_bounds() {
        let mem = vec![10, 20, 30];
        assert!(read_bytes(&mem, 1, 3).is_err());
        assert!(read_bytes(&mem, -1, 1).is_err());
        assert!(read_bytes(&mem, 0, -1).is_err());
        assert!(read_bytes(&mem, i32::MAX, i32::MAX).is_err());
    }

    #[test]
    fn test_read_bytes_empty_range() {
        let mem = vec![1, 2, 3];
        assert_eq!(read_bytes(&mem, 3, 0).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_write_bytes_basic() {
        let mut mem = vec![0; 8];
        write_bytes(&mut mem, 2, &[0xAA, 0xBB]).unwrap();
        assert_eq!(mem[2], 0xAA);
        assert_eq!(mem[3], 0xBB);
    }

    #[test]
    fn test_write_bytes_out_of_bounds() {
        let mut mem = vec![0; 4];
        assert!(write_bytes(&mut mem, 2, &[1, 2, 3]).is_err());
        assert!(write_bytes(&mut mem, -1, &[1]).is_err());
    }

    #[test]
    fn test_read_i32_little_endian() {
        let mut mem = vec![0; 16];
        write_bytes(&mut mem, 4, &0x12345678i32.to_le_bytes()).unwrap();
        assert_eq!(read_i32(&mem, 4).unwrap(), 0x12345678);
        assert_eq!(mem[4], 0x78);
    }

    #[test]
    fn test_marshal_error_message() {
        let err = read_bytes(&[], 1, 1).unwrap_err();
        assert_eq!(format!("{}", err), "cannot read memory");
    }
}
