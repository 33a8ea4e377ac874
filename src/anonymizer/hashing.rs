/// Maps an identifier to a bucket in `[0, table_size)`.
///
/// The hash is the classic `h = h * 31 + c` string hash over UTF-16 code
/// units with 32-bit two's-complement wrapping, so the same identifier lands
/// in the same bucket on every call and in every process. Collisions are
/// expected. A `table_size` of zero yields 0.
pub fn stable_index(identifier: &str, table_size: usize) -> usize {
    if table_size == 0 {
        return 0;
    }
    let hash = identifier
        .encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)));
    // unsigned_abs keeps i32::MIN at 2^31 instead of overflowing
    (hash.unsigned_abs() as usize) % table_size
}
