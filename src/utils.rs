pub(crate) fn bytes_to_float(bytes: &[u8]) -> f64 {
    let mut arr = [0; 8];
    bytes
        .iter()
        .enumerate()
        .for_each(|(idx, value)| arr[idx] = *value);
    f64::from_le_bytes(arr)
}

pub(crate) fn bytes_to_int(bytes: &[u8]) -> i32 {
    let mut arr = [0; 4];
    bytes
        .iter()
        .enumerate()
        .for_each(|(idx, value)| arr[idx] = *value);
    i32::from_le_bytes(arr)
}
