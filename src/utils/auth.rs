/// Compare an admin API key in constant time
///
/// The comparison touches every byte so the response time does not leak
/// how long a matching prefix was.
pub fn verify_api_key(provided: &str, expected: &str) -> bool {
    provided.len() == expected.len()
        && provided
            .bytes()
            .zip(expected.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}
