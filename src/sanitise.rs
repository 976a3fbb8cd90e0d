/// Punctuation that is safe to keep in a file name, besides letters,
/// digits, and the space.
const OK_CHARS : &'static str = "!#$%&'(),-= ";

/// Filters a tag string down to file-name-safe characters. Anything
/// outside the allow list is dropped rather than replaced, and the
/// surviving characters keep their order.
pub fn sanitise(name : &str) -> String {
    name.chars()
        .filter(|x| x.is_alphanumeric() || OK_CHARS.contains(*x))
        .collect()
}
