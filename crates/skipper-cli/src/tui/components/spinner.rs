//! Time-keyed spinner frames.

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Frame for the current wall-clock instant. Keying on time keeps every
/// spinner on screen in step without shared state.
pub fn spinner_frame() -> &'static str {
    let millis = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    SPINNER_FRAMES[(millis / 120 % SPINNER_FRAMES.len() as u128) as usize]
}
