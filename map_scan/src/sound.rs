use crate::material::find_path_token;
use crate::tally::Tally;

const WAV_EXTENSION: &str = ".wav";
const WORLD_SOUNDS: &str = "sound/world/";

/// Extracts a `.wav` reference from a line. Ambient sounds under
/// `sound/world/` ship with the game and are never returned.
pub fn get_sound(line: &str) -> String {
    if !line.contains(WAV_EXTENSION) || line.contains(WORLD_SOUNDS) {
        return String::new();
    }
    match find_path_token(line) {
        Some(token) => format!("{}{}", token, WAV_EXTENSION),
        None => String::new(),
    }
}

pub fn add_sounds(line: &str, sounds: &mut Tally) {
    let sound = get_sound(line);
    if !sound.is_empty() {
        sounds.increment(sound);
    }
}
